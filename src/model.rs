use serde::{Deserialize, Serialize};

/// One pre-recorded snapshot of generated markup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// File name relative to the demo's base path (e.g. `0001.html`)
    pub file: String,
    /// Short label shown under the progress bar
    #[serde(default)]
    pub caption: String,
    /// Longer text, used when the caption is empty
    #[serde(default)]
    pub description: String,
}

/// A selectable demo from the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Demo {
    /// Unique identifier, also selects the preview profile
    pub id: String,
    /// Display name
    pub name: String,
    /// Path of the step manifest (`<base>/manifest.json`)
    pub manifest: String,
    /// Optional path of the complete final output, played after the last step
    #[serde(default)]
    pub final_html: Option<String>,
    /// Per-step duration override in milliseconds
    #[serde(default)]
    pub interval_time: Option<u64>,
    /// Image used as the generation target when the demo is picked
    #[serde(default)]
    pub thumbnail: String,
    /// Category id used by the selector filter
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub estimated_time: String,
    /// Advertised step count, display only
    #[serde(default)]
    pub steps: usize,
}

impl Demo {
    /// Directory the manifest lives in; step files are resolved against it.
    pub fn base_path(&self) -> &str {
        match self.manifest.rsplit_once('/') {
            Some((base, _)) => base,
            None => "",
        }
    }

    /// Full path of a step file.
    pub fn step_path(&self, file: &str) -> String {
        let base = self.base_path();
        if base.is_empty() {
            file.to_string()
        } else {
            format!("{base}/{file}")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// Contents of the well-known demo catalog file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub demos: Vec<Demo>,
    #[serde(default)]
    pub categories: Vec<Category>,
}

/// Category selection in the demo grid
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Id(String),
}

impl CategoryFilter {
    pub fn matches(&self, demo: &Demo) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Id(id) => demo.category == *id,
        }
    }
}

impl Catalog {
    /// Demos visible under the given filter, in catalog order.
    pub fn filtered<'a>(&'a self, filter: &'a CategoryFilter) -> impl Iterator<Item = &'a Demo> + 'a {
        self.demos.iter().filter(move |demo| filter.matches(demo))
    }

    #[cfg(test)]
    pub fn find(&self, id: &str) -> Option<&Demo> {
        self.demos.iter().find(|demo| demo.id == id)
    }
}

/// Ephemeral playback position; never persisted
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlaybackState {
    /// Continuous progress percentage in `[0, 100]`
    pub progress: f64,
    /// Discrete index into the steps (may equal `steps.len()` for the final output)
    pub step_index: usize,
    /// Whether the autoplay timer is running
    pub playing: bool,
}

impl PlaybackState {
    pub fn new() -> Self {
        Self::default()
    }
}
