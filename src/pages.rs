use rust_embed::RustEmbed;
use tracing::warn;

#[derive(RustEmbed)]
#[folder = "assets/pages/"]
struct PageAssets;

/// Placeholder and fallback documents shown in the preview instead of a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// Nothing selected yet
    Welcome,
    /// Uploaded image was cleared
    Upload,
    /// Demo picked, waiting for play (`{{name}}`)
    ReadyDemo,
    /// Screenshot uploaded, waiting for play
    ReadyUpload,
    ManifestMissing,
    FinalMissing,
    /// Step file failed (`{{file}}`)
    StepMissing,
}

impl Page {
    fn file_name(self) -> &'static str {
        match self {
            Page::Welcome => "welcome.html",
            Page::Upload => "upload.html",
            Page::ReadyDemo => "ready_demo.html",
            Page::ReadyUpload => "ready_upload.html",
            Page::ManifestMissing => "manifest_missing.html",
            Page::FinalMissing => "final_missing.html",
            Page::StepMissing => "step_missing.html",
        }
    }

    /// Render with `{{key}}` placeholders replaced by escaped values.
    pub fn render(self, vars: &[(&str, &str)]) -> String {
        let template = match PageAssets::get(self.file_name()) {
            Some(file) => String::from_utf8_lossy(&file.data).into_owned(),
            None => {
                warn!(page = self.file_name(), "embedded page missing");
                "<!DOCTYPE html><html><head></head><body><p>{{name}}{{file}}</p></body></html>".to_string()
            }
        };
        let mut out = template;
        for (key, value) in vars {
            out = out.replace(&format!("{{{{{key}}}}}"), &escape_html(value));
        }
        strip_unbound(out)
    }
}

fn strip_unbound(mut html: String) -> String {
    while let Some(start) = html.find("{{") {
        match html[start..].find("}}") {
            Some(len) => html.replace_range(start..start + len + 2, ""),
            None => break,
        }
    }
    html
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}
