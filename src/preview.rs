//! Per-demo scaling rules handed to the preview renderer.

const BASE_CSS: &str = "\
html, body { margin: 0; padding: 0; width: 100%; height: 100%; overflow: hidden; \
font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; }
.container { position: relative; width: 100%; height: 100vh; box-sizing: border-box; }
.box { position: absolute; box-sizing: border-box; overflow: hidden; }
";

const CLIPPED_CONTAINER_CSS: &str = ".container { overflow: hidden; }\n";

const RESPONSIVE_TYPE_CSS: &str = "\
.box img { max-width: 100%; height: auto; }
.box p, .box span:not(.sidebar-text) { font-size: max(16px, 1.2vw); line-height: 1.4; }
.box button { font-size: max(14px, 1.0vw); padding: max(6px, 0.4vw) max(12px, 0.8vw); }
.box input { font-size: max(16px, 1.2vw); padding: max(6px, 0.4vw) max(12px, 0.8vw); }
.box svg { width: max(20px, 1.5vw); height: max(20px, 1.5vw); }
";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    TopLeft,
    Center,
}

/// How one demo's markup should be framed and scaled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreviewProfile {
    pub name: &'static str,
    pub scale: f32,
    pub origin: Origin,
    /// Minimum frame height in pixels
    pub min_height: Option<f32>,
    /// Attribute marking the injected style block, so it is added only once
    pub marker: &'static str,
    clip_container: bool,
    responsive_type: bool,
}

impl PreviewProfile {
    pub fn for_demo(demo_id: Option<&str>) -> Self {
        match demo_id {
            Some("instagram") => Self {
                name: "instagram",
                scale: 1.0,
                origin: Origin::Center,
                min_height: None,
                marker: "data-instagram-responsive",
                clip_container: true,
                responsive_type: false,
            },
            Some("design") => Self {
                name: "design",
                scale: 1.0,
                origin: Origin::TopLeft,
                min_height: None,
                marker: "data-design-responsive",
                clip_container: true,
                responsive_type: false,
            },
            Some("linkedin") => Self {
                name: "linkedin",
                scale: 1.01,
                origin: Origin::Center,
                min_height: None,
                marker: "data-linkedin-responsive",
                clip_container: true,
                responsive_type: false,
            },
            _ => Self {
                name: "default",
                scale: 1.1,
                origin: Origin::TopLeft,
                min_height: Some(800.0),
                marker: "data-responsive-scale",
                clip_container: false,
                responsive_type: true,
            },
        }
    }

    /// One-line description for the preview header.
    pub fn summary(&self) -> String {
        let mut info = format!("{} · scale {:.2} · {:?}", self.name, self.scale, self.origin);
        if let Some(min_height) = self.min_height {
            info.push_str(&format!(" · min height {min_height}px"));
        }
        info
    }

    pub fn css(&self) -> String {
        let mut css = String::from(BASE_CSS);
        if self.clip_container {
            css.push_str(CLIPPED_CONTAINER_CSS);
        }
        if self.responsive_type {
            css.push_str(RESPONSIVE_TYPE_CSS);
        }
        css
    }

    /// Add this profile's style block to the document head unless it is already there.
    pub fn inject_styles(&self, html: &str) -> String {
        if html.contains(self.marker) {
            return html.to_string();
        }
        let block = format!("<style {}>\n{}</style>", self.marker, self.css());
        match find_ascii_ci(html, "</head>") {
            Some(at) => {
                let mut out = String::with_capacity(html.len() + block.len());
                out.push_str(&html[..at]);
                out.push_str(&block);
                out.push_str(&html[at..]);
                out
            }
            None => format!("{block}{html}"),
        }
    }
}

fn find_ascii_ci(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .as_bytes()
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle.as_bytes()))
}
