use serde_json::{json, Value};

/// Section of the site a widget is embedded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageContext {
    General,
    Services,
    About,
    Contact,
    Resources,
}

impl PageContext {
    pub fn from_path(path: &str) -> Self {
        if path.contains("/resources") {
            PageContext::Resources
        } else if path.contains("/contact") {
            PageContext::Contact
        } else if path.contains("/services") {
            PageContext::Services
        } else if path.contains("/about") {
            PageContext::About
        } else {
            PageContext::General
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PageContext::General => "general",
            PageContext::Services => "services",
            PageContext::About => "about",
            PageContext::Contact => "contact",
            PageContext::Resources => "resources",
        }
    }

    /// Value sent as the chat request's `context`.
    pub fn to_value(self) -> Value {
        json!({ "page": self.as_str() })
    }
}

/// French unless the path is under `/en`.
pub fn locale_from_path(path: &str) -> &'static str {
    if path.starts_with("/en") {
        "en"
    } else {
        "fr"
    }
}
