use std::env;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:4001";
const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 4000;

/// Runtime settings, read once from the environment at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the upstream chat/contact backend, without trailing slash.
    pub backend_url: String,
    pub host: String,
    pub port: u16,
    pub templates_dir: String,
    pub static_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            templates_dir: "templates".to_string(),
            static_dir: "static".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        // NEXT_PUBLIC_BACKEND_URL is what older deployments still export
        let backend_url = get("BACKEND_URL")
            .or_else(|| get("NEXT_PUBLIC_BACKEND_URL"))
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or(defaults.backend_url);

        let port = get("PORT")
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(defaults.port);

        Self {
            backend_url,
            host: get("HOST").unwrap_or(defaults.host),
            port,
            templates_dir: get("TEMPLATES_DIR").unwrap_or(defaults.templates_dir),
            static_dir: get("STATIC_DIR").unwrap_or(defaults.static_dir),
        }
    }

    pub fn templates_glob(&self) -> String {
        format!("{}/**/*", self.templates_dir.trim_end_matches('/'))
    }
}
