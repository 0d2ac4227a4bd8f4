use log::LevelFilter;
use nhl_api::client::NHL_STATSAPI;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Settings {
    /// Holds `playoffs_template.png`, `seguibl.ttf` and `NHL_logos/`.
    pub static_dir: PathBuf,
    pub output_dir: PathBuf,
    pub environment: String,
    pub log_level: Option<LevelFilter>,
    pub api_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("static"),
            output_dir: PathBuf::from("."),
            environment: "production".to_owned(),
            log_level: None,
            api_url: NHL_STATSAPI.to_owned(),
        }
    }
}

impl Settings {
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            static_dir: get("PUCKBOT_STATIC_DIR").map(PathBuf::from).unwrap_or(defaults.static_dir),
            output_dir: get("PUCKBOT_OUTPUT_DIR").map(PathBuf::from).unwrap_or(defaults.output_dir),
            environment: get("PUCKBOT_ENVIRONMENT").unwrap_or(defaults.environment),
            log_level: get("PUCKBOT_LOG").and_then(|v| LevelFilter::from_str(v.trim()).ok()),
            api_url: get("PUCKBOT_API_URL").unwrap_or(defaults.api_url),
        }
    }

    pub fn is_local(&self) -> bool {
        self.environment.eq_ignore_ascii_case("local")
    }

    pub fn template_path(&self) -> PathBuf {
        self.static_dir.join("playoffs_template.png")
    }

    pub fn font_path(&self) -> PathBuf {
        self.static_dir.join("seguibl.ttf")
    }

    pub fn logo_dir(&self) -> PathBuf {
        self.static_dir.join("NHL_logos")
    }
}
