//! User settings stored as settings.json in the app data directory

use crate::constants::DEFAULT_DIRECTORY_URL;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Window geometry
    pub window_x: Option<f32>,
    pub window_y: Option<f32>,
    pub window_w: Option<f32>,
    pub window_h: Option<f32>,

    // Directory service endpoint; None means the built-in default
    pub directory_url: Option<String>,

    // Subscribed references, in the order they were added
    pub subscriptions: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            window_x: None,
            window_y: None,
            window_w: None,
            window_h: None,
            directory_url: None,
            subscriptions: Vec::new(),
        }
    }
}

impl Settings {
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join("settings.json");
        match std::fs::read_to_string(&path) {
            Ok(s) => match serde_json::from_str(&s) {
                Ok(settings) => {
                    debug!(path = %path.display(), "Settings loaded");
                    settings
                }
                Err(e) => {
                    warn!(error = %e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(_) => {
                debug!("No settings file found, using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, data_dir: &Path) {
        let path = data_dir.join("settings.json");
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&path, json) {
                    warn!(error = %e, "Failed to save settings");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize settings"),
        }
    }

    pub fn directory_url_or_default(&self) -> String {
        self.directory_url
            .clone()
            .unwrap_or_else(|| DEFAULT_DIRECTORY_URL.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load(dir.path());
        assert!(settings.subscriptions.is_empty());
        assert_eq!(settings.directory_url_or_default(), DEFAULT_DIRECTORY_URL);
    }

    #[test]
    fn unparsable_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{not json").unwrap();
        let settings = Settings::load(dir.path());
        assert!(settings.subscriptions.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            window_w: Some(420.0),
            directory_url: Some("http://127.0.0.1:9001".into()),
            subscriptions: vec!["ref-a".into(), "ref-b".into()],
            ..Settings::default()
        };
        settings.save(dir.path());

        let loaded = Settings::load(dir.path());
        assert_eq!(loaded.window_w, Some(420.0));
        assert_eq!(loaded.directory_url.as_deref(), Some("http://127.0.0.1:9001"));
        assert_eq!(loaded.subscriptions, ["ref-a", "ref-b"]);
    }
}
