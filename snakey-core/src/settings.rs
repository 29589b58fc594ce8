//! Persistent settings for the pet.
//!
//! Settings live in a small JSON document. A missing file is replaced by
//! the defaults and a file that is not a JSON object is ignored in favour
//! of the defaults. Otherwise each known key is read on its own: keys that
//! are missing or hold a value of the wrong type fall back to their
//! default while the rest of the document is kept. Keys this version does
//! not know about are written back untouched.

use crate::error::{Error, Result};
use serde::de::{DeserializeOwned, Error as _};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

/// Value of `PLAYED_BEFORE` before the user has introduced themselves.
pub const NOT_PLAYED: &str = "no";

/// Value of `PLAYED_BEFORE` once the user's name is known.
pub const PLAYED: &str = "yes";

/// The settings document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Settings {
    /// Image shown while idle.
    pub image: Option<PathBuf>,

    /// Image shown while moving.
    pub image_moving: Option<PathBuf>,

    /// Whether the pet talks at all.
    pub speech_enabled: bool,

    /// Things the pet has learned about its user.
    pub user_data: Map<String, Value>,

    /// `"no"` until the first-launch introduction is finished.
    #[serde(rename = "PLAYED_BEFORE")]
    pub played_before: String,

    /// Keys written by other versions.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            image: None,
            image_moving: None,
            speech_enabled: true,
            user_data: Map::new(),
            played_before: NOT_PLAYED.to_string(),
            extra: Map::new(),
        }
    }
}

/// Take `key` out of `map`, or `default` if it is missing or invalid.
fn take_key<T: DeserializeOwned>(map: &mut Map<String, Value>, key: &str, default: T) -> T {
    let Some(value) = map.remove(key) else {
        debug!(key, "settings key missing, using default");
        return default;
    };
    match serde_json::from_value(value) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, "invalid settings value, using default: {}", e);
            default
        }
    }
}

impl Settings {
    /// Build settings from a parsed document, back-filling bad or missing keys.
    pub fn from_map(mut map: Map<String, Value>) -> Self {
        let defaults = Settings::default();
        Self {
            image: take_key(&mut map, "image", defaults.image),
            image_moving: take_key(&mut map, "image_moving", defaults.image_moving),
            speech_enabled: take_key(&mut map, "speech_enabled", defaults.speech_enabled),
            user_data: take_key(&mut map, "user_data", defaults.user_data),
            played_before: take_key(&mut map, "PLAYED_BEFORE", defaults.played_before),
            extra: map,
        }
    }

    /// Parse a settings document.
    ///
    /// Fails only if `content` is not a JSON object.
    pub fn from_json(content: &str) -> serde_json::Result<Self> {
        match serde_json::from_str(content)? {
            Value::Object(map) => Ok(Self::from_map(map)),
            other => Err(serde_json::Error::custom(format!(
                "expected a JSON object, found {}",
                other
            ))),
        }
    }

    /// Whether the first-launch introduction has been completed.
    pub fn has_played_before(&self) -> bool {
        self.played_before != NOT_PLAYED
    }

    /// The user's name, if they gave one.
    pub fn user_name(&self) -> Option<&str> {
        self.user_data.get("name").and_then(Value::as_str)
    }

    /// Remember the user's name and mark the introduction as done.
    pub fn set_user_name(&mut self, name: impl Into<String>) {
        self.user_data
            .insert("name".to_string(), Value::String(name.into()));
        self.played_before = PLAYED.to_string();
    }

    /// Serialize with four-space indentation and a stable key order.
    pub fn to_json(&self) -> serde_json::Result<Vec<u8>> {
        let mut out = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
        self.serialize(&mut ser)?;
        Ok(out)
    }
}

/// Reads and writes the settings file.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    /// Create a store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The settings file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load settings, falling back to the defaults.
    ///
    /// Writes the defaults first when the file does not exist. Read or
    /// parse failures are logged and the defaults are returned.
    pub fn load(&self) -> Settings {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "settings file missing, writing defaults");
            if let Err(e) = self.save(&Settings::default()) {
                error!("Failed to save settings: {}", e);
            }
        }

        match self.try_load() {
            Ok(settings) => settings,
            Err(e) => {
                error!("Failed to load settings: {}", e);
                Settings::default()
            }
        }
    }

    /// Load settings without any fallback.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON object.
    pub fn try_load(&self) -> Result<Settings> {
        let content = std::fs::read_to_string(&self.path).map_err(|source| {
            Error::SettingsReadError {
                path: self.path.clone(),
                source,
            }
        })?;

        Settings::from_json(&content).map_err(|source| Error::SettingsParseError {
            path: self.path.clone(),
            source,
        })
    }

    /// Write the settings document, creating the parent directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, settings: &Settings) -> Result<()> {
        let content = settings
            .to_json()
            .map_err(|source| Error::SettingsParseError {
                path: self.path.clone(),
                source,
            })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| Error::SettingsWriteError {
                path: self.path.clone(),
                source,
            })?;
        }

        std::fs::write(&self.path, content).map_err(|source| Error::SettingsWriteError {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(name: &str) -> SettingsStore {
        let dir = std::env::temp_dir().join(format!("snakey_settings_{}_{}", name, std::process::id()));
        std::fs::remove_dir_all(&dir).ok();
        SettingsStore::new(dir.join("SnakeyData.json"))
    }

    fn cleanup(store: &SettingsStore) {
        if let Some(dir) = store.path().parent() {
            std::fs::remove_dir_all(dir).ok();
        }
    }

    #[test]
    fn test_default_document() {
        let json = String::from_utf8(Settings::default().to_json().unwrap()).unwrap();
        let expected = "{\n    \"image\": null,\n    \"image_moving\": null,\n    \"speech_enabled\": true,\n    \"user_data\": {},\n    \"PLAYED_BEFORE\": \"no\"\n}";
        assert_eq!(json, expected);
    }

    #[test]
    fn test_missing_file_writes_defaults() {
        let store = temp_store("missing");
        assert!(!store.path().exists());

        let settings = store.load();
        assert_eq!(settings, Settings::default());
        assert!(!settings.has_played_before());
        assert!(store.path().exists());

        cleanup(&store);
    }

    #[test]
    fn test_corrupt_file_falls_back_to_defaults() {
        let store = temp_store("corrupt");
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{ this is not json").unwrap();

        assert!(matches!(
            store.try_load(),
            Err(Error::SettingsParseError { .. })
        ));
        assert_eq!(store.load(), Settings::default());

        cleanup(&store);
    }

    #[test]
    fn test_missing_keys_are_back_filled() {
        let store = temp_store("backfill");
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(
            store.path(),
            r#"{"PLAYED_BEFORE": "yes", "user_data": {"name": "Ada"}}"#,
        )
        .unwrap();

        let settings = store.load();
        assert!(settings.has_played_before());
        assert_eq!(settings.user_name(), Some("Ada"));
        assert!(settings.speech_enabled);
        assert_eq!(settings.image, None);

        cleanup(&store);
    }

    #[test]
    fn test_wrongly_typed_key_keeps_the_rest() {
        let store = temp_store("wrong_type");
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(
            store.path(),
            r#"{"PLAYED_BEFORE": "yes", "user_data": {"name": "Ada"}, "speech_enabled": 1}"#,
        )
        .unwrap();

        let settings = store.load();
        assert!(settings.has_played_before());
        assert_eq!(settings.user_name(), Some("Ada"));
        assert!(settings.speech_enabled);

        // saving repairs the bad key without losing the name
        store.save(&settings).unwrap();
        let reloaded = store.try_load().unwrap();
        assert_eq!(reloaded.user_name(), Some("Ada"));
        assert_eq!(reloaded, settings);

        cleanup(&store);
    }

    #[test]
    fn test_non_object_document_is_rejected() {
        assert!(Settings::from_json("[1, 2, 3]").is_err());
        assert!(Settings::from_json("\"yes\"").is_err());
        assert_eq!(Settings::from_json("{}").unwrap(), Settings::default());
    }

    #[test]
    fn test_unknown_keys_survive_save() {
        let store = temp_store("unknown");
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), r#"{"favourite_food": "mice"}"#).unwrap();

        let settings = store.load();
        assert_eq!(settings.extra.get("favourite_food"), Some(&Value::from("mice")));

        store.save(&settings).unwrap();
        let reloaded = store.try_load().unwrap();
        assert_eq!(reloaded.extra.get("favourite_food"), Some(&Value::from("mice")));

        cleanup(&store);
    }

    #[test]
    fn test_save_load_is_byte_stable() {
        let store = temp_store("stable");
        let mut settings = Settings::default();
        settings.image = Some(PathBuf::from("/pics/snake.png"));
        settings.set_user_name("Grace");
        store.save(&settings).unwrap();
        let first = std::fs::read(store.path()).unwrap();

        store.save(&store.load()).unwrap();
        let second = std::fs::read(store.path()).unwrap();
        assert_eq!(first, second);

        cleanup(&store);
    }

    #[test]
    fn test_set_user_name_marks_played() {
        let mut settings = Settings::default();
        assert_eq!(settings.user_name(), None);
        settings.set_user_name("Linus");
        assert_eq!(settings.user_name(), Some("Linus"));
        assert_eq!(settings.played_before, PLAYED);
    }
}
