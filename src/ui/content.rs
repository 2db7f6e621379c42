//! Label and long-form copy for each body
//!
//! Built-in copy ships in `assets/content.json`. A `content.json` in the
//! platform config directory overrides individual entries.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::bodies::BodyId;
use crate::config::SceneConfig;

const BUILTIN_CONTENT: &str = include_str!("../../assets/content.json");
const CONTENT_FILE: &str = "content.json";
const PLACEHOLDER_BODY: &str = "No details are available for this object yet.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyContent {
    pub label: String,
    pub body: String,
}

impl BodyContent {
    fn placeholder(id: BodyId) -> Self {
        let key = id.key();
        let mut label = String::with_capacity(key.len());
        let mut chars = key.chars();
        if let Some(first) = chars.next() {
            label.extend(first.to_uppercase());
            label.push_str(chars.as_str());
        }
        Self {
            label,
            body: PLACEHOLDER_BODY.to_string(),
        }
    }
}

/// Content lookup by body identity.
#[derive(Resource, Debug, Default)]
pub struct ContentLibrary {
    entries: HashMap<BodyId, BodyContent>,
}

impl ContentLibrary {
    /// Parse a JSON object keyed by body id. Unknown keys are skipped.
    pub fn from_json(json: &str) -> Result<Self, anyhow::Error> {
        let raw: HashMap<String, BodyContent> = serde_json::from_str(json)?;
        let mut entries = HashMap::new();
        for (key, content) in raw {
            match BodyId::ALL.iter().find(|id| id.key() == key) {
                Some(id) => {
                    entries.insert(*id, content);
                }
                None => warn!("Ignoring content for unknown body '{}'", key),
            }
        }
        Ok(Self { entries })
    }

    pub fn builtin() -> Result<Self, anyhow::Error> {
        Self::from_json(BUILTIN_CONTENT)
    }

    /// Read an override file. Returns Ok(None) if it doesn't exist.
    pub fn read_overrides(path: &Path) -> Result<Option<Self>, anyhow::Error> {
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents).map(Some)
    }

    pub fn merge(&mut self, other: ContentLibrary) {
        self.entries.extend(other.entries);
    }

    /// Content for a body; missing entries get a placeholder.
    pub fn lookup(&self, id: BodyId) -> BodyContent {
        self.entries
            .get(&id)
            .cloned()
            .unwrap_or_else(|| BodyContent::placeholder(id))
    }

    /// Built-in copy plus user overrides, absorbing any load failure.
    pub fn load_or_default() -> Self {
        let mut library = Self::builtin().unwrap_or_else(|err| {
            warn!("Built-in content unreadable: {err:#}");
            Self::default()
        });

        let overrides = SceneConfig::config_dir()
            .and_then(|dir| Self::read_overrides(&dir.join(CONTENT_FILE)));
        match overrides {
            Ok(Some(user)) => {
                info!("Loaded {} content overrides", user.entries.len());
                library.merge(user);
            }
            Ok(None) => {}
            Err(err) => warn!("Ignoring content overrides: {err:#}"),
        }
        library
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_covers_every_body() {
        let library = ContentLibrary::builtin().unwrap();
        for id in BodyId::ALL {
            let content = library.lookup(id);
            assert!(!content.label.is_empty());
            assert_ne!(content.body, PLACEHOLDER_BODY);
        }
    }

    #[test]
    fn test_missing_entry_gets_placeholder() {
        let library = ContentLibrary::from_json(
            r#"{ "moon": { "label": "Luna", "body": "Grey and dusty." } }"#,
        )
        .unwrap();
        assert_eq!(library.lookup(BodyId::Moon).label, "Luna");

        let missing = library.lookup(BodyId::Shuttle);
        assert_eq!(missing.label, "Shuttle");
        assert_eq!(missing.body, PLACEHOLDER_BODY);
    }

    #[test]
    fn test_unknown_keys_are_skipped() {
        let library = ContentLibrary::from_json(
            r#"{ "comet": { "label": "Comet", "body": "Icy." } }"#,
        )
        .unwrap();
        assert_eq!(library.lookup(BodyId::Satellite).body, PLACEHOLDER_BODY);
    }

    #[test]
    fn test_overrides_replace_single_entries() {
        let mut library = ContentLibrary::builtin().unwrap();
        let builtin_moon = library.lookup(BodyId::Moon);
        let user = ContentLibrary::from_json(
            r#"{ "satellite": { "label": "Relay-7", "body": "Custom copy." } }"#,
        )
        .unwrap();
        library.merge(user);

        assert_eq!(library.lookup(BodyId::Satellite).label, "Relay-7");
        assert_eq!(library.lookup(BodyId::Moon), builtin_moon);
    }

    #[test]
    fn test_malformed_json_is_an_error() {
        assert!(ContentLibrary::from_json("[1, 2").is_err());
    }
}
