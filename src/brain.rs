//! Authored knowledge on disk.
//!
//! A brain file is JSON with three optional sections:
//!
//! ```json
//! {
//!   "options": { "fallback_template": "Sorry?" },
//!   "substitutions": [ { "name": "what's", "value": "what is" } ],
//!   "categories": [ { "pattern": "HI", "template": "Hello!" } ]
//! }
//! ```
//!
//! Substitutions keep their file order, which is the order they are applied
//! in. Entries with a missing or null `name`/`value` are skipped.

use crate::api::{Engine, EngineBuilder, Options};
use crate::engine::SettingsDictionary;
use crate::{Category, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Brain {
    pub options: Options,
    pub substitutions: Vec<SubstitutionEntry>,
    pub categories: Vec<CategoryEntry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SubstitutionEntry {
    pub name: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryEntry {
    pub pattern: String,
    pub template: String,
}

impl Brain {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let brain = Self::from_json(&json)?;
        tracing::debug!(
            path = %path.display(),
            categories = brain.categories.len(),
            substitutions = brain.substitutions.len(),
            "brain file loaded"
        );
        Ok(brain)
    }

    /// Ordered dictionary built from the substitution section.
    pub fn dictionary(&self) -> SettingsDictionary {
        let mut dict = SettingsDictionary::new();
        for (idx, entry) in self.substitutions.iter().enumerate() {
            match (&entry.name, &entry.value) {
                (Some(name), Some(value)) => {
                    dict.insert(name, value);
                }
                _ => tracing::warn!(index = idx, "skipping substitution with a missing name or value"),
            }
        }
        dict
    }

    pub fn into_builder(self) -> EngineBuilder {
        let dictionary = self.dictionary();
        let categories = self.categories.into_iter().map(|c| Category::new(c.pattern, c.template));
        Engine::builder().options(self.options).substitutions(dictionary).categories(categories)
    }

    pub fn into_engine(self) -> Result<Engine> {
        self.into_builder().build()
    }
}
