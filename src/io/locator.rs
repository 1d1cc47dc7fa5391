use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{TranscriptError, TranscriptResult};

/// Maps an (entity, period) key to the transcript file on disk
///
/// Files are named `<slug>_<period>.<extension>` under `root`, where the slug
/// comes from the alias table or is the lower-cased entity.
#[derive(Debug, Clone)]
pub struct DocumentLocator {
    pub root: PathBuf,
    pub extension: String,
    pub aliases: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct AliasFile {
    #[serde(default)]
    aliases: HashMap<String, String>,
}

impl DocumentLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let aliases = [("HDFCBANK.NS", "hdfc"), ("TITAN.NS", "titan")]
            .into_iter()
            .map(|(entity, slug)| (entity.to_string(), slug.to_string()))
            .collect();

        Self {
            root: root.into(),
            extension: "pdf".to_string(),
            aliases,
        }
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Add aliases from a JSON file of the form `{"aliases": {"ENTITY": "slug"}}`
    pub fn with_alias_file(mut self, path: &Path) -> TranscriptResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| TranscriptError::not_found(path, e.to_string()))?;
        let file: AliasFile = serde_json::from_str(&content)?;
        self.aliases.extend(
            file.aliases
                .into_iter()
                .map(|(entity, slug)| (entity.to_uppercase(), slug)),
        );
        Ok(self)
    }

    pub fn slug(&self, entity: &str) -> String {
        self.aliases
            .get(entity)
            .cloned()
            .unwrap_or_else(|| entity.to_lowercase())
    }

    pub fn resolve(&self, entity: &str, period: &str) -> PathBuf {
        self.root
            .join(format!("{}_{}.{}", self.slug(entity), period, self.extension))
    }
}
