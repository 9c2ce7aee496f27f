//! Manifest loading and validation.
//!
//! A manifest is a TOML file naming the codebase, where its files live, and
//! the documents to generate from it:
//!
//! ```toml
//! context = "AlarmApp Codebase"
//! base_path = "alarmAppNew"
//! language = "swift"
//!
//! [[documents]]
//! title = "CORE"
//! output = "CODEBASE_CORE.md"
//!
//! [[documents.sections]]
//! name = "App Entry"
//! files = ["alarmAppNewApp.swift"]
//! ```
//!
//! Relative `base_path` and `output_dir` values are resolved against the
//! directory containing the manifest.

use crate::assembler::{Assembler, Section};
use crate::error::ConfigError;
use log::debug;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const DEFAULT_MANIFEST: &str = "docsnap.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    /// Name shown before every document title
    pub context: String,

    /// Directory every file reference is relative to
    pub base_path: PathBuf,

    /// Directory the documents are written to
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Fence language used when a document does not set its own
    #[serde(default)]
    pub language: Option<String>,

    #[serde(default)]
    pub documents: Vec<DocumentConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DocumentConfig {
    pub title: String,

    /// Output file name, relative to the output directory
    pub output: String,

    #[serde(default)]
    pub language: Option<String>,

    #[serde(default)]
    pub sections: Vec<SectionConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionConfig {
    pub name: String,

    #[serde(default)]
    pub files: Vec<String>,
}

impl From<&SectionConfig> for Section {
    fn from(cfg: &SectionConfig) -> Self {
        Section::new(cfg.name.clone(), cfg.files.iter().cloned())
    }
}

impl DocumentConfig {
    pub fn sections(&self) -> Vec<Section> {
        self.sections.iter().map(Section::from).collect()
    }
}

impl Manifest {
    /// Loads, resolves and validates the manifest at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;

        let mut manifest = Self::parse(&content).map_err(|e| match e {
            ConfigError::ManifestParse { reason, .. } => ConfigError::ManifestParse {
                path: path.to_path_buf(),
                reason,
            },
            other => other,
        })?;

        let root = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        manifest.resolve_paths(root);

        debug!(
            "Loaded manifest {}: {} documents, base path {}",
            path.display(),
            manifest.documents.len(),
            manifest.base_path.display()
        );
        Ok(manifest)
    }

    /// Parses and validates manifest text. Paths are left as written.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let manifest: Self = toml::from_str(content).map_err(|e| ConfigError::ManifestParse {
            path: PathBuf::new(),
            reason: e.to_string(),
        })?;
        manifest.validate()?;
        Ok(manifest)
    }

    fn resolve_paths(&mut self, root: &Path) {
        if self.base_path.is_relative() {
            self.base_path = root.join(&self.base_path);
        }
        self.output_dir = Some(match self.output_dir.take() {
            Some(dir) if dir.is_relative() => root.join(dir),
            Some(dir) => dir,
            None => root.to_path_buf(),
        });
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.documents.is_empty() {
            return Err(ConfigError::NoDocuments);
        }

        let mut outputs = HashSet::new();
        for doc in &self.documents {
            if doc.title.trim().is_empty() {
                return Err(ConfigError::EmptyTitle);
            }
            if doc.output.trim().is_empty() {
                return Err(ConfigError::EmptyOutput {
                    title: doc.title.clone(),
                });
            }
            if doc.sections.is_empty() {
                return Err(ConfigError::EmptySections {
                    title: doc.title.clone(),
                });
            }
            if doc.sections.iter().any(|s| s.name.trim().is_empty()) {
                return Err(ConfigError::EmptySectionName {
                    title: doc.title.clone(),
                });
            }
            if !outputs.insert(doc.output.trim()) {
                return Err(ConfigError::DuplicateOutput {
                    output: doc.output.clone(),
                });
            }
        }
        Ok(())
    }

    /// Keeps only the documents whose titles appear in `titles`
    /// (case-insensitive). An empty set keeps everything.
    pub fn select(&mut self, titles: &[String]) -> Result<(), ConfigError> {
        if titles.is_empty() {
            return Ok(());
        }
        for wanted in titles {
            if !self
                .documents
                .iter()
                .any(|d| d.title.eq_ignore_ascii_case(wanted))
            {
                return Err(ConfigError::UnknownDocument {
                    title: wanted.clone(),
                });
            }
        }
        self.documents
            .retain(|d| titles.iter().any(|t| d.title.eq_ignore_ascii_case(t)));
        Ok(())
    }

    pub fn output_dir(&self) -> &Path {
        self.output_dir.as_deref().unwrap_or_else(|| Path::new("."))
    }

    pub fn output_path(&self, doc: &DocumentConfig) -> PathBuf {
        self.output_dir().join(doc.output.trim())
    }

    /// Builds the assembler for one document, applying language defaults.
    pub fn assembler_for(&self, doc: &DocumentConfig) -> Assembler {
        Assembler::new(self.context.clone(), self.base_path.clone())
            .with_language(doc.language.clone().or_else(|| self.language.clone()))
    }
}
