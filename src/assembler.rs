//! Document assembly.
//!
//! Turns an ordered list of [`Section`]s into one Markdown [`Document`]:
//!
//! - a title block with the generation time
//! - a table of contents linking every section by its anchor slug
//! - one heading per section, followed by one fenced block per file
//!
//! Unreadable files never abort assembly. They are rendered as placeholder
//! blocks and collected in [`Document::failures`].

use crate::error::ConfigError;
use crate::source::{ReadFailure, ResolvedFile, resolve};
use crate::utils::{calculate_fence, get_language_tag, slugify};
use chrono::{DateTime, Local};
use log::{debug, warn};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A named, ordered group of file references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub files: Vec<String>,
}

impl Section {
    pub fn new(name: impl Into<String>, files: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            files: files.into_iter().map(Into::into).collect(),
        }
    }

    /// Anchor shared by the table of contents link and the section heading.
    pub fn anchor(&self) -> String {
        slugify(&self.name)
    }
}

/// A file that could not be embedded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub section: String,
    pub path: PathBuf,
    pub reason: ReadFailure,
}

/// A fully rendered document.
#[derive(Debug, Clone)]
pub struct Document {
    pub text: String,
    pub file_count: usize,
    pub failures: Vec<FileFailure>,
}

impl Document {
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Renders documents for one codebase.
///
/// `context` names the codebase in every title heading and `base_path` is
/// joined to every file reference. Without a language override each block is
/// tagged from its file's extension.
#[derive(Debug, Clone)]
pub struct Assembler {
    context: String,
    base_path: PathBuf,
    language: Option<String>,
}

impl Assembler {
    pub fn new(context: impl Into<String>, base_path: impl Into<PathBuf>) -> Self {
        Self {
            context: context.into(),
            base_path: base_path.into(),
            language: None,
        }
    }

    /// Tags every fenced block with `language` instead of guessing per file.
    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language.filter(|l| !l.trim().is_empty());
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Assembles a document stamped with the current local time.
    pub fn assemble(&self, title: &str, sections: &[Section]) -> Result<Document, ConfigError> {
        self.assemble_at(title, sections, Local::now())
    }

    /// Assembles a document stamped with `generated_at`.
    pub fn assemble_at(
        &self,
        title: &str,
        sections: &[Section],
        generated_at: DateTime<Local>,
    ) -> Result<Document, ConfigError> {
        if title.trim().is_empty() {
            return Err(ConfigError::EmptyTitle);
        }
        if sections.is_empty() {
            return Err(ConfigError::EmptySections {
                title: title.to_string(),
            });
        }

        let mut text = String::new();
        let _ = write!(
            text,
            "# {} - {}\n> Generated: {}\n\n",
            self.context,
            title,
            generated_at.format(TIMESTAMP_FORMAT)
        );

        write_toc(&mut text, sections);
        text.push_str("\n---\n\n");

        let mut file_count = 0;
        let mut failures = Vec::new();

        for (idx, section) in sections.iter().enumerate() {
            let _ = write!(
                text,
                "<a id=\"{}\"></a>\n\n## {}. {}\n\n",
                section.anchor(),
                idx + 1,
                section.name
            );

            for file_ref in &section.files {
                let resolved = resolve(&self.base_path.join(file_ref));
                self.write_file_block(&mut text, &resolved);
                file_count += 1;

                if let Err(reason) = resolved.outcome {
                    warn!("{}: {}", resolved.path.display(), reason);
                    failures.push(FileFailure {
                        section: section.name.clone(),
                        path: resolved.path,
                        reason,
                    });
                }
            }
        }

        debug!(
            "Assembled '{}': {} sections, {} files, {} unreadable",
            title,
            sections.len(),
            file_count,
            failures.len()
        );

        Ok(Document {
            text,
            file_count,
            failures,
        })
    }

    fn write_file_block(&self, out: &mut String, resolved: &ResolvedFile) {
        let body = match &resolved.outcome {
            Ok(content) => content.clone(),
            Err(reason) => reason.placeholder(&resolved.path),
        };
        let lang = self
            .language
            .as_deref()
            .unwrap_or_else(|| get_language_tag(&resolved.path));
        let fence = calculate_fence(&body);

        let _ = write!(
            out,
            "### {}\n{fence}{lang}\n{body}\n{fence}\n\n---\n\n",
            resolved.path.display()
        );
    }
}

fn write_toc(out: &mut String, sections: &[Section]) {
    out.push_str("## Table of Contents\n\n");
    for (idx, section) in sections.iter().enumerate() {
        let _ = writeln!(out, "{}. [{}](#{})", idx + 1, section.name, section.anchor());
        for file_ref in &section.files {
            let _ = writeln!(out, "   - {}", file_name(file_ref));
        }
    }
}

fn file_name(file_ref: &str) -> String {
    Path::new(file_ref)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_ref.to_string())
}
