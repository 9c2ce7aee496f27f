//! # docsnap Library
//!
//! This crate snapshots a codebase's reference material into Markdown:
//! each document is a title, a table of contents, and the verbatim content
//! of every listed file grouped under named sections.
//!
//! ## Usage
//!
//! ### To assemble a single document:
//!
//! ```rust,no_run
//! use docsnap::{Assembler, Section};
//!
//! let sections = vec![
//!     Section::new("Models", ["Models/Alarm.swift"]),
//!     Section::new("Views", ["Views/ContentView.swift"]),
//! ];
//! let document = Assembler::new("AlarmApp Codebase", "alarmAppNew")
//!     .assemble("CORE", &sections)?;
//!
//! for failure in &document.failures {
//!     eprintln!("{}: {}", failure.path.display(), failure.reason);
//! }
//! # Ok::<(), docsnap::ConfigError>(())
//! ```
//!
//! ### To generate every document in a manifest:
//!
//! ```rust,no_run
//! use docsnap::{Config, run_docsnap};
//! use std::path::PathBuf;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config {
//!         manifest_path: PathBuf::from("docsnap.toml"),
//!         output_dir: None,
//!         base_path: None,
//!         only: Vec::new(),
//!         verbosity: 0,
//!     };
//!
//!     let reports = run_docsnap(config).await?;
//!     println!("{} documents written", reports.len());
//!     Ok(())
//! }
//! ```

pub mod assembler;
pub mod cli;
pub mod error;
pub mod manifest;
pub mod source;
pub mod utils;
pub mod writer;

pub use assembler::{Assembler, Document, FileFailure, Section};
pub use cli::Config;
pub use error::ConfigError;
pub use manifest::Manifest;
pub use source::{ReadFailure, ResolvedFile};
pub use writer::DocumentWriter;

use anyhow::{Context, Result};
use log::info;
use std::path::PathBuf;

/// Outcome of writing one document.
#[derive(Debug, Clone)]
pub struct Report {
    pub title: String,
    pub output_path: PathBuf,
    pub bytes: u64,
    pub file_count: usize,
    pub failures: Vec<FileFailure>,
}

/// Generates every document the manifest declares.
///
/// All documents are assembled and all outputs opened before the first one
/// is written, so a configuration error or an unopenable output never leaves
/// partial output behind.
pub async fn run_docsnap(config: Config) -> Result<Vec<Report>> {
    let mut manifest = Manifest::load(&config.manifest_path)
        .with_context(|| format!("Failed to load {}", config.manifest_path.display()))?;

    if let Some(base_path) = config.base_path {
        manifest.base_path = base_path;
    }
    if let Some(output_dir) = config.output_dir {
        manifest.output_dir = Some(output_dir);
    }
    manifest.select(&config.only)?;

    let mut assembled = Vec::with_capacity(manifest.documents.len());
    for doc in &manifest.documents {
        info!("Assembling: {}", doc.title);
        let document = manifest
            .assembler_for(doc)
            .assemble(&doc.title, &doc.sections())
            .with_context(|| format!("Failed to assemble '{}'", doc.title))?;
        assembled.push((doc, document));
    }

    // Every sink must open before anything is written.
    let mut staged = Vec::with_capacity(assembled.len());
    for (doc, document) in assembled {
        let writer = DocumentWriter::create(&manifest.output_path(doc)).await?;
        staged.push((doc, document, writer));
    }

    let mut reports = Vec::with_capacity(staged.len());
    for (doc, document, writer) in staged {
        let output_path = writer.path().to_path_buf();
        let bytes = writer.write_document(&document).await?;

        info!("Generated: {}", output_path.display());

        reports.push(Report {
            title: doc.title.clone(),
            output_path,
            bytes,
            file_count: document.file_count,
            failures: document.failures,
        });
    }

    Ok(reports)
}
