//! Fatal errors.
//!
//! Anything in here aborts a run before output is written. Per-file read
//! problems are not errors; see [`crate::source::ReadFailure`].

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read manifest {path}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse manifest {path}: {reason}")]
    ManifestParse { path: PathBuf, reason: String },

    #[error("manifest declares no documents")]
    NoDocuments,

    #[error("document title must not be empty")]
    EmptyTitle,

    #[error("document '{title}' has no output file name")]
    EmptyOutput { title: String },

    #[error("document '{title}' declares no sections")]
    EmptySections { title: String },

    #[error("document '{title}' has a section without a name")]
    EmptySectionName { title: String },

    #[error("output '{output}' is used by more than one document")]
    DuplicateOutput { output: String },

    #[error("no document titled '{title}' in manifest")]
    UnknownDocument { title: String },

    #[error("cannot write output {path}: {source}")]
    Sink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
