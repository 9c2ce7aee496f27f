//! Reading referenced files.
//!
//! Resolution never fails: every outcome, including a missing file, comes
//! back as a [`ResolvedFile`] so the caller can render it inline.

use content_inspector::{ContentType, inspect};
use log::debug;
use memmap2::MmapOptions;
use std::fmt;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::str;

/// Why a referenced file has no content to embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadFailure {
    /// Nothing exists at the resolved path.
    NotFound,
    /// Opening or mapping the file failed.
    Io(String),
    /// The file is not valid UTF-8.
    Decode(String),
}

impl ReadFailure {
    fn from_io(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => Self::NotFound,
            _ => Self::Io(err.to_string()),
        }
    }

    /// Single-line text put in place of the file body.
    pub fn placeholder(&self, path: &Path) -> String {
        match self {
            Self::NotFound => format!("// FILE NOT FOUND: {}", path.display()),
            Self::Io(reason) | Self::Decode(reason) => {
                format!("// ERROR READING FILE: {}", one_line(reason))
            }
        }
    }
}

impl fmt::Display for ReadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::Io(reason) => write!(f, "i/o error: {reason}"),
            Self::Decode(reason) => write!(f, "invalid utf-8: {reason}"),
        }
    }
}

/// A file reference paired with what reading it produced.
#[derive(Debug)]
pub struct ResolvedFile {
    pub path: PathBuf,
    pub outcome: Result<String, ReadFailure>,
}

impl ResolvedFile {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Reads the file at `path`, classifying any failure.
pub fn resolve(path: &Path) -> ResolvedFile {
    debug!("Resolving: {}", path.display());
    ResolvedFile {
        path: path.to_path_buf(),
        outcome: read_text(path),
    }
}

fn read_text(path: &Path) -> Result<String, ReadFailure> {
    let file = File::open(path).map_err(|e| ReadFailure::from_io(&e))?;
    let metadata = file.metadata().map_err(|e| ReadFailure::from_io(&e))?;

    if metadata.is_dir() {
        return Err(ReadFailure::Io(format!("{} is a directory", path.display())));
    }

    // Zero-length files cannot be mapped.
    if metadata.len() == 0 {
        debug!("Empty file: {}", path.display());
        return Ok(String::new());
    }

    let mmap = unsafe {
        MmapOptions::new()
            .map(&file)
            .map_err(|e| ReadFailure::from_io(&e))?
    };

    str::from_utf8(&mmap).map(str::to_owned).map_err(|e| {
        // Only undecodable content is sniffed, to label the failure.
        let sample_size = std::cmp::min(8192, mmap.len());
        if inspect(&mmap[..sample_size]) == ContentType::BINARY {
            debug!("Binary content: {}", path.display());
            ReadFailure::Decode(format!("binary content, {e}"))
        } else {
            ReadFailure::Decode(e.to_string())
        }
    })
}

fn one_line(reason: &str) -> String {
    reason.lines().collect::<Vec<_>>().join(" ")
}
