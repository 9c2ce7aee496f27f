use crate::assembler::Document;
use crate::error::ConfigError;
use log::debug;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};

/// Persists finished documents.
///
/// The document is staged in a temporary file next to the destination and
/// renamed over it only once fully written, so the destination is either
/// left untouched or holds the complete document. Dropping a writer without
/// writing removes the staged file.
pub struct DocumentWriter {
    writer: BufWriter<File>,
    staged: TempPath,
    path: PathBuf,
}

impl DocumentWriter {
    /// Prepares `path` for writing, creating missing parent directories.
    ///
    /// Nothing is written to `path` itself until [`write_document`](Self::write_document).
    pub async fn create(path: &Path) -> Result<Self, ConfigError> {
        let sink_err = |source| ConfigError::Sink {
            path: path.to_path_buf(),
            source,
        };

        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        fs::create_dir_all(parent).await.map_err(sink_err)?;

        match fs::metadata(path).await {
            Ok(meta) if meta.is_dir() => {
                return Err(sink_err(io::Error::new(
                    io::ErrorKind::IsADirectory,
                    "output path is a directory",
                )));
            }
            _ => {}
        }

        let mut builder = tempfile::Builder::new();
        builder.prefix(".docsnap-").suffix(".tmp");
        // Staged files default to 0600; outputs get the usual mode.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            builder.permissions(std::fs::Permissions::from_mode(0o644));
        }
        let staged = builder.tempfile_in(parent).map_err(sink_err)?;
        let (file, staged) = staged.into_parts();
        debug!("Staging output {} at {}", path.display(), staged.display());

        Ok(Self {
            writer: BufWriter::new(File::from_std(file)),
            staged,
            path: path.to_path_buf(),
        })
    }

    /// Writes the whole document and moves it into place. Returns the byte count.
    pub async fn write_document(mut self, document: &Document) -> Result<u64, ConfigError> {
        let sink_err = |source| ConfigError::Sink {
            path: self.path.clone(),
            source,
        };

        self.writer
            .write_all(document.text.as_bytes())
            .await
            .map_err(sink_err)?;
        self.writer.flush().await.map_err(sink_err)?;

        let file = self.writer.into_inner();
        file.sync_all().await.map_err(sink_err)?;
        drop(file);

        self.staged
            .persist(&self.path)
            .map_err(|e| sink_err(e.error))?;

        debug!("Wrote {} bytes to {}", document.len(), self.path.display());
        Ok(document.len() as u64)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
