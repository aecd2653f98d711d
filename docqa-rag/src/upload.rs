use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use docqa_core::{DocqaError, DocqaResult, DocumentType};
use tempfile::TempPath;

/// An uploaded file copied into a private temp file.
///
/// The temp file is deleted when this value is dropped.
#[derive(Debug)]
pub struct UploadedDocument {
    file_name: String,
    document_type: DocumentType,
    temp: TempPath,
}

impl UploadedDocument {
    /// Copies `reader` into a temp file, rejecting unknown extensions before
    /// anything is written.
    pub fn from_reader(file_name: &str, mut reader: impl Read) -> DocqaResult<Self> {
        let document_type = DocumentType::from_path(Path::new(file_name))
            .ok_or_else(|| DocqaError::UnsupportedFormat(file_name.to_string()))?;

        let write_failed = |err: io::Error| DocqaError::CorruptDocument {
            path: file_name.to_string(),
            reason: format!("failed to store upload: {err}"),
        };
        let mut file = tempfile::Builder::new()
            .prefix("docqa-upload-")
            .suffix(document_type.extension())
            .tempfile()
            .map_err(write_failed)?;
        let bytes = io::copy(&mut reader, &mut file).map_err(write_failed)?;

        tracing::debug!(
            file_name,
            document_type = %document_type,
            bytes,
            temp = %file.path().display(),
            "upload stored"
        );
        Ok(Self {
            file_name: file_name.to_string(),
            document_type,
            temp: file.into_temp_path(),
        })
    }

    /// Copies a local file as if it had been uploaded under its own name.
    pub fn from_path(path: impl AsRef<Path>) -> DocqaResult<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        if DocumentType::from_path(path).is_none() {
            return Err(DocqaError::UnsupportedFormat(file_name));
        }
        let file = File::open(path).map_err(|err| DocqaError::CorruptDocument {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        Self::from_reader(&file_name, file)
    }

    /// Name the file was uploaded under.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn path(&self) -> &Path {
        &self.temp
    }
}
