use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Instant;

use calamine::{open_workbook, Data, Reader, Xlsx};
use docqa_core::{DocumentType, Segment, SourceLocator};

use crate::{ooxml, IngestionError};

/// Converts one file into ordered text segments (pages, slides, sheets or
/// sections). The file is only read, never modified or removed.
#[derive(Clone, Debug)]
pub struct DocumentLoader {
    path: PathBuf,
    document_type: DocumentType,
    name: String,
}

impl DocumentLoader {
    pub fn new(path: impl Into<PathBuf>, document_type: DocumentType) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            path,
            document_type,
            name,
        }
    }

    /// Builds a loader from a declared type name such as `"pdf"` or `".docx"`.
    pub fn from_declared(path: impl Into<PathBuf>, declared: &str) -> Result<Self, IngestionError> {
        let document_type = DocumentType::from_str(declared)
            .map_err(|_| IngestionError::UnsupportedFormat(declared.to_string()))?;
        Ok(Self::new(path, document_type))
    }

    /// Name recorded in every [`SourceLocator`]; defaults to the file name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document_type(&self) -> DocumentType {
        self.document_type
    }

    pub fn load(&self) -> Result<Vec<Segment>, IngestionError> {
        let started = Instant::now();
        std::fs::metadata(&self.path).map_err(|source| IngestionError::Read {
            path: self.path.clone(),
            source,
        })?;

        let units = match self.document_type {
            DocumentType::Pdf => self.pdf_pages()?,
            DocumentType::Pptx => ooxml::pptx_slides(&self.path).map_err(|r| self.parse_error(r))?,
            DocumentType::Xlsx => self.xlsx_sheets()?,
            DocumentType::Docx => ooxml::docx_sections(&self.path).map_err(|r| self.parse_error(r))?,
        };
        let segments = self.into_segments(units)?;

        tracing::info!(
            document = %self.name,
            document_type = %self.document_type,
            segments = segments.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "document loaded"
        );
        Ok(segments)
    }

    /// Runs [`DocumentLoader::load`] on the blocking thread pool.
    pub async fn load_async(self) -> Result<Vec<Segment>, IngestionError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || self.load())
            .await
            .map_err(|err| IngestionError::Parse {
                path,
                reason: format!("extraction task failed: {err}"),
            })?
    }

    fn parse_error(&self, reason: impl ToString) -> IngestionError {
        IngestionError::Parse {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }

    fn into_segments(&self, units: Vec<String>) -> Result<Vec<Segment>, IngestionError> {
        let kind = self.document_type.segment_kind();
        let segments: Vec<Segment> = units
            .into_iter()
            .enumerate()
            .filter_map(|(idx, text)| {
                let text = text.replace("\r\n", "\n").trim().to_string();
                if text.is_empty() {
                    return None;
                }
                let locator = SourceLocator::new(self.name.clone(), kind, idx + 1);
                Some(Segment::new(text, locator))
            })
            .collect();

        if segments.is_empty() {
            return Err(IngestionError::Empty {
                path: self.path.clone(),
            });
        }
        Ok(segments)
    }

    #[cfg(feature = "pdf")]
    fn pdf_pages(&self) -> Result<Vec<String>, IngestionError> {
        let bytes = std::fs::read(&self.path).map_err(|source| IngestionError::Read {
            path: self.path.clone(),
            source,
        })?;
        pdf_extract::extract_text_from_mem_by_pages(&bytes).map_err(|err| self.parse_error(err))
    }

    #[cfg(not(feature = "pdf"))]
    fn pdf_pages(&self) -> Result<Vec<String>, IngestionError> {
        Err(IngestionError::UnsupportedFormat(
            "pdf (built without the `pdf` feature)".to_string(),
        ))
    }

    fn xlsx_sheets(&self) -> Result<Vec<String>, IngestionError> {
        let mut workbook: Xlsx<_> = open_workbook(&self.path).map_err(|err| self.parse_error(err))?;
        let mut sheets = Vec::new();
        for name in workbook.sheet_names() {
            let range = workbook
                .worksheet_range(&name)
                .map_err(|err| self.parse_error(format!("sheet '{name}': {err}")))?;
            let rows: Vec<String> = range.rows().filter_map(render_row).collect();
            if rows.is_empty() {
                sheets.push(String::new());
            } else {
                sheets.push(format!("Sheet: {name}\n{}", rows.join("\n")));
            }
        }
        Ok(sheets)
    }
}

fn render_row(row: &[Data]) -> Option<String> {
    let cells: Vec<String> = row.iter().map(render_cell).collect();
    if cells.iter().all(|cell| cell.is_empty()) {
        return None;
    }
    Some(cells.join(" | "))
}

fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.trim().to_string(),
        other => other.to_string(),
    }
}
