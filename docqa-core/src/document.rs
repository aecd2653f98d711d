use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DocqaError;

/// The four upload formats the pipeline understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Pdf,
    Pptx,
    Xlsx,
    Docx,
}

impl DocumentType {
    pub const ALL: [DocumentType; 4] = [
        DocumentType::Pdf,
        DocumentType::Pptx,
        DocumentType::Xlsx,
        DocumentType::Docx,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentType::Pdf => "pdf",
            DocumentType::Pptx => "pptx",
            DocumentType::Xlsx => "xlsx",
            DocumentType::Docx => "docx",
        }
    }

    /// File suffix including the leading dot, e.g. `.pdf`.
    pub fn extension(self) -> &'static str {
        match self {
            DocumentType::Pdf => ".pdf",
            DocumentType::Pptx => ".pptx",
            DocumentType::Xlsx => ".xlsx",
            DocumentType::Docx => ".docx",
        }
    }

    /// Maps an extension (with or without the leading dot, any case) through
    /// the fixed upload table.
    pub fn from_extension(extension: &str) -> Option<Self> {
        let normalized = extension.trim().trim_start_matches('.').to_ascii_lowercase();
        DocumentType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(DocumentType::from_extension)
    }

    /// The unit each extractor emits for this format.
    pub fn segment_kind(self) -> SegmentKind {
        match self {
            DocumentType::Pdf => SegmentKind::Page,
            DocumentType::Pptx => SegmentKind::Slide,
            DocumentType::Xlsx => SegmentKind::Sheet,
            DocumentType::Docx => SegmentKind::Section,
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = DocqaError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        DocumentType::from_extension(value)
            .ok_or_else(|| DocqaError::UnsupportedFormat(value.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Page,
    Slide,
    Sheet,
    Section,
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SegmentKind::Page => "page",
            SegmentKind::Slide => "slide",
            SegmentKind::Sheet => "sheet",
            SegmentKind::Section => "section",
        };
        f.write_str(label)
    }
}

/// Where a piece of text came from.
///
/// `number` is the 1-based page/slide/sheet/section index in document order.
/// `offset` is the character offset inside that unit; loaders emit 0 and the
/// splitter fills in the start of each chunk.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocator {
    pub document: String,
    pub kind: SegmentKind,
    pub number: usize,
    pub offset: usize,
}

impl SourceLocator {
    pub fn new(document: impl Into<String>, kind: SegmentKind, number: usize) -> Self {
        Self {
            document: document.into(),
            kind,
            number,
            offset: 0,
        }
    }

    pub fn at_offset(&self, offset: usize) -> Self {
        Self {
            offset,
            ..self.clone()
        }
    }
}

impl fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} @{}",
            self.document, self.kind, self.number, self.offset
        )
    }
}

/// One extracted unit of raw text, in document order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub locator: SourceLocator,
}

impl Segment {
    pub fn new(text: impl Into<String>, locator: SourceLocator) -> Self {
        Self {
            text: text.into(),
            locator,
        }
    }
}

/// The unit of retrieval. Immutable once produced by the splitter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    /// Position of this chunk across the whole document.
    pub ordinal: usize,
    pub content: String,
    pub source: SourceLocator,
}
