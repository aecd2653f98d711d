use docqa_core::{Chunk, Segment};

use crate::SplitterConfigError;

/// Character-window splitter with a fixed overlap.
///
/// Windows are at most `chunk_size` characters. When a window has to be cut,
/// the cut moves back to the last whitespace in the second half of the window
/// so words stay intact, and the next window starts exactly `chunk_overlap`
/// characters before the cut. Adjacent chunks of one segment therefore share
/// exactly `chunk_overlap` characters, unless a whitespace run longer than a
/// window separates them; such runs never become chunks of their own.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl TextSplitter {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, SplitterConfigError> {
        if chunk_size == 0 {
            return Err(SplitterConfigError::ZeroChunkSize);
        }
        if chunk_overlap >= chunk_size {
            return Err(SplitterConfigError::OverlapTooLarge {
                overlap: chunk_overlap,
                size: chunk_size,
            });
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn chunk_overlap(&self) -> usize {
        self.chunk_overlap
    }

    /// Splits raw text into `(char_offset, text)` windows.
    pub fn split_text(&self, text: &str) -> Vec<(usize, String)> {
        let chars: Vec<char> = text.chars().collect();
        if chars.iter().all(|c| c.is_whitespace()) {
            return Vec::new();
        }
        if chars.len() <= self.chunk_size {
            return vec![(0, text.to_string())];
        }

        let mut windows = Vec::new();
        let mut start = 0usize;
        loop {
            let hard_end = usize::min(start + self.chunk_size, chars.len());
            let end = if hard_end == chars.len() {
                hard_end
            } else {
                self.snap_to_whitespace(&chars, start, hard_end)
            };
            let window = &chars[start..end];
            if window.iter().all(|c| c.is_whitespace()) {
                // Inside a long whitespace run: resume at the next text.
                match (end..chars.len()).find(|&idx| !chars[idx].is_whitespace()) {
                    Some(next) => {
                        start = next;
                        continue;
                    }
                    None => break,
                }
            }
            windows.push((start, window.iter().collect()));

            if end == chars.len() || chars[end..].iter().all(|c| c.is_whitespace()) {
                break;
            }
            start = end - self.chunk_overlap;
        }
        windows
    }

    // Never returns a cut that would keep the next window from advancing.
    fn snap_to_whitespace(&self, chars: &[char], start: usize, hard_end: usize) -> usize {
        let min_end = usize::max(start + self.chunk_overlap + 1, start + self.chunk_size / 2);
        (min_end..=hard_end)
            .rev()
            .find(|&end| chars[end - 1].is_whitespace())
            .unwrap_or(hard_end)
    }

    /// Splits every segment and numbers the chunks across the document.
    pub fn split(&self, segments: &[Segment]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        for segment in segments {
            for (offset, content) in self.split_text(&segment.text) {
                let ordinal = chunks.len();
                chunks.push(Chunk {
                    id: format!("{}#{}", segment.locator.document, ordinal),
                    ordinal,
                    content,
                    source: segment.locator.at_offset(offset),
                });
            }
        }
        chunks
    }
}
