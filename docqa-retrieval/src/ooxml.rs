//! Text extraction for the zip+XML office formats (docx, pptx).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use zip::ZipArchive;

const DOCX_BODY: &str = "word/document.xml";
const SLIDE_PREFIX: &str = "ppt/slides/slide";

pub(crate) fn open_archive(path: &Path) -> Result<ZipArchive<File>, String> {
    let file = File::open(path).map_err(|err| err.to_string())?;
    ZipArchive::new(file).map_err(|err| err.to_string())
}

fn read_entry(archive: &mut ZipArchive<File>, name: &str) -> Result<String, String> {
    let mut entry = archive
        .by_name(name)
        .map_err(|err| format!("{name}: {err}"))?;
    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|err| format!("{name}: {err}"))?;
    Ok(xml)
}

/// Returns one string per slide, ordered by slide number.
pub(crate) fn pptx_slides(path: &Path) -> Result<Vec<String>, String> {
    let mut archive = open_archive(path)?;
    let mut slides: Vec<(u32, String)> = archive
        .file_names()
        .filter_map(|name| {
            let number = name
                .strip_prefix(SLIDE_PREFIX)?
                .strip_suffix(".xml")?
                .parse::<u32>()
                .ok()?;
            Some((number, name.to_string()))
        })
        .collect();
    slides.sort_by_key(|(number, _)| *number);

    if slides.is_empty() && archive.by_name("ppt/presentation.xml").is_err() {
        return Err("archive is not a presentation".to_string());
    }

    let mut out = Vec::with_capacity(slides.len());
    for (_, name) in slides {
        let xml = read_entry(&mut archive, &name)?;
        out.push(slide_text(&xml).map_err(|err| format!("{name}: {err}"))?);
    }
    Ok(out)
}

fn slide_text(xml: &str) -> Result<String, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_text = true,
            Event::Text(e) if in_text => current.push_str(&e.unescape()?),
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    let line = current.trim();
                    if !line.is_empty() {
                        paragraphs.push(line.to_string());
                    }
                    current.clear();
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(paragraphs.join("\n"))
}

/// Returns one string per section; a new section starts at each heading.
pub(crate) fn docx_sections(path: &Path) -> Result<Vec<String>, String> {
    let mut archive = open_archive(path)?;
    let xml = read_entry(&mut archive, DOCX_BODY)?;
    let blocks = docx_blocks(&xml).map_err(|err| format!("{DOCX_BODY}: {err}"))?;

    let mut sections: Vec<Vec<String>> = Vec::new();
    for block in blocks {
        match sections.last_mut() {
            Some(section) if !block.heading => section.push(block.text),
            _ => sections.push(vec![block.text]),
        }
    }
    Ok(sections
        .into_iter()
        .map(|section| section.join("\n\n"))
        .collect())
}

struct Block {
    text: String,
    heading: bool,
}

#[derive(Default)]
struct TableState {
    rows: Vec<String>,
    cells: Vec<String>,
    cell: String,
}

fn is_heading_style(e: &BytesStart<'_>) -> bool {
    e.attributes().flatten().any(|attr| {
        attr.key.local_name().as_ref() == b"val"
            && attr
                .unescape_value()
                .map(|value| value.starts_with("Heading") || value == "Title")
                .unwrap_or(false)
    })
}

fn docx_blocks(xml: &str) -> Result<Vec<Block>, quick_xml::Error> {
    let mut reader = Reader::from_str(xml);
    let mut blocks = Vec::new();
    let mut paragraph = String::new();
    let mut heading = false;
    let mut in_text = false;
    // Nested tables are flattened into the cell of the outermost table.
    let mut table_depth = 0usize;
    let mut table = TableState::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.local_name().as_ref() {
                b"t" => in_text = true,
                b"tbl" => table_depth += 1,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"pStyle" => heading = is_heading_style(&e),
                b"tab" => paragraph.push('\t'),
                b"br" | b"cr" => paragraph.push('\n'),
                _ => {}
            },
            Event::Text(e) if in_text => paragraph.push_str(&e.unescape()?),
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text = false,
                b"p" => {
                    let text = paragraph.trim().to_string();
                    paragraph.clear();
                    if table_depth > 0 {
                        if !text.is_empty() {
                            if !table.cell.is_empty() {
                                table.cell.push(' ');
                            }
                            table.cell.push_str(&text);
                        }
                    } else if !text.is_empty() {
                        blocks.push(Block { text, heading });
                    }
                    heading = false;
                }
                b"tc" if table_depth == 1 => {
                    let cell = std::mem::take(&mut table.cell);
                    table.cells.push(cell);
                }
                b"tr" if table_depth == 1 => {
                    let cells = std::mem::take(&mut table.cells);
                    if cells.iter().any(|cell| !cell.is_empty()) {
                        table.rows.push(cells.join(" | "));
                    }
                }
                b"tbl" => {
                    table_depth = table_depth.saturating_sub(1);
                    if table_depth == 0 {
                        let finished = std::mem::take(&mut table);
                        if !finished.rows.is_empty() {
                            blocks.push(Block {
                                text: finished.rows.join("\n"),
                                heading: false,
                            });
                        }
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slide_text_joins_runs_and_breaks_paragraphs() {
        let xml = r#"<p:sld xmlns:p="p" xmlns:a="a"><p:cSld><p:spTree>
            <p:sp><p:txBody><a:p><a:r><a:t>Quarterly</a:t></a:r><a:r><a:t> results</a:t></a:r></a:p>
            <a:p><a:r><a:t>Revenue &amp; margin</a:t></a:r></a:p></p:txBody></p:sp>
        </p:spTree></p:cSld></p:sld>"#;

        assert_eq!(slide_text(xml).unwrap(), "Quarterly results\nRevenue & margin");
    }

    #[test]
    fn docx_blocks_mark_headings_and_flatten_tables() {
        let xml = r#"<w:document xmlns:w="w"><w:body>
            <w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>History</w:t></w:r></w:p>
            <w:p><w:r><w:t xml:space="preserve">Founded </w:t></w:r><w:r><w:t>in 1999.</w:t></w:r></w:p>
            <w:tbl><w:tr><w:tc><w:p><w:r><w:t>R1C1</w:t></w:r></w:p></w:tc><w:tc><w:p><w:r><w:t>R1C2</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
        </w:body></w:document>"#;

        let blocks = docx_blocks(xml).unwrap();
        let texts: Vec<&str> = blocks.iter().map(|b| b.text.as_str()).collect();
        assert_eq!(texts, vec!["History", "Founded in 1999.", "R1C1 | R1C2"]);
        assert!(blocks[0].heading);
        assert!(!blocks[1].heading);
    }
}
