//! Builds minimal office documents on disk so loader tests need no binary
//! fixtures.
#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::Path;

use zip::write::FileOptions;
use zip::ZipWriter;

fn write_zip(path: &Path, entries: &[(String, String)]) {
    let file = File::create(path).expect("create fixture");
    let mut zip = ZipWriter::new(file);
    for (name, body) in entries {
        zip.start_file(name.clone(), FileOptions::default())
            .expect("start zip entry");
        zip.write_all(body.as_bytes()).expect("write zip entry");
    }
    zip.finish().expect("finish zip");
}

pub fn paragraph(text: &str) -> String {
    format!(r#"<w:p><w:r><w:t xml:space="preserve">{text}</w:t></w:r></w:p>"#)
}

pub fn heading(text: &str) -> String {
    format!(
        r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>{text}</w:t></w:r></w:p>"#
    )
}

pub fn table(rows: &[&[&str]]) -> String {
    let mut xml = String::from("<w:tbl>");
    for row in rows {
        xml.push_str("<w:tr>");
        for cell in row.iter() {
            xml.push_str("<w:tc>");
            xml.push_str(&paragraph(cell));
            xml.push_str("</w:tc>");
        }
        xml.push_str("</w:tr>");
    }
    xml.push_str("</w:tbl>");
    xml
}

pub fn write_docx(path: &Path, body: &str) {
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
    );
    write_zip(
        path,
        &[
            ("[Content_Types].xml".to_string(), content_types()),
            ("word/document.xml".to_string(), document),
        ],
    );
}

pub fn write_pptx(path: &Path, slides: &[&[&str]]) {
    let mut entries = vec![
        ("[Content_Types].xml".to_string(), content_types()),
        (
            "ppt/presentation.xml".to_string(),
            r#"<p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"/>"#
                .to_string(),
        ),
    ];
    for (idx, paragraphs) in slides.iter().enumerate() {
        let mut body = String::new();
        for text in paragraphs.iter() {
            body.push_str(&format!("<a:p><a:r><a:t>{text}</a:t></a:r></a:p>"));
        }
        let slide = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:sp><p:txBody>{body}</p:txBody></p:sp></p:spTree></p:cSld></p:sld>"#
        );
        entries.push((format!("ppt/slides/slide{}.xml", idx + 1), slide));
    }
    write_zip(path, &entries);
}

/// Every cell is written as a shared string.
pub fn write_xlsx(path: &Path, sheets: &[(&str, &[&[&str]])]) {
    let mut shared: Vec<String> = Vec::new();
    let mut sheet_entries = Vec::new();
    let mut workbook_sheets = String::new();
    let mut rels = String::new();

    for (sheet_idx, (name, rows)) in sheets.iter().enumerate() {
        let number = sheet_idx + 1;
        let mut data = String::new();
        for (row_idx, row) in rows.iter().enumerate() {
            data.push_str(&format!(r#"<row r="{}">"#, row_idx + 1));
            for (col_idx, value) in row.iter().enumerate() {
                let column = (b'A' + col_idx as u8) as char;
                let string_idx = shared.len();
                shared.push(value.to_string());
                data.push_str(&format!(
                    r#"<c r="{column}{}" t="s"><v>{string_idx}</v></c>"#,
                    row_idx + 1
                ));
            }
            data.push_str("</row>");
        }
        sheet_entries.push((
            format!("xl/worksheets/sheet{number}.xml"),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{data}</sheetData></worksheet>"#
            ),
        ));
        workbook_sheets.push_str(&format!(
            r#"<sheet name="{name}" sheetId="{number}" r:id="rId{number}"/>"#
        ));
        rels.push_str(&format!(
            r#"<Relationship Id="rId{number}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{number}.xml"/>"#
        ));
    }

    let shared_xml = shared
        .iter()
        .map(|value| format!("<si><t>{value}</t></si>"))
        .collect::<String>();

    let mut entries = vec![
        ("[Content_Types].xml".to_string(), content_types()),
        (
            "xl/workbook.xml".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>{workbook_sheets}</sheets></workbook>"#
            ),
        ),
        (
            "xl/_rels/workbook.xml.rels".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">{rels}</Relationships>"#
            ),
        ),
        (
            "xl/sharedStrings.xml".to_string(),
            format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">{shared_xml}</sst>"#,
                shared.len()
            ),
        ),
    ];
    entries.extend(sheet_entries);
    write_zip(path, &entries);
}

fn content_types() -> String {
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"/>"#
        .to_string()
}
