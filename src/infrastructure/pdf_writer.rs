//! PDF 编码 - 基础设施层
//!
//! 把 `PaginatedDocument` 编码为 PDF 字节，使用标准 Type1 字体 Courier / Courier-Bold
//! （WinAnsiEncoding），无需嵌入字体文件。

use crate::error::{PipelineError, Result};
use crate::models::{DocumentMetadata, FontStyle, Page, PaginatedDocument};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};
use tracing::debug;

const REGULAR_FONT: &[u8] = b"F1";
const BOLD_FONT: &[u8] = b"F2";
const PRODUCER: &str = "book_summarizer";

/// 编码为 PDF 字节
pub fn encode(document: &PaginatedDocument, metadata: &DocumentMetadata) -> Result<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(font_dictionary("Courier"));
    let bold_id = doc.add_object(font_dictionary("Courier-Bold"));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(document.page_count());
    for page in document.pages() {
        let content = page_content(page).encode().map_err(PipelineError::render)?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(page.width),
                Object::Real(page.height),
            ],
            "Contents" => content_id,
        });
        kids.push(page_id.into());
    }

    let pages = dictionary! {
        "Type" => "Pages",
        "Count" => Object::Integer(kids.len() as i64),
        "Kids" => kids,
        "Resources" => resources_id,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    let info_id = info_dictionary(&mut doc, metadata);
    doc.trailer.set("Root", catalog_id);
    doc.trailer.set("Info", info_id);
    doc.compress();

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).map_err(PipelineError::render)?;

    debug!("PDF 编码完成: {} 页, {} 字节", document.page_count(), bytes.len());
    Ok(bytes)
}

fn font_dictionary(base_font: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base_font,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn info_dictionary(doc: &mut Document, metadata: &DocumentMetadata) -> ObjectId {
    let created = chrono::Local::now().format("D:%Y%m%d%H%M%S").to_string();
    doc.add_object(dictionary! {
        "Title" => text_string(&format!("Summary of {}", metadata.title)),
        "Author" => text_string(&metadata.author),
        "Producer" => Object::string_literal(PRODUCER),
        "CreationDate" => Object::string_literal(created),
    })
}

/// Info 字典中的文本字符串使用 UTF-16BE（带 BOM），可以表示任意字符
fn text_string(text: &str) -> Object {
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

fn page_content(page: &Page) -> Content {
    let mut operations = Vec::with_capacity(page.lines.len() * 5);
    for line in &page.lines {
        let font = match line.style {
            FontStyle::Regular => REGULAR_FONT,
            FontStyle::Bold => BOLD_FONT,
        };
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![Object::Name(font.to_vec()), Object::Real(line.font_size)],
        ));
        operations.push(Operation::new(
            "Td",
            vec![Object::Real(line.x), Object::Real(line.y)],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode_win_ansi(&line.text))],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    Content { operations }
}

/// 将文本编码为 WinAnsiEncoding，无法表示的字符替换为 '?'
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            ' '..='~' => c as u8,
            '\u{A0}'..='\u{FF}' => c as u8,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::{DocumentExtractor, PdfDocumentReader};
    use crate::services::PageLayoutEngine;

    fn metadata() -> DocumentMetadata {
        DocumentMetadata {
            page_count: 10,
            title: "Sample".to_string(),
            author: "A. Writer".to_string(),
        }
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("abc"), b"abc".to_vec());
        assert_eq!(encode_win_ansi("é"), vec![0xE9]);
        assert_eq!(encode_win_ansi("\u{201C}ok\u{201D}"), vec![0x93, b'o', b'k', 0x94]);
        assert_eq!(encode_win_ansi("漢"), b"?".to_vec());
    }

    #[test]
    fn test_encoded_pdf_is_readable() {
        let summary = (0..120)
            .map(|i| format!("Point {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        let document = PageLayoutEngine::default().render(&summary, &metadata());
        let bytes = encode(&document, &metadata()).unwrap();

        assert!(bytes.starts_with(b"%PDF-1.5"));

        let raw = PdfDocumentReader::new().raw_metadata(&bytes).unwrap();
        assert_eq!(raw.page_count, document.page_count());
        assert_eq!(raw.title.as_deref(), Some("Summary of Sample"));
        assert_eq!(raw.author.as_deref(), Some("A. Writer"));
    }

    #[test]
    fn test_encoded_text_is_extractable() {
        let summary = "Key points:\n- f(x) returns (a, b)\n- path C:\\books\\notes\n- plain closing line";
        let document = PageLayoutEngine::default().render(summary, &metadata());
        let bytes = encode(&document, &metadata()).unwrap();

        let text = PdfDocumentReader::new().plain_text(&bytes).unwrap();
        let tokens: Vec<&str> = text.split_whitespace().collect();

        for expected in [
            "Original",
            "Sample",
            "Writer",
            "Key",
            "f(x)",
            "(a,",
            "b)",
            "C:\\books\\notes",
            "closing",
        ] {
            assert!(tokens.contains(&expected), "缺少 {:?}: {:?}", expected, text);
        }
    }

    #[test]
    fn test_header_only_document() {
        let document = PageLayoutEngine::default().render("", &metadata());
        let bytes = encode(&document, &metadata()).unwrap();
        let raw = PdfDocumentReader::new().raw_metadata(&bytes).unwrap();
        assert_eq!(raw.page_count, 1);
    }
}
