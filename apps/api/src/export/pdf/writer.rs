//! Minimal PDF 1.4 serializer: one catalog, one page tree, the two base-14
//! Helvetica faces and an uncompressed content stream per page.

use std::fmt::Write;

use super::metrics::{Font, PAGE_HEIGHT, PAGE_WIDTH};

const CATALOG_ID: usize = 1;
const PAGES_ID: usize = 2;
const INFO_ID: usize = 5;
const FIRST_PAGE_ID: usize = 6;
const FONTS: [(usize, Font); 2] = [(3, Font::Helvetica), (4, Font::HelveticaBold)];

/// Assembles a complete document from per-page content streams.
pub fn write_document(pages: &[Vec<u8>], title: &str) -> Vec<u8> {
    let page_ids: Vec<usize> = (0..pages.len()).map(|i| FIRST_PAGE_ID + 2 * i).collect();
    let object_count = FIRST_PAGE_ID + 2 * pages.len();

    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");
    let mut offsets = vec![0usize; object_count];

    let kids = page_ids
        .iter()
        .map(|id| format!("{id} 0 R"))
        .collect::<Vec<_>>()
        .join(" ");

    push_object(
        &mut out,
        &mut offsets,
        CATALOG_ID,
        format!("<< /Type /Catalog /Pages {PAGES_ID} 0 R >>").as_bytes(),
    );
    push_object(
        &mut out,
        &mut offsets,
        PAGES_ID,
        format!("<< /Type /Pages /Kids [{kids}] /Count {} >>", pages.len()).as_bytes(),
    );
    for (id, font) in FONTS {
        push_object(
            &mut out,
            &mut offsets,
            id,
            format!(
                "<< /Type /Font /Subtype /Type1 /BaseFont /{} /Encoding /WinAnsiEncoding >>",
                font.base_font()
            )
            .as_bytes(),
        );
    }
    push_object(
        &mut out,
        &mut offsets,
        INFO_ID,
        format!(
            "<< /Title ({}) /Producer (interview-api) >>",
            encode_text(title)
        )
        .as_bytes(),
    );

    let font_resources = FONTS
        .iter()
        .map(|(id, font)| format!("/{} {id} 0 R", font.resource()))
        .collect::<Vec<_>>()
        .join(" ");

    for (content, page_id) in pages.iter().zip(&page_ids) {
        let content_id = page_id + 1;
        push_object(
            &mut out,
            &mut offsets,
            *page_id,
            format!(
                "<< /Type /Page /Parent {PAGES_ID} 0 R \
                 /MediaBox [0 0 {PAGE_WIDTH:.2} {PAGE_HEIGHT:.2}] \
                 /Resources << /Font << {font_resources} >> >> /Contents {content_id} 0 R >>"
            )
            .as_bytes(),
        );
        let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
        stream.extend_from_slice(content);
        stream.extend_from_slice(b"\nendstream");
        push_object(&mut out, &mut offsets, content_id, &stream);
    }

    let xref_offset = out.len();
    let mut xref = format!("xref\n0 {object_count}\n0000000000 65535 f \n");
    for offset in offsets.iter().skip(1) {
        let _ = write!(xref, "{offset:010} 00000 n \n");
    }
    let _ = write!(
        xref,
        "trailer\n<< /Size {object_count} /Root {CATALOG_ID} 0 R /Info {INFO_ID} 0 R >>\n\
         startxref\n{xref_offset}\n%%EOF\n"
    );
    out.extend_from_slice(xref.as_bytes());
    out
}

fn push_object(out: &mut Vec<u8>, offsets: &mut [usize], id: usize, body: &[u8]) {
    offsets[id] = out.len();
    out.extend_from_slice(format!("{id} 0 obj\n").as_bytes());
    out.extend_from_slice(body);
    out.extend_from_slice(b"\nendobj\n");
}

/// Encodes text as the body of a PDF literal string in WinAnsiEncoding.
///
/// Delimiters and backslashes are escaped; anything outside printable ASCII is
/// written as an octal escape. Characters WinAnsi cannot express become `?`.
pub fn encode_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' | ')' | '\\' => {
                out.push('\\');
                out.push(c);
            }
            ' '..='~' => out.push(c),
            _ => {
                let _ = write!(out, "\\{:03o}", win_ansi_byte(c));
            }
        }
    }
    out
}

fn win_ansi_byte(c: char) -> u8 {
    match c {
        '€' => 0x80,
        '‚' => 0x82,
        '„' => 0x84,
        '…' => 0x85,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '•' => 0x95,
        '–' => 0x96,
        '—' => 0x97,
        '™' => 0x99,
        '\u{a0}'..='\u{ff}' => c as u32 as u8,
        '\t' => b' ',
        _ => b'?',
    }
}
