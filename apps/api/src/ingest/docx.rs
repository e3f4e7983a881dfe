use std::io::{Cursor, Read};

use once_cell::sync::Lazy;
use regex::Regex;

use super::IngestError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Text runs, tabs, line/page breaks, carriage returns and paragraph ends, in document
/// order.
static RUN_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"<w:t(?:\s[^>]*)?>([^<]*)</w:t>|<w:tab/>|<w:br\b[^>]*/>|<w:cr/>|</w:p>").ok()
});

/// The five predefined XML entities plus decimal and hex character references.
static ENTITY_PATTERN: Lazy<Option<Regex>> = Lazy::new(|| {
    Regex::new(r"&(?:#([0-9]{1,7})|#x([0-9a-fA-F]{1,6})|(lt|gt|quot|apos|amp));").ok()
});

/// Reads the body text of a DOCX package. One line per paragraph.
pub fn extract_text(bytes: &[u8]) -> Result<String, IngestError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| IngestError::Parse(format!("not a DOCX archive: {e}")))?;
    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| IngestError::Parse(format!("missing {DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| IngestError::Parse(format!("unreadable {DOCUMENT_PART}: {e}")))?;
    Ok(document_text(&xml))
}

fn document_text(xml: &str) -> String {
    let mut out = String::new();
    let Some(pattern) = RUN_PATTERN.as_ref() else {
        return out;
    };
    for caps in pattern.captures_iter(xml) {
        match caps.get(1) {
            Some(run) => out.push_str(&decode_entities(run.as_str())),
            None => match &caps[0] {
                "<w:tab/>" => out.push('\t'),
                _ => out.push('\n'),
            },
        }
    }
    out
}

/// Single pass, so `&amp;lt;` stays `&lt;`. References to invalid code points are kept
/// verbatim.
fn decode_entities(text: &str) -> String {
    let Some(pattern) = ENTITY_PATTERN.as_ref() else {
        return text.to_string();
    };
    pattern
        .replace_all(text, |caps: &regex::Captures| {
            let code = if let Some(dec) = caps.get(1) {
                dec.as_str().parse::<u32>().ok()
            } else if let Some(hex) = caps.get(2) {
                u32::from_str_radix(hex.as_str(), 16).ok()
            } else {
                return match &caps[3] {
                    "lt" => "<",
                    "gt" => ">",
                    "quot" => "\"",
                    "apos" => "'",
                    _ => "&",
                }
                .to_string();
            };
            match code.and_then(char::from_u32) {
                Some(c) => c.to_string(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}
