// SPDX-FileCopyrightText: 2026 Notetron Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layout-aware PDF text extraction.
//!
//! PDF content streams carry text as positioned fragments, not lines.
//! This module walks the text-positioning operators, keeps the current
//! vertical baseline, and rebuilds lines from it: fragments on the same
//! baseline concatenate, a baseline change emits one newline. Pages are
//! joined with [`PAGE_SENTINEL`] so the chunker can split them apart
//! again.

use lopdf::{Document, Object, ObjectId};
use notetron_core::NotetronError;

/// Boundary marker inserted between pages of the extracted text.
pub const PAGE_SENTINEL: &str = "/****ENDOFPAGE****/";

/// Two baselines within this distance are the same line. Absorbs float
/// noise from producers that re-issue Tm for every fragment.
const BASELINE_EPSILON: f64 = 0.01;

/// Text extracted from one PDF document.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    /// Per-page text joined with [`PAGE_SENTINEL`].
    pub text: String,
    /// Number of pages walked.
    pub pages: usize,
    /// Fields of the Info dictionary, when the document carries one.
    pub metadata: Option<serde_json::Value>,
}

/// Extracts line-reconstructed text and metadata from PDF bytes.
pub fn extract_pdf(bytes: &[u8]) -> Result<ExtractedDocument, NotetronError> {
    let doc = Document::load_mem(bytes)
        .map_err(|e| NotetronError::Internal(format!("failed to parse PDF document: {e}")))?;

    let mut pages = Vec::new();
    for page_id in doc.get_pages().values() {
        let text = page_text(&doc, *page_id)
            .map_err(|e| NotetronError::Internal(format!("failed to read PDF page: {e}")))?;
        pages.push(text);
    }

    Ok(ExtractedDocument {
        text: pages.join(PAGE_SENTINEL),
        pages: pages.len(),
        metadata: info_metadata(&doc),
    })
}

/// Walks one page's content stream and rebuilds its text lines.
fn page_text(doc: &Document, page_id: ObjectId) -> Result<String, lopdf::Error> {
    let content_bytes = doc.get_page_content(page_id)?;
    let content = lopdf::content::Content::decode(&content_bytes)?;

    let mut state = PageState::default();
    for operation in &content.operations {
        match operation.operator.as_str() {
            // Begin text object: the text matrix resets, the leading
            // set via TL persists.
            "BT" => state.baseline = None,
            "Tm" => {
                if let Some(y) = operation.operands.get(5).and_then(operand_number) {
                    state.baseline = Some(y);
                }
            }
            "Td" => {
                if let Some(ty) = operation.operands.get(1).and_then(operand_number) {
                    state.advance(ty);
                }
            }
            "TD" => {
                if let Some(ty) = operation.operands.get(1).and_then(operand_number) {
                    state.leading = -ty;
                    state.advance(ty);
                }
            }
            "TL" => {
                if let Some(leading) = operation.operands.first().and_then(operand_number) {
                    state.leading = leading;
                }
            }
            "T*" => state.advance(-state.leading),
            "Tj" => {
                for operand in &operation.operands {
                    if let Some(text) = operand_text(operand) {
                        state.show(&text);
                    }
                }
            }
            "'" => {
                state.advance(-state.leading);
                for operand in &operation.operands {
                    if let Some(text) = operand_text(operand) {
                        state.show(&text);
                    }
                }
            }
            "\"" => {
                state.advance(-state.leading);
                if let Some(text) = operation.operands.get(2).and_then(operand_text) {
                    state.show(&text);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = operation.operands.first() {
                    for item in items {
                        if let Some(text) = operand_text(item) {
                            state.show(&text);
                        }
                    }
                }
            }
            _ => {}
        }
    }
    Ok(state.out)
}

/// Baseline-tracking state for one page walk.
#[derive(Debug, Default)]
struct PageState {
    /// Current vertical baseline; None until the first positioning op.
    baseline: Option<f64>,
    /// Line spacing set by TL/TD, consumed by T*, ' and ".
    leading: f64,
    /// Baseline of the last shown fragment.
    last_shown: Option<f64>,
    out: String,
}

impl PageState {
    fn advance(&mut self, ty: f64) {
        self.baseline = Some(self.baseline.unwrap_or(0.0) + ty);
    }

    fn show(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let baseline = self.baseline.unwrap_or(0.0);
        if let Some(prev) = self.last_shown {
            if (prev - baseline).abs() > BASELINE_EPSILON {
                self.out.push('\n');
            }
        }
        self.out.push_str(text);
        self.last_shown = Some(baseline);
    }
}

fn operand_number(object: &Object) -> Option<f64> {
    match object {
        Object::Integer(value) => Some(*value as f64),
        Object::Real(value) => Some(f64::from(*value)),
        _ => None,
    }
}

fn operand_text(object: &Object) -> Option<String> {
    if let Object::String(bytes, _) = object {
        Some(decode_pdf_string(bytes))
    } else {
        None
    }
}

/// Decodes a PDF string: UTF-16BE when it carries the BOM, byte text
/// otherwise.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&utf16)
    } else {
        String::from_utf8_lossy(bytes).into_owned()
    }
}

/// Reads the Info dictionary into a JSON object, string fields only.
fn info_metadata(doc: &Document) -> Option<serde_json::Value> {
    let info_id = doc.trailer.get(b"Info").ok()?.as_reference().ok()?;
    let info = doc.get_object(info_id).ok()?.as_dict().ok()?;

    let mut map = serde_json::Map::new();
    for (key, value) in info.iter() {
        if let Object::String(bytes, _) = value {
            map.insert(
                String::from_utf8_lossy(key).into_owned(),
                serde_json::Value::String(decode_pdf_string(bytes)),
            );
        }
    }
    if map.is_empty() {
        None
    } else {
        Some(serde_json::Value::Object(map))
    }
}
