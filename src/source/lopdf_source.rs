//! lopdf-backed document source.
//!
//! Walks page content streams to recover text spans with position, font
//! size, and style. Positions are emitted in top-origin page coordinates:
//! PDF user space grows upward, so y values are flipped against the page
//! height before they leave this module.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use lopdf::{Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::{BoundingBox, TextSpan};
use crate::outline::normalize_text;

/// A PDF document opened through lopdf.
pub struct LopdfSource {
    doc: LopdfDocument,
    page_count: u32,
}

impl LopdfSource {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let doc = LopdfDocument::load(path.as_ref())?;
        let page_count = doc.get_pages().len() as u32;
        Ok(Self { doc, page_count })
    }

    /// Open a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        let page_count = doc.get_pages().len() as u32;
        Ok(Self { doc, page_count })
    }

    fn page_id(&self, page: u32) -> Result<ObjectId> {
        let pages = self.doc.get_pages();
        pages
            .get(&page)
            .copied()
            .ok_or(Error::PageOutOfRange(page, self.page_count))
    }

    /// Page height from the MediaBox, defaulting to US Letter.
    fn page_height(&self, page_id: ObjectId) -> f32 {
        if let Ok(page_dict) = self.doc.get_dictionary(page_id) {
            if let Ok(media_box) = page_dict.get(b"MediaBox") {
                if let Ok(array) = media_box.as_array() {
                    if array.len() >= 4 {
                        return array[3].as_float().unwrap_or(792.0);
                    }
                }
            }
        }
        792.0
    }

    /// Concatenated content streams of a page.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::Parse(e.to_string()))?;

        let contents = page_dict
            .get(b"Contents")
            .map_err(|e| Error::Parse(e.to_string()))?;

        match contents {
            Object::Reference(r) => {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    return s
                        .decompressed_content()
                        .map_err(|e| Error::Parse(e.to_string()));
                }
                Err(Error::Parse("invalid content stream".to_string()))
            }
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            if let Ok(data) = s.decompressed_content() {
                                content.extend_from_slice(&data);
                                content.push(b' ');
                            }
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::Parse("invalid content stream".to_string())),
        }
    }

    /// Extract raw spans from a page's content stream.
    fn extract_spans(&self, page: u32) -> Result<Vec<TextSpan>> {
        let page_id = self.page_id(page)?;
        let page_height = self.page_height(page_id);

        let lopdf_fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::Parse(e.to_string()))?;

        // Resolve resource names to base font names for style detection.
        let mut font_names = HashMap::new();
        for (name, font) in &lopdf_fonts {
            let base_font = font
                .get(b"BaseFont")
                .ok()
                .and_then(|o| o.as_name().ok())
                .map(|n| String::from_utf8_lossy(n).to_string())
                .unwrap_or_else(|| "Unknown".to_string());
            font_names.insert(name.clone(), base_font);
        }

        let content = self.page_content(page_id)?;
        let mut spans = self.walk_content(&content, &font_names, &lopdf_fonts, page, page_height)?;

        // Reading order: top to bottom, then left to right.
        spans.sort_by(|a, b| {
            a.bbox
                .y0
                .partial_cmp(&b.bbox.y0)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(
                    a.bbox
                        .x0
                        .partial_cmp(&b.bbox.x0)
                        .unwrap_or(std::cmp::Ordering::Equal),
                )
        });

        Ok(spans)
    }

    /// Walk content stream operators and collect positioned text spans.
    fn walk_content(
        &self,
        content: &[u8],
        font_names: &HashMap<Vec<u8>, String>,
        lopdf_fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
        page: u32,
        page_height: f32,
    ) -> Result<Vec<TextSpan>> {
        let content =
            lopdf::content::Content::decode(content).map_err(|e| Error::Parse(e.to_string()))?;

        let mut spans = Vec::new();
        let mut current_font = String::new();
        let mut current_font_name: Vec<u8> = Vec::new();
        let mut current_font_size: f32 = 12.0;
        let mut text_matrix = TextMatrix::default();
        let mut leading: f32 = 12.0;
        let mut in_text_block = false;

        let mut push_span = |text: String, matrix: &TextMatrix, font: &str, size: f32| {
            let normalized = normalize_text(&text);
            if normalized.is_empty() {
                return;
            }
            let (x, y) = matrix.position();
            let effective_size = size * matrix.scale();
            // Width estimate: half the font size per character. The content
            // stream does not carry glyph metrics here; this keeps the
            // narrow-line rule usable without a font table.
            let width = effective_size * 0.5 * normalized.chars().count() as f32;
            // Flip to top-origin: y is the baseline, ascent above it.
            let top = page_height - y - effective_size * 0.8;
            let bottom = page_height - y + effective_size * 0.2;
            spans.push(TextSpan::new(
                normalized,
                effective_size,
                font,
                BoundingBox::new(x, top, x + width, bottom),
                page,
            ));
        };

        for op in content.operations {
            match op.operator.as_str() {
                "BT" => {
                    in_text_block = true;
                    text_matrix = TextMatrix::default();
                }
                "ET" => {
                    in_text_block = false;
                }
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Object::Name(font_name) = &op.operands[0] {
                            current_font_name = font_name.clone();
                            current_font = font_names
                                .get(font_name.as_slice())
                                .cloned()
                                .unwrap_or_else(|| {
                                    String::from_utf8_lossy(font_name.as_slice()).to_string()
                                });
                        }
                        current_font_size = number(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = number(&op.operands[0]).unwrap_or(0.0);
                        let ty = number(&op.operands[1]).unwrap_or(0.0);
                        // TD also sets the leading to -ty.
                        if op.operator == "TD" {
                            leading = -ty;
                        }
                        text_matrix.translate(tx, ty);
                    }
                }
                "TL" => {
                    if let Some(l) = op.operands.first().and_then(number) {
                        leading = l;
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        text_matrix.set(
                            number(&op.operands[0]).unwrap_or(1.0),
                            number(&op.operands[1]).unwrap_or(0.0),
                            number(&op.operands[2]).unwrap_or(0.0),
                            number(&op.operands[3]).unwrap_or(1.0),
                            number(&op.operands[4]).unwrap_or(0.0),
                            number(&op.operands[5]).unwrap_or(0.0),
                        );
                    }
                }
                "T*" => {
                    text_matrix.next_line(leading);
                }
                "Tj" | "TJ" => {
                    if in_text_block {
                        let encoding = lopdf_fonts
                            .get(&current_font_name)
                            .and_then(|f| f.get_font_encoding(&self.doc).ok());

                        let text = if op.operator == "TJ" {
                            // TJ interleaves strings with kerning adjustments
                            // in 1/1000 text-space units; a large negative
                            // adjustment is how many PDFs encode the gap
                            // between words.
                            if let Some(Object::Array(arr)) = op.operands.first() {
                                let mut combined = String::new();
                                for item in arr {
                                    match item {
                                        Object::String(bytes, _) => {
                                            combined.push_str(&decode_bytes(
                                                bytes,
                                                encoding.as_ref(),
                                            ));
                                        }
                                        Object::Integer(n) => {
                                            insert_word_break(&mut combined, -(*n as f32));
                                        }
                                        Object::Real(n) => {
                                            insert_word_break(&mut combined, -n);
                                        }
                                        _ => {}
                                    }
                                }
                                combined
                            } else {
                                String::new()
                            }
                        } else if let Some(Object::String(bytes, _)) = op.operands.first() {
                            decode_bytes(bytes, encoding.as_ref())
                        } else {
                            String::new()
                        };

                        push_span(text, &text_matrix, &current_font, current_font_size);
                    }
                }
                "'" | "\"" => {
                    text_matrix.next_line(leading);
                    if in_text_block {
                        let text_idx = if op.operator == "\"" { 2 } else { 0 };
                        if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                            let encoding = lopdf_fonts
                                .get(&current_font_name)
                                .and_then(|f| f.get_font_encoding(&self.doc).ok());
                            let text = decode_bytes(bytes, encoding.as_ref());
                            push_span(text, &text_matrix, &current_font, current_font_size);
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(spans)
    }
}

impl super::DocumentSource for LopdfSource {
    fn page_count(&self) -> u32 {
        self.page_count
    }

    fn page_spans(&self, page: u32) -> Result<Vec<TextSpan>> {
        self.extract_spans(page)
    }

    fn page_text(&self, page: u32) -> Result<String> {
        if page == 0 || page > self.page_count {
            return Err(Error::PageOutOfRange(page, self.page_count));
        }
        self.doc
            .extract_text(&[page])
            .map_err(|e| Error::TextExtract(format!("page {}: {}", page, e)))
    }
}

/// Decode string bytes with the font's encoding, falling back to simple
/// byte-level decoding when none is available.
fn decode_bytes(bytes: &[u8], encoding: Option<&lopdf::Encoding>) -> String {
    if let Some(enc) = encoding {
        if let Ok(decoded) = LopdfDocument::decode_text(enc, bytes) {
            return decoded;
        }
    }
    decode_text_simple(bytes)
}

/// Simple text decoding when no encoding is available: UTF-16BE with BOM,
/// then UTF-8, then Latin-1.
fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    bytes.iter().map(|&b| b as char).collect()
}

/// Spacing threshold in 1/1000 text-space units. TJ adjustments beyond
/// this advance the pen far enough to be inter-word gaps rather than
/// kerning.
const WORD_GAP_THRESHOLD: f32 = 200.0;

/// Append a space for a TJ adjustment that amounts to a word gap.
///
/// No space is inserted at the start of the run, after an existing space,
/// or after characters of scripts written without word spaces.
fn insert_word_break(combined: &mut String, adjustment: f32) {
    if adjustment <= WORD_GAP_THRESHOLD {
        return;
    }
    match combined.chars().last() {
        None => {}
        Some(' ') | Some('\u{00A0}') => {}
        Some(c) if is_spaceless_script(c) => {}
        Some(_) => combined.push(' '),
    }
}

/// Whether a character belongs to a script written without word spaces:
/// CJK ideographs, kana, and CJK punctuation. Hangul is excluded; Korean
/// separates words with spaces.
fn is_spaceless_script(c: char) -> bool {
    let code = c as u32;
    (0x4E00..=0x9FFF).contains(&code)
        || (0x3400..=0x4DBF).contains(&code)
        || (0x20000..=0x2EBEF).contains(&code)
        || (0x3040..=0x309F).contains(&code)
        || (0x30A0..=0x30FF).contains(&code)
        || (0x3000..=0x303F).contains(&code)
}

/// Text matrix for tracking position in a content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self, leading: f32) {
        self.f -= leading * self.d;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

/// Extract a number from a PDF object.
fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::DocumentSource;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Stream};

    /// Build a one-page PDF around the given content operations.
    fn pdf_bytes(operations: Vec<Operation>) -> Vec<u8> {
        let mut doc = LopdfDocument::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content { operations };
        let content_id =
            doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Resources" => resources_id,
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    fn text_ops(body: Vec<Operation>) -> Vec<Operation> {
        let mut ops = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), 16.into()]),
            Operation::new("Td", vec![50.into(), 700.into()]),
        ];
        ops.extend(body);
        ops.push(Operation::new("ET", vec![]));
        ops
    }

    #[test]
    fn test_tj_word_gap_becomes_space() {
        let ops = text_ops(vec![Operation::new(
            "TJ",
            vec![Object::Array(vec![
                Object::string_literal("1."),
                Object::Integer(-250),
                Object::string_literal("Introduction"),
            ])],
        )]);
        let source = LopdfSource::from_bytes(&pdf_bytes(ops)).unwrap();
        let spans = source.page_spans(1).unwrap();

        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "1. Introduction");
        assert_eq!(spans[0].word_count(), 2);
    }

    #[test]
    fn test_tj_kerning_does_not_split_words() {
        let ops = text_ops(vec![Operation::new(
            "TJ",
            vec![Object::Array(vec![
                Object::string_literal("Intro"),
                Object::Integer(-50),
                Object::string_literal("duction"),
            ])],
        )]);
        let source = LopdfSource::from_bytes(&pdf_bytes(ops)).unwrap();
        let spans = source.page_spans(1).unwrap();

        assert_eq!(spans[0].text, "Introduction");
    }

    #[test]
    fn test_tl_leading_spaces_lines() {
        let ops = text_ops(vec![
            Operation::new("TL", vec![40.into()]),
            Operation::new("Tj", vec![Object::string_literal("first line")]),
            Operation::new("'", vec![Object::string_literal("second line")]),
        ]);
        let source = LopdfSource::from_bytes(&pdf_bytes(ops)).unwrap();
        let spans = source.page_spans(1).unwrap();

        assert_eq!(spans.len(), 2);
        assert_eq!(spans[0].text, "first line");
        assert_eq!(spans[1].text, "second line");
        // In top-origin coordinates the second line sits the leading lower.
        assert!((spans[1].bbox.y0 - spans[0].bbox.y0 - 40.0).abs() < 1e-3);
    }

    #[test]
    fn test_insert_word_break_rules() {
        let mut s = String::from("1.");
        insert_word_break(&mut s, 250.0);
        assert_eq!(s, "1. ");

        // No doubled spaces.
        insert_word_break(&mut s, 250.0);
        assert_eq!(s, "1. ");

        // Nothing to break at the start of a run.
        let mut s = String::new();
        insert_word_break(&mut s, 250.0);
        assert!(s.is_empty());

        // CJK text carries no word spaces.
        let mut s = String::from("第3章");
        insert_word_break(&mut s, 250.0);
        assert_eq!(s, "第3章");

        // Plain kerning stays below the threshold.
        let mut s = String::from("word");
        insert_word_break(&mut s, 100.0);
        assert_eq!(s, "word");
    }

    #[test]
    fn test_hangul_gets_word_breaks() {
        assert!(!is_spaceless_script('한'));
        assert!(is_spaceless_script('第'));
        assert!(is_spaceless_script('の'));
    }

    #[test]
    fn test_decode_text_simple_utf8() {
        assert_eq!(decode_text_simple(b"hello"), "hello");
    }

    #[test]
    fn test_decode_text_simple_utf16be() {
        let bytes = [0xFE, 0xFF, 0x00, 0x41, 0x00, 0x42];
        assert_eq!(decode_text_simple(&bytes), "AB");
    }

    #[test]
    fn test_decode_text_simple_latin1_fallback() {
        let bytes = [0xE9, 0xFF];
        let decoded = decode_text_simple(&bytes);
        assert_eq!(decoded.chars().count(), 2);
    }

    #[test]
    fn test_text_matrix_translate() {
        let mut m = TextMatrix::default();
        m.translate(10.0, 20.0);
        assert_eq!(m.position(), (10.0, 20.0));
        m.translate(5.0, -3.0);
        assert_eq!(m.position(), (15.0, 17.0));
    }

    #[test]
    fn test_text_matrix_leading() {
        let mut m = TextMatrix::default();
        m.translate(0.0, 700.0);
        m.next_line(24.0);
        assert_eq!(m.position(), (0.0, 676.0));
        m.next_line(12.0);
        assert_eq!(m.position(), (0.0, 664.0));
    }

    #[test]
    fn test_text_matrix_scale() {
        let mut m = TextMatrix::default();
        assert_eq!(m.scale(), 1.0);
        m.set(2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        assert_eq!(m.scale(), 2.0);
    }

    #[test]
    fn test_invalid_bytes_fail_to_open() {
        assert!(LopdfSource::from_bytes(b"not a pdf").is_err());
    }
}
