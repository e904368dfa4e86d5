//! PDF backend abstraction layer.
//!
//! Provides a trait-based interface for the few PDF operations the pipeline
//! needs, isolating the concrete PDF library (lopdf) from validation and
//! extraction logic.

use lopdf::{Dictionary, Document as LopdfDocument, Object, ObjectId};

use crate::error::{Error, Result};

/// Abstract interface for reading a parsed PDF.
pub trait PdfBackend {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Text of the page at `index` (0-based).
    fn page_text(&self, index: usize) -> Result<String>;

    /// A string entry from the document info dictionary.
    fn info_string(&self, key: &[u8]) -> Option<String>;

    /// The catalog's `/MarkInfo /Marked` flag.
    ///
    /// `Ok(false)` when absent; `Err` when present but not a boolean.
    fn is_marked(&self) -> Result<bool>;

    /// PDF version string.
    fn version(&self) -> String;

    /// Whether the document is encrypted.
    fn is_encrypted(&self) -> bool;

    /// Length in bytes of the parsed source.
    fn byte_len(&self) -> u64;
}

/// Decode a PDF text string.
///
/// Tries UTF-16BE (with BOM), then UTF-8, then falls back to Latin-1.
pub fn decode_pdf_string(bytes: &[u8]) -> String {
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

    if let Ok(s) = std::str::from_utf8(bytes) {
        return s.to_string();
    }

    bytes.iter().map(|&b| b as char).collect()
}

/// Concrete [`PdfBackend`] backed by `lopdf::Document`.
pub struct LopdfBackend {
    doc: LopdfDocument,
    pages: Vec<ObjectId>,
    byte_len: u64,
}

impl LopdfBackend {
    /// Parse from an in-memory byte slice.
    pub fn load_bytes(data: &[u8]) -> Result<Self> {
        let doc = LopdfDocument::load_mem(data)?;
        let pages = doc.get_pages().into_values().collect();
        Ok(Self {
            doc,
            pages,
            byte_len: data.len() as u64,
        })
    }

    /// Resolve an object that may be an inline dictionary or a reference to one.
    fn resolve_dict<'a>(&'a self, obj: &'a Object) -> Option<&'a Dictionary> {
        match obj {
            Object::Reference(r) => self.doc.get_dictionary(*r).ok(),
            Object::Dictionary(d) => Some(d),
            _ => None,
        }
    }

    /// Ids of the streams a page's `/Contents` names.
    ///
    /// Every named stream must exist; a reference to a missing or
    /// non-stream object is an extraction error.
    fn content_streams(&self, page: &Dictionary, index: usize) -> Result<Vec<ObjectId>> {
        let fail = |detail: String| Error::Extraction(format!("página {}: {}", index + 1, detail));

        let contents = match page.get(b"Contents") {
            Ok(contents) => contents,
            Err(_) => return Ok(Vec::new()),
        };
        let items = match contents {
            Object::Reference(id) => {
                let target = self.doc.get_object(*id).map_err(|e| fail(e.to_string()))?;
                match target {
                    Object::Array(items) => items.as_slice(),
                    _ => std::slice::from_ref(contents),
                }
            }
            Object::Array(items) => items.as_slice(),
            _ => return Err(fail("/Contents no es un flujo".to_string())),
        };

        let mut ids = Vec::with_capacity(items.len());
        for item in items {
            let id = item.as_reference().map_err(|e| fail(e.to_string()))?;
            self.doc
                .get_object(id)
                .and_then(Object::as_stream)
                .map_err(|e| fail(format!("flujo de contenido {} {}: {}", id.0, id.1, e)))?;
            ids.push(id);
        }
        Ok(ids)
    }

    fn info_dict(&self) -> Option<&Dictionary> {
        let info = self.doc.trailer.get(b"Info").ok()?;
        self.resolve_dict(info)
    }
}

impl PdfBackend for LopdfBackend {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_text(&self, index: usize) -> Result<String> {
        let page_id = *self.pages.get(index).ok_or_else(|| {
            Error::Extraction(format!(
                "página {} fuera de rango ({} páginas)",
                index + 1,
                self.pages.len()
            ))
        })?;

        let page = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::Extraction(format!("página {}: {}", index + 1, e)))?;
        // A page without a content stream is blank, not broken.
        if self.content_streams(page, index)?.is_empty() {
            return Ok(String::new());
        }

        self.doc
            .extract_text(&[index as u32 + 1])
            .map_err(|e| Error::Extraction(format!("página {}: {}", index + 1, e)))
    }

    fn info_string(&self, key: &[u8]) -> Option<String> {
        let value = match self.info_dict()?.get(key).ok()? {
            Object::String(bytes, _) => decode_pdf_string(bytes),
            Object::Name(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            _ => return None,
        };
        let value = value.trim();
        if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        }
    }

    fn is_marked(&self) -> Result<bool> {
        let catalog = self
            .doc
            .catalog()
            .map_err(|e| Error::Extraction(format!("catálogo ilegible: {}", e)))?;
        let Ok(mark_info) = catalog.get(b"MarkInfo") else {
            return Ok(false);
        };
        let mark_info = self
            .resolve_dict(mark_info)
            .ok_or_else(|| Error::Extraction("MarkInfo no es un diccionario".to_string()))?;
        match mark_info.get(b"Marked") {
            Ok(marked) => marked
                .as_bool()
                .map_err(|_| Error::Extraction("MarkInfo/Marked no es booleano".to_string())),
            Err(_) => Ok(false),
        }
    }

    fn version(&self) -> String {
        self.doc.version.to_string()
    }

    fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    fn byte_len(&self) -> u64 {
        self.byte_len
    }
}
