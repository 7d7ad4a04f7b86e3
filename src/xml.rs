//! Streaming XML event source
//!
//! Documents are consumed SAX-style: [`drive`] pulls events from a
//! `quick_xml::Reader` and pushes them into an [`XmlHandler`]. Element names
//! are delivered as local names (namespace prefixes stripped), and
//! self-closing elements produce a start immediately followed by an end.

use crate::error::{Error, Result};
use quick_xml::Reader;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};
use std::io::BufRead;

/// Default buffer capacity for XML parsing (4KB)
const XML_BUFFER_CAPACITY: usize = 4096;

/// Receiver of streaming XML events
pub trait XmlHandler {
    /// Called once before the first element
    fn start_document(&mut self) -> Result<()> {
        Ok(())
    }

    /// Called once after the last element
    fn end_document(&mut self) -> Result<()> {
        Ok(())
    }

    /// An element opened
    fn start_element(&mut self, name: &str, attrs: &Attributes) -> Result<()>;

    /// An element closed
    fn end_element(&mut self, name: &str) -> Result<()>;

    /// Character data inside the current element
    fn characters(&mut self, text: &str) -> Result<()> {
        let _ = text;
        Ok(())
    }
}

/// Extract local name from potentially namespaced XML name
///
/// - `"m:colorgroup"` returns `"colorgroup"`
/// - `"xml:lang"` returns `"lang"`
/// - `"object"` returns `"object"`
pub fn get_local_name(name: &str) -> &str {
    match name.rfind(':') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

/// Attributes of one element, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    /// Create an empty attribute set
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect and unescape the attributes of a start tag
    pub fn from_start(e: &BytesStart) -> Result<Self> {
        let mut attrs = Self::new();
        for attr in e.attributes() {
            let attr = attr?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| Error::InvalidXml(e.to_string()))?;
            let raw = std::str::from_utf8(&attr.value)
                .map_err(|e| Error::InvalidXml(e.to_string()))?;
            let value = unescape(raw).map_err(|e| {
                Error::XmlAttr(format!("Invalid escape in attribute '{}': {}", key, e))
            })?;
            attrs.insert(key, value);
        }
        Ok(attrs)
    }

    /// Add an attribute
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Look up an attribute by qualified name, falling back to its local name
    ///
    /// `get("lang")` finds `xml:lang`. The first matching attribute wins.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|(key, _)| get_local_name(key) == name)
            })
            .map(|(_, value)| value.as_str())
    }

    /// Look up an attribute that the element cannot do without
    pub fn required(&self, element: &str, name: &str) -> Result<&str> {
        self.get(name)
            .ok_or_else(|| Error::missing_attribute(element, name))
    }

    /// Parse a required, finite floating-point coordinate
    pub fn parse_coordinate(&self, element: &str, name: &str) -> Result<f32> {
        let raw = self.required(element, name)?;
        let invalid = |expected: &str| {
            Error::parse_error_with_context(&format!("{} {}", element, name), raw, expected)
        };
        let value = raw
            .trim()
            .parse::<f32>()
            .map_err(|_| invalid("floating-point number"))?;
        if !value.is_finite() {
            return Err(invalid("finite floating-point number"));
        }
        Ok(value)
    }

    /// Parse a required non-negative integer index
    pub fn parse_index(&self, element: &str, name: &str) -> Result<u32> {
        let raw = self.required(element, name)?;
        raw.trim().parse::<u32>().map_err(|_| {
            Error::parse_error_with_context(
                &format!("{} {}", element, name),
                raw,
                "non-negative integer",
            )
        })
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the element has no attributes
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(qualified name, value)` pairs
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Self::new();
        for (key, value) in iter {
            attrs.insert(key, value);
        }
        attrs
    }
}

fn element_name(e: &BytesStart) -> Result<String> {
    let name = e.name();
    let name_str =
        std::str::from_utf8(name.as_ref()).map_err(|e| Error::InvalidXml(e.to_string()))?;
    Ok(get_local_name(name_str).to_string())
}

fn resolve_reference(name: &str) -> Option<String> {
    if let Some(code) = name.strip_prefix('#') {
        let value = match code.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => code.parse::<u32>().ok()?,
        };
        return char::from_u32(value).map(String::from);
    }
    resolve_predefined_entity(name).map(str::to_string)
}

/// Feed every event of `reader` into `handler`
///
/// DTD declarations are rejected before any of their content is processed.
pub fn drive<R, H>(mut reader: Reader<R>, handler: &mut H) -> Result<()>
where
    R: BufRead,
    H: XmlHandler + ?Sized,
{
    reader.config_mut().trim_text(false);
    let mut buf = Vec::with_capacity(XML_BUFFER_CAPACITY);

    handler.start_document()?;
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = element_name(e)?;
                let attrs = Attributes::from_start(e)?;
                handler.start_element(&name, &attrs)?;
            }
            Ok(Event::Empty(ref e)) => {
                let name = element_name(e)?;
                let attrs = Attributes::from_start(e)?;
                handler.start_element(&name, &attrs)?;
                handler.end_element(&name)?;
            }
            Ok(Event::End(ref e)) => {
                let name = e.name();
                let name_str = std::str::from_utf8(name.as_ref())
                    .map_err(|e| Error::InvalidXml(e.to_string()))?;
                handler.end_element(get_local_name(name_str))?;
            }
            Ok(Event::Text(ref t)) => {
                let text = std::str::from_utf8(t).map_err(|e| Error::InvalidXml(e.to_string()))?;
                if !text.is_empty() {
                    handler.characters(text)?;
                }
            }
            Ok(Event::CData(ref t)) => {
                let text = std::str::from_utf8(t).map_err(|e| Error::InvalidXml(e.to_string()))?;
                handler.characters(text)?;
            }
            Ok(Event::GeneralRef(ref r)) => {
                let name = std::str::from_utf8(r).map_err(|e| Error::InvalidXml(e.to_string()))?;
                let resolved = resolve_reference(name).ok_or_else(|| {
                    Error::InvalidXml(format!("Unknown entity reference '&{};'", name))
                })?;
                handler.characters(&resolved)?;
            }
            Ok(Event::DocType(_)) => {
                // DTD declarations can lead to XXE (XML External Entity) attacks
                return Err(Error::InvalidXml(
                    "DTD declarations are not allowed in 3MF files for security reasons"
                        .to_string(),
                ));
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Xml(e)),
            _ => {}
        }
        buf.clear();
    }
    handler.end_document()
}
