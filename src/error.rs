//! Error types for 3MF importing
//!
//! All errors include error codes for categorization.
//!
//! # Error Codes
//!
//! Error codes follow the pattern: `E<category><number>`
//!
//! Categories:
//! - **E1xxx**: I/O, archive and staging errors
//! - **E2xxx**: XML parsing and package structure errors
//! - **E3xxx**: Model errors (numeric formats, units, references)
//! - **E4xxx**: Unsupported inputs
//! - **E5xxx**: Content sink errors
//!
//! ## Common Error Codes
//!
//! - `E1001`: I/O error reading or writing a file
//! - `E1002`: ZIP archive format error
//! - `E1003`: Missing required file in the package
//! - `E1004`: No unique staging directory could be created
//! - `E1005`: Import failed because of an I/O-category error (wraps the cause)
//! - `E1006`: A package part could not be read (wraps the cause)
//! - `E2001`: XML parsing error
//! - `E2002`: XML attribute error
//! - `E2003`: Invalid XML structure
//! - `E2004`: Invalid 3MF package
//! - `E3001`: Invalid model structure
//! - `E3002`: Numeric parse error
//! - `E3003`: Unknown unit of measurement
//! - `E4001`: Unsupported input
//! - `E5001`: Content sink failure

use std::io;
use thiserror::Error;

/// Result type for 3MF import operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when importing 3MF files
#[derive(Error, Debug)]
pub enum Error {
    /// IO error occurred while reading or writing a file
    ///
    /// **Error Code**: E1001
    #[error("[E1001] I/O error: {0}")]
    Io(#[from] io::Error),

    /// ZIP archive error
    ///
    /// **Error Code**: E1002
    ///
    /// **Common Causes**:
    /// - Corrupted ZIP file
    /// - Unsupported compression method
    /// - Truncated archive
    #[error("[E1002] ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Missing required file in the staged package
    ///
    /// **Error Code**: E1003
    ///
    /// **Common Causes**:
    /// - Package has no `_rels/.rels`
    /// - The model relationship targets a part that is not in the archive
    #[error("[E1003] Missing required file: {0}")]
    MissingFile(String),

    /// Every attempt at creating a uniquely named staging directory collided
    ///
    /// **Error Code**: E1004
    #[error("[E1004] Failed to create a staging directory under '{root}' after {attempts} attempts")]
    StagingExhausted {
        /// Parent directory the staging directory was created in
        root: String,
        /// Number of names tried
        attempts: usize,
    },

    /// An I/O-category failure during an import, tagged with the source URL
    ///
    /// **Error Code**: E1005
    #[error("[E1005] Failed to import '{url}': {source}")]
    Import {
        /// The URL or path that was being imported
        url: String,
        /// The original cause
        #[source]
        source: Box<Error>,
    },

    /// A package part exists but its content could not be read
    ///
    /// **Error Code**: E1006
    ///
    /// **Common Causes**:
    /// - Truncated or malformed `_rels/.rels`
    #[error("[E1006] Failed to read package part '{part}': {source}")]
    UnreadablePart {
        /// Path of the part inside the package
        part: String,
        /// The original cause
        #[source]
        source: Box<Error>,
    },

    /// XML parsing error
    ///
    /// **Error Code**: E2001
    ///
    /// **Common Causes**:
    /// - Malformed XML syntax
    /// - Invalid character encoding
    /// - Unclosed tags
    #[error("[E2001] XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// XML attribute error
    ///
    /// **Error Code**: E2002
    #[error("[E2002] XML attribute error: {0}")]
    XmlAttr(String),

    /// Invalid XML structure
    ///
    /// **Error Code**: E2003
    ///
    /// **Common Causes**:
    /// - Missing required attributes
    /// - DTD declarations
    /// - Invalid enumeration values
    #[error("[E2003] Invalid XML structure: {0}")]
    InvalidXml(String),

    /// Invalid 3MF package
    ///
    /// **Error Code**: E2004
    ///
    /// **Common Causes**:
    /// - No relationship of the 3D model type in `_rels/.rels`
    /// - Document has no `model` root element
    #[error("[E2004] Invalid 3MF format: {0}")]
    InvalidFormat(String),

    /// Invalid model structure
    ///
    /// **Error Code**: E3001
    ///
    /// **Common Causes**:
    /// - A build item references an object id that no resource declares
    #[error("[E3001] Invalid model: {0}")]
    InvalidModel(String),

    /// Parse error for numeric values
    ///
    /// **Error Code**: E3002
    ///
    /// **Suggestions**:
    /// - Verify numeric values use proper format (e.g., "1.5" not "1,5")
    /// - Check for special characters or extra whitespace
    #[error("[E3002] Parse error: {0}")]
    ParseError(String),

    /// Unit of measurement outside the supported set
    ///
    /// **Error Code**: E3003
    ///
    /// Supported units are micron, millimeter, centimeter, inch, foot and meter.
    #[error("[E3003] Unknown unit '{0}'. Must be one of: micron, millimeter, centimeter, inch, foot, meter")]
    UnknownUnit(String),

    /// Unsupported input
    ///
    /// **Error Code**: E4001
    ///
    /// **Common Causes**:
    /// - Importing from a non-file URL (`http:`, `ftp:`, ...)
    #[error("[E4001] Unsupported input: {0}")]
    Unsupported(String),

    /// A content sink rejected a call
    ///
    /// **Error Code**: E5001
    #[error("[E5001] Content sink error: {0}")]
    Sink(String),
}

impl From<std::num::ParseFloatError> for Error {
    fn from(err: std::num::ParseFloatError) -> Self {
        Error::ParseError(format!("Failed to parse floating-point number: {}", err))
    }
}

impl From<std::num::ParseIntError> for Error {
    fn from(err: std::num::ParseIntError) -> Self {
        Error::ParseError(format!("Failed to parse integer: {}", err))
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlAttr(format!("Attribute parsing failed: {}", err))
    }
}

impl Error {
    /// Create an InvalidXml error for a missing required attribute
    ///
    /// # Example
    /// ```ignore
    /// Error::missing_attribute("vertex", "x")
    /// ```
    pub fn missing_attribute(element: &str, attribute: &str) -> Self {
        Error::InvalidXml(format!(
            "Element '<{}>' is missing required attribute '{}'",
            element, attribute
        ))
    }

    /// Create an InvalidFormat error with context about what structure is invalid
    pub fn invalid_format_context(context: &str, message: &str) -> Self {
        Error::InvalidFormat(format!("{}: {}", context, message))
    }

    /// Create a ParseError with context about what was being parsed
    ///
    /// # Arguments
    /// * `field_name` - The name of the field being parsed (e.g., "vertex x coordinate")
    /// * `value` - The value that failed to parse
    /// * `expected_type` - The expected type (e.g., "floating-point number")
    pub fn parse_error_with_context(field_name: &str, value: &str, expected_type: &str) -> Self {
        Error::ParseError(format!(
            "Failed to parse '{}': expected {}, got '{}'",
            field_name, expected_type, value
        ))
    }

    /// Wrap an error with the package part it was raised for
    pub fn unreadable_part(part: impl Into<String>, source: Error) -> Self {
        Error::UnreadablePart {
            part: part.into(),
            source: Box::new(source),
        }
    }

    /// Wrap an error with the URL of the import it aborted
    pub fn import(url: impl Into<String>, source: Error) -> Self {
        Error::Import {
            url: url.into(),
            source: Box::new(source),
        }
    }

    /// Whether this error belongs to the I/O and archive category (E1xxx)
    pub fn is_io(&self) -> bool {
        matches!(
            self,
            Error::Io(_)
                | Error::Zip(_)
                | Error::MissingFile(_)
                | Error::StagingExhausted { .. }
                | Error::Import { .. }
                | Error::UnreadablePart { .. }
        )
    }
}
