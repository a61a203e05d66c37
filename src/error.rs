//! Error types for the odsec library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for odsec operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while scanning a document.
///
/// Only the first four variants abort a scan. XML and missing-member
/// errors are handled locally by the inspection branch that hit them.
#[derive(Error, Debug)]
pub enum Error {
    /// The input path does not exist or is not a regular file.
    #[error("{} is not a file...", .0.display())]
    NotAFile(PathBuf),

    /// The input file exceeds the configured size limit.
    #[error("File is too large: {size} bytes exceeds the {limit} byte limit")]
    FileTooLarge {
        /// Size of the file on disk.
        size: u64,
        /// Configured limit.
        limit: u64,
    },

    /// The archive uses a layout the ZIP reader does not support.
    #[error("Unsupported archive: {0}")]
    UnsupportedArchive(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error reading ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// A referenced archive member is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            zip::result::ZipError::UnsupportedArchive(msg) => {
                Error::UnsupportedArchive(msg.to_string())
            }
            other => Error::ZipArchive(other.to_string()),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        Error::XmlParse(err.to_string())
    }
}
