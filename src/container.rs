//! ZIP container abstraction for packaged OpenDocument files.

use crate::error::{Error, Result};
use std::io::{Cursor, Read};
use std::sync::Arc;

/// Name of the content stream inside a package directory.
pub const CONTENT_XML: &str = "content.xml";

/// Resolve a package directory reference to the path of its content stream.
///
/// `/./` segments collapse to `/` and a single leading `/` is dropped; the
/// archive root maps to `content.xml` and any other directory `dir` maps to
/// `dir/content.xml`. Nested references are built as `<dir>/<href>` and fed
/// back through this function.
///
/// # Example
///
/// ```
/// use odsec::container::content_path;
///
/// assert_eq!(content_path(""), "content.xml");
/// assert_eq!(content_path("/./Object 1"), "Object 1/content.xml");
/// ```
pub fn content_path(dir: &str) -> String {
    let mut path = dir.replace("/./", "/");
    while path.contains("/./") {
        path = path.replace("/./", "/");
    }
    let path = path.strip_prefix('/').unwrap_or(&path);
    if path.is_empty() {
        CONTENT_XML.to_string()
    } else {
        format!("{}/{}", path, CONTENT_XML)
    }
}

/// Decode XML bytes, honouring UTF-8 and UTF-16 byte order marks.
///
/// Content streams are UTF-8 in practice. Anything that is not valid UTF-8
/// and carries no BOM is decoded lossily so the namespace scan still sees
/// the ASCII declarations.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    match bytes {
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8(rest.to_vec())
            .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e))),
        [0xFF, 0xFE, rest @ ..] => {
            decode_utf16(rest, u16::from_le_bytes).map(|s| fix_xml_encoding_declaration(&s))
        }
        [0xFE, 0xFF, rest @ ..] => {
            decode_utf16(rest, u16::from_be_bytes).map(|s| fix_xml_encoding_declaration(&s))
        }
        _ => Ok(String::from_utf8(bytes.to_vec())
            .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())),
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Result<String> {
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Rewrite a UTF-16 encoding declaration once the text is already UTF-8,
/// otherwise quick-xml would try to decode it a second time.
fn fix_xml_encoding_declaration(content: &str) -> String {
    if let Some(end_decl) = content.strip_prefix("<?xml").and(content.find("?>")) {
        let (decl, rest) = content.split_at(end_decl + 2);
        let fixed = decl
            .replace("\"UTF-16\"", "\"UTF-8\"")
            .replace("'UTF-16'", "'UTF-8'")
            .replace("\"utf-16\"", "\"UTF-8\"")
            .replace("'utf-16'", "'UTF-8'");
        return format!("{}{}", fixed, rest);
    }
    content.to_string()
}

/// Packaged OpenDocument container over a ZIP archive.
///
/// The archive reads from shared bytes, so a caller that fails to open a
/// container can still use the same buffer as a flat document.
pub struct OdfContainer {
    archive: zip::ZipArchive<Cursor<Arc<[u8]>>>,
}

impl OdfContainer {
    /// Create a container from the bytes of a ZIP archive.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use odsec::container::OdfContainer;
    ///
    /// let container = OdfContainer::from_bytes(std::fs::read("report.odt")?)?;
    /// println!("{} members", container.list_files().len());
    /// # Ok::<(), odsec::Error>(())
    /// ```
    pub fn from_bytes(data: impl Into<Arc<[u8]>>) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(data.into()))?;
        Ok(Self { archive })
    }

    /// Read an XML member as a string.
    pub fn read_xml(&mut self, path: &str) -> Result<String> {
        let bytes = self.read_binary(path)?;
        decode_xml_bytes(&bytes)
    }

    /// Read a member's raw bytes.
    pub fn read_binary(&mut self, path: &str) -> Result<Vec<u8>> {
        let mut file = self
            .archive
            .by_name(path)
            .map_err(|_| Error::MissingComponent(path.to_string()))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// List all member names, in central directory order.
    pub fn list_files(&self) -> Vec<String> {
        self.archive.file_names().map(String::from).collect()
    }
}

impl std::fmt::Debug for OdfContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OdfContainer")
            .field("files", &self.archive.len())
            .finish()
    }
}
