//! Document classification and the top-level scan.

use crate::container::{decode_xml_bytes, OdfContainer};
use crate::error::{Error, Result};
use crate::listener::{inspect_flat, Inspection, Inspector};
use crate::macros;
use crate::options::ScanOptions;
use crate::report::{Event, Outcome, Reporter};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Packaging of an OpenDocument file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// ZIP package (`.odt`, `.ods`, `.odp`, ...).
    Packaged,
    /// Single XML file (`.fodt`, `.fods`, `.fodp`, ...).
    Flat,
}

impl DocumentKind {
    /// Returns a human-readable name for this kind.
    pub fn name(&self) -> &'static str {
        match self {
            DocumentKind::Packaged => "OpenDocument",
            DocumentKind::Flat => "Flat OpenDocument",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// An opened document.
#[derive(Debug)]
pub enum Document {
    /// ZIP package.
    Packaged(OdfContainer),
    /// Flat XML document text.
    Flat(String),
}

impl Document {
    /// Open `path`, classifying it as packaged or flat.
    ///
    /// The file is read once; anything that is not a ZIP archive is taken to
    /// be a flat document. Files above [`ScanOptions::max_file_size`] are
    /// refused before they are read, whatever their packaging.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use odsec::{Document, DocumentKind, ScanOptions};
    ///
    /// let doc = Document::open("report.fodt", &ScanOptions::default())?;
    /// assert_eq!(doc.kind(), DocumentKind::Flat);
    /// # Ok::<(), odsec::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>, options: &ScanOptions) -> Result<Self> {
        let path = path.as_ref();
        let metadata = match fs::metadata(path) {
            Ok(metadata) if metadata.is_file() => metadata,
            _ => return Err(Error::NotAFile(path.to_path_buf())),
        };
        if metadata.len() > options.max_file_size {
            return Err(Error::FileTooLarge {
                size: metadata.len(),
                limit: options.max_file_size,
            });
        }

        let data: Arc<[u8]> = fs::read(path)?.into();
        match OdfContainer::from_bytes(Arc::clone(&data)) {
            Ok(container) => Ok(Document::Packaged(container)),
            Err(Error::ZipArchive(reason)) => {
                tracing::debug!("{} is not a zip archive ({})", path.display(), reason);
                Ok(Document::Flat(decode_xml_bytes(&data)?))
            }
            Err(e) => Err(e),
        }
    }

    /// Packaging of this document.
    pub fn kind(&self) -> DocumentKind {
        match self {
            Document::Packaged(_) => DocumentKind::Packaged,
            Document::Flat(_) => DocumentKind::Flat,
        }
    }
}

/// Result of scanning one document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanReport {
    /// Packaging of the scanned document.
    pub kind: DocumentKind,
    /// Macro detection outcome.
    pub macros: Outcome,
    /// Event-listener inspection, only run when macros were found.
    pub listeners: Option<Inspection>,
}

impl ScanReport {
    /// Whether the document contains macros.
    pub fn has_macros(&self) -> bool {
        self.macros.is_found()
    }

    /// Number of event listeners reported.
    pub fn listener_count(&self) -> usize {
        self.listeners.map_or(0, |inspection| inspection.listeners)
    }
}

/// Runs macro detection followed by event-listener inspection.
#[derive(Debug, Clone, Default)]
pub struct Scanner {
    options: ScanOptions,
}

impl Scanner {
    /// Create a scanner with the given options.
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    /// Scan the document at `path`.
    ///
    /// Only failures to open the input are errors; they are reported before
    /// being returned. Finding macros is not an error.
    pub fn scan(&self, path: impl AsRef<Path>, reporter: &mut dyn Reporter) -> Result<ScanReport> {
        let path = path.as_ref();
        let document = match Document::open(path, &self.options) {
            Ok(document) => document,
            Err(e) => {
                reporter.report(fatal_event(path, &e));
                return Err(e);
            }
        };

        let report = match document {
            Document::Flat(raw) => self.scan_flat(path, &raw, reporter),
            Document::Packaged(container) => self.scan_packaged(path, container, reporter),
        };
        Ok(report)
    }

    fn scan_flat(&self, path: &Path, raw: &str, reporter: &mut dyn Reporter) -> ScanReport {
        reporter.report(Event::Parsing {
            path: path.to_path_buf(),
            flat: true,
        });
        let macros = macros::detect_flat(raw, reporter);
        let listeners = macros
            .is_found()
            .then(|| inspect_flat(raw, &path.display().to_string(), reporter));
        reporter.report(Event::Closing {
            path: path.to_path_buf(),
            flat: true,
        });

        ScanReport {
            kind: DocumentKind::Flat,
            macros,
            listeners,
        }
    }

    fn scan_packaged(
        &self,
        path: &Path,
        mut container: OdfContainer,
        reporter: &mut dyn Reporter,
    ) -> ScanReport {
        reporter.report(Event::Parsing {
            path: path.to_path_buf(),
            flat: false,
        });
        let macros = macros::detect_packaged(&container, reporter);
        let listeners = macros
            .is_found()
            .then(|| Inspector::new(&mut container, &self.options, reporter).run(""));
        reporter.report(Event::Closing {
            path: path.to_path_buf(),
            flat: false,
        });

        ScanReport {
            kind: DocumentKind::Packaged,
            macros,
            listeners,
        }
    }
}

/// Event reported for an input that cannot be scanned at all.
fn fatal_event(path: &Path, err: &Error) -> Event {
    match err {
        Error::NotAFile(_) => Event::NotAFile {
            path: path.to_path_buf(),
        },
        Error::FileTooLarge { .. } | Error::UnsupportedArchive(_) => Event::Refused {
            detail: err.to_string(),
        },
        _ => Event::Corrupted { member: None },
    }
}
