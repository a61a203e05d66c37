//! # odsec
//!
//! Static triage of OpenDocument files for embedded macros and script
//! event listeners.
//!
//! Both packaged (`.odt`, `.ods`, ...) and flat (`.fodt`, `.fods`, ...)
//! documents are supported. The scan reports where macro-capable constructs
//! live; it does not judge whether they are malicious.
//!
//! ## Quick Start
//!
//! ```no_run
//! use odsec::{scan_file, CollectingReporter};
//!
//! let mut reporter = CollectingReporter::new();
//! let report = scan_file("document.odt", &mut reporter)?;
//! if report.has_macros() {
//!     for line in reporter.lines() {
//!         println!("{}", line);
//!     }
//! }
//! # Ok::<(), odsec::Error>(())
//! ```
//!
//! ## Custom options
//!
//! ```no_run
//! use odsec::{ScanOptions, Scanner, TracingReporter};
//!
//! let scanner = Scanner::new(ScanOptions::new().with_max_depth(8));
//! let report = scanner.scan("document.odt", &mut TracingReporter)?;
//! println!("{} event listener(s)", report.listener_count());
//! # Ok::<(), odsec::Error>(())
//! ```

pub mod container;
pub mod error;
pub mod listener;
pub mod macros;
pub mod namespace;
pub mod options;
pub mod report;
pub mod scan;
pub mod xml;

// Re-exports
pub use container::{content_path, OdfContainer};
pub use error::{Error, Result};
pub use listener::{inspect_flat, Inspection, Inspector};
pub use options::ScanOptions;
pub use report::{CollectingReporter, Event, Outcome, Reporter, Severity, TracingReporter};
pub use scan::{Document, DocumentKind, ScanReport, Scanner};

use std::path::Path;

/// Scan a document with default options.
///
/// # Example
///
/// ```no_run
/// use odsec::{scan_file, TracingReporter};
///
/// let report = scan_file("document.fodt", &mut TracingReporter)?;
/// println!("macros: {}", report.has_macros());
/// # Ok::<(), odsec::Error>(())
/// ```
pub fn scan_file(path: impl AsRef<Path>, reporter: &mut dyn Reporter) -> Result<ScanReport> {
    Scanner::default().scan(path, reporter)
}
