//! Reporting interface for scan findings and progress.
//!
//! Every component receives a [`Reporter`] instead of writing to a global
//! logger, so the destination of the advisory report is chosen by the
//! caller: the CLI forwards to `tracing`, tests collect events in memory.

use std::fmt;
use std::path::PathBuf;

/// Severity of a reported event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Progress through the document (entering, exiting, banners).
    Warning,
    /// Findings and corruption notices.
    Critical,
}

/// Result of one detection step.
///
/// `NotApplicable` and `Corrupted` both read as "nothing found" in the
/// report, but stay distinct so callers can tell an inconclusive scan from
/// a clean one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// At least one macro-capable construct was found.
    Found,
    /// The stream was inspected and nothing was found.
    NotFound,
    /// The expected namespace is not declared, so nothing was inspected.
    NotApplicable,
    /// The stream is not well-formed XML.
    Corrupted,
}

impl Outcome {
    /// Whether anything was found.
    pub fn is_found(self) -> bool {
        self == Outcome::Found
    }
}

/// A single reported event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Input path is missing or not a regular file.
    NotAFile { path: PathBuf },
    /// Input refused before scanning: too large, or an unsupported archive layout.
    Refused { detail: String },
    /// Scan of a document starts.
    Parsing { path: PathBuf, flat: bool },
    /// Scan of a document ends.
    Closing { path: PathBuf, flat: bool },
    /// Document contains macros; emitted once before the indicators.
    MacroBanner { flat: bool },
    /// Archive member holding Basic or script code.
    MacroMember { path: String },
    /// Embedded Basic libraries of a flat document.
    EmbeddedLibraries { libraries: Vec<String> },
    /// Inspection of a content stream starts.
    Entering { member: String, depth: usize },
    /// Inspection of a content stream ends.
    Exiting { member: String, depth: usize },
    /// Script bound to a document event.
    EventListener {
        depth: usize,
        attributes: Vec<(String, String)>,
    },
    /// A content stream is not well-formed XML.
    Corrupted { member: Option<String> },
    /// An embedded object points at a member the archive does not have.
    MissingMember { member: String, depth: usize },
    /// An embedded object was not followed because of the nesting limit.
    DepthLimit { member: String, depth: usize },
}

impl Event {
    /// Severity the event is reported with.
    pub fn severity(&self) -> Severity {
        match self {
            Event::Parsing { .. }
            | Event::Closing { .. }
            | Event::Entering { .. }
            | Event::Exiting { .. }
            | Event::DepthLimit { .. } => Severity::Warning,
            Event::NotAFile { .. }
            | Event::Refused { .. }
            | Event::MacroBanner { .. }
            | Event::MacroMember { .. }
            | Event::EmbeddedLibraries { .. }
            | Event::EventListener { .. }
            | Event::Corrupted { .. }
            | Event::MissingMember { .. } => Severity::Critical,
        }
    }

    /// Nesting depth, zero for document-level events.
    pub fn depth(&self) -> usize {
        match self {
            Event::Entering { depth, .. }
            | Event::Exiting { depth, .. }
            | Event::EventListener { depth, .. }
            | Event::MissingMember { depth, .. }
            | Event::DepthLimit { depth, .. } => *depth,
            _ => 0,
        }
    }
}

struct Indent(usize);

impl fmt::Display for Indent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:width$}", "", width = self.0 * 2)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indent = Indent(self.depth());
        let kind = |flat: &bool| if *flat { "Flat OpenDocument" } else { "OpenDocument" };
        match self {
            Event::NotAFile { path } => write!(f, "{} is not a file...", path.display()),
            Event::Refused { detail } => f.write_str(detail),
            Event::Parsing { path, flat } => {
                write!(f, "> Parsing {} {}", kind(flat), path.display())
            }
            Event::Closing { path, flat } => {
                write!(f, "> Closing {} {}", kind(flat), path.display())
            }
            Event::MacroBanner { flat } => write!(f, "> This {} contains macro !", kind(flat)),
            Event::MacroMember { path } => write!(f, "  > {}", path),
            Event::EmbeddedLibraries { libraries } => {
                write!(f, "  > [{}]", libraries.join(", "))
            }
            Event::Entering { member, .. } => write!(f, "{}> Entering in {}", indent, member),
            Event::Exiting { member, .. } => write!(f, "{}> Exiting {}", indent, member),
            Event::EventListener { attributes, .. } => {
                write!(f, "{}> Found event listener: {{", indent)?;
                for (i, (key, value)) in attributes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}={:?}", key, value)?;
                }
                f.write_str("}")
            }
            Event::Corrupted { member: None } => f.write_str("This file seems corrupted"),
            Event::Corrupted {
                member: Some(member),
            } => write!(f, "This file seems corrupted ({})", member),
            Event::MissingMember { member, .. } => {
                write!(f, "{}> Embedded object {} is missing", indent, member)
            }
            Event::DepthLimit { member, .. } => {
                write!(f, "{}> Not following {}: nesting limit reached", indent, member)
            }
        }
    }
}

/// Sink for scan events.
pub trait Reporter {
    /// Record one event.
    fn report(&mut self, event: Event);
}

impl<R: Reporter + ?Sized> Reporter for &mut R {
    fn report(&mut self, event: Event) {
        (**self).report(event)
    }
}

/// Forwards events to `tracing`: warnings as `warn!`, findings as `error!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&mut self, event: Event) {
        match event.severity() {
            Severity::Warning => tracing::warn!("{}", event),
            Severity::Critical => tracing::error!("{}", event),
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default, Clone)]
pub struct CollectingReporter {
    /// Events in report order.
    pub events: Vec<Event>,
}

impl CollectingReporter {
    /// Create an empty reporter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rendered lines, in report order.
    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(ToString::to_string).collect()
    }

    /// Events of the given severity.
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Event> {
        self.events.iter().filter(move |e| e.severity() == severity)
    }
}

impl Reporter for CollectingReporter {
    fn report(&mut self, event: Event) {
        self.events.push(event);
    }
}
