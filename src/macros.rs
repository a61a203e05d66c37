//! Macro detection.
//!
//! Packaged documents keep Basic libraries under `Basic/` and other script
//! languages under `Scripts/`, so the member names are enough. Flat
//! documents embed their Basic libraries inline as `ooo:library-embedded`
//! elements.

use crate::container::OdfContainer;
use crate::namespace::{self, qualify};
use crate::report::{Event, Outcome, Reporter};
use crate::xml;

/// Member path markers of stored macros.
pub const MACRO_MARKERS: [&str; 2] = ["Basic/", "Scripts/"];

/// Whether an archive member holds macro code.
pub fn is_macro_member(path: &str) -> bool {
    MACRO_MARKERS.iter().any(|marker| path.contains(marker))
}

/// Report every macro member of a packaged document.
///
/// The banner is emitted once, right before the first member.
pub fn detect_packaged(container: &OdfContainer, reporter: &mut dyn Reporter) -> Outcome {
    let mut outcome = Outcome::NotFound;
    for path in container.list_files() {
        if !is_macro_member(&path) {
            continue;
        }
        if outcome == Outcome::NotFound {
            reporter.report(Event::MacroBanner { flat: false });
            outcome = Outcome::Found;
        }
        reporter.report(Event::MacroMember { path });
    }
    outcome
}

/// Report the embedded Basic libraries of a flat document.
///
/// Returns `NotApplicable` when the document does not declare the `ooo`
/// namespace, in which case no search is made.
pub fn detect_flat(raw: &str, reporter: &mut dyn Reporter) -> Outcome {
    let root = match xml::parse(raw) {
        Ok(root) => root,
        Err(e) => {
            tracing::debug!("flat document does not parse: {}", e);
            reporter.report(Event::Corrupted { member: None });
            return Outcome::Corrupted;
        }
    };

    let Some(ooo) = namespace::lookup(raw, namespace::OOO) else {
        tracing::debug!("no ooo namespace declared, skipping embedded library search");
        return Outcome::NotApplicable;
    };

    let libraries = root.find_all(&qualify(ooo, "library-embedded"));
    if libraries.is_empty() {
        return Outcome::NotFound;
    }

    let name_key = qualify(ooo, "name");
    let libraries = libraries
        .iter()
        .map(|lib| lib.attribute(&name_key).unwrap_or(&lib.name).to_string())
        .collect();
    reporter.report(Event::MacroBanner { flat: true });
    reporter.report(Event::EmbeddedLibraries { libraries });
    Outcome::Found
}
