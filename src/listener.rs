//! Script event-listener inspection.
//!
//! Event listeners (`script:event-listener`) bind scripts to document
//! events such as `dom:load`, which is how macros get to run on open.
//! Embedded objects (`draw:object`) carry their own content stream, so the
//! inspection follows their `xlink:href` into the same archive.

use crate::container::{content_path, OdfContainer};
use crate::error::Error;
use crate::namespace::{qualify, Namespaces};
use crate::options::ScanOptions;
use crate::report::{Event, Outcome, Reporter};
use crate::xml::{self, Element};
use std::collections::HashSet;

/// Summary of an event-listener inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Inspection {
    /// Outcome for the starting content stream and everything below it.
    pub outcome: Outcome,
    /// Number of event listeners reported.
    pub listeners: usize,
    /// Number of content streams entered.
    pub streams: usize,
}

/// Walks the content streams of a packaged document.
///
/// Each resolved member is entered at most once, so reference cycles
/// between embedded objects terminate.
pub struct Inspector<'a> {
    container: &'a mut OdfContainer,
    options: &'a ScanOptions,
    reporter: &'a mut dyn Reporter,
    visited: HashSet<String>,
    listeners: usize,
}

impl<'a> Inspector<'a> {
    /// Create an inspector over `container` that reports to `reporter`.
    pub fn new(
        container: &'a mut OdfContainer,
        options: &'a ScanOptions,
        reporter: &'a mut dyn Reporter,
    ) -> Self {
        Self {
            container,
            options,
            reporter,
            visited: HashSet::new(),
            listeners: 0,
        }
    }

    /// Inspect the content stream of `dir`, starting at the archive root
    /// for an empty `dir`.
    pub fn run(mut self, dir: &str) -> Inspection {
        let outcome = self.inspect(dir, 0);
        Inspection {
            outcome,
            listeners: self.listeners,
            streams: self.visited.len(),
        }
    }

    fn inspect(&mut self, dir: &str, depth: usize) -> Outcome {
        let member = content_path(dir);
        if self.visited.contains(&member) {
            tracing::debug!("{} already inspected, not descending again", member);
            return Outcome::NotFound;
        }
        if depth > self.options.max_depth {
            self.reporter.report(Event::DepthLimit { member, depth });
            return Outcome::NotApplicable;
        }
        self.visited.insert(member.clone());

        self.reporter.report(Event::Entering {
            member: member.clone(),
            depth,
        });

        let raw = match self.container.read_xml(&member) {
            Ok(raw) => raw,
            Err(Error::MissingComponent(_)) => {
                self.reporter.report(Event::MissingMember { member, depth });
                return Outcome::NotApplicable;
            }
            Err(e) => {
                tracing::debug!("cannot read {}: {}", member, e);
                self.reporter.report(Event::Corrupted {
                    member: Some(member),
                });
                return Outcome::Corrupted;
            }
        };
        let root = match xml::parse(&raw) {
            Ok(root) => root,
            Err(e) => {
                tracing::debug!("{} does not parse: {}", member, e);
                self.reporter.report(Event::Corrupted {
                    member: Some(member),
                });
                return Outcome::Corrupted;
            }
        };

        let ns = Namespaces::scan(&raw);
        if ns.office.is_none() {
            self.reporter.report(Event::Exiting { member, depth });
            return Outcome::NotApplicable;
        }

        let before = self.listeners;
        self.listeners += report_listeners(&root, &ns, depth + 1, self.reporter);

        if self.options.follow_objects {
            if let (Some(draw), Some(xlink)) = (&ns.draw, &ns.xlink) {
                let href_key = qualify(xlink, "href");
                for object in root.find_all(&qualify(draw, "object")) {
                    let Some(href) = object.attribute(&href_key) else {
                        tracing::debug!("draw:object without xlink:href in {}", member);
                        continue;
                    };
                    self.inspect(&format!("{}/{}", dir, href), depth + 1);
                }
            }
        }

        self.reporter.report(Event::Exiting { member, depth });
        if self.listeners > before {
            Outcome::Found
        } else {
            Outcome::NotFound
        }
    }
}

/// Inspect a flat document, which has a single content stream and no
/// embedded object streams.
pub fn inspect_flat(raw: &str, name: &str, reporter: &mut dyn Reporter) -> Inspection {
    let member = name.to_string();
    reporter.report(Event::Entering {
        member: member.clone(),
        depth: 0,
    });

    let mut inspection = Inspection {
        outcome: Outcome::NotFound,
        listeners: 0,
        streams: 1,
    };

    let root = match xml::parse(raw) {
        Ok(root) => root,
        Err(e) => {
            tracing::debug!("{} does not parse: {}", name, e);
            reporter.report(Event::Corrupted { member: None });
            inspection.outcome = Outcome::Corrupted;
            return inspection;
        }
    };

    let ns = Namespaces::scan(raw);
    if ns.office.is_some() {
        inspection.listeners = report_listeners(&root, &ns, 1, reporter);
        if inspection.listeners > 0 {
            inspection.outcome = Outcome::Found;
        }
    } else {
        inspection.outcome = Outcome::NotApplicable;
    }

    reporter.report(Event::Exiting { member, depth: 0 });
    inspection
}

fn report_listeners(
    root: &Element,
    ns: &Namespaces,
    depth: usize,
    reporter: &mut dyn Reporter,
) -> usize {
    let Some(script) = &ns.script else {
        return 0;
    };
    let listeners = root.find_all(&qualify(script, "event-listener"));
    for listener in &listeners {
        reporter.report(Event::EventListener {
            depth,
            attributes: listener.attributes.clone(),
        });
    }
    listeners.len()
}
