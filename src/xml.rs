//! Minimal namespace-aware element tree for content streams.
//!
//! Element and attribute names are stored fully qualified as
//! `{namespace-uri}local-name`, or as the bare local name when no namespace
//! applies. Text content is not kept: detection only looks at structure and
//! attributes.

use crate::error::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::NsReader;

/// A parsed XML element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Qualified element name.
    pub name: String,
    /// Attributes in document order, keys qualified like element names.
    /// Namespace declarations are not included.
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order.
    pub children: Vec<Element>,
}

impl Element {
    /// Get an attribute value by qualified name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Find every descendant named `name`, in document order.
    pub fn find_all(&self, name: &str) -> Vec<&Element> {
        find_rec(self, name, Vec::new())
    }
}

/// Elements nested deeper than this are rejected by [`parse`].
pub const MAX_NESTING: usize = 1024;

/// Depth-first search below `node` for elements named `name`.
///
/// Matches are appended to `result` in document order and the accumulator
/// is returned. The node itself is never matched; every child is searched
/// whether it matched or not.
pub fn find_rec<'a>(node: &'a Element, name: &str, mut result: Vec<&'a Element>) -> Vec<&'a Element> {
    // One child iterator per open level, so the walk uses heap, not stack.
    let mut pending = vec![node.children.iter()];
    while let Some(children) = pending.last_mut() {
        match children.next() {
            Some(child) => {
                if child.name == name {
                    result.push(child);
                }
                pending.push(child.children.iter());
            }
            None => {
                pending.pop();
            }
        }
    }
    result
}

/// Parse `content` into an element tree and return its root.
///
/// Fails on malformed markup, unbound prefixes, elements nested deeper than
/// [`MAX_NESTING`], or a document that does not have exactly one root
/// element.
pub fn parse(content: &str) -> Result<Element> {
    let mut reader = NsReader::from_str(content);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if stack.is_empty() && root.is_some() {
                    return Err(Error::XmlParse("multiple root elements".to_string()));
                }
                if stack.len() >= MAX_NESTING {
                    return Err(Error::XmlParse("nesting too deep".to_string()));
                }
                stack.push(start_element(&reader, &e)?);
            }
            Event::Empty(e) => {
                let element = start_element(&reader, &e)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None if root.is_none() => root = Some(element),
                    None => {
                        return Err(Error::XmlParse("multiple root elements".to_string()));
                    }
                }
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::XmlParse("unexpected closing tag".to_string()))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => root = Some(element),
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::XmlParse(format!("unclosed element {}", open.name)));
    }
    root.ok_or_else(|| Error::XmlParse("no root element".to_string()))
}

fn start_element(reader: &NsReader<&[u8]>, e: &BytesStart) -> Result<Element> {
    let (resolved, local) = reader.resolve_element(e.name());
    let name = qualified(resolved, local.as_ref())?;

    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let (resolved, local) = reader.resolve_attribute(attr.key);
        let key = qualified(resolved, local.as_ref())?;
        let value = attr.unescape_value()?.into_owned();
        attributes.push((key, value));
    }

    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
    })
}

fn qualified(resolved: ResolveResult, local: &[u8]) -> Result<String> {
    let local = String::from_utf8_lossy(local);
    match resolved {
        ResolveResult::Bound(ns) => Ok(format!(
            "{{{}}}{}",
            String::from_utf8_lossy(ns.as_ref()),
            local
        )),
        ResolveResult::Unbound => Ok(local.into_owned()),
        ResolveResult::Unknown(prefix) => Err(Error::XmlParse(format!(
            "unbound prefix {}",
            String::from_utf8_lossy(&prefix)
        ))),
    }
}
