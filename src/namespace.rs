//! Namespace lookup over raw content text.
//!
//! OpenDocument does not fix the prefixes it uses, so the namespace bound
//! to `office`, `script` and friends is looked up from the `xmlns:*`
//! declarations instead of being hard-coded. The lookup is a plain token
//! scan rather than an XML attribute parse: it relies on the declarations
//! sitting on the root element, which every OpenDocument producer does.
//! A declared value containing `"` is not supported.

/// Declaration key of the office namespace.
pub const OFFICE: &str = "xmlns:office";
/// Declaration key of the script namespace.
pub const SCRIPT: &str = "xmlns:script";
/// Declaration key of the drawing namespace.
pub const DRAW: &str = "xmlns:draw";
/// Declaration key of the XLink namespace.
pub const XLINK: &str = "xmlns:xlink";
/// Declaration key of the OpenOffice.org extension namespace.
pub const OOO: &str = "xmlns:ooo";

/// Look up the value declared for `key` (e.g. `xmlns:office`) in `content`.
///
/// The text is split on whitespace and the first token starting with
/// `key=` wins. Its value is whatever sits between the last two double
/// quotes of the token, so a trailing `>` or `/>` is ignored.
///
/// # Example
///
/// ```
/// use odsec::namespace::lookup;
///
/// let raw = r#"<office:document xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0">"#;
/// assert_eq!(
///     lookup(raw, "xmlns:office"),
///     Some("urn:oasis:names:tc:opendocument:xmlns:office:1.0")
/// );
/// assert_eq!(lookup(raw, "xmlns:script"), None);
/// ```
pub fn lookup<'a>(content: &'a str, key: &str) -> Option<&'a str> {
    content
        .split_whitespace()
        .find(|token| {
            token
                .strip_prefix(key)
                .is_some_and(|rest| rest.starts_with('='))
        })
        .and_then(last_quoted)
}

/// Value between the last pair of double quotes in `token`.
fn last_quoted(token: &str) -> Option<&str> {
    let end = token.rfind('"')?;
    let start = token[..end].rfind('"')?;
    Some(&token[start + 1..end])
}

/// Namespace URIs of one content stream, resolved once up front.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Namespaces {
    /// `office` namespace; its absence means "not OpenDocument content".
    pub office: Option<String>,
    /// `script` namespace.
    pub script: Option<String>,
    /// `draw` namespace.
    pub draw: Option<String>,
    /// `xlink` namespace.
    pub xlink: Option<String>,
    /// OpenOffice.org extension namespace.
    pub ooo: Option<String>,
}

impl Namespaces {
    /// Resolve every well-known namespace declared in `content`.
    pub fn scan(content: &str) -> Self {
        let find = |key| lookup(content, key).map(String::from);
        Self {
            office: find(OFFICE),
            script: find(SCRIPT),
            draw: find(DRAW),
            xlink: find(XLINK),
            ooo: find(OOO),
        }
    }
}

/// Build a qualified `{uri}local` name.
pub fn qualify(namespace: &str, local: &str) -> String {
    format!("{{{}}}{}", namespace, local)
}
