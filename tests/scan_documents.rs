//! End-to-end scans of synthetic OpenDocument files.
//!
//! Every fixture is built in a temporary directory, so the suite needs no
//! test corpus on disk.

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use odsec::{CollectingReporter, DocumentKind, Error, Event, Outcome, Scanner, Severity};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

const OFFICE_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:office:1.0";
const SCRIPT_NS: &str = "urn:oasis:names:tc:opendocument:xmlns:script:1.0";

fn zip_bytes(parts: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, body) in parts {
        writer.start_file(*name, stored).unwrap();
        writer.write_all(body.as_bytes()).unwrap();
    }
    writer.finish().unwrap().into_inner()
}

fn write_fixture(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, data).unwrap();
    path
}

fn content(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-content xmlns:office="{}" xmlns:script="{}" xmlns:draw="urn:oasis:names:tc:opendocument:xmlns:drawing:1.0" xmlns:xlink="http://www.w3.org/1999/xlink" office:version="1.3">
  <office:body>
    <office:text>{}</office:text>
  </office:body>
</office:document-content>"#,
        OFFICE_NS, SCRIPT_NS, body
    )
}

const LISTENER: &str = r#"<script:event-listener script:language="ooo:script" script:event-name="dom:load" xlink:href="vnd.sun.star.script:Standard.Module1.Main?language=Basic&amp;location=document" xlink:type="simple"/>"#;

const MIMETYPE: (&str, &str) = ("mimetype", "application/vnd.oasis.opendocument.text");

fn listeners(reporter: &CollectingReporter) -> Vec<&Event> {
    reporter
        .events
        .iter()
        .filter(|e| matches!(e, Event::EventListener { .. }))
        .collect()
}

#[test]
fn test_clean_package_skips_listener_inspection() {
    let dir = tempfile::tempdir().unwrap();
    let data = zip_bytes(&[
        MIMETYPE,
        ("content.xml", &content(LISTENER)),
        ("styles.xml", "<office:document-styles/>"),
    ]);
    let path = write_fixture(dir.path(), "clean.odt", &data);

    let mut reporter = CollectingReporter::new();
    let report = Scanner::default().scan(&path, &mut reporter).unwrap();

    assert_eq!(report.kind, DocumentKind::Packaged);
    assert_eq!(report.macros, Outcome::NotFound);
    assert!(report.listeners.is_none());
    assert!(listeners(&reporter).is_empty());
    assert_eq!(reporter.with_severity(Severity::Critical).count(), 0);
    assert_eq!(
        reporter.lines(),
        vec![
            format!("> Parsing OpenDocument {}", path.display()),
            format!("> Closing OpenDocument {}", path.display()),
        ]
    );
}

#[test]
fn test_script_member_and_listener() {
    let dir = tempfile::tempdir().unwrap();
    let data = zip_bytes(&[
        MIMETYPE,
        ("content.xml", &content(LISTENER)),
        ("Scripts/python/Module1.py", "def main(): pass\n"),
    ]);
    let path = write_fixture(dir.path(), "scripted.odt", &data);

    let mut reporter = CollectingReporter::new();
    let report = Scanner::default().scan(&path, &mut reporter).unwrap();

    assert!(report.has_macros());
    assert_eq!(report.listener_count(), 1);

    let lines = reporter.lines();
    assert_eq!(lines[1], "> This OpenDocument contains macro !");
    assert_eq!(lines[2], "  > Scripts/python/Module1.py");
    assert_eq!(lines[3], "> Entering in content.xml");

    let found = listeners(&reporter);
    assert_eq!(found.len(), 1);
    match found[0] {
        Event::EventListener { depth, attributes } => {
            assert_eq!(*depth, 1);
            assert_eq!(attributes.len(), 4);
            assert_eq!(
                attributes[1],
                (format!("{{{}}}event-name", SCRIPT_NS), "dom:load".to_string())
            );
        }
        _ => unreachable!(),
    }
}

#[test]
fn test_basic_library_member() {
    let dir = tempfile::tempdir().unwrap();
    let data = zip_bytes(&[
        MIMETYPE,
        ("content.xml", &content("")),
        ("Basic/script-lc.xml", "<library:libraries/>"),
        ("Basic/Standard/Module1.xml", "<script:module/>"),
    ]);
    let path = write_fixture(dir.path(), "basic.odt", &data);

    let mut reporter = CollectingReporter::new();
    let report = Scanner::default().scan(&path, &mut reporter).unwrap();

    assert!(report.has_macros());
    let listeners = report.listeners.unwrap();
    assert_eq!(listeners.outcome, Outcome::NotFound);
    assert!(reporter.events.contains(&Event::MacroMember {
        path: "Basic/Standard/Module1.xml".to_string()
    }));
    let banners = reporter
        .events
        .iter()
        .filter(|e| matches!(e, Event::MacroBanner { .. }))
        .count();
    assert_eq!(banners, 1);
}

#[test]
fn test_nested_object_listener_is_indented() {
    let dir = tempfile::tempdir().unwrap();
    let data = zip_bytes(&[
        MIMETYPE,
        (
            "content.xml",
            &content(
                r#"<text:p xmlns:text="urn:text"><draw:frame><draw:object xlink:href="./Object 1" xlink:type="simple" xlink:show="embed" xlink:actuate="onLoad"/></draw:frame></text:p>"#,
            ),
        ),
        ("Object 1/content.xml", &content(LISTENER)),
        ("Basic/Standard/Module1.xml", "<script:module/>"),
    ]);
    let path = write_fixture(dir.path(), "nested.odt", &data);

    let mut reporter = CollectingReporter::new();
    let report = Scanner::default().scan(&path, &mut reporter).unwrap();

    let inspection = report.listeners.unwrap();
    assert_eq!(inspection.outcome, Outcome::Found);
    assert_eq!(inspection.streams, 2);

    let found = listeners(&reporter);
    assert_eq!(found.len(), 1);
    // Top-level listeners sit at depth 1, the nested stream one deeper.
    assert_eq!(found[0].depth(), 2);
    assert!(found[0].to_string().starts_with("    > Found event listener: {"));
    assert!(reporter
        .lines()
        .contains(&"  > Exiting Object 1/content.xml".to_string()));
}

#[test]
fn test_flat_document_with_embedded_library() {
    let dir = tempfile::tempdir().unwrap();
    let flat = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document xmlns:office="{}" xmlns:script="{}" xmlns:ooo="http://openoffice.org/2004/office" xmlns:xlink="http://www.w3.org/1999/xlink" office:mimetype="application/vnd.oasis.opendocument.text">
  <office:scripts>
    <office:script script:language="ooo:Basic">
      <ooo:libraries>
        <ooo:library-embedded ooo:name="Standard"/>
      </ooo:libraries>
    </office:script>
    <office:event-listeners>{}</office:event-listeners>
  </office:scripts>
</office:document>"#,
        OFFICE_NS, SCRIPT_NS, LISTENER
    );
    let path = write_fixture(dir.path(), "macro.fodt", flat.as_bytes());

    let mut reporter = CollectingReporter::new();
    let report = Scanner::default().scan(&path, &mut reporter).unwrap();

    assert_eq!(report.kind, DocumentKind::Flat);
    assert!(report.has_macros());
    assert_eq!(report.listener_count(), 1);

    let lines = reporter.lines();
    assert_eq!(lines[0], format!("> Parsing Flat OpenDocument {}", path.display()));
    assert_eq!(lines[1], "> This Flat OpenDocument contains macro !");
    assert_eq!(lines[2], "  > [Standard]");
    assert_eq!(lines[3], format!("> Entering in {}", path.display()));
    assert_eq!(
        lines.last().unwrap(),
        &format!("> Closing Flat OpenDocument {}", path.display())
    );
}

#[test]
fn test_corrupted_flat_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(
        dir.path(),
        "broken.fodt",
        br#"<?xml version="1.0"?><office:document xmlns:office="urn:office"><office:body></office:document>"#,
    );

    let mut reporter = CollectingReporter::new();
    let report = Scanner::default().scan(&path, &mut reporter).unwrap();

    assert_eq!(report.macros, Outcome::Corrupted);
    assert!(!report.has_macros());
    assert!(report.listeners.is_none());
    assert!(reporter.lines().contains(&"This file seems corrupted".to_string()));
}

#[test]
fn test_missing_input() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.odt");

    let mut reporter = CollectingReporter::new();
    let result = Scanner::default().scan(&path, &mut reporter);

    assert!(matches!(result, Err(Error::NotAFile(_))));
    assert_eq!(
        reporter.events,
        vec![Event::NotAFile { path: path.clone() }]
    );
}

#[test]
fn test_self_referencing_object() {
    let dir = tempfile::tempdir().unwrap();
    let data = zip_bytes(&[
        ("content.xml", &content(r#"<draw:object xlink:href="./"/>"#)),
        ("Basic/Standard/Module1.xml", "<script:module/>"),
    ]);
    let path = write_fixture(dir.path(), "cycle.odt", &data);

    let mut reporter = CollectingReporter::new();
    let report = Scanner::default().scan(&path, &mut reporter).unwrap();

    assert_eq!(report.listeners.unwrap().streams, 1);
    let entered = reporter
        .events
        .iter()
        .filter(|e| matches!(e, Event::Entering { .. }))
        .count();
    assert_eq!(entered, 1);
}
