//! Fixtures shared by the unit and scenario tests.

use std::io::Write;

use tempfile::NamedTempFile;
use tracing_subscriber::EnvFilter;

/// Route `tracing` output to the test harness. Safe to call repeatedly.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_test_writer()
        .try_init();
}

/// A package file holding `body` inside a `<mime-info>` root.
pub fn package(body: &str) -> NamedTempFile {
    raw_package(&format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<mime-info xmlns="http://www.freedesktop.org/standards/shared-mime-info">
{body}
</mime-info>
"#
    ))
}

/// A package file holding exactly `contents`.
pub fn raw_package(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".xml")
        .tempfile()
        .expect("create package fixture");
    file.write_all(contents.as_bytes()).expect("write package fixture");
    file
}

/// OLE2 compound document signature.
pub const OLE_MAGIC: &[u8] = b"\xd0\xcf\x11\xe0\xa1\xb1\x1a\xe1";

/// A small freedesktop-style package: OLE storage with Word as a subclass,
/// PNG, a compressed tarball and a couple of text types.
pub const OFFICE_PACKAGE: &str = r#"
  <mime-type type="application/x-ole-storage">
    <comment>OLE2 compound document storage</comment>
    <magic priority="50">
      <match type="string" value="\320\317\021\340\241\261\032\341" offset="0"/>
    </magic>
  </mime-type>
  <mime-type type="application/msword">
    <comment>Word document</comment>
    <comment xml:lang="de">Word-Dokument</comment>
    <sub-class-of type="application/x-ole-storage"/>
    <alias type="application/vnd.ms-word"/>
    <generic-icon name="x-office-document"/>
    <glob pattern="*.doc"/>
  </mime-type>
  <mime-type type="image/png">
    <comment>PNG image</comment>
    <acronym>PNG</acronym>
    <expanded-acronym>Portable Network Graphics</expanded-acronym>
    <magic priority="50">
      <match type="string" value="\x89PNG" offset="0"/>
    </magic>
    <glob pattern="*.png"/>
  </mime-type>
  <mime-type type="application/x-bzip-compressed-tar">
    <comment>Tar archive (bzip-compressed)</comment>
    <glob pattern="*.tar.bz2"/>
    <glob pattern="*.tbz2"/>
  </mime-type>
  <mime-type type="text/x-makefile">
    <comment>Makefile</comment>
    <glob pattern="Makefile" case-sensitive="true"/>
    <glob pattern="*.mk"/>
  </mime-type>
  <mime-type type="image/svg+xml">
    <comment>SVG image</comment>
    <root-XML namespaceURI="http://www.w3.org/2000/svg" localName="svg"/>
    <glob pattern="*.svg"/>
  </mime-type>
"#;
