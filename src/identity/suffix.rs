//! Structured syntax suffixes (RFC 6839 and later registrations).

use phf::phf_map;

/// Suffix tag to the media type that describes the underlying syntax.
static SUFFIXES: phf::Map<&'static str, &'static str> = phf_map! {
    "xml" => "application/xml",
    "json" => "application/json",
    "ber" => "application/ber-stream",
    "der" => "application/der-stream",
    "fastinfoset" => "application/fastinfoset",
    "wbxml" => "application/vnd.wap.wbxml",
    "zip" => "application/zip",
    "gzip" => "application/gzip",
    "cbor" => "application/cbor",
    "cbor-seq" => "application/cbor-seq",
    "json-seq" => "application/json-seq",
    "jwt" => "application/jwt",
    "sqlite3" => "application/vnd.sqlite3",
    "yaml" => "application/yaml",
    "zstd" => "application/zstd",
};

/// The syntax type a known suffix tag stands for.
#[inline]
pub fn syntax_type(tag: &str) -> Option<&'static str> {
    SUFFIXES.get(tag).copied()
}

/// Whether `tag` is a registered structured syntax suffix.
#[inline]
pub fn is_known_suffix(tag: &str) -> bool {
    SUFFIXES.contains_key(tag)
}
