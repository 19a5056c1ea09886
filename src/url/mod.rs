//! URL handling for Site-Mirror
//!
//! This module provides the crawl-scope origin check, file-extension
//! extraction, and the mapping from URLs to local filesystem paths.

mod path_map;

pub use path_map::PathMapper;

use url::Url;

/// Returns true when two URLs share scheme, host, and port exactly.
///
/// Subdomains do not match: `sub.example.com` is a different origin from
/// `example.com` even though the base is a suffix. This mirrors the crawl
/// scope rule — only the seed's exact origin is mirrored.
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && a.host_str() == b.host_str()
        && a.port_or_known_default() == b.port_or_known_default()
}

/// Extracts the lowercase file extension (with leading dot) from a URL path.
///
/// Returns `None` when the last path segment has no extension. A segment
/// consisting only of a dot-prefixed name (`/.well-known`) counts as having
/// no extension.
pub fn extract_extension(url: &Url) -> Option<String> {
    let segment = url.path().rsplit('/').next().unwrap_or("");
    let (stem, ext) = segment.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(format!(".{}", ext.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_same_origin_exact_match() {
        assert!(same_origin(
            &parse("https://example.com/a"),
            &parse("https://example.com/b")
        ));
    }

    #[test]
    fn test_same_origin_rejects_other_host() {
        assert!(!same_origin(
            &parse("https://example.com/"),
            &parse("https://other.com/")
        ));
    }

    #[test]
    fn test_same_origin_rejects_subdomain() {
        assert!(!same_origin(
            &parse("https://sub.example.com/"),
            &parse("https://example.com/")
        ));
    }

    #[test]
    fn test_same_origin_rejects_scheme_mismatch() {
        assert!(!same_origin(
            &parse("http://example.com/"),
            &parse("https://example.com/")
        ));
    }

    #[test]
    fn test_same_origin_rejects_port_mismatch() {
        assert!(!same_origin(
            &parse("http://example.com:8080/"),
            &parse("http://example.com/")
        ));
    }

    #[test]
    fn test_same_origin_default_port_matches_explicit() {
        assert!(same_origin(
            &parse("https://example.com:443/"),
            &parse("https://example.com/")
        ));
    }

    #[test]
    fn test_extract_extension_lowercases() {
        assert_eq!(
            extract_extension(&parse("https://example.com/Logo.PNG")),
            Some(".png".to_string())
        );
    }

    #[test]
    fn test_extract_extension_none_for_directory() {
        assert_eq!(extract_extension(&parse("https://example.com/docs/")), None);
    }

    #[test]
    fn test_extract_extension_none_for_bare_segment() {
        assert_eq!(extract_extension(&parse("https://example.com/about")), None);
    }

    #[test]
    fn test_extract_extension_ignores_query() {
        assert_eq!(
            extract_extension(&parse("https://example.com/app.js?v=2")),
            Some(".js".to_string())
        );
    }

    #[test]
    fn test_extract_extension_dot_prefixed_segment() {
        assert_eq!(
            extract_extension(&parse("https://example.com/.well-known")),
            None
        );
    }

    #[test]
    fn test_extract_extension_takes_last_dot() {
        assert_eq!(
            extract_extension(&parse("https://example.com/archive.tar.gz")),
            Some(".gz".to_string())
        );
    }
}
