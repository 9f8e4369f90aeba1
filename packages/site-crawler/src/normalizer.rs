//! URL normalization.
//!
//! Two URLs that normalize equal are the same crawl target. Normalization
//! strips the fragment and query and removes a trailing slash from non-root
//! paths.

use url::Url;

/// Normalize a URL to a canonical form.
///
/// Malformed input is returned unchanged rather than failing: crawling has
/// to tolerate garbage links, and a bad URL is filtered downstream instead.
/// Idempotent.
pub fn normalize(raw: &str) -> String {
    let mut url = match Url::parse(raw) {
        Ok(url) => url,
        Err(_) => return raw.to_string(),
    };

    url.set_fragment(None);
    url.set_query(None);

    let path = url.path().to_string();
    if path != "/" && path.ends_with('/') {
        url.set_path(&path[..path.len() - 1]);
    }

    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_fragment_and_query() {
        assert_eq!(
            normalize("https://example.com/page?utm=1#section"),
            "https://example.com/page"
        );
        assert_eq!(
            normalize("https://example.com/docs#intro"),
            "https://example.com/docs"
        );
    }

    #[test]
    fn test_strips_trailing_slash_from_non_root_paths() {
        assert_eq!(
            normalize("https://example.com/about/"),
            "https://example.com/about"
        );
        // Root path keeps its slash
        assert_eq!(normalize("https://example.com/"), "https://example.com/");
        assert_eq!(normalize("https://example.com"), "https://example.com/");
    }

    #[test]
    fn test_idempotent() {
        let urls = [
            "https://example.com/a/b/?q=1#frag",
            "https://docs.example.com/guide/",
            "not a url at all",
            "https://example.com",
        ];
        for url in urls {
            let once = normalize(url);
            assert_eq!(normalize(&once), once, "not idempotent for {url}");
        }
    }

    #[test]
    fn test_malformed_input_returned_unchanged() {
        assert_eq!(normalize("::garbage::"), "::garbage::");
        assert_eq!(normalize(""), "");
    }
}
