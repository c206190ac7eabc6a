use std::borrow::Cow;

use url::form_urlencoded;

use crate::Params;

/// Maximum number of bytes of a body that end up in a log line.
const TRUNCATE_LIMIT: usize = 256;

/// Normalises an API path: collapses repeated separators, resolves `.` and `..`,
/// drops any trailing slash and guarantees exactly one leading slash.
pub(crate) fn clean_path(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }
    format!("/{}", parts.join("/"))
}

/// Joins a path onto the base URL. Fully qualified URLs are returned unchanged.
pub(crate) fn make_url(base: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    format!("{}{}", base.trim_end_matches('/'), clean_path(path))
}

pub(crate) fn encode_form(params: &Params) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter())
        .finish()
}

/// Percent-encodes a caller-supplied id or name for use as one path segment.
/// `/`, `?` and `#` are escaped, so the value cannot leave its segment.
pub(crate) fn segment(value: &str) -> Cow<'_, str> {
    urlencoding::encode(value)
}

/// `http://host/img.png` -> `host/img.png`; the purge endpoint takes host and path only.
pub(crate) fn strip_scheme(url: &str) -> &str {
    url.split_once("://").map_or(url, |(_, rest)| rest)
}

/// Host and path of a URL to purge. Separators and trailing slashes are kept
/// as given; `?` and `#` are escaped so they stay part of the target.
pub(crate) fn purge_target(url: &str) -> String {
    strip_scheme(url).replace('?', "%3F").replace('#', "%23")
}

fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        s.len()
    } else {
        let mut i = index;
        while i > 0 && !s.is_char_boundary(i) {
            i -= 1;
        }
        i
    }
}

pub(crate) fn truncate_for_log(s: &str) -> String {
    if s.len() <= TRUNCATE_LIMIT {
        s.to_string()
    } else {
        format!(
            "{}... [truncated, total {} bytes]",
            &s[..floor_char_boundary(s, TRUNCATE_LIMIT)],
            s.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_path_adds_leading_slash() {
        assert_eq!(clean_path("service"), "/service");
        assert_eq!(clean_path("/service"), "/service");
    }

    #[test]
    fn clean_path_collapses_separators() {
        assert_eq!(clean_path("/service/abc//version"), "/service/abc/version");
        assert_eq!(clean_path("/service/abc/./domain/"), "/service/abc/domain");
        assert_eq!(clean_path("/service/abc/x/../version"), "/service/abc/version");
        assert_eq!(clean_path(""), "/");
    }

    #[test]
    fn make_url_joins_base() {
        assert_eq!(
            make_url("https://api.fastly.com/", "service//abc"),
            "https://api.fastly.com/service/abc"
        );
        assert_eq!(
            make_url("http://127.0.0.1:8080", "/login"),
            "http://127.0.0.1:8080/login"
        );
    }

    #[test]
    fn make_url_passes_absolute_urls_through() {
        assert_eq!(
            make_url("https://api.fastly.com", "https://other.example/x"),
            "https://other.example/x"
        );
    }

    #[test]
    fn encode_form_escapes_values() {
        let params = Params::from([
            ("comment".to_string(), "a b&c".to_string()),
            ("name".to_string(), "svc".to_string()),
        ]);
        assert_eq!(encode_form(&params), "comment=a+b%26c&name=svc");
    }

    #[test]
    fn strip_scheme_removes_protocol() {
        assert_eq!(strip_scheme("http://localhost/img.png"), "localhost/img.png");
        assert_eq!(strip_scheme("www.example.com/a"), "www.example.com/a");
    }

    #[test]
    fn segment_escapes_separators() {
        assert_eq!(segment("example.com"), "example.com");
        assert_eq!(segment("../purge_all"), "..%2Fpurge_all");
        assert_eq!(segment("a#b?c=d"), "a%23b%3Fc%3Dd");
        assert_eq!(segment("two words"), "two%20words");
    }

    #[test]
    fn purge_target_keeps_path_shape() {
        assert_eq!(purge_target("http://example.com/dir/"), "example.com/dir/");
        assert_eq!(purge_target("https://example.com/a?b=1#top"), "example.com/a%3Fb=1%23top");
    }

    #[test]
    fn truncate_for_log_limits_length() {
        assert_eq!(truncate_for_log("short"), "short");
        let long = "a".repeat(TRUNCATE_LIMIT + 10);
        let out = truncate_for_log(&long);
        assert!(out.ends_with(&format!("total {} bytes]", TRUNCATE_LIMIT + 10)));
        let wide = "é".repeat(200);
        assert!(truncate_for_log(&wide).contains("[truncated"));
    }
}
