use crate::models::Header;

/// Headers that set cookies, matched by name case-insensitively. Feeds both
/// the Cookies tab badge and the cookie viewer.
pub fn get_set_cookie_headers(headers: &[Header]) -> Vec<&Header> {
    headers
        .iter()
        .filter(|header| header.name.eq_ignore_ascii_case("set-cookie"))
        .collect()
}

/// Infers a file extension for the download action from a content type,
/// ignoring any parameters after the media-type essence.
pub fn extension_for_content_type(content_type: &str) -> Option<String> {
    let essence = content_type.split(';').next().unwrap_or_default().trim();

    mime_guess::get_mime_extensions_str(essence)
        .and_then(|extensions| extensions.first())
        .map(|extension| extension.to_string())
}

pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

pub fn format_elapsed(milliseconds: u64) -> String {
    if milliseconds >= 1000 {
        format!("{:.2} s", milliseconds as f64 / 1000.0)
    } else {
        format!("{} ms", milliseconds)
    }
}

/// Round-trips text through serde_json to get an indented rendition. Returns
/// None when the text is not valid JSON so callers can fall back to source.
pub fn pretty_print_json(text: &str) -> Option<String> {
    let value = serde_json::from_str::<serde_json::Value>(text).ok()?;

    serde_json::to_string_pretty(&value).ok()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn set_cookie_headers_match_case_insensitively() {
        let headers = vec![
            Header::new("Content-Type", "text/html"),
            Header::new("Set-Cookie", "a=1"),
            Header::new("set-cookie", "b=2"),
            Header::new("SET-COOKIE", "c=3"),
            Header::new("X-Set-Cookie", "nope"),
        ];

        let cookies = get_set_cookie_headers(&headers);

        assert_eq!(cookies.len(), 3);
        assert_eq!(cookies[0].value, "a=1");
        assert_eq!(cookies[2].value, "c=3");
    }

    #[test]
    fn extension_comes_from_the_media_type_essence() {
        assert_eq!(
            extension_for_content_type("application/json; charset=utf-8"),
            Some("json".to_string())
        );
        assert_eq!(extension_for_content_type("not-a-type"), None);
        assert_eq!(extension_for_content_type(""), None);
    }

    #[test]
    fn formats_byte_counts() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }

    #[test]
    fn formats_elapsed_times() {
        assert_eq!(format_elapsed(524), "524 ms");
        assert_eq!(format_elapsed(1511), "1.51 s");
    }

    #[test]
    fn pretty_print_rejects_invalid_json() {
        assert_eq!(pretty_print_json("{nope"), None);

        let pretty = pretty_print_json(r#"{"a":1}"#).unwrap();
        assert_eq!(pretty, "{\n  \"a\": 1\n}");
    }

}
