use chrono::{DateTime, Utc};

pub(crate) const URL_DISPLAY_MAX: usize = 50;

fn truncate_chars(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let cut: String = s.chars().take(max_len).collect();
        format!("{cut}...")
    } else {
        s.to_string()
    }
}

/// `host + path`, cut to `max_len` characters with a trailing `...`.
/// Unparseable input is cut the same way as-is.
pub(crate) fn format_url(raw: &str, max_len: usize) -> String {
    match url::Url::parse(raw) {
        Ok(parsed) => {
            let short = format!("{}{}", parsed.host_str().unwrap_or_default(), parsed.path());
            truncate_chars(&short, max_len)
        }
        Err(_) => truncate_chars(raw, max_len),
    }
}

pub(crate) fn format_created_date(created_at: &DateTime<Utc>) -> String {
    created_at.format("%b %-d, %Y").to_string()
}

pub(crate) fn bookmark_count_label(n: usize) -> String {
    match n {
        0 => "No bookmarks yet".to_string(),
        1 => "1 bookmark".to_string(),
        n => format!("{n} bookmarks"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_url_short_keeps_host_and_path() {
        assert_eq!(format_url("https://docs.example.com/guide", 50), "docs.example.com/guide");
        assert_eq!(format_url("https://example.com", 50), "example.com/");
    }

    #[test]
    fn test_format_url_drops_query_and_fragment() {
        assert_eq!(format_url("https://example.com/a?b=1#c", 50), "example.com/a");
    }

    #[test]
    fn test_format_url_long_is_cut_to_fifty_plus_ellipsis() {
        let out = format_url(
            "https://www.example.com/a/very/long/path/that/exceeds/fifty/characters/total",
            URL_DISPLAY_MAX,
        );
        assert_eq!(out, "www.example.com/a/very/long/path/that/exceeds/fift...");
        assert_eq!(out.trim_end_matches("...").chars().count(), 50);
    }

    #[test]
    fn test_format_url_unparseable_falls_back_to_raw() {
        assert_eq!(format_url("not a url", 50), "not a url");
        let raw = "x".repeat(60);
        assert_eq!(format_url(&raw, 50), format!("{}...", "x".repeat(50)));
    }

    #[test]
    fn test_format_url_exactly_at_limit_is_kept() {
        let path = "p".repeat(50 - "example.com/".len());
        let url = format!("https://example.com/{path}");
        assert_eq!(format_url(&url, 50).chars().count(), 50);
    }

    #[test]
    fn test_count_label() {
        assert_eq!(bookmark_count_label(0), "No bookmarks yet");
        assert_eq!(bookmark_count_label(1), "1 bookmark");
        assert_eq!(bookmark_count_label(7), "7 bookmarks");
    }

    #[test]
    fn test_created_date_badge() {
        let t = Utc.with_ymd_and_hms(2024, 3, 5, 23, 0, 0).unwrap();
        assert_eq!(format_created_date(&t), "Mar 5, 2024");
    }
}
