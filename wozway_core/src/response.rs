//! Status code and content type matching for response handling.

use http::StatusCode;

/// `true` when `status` matches one of `codes`.
///
/// Patterns: an exact code (`"404"`), a range (`"4XX"`) or `"default"`.
pub fn match_status_codes(codes: &[&str], status: StatusCode) -> bool {
    let actual = status.as_u16().to_string();
    codes.iter().any(|code| {
        if code.eq_ignore_ascii_case("default") {
            return true;
        }
        if code.len() == 3 && code.get(1..).is_some_and(|r| r.eq_ignore_ascii_case("xx")) {
            return actual.as_bytes().first() == code.as_bytes().first();
        }
        *code == actual
    })
}

/// `true` when a response `content_type` satisfies the declared `pattern`.
///
/// Parameters are ignored; an empty content type counts as `text/plain`.
/// `pattern` may be `*`, `*/*`, `type/*` or `*/subtype`.
pub fn match_content_type(content_type: &str, pattern: &str) -> bool {
    let actual = essence(content_type);
    let actual = if actual.is_empty() {
        "text/plain".to_string()
    } else {
        actual
    };
    let pattern = essence(pattern);
    if pattern == "*" || pattern == "*/*" || pattern == actual {
        return true;
    }
    let Some((p_type, p_sub)) = pattern.split_once('/') else {
        return false;
    };
    let Some((a_type, a_sub)) = actual.split_once('/') else {
        return false;
    };
    (p_sub == "*" && p_type == a_type) || (p_type == "*" && p_sub == a_sub)
}

fn essence(media_type: &str) -> String {
    media_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn status_patterns() {
        let errors = ["4XX", "5XX"];
        assert!(match_status_codes(&errors, StatusCode::NOT_FOUND));
        assert!(match_status_codes(&errors, StatusCode::BAD_GATEWAY));
        assert!(!match_status_codes(&errors, StatusCode::OK));
        assert!(match_status_codes(&["201"], StatusCode::CREATED));
        assert!(!match_status_codes(&["201"], StatusCode::OK));
        assert!(match_status_codes(&["2xx"], StatusCode::NO_CONTENT));
        assert!(match_status_codes(&["default"], StatusCode::IM_A_TEAPOT));
        assert!(!match_status_codes(&[], StatusCode::OK));
    }

    #[test]
    fn content_type_patterns() {
        assert!(match_content_type("application/json; charset=utf-8", "application/json"));
        assert!(match_content_type("Application/JSON", "application/json"));
        assert!(match_content_type("", "text/plain"));
        assert!(match_content_type("image/png", "image/*"));
        assert!(match_content_type("application/problem+json", "*/*"));
        assert!(match_content_type("text/csv", "*/csv"));
        assert!(!match_content_type("text/html", "application/json"));
        assert!(!match_content_type("text/html", "image/*"));
    }
}
