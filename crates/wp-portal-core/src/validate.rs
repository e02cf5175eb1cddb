use regex::Regex;
use std::sync::LazyLock;

pub const INVALID_URL_ERROR: &str = "Input pattern: http://example.com or https://example.com";
pub const BLANK_INPUT_ALERT: &str = "The input can't be blank";

// Optional scheme and "www.", dotted host with a 2-5 letter suffix, optional
// port and path. Matched against the lowercased input.
static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(http://www\.|https://www\.|http://|https://)?[a-z0-9]+([-.][a-z0-9]+)*\.[a-z]{2,5}(:[0-9]{1,5})?(/.*)?$",
    )
    .expect("URL pattern compiles")
});

pub fn is_url_shaped(message: &str) -> bool {
    URL_PATTERN.is_match(&message.to_lowercase())
}

/// Field error for `message`, if any. An empty message is not an error;
/// blank submissions are stopped separately.
pub fn validate_message(message: &str) -> Option<&'static str> {
    if message.is_empty() || is_url_shaped(message) {
        None
    } else {
        Some(INVALID_URL_ERROR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCEPTED: &[&str] = &[
        "https://example.com",
        "http://example.com",
        "https://www.example.com",
        "www.example.com",
        "example.io",
        "HTTPS://GitHub.com/Buildspace/Project",
        "https://my-project.vercel.app",
        "https://localhost.dev:3000/path?q=1",
        "sub.domain.example.co/x",
    ];

    const REJECTED: &[&str] = &[
        "example",
        "http://localhost:3000",
        "ftp://example.com",
        "https://example.c",
        "https://example.toolong",
        "not a url",
        "https://example.com:123456",
        " https://example.com",
        "https://exa_mple.com",
    ];

    #[test]
    fn url_shaped_messages_clear_the_error() {
        for message in ACCEPTED {
            assert_eq!(validate_message(message), None, "{message}");
        }
    }

    #[test]
    fn other_non_empty_messages_set_the_error() {
        for message in REJECTED {
            assert_eq!(validate_message(message), Some(INVALID_URL_ERROR), "{message}");
        }
    }

    #[test]
    fn empty_message_is_never_an_error() {
        assert_eq!(validate_message(""), None);
    }
}
