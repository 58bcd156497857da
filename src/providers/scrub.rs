use crate::error::ProviderError;
use std::borrow::Cow;

const MAX_API_ERROR_CHARS: usize = 200;
const REDACTED: &str = "[REDACTED]";

/// Prefixes that start a credential; the prefix itself is redacted too.
const KEY_PREFIXES: [&str; 4] = ["sk-ant-", "sk-or-", "sk-proj-", "sk-"];

/// Markers followed by a credential value.
const VALUE_MARKERS: [&str; 6] = [
    "Bearer ",
    "bearer ",
    "x-api-key: ",
    "api_key=",
    "\"api_key\":\"",
    "\"token\":\"",
];

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '+' | '/' | '=')
}

fn redact_after(text: &mut String, marker: &str, keep_marker: bool) {
    let mut from = 0;
    while let Some(rel) = text[from..].find(marker) {
        let start = from + rel;
        let value_start = start + marker.len();
        let value_len = text[value_start..]
            .char_indices()
            .find(|&(_, c)| !is_token_char(c))
            .map_or(text.len() - value_start, |(i, _)| i);
        if value_len == 0 {
            from = value_start;
            continue;
        }
        let replace_from = if keep_marker { value_start } else { start };
        text.replace_range(replace_from..value_start + value_len, REDACTED);
        from = replace_from + REDACTED.len();
    }
}

/// Redact API keys and bearer tokens from provider error text.
pub fn scrub_secret_patterns(input: &str) -> Cow<'_, str> {
    let suspicious = KEY_PREFIXES
        .iter()
        .chain(VALUE_MARKERS.iter())
        .any(|pattern| input.contains(pattern));
    if !suspicious {
        return Cow::Borrowed(input);
    }

    let mut scrubbed = input.to_string();
    for marker in VALUE_MARKERS {
        redact_after(&mut scrubbed, marker, true);
    }
    for prefix in KEY_PREFIXES {
        redact_after(&mut scrubbed, prefix, false);
    }
    Cow::Owned(scrubbed)
}

/// Scrub secrets and cap the length of text bound for logs and errors.
pub fn sanitize_api_error(input: &str) -> String {
    let scrubbed = scrub_secret_patterns(input);
    if scrubbed.chars().count() <= MAX_API_ERROR_CHARS {
        return scrubbed.into_owned();
    }
    let truncated: String = scrubbed.chars().take(MAX_API_ERROR_CHARS).collect();
    format!("{truncated}...")
}

/// Map a non-success HTTP response into a [`ProviderError`].
pub async fn api_error(provider: &str, response: reqwest::Response) -> ProviderError {
    let status = response.status();
    if matches!(status.as_u16(), 401 | 403) {
        return ProviderError::Auth {
            provider: provider.to_string(),
        };
    }
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read provider error body>".to_string());
    ProviderError::Status {
        provider: provider.to_string(),
        status: status.as_u16(),
        message: sanitize_api_error(&body),
    }
}

pub fn transport_error(provider: &str, error: &reqwest::Error) -> ProviderError {
    ProviderError::Transport {
        provider: provider.to_string(),
        message: sanitize_api_error(&error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_text_is_borrowed() {
        assert!(matches!(
            scrub_secret_patterns("model overloaded"),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn anthropic_key_is_redacted() {
        let scrubbed = scrub_secret_patterns("invalid key sk-ant-api03-abcDEF_123 supplied");
        assert_eq!(scrubbed, "invalid key [REDACTED] supplied");
    }

    #[test]
    fn bearer_value_is_redacted_but_marker_kept() {
        let scrubbed = scrub_secret_patterns("Authorization: Bearer abc.def-123");
        assert_eq!(scrubbed, "Authorization: Bearer [REDACTED]");
    }

    #[test]
    fn json_token_fields_are_redacted() {
        let scrubbed = scrub_secret_patterns(r#"{"api_key":"live123","ok":false}"#);
        assert_eq!(scrubbed, r#"{"api_key":"[REDACTED]","ok":false}"#);
    }

    #[test]
    fn bare_marker_without_value_is_left_alone() {
        assert_eq!(scrub_secret_patterns("api_key= missing"), "api_key= missing");
    }

    #[test]
    fn sanitize_truncates_long_bodies() {
        let long = "x".repeat(500);
        let sanitized = sanitize_api_error(&long);
        assert_eq!(sanitized.chars().count(), MAX_API_ERROR_CHARS + 3);
        assert!(sanitized.ends_with("..."));
    }

    #[test]
    fn sanitize_truncates_on_char_boundaries() {
        let long = "é".repeat(300);
        let sanitized = sanitize_api_error(&long);
        assert!(sanitized.starts_with('é'));
        assert!(sanitized.ends_with("..."));
    }
}
