//! Field helpers for structured logging

/// Number of leading characters of an API key that may appear in logs or on screen.
const VISIBLE_KEY_PREFIX: usize = 4;

/// Redact an API key for logging and display
///
/// Keeps the first four characters of keys longer than eight characters and
/// masks the rest. Short keys are masked entirely, since a four-character
/// prefix of a short key gives most of it away.
///
/// # Examples
///
/// ```
/// use gatewatch::logging::redact_key;
///
/// assert_eq!(redact_key("3f2a9c1e-77b0-4c55-9d1c-0a8e4b6f2d11"), "3f2a****");
/// assert_eq!(redact_key("abc"), "****");
/// ```
pub fn redact_key(key: &str) -> String {
    if key.chars().count() <= VISIBLE_KEY_PREFIX * 2 {
        return "****".to_string();
    }
    let prefix: String = key.chars().take(VISIBLE_KEY_PREFIX).collect();
    format!("{}****", prefix)
}

/// Outcome label for a poll result, used as a metric label and log field
pub fn outcome_label<T, E>(result: &Result<T, E>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(_) => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_key_long() {
        assert_eq!(redact_key("abcdefghijkl"), "abcd****");
    }

    #[test]
    fn test_redact_key_short_fully_masked() {
        assert_eq!(redact_key(""), "****");
        assert_eq!(redact_key("abc"), "****");
        assert_eq!(redact_key("abcdefgh"), "****");
    }

    #[test]
    fn test_redact_key_multibyte() {
        // Must not split inside a character
        assert_eq!(redact_key("ключ-доступа-42"), "ключ****");
    }

    #[test]
    fn test_outcome_label() {
        let ok: Result<u32, String> = Ok(1);
        let err: Result<u32, String> = Err("boom".to_string());
        assert_eq!(outcome_label(&ok), "success");
        assert_eq!(outcome_label(&err), "error");
    }
}
