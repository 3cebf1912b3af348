//! API credentials and placeholder detection.

use secrecy::{ExposeSecret, Secret};
use std::fmt;

/// One API key plus a log-safe label.
#[derive(Clone)]
pub struct Credential {
    label: String,
    key: Secret<String>,
}

impl Credential {
    pub fn new(label: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            key: Secret::new(key.into()),
        }
    }

    /// Label used in logs, e.g. `key-1`. Never the key itself.
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn secret(&self) -> &Secret<String> {
        &self.key
    }

    /// True for keys that were obviously never filled in.
    pub fn is_placeholder(&self) -> bool {
        is_placeholder_key(self.key.expose_secret())
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("label", &self.label)
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Empty, `your-...-here`, `YOUR_...`, `<...>`, or containing
/// `placeholder` / `changeme`.
pub fn is_placeholder_key(key: &str) -> bool {
    let key = key.trim();
    if key.is_empty() {
        return true;
    }
    let lower = key.to_ascii_lowercase();
    (lower.starts_with("your-") && lower.ends_with("-here"))
        || key.starts_with("YOUR_")
        || (key.starts_with('<') && key.ends_with('>'))
        || lower.contains("placeholder")
        || lower.contains("changeme")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_placeholders() {
        for key in [
            "",
            "   ",
            "your-mistral-api-key-here",
            "YOUR_API_KEY",
            "<mistral key>",
            "api-key-placeholder",
            "CHANGEME",
        ] {
            assert!(is_placeholder_key(key), "{key:?} should be a placeholder");
        }
    }

    #[test]
    fn accepts_real_looking_keys() {
        for key in ["sk-abc123", "Zx9yourkey", "your-key"] {
            assert!(!is_placeholder_key(key), "{key:?} should be usable");
        }
    }

    #[test]
    fn debug_redacts_key() {
        let credential = Credential::new("key-1", "sk-secret");
        let rendered = format!("{:?}", credential);
        assert!(rendered.contains("key-1"));
        assert!(!rendered.contains("sk-secret"));
        assert!(!credential.is_placeholder());
    }
}
