use anyhow::Result;
use sha2::{Digest, Sha256};

/// A validated SHA256 digest (64 lowercase hex characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sha256Digest(String);

impl Sha256Digest {
    /// Create a new Sha256Digest, validating the input.
    ///
    /// Accepts strings with or without "sha256:" prefix. Placeholders such as
    /// "TBD" are rejected like any other malformed value.
    pub fn new(s: impl Into<String>) -> Result<Self> {
        let s = s.into();
        let hex = s.trim();
        let hex = hex.strip_prefix("sha256:").unwrap_or(hex);

        if hex.len() != 64 {
            anyhow::bail!(
                "Invalid SHA256 digest: expected 64 hex characters, got {} in '{s}'",
                hex.len(),
            );
        }

        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            anyhow::bail!("Invalid SHA256 digest: contains non-hex characters in '{s}'");
        }

        Ok(Self(hex.to_lowercase()))
    }

    /// Hashes `bytes`.
    pub fn of(bytes: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Sha256Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Sha256Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HELLO: &str = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";

    #[test]
    fn test_of_known_value() {
        assert_eq!(Sha256Digest::of(b"hello").as_str(), HELLO);
    }

    #[test]
    fn test_new_normalizes_prefix_and_case() {
        let upper = format!("sha256:{}", HELLO.to_uppercase());
        assert_eq!(Sha256Digest::new(upper).unwrap().as_str(), HELLO);
    }

    #[test]
    fn test_new_rejects_placeholders() {
        for bad in ["TBD", "", "sha256:", "tbd tbd"] {
            assert!(Sha256Digest::new(bad).is_err(), "{:?} should be rejected", bad);
        }
    }

    #[test]
    fn test_new_rejects_non_hex() {
        let bad = "z".repeat(64);
        let err = Sha256Digest::new(bad).unwrap_err();
        assert!(err.to_string().contains("non-hex"));
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        let err = Sha256Digest::new(&HELLO[..63]).unwrap_err();
        assert!(err.to_string().contains("got 63"));
    }
}
