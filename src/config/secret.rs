//! Secure credential handling using the secrecy crate
//!
//! The remote password is the only secret xmlrelay handles. It is wrapped in
//! `secrecy::Secret`, which zeroes memory on drop and redacts `Debug` output,
//! so the password can't leak through `tracing` fields or panic messages.
//!
//! # Example
//!
//! ```rust
//! use xmlrelay::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let password = secret_string("my-password".to_string());
//! assert_eq!(password.expose_secret().as_ref(), "my-password");
//! assert!(!format!("{password:?}").contains("my-password"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Password bytes, wiped when dropped
#[derive(Clone, Zeroize, Serialize, Deserialize)]
#[zeroize(drop)]
#[serde(transparent)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// True for an empty password
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Redacted, zeroizing password
pub type SecretString = Secret<SecretValue>;

/// Wraps a password read from a file or the environment
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_empty_password() {
        assert!(secret_string(String::new()).expose_secret().is_empty());
        assert!(!secret_string("x".to_string()).expose_secret().is_empty());
    }

    #[test]
    fn test_password_is_redacted_in_debug() {
        let password = secret_string("relay-pass-42".to_string());
        let rendered = format!("{password:?}");
        assert!(!rendered.contains("relay-pass-42"));
        assert!(rendered.contains("REDACTED"));
    }

    #[test]
    fn test_secret_deserializes_from_toml() {
        #[derive(Deserialize)]
        struct Remote {
            password: SecretString,
        }

        let remote: Remote = toml::from_str(r#"password = "hunter2""#).unwrap();
        assert_eq!(remote.password.expose_secret().as_ref(), "hunter2");
    }

    #[test]
    fn test_secret_serializes_as_plain_string() {
        #[derive(Serialize)]
        struct Remote {
            password: SecretString,
        }

        let remote = Remote {
            password: secret_string("hunter2".to_string()),
        };
        assert_eq!(toml::to_string(&remote).unwrap(), "password = \"hunter2\"\n");
    }
}
