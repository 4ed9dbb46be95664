use std::fmt;
use thiserror::Error;

pub const PRACTICUM_TOKEN: &str = "PRACTICUM_TOKEN";
pub const TELEGRAM_TOKEN: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID: &str = "TELEGRAM_CHAT_ID";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("required environment variables are missing: {}", .0.join(", "))]
    MissingVariables(Vec<&'static str>),
}

/// The three secrets the watcher needs. Loaded once at startup and never mutated.
#[derive(Clone)]
pub struct Credentials {
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,
}

impl Credentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through an arbitrary lookup. Blank values count as missing,
    /// and every missing name is reported.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut fetch = |name: &'static str| match lookup(name) {
            Some(value) if !value.trim().is_empty() => value,
            _ => {
                missing.push(name);
                String::new()
            }
        };

        let practicum_token = fetch(PRACTICUM_TOKEN);
        let telegram_token = fetch(TELEGRAM_TOKEN);
        let telegram_chat_id = fetch(TELEGRAM_CHAT_ID);

        if !missing.is_empty() {
            return Err(ConfigError::MissingVariables(missing));
        }

        Ok(Self {
            practicum_token,
            telegram_token,
            telegram_chat_id,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("practicum_token", &"<redacted>")
            .field("telegram_token", &"<redacted>")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_all_present() {
        let creds = Credentials::from_lookup(lookup_from(&[
            (PRACTICUM_TOKEN, "p-token"),
            (TELEGRAM_TOKEN, "t-token"),
            (TELEGRAM_CHAT_ID, "12345"),
        ]))
        .unwrap();
        assert_eq!(creds.practicum_token, "p-token");
        assert_eq!(creds.telegram_token, "t-token");
        assert_eq!(creds.telegram_chat_id, "12345");
    }

    #[test]
    fn test_missing_chat_id_is_named() {
        let err = Credentials::from_lookup(lookup_from(&[
            (PRACTICUM_TOKEN, "p-token"),
            (TELEGRAM_TOKEN, "t-token"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::MissingVariables(vec![TELEGRAM_CHAT_ID]));
        assert!(err.to_string().contains("TELEGRAM_CHAT_ID"));
    }

    #[test]
    fn test_blank_values_count_as_missing() {
        let err = Credentials::from_lookup(lookup_from(&[
            (PRACTICUM_TOKEN, ""),
            (TELEGRAM_TOKEN, "   "),
            (TELEGRAM_CHAT_ID, "12345"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingVariables(vec![PRACTICUM_TOKEN, TELEGRAM_TOKEN])
        );
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let creds = Credentials {
            practicum_token: "secret-p".into(),
            telegram_token: "secret-t".into(),
            telegram_chat_id: "42".into(),
        };
        let rendered = format!("{:?}", creds);
        assert!(!rendered.contains("secret-p"));
        assert!(!rendered.contains("secret-t"));
        assert!(rendered.contains("42"));
    }
}
