//! Alias model: a per-(chat, user) shortcut phrase expanding to a full
//! command invocation text.

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// One alias row. `name` is matched case-insensitively against the whole
/// inbound text; `expansion` is re-injected as if the user had typed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    pub chat_id: i64,
    pub user_id: i64,
    pub name: String,
    pub expansion: String,
}

impl Alias {
    pub fn new(
        chat_id: i64,
        user_id: i64,
        name: impl Into<String>,
        expansion: impl Into<String>,
    ) -> Self {
        Self {
            chat_id,
            user_id,
            name: name.into(),
            expansion: expansion.into(),
        }
    }
}

/// Rejects alias names that would shadow the administration command.
///
/// A name equal to, or beginning with, any reserved name variant
/// (case-insensitive) can never be stored; otherwise a user could alias
/// away their own ability to manage settings.
pub fn validate_alias_name(name: &str, reserved: &[String]) -> Result<(), StorageError> {
    let lowered = name.trim().to_lowercase();
    if lowered.is_empty() {
        return Err(StorageError::Forbidden("alias name is empty".to_string()));
    }
    for variant in reserved {
        if lowered.starts_with(&variant.to_lowercase()) {
            return Err(StorageError::Forbidden(format!(
                "alias name '{}' shadows the settings command",
                name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reserved() -> Vec<String> {
        vec!["set".to_string(), "настройка".to_string()]
    }

    #[test]
    fn test_plain_name_accepted() {
        assert!(validate_alias_name("wz", &reserved()).is_ok());
    }

    #[test]
    fn test_reserved_name_rejected() {
        assert!(validate_alias_name("set", &reserved()).is_err());
        assert!(validate_alias_name("SET", &reserved()).is_err());
        assert!(validate_alias_name("settings", &reserved()).is_err());
        assert!(validate_alias_name("настройка погоды", &reserved()).is_err());
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(validate_alias_name("  ", &reserved()).is_err());
    }
}
