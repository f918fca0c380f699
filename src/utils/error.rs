use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssistantError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid {field} '{value}': {reason}")]
    ValidationError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("{kind} '{key}' not found")]
    NotFoundError { kind: String, key: String },

    #[error("Usage: {usage}")]
    UsageError { usage: String },

    #[error("Operation cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Lookup,
    User,
    System,
}

impl AssistantError {
    pub fn validation(field: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn not_found(kind: &str, key: &str) -> Self {
        Self::NotFoundError {
            kind: kind.to_string(),
            key: key.to_string(),
        }
    }

    pub fn usage(usage: &str) -> Self {
        Self::UsageError {
            usage: usage.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ValidationError { .. } | Self::UsageError { .. } => ErrorCategory::Input,
            Self::NotFoundError { .. } => ErrorCategory::Lookup,
            Self::Cancelled => ErrorCategory::User,
            Self::CsvError(_)
            | Self::IoError(_)
            | Self::SerializationError(_)
            | Self::ConfigError { .. } => ErrorCategory::System,
        }
    }

    /// 錯誤是否可在 REPL 內恢復 (不需中止程式)
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::ConfigError { .. })
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ValidationError { field, value, reason } => {
                format!("'{}' is not a valid {}: {}", value, field, reason)
            }
            Self::NotFoundError { kind, key } => format!("{} '{}' does not exist", kind, key),
            Self::UsageError { usage } => format!("Missing arguments. Usage: {}", usage),
            Self::Cancelled => "Operation cancelled".to_string(),
            Self::IoError(e) => format!("File system error: {}", e),
            Self::CsvError(e) => format!("Could not write CSV: {}", e),
            Self::SerializationError(e) => format!("Saved data is unreadable: {}", e),
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ValidationError { .. } => "Check the value format and try again",
            Self::NotFoundError { .. } => "Use 'all contacts' or 'all notes' to see existing records",
            Self::UsageError { .. } => "Type 'help' to see every command with its arguments",
            Self::Cancelled => "Run the command again if you change your mind",
            Self::IoError(_) | Self::CsvError(_) => {
                "Check that the path exists and is writable"
            }
            Self::SerializationError(_) => "Move the damaged data file away to start fresh",
            Self::ConfigError { .. } => "Fix the configuration file and restart",
        }
    }
}

pub type Result<T> = std::result::Result<T, AssistantError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        assert_eq!(
            AssistantError::validation("phone", "123", "too short").category(),
            ErrorCategory::Input
        );
        assert_eq!(
            AssistantError::not_found("Contact", "John").category(),
            ErrorCategory::Lookup
        );
        assert_eq!(AssistantError::Cancelled.category(), ErrorCategory::User);
        assert!(!AssistantError::ConfigError {
            message: "bad".to_string()
        }
        .is_recoverable());
    }

    #[test]
    fn test_display_messages() {
        let err = AssistantError::not_found("Note", "Groceries");
        assert_eq!(err.to_string(), "Note 'Groceries' not found");
        assert_eq!(err.user_friendly_message(), "Note 'Groceries' does not exist");
    }
}
