pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONTACTS_FILE: &str = "contacts.json";
pub const DEFAULT_NOTES_FILE: &str = "notes.json";
pub const DEFAULT_BIRTHDAY_WINDOW: u32 = 7;
pub const MAX_BIRTHDAY_WINDOW: u32 = 366;
pub const DEFAULT_SUGGESTION_THRESHOLD: u32 = 60;

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "assistant-bot")]
#[command(about = "Personal assistant for contacts and notes")]
pub struct CliConfig {
    #[arg(long, default_value = "./data", help = "Directory holding saved contacts and notes")]
    pub data_dir: String,

    #[arg(long, default_value = "./exports", help = "Default directory for CSV exports")]
    pub export_dir: String,

    #[arg(short, long, help = "TOML configuration file (overrides the flags above)")]
    pub config: Option<String>,

    #[arg(long, default_value = "0", help = "Per-character delay of the typing effect")]
    pub typing_delay_ms: u64,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl ConfigProvider for CliConfig {
    fn data_dir(&self) -> &str {
        &self.data_dir
    }

    fn contacts_file(&self) -> &str {
        DEFAULT_CONTACTS_FILE
    }

    fn notes_file(&self) -> &str {
        DEFAULT_NOTES_FILE
    }

    fn export_path(&self) -> &str {
        &self.export_dir
    }

    fn birthday_window_days(&self) -> u32 {
        DEFAULT_BIRTHDAY_WINDOW
    }

    fn suggestion_threshold(&self) -> u32 {
        DEFAULT_SUGGESTION_THRESHOLD
    }

    fn typing_delay_ms(&self) -> u64 {
        self.typing_delay_ms
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("data_dir", &self.data_dir)?;
        validation::validate_path("export_dir", &self.export_dir)?;
        validation::validate_range("typing_delay_ms", self.typing_delay_ms, 0, 200)
    }
}

/// 執行期使用的設定快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: String,
    pub contacts_file: String,
    pub notes_file: String,
    pub export_path: String,
    pub birthday_window_days: u32,
    pub suggestion_threshold: u32,
    pub typing_delay_ms: u64,
}

impl Settings {
    pub fn from_provider<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            data_dir: config.data_dir().to_string(),
            contacts_file: config.contacts_file().to_string(),
            notes_file: config.notes_file().to_string(),
            export_path: config.export_path().to_string(),
            birthday_window_days: config.birthday_window_days(),
            suggestion_threshold: config.suggestion_threshold(),
            typing_delay_ms: config.typing_delay_ms(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
            contacts_file: DEFAULT_CONTACTS_FILE.to_string(),
            notes_file: DEFAULT_NOTES_FILE.to_string(),
            export_path: "./exports".to_string(),
            birthday_window_days: DEFAULT_BIRTHDAY_WINDOW,
            suggestion_threshold: DEFAULT_SUGGESTION_THRESHOLD,
            typing_delay_ms: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let config = CliConfig::parse_from(["assistant-bot"]);
        assert_eq!(config.data_dir, "./data");
        assert!(config.config.is_none());
        assert!(config.validate().is_ok());

        let settings = Settings::from_provider(&config);
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_cli_overrides() {
        let config = CliConfig::parse_from([
            "assistant-bot",
            "--data-dir",
            "/tmp/ab",
            "--typing-delay-ms",
            "15",
            "-v",
        ]);
        assert!(config.verbose);
        let settings = Settings::from_provider(&config);
        assert_eq!(settings.data_dir, "/tmp/ab");
        assert_eq!(settings.typing_delay_ms, 15);
    }

    #[test]
    fn test_cli_validation() {
        let config = CliConfig::parse_from(["assistant-bot", "--typing-delay-ms", "5000"]);
        assert!(config.validate().is_err());
    }
}
