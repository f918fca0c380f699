use crate::config::{
    DEFAULT_BIRTHDAY_WINDOW, DEFAULT_CONTACTS_FILE, DEFAULT_NOTES_FILE,
    DEFAULT_SUGGESTION_THRESHOLD, MAX_BIRTHDAY_WINDOW,
};
use crate::core::ConfigProvider;
use crate::utils::error::{AssistantError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub storage: StorageConfig,
    pub export: ExportConfig,
    pub assistant: Option<AssistantConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    pub contacts_file: Option<String>,
    pub notes_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    pub output_path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssistantConfig {
    pub birthday_window_days: Option<u32>,
    pub suggestion_threshold: Option<u32>,
    pub typing_delay_ms: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AssistantError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| AssistantError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    fn assistant(&self) -> AssistantConfig {
        self.assistant.clone().unwrap_or_default()
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("storage.data_dir", &self.storage.data_dir)?;
        validation::validate_path("storage.contacts_file", self.contacts_file())?;
        validation::validate_path("storage.notes_file", self.notes_file())?;
        validation::validate_path("export.output_path", &self.export.output_path)?;

        if self.contacts_file() == self.notes_file() {
            return Err(AssistantError::ConfigError {
                message: "storage.contacts_file and storage.notes_file must differ".to_string(),
            });
        }

        validation::validate_range(
            "assistant.birthday_window_days",
            self.birthday_window_days(),
            0,
            MAX_BIRTHDAY_WINDOW,
        )?;
        validation::validate_range(
            "assistant.suggestion_threshold",
            self.suggestion_threshold(),
            1,
            100,
        )?;
        validation::validate_range("assistant.typing_delay_ms", self.typing_delay_ms(), 0, 200)?;

        Ok(())
    }
}

impl ConfigProvider for TomlConfig {
    fn data_dir(&self) -> &str {
        &self.storage.data_dir
    }

    fn contacts_file(&self) -> &str {
        self.storage
            .contacts_file
            .as_deref()
            .unwrap_or(DEFAULT_CONTACTS_FILE)
    }

    fn notes_file(&self) -> &str {
        self.storage.notes_file.as_deref().unwrap_or(DEFAULT_NOTES_FILE)
    }

    fn export_path(&self) -> &str {
        &self.export.output_path
    }

    fn birthday_window_days(&self) -> u32 {
        self.assistant()
            .birthday_window_days
            .unwrap_or(DEFAULT_BIRTHDAY_WINDOW)
    }

    fn suggestion_threshold(&self) -> u32 {
        self.assistant()
            .suggestion_threshold
            .unwrap_or(DEFAULT_SUGGESTION_THRESHOLD)
    }

    fn typing_delay_ms(&self) -> u64 {
        self.assistant().typing_delay_ms.unwrap_or(0)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[storage]
data_dir = "./my-data"

[export]
output_path = "./my-exports"

[assistant]
birthday_window_days = 14
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.data_dir(), "./my-data");
        assert_eq!(config.contacts_file(), "contacts.json");
        assert_eq!(config.export_path(), "./my-exports");
        assert_eq!(config.birthday_window_days(), 14);
        assert_eq!(config.suggestion_threshold(), 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_values_are_taken_literally() {
        std::env::set_var("ASSISTANT_TEST_DATA_DIR", "/var/lib/assistant");

        let toml_content = r#"
[storage]
data_dir = "${ASSISTANT_TEST_DATA_DIR}"

[export]
output_path = "./exports"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.data_dir(), "${ASSISTANT_TEST_DATA_DIR}");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[storage]
data_dir = "./data"
contacts_file = "same.json"
notes_file = "same.json"

[export]
output_path = "./exports"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let toml_content = r#"
[storage]
data_dir = "./data"

[export]
output_path = "./exports"

[assistant]
suggestion_threshold = 0
"#;
        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            TomlConfig::from_toml_str("[storage"),
            Err(AssistantError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[storage]
data_dir = "./file-data"
notes_file = "my-notes.json"

[export]
output_path = "./output"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.notes_file(), "my-notes.json");
    }
}
