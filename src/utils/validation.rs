use crate::utils::error::{AssistantError, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

pub const MAX_TITLE_LENGTH: usize = 100;
pub const MAX_CONTENT_LENGTH: usize = 20_000;
pub const MAX_TAG_LENGTH: usize = 25;
pub const MAX_TAGS: usize = 10;
pub const MAX_ADDRESS_LENGTH: usize = 200;

static NON_PHONE_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9+]").unwrap());
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+\d+$").unwrap());
static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9 ]*[a-zA-Z0-9]$").unwrap());
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$").unwrap());
static DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{2}\.\d{2}\.\d{4}$").unwrap());

pub const DATE_FORMAT: &str = "%d.%m.%Y";

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// 正規化電話號碼為 `+` 開頭的國際格式
///
/// 烏克蘭號碼 (`+38` 開頭) 必須剛好 13 個字元。
pub fn normalize_phone(raw: &str) -> Result<String> {
    let digits = NON_PHONE_CHARS.replace_all(raw, "");

    let normalized = if digits.starts_with('+') {
        digits.to_string()
    } else if digits.starts_with("380") {
        format!("+{}", digits)
    } else {
        format!("+38{}", digits)
    };

    if !PHONE_RE.is_match(&normalized) {
        return Err(AssistantError::validation(
            "phone",
            raw,
            "must contain only digits after an optional '+'",
        ));
    }
    if normalized.starts_with("+38") && normalized.len() != 13 {
        return Err(AssistantError::validation(
            "phone",
            raw,
            "Ukrainian numbers must have 12 digits, e.g. +380501234567",
        ));
    }

    Ok(normalized)
}

/// 標準化姓名：去除前後空白，每個單字首字母大寫
pub fn normalize_name(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if !NAME_RE.is_match(trimmed) {
        return Err(AssistantError::validation(
            "name",
            raw,
            "must start with a letter and contain only letters, digits and spaces",
        ));
    }

    let name = trimmed
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ");
    Ok(name)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn validate_date(date: &str) -> bool {
    parse_date(date).is_ok()
}

/// 嚴格解析 `DD.MM.YYYY`
pub fn parse_date(date: &str) -> Result<NaiveDate> {
    let date = date.trim();
    if !DATE_RE.is_match(date) {
        return Err(AssistantError::validation("date", date, "use DD.MM.YYYY"));
    }
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|e| AssistantError::validation("date", date, e.to_string()))
}

pub fn validate_title(title: &str) -> Result<String> {
    let title = title.trim();
    validate_non_empty_string("title", title)?;
    validate_max_chars("title", title, MAX_TITLE_LENGTH)?;
    Ok(title.to_string())
}

pub fn validate_content(content: &str) -> Result<String> {
    let content = content.trim();
    validate_non_empty_string("content", content)?;
    validate_max_chars("content", content, MAX_CONTENT_LENGTH)?;
    Ok(content.to_string())
}

pub fn validate_address(address: &str) -> Result<String> {
    let address = address.trim();
    validate_non_empty_string("address", address)?;
    validate_max_chars("address", address, MAX_ADDRESS_LENGTH)?;
    Ok(address.to_string())
}

/// 標籤格式：`#` 前綴，空白轉為底線
///
/// 已帶 `#` 的輸入不會重複加前綴，長度限制不含 `#`。
pub fn normalize_tag(raw: &str) -> Result<String> {
    let body = raw.trim().trim_start_matches('#');
    validate_non_empty_string("tag", body)?;

    let body = body.split_whitespace().collect::<Vec<_>>().join("_");
    validate_max_chars("tag", &body, MAX_TAG_LENGTH)?;
    Ok(format!("#{}", body))
}

fn validate_max_chars(field_name: &str, value: &str, max: usize) -> Result<()> {
    let len = value.chars().count();
    if len > max {
        return Err(AssistantError::validation(
            field_name,
            &preview(value),
            format!("at most {} characters allowed, got {}", max, len),
        ));
    }
    Ok(())
}

fn preview(value: &str) -> String {
    if value.chars().count() <= 40 {
        value.to_string()
    } else {
        format!("{}...", value.chars().take(40).collect::<String>())
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(AssistantError::validation(
            field_name,
            path,
            "Path cannot be empty",
        ));
    }

    if path.contains('\0') {
        return Err(AssistantError::validation(
            field_name,
            path,
            "Path contains null bytes",
        ));
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AssistantError::validation(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(AssistantError::validation(
            field_name,
            &value.to_string(),
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("0501234567").unwrap(), "+380501234567");
        assert_eq!(normalize_phone("+380501234567").unwrap(), "+380501234567");
        assert_eq!(normalize_phone("380501234567").unwrap(), "+380501234567");
        assert_eq!(normalize_phone("(050) 123-45-67").unwrap(), "+380501234567");
        assert_eq!(normalize_phone("+14155552671").unwrap(), "+14155552671");
    }

    #[test]
    fn test_normalize_phone_rejects_bad_numbers() {
        // 9 位本地號碼
        assert!(normalize_phone("050123456").is_err());
        assert!(normalize_phone("").is_err());
        assert!(normalize_phone("+").is_err());
        assert!(normalize_phone("+38050123456789").is_err());
        assert!(normalize_phone("12+345").is_err());
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  john   smith ").unwrap(), "John Smith");
        assert_eq!(normalize_name("aNNA").unwrap(), "Anna");
        assert_eq!(normalize_name("agent 007").unwrap(), "Agent 007");
        assert!(normalize_name("1john").is_err());
        assert!(normalize_name("john!").is_err());
        assert!(normalize_name("j").is_err());
        assert!(normalize_name("").is_err());
    }

    #[test]
    fn test_normalize_name_is_idempotent() {
        for raw in ["john smith", "MARY ann LEE", "bob2"] {
            let once = normalize_name(raw).unwrap();
            assert_eq!(normalize_name(&once).unwrap(), once);
        }
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("john.doe+work@example.com"));
        assert!(validate_email("a_b@mail.co.uk"));
        assert!(!validate_email("john@"));
        assert!(!validate_email("john.example.com"));
        assert!(!validate_email("john@example"));
    }

    #[test]
    fn test_validate_date() {
        assert!(validate_date("29.02.2024"));
        assert!(!validate_date("29.02.2023"));
        assert!(!validate_date("1.2.2000"));
        assert!(!validate_date("2000-02-01"));
        assert!(!validate_date("32.01.2000"));
    }

    #[test]
    fn test_normalize_tag() {
        assert_eq!(normalize_tag("shopping list").unwrap(), "#shopping_list");
        assert_eq!(normalize_tag("#work").unwrap(), "#work");
        assert!(normalize_tag("  ").is_err());
        assert!(normalize_tag(&"x".repeat(25)).is_ok());
        assert!(normalize_tag(&"x".repeat(26)).is_err());
    }

    #[test]
    fn test_title_and_content_bounds() {
        assert_eq!(validate_title("  Groceries ").unwrap(), "Groceries");
        assert!(validate_title("").is_err());
        assert!(validate_title(&"t".repeat(101)).is_err());
        assert!(validate_content(&"c".repeat(20_000)).is_ok());
        assert!(validate_content(&"c".repeat(20_001)).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("birthday_window_days", 7, 0, 365).is_ok());
        assert!(validate_range("birthday_window_days", 400, 0, 365).is_err());
    }
}
