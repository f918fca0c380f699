//! 指令登錄表：指令名稱對應到實作 [`Command`] 的處理器。
//!
//! 處理器在參數不足時透過 [`Console`] 互動式詢問，修改資料後回傳
//! [`Outcome::Modified`]，由 REPL 負責寫回。

pub mod contacts;
pub mod general;
pub mod notes;

use crate::app::context::{AppContext, Collection};
use crate::core::Storage;
use crate::domain::ports::Console;
use crate::utils::error::{AssistantError, Result};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    Modified(Collection),
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    General,
    Contacts,
    Notes,
}

#[derive(Debug, Clone)]
pub struct HelpEntry {
    pub group: Group,
    pub usage: &'static str,
    pub description: &'static str,
}

#[async_trait]
pub trait Command<S: Storage>: Send + Sync {
    fn name(&self) -> &'static str;

    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    fn usage(&self) -> &'static str {
        self.name()
    }

    fn description(&self) -> &'static str;

    fn group(&self) -> Group;

    async fn execute(
        &self,
        ctx: &mut AppContext<S>,
        console: &mut dyn Console,
        args: &[String],
    ) -> Result<Outcome>;
}

pub struct CommandRegistry<S: Storage> {
    commands: Vec<Box<dyn Command<S>>>,
    index: IndexMap<&'static str, usize>,
}

impl<S: Storage + 'static> CommandRegistry<S> {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            index: IndexMap::new(),
        }
    }

    /// 全部內建指令，`help` 最後註冊以便列出其他指令
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        general::register(&mut registry);
        contacts::register(&mut registry);
        notes::register(&mut registry);

        let entries = registry.help_entries();
        registry.register(general::Help::new(entries));
        registry
    }

    pub fn register(&mut self, command: impl Command<S> + 'static) {
        let position = self.commands.len();
        for name in std::iter::once(command.name()).chain(command.aliases().iter().copied()) {
            if self.index.insert(name, position).is_some() {
                tracing::warn!("Command '{}' registered twice, last one wins", name);
            }
        }
        self.commands.push(Box::new(command));
    }

    pub fn get(&self, name: &str) -> Option<&dyn Command<S>> {
        self.index
            .get(name)
            .map(|&position| self.commands[position].as_ref())
    }

    /// 所有可輸入的名稱 (含別名)，依註冊順序
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.index.keys().copied()
    }

    pub fn help_entries(&self) -> Vec<HelpEntry> {
        self.commands
            .iter()
            .map(|c| HelpEntry {
                group: c.group(),
                usage: c.usage(),
                description: c.description(),
            })
            .collect()
    }

    /// 先試前兩個字，再試第一個字；回傳指令與剩餘參數
    pub fn resolve(&self, line: &str) -> Option<(&dyn Command<S>, Vec<String>)> {
        let tokens = tokenize(line);

        if tokens.len() >= 2 {
            let key = format!("{} {}", tokens[0].to_lowercase(), tokens[1].to_lowercase());
            if let Some(command) = self.get(&key) {
                return Some((command, tokens[2..].to_vec()));
            }
        }

        let first = tokens.first()?.to_lowercase();
        self.get(&first)
            .map(|command| (command, tokens[1..].to_vec()))
    }
}

impl<S: Storage + 'static> Default for CommandRegistry<S> {
    fn default() -> Self {
        Self::with_defaults()
    }
}

pub fn tokenize(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

/// 最後 `trailing` 個參數是固定欄位，其餘合併為名稱
///
/// 參數不夠時全部視為名稱，固定欄位留給互動詢問。
pub(crate) fn split_trailing(args: &[String], trailing: usize) -> (Option<String>, Vec<String>) {
    if args.len() > trailing {
        let split = args.len() - trailing;
        (Some(args[..split].join(" ")), args[split..].to_vec())
    } else {
        (joined(args), Vec::new())
    }
}

pub(crate) fn joined(args: &[String]) -> Option<String> {
    if args.is_empty() {
        None
    } else {
        Some(args.join(" "))
    }
}

/// 已有值就用，沒有就詢問；空白輸入視為參數不足
pub(crate) fn require(
    console: &mut dyn Console,
    value: Option<String>,
    prompt: &str,
    usage: &str,
) -> Result<String> {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        return Ok(value);
    }
    match console.read_line(prompt) {
        None => Err(AssistantError::Cancelled),
        Some(line) if line.trim().is_empty() => Err(AssistantError::usage(usage)),
        Some(line) => Ok(line.trim().to_string()),
    }
}

/// 重複詢問直到 `apply` 成功；空白輸入表示略過
pub(crate) fn ask_until_valid<T>(
    console: &mut dyn Console,
    prompt: &str,
    mut apply: impl FnMut(&str) -> Result<T>,
) -> Option<T> {
    loop {
        let line = console.read_line(prompt)?;
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        match apply(line) {
            Ok(value) => return Some(value),
            Err(e) => {
                console.error(&e.user_friendly_message());
                console.warn("Please try again, or press Enter to skip.");
            }
        }
    }
}

pub(crate) fn confirm_or_cancel(console: &mut dyn Console, question: &str) -> Result<()> {
    if console.confirm(question) {
        Ok(())
    } else {
        Err(AssistantError::Cancelled)
    }
}

/// 匯出目錄：參數、詢問、或預設值；不存在時須確認才建立
pub(crate) fn choose_export_dir(
    console: &mut dyn Console,
    args: &[String],
    default_dir: &str,
) -> Result<String> {
    let dir = match joined(args) {
        Some(dir) => dir,
        None => {
            let prompt = format!("Export directory (Enter for {}): ", default_dir);
            match console.read_line(&prompt) {
                None => return Err(AssistantError::Cancelled),
                Some(line) if line.trim().is_empty() => default_dir.to_string(),
                Some(line) => line.trim().to_string(),
            }
        }
    };

    crate::utils::validation::validate_path("export directory", &dir)?;
    if !Path::new(&dir).is_dir() {
        confirm_or_cancel(
            console,
            &format!("Directory '{}' does not exist. Create it?", dir),
        )?;
    }
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::console::ScriptedConsole;
    use crate::config::cli::LocalStorage;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_resolve_two_and_one_token_commands() {
        let registry = CommandRegistry::<LocalStorage>::with_defaults();

        let (command, rest) = registry.resolve("ADD Phone John Smith 0501234567").unwrap();
        assert_eq!(command.name(), "add phone");
        assert_eq!(rest, args(&["John", "Smith", "0501234567"]));

        let (command, rest) = registry.resolve("  hello there ").unwrap();
        assert_eq!(command.name(), "hello");
        assert_eq!(rest, args(&["there"]));

        let (command, _) = registry.resolve("quit").unwrap();
        assert_eq!(command.name(), "exit");

        let (command, rest) = registry.resolve("expand contact Anna").unwrap();
        assert_eq!(command.name(), "add contact");
        assert_eq!(rest, args(&["Anna"]));

        assert!(registry.resolve("al contacts").is_none());
        assert!(registry.resolve("").is_none());
    }

    #[test]
    fn test_every_command_is_listed_in_help() {
        let registry = CommandRegistry::<LocalStorage>::with_defaults();
        let names: Vec<_> = registry.names().collect();
        assert!(names.contains(&"help"));
        assert!(names.contains(&"export notes"));
        assert_eq!(registry.help_entries().len(), registry.commands.len());
    }

    #[test]
    fn test_split_trailing() {
        let (name, rest) = split_trailing(&args(&["John", "Smith", "050", "067"]), 2);
        assert_eq!(name.as_deref(), Some("John Smith"));
        assert_eq!(rest, args(&["050", "067"]));

        let (name, rest) = split_trailing(&args(&["John"]), 1);
        assert_eq!(name.as_deref(), Some("John"));
        assert!(rest.is_empty());

        let (name, _) = split_trailing(&[], 1);
        assert!(name.is_none());
    }

    #[test]
    fn test_require_prompts_when_missing() {
        let mut console = ScriptedConsole::new(["  Anna  ", ""]);
        assert_eq!(
            require(&mut console, Some("Bob".into()), "Name: ", "x").unwrap(),
            "Bob"
        );
        assert_eq!(require(&mut console, None, "Name: ", "x").unwrap(), "Anna");
        assert!(matches!(
            require(&mut console, None, "Name: ", "x"),
            Err(AssistantError::UsageError { .. })
        ));
        assert!(matches!(
            require(&mut console, None, "Name: ", "x"),
            Err(AssistantError::Cancelled)
        ));
    }

    #[test]
    fn test_ask_until_valid_retries() {
        let mut console = ScriptedConsole::new(["bad", "0501234567"]);
        let phone = ask_until_valid(&mut console, "Phone: ", crate::utils::validation::normalize_phone);
        assert_eq!(phone.as_deref(), Some("+380501234567"));
        assert!(console.contains("Please try again"));
    }
}
