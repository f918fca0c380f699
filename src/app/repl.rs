//! 互動式主迴圈：讀取指令、分派給登錄表、修改後立即寫回。

use crate::app::commands::{tokenize, Command, CommandRegistry, Outcome};
use crate::app::context::AppContext;
use crate::core::Storage;
use crate::domain::ports::Console;
use crate::utils::error::{AssistantError, Result};
use crate::utils::fuzzy;

const PROMPT: &str = "Enter a command: ";

pub struct Repl<S: Storage> {
    registry: CommandRegistry<S>,
}

/// 模糊比對的建議：指令名稱、分數、使用了幾個輸入字
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Suggestion {
    pub name: &'static str,
    pub score: u32,
    pub tokens_used: usize,
}

impl<S: Storage + 'static> Repl<S> {
    pub fn new(registry: CommandRegistry<S>) -> Self {
        Self { registry }
    }

    /// 執行直到 `exit` 或輸入結束；離開前兩個集合都會寫回
    pub async fn run(&self, ctx: &mut AppContext<S>, console: &mut dyn Console) -> Result<()> {
        console.success("Welcome to the assistant bot!");
        console.print("Type \"help\" to see what I can do.");

        loop {
            let Some(line) = console.read_line(PROMPT) else {
                tracing::debug!("Input closed, leaving REPL");
                break;
            };
            let line = line.trim();
            if line.is_empty() {
                console.warn("Please enter a command. Type \"help\" for the list.");
                continue;
            }

            let Some((command, args)) = self.dispatch(line, ctx.settings.suggestion_threshold, console)
            else {
                continue;
            };

            tracing::debug!("Executing '{}' with {} argument(s)", command.name(), args.len());
            match command.execute(ctx, console, &args).await {
                Ok(Outcome::Done) => {}
                Ok(Outcome::Modified(collection)) => {
                    if let Err(e) = ctx.persist(collection).await {
                        tracing::error!("Failed to save {:?}: {}", collection, e);
                        report(console, &e);
                    }
                }
                Ok(Outcome::Exit) => break,
                Err(e) => report(console, &e),
            }
        }

        ctx.save_all().await?;
        console.success("Goodbye. Data saved.");
        Ok(())
    }

    /// 找不到指令時以模糊比對提出建議，使用者同意後才執行
    fn dispatch(
        &self,
        line: &str,
        threshold: u32,
        console: &mut dyn Console,
    ) -> Option<(&dyn Command<S>, Vec<String>)> {
        if let Some(found) = self.registry.resolve(line) {
            return Some(found);
        }

        let tokens = tokenize(line);
        let unknown = || format!("Unknown command '{}'. Type \"help\" for the list.", line);
        let suggestion = match self.suggest(&tokens) {
            Some(s) if s.score >= threshold => s,
            _ => {
                console.error(&unknown());
                return None;
            }
        };

        tracing::debug!(
            "Suggesting '{}' for '{}' (score {})",
            suggestion.name,
            line,
            suggestion.score
        );
        if !console.confirm(&format!("Did you mean '{}'?", suggestion.name)) {
            console.warn(&unknown());
            return None;
        }

        self.registry
            .get(suggestion.name)
            .map(|command| (command, tokens[suggestion.tokens_used..].to_vec()))
    }

    /// 分別用前兩個字與第一個字比對所有名稱，取分數較高者
    pub fn suggest(&self, tokens: &[String]) -> Option<Suggestion> {
        let mut best: Option<Suggestion> = None;
        for used in [2, 1] {
            if tokens.len() < used {
                continue;
            }
            let input = tokens[..used].join(" ");
            if let Some((name, score)) = fuzzy::best_match(&input, self.registry.names()) {
                if best.map_or(true, |b| score > b.score) {
                    best = Some(Suggestion {
                        name,
                        score,
                        tokens_used: used,
                    });
                }
            }
        }
        best
    }
}

fn report(console: &mut dyn Console, error: &AssistantError) {
    if matches!(error, AssistantError::Cancelled) {
        console.warn("Cancelled.");
        return;
    }
    tracing::warn!("Command failed ({:?}): {}", error.category(), error);
    console.error(&error.user_friendly_message());
    console.warn(error.recovery_suggestion());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::cli::LocalStorage;

    fn tokens(line: &str) -> Vec<String> {
        tokenize(line)
    }

    #[test]
    fn test_suggest_prefers_two_word_commands() {
        let repl = Repl::new(CommandRegistry::<LocalStorage>::with_defaults());

        let suggestion = repl.suggest(&tokens("al contacts")).unwrap();
        assert_eq!(suggestion.name, "all contacts");
        assert_eq!(suggestion.tokens_used, 2);
        assert!(suggestion.score >= 80);

        let suggestion = repl.suggest(&tokens("hlp")).unwrap();
        assert_eq!(suggestion.name, "help");
        assert_eq!(suggestion.tokens_used, 1);
    }

    #[test]
    fn test_suggest_on_empty_input() {
        let repl = Repl::new(CommandRegistry::<LocalStorage>::with_defaults());
        assert!(repl.suggest(&[]).is_none());
    }
}
