use crate::domain::ports::{Console, Tone};
use colored::Colorize;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::time::Duration;

/// 真實終端機：彩色輸出，可選的打字效果
pub struct StdConsole {
    typing_delay: Duration,
}

impl StdConsole {
    pub fn new(typing_delay_ms: u64) -> Self {
        Self {
            typing_delay: Duration::from_millis(typing_delay_ms),
        }
    }

    fn emit(&self, text: &str) {
        let mut stdout = io::stdout();
        if self.typing_delay.is_zero() {
            writeln!(stdout, "{}", text).ok();
            return;
        }
        // 表格逐字輸出太慢，只對單行訊息做打字效果
        if text.contains('\n') {
            writeln!(stdout, "{}", text).ok();
            return;
        }
        for ch in text.chars() {
            write!(stdout, "{}", ch).ok();
            stdout.flush().ok();
            std::thread::sleep(self.typing_delay);
        }
        writeln!(stdout).ok();
    }
}

impl Console for StdConsole {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt.blue()).ok();
        stdout.flush().ok();

        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                tracing::error!("Failed to read stdin: {}", e);
                None
            }
        }
    }

    fn say(&mut self, tone: Tone, text: &str) {
        let styled = match tone {
            Tone::Plain => text.normal(),
            Tone::Success => text.green(),
            Tone::Warning => text.yellow(),
            Tone::Error => text.red(),
        };
        self.emit(&styled.to_string());
    }
}

/// 預先寫好輸入的主控台，記錄所有提示與輸出，供測試驅動 REPL
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    inputs: VecDeque<String>,
    transcript: Vec<String>,
}

impl ScriptedConsole {
    pub fn new<I, T>(inputs: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    pub fn output(&self) -> String {
        self.transcript.join("\n")
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.transcript.iter().any(|line| line.contains(needle))
    }

    pub fn remaining_inputs(&self) -> usize {
        self.inputs.len()
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> Option<String> {
        let line = self.inputs.pop_front();
        self.transcript
            .push(format!("{}{}", prompt, line.as_deref().unwrap_or("")));
        line
    }

    fn say(&mut self, _tone: Tone, text: &str) {
        self.transcript.push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_console_records_everything() {
        let mut console = ScriptedConsole::new(["yes", "no"]);
        assert!(console.confirm("Continue?"));
        assert!(!console.confirm("Really?"));
        assert!(!console.confirm("Input exhausted?"));
        console.success("done");

        assert!(console.contains("Continue? (y/n): yes"));
        assert!(console.contains("done"));
        assert_eq!(console.remaining_inputs(), 0);
    }
}
