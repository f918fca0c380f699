use crate::utils::error::Result;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn data_dir(&self) -> &str;
    fn contacts_file(&self) -> &str;
    fn notes_file(&self) -> &str;
    fn export_path(&self) -> &str;
    fn birthday_window_days(&self) -> u32;
    fn suggestion_threshold(&self) -> u32;
    fn typing_delay_ms(&self) -> u64;
}

/// 輸出訊息的語氣，由實作決定顏色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Success,
    Warning,
    Error,
}

/// REPL 與指令共用的終端機介面
pub trait Console: Send {
    /// 顯示提示並讀取一行；輸入結束時回傳 `None`
    fn read_line(&mut self, prompt: &str) -> Option<String>;

    fn say(&mut self, tone: Tone, text: &str);

    fn print(&mut self, text: &str) {
        self.say(Tone::Plain, text);
    }

    fn success(&mut self, text: &str) {
        self.say(Tone::Success, text);
    }

    fn warn(&mut self, text: &str) {
        self.say(Tone::Warning, text);
    }

    fn error(&mut self, text: &str) {
        self.say(Tone::Error, text);
    }

    /// y/n 確認；只有 `y` 或 `yes` 算同意
    fn confirm(&mut self, question: &str) -> bool {
        match self.read_line(&format!("{} (y/n): ", question)) {
            Some(answer) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            None => false,
        }
    }
}
