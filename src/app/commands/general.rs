use super::{Command, CommandRegistry, Group, HelpEntry, Outcome};
use crate::app::context::AppContext;
use crate::app::table::Table;
use crate::core::Storage;
use crate::domain::ports::Console;
use crate::utils::error::Result;
use async_trait::async_trait;

pub fn register<S: Storage + 'static>(registry: &mut CommandRegistry<S>) {
    registry.register(Hello);
    registry.register(Exit);
}

pub struct Hello;

#[async_trait]
impl<S: Storage> Command<S> for Hello {
    fn name(&self) -> &'static str {
        "hello"
    }

    fn description(&self) -> &'static str {
        "Greets the user"
    }

    fn group(&self) -> Group {
        Group::General
    }

    async fn execute(
        &self,
        _ctx: &mut AppContext<S>,
        console: &mut dyn Console,
        _args: &[String],
    ) -> Result<Outcome> {
        console.success("Hello! I am your assistant. I can help you with your contacts and notes.");
        console.print("To see the list of available commands, type \"help\".");
        Ok(Outcome::Done)
    }
}

pub struct Exit;

#[async_trait]
impl<S: Storage> Command<S> for Exit {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["close", "quit", "goodbye"]
    }

    fn usage(&self) -> &'static str {
        "close / exit / quit"
    }

    fn description(&self) -> &'static str {
        "Saves all data and closes the assistant"
    }

    fn group(&self) -> Group {
        Group::General
    }

    async fn execute(
        &self,
        _ctx: &mut AppContext<S>,
        _console: &mut dyn Console,
        _args: &[String],
    ) -> Result<Outcome> {
        Ok(Outcome::Exit)
    }
}

pub struct Help {
    entries: Vec<HelpEntry>,
}

impl Help {
    pub fn new(mut entries: Vec<HelpEntry>) -> Self {
        entries.push(HelpEntry {
            group: Group::General,
            usage: "help",
            description: "Shows the list of available commands",
        });
        Self { entries }
    }

    fn table(&self, group: Group, title: &str) -> String {
        let mut table = Table::new(["Command", "Description"]).title(title);
        for entry in self.entries.iter().filter(|e| e.group == group) {
            table.add_row([entry.usage, entry.description]);
        }
        table.render()
    }
}

#[async_trait]
impl<S: Storage> Command<S> for Help {
    fn name(&self) -> &'static str {
        "help"
    }

    fn description(&self) -> &'static str {
        "Shows the list of available commands"
    }

    fn group(&self) -> Group {
        Group::General
    }

    async fn execute(
        &self,
        _ctx: &mut AppContext<S>,
        console: &mut dyn Console,
        _args: &[String],
    ) -> Result<Outcome> {
        console.print(&self.table(Group::Contacts, "Contact Commands"));
        console.print(&self.table(Group::Notes, "Note Commands"));
        console.print(&self.table(Group::General, "General Commands"));
        Ok(Outcome::Done)
    }
}
