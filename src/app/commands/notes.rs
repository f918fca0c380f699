use super::{
    ask_until_valid, choose_export_dir, confirm_or_cancel, joined, require, split_trailing,
    Command, CommandRegistry, Group, Outcome,
};
use crate::app::context::{AppContext, Collection};
use crate::app::table::Table;
use crate::config::cli::LocalStorage;
use crate::core::address_book::AddOutcome;
use crate::core::{export, Storage};
use crate::domain::model::{Note, NoteField};
use crate::domain::ports::Console;
use crate::utils::error::Result;
use async_trait::async_trait;

const TITLE_PROMPT: &str = "Note title: ";

pub fn register<S: Storage + 'static>(registry: &mut CommandRegistry<S>) {
    registry.register(AddNote);
    registry.register(ShowNote);
    registry.register(AllNotes);
    registry.register(FindNote);
    registry.register(ChangeNote);
    registry.register(RenameNote);
    registry.register(DeleteNote);
    registry.register(AddTag);
    registry.register(EditTag);
    registry.register(DeleteTag);
    registry.register(DeleteContent);
    registry.register(ExportNotes);
}

pub fn notes_table<'a>(notes: impl IntoIterator<Item = &'a Note>, title: &str) -> String {
    let mut table = Table::new(["Title", "Content", "Tags"]).title(title);
    for note in notes {
        let tags: Vec<&str> = note.tags().iter().map(|t| t.as_str()).collect();
        table.add_row([
            note.title().to_string(),
            note.content()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string()),
            if tags.is_empty() {
                "-".to_string()
            } else {
                tags.join(" ")
            },
        ]);
    }
    table.render()
}

pub struct AddNote;

#[async_trait]
impl<S: Storage> Command<S> for AddNote {
    fn name(&self) -> &'static str {
        "add note"
    }

    fn usage(&self) -> &'static str {
        "add note [title]"
    }

    fn description(&self) -> &'static str {
        "Creates a note and asks for its content and tags"
    }

    fn group(&self) -> Group {
        Group::Notes
    }

    async fn execute(
        &self,
        ctx: &mut AppContext<S>,
        console: &mut dyn Console,
        args: &[String],
    ) -> Result<Outcome> {
        let title = require(console, joined(args), TITLE_PROMPT, Command::<S>::usage(self))?;
        let (outcome, note) = ctx.notes.add_note(&title)?;
        match outcome {
            AddOutcome::Created => console.success(&format!("Note '{}' created.", note.title())),
            AddOutcome::Existing => {
                console.warn(&format!("Note '{}' already exists. Updating it...", note.title()))
            }
        }

        ask_until_valid(console, "Content (Enter to skip): ", |v| note.set_content(v));
        while let Some(added) =
            ask_until_valid(console, "Tag (Enter to finish): ", |v| note.add_tag(v))
        {
            if !added {
                console.warn("Tag already present.");
            }
        }

        console.print(&notes_table([&*note], "Note"));
        Ok(Outcome::Modified(Collection::Notes))
    }
}

pub struct ShowNote;

#[async_trait]
impl<S: Storage> Command<S> for ShowNote {
    fn name(&self) -> &'static str {
        "show note"
    }

    fn usage(&self) -> &'static str {
        "show note <title>"
    }

    fn description(&self) -> &'static str {
        "Shows a note"
    }

    fn group(&self) -> Group {
        Group::Notes
    }

    async fn execute(
        &self,
        ctx: &mut AppContext<S>,
        console: &mut dyn Console,
        args: &[String],
    ) -> Result<Outcome> {
        let title = require(console, joined(args), TITLE_PROMPT, Command::<S>::usage(self))?;
        let note = ctx.notes.find_note(&title)?;
        console.print(&notes_table([note], "Note"));
        Ok(Outcome::Done)
    }
}

pub struct AllNotes;

#[async_trait]
impl<S: Storage> Command<S> for AllNotes {
    fn name(&self) -> &'static str {
        "all notes"
    }

    fn description(&self) -> &'static str {
        "Shows all notes"
    }

    fn group(&self) -> Group {
        Group::Notes
    }

    async fn execute(
        &self,
        ctx: &mut AppContext<S>,
        console: &mut dyn Console,
        _args: &[String],
    ) -> Result<Outcome> {
        if ctx.notes.is_empty() {
            console.warn("No notes saved yet.");
        } else {
            let title = format!("Notes ({})", ctx.notes.len());
            console.print(&notes_table(ctx.notes.iter(), &title));
        }
        Ok(Outcome::Done)
    }
}

pub struct FindNote;

#[async_trait]
impl<S: Storage> Command<S> for FindNote {
    fn name(&self) -> &'static str {
        "find note"
    }

    fn usage(&self) -> &'static str {
        "find note [title|content|tag] [query]"
    }

    fn description(&self) -> &'static str {
        "Searches notes by title, content or tag"
    }

    fn group(&self) -> Group {
        Group::Notes
    }

    async fn execute(
        &self,
        ctx: &mut AppContext<S>,
        console: &mut dyn Console,
        args: &[String],
    ) -> Result<Outcome> {
        let usage = Command::<S>::usage(self);
        let field = require(
            console,
            args.first().cloned(),
            "Search by (title/content/tag): ",
            usage,
        )?;
        let field: NoteField = field.parse()?;
        let query = require(console, joined(args.get(1..).unwrap_or_default()), "Search for: ", usage)?;

        let found = ctx.notes.search(&query, field);
        if found.is_empty() {
            console.warn(&format!("No notes match '{}'.", query));
        } else {
            let title = format!("Found {} note(s)", found.len());
            console.print(&notes_table(found, &title));
        }
        Ok(Outcome::Done)
    }
}

pub struct ChangeNote;

#[async_trait]
impl<S: Storage> Command<S> for ChangeNote {
    fn name(&self) -> &'static str {
        "change note"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["edit note"]
    }

    fn usage(&self) -> &'static str {
        "change note <title>"
    }

    fn description(&self) -> &'static str {
        "Replaces the content of a note"
    }

    fn group(&self) -> Group {
        Group::Notes
    }

    async fn execute(
        &self,
        ctx: &mut AppContext<S>,
        console: &mut dyn Console,
        args: &[String],
    ) -> Result<Outcome> {
        let usage = Command::<S>::usage(self);
        let title = require(console, joined(args), TITLE_PROMPT, usage)?;
        let note = ctx.notes.find_note_mut(&title)?;
        let content = require(console, None, "New content: ", usage)?;

        note.set_content(&content)?;
        console.success(&format!("Content of '{}' updated.", note.title()));
        Ok(Outcome::Modified(Collection::Notes))
    }
}

pub struct RenameNote;

#[async_trait]
impl<S: Storage> Command<S> for RenameNote {
    fn name(&self) -> &'static str {
        "rename note"
    }

    fn usage(&self) -> &'static str {
        "rename note <title>"
    }

    fn description(&self) -> &'static str {
        "Changes the title of a note"
    }

    fn group(&self) -> Group {
        Group::Notes
    }

    async fn execute(
        &self,
        ctx: &mut AppContext<S>,
        console: &mut dyn Console,
        args: &[String],
    ) -> Result<Outcome> {
        let usage = Command::<S>::usage(self);
        let old = require(console, joined(args), TITLE_PROMPT, usage)?;
        ctx.notes.find_note(&old)?;
        let new = require(console, None, "New title: ", usage)?;

        let note = ctx.notes.rename_note(&old, &new)?;
        console.success(&format!("Note renamed to '{}'.", note.title()));
        Ok(Outcome::Modified(Collection::Notes))
    }
}

pub struct DeleteNote;

#[async_trait]
impl<S: Storage> Command<S> for DeleteNote {
    fn name(&self) -> &'static str {
        "delete note"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["remove note"]
    }

    fn usage(&self) -> &'static str {
        "delete note <title>"
    }

    fn description(&self) -> &'static str {
        "Deletes a note after confirmation"
    }

    fn group(&self) -> Group {
        Group::Notes
    }

    async fn execute(
        &self,
        ctx: &mut AppContext<S>,
        console: &mut dyn Console,
        args: &[String],
    ) -> Result<Outcome> {
        let title = require(console, joined(args), TITLE_PROMPT, Command::<S>::usage(self))?;
        let title = ctx.notes.find_note(&title)?.title().to_string();

        confirm_or_cancel(console, &format!("Delete note '{}'?", title))?;
        ctx.notes.delete_note(&title)?;
        console.success(&format!("Note '{}' deleted.", title));
        Ok(Outcome::Modified(Collection::Notes))
    }
}

pub struct AddTag;

#[async_trait]
impl<S: Storage> Command<S> for AddTag {
    fn name(&self) -> &'static str {
        "add tag"
    }

    fn usage(&self) -> &'static str {
        "add tag <title> <tag>"
    }

    fn description(&self) -> &'static str {
        "Adds a tag to a note (at most 10 tags)"
    }

    fn group(&self) -> Group {
        Group::Notes
    }

    async fn execute(
        &self,
        ctx: &mut AppContext<S>,
        console: &mut dyn Console,
        args: &[String],
    ) -> Result<Outcome> {
        let usage = Command::<S>::usage(self);
        let (title, mut rest) = split_trailing(args, 1);
        let title = require(console, title, TITLE_PROMPT, usage)?;
        let note = ctx.notes.find_note_mut(&title)?;
        let tag = require(console, rest.pop(), "Tag: ", usage)?;

        if note.add_tag(&tag)? {
            console.success(&format!("Tag added to '{}'.", note.title()));
            Ok(Outcome::Modified(Collection::Notes))
        } else {
            console.warn(&format!("'{}' already has this tag.", note.title()));
            Ok(Outcome::Done)
        }
    }
}

pub struct EditTag;

#[async_trait]
impl<S: Storage> Command<S> for EditTag {
    fn name(&self) -> &'static str {
        "edit tag"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["change tag"]
    }

    fn usage(&self) -> &'static str {
        "edit tag <title> <old tag> <new tag>"
    }

    fn description(&self) -> &'static str {
        "Replaces a tag of a note"
    }

    fn group(&self) -> Group {
        Group::Notes
    }

    async fn execute(
        &self,
        ctx: &mut AppContext<S>,
        console: &mut dyn Console,
        args: &[String],
    ) -> Result<Outcome> {
        let usage = Command::<S>::usage(self);
        let (title, rest) = split_trailing(args, 2);
        let mut rest = rest.into_iter();
        let title = require(console, title, TITLE_PROMPT, usage)?;
        let note = ctx.notes.find_note_mut(&title)?;
        let old = require(console, rest.next(), "Current tag: ", usage)?;
        let new = require(console, rest.next(), "New tag: ", usage)?;

        let tag = note.edit_tag(&old, &new)?;
        console.success(&format!("Tag changed to {}.", tag));
        Ok(Outcome::Modified(Collection::Notes))
    }
}

pub struct DeleteTag;

#[async_trait]
impl<S: Storage> Command<S> for DeleteTag {
    fn name(&self) -> &'static str {
        "delete tag"
    }

    fn usage(&self) -> &'static str {
        "delete tag <title> <tag>"
    }

    fn description(&self) -> &'static str {
        "Removes a tag from a note"
    }

    fn group(&self) -> Group {
        Group::Notes
    }

    async fn execute(
        &self,
        ctx: &mut AppContext<S>,
        console: &mut dyn Console,
        args: &[String],
    ) -> Result<Outcome> {
        let usage = Command::<S>::usage(self);
        let (title, mut rest) = split_trailing(args, 1);
        let title = require(console, title, TITLE_PROMPT, usage)?;
        let note = ctx.notes.find_note_mut(&title)?;
        let tag = require(console, rest.pop(), "Tag to delete: ", usage)?;

        let removed = note.delete_tag(&tag)?;
        console.success(&format!("Tag {} removed from '{}'.", removed, note.title()));
        Ok(Outcome::Modified(Collection::Notes))
    }
}

pub struct DeleteContent;

#[async_trait]
impl<S: Storage> Command<S> for DeleteContent {
    fn name(&self) -> &'static str {
        "delete content"
    }

    fn usage(&self) -> &'static str {
        "delete content <title>"
    }

    fn description(&self) -> &'static str {
        "Clears the content of a note, keeping title and tags"
    }

    fn group(&self) -> Group {
        Group::Notes
    }

    async fn execute(
        &self,
        ctx: &mut AppContext<S>,
        console: &mut dyn Console,
        args: &[String],
    ) -> Result<Outcome> {
        let title = require(console, joined(args), TITLE_PROMPT, Command::<S>::usage(self))?;
        let note = ctx.notes.find_note_mut(&title)?;
        note.delete_content()?;
        console.success(&format!("Content of '{}' deleted.", note.title()));
        Ok(Outcome::Modified(Collection::Notes))
    }
}

pub struct ExportNotes;

#[async_trait]
impl<S: Storage> Command<S> for ExportNotes {
    fn name(&self) -> &'static str {
        "export notes"
    }

    fn usage(&self) -> &'static str {
        "export notes [directory]"
    }

    fn description(&self) -> &'static str {
        "Exports all notes to a CSV file"
    }

    fn group(&self) -> Group {
        Group::Notes
    }

    async fn execute(
        &self,
        ctx: &mut AppContext<S>,
        console: &mut dyn Console,
        args: &[String],
    ) -> Result<Outcome> {
        let dir = choose_export_dir(console, args, &ctx.settings.export_path)?;
        let storage = LocalStorage::new(&dir);
        let file = export::export_notes(&ctx.notes, &storage).await?;

        console.success(&format!(
            "Exported {} note(s) to {}",
            ctx.notes.len(),
            storage.resolve(&file).display()
        ));
        Ok(Outcome::Done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::console::ScriptedConsole;
    use crate::config::Settings;
    use crate::core::persistence::DataStore;

    fn context(dir: &std::path::Path) -> AppContext<LocalStorage> {
        let store = DataStore::new(LocalStorage::new(dir), "contacts.json", "notes.json");
        AppContext::new(store, Settings::default())
    }

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_add_note_collects_content_and_tags() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path());
        let mut console = ScriptedConsole::new(["Buy milk", "shopping", "home list", "#shopping", ""]);

        let outcome = Command::<LocalStorage>::execute(&AddNote, &mut ctx, &mut console, &args(&["Groceries"]))
            .await
            .unwrap();

        assert_eq!(outcome, Outcome::Modified(Collection::Notes));
        let note = ctx.notes.find_note("Groceries").unwrap();
        assert_eq!(note.content().unwrap().as_str(), "Buy milk");
        let tags: Vec<_> = note.tags().iter().map(|t| t.as_str()).collect();
        assert_eq!(tags, vec!["#shopping", "#home_list"]);
        assert!(console.contains("Tag already present"));
    }

    #[tokio::test]
    async fn test_long_tag_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path());
        ctx.notes.add_note("Plans").unwrap();
        let long = "x".repeat(26);
        let mut console = ScriptedConsole::new(Vec::<String>::new());

        let result = Command::<LocalStorage>::execute(&AddTag, &mut ctx, &mut console, &args(&["Plans", long.as_str()]))
            .await;

        assert!(result.is_err());
        assert!(ctx.notes.find_note("Plans").unwrap().tags().is_empty());
    }

    #[tokio::test]
    async fn test_delete_note_requires_confirmation() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path());
        ctx.notes.add_note("Keep me").unwrap();
        let mut console = ScriptedConsole::new(["n"]);

        let result = Command::<LocalStorage>::execute(&DeleteNote, &mut ctx, &mut console, &args(&["Keep", "me"]))
            .await;

        assert!(matches!(result, Err(crate::utils::error::AssistantError::Cancelled)));
        assert_eq!(ctx.notes.len(), 1);
    }

    #[tokio::test]
    async fn test_rename_note_keeps_tags() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = context(dir.path());
        let (_, note) = ctx.notes.add_note("Draft").unwrap();
        note.add_tag("work").unwrap();
        let mut console = ScriptedConsole::new(["Final"]);

        Command::<LocalStorage>::execute(&RenameNote, &mut ctx, &mut console, &args(&["Draft"]))
            .await
            .unwrap();

        assert!(ctx.notes.find_note("Draft").is_err());
        assert_eq!(ctx.notes.find_note("Final").unwrap().tags().len(), 1);
    }
}
