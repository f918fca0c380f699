use crate::core::address_book::AddOutcome;
use crate::domain::model::{Note, NoteField, Title};
use crate::utils::error::{AssistantError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 筆記本：以標題為鍵，保留插入順序
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Note>", into = "Vec<Note>")]
pub struct Notebook {
    notes: IndexMap<String, Note>,
}

impl TryFrom<Vec<Note>> for Notebook {
    type Error = AssistantError;

    fn try_from(list: Vec<Note>) -> Result<Self> {
        let mut notes = IndexMap::with_capacity(list.len());
        for note in list {
            let key = note.title().as_str().to_string();
            if notes.contains_key(&key) {
                return Err(AssistantError::validation("note", &key, "listed more than once"));
            }
            notes.insert(key, note);
        }
        Ok(Self { notes })
    }
}

impl From<Notebook> for Vec<Note> {
    fn from(notebook: Notebook) -> Self {
        notebook.notes.into_values().collect()
    }
}

impl Notebook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.notes.values()
    }

    pub fn add_note(&mut self, title: &str) -> Result<(AddOutcome, &mut Note)> {
        let title = Title::parse(title)?;
        let key = title.as_str().to_string();
        let outcome = if self.notes.contains_key(&key) {
            AddOutcome::Existing
        } else {
            tracing::debug!("Creating note {}", key);
            AddOutcome::Created
        };
        let note = self.notes.entry(key).or_insert_with(|| Note::new(title));
        Ok((outcome, note))
    }

    pub fn find_note(&self, title: &str) -> Result<&Note> {
        let key = title.trim();
        self.notes
            .get(key)
            .ok_or_else(|| AssistantError::not_found("Note", key))
    }

    pub fn find_note_mut(&mut self, title: &str) -> Result<&mut Note> {
        let key = title.trim();
        self.notes
            .get_mut(key)
            .ok_or_else(|| AssistantError::not_found("Note", key))
    }

    pub fn delete_note(&mut self, title: &str) -> Result<Note> {
        let key = title.trim();
        self.notes
            .shift_remove(key)
            .ok_or_else(|| AssistantError::not_found("Note", key))
    }

    pub fn search(&self, query: &str, field: NoteField) -> Vec<&Note> {
        let query = query.trim().to_lowercase();
        self.notes
            .values()
            .filter(|n| n.matches(field, &query))
            .collect()
    }

    /// 更改標題 (即更改鍵)，保留原本的排列位置
    pub fn rename_note(&mut self, old: &str, new: &str) -> Result<&Note> {
        let old_key = old.trim();
        let index = self
            .notes
            .get_index_of(old_key)
            .ok_or_else(|| AssistantError::not_found("Note", old_key))?;

        let title = Title::parse(new)?;
        let new_key = title.as_str().to_string();
        if new_key != old_key && self.notes.contains_key(&new_key) {
            return Err(AssistantError::validation(
                "title",
                &new_key,
                "another note already uses this title",
            ));
        }

        let (_, mut note) = self
            .notes
            .shift_remove_index(index)
            .ok_or_else(|| AssistantError::not_found("Note", old_key))?;
        note.set_title(title);
        let (last, _) = self.notes.insert_full(new_key, note);
        self.notes.move_index(last, index);

        Ok(&self.notes[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notebook(titles: &[&str]) -> Notebook {
        let mut notebook = Notebook::new();
        for title in titles {
            notebook.add_note(title).unwrap();
        }
        notebook
    }

    #[test]
    fn test_duplicate_titles_in_saved_data_are_rejected() {
        let json = r#"[{"title": "Plans", "content": "first"}, {"title": "Plans"}]"#;
        let result: std::result::Result<Notebook, _> = serde_json::from_str(json);
        assert!(result.unwrap_err().to_string().contains("listed more than once"));
    }

    #[test]
    fn test_add_existing_title_updates() {
        let mut notebook = Notebook::new();
        let (outcome, note) = notebook.add_note("Groceries").unwrap();
        assert_eq!(outcome, AddOutcome::Created);
        note.set_content("milk").unwrap();

        let (outcome, note) = notebook.add_note(" Groceries ").unwrap();
        assert_eq!(outcome, AddOutcome::Existing);
        assert_eq!(note.content().unwrap().as_str(), "milk");
        assert_eq!(notebook.len(), 1);
    }

    #[test]
    fn test_delete_missing_note() {
        let mut notebook = notebook(&["Groceries"]);
        assert!(matches!(
            notebook.delete_note("Todo"),
            Err(AssistantError::NotFoundError { .. })
        ));
        assert_eq!(notebook.len(), 1);
    }

    #[test]
    fn test_search() {
        let mut notebook = notebook(&["Groceries", "Trip plan"]);
        let trip = notebook.find_note_mut("Trip plan").unwrap();
        trip.set_content("Book tickets to Odesa").unwrap();
        trip.add_tag("travel").unwrap();

        assert_eq!(notebook.search("TRIP", NoteField::Title).len(), 1);
        assert_eq!(notebook.search("odesa", NoteField::Content).len(), 1);
        assert_eq!(notebook.search("#trav", NoteField::Tag).len(), 1);
        assert!(notebook.search("milk", NoteField::Content).is_empty());
    }

    #[test]
    fn test_rename_keeps_position() {
        let mut notebook = notebook(&["A note", "B note", "C note"]);
        notebook.rename_note("B note", "Better note").unwrap();

        let titles: Vec<_> = notebook.iter().map(|n| n.title().to_string()).collect();
        assert_eq!(titles, vec!["A note", "Better note", "C note"]);
        assert!(notebook.find_note("B note").is_err());
    }

    #[test]
    fn test_rename_rejects_taken_title() {
        let mut notebook = notebook(&["A note", "B note"]);
        assert!(notebook.rename_note("A note", "B note").is_err());
        assert!(notebook.rename_note("Missing", "X").is_err());
        assert_eq!(notebook.len(), 2);
        assert!(notebook.find_note("A note").is_ok());
    }
}
