use crate::core::{AddressBook, Notebook, Storage};
use crate::utils::error::{AssistantError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// 以 JSON 整份讀寫兩個集合
pub struct DataStore<S: Storage> {
    storage: S,
    contacts_file: String,
    notes_file: String,
}

impl<S: Storage> DataStore<S> {
    pub fn new(storage: S, contacts_file: impl Into<String>, notes_file: impl Into<String>) -> Self {
        Self {
            storage,
            contacts_file: contacts_file.into(),
            notes_file: notes_file.into(),
        }
    }

    pub async fn load_contacts(&self) -> Result<AddressBook> {
        self.load(&self.contacts_file).await
    }

    pub async fn save_contacts(&self, book: &AddressBook) -> Result<()> {
        self.save(&self.contacts_file, book).await
    }

    pub async fn load_notes(&self) -> Result<Notebook> {
        self.load(&self.notes_file).await
    }

    pub async fn save_notes(&self, notebook: &Notebook) -> Result<()> {
        self.save(&self.notes_file, notebook).await
    }

    /// 檔案不存在時回傳空集合
    async fn load<T: DeserializeOwned + Default>(&self, file: &str) -> Result<T> {
        match self.storage.read_file(file).await {
            Ok(data) => {
                let value = serde_json::from_slice(&data)?;
                tracing::debug!("Loaded {} ({} bytes)", file, data.len());
                Ok(value)
            }
            Err(AssistantError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No saved data in {}, starting empty", file);
                Ok(T::default())
            }
            Err(e) => Err(e),
        }
    }

    async fn save<T: Serialize + Sync>(&self, file: &str, value: &T) -> Result<()> {
        let data = serde_json::to_vec_pretty(value)?;
        tracing::debug!("Writing {} ({} bytes)", file, data.len());
        self.storage.write_file(file, &data).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                AssistantError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    #[test]
    fn test_missing_files_load_empty() {
        let store = DataStore::new(MockStorage::default(), "contacts.json", "notes.json");
        let book = tokio_test::block_on(store.load_contacts()).unwrap();
        let notes = tokio_test::block_on(store.load_notes()).unwrap();
        assert!(book.is_empty());
        assert!(notes.is_empty());
    }

    #[tokio::test]
    async fn test_contacts_round_trip() {
        let store = DataStore::new(MockStorage::default(), "contacts.json", "notes.json");

        let mut book = AddressBook::new();
        book.add("Zed").unwrap();
        let (_, anna) = book.add("Anna").unwrap();
        anna.add_phone("0501234567").unwrap();
        anna.add_email("anna@example.com").unwrap();
        anna.set_birthday("01.02.1990").unwrap();
        anna.set_address("Kyiv").unwrap();
        book.add("Bob").unwrap();

        store.save_contacts(&book).await.unwrap();
        let loaded = store.load_contacts().await.unwrap();
        assert_eq!(loaded, book);
        let names: Vec<_> = loaded.iter().map(|c| c.name().as_str()).collect();
        assert_eq!(names, vec!["Zed", "Anna", "Bob"]);
    }

    #[tokio::test]
    async fn test_notes_round_trip() {
        let store = DataStore::new(MockStorage::default(), "contacts.json", "notes.json");

        let mut notebook = Notebook::new();
        notebook.add_note("Trip").unwrap();
        let (_, note) = notebook.add_note("Groceries").unwrap();
        note.set_content("milk, bread").unwrap();
        note.add_tag("shopping list").unwrap();
        notebook.add_note("Books").unwrap();

        store.save_notes(&notebook).await.unwrap();
        let loaded = store.load_notes().await.unwrap();
        assert_eq!(loaded, notebook);
        let titles: Vec<_> = loaded.iter().map(|n| n.title().as_str()).collect();
        assert_eq!(titles, vec!["Trip", "Groceries", "Books"]);
    }

    #[tokio::test]
    async fn test_corrupt_file_is_an_error() {
        let storage = MockStorage::default();
        storage.write_file("contacts.json", b"not json").await.unwrap();
        let store = DataStore::new(storage, "contacts.json", "notes.json");
        assert!(matches!(
            store.load_contacts().await,
            Err(AssistantError::SerializationError(_))
        ));
    }
}
