use crate::config::Settings;
use crate::core::persistence::DataStore;
use crate::core::{AddressBook, Notebook, Storage};
use crate::utils::error::Result;
use chrono::NaiveDate;

/// 哪一個集合被修改，REPL 依此決定寫回哪個檔案
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Contacts,
    Notes,
}

/// 程式執行期間的全部狀態，由 `main` 建立後交給 REPL
pub struct AppContext<S: Storage> {
    pub book: AddressBook,
    pub notes: Notebook,
    pub settings: Settings,
    store: DataStore<S>,
    today: Option<NaiveDate>,
}

impl<S: Storage> AppContext<S> {
    pub fn new(store: DataStore<S>, settings: Settings) -> Self {
        Self {
            book: AddressBook::new(),
            notes: Notebook::new(),
            settings,
            store,
            today: None,
        }
    }

    /// 從儲存區載入兩個集合
    pub async fn load(store: DataStore<S>, settings: Settings) -> Result<Self> {
        let book = store.load_contacts().await?;
        let notes = store.load_notes().await?;
        tracing::info!("Loaded {} contacts and {} notes", book.len(), notes.len());

        Ok(Self {
            book,
            notes,
            settings,
            store,
            today: None,
        })
    }

    /// 固定「今天」的日期，測試生日計算用
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }

    pub async fn persist(&self, collection: Collection) -> Result<()> {
        match collection {
            Collection::Contacts => self.store.save_contacts(&self.book).await,
            Collection::Notes => self.store.save_notes(&self.notes).await,
        }
    }

    pub async fn save_all(&self) -> Result<()> {
        self.persist(Collection::Contacts).await?;
        self.persist(Collection::Notes).await
    }
}
