use crate::domain::model::{Contact, ContactField, Name, UpcomingBirthday};
use crate::utils::error::{AssistantError, Result};
use chrono::{Datelike, Days, Duration, NaiveDate, Weekday};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// `add` 的結果：新建或沿用既有記錄
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Created,
    Existing,
}

/// 通訊錄：以正規化姓名為鍵，保留插入順序
///
/// 序列化為聯絡人陣列，載入時由姓名重建鍵。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Contact>", into = "Vec<Contact>")]
pub struct AddressBook {
    records: IndexMap<String, Contact>,
}

impl TryFrom<Vec<Contact>> for AddressBook {
    type Error = AssistantError;

    fn try_from(contacts: Vec<Contact>) -> Result<Self> {
        let mut records = IndexMap::with_capacity(contacts.len());
        for contact in contacts {
            let key = contact.name().as_str().to_string();
            if records.contains_key(&key) {
                return Err(AssistantError::validation("contact", &key, "listed more than once"));
            }
            records.insert(key, contact);
        }
        Ok(Self { records })
    }
}

impl From<AddressBook> for Vec<Contact> {
    fn from(book: AddressBook) -> Self {
        book.records.into_values().collect()
    }
}

impl AddressBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Contact> {
        self.records.values()
    }

    /// 依姓名找出或建立聯絡人
    pub fn add(&mut self, name: &str) -> Result<(AddOutcome, &mut Contact)> {
        let name = Name::parse(name)?;
        let key = name.as_str().to_string();
        let outcome = if self.records.contains_key(&key) {
            AddOutcome::Existing
        } else {
            tracing::debug!("Creating contact {}", key);
            AddOutcome::Created
        };
        let contact = self.records.entry(key).or_insert_with(|| Contact::new(name));
        Ok((outcome, contact))
    }

    pub fn find_by_name(&self, name: &str) -> Result<&Contact> {
        let key = Name::parse(name)?;
        self.records
            .get(key.as_str())
            .ok_or_else(|| AssistantError::not_found("Contact", key.as_str()))
    }

    pub fn find_by_name_mut(&mut self, name: &str) -> Result<&mut Contact> {
        let key = Name::parse(name)?;
        self.records
            .get_mut(key.as_str())
            .ok_or_else(|| AssistantError::not_found("Contact", key.as_str()))
    }

    /// 不分大小寫的子字串搜尋
    pub fn find(&self, query: &str, field: ContactField) -> Vec<&Contact> {
        let query = query.trim().to_lowercase();
        self.records
            .values()
            .filter(|c| c.matches(field, &query))
            .collect()
    }

    pub fn delete(&mut self, name: &str) -> Result<Contact> {
        let key = Name::parse(name)?;
        self.records
            .shift_remove(key.as_str())
            .ok_or_else(|| AssistantError::not_found("Contact", key.as_str()))
    }

    /// `[today, today + days]` 內的生日，週末順延到下週一
    pub fn upcoming_in_days(&self, days: u32, today: NaiveDate) -> Vec<UpcomingBirthday> {
        let last_day = today
            .checked_add_days(Days::new(u64::from(days)))
            .unwrap_or(NaiveDate::MAX);

        self.records
            .values()
            .filter_map(|contact| {
                let birthday = contact.birthday()?.next_occurrence(today);
                (birthday <= last_day).then(|| UpcomingBirthday {
                    name: contact.name().to_string(),
                    birthday,
                    congratulation_date: shift_weekend(birthday),
                })
            })
            .collect()
    }
}

fn shift_weekend(date: NaiveDate) -> NaiveDate {
    match date.weekday() {
        Weekday::Sat => date + Duration::days(2),
        Weekday::Sun => date + Duration::days(1),
        _ => date,
    }
}
