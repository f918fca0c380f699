use crate::utils::error::{AssistantError, Result};
use crate::utils::validation::{self, DATE_FORMAT, MAX_TAGS};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 以字串為底的驗證值型別：只能透過 `parse` 建立，反序列化時同樣驗證
macro_rules! validated_string {
    ($(#[$meta:meta])* $ty:ident, $normalize:path) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $ty(String);

        impl $ty {
            pub fn parse(raw: &str) -> Result<Self> {
                $normalize(raw).map(Self)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $ty {
            type Error = AssistantError;

            fn try_from(raw: String) -> Result<Self> {
                Self::parse(&raw)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> String {
                value.0
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

fn checked_email(raw: &str) -> Result<String> {
    let email = raw.trim();
    if validation::validate_email(email) {
        Ok(email.to_string())
    } else {
        Err(AssistantError::validation("email", raw, "expected local@domain.tld"))
    }
}

validated_string!(
    /// 聯絡人姓名，也是通訊錄的主鍵
    Name,
    validation::normalize_name
);
validated_string!(Phone, validation::normalize_phone);
validated_string!(Email, checked_email);
validated_string!(Address, validation::validate_address);
validated_string!(
    /// 筆記標題，也是筆記本的主鍵
    Title,
    validation::validate_title
);
validated_string!(Tag, validation::normalize_tag);
validated_string!(Content, validation::validate_content);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Birthday(NaiveDate);

impl Birthday {
    pub fn parse(raw: &str) -> Result<Self> {
        validation::parse_date(raw).map(Self)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// 今年 (或明年) 的生日日期；2/29 在非閏年視為 2/28
    pub fn next_occurrence(&self, today: NaiveDate) -> NaiveDate {
        let this_year = anniversary_in(self.0, today.year());
        if this_year < today {
            anniversary_in(self.0, today.year() + 1)
        } else {
            this_year
        }
    }
}

fn anniversary_in(date: NaiveDate, year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, date.month(), date.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, date.month(), date.day() - 1))
        .unwrap_or(date)
}

impl TryFrom<String> for Birthday {
    type Error = AssistantError;

    fn try_from(raw: String) -> Result<Self> {
        Self::parse(&raw)
    }
}

impl From<Birthday> for String {
    fn from(value: Birthday) -> String {
        value.to_string()
    }
}

impl fmt::Display for Birthday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Phone,
    Email,
    Birthday,
    Address,
}

impl FromStr for ContactField {
    type Err = AssistantError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "phone" | "phones" => Ok(Self::Phone),
            "email" | "emails" => Ok(Self::Email),
            "birthday" => Ok(Self::Birthday),
            "address" => Ok(Self::Address),
            _ => Err(AssistantError::validation(
                "search field",
                s,
                "choose one of name, phone, email, birthday, address",
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteField {
    Title,
    Content,
    Tag,
}

impl FromStr for NoteField {
    type Err = AssistantError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "content" => Ok(Self::Content),
            "tag" | "tags" => Ok(Self::Tag),
            _ => Err(AssistantError::validation(
                "search field",
                s,
                "choose one of title, content, tag",
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    name: Name,
    #[serde(default)]
    phones: Vec<Phone>,
    #[serde(default)]
    emails: Vec<Email>,
    #[serde(default)]
    birthday: Option<Birthday>,
    #[serde(default)]
    address: Option<Address>,
}

impl Contact {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            phones: Vec::new(),
            emails: Vec::new(),
            birthday: None,
            address: None,
        }
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn phones(&self) -> &[Phone] {
        &self.phones
    }

    pub fn emails(&self) -> &[Email] {
        &self.emails
    }

    pub fn birthday(&self) -> Option<&Birthday> {
        self.birthday.as_ref()
    }

    pub fn address(&self) -> Option<&Address> {
        self.address.as_ref()
    }

    /// 新增電話；已存在則視為成功，不重複加入
    pub fn add_phone(&mut self, raw: &str) -> Result<Phone> {
        let phone = Phone::parse(raw)?;
        if !self.phones.contains(&phone) {
            self.phones.push(phone.clone());
        }
        Ok(phone)
    }

    pub fn change_phone(&mut self, old: &str, new: &str) -> Result<Phone> {
        let index = self.phone_index(old)?;
        let phone = Phone::parse(new)?;
        replace_unique(&mut self.phones, index, phone.clone());
        Ok(phone)
    }

    pub fn delete_phone(&mut self, raw: &str) -> Result<Phone> {
        let index = self.phone_index(raw)?;
        Ok(self.phones.remove(index))
    }

    fn phone_index(&self, raw: &str) -> Result<usize> {
        let key = Phone::parse(raw)
            .map(String::from)
            .unwrap_or_else(|_| raw.trim().to_string());
        self.phones
            .iter()
            .position(|p| p.as_str() == key)
            .ok_or_else(|| AssistantError::not_found("Phone", raw))
    }

    pub fn add_email(&mut self, raw: &str) -> Result<Email> {
        let email = Email::parse(raw)?;
        if !self.emails.contains(&email) {
            self.emails.push(email.clone());
        }
        Ok(email)
    }

    pub fn change_email(&mut self, old: &str, new: &str) -> Result<Email> {
        let index = self.email_index(old)?;
        let email = Email::parse(new)?;
        replace_unique(&mut self.emails, index, email.clone());
        Ok(email)
    }

    pub fn delete_email(&mut self, raw: &str) -> Result<Email> {
        let index = self.email_index(raw)?;
        Ok(self.emails.remove(index))
    }

    fn email_index(&self, raw: &str) -> Result<usize> {
        let key = raw.trim();
        self.emails
            .iter()
            .position(|e| e.as_str() == key)
            .ok_or_else(|| AssistantError::not_found("Email", raw))
    }

    /// 設定生日，回傳被取代的舊值
    pub fn set_birthday(&mut self, raw: &str) -> Result<Option<Birthday>> {
        let birthday = Birthday::parse(raw)?;
        Ok(self.birthday.replace(birthday))
    }

    pub fn set_address(&mut self, raw: &str) -> Result<Option<Address>> {
        let address = Address::parse(raw)?;
        Ok(self.address.replace(address))
    }

    pub fn delete_address(&mut self) -> Result<Address> {
        self.address
            .take()
            .ok_or_else(|| AssistantError::not_found("Address of", self.name.as_str()))
    }

    /// `query` 必須已轉小寫
    pub(crate) fn matches(&self, field: ContactField, query: &str) -> bool {
        let hit = |value: &str| value.to_lowercase().contains(query);
        match field {
            ContactField::Name => hit(self.name.as_str()),
            ContactField::Phone => self.phones.iter().any(|p| hit(p.as_str())),
            ContactField::Email => self.emails.iter().any(|e| hit(e.as_str())),
            ContactField::Birthday => self.birthday.is_some_and(|b| hit(&b.to_string())),
            ContactField::Address => self.address.as_ref().is_some_and(|a| hit(a.as_str())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    title: Title,
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    tags: Vec<Tag>,
}

impl Note {
    pub fn new(title: Title) -> Self {
        Self {
            title,
            content: None,
            tags: Vec::new(),
        }
    }

    pub fn title(&self) -> &Title {
        &self.title
    }

    pub fn content(&self) -> Option<&Content> {
        self.content.as_ref()
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub(crate) fn set_title(&mut self, title: Title) {
        self.title = title;
    }

    /// 新增標籤；回傳是否真的加入 (重複標籤不加入)
    pub fn add_tag(&mut self, raw: &str) -> Result<bool> {
        let tag = Tag::parse(raw)?;
        if self.tags.contains(&tag) {
            return Ok(false);
        }
        if self.tags.len() >= MAX_TAGS {
            return Err(AssistantError::validation(
                "tag",
                tag.as_str(),
                format!("a note can hold at most {} tags", MAX_TAGS),
            ));
        }
        self.tags.push(tag);
        Ok(true)
    }

    pub fn edit_tag(&mut self, old: &str, new: &str) -> Result<Tag> {
        let index = self.tag_index(old)?;
        let tag = Tag::parse(new)?;
        replace_unique(&mut self.tags, index, tag.clone());
        Ok(tag)
    }

    pub fn delete_tag(&mut self, raw: &str) -> Result<Tag> {
        let index = self.tag_index(raw)?;
        Ok(self.tags.remove(index))
    }

    fn tag_index(&self, raw: &str) -> Result<usize> {
        let key = Tag::parse(raw).map_err(|_| AssistantError::not_found("Tag", raw))?;
        self.tags
            .iter()
            .position(|t| *t == key)
            .ok_or_else(|| AssistantError::not_found("Tag", key.as_str()))
    }

    pub fn set_content(&mut self, raw: &str) -> Result<Option<Content>> {
        let content = Content::parse(raw)?;
        Ok(self.content.replace(content))
    }

    pub fn delete_content(&mut self) -> Result<Content> {
        self.content
            .take()
            .ok_or_else(|| AssistantError::not_found("Content of note", self.title.as_str()))
    }

    pub(crate) fn matches(&self, field: NoteField, query: &str) -> bool {
        let hit = |value: &str| value.to_lowercase().contains(query);
        match field {
            NoteField::Title => hit(self.title.as_str()),
            NoteField::Content => self.content.as_ref().is_some_and(|c| hit(c.as_str())),
            NoteField::Tag => self.tags.iter().any(|t| hit(t.as_str())),
        }
    }
}

/// 取代 `index` 的值；若新值已在別處出現，直接移除舊值以保持唯一
fn replace_unique<T: PartialEq>(values: &mut Vec<T>, index: usize, value: T) {
    if values.iter().enumerate().any(|(i, v)| i != index && *v == value) {
        values.remove(index);
    } else {
        values[index] = value;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingBirthday {
    pub name: String,
    pub birthday: NaiveDate,
    pub congratulation_date: NaiveDate,
}
