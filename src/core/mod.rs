pub mod address_book;
pub mod export;
pub mod notebook;
pub mod persistence;

pub use address_book::{AddOutcome, AddressBook};
pub use notebook::Notebook;

pub use crate::domain::model::{Contact, Note};
pub use crate::domain::ports::{ConfigProvider, Console, Storage};
pub use crate::utils::error::Result;
