use crate::core::{AddressBook, Notebook, Storage};
use crate::utils::error::{AssistantError, Result};

pub const CONTACTS_CSV: &str = "contacts.csv";
pub const NOTES_CSV: &str = "notes.csv";

const CONTACT_HEADERS: [&str; 4] = ["Name", "Phones", "Emails", "Birthday"];
const NOTE_HEADERS: [&str; 3] = ["Title", "Content", "Tags"];

pub fn contacts_to_csv(book: &AddressBook) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CONTACT_HEADERS)?;

    for contact in book.iter() {
        let phones = join(contact.phones().iter().map(|p| p.as_str()), "; ");
        let emails = join(contact.emails().iter().map(|e| e.as_str()), "; ");
        let birthday = contact.birthday().map(|b| b.to_string()).unwrap_or_default();
        writer.write_record([
            contact.name().as_str(),
            phones.as_str(),
            emails.as_str(),
            birthday.as_str(),
        ])?;
    }

    finish(writer)
}

pub fn notes_to_csv(notebook: &Notebook) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(NOTE_HEADERS)?;

    for note in notebook.iter() {
        let content = note.content().map(|c| c.as_str()).unwrap_or_default();
        let tags = join(note.tags().iter().map(|t| t.as_str()), ", ");
        writer.write_record([note.title().as_str(), content, tags.as_str()])?;
    }

    finish(writer)
}

fn join<'a>(values: impl Iterator<Item = &'a str>, sep: &str) -> String {
    values.collect::<Vec<_>>().join(sep)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| AssistantError::IoError(e.into_error()))
}

/// 將 CSV 寫入目標儲存區，回傳檔名
pub async fn export_contacts<S: Storage>(book: &AddressBook, storage: &S) -> Result<String> {
    let data = contacts_to_csv(book)?;
    storage.write_file(CONTACTS_CSV, &data).await?;
    tracing::info!("Exported {} contacts ({} bytes)", book.len(), data.len());
    Ok(CONTACTS_CSV.to_string())
}

pub async fn export_notes<S: Storage>(notebook: &Notebook, storage: &S) -> Result<String> {
    let data = notes_to_csv(notebook)?;
    storage.write_file(NOTES_CSV, &data).await?;
    tracing::info!("Exported {} notes ({} bytes)", notebook.len(), data.len());
    Ok(NOTES_CSV.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_book_has_header_only() {
        let csv = contacts_to_csv(&AddressBook::new()).unwrap();
        assert_eq!(String::from_utf8(csv).unwrap(), "Name,Phones,Emails,Birthday\n");
    }

    #[test]
    fn test_contact_rows() {
        let mut book = AddressBook::new();
        let (_, anna) = book.add("Anna").unwrap();
        anna.add_phone("0501234567").unwrap();
        anna.add_phone("0671234567").unwrap();
        anna.set_birthday("01.02.1990").unwrap();
        book.add("Bob").unwrap();

        let csv = String::from_utf8(contacts_to_csv(&book).unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "Anna,+380501234567; +380671234567,,01.02.1990");
        assert_eq!(lines[2], "Bob,,,");
    }

    #[test]
    fn test_note_rows_are_quoted() {
        let mut notebook = Notebook::new();
        let (_, note) = notebook.add_note("Groceries").unwrap();
        note.set_content("milk, bread").unwrap();
        note.add_tag("food").unwrap();
        note.add_tag("weekly").unwrap();

        let csv = String::from_utf8(notes_to_csv(&notebook).unwrap()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Title,Content,Tags");
        assert_eq!(lines[1], "Groceries,\"milk, bread\",\"#food, #weekly\"");
    }
}
