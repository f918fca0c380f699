use super::{
    ask_until_valid, choose_export_dir, confirm_or_cancel, joined, require, split_trailing,
    Command, CommandRegistry, Group, Outcome,
};
use crate::app::context::{AppContext, Collection};
use crate::app::table::Table;
use crate::config::cli::LocalStorage;
use crate::config::MAX_BIRTHDAY_WINDOW;
use crate::core::address_book::AddOutcome;
use crate::core::{export, Storage};
use crate::domain::model::{Contact, ContactField};
use crate::domain::ports::Console;
use crate::utils::error::{AssistantError, Result};
use crate::utils::validation;
use async_trait::async_trait;

const NAME_PROMPT: &str = "Contact name: ";

pub fn register<S: Storage + 'static>(registry: &mut CommandRegistry<S>) {
    registry.register(AddContact);
    registry.register(ShowContact);
    registry.register(AllContacts);
    registry.register(FindContact);
    registry.register(EditContact);
    registry.register(DeleteContact);
    for kind in [ListField::Phone, ListField::Email] {
        registry.register(AddValue(kind));
        registry.register(ChangeValue(kind));
        registry.register(DeleteValue(kind));
        registry.register(ShowValue(kind));
    }
    registry.register(AddBirthday);
    registry.register(ShowBirthday);
    registry.register(AllBirthdays);
    registry.register(SetAddress);
    registry.register(DeleteAddress);
    registry.register(ExportContacts);
}

pub fn contacts_table<'a>(contacts: impl IntoIterator<Item = &'a Contact>, title: &str) -> String {
    let mut table = Table::new(["Name", "Phones", "Emails", "Birthday", "Address"]).title(title);
    for contact in contacts {
        let phones: Vec<&str> = contact.phones().iter().map(|p| p.as_str()).collect();
        let emails: Vec<&str> = contact.emails().iter().map(|e| e.as_str()).collect();
        table.add_row([
            contact.name().to_string(),
            or_dash(phones.join("\n")),
            or_dash(emails.join("\n")),
            contact
                .birthday()
                .map(|b| b.to_string())
                .unwrap_or_else(|| "-".to_string()),
            contact
                .address()
                .map(|a| a.to_string())
                .unwrap_or_else(|| "-".to_string()),
        ]);
    }
    table.render()
}

fn or_dash(value: String) -> String {
    if value.is_empty() {
        "-".to_string()
    } else {
        value
    }
}

/// 聯絡人上的多值欄位：電話與電子郵件共用同一組指令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListField {
    Phone,
    Email,
}

impl ListField {
    fn label(self) -> &'static str {
        match self {
            Self::Phone => "Phone",
            Self::Email => "Email",
        }
    }

    fn add(self, contact: &mut Contact, raw: &str) -> Result<String> {
        match self {
            Self::Phone => contact.add_phone(raw).map(String::from),
            Self::Email => contact.add_email(raw).map(String::from),
        }
    }

    fn change(self, contact: &mut Contact, old: &str, new: &str) -> Result<String> {
        match self {
            Self::Phone => contact.change_phone(old, new).map(String::from),
            Self::Email => contact.change_email(old, new).map(String::from),
        }
    }

    fn delete(self, contact: &mut Contact, raw: &str) -> Result<String> {
        match self {
            Self::Phone => contact.delete_phone(raw).map(String::from),
            Self::Email => contact.delete_email(raw).map(String::from),
        }
    }

    fn values(self, contact: &Contact) -> Vec<String> {
        match self {
            Self::Phone => contact.phones().iter().map(|p| p.to_string()).collect(),
            Self::Email => contact.emails().iter().map(|e| e.to_string()).collect(),
        }
    }
}

pub struct AddContact;

#[async_trait]
impl<S: Storage> Command<S> for AddContact {
    fn name(&self) -> &'static str {
        "add contact"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["expand contact"]
    }

    fn usage(&self) -> &'static str {
        "add contact [name]"
    }

    fn description(&self) -> &'static str {
        "Adds a new contact or updates an existing one"
    }

    fn group(&self) -> Group {
        Group::Contacts
    }

    async fn execute(
        &self,
        ctx: &mut AppContext<S>,
        console: &mut dyn Console,
        args: &[String],
    ) -> Result<Outcome> {
        let name = require(console, joined(args), NAME_PROMPT, Command::<S>::usage(self))?;
        let (outcome, contact) = ctx.book.add(&name)?;
        match outcome {
            AddOutcome::Created => console.success(&format!("Contact {} created.", contact.name())),
            AddOutcome::Existing => {
                console.warn(&format!("Contact {} already exists. Updating details...", contact.name()))
            }
        }

        ask_until_valid(console, "Phone (Enter to skip): ", |v| contact.add_phone(v));
        ask_until_valid(console, "Email (Enter to skip): ", |v| contact.add_email(v));
        ask_until_valid(console, "Birthday DD.MM.YYYY (Enter to skip): ", |v| {
            contact.set_birthday(v)
        });
        ask_until_valid(console, "Address (Enter to skip): ", |v| contact.set_address(v));

        console.print(&contacts_table([&*contact], "Contact"));
        Ok(Outcome::Modified(Collection::Contacts))
    }
}

pub struct ShowContact;

#[async_trait]
impl<S: Storage> Command<S> for ShowContact {
    fn name(&self) -> &'static str {
        "show contact"
    }

    fn usage(&self) -> &'static str {
        "show contact <name>"
    }

    fn description(&self) -> &'static str {
        "Shows all details of a contact"
    }

    fn group(&self) -> Group {
        Group::Contacts
    }

    async fn execute(
        &self,
        ctx: &mut AppContext<S>,
        console: &mut dyn Console,
        args: &[String],
    ) -> Result<Outcome> {
        let name = require(console, joined(args), NAME_PROMPT, Command::<S>::usage(self))?;
        let contact = ctx.book.find_by_name(&name)?;
        console.print(&contacts_table([contact], "Contact"));
        Ok(Outcome::Done)
    }
}

pub struct AllContacts;

#[async_trait]
impl<S: Storage> Command<S> for AllContacts {
    fn name(&self) -> &'static str {
        "all contacts"
    }

    fn description(&self) -> &'static str {
        "Shows all contacts"
    }

    fn group(&self) -> Group {
        Group::Contacts
    }

    async fn execute(
        &self,
        ctx: &mut AppContext<S>,
        console: &mut dyn Console,
        _args: &[String],
    ) -> Result<Outcome> {
        if ctx.book.is_empty() {
            console.warn("No contacts saved yet.");
        } else {
            let title = format!("Contacts ({})", ctx.book.len());
            console.print(&contacts_table(ctx.book.iter(), &title));
        }
        Ok(Outcome::Done)
    }
}

pub struct FindContact;

#[async_trait]
impl<S: Storage> Command<S> for FindContact {
    fn name(&self) -> &'static str {
        "find contact"
    }

    fn usage(&self) -> &'static str {
        "find contact [field] [query]"
    }

    fn description(&self) -> &'static str {
        "Searches contacts by name, phone, email, birthday or address"
    }

    fn group(&self) -> Group {
        Group::Contacts
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
            "Search by (name/phone/email/birthday/address): ",
            usage,
        )?;
        let field: ContactField = field.parse()?;
        let query = require(console, joined(args.get(1..).unwrap_or_default()), "Search for: ", usage)?;

        let found = ctx.book.find(&query, field);
        if found.is_empty() {
            console.warn(&format!("No contacts match '{}'.", query));
        } else {
            let title = format!("Found {} contact(s)", found.len());
            console.print(&contacts_table(found, &title));
        }
        Ok(Outcome::Done)
    }
}

pub struct EditContact;

impl EditContact {
    const USAGE: &'static str = "edit contact [name]";

    fn edit_list(
        kind: ListField,
        contact: &mut Contact,
        console: &mut dyn Console,
    ) -> Result<String> {
        let action = require(console, None, "Action (add/change/delete): ", Self::USAGE)?;
        let label = kind.label();
        match action.to_lowercase().as_str() {
            "add" => {
                let value = require(console, None, &format!("New {}: ", label), Self::USAGE)?;
                let stored = kind.add(contact, &value)?;
                Ok(format!("{} {} added.", label, stored))
            }
            "change" => {
                let old = require(console, None, &format!("Current {}: ", label), Self::USAGE)?;
                let new = require(console, None, &format!("New {}: ", label), Self::USAGE)?;
                let stored = kind.change(contact, &old, &new)?;
                Ok(format!("{} changed to {}.", label, stored))
            }
            "delete" => {
                let value = require(console, None, &format!("{} to delete: ", label), Self::USAGE)?;
                let removed = kind.delete(contact, &value)?;
                Ok(format!("{} {} deleted.", label, removed))
            }
            other => Err(AssistantError::validation(
                "action",
                other,
                "choose add, change or delete",
            )),
        }
    }
}

#[async_trait]
impl<S: Storage> Command<S> for EditContact {
    fn name(&self) -> &'static str {
        "edit contact"
    }

    fn usage(&self) -> &'static str {
        Self::USAGE
    }

    fn description(&self) -> &'static str {
        "Edits phones, emails, birthday or address of a contact"
    }

    fn group(&self) -> Group {
        Group::Contacts
    }

    async fn execute(
        &self,
        ctx: &mut AppContext<S>,
        console: &mut dyn Console,
        args: &[String],
    ) -> Result<Outcome> {
        let name = require(console, joined(args), NAME_PROMPT, Self::USAGE)?;
        let contact = ctx.book.find_by_name_mut(&name)?;
        console.print(&contacts_table([&*contact], "Editing"));

        let field = require(
            console,
            None,
            "What to edit? (phone/email/birthday/address): ",
            Self::USAGE,
        )?;
        let message = match field.parse::<ContactField>()? {
            ContactField::Phone => Self::edit_list(ListField::Phone, contact, console)?,
            ContactField::Email => Self::edit_list(ListField::Email, contact, console)?,
            ContactField::Birthday => {
                let raw = require(console, None, "Birthday DD.MM.YYYY: ", Self::USAGE)?;
                contact.set_birthday(&raw)?;
                "Birthday updated.".to_string()
            }
            ContactField::Address => {
                let action = require(console, None, "Action (set/delete): ", Self::USAGE)?;
                if action.eq_ignore_ascii_case("delete") {
                    contact.delete_address()?;
                    "Address deleted.".to_string()
                } else {
                    let raw = require(console, None, "Address: ", Self::USAGE)?;
                    contact.set_address(&raw)?;
                    "Address updated.".to_string()
                }
            }
            ContactField::Name => {
                return Err(AssistantError::validation(
                    "field",
                    &field,
                    "names cannot be edited; delete and re-add the contact",
                ))
            }
        };

        console.success(&message);
        Ok(Outcome::Modified(Collection::Contacts))
    }
}

pub struct DeleteContact;

#[async_trait]
impl<S: Storage> Command<S> for DeleteContact {
    fn name(&self) -> &'static str {
        "delete contact"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["remove contact"]
    }

    fn usage(&self) -> &'static str {
        "delete contact <name>"
    }

    fn description(&self) -> &'static str {
        "Deletes a contact after confirmation"
    }

    fn group(&self) -> Group {
        Group::Contacts
    }

    async fn execute(
        &self,
        ctx: &mut AppContext<S>,
        console: &mut dyn Console,
        args: &[String],
    ) -> Result<Outcome> {
        let name = require(console, joined(args), NAME_PROMPT, Command::<S>::usage(self))?;
        let name = ctx.book.find_by_name(&name)?.name().to_string();

        confirm_or_cancel(console, &format!("Delete contact {}?", name))?;
        ctx.book.delete(&name)?;
        console.success(&format!("Contact {} deleted.", name));
        Ok(Outcome::Modified(Collection::Contacts))
    }
}

pub struct AddValue(pub ListField);

#[async_trait]
impl<S: Storage> Command<S> for AddValue {
    fn name(&self) -> &'static str {
        match self.0 {
            ListField::Phone => "add phone",
            ListField::Email => "add email",
        }
    }

    fn usage(&self) -> &'static str {
        match self.0 {
            ListField::Phone => "add phone <name> <phone>",
            ListField::Email => "add email <name> <email>",
        }
    }

    fn description(&self) -> &'static str {
        match self.0 {
            ListField::Phone => "Adds a phone number to a contact",
            ListField::Email => "Adds an email address to a contact",
        }
    }

    fn group(&self) -> Group {
        Group::Contacts
    }

    async fn execute(
        &self,
        ctx: &mut AppContext<S>,
        console: &mut dyn Console,
        args: &[String],
    ) -> Result<Outcome> {
        let usage = Command::<S>::usage(self);
        let label = self.0.label();
        let (name, mut rest) = split_trailing(args, 1);
        let name = require(console, name, NAME_PROMPT, usage)?;
        let contact = ctx.book.find_by_name_mut(&name)?;
        let value = require(console, rest.pop(), &format!("{}: ", label), usage)?;

        let stored = self.0.add(contact, &value)?;
        console.success(&format!("{} {} added to {}.", label, stored, contact.name()));
        Ok(Outcome::Modified(Collection::Contacts))
    }
}

pub struct ChangeValue(pub ListField);

#[async_trait]
impl<S: Storage> Command<S> for ChangeValue {
    fn name(&self) -> &'static str {
        match self.0 {
            ListField::Phone => "change phone",
            ListField::Email => "change email",
        }
    }

    fn usage(&self) -> &'static str {
        match self.0 {
            ListField::Phone => "change phone <name> <old phone> <new phone>",
            ListField::Email => "change email <name> <old email> <new email>",
        }
    }

    fn description(&self) -> &'static str {
        match self.0 {
            ListField::Phone => "Replaces a phone number of a contact",
            ListField::Email => "Replaces an email address of a contact",
        }
    }

    fn group(&self) -> Group {
        Group::Contacts
    }

    async fn execute(
        &self,
        ctx: &mut AppContext<S>,
        console: &mut dyn Console,
        args: &[String],
    ) -> Result<Outcome> {
        let usage = Command::<S>::usage(self);
        let label = self.0.label();
        let (name, rest) = split_trailing(args, 2);
        let mut rest = rest.into_iter();
        let name = require(console, name, NAME_PROMPT, usage)?;
        let contact = ctx.book.find_by_name_mut(&name)?;
        let old = require(console, rest.next(), &format!("Current {}: ", label), usage)?;
        let new = require(console, rest.next(), &format!("New {}: ", label), usage)?;

        let stored = self.0.change(contact, &old, &new)?;
        console.success(&format!("{} of {} changed to {}.", label, contact.name(), stored));
        Ok(Outcome::Modified(Collection::Contacts))
    }
}

pub struct DeleteValue(pub ListField);

#[async_trait]
impl<S: Storage> Command<S> for DeleteValue {
    fn name(&self) -> &'static str {
        match self.0 {
            ListField::Phone => "delete phone",
            ListField::Email => "delete email",
        }
    }

    fn usage(&self) -> &'static str {
        match self.0 {
            ListField::Phone => "delete phone <name> <phone>",
            ListField::Email => "delete email <name> <email>",
        }
    }

    fn description(&self) -> &'static str {
        match self.0 {
            ListField::Phone => "Removes a phone number from a contact",
            ListField::Email => "Removes an email address from a contact",
        }
    }

    fn group(&self) -> Group {
        Group::Contacts
    }

    async fn execute(
        &self,
        ctx: &mut AppContext<S>,
        console: &mut dyn Console,
        args: &[String],
    ) -> Result<Outcome> {
        let usage = Command::<S>::usage(self);
        let label = self.0.label();
        let (name, mut rest) = split_trailing(args, 1);
        let name = require(console, name, NAME_PROMPT, usage)?;
        let contact = ctx.book.find_by_name_mut(&name)?;
        let value = require(console, rest.pop(), &format!("{} to delete: ", label), usage)?;

        let removed = self.0.delete(contact, &value)?;
        console.success(&format!("{} {} removed from {}.", label, removed, contact.name()));
        Ok(Outcome::Modified(Collection::Contacts))
    }
}

pub struct ShowValue(pub ListField);

#[async_trait]
impl<S: Storage> Command<S> for ShowValue {
    fn name(&self) -> &'static str {
        match self.0 {
            ListField::Phone => "show phone",
            ListField::Email => "show email",
        }
    }

    fn usage(&self) -> &'static str {
        match self.0 {
            ListField::Phone => "show phone <name>",
            ListField::Email => "show email <name>",
        }
    }

    fn description(&self) -> &'static str {
        match self.0 {
            ListField::Phone => "Shows phone numbers of a contact",
            ListField::Email => "Shows email addresses of a contact",
        }
    }

    fn group(&self) -> Group {
        Group::Contacts
    }

    async fn execute(
        &self,
        ctx: &mut AppContext<S>,
        console: &mut dyn Console,
        args: &[String],
    ) -> Result<Outcome> {
        let name = require(console, joined(args), NAME_PROMPT, Command::<S>::usage(self))?;
        let contact = ctx.book.find_by_name(&name)?;
        let values = self.0.values(contact);
        let label = self.0.label();

        if values.is_empty() {
            console.warn(&format!("{} has no {} saved.", contact.name(), label.to_lowercase()));
        } else {
            console.print(&format!("{}s of {}:", label, contact.name()));
            for value in values {
                console.print(&format!("  {}", value));
            }
        }
        Ok(Outcome::Done)
    }
}

pub struct AddBirthday;

#[async_trait]
impl<S: Storage> Command<S> for AddBirthday {
    fn name(&self) -> &'static str {
        "add birthday"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["update birthday"]
    }

    fn usage(&self) -> &'static str {
        "add birthday <name> <DD.MM.YYYY>"
    }

    fn description(&self) -> &'static str {
        "Sets or replaces the birthday of a contact"
    }

    fn group(&self) -> Group {
        Group::Contacts
    }

    async fn execute(
        &self,
        ctx: &mut AppContext<S>,
        console: &mut dyn Console,
        args: &[String],
    ) -> Result<Outcome> {
        let usage = Command::<S>::usage(self);
        let (name, mut rest) = split_trailing(args, 1);
        let name = require(console, name, NAME_PROMPT, usage)?;
        let contact = ctx.book.find_by_name_mut(&name)?;
        let raw = require(console, rest.pop(), "Birthday DD.MM.YYYY: ", usage)?;

        let previous = contact.set_birthday(&raw)?;
        let verb = if previous.is_some() { "updated" } else { "added" };
        console.success(&format!("Birthday of {} {}.", contact.name(), verb));
        Ok(Outcome::Modified(Collection::Contacts))
    }
}

pub struct ShowBirthday;

#[async_trait]
impl<S: Storage> Command<S> for ShowBirthday {
    fn name(&self) -> &'static str {
        "show birthday"
    }

    fn usage(&self) -> &'static str {
        "show birthday <name>"
    }

    fn description(&self) -> &'static str {
        "Shows the birthday of a contact"
    }

    fn group(&self) -> Group {
        Group::Contacts
    }

    async fn execute(
        &self,
        ctx: &mut AppContext<S>,
        console: &mut dyn Console,
        args: &[String],
    ) -> Result<Outcome> {
        let name = require(console, joined(args), NAME_PROMPT, Command::<S>::usage(self))?;
        let contact = ctx.book.find_by_name(&name)?;
        match contact.birthday() {
            Some(birthday) => {
                console.print(&format!("Birthday of {}: {}", contact.name(), birthday))
            }
            None => console.warn(&format!("{} has no birthday saved.", contact.name())),
        }
        Ok(Outcome::Done)
    }
}

pub struct AllBirthdays;

#[async_trait]
impl<S: Storage> Command<S> for AllBirthdays {
    fn name(&self) -> &'static str {
        "all birthdays"
    }

    fn usage(&self) -> &'static str {
        "all birthdays [days]"
    }

    fn description(&self) -> &'static str {
        "Shows birthdays in the next days (weekends move to Monday)"
    }

    fn group(&self) -> Group {
        Group::Contacts
    }

    async fn execute(
        &self,
        ctx: &mut AppContext<S>,
        console: &mut dyn Console,
        args: &[String],
    ) -> Result<Outcome> {
        let days = match args.first() {
            Some(raw) => raw.parse::<u32>().map_err(|_| {
                AssistantError::validation("number of days", raw, "expected a whole number")
            })?,
            None => ctx.settings.birthday_window_days,
        };
        validation::validate_range("number of days", days, 0, MAX_BIRTHDAY_WINDOW)?;

        let upcoming = ctx.book.upcoming_in_days(days, ctx.today());
        if upcoming.is_empty() {
            console.warn(&format!("No birthdays in the next {} days.", days));
            return Ok(Outcome::Done);
        }

        let mut table = Table::new(["Name", "Birthday", "Congratulate on"])
            .title(format!("Birthdays in the next {} days", days));
        for entry in &upcoming {
            table.add_row([
                entry.name.clone(),
                entry.birthday.format("%d.%m.%Y").to_string(),
                entry.congratulation_date.format("%A, %d.%m.%Y").to_string(),
            ]);
        }
        console.print(&table.render());
        Ok(Outcome::Done)
    }
}

pub struct SetAddress;

#[async_trait]
impl<S: Storage> Command<S> for SetAddress {
    fn name(&self) -> &'static str {
        "add address"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["change address"]
    }

    fn usage(&self) -> &'static str {
        "add address <name>"
    }

    fn description(&self) -> &'static str {
        "Sets or replaces the address of a contact"
    }

    fn group(&self) -> Group {
        Group::Contacts
    }

    async fn execute(
        &self,
        ctx: &mut AppContext<S>,
        console: &mut dyn Console,
        args: &[String],
    ) -> Result<Outcome> {
        let usage = Command::<S>::usage(self);
        let name = require(console, joined(args), NAME_PROMPT, usage)?;
        let contact = ctx.book.find_by_name_mut(&name)?;
        let raw = require(console, None, "Address: ", usage)?;

        let previous = contact.set_address(&raw)?;
        let verb = if previous.is_some() { "updated" } else { "added" };
        console.success(&format!("Address of {} {}.", contact.name(), verb));
        Ok(Outcome::Modified(Collection::Contacts))
    }
}

pub struct DeleteAddress;

#[async_trait]
impl<S: Storage> Command<S> for DeleteAddress {
    fn name(&self) -> &'static str {
        "delete address"
    }

    fn usage(&self) -> &'static str {
        "delete address <name>"
    }

    fn description(&self) -> &'static str {
        "Removes the address of a contact"
    }

    fn group(&self) -> Group {
        Group::Contacts
    }

    async fn execute(
        &self,
        ctx: &mut AppContext<S>,
        console: &mut dyn Console,
        args: &[String],
    ) -> Result<Outcome> {
        let name = require(console, joined(args), NAME_PROMPT, Command::<S>::usage(self))?;
        let contact = ctx.book.find_by_name_mut(&name)?;
        contact.delete_address()?;
        console.success(&format!("Address of {} deleted.", contact.name()));
        Ok(Outcome::Modified(Collection::Contacts))
    }
}

pub struct ExportContacts;

#[async_trait]
impl<S: Storage> Command<S> for ExportContacts {
    fn name(&self) -> &'static str {
        "export contacts"
    }

    fn usage(&self) -> &'static str {
        "export contacts [directory]"
    }

    fn description(&self) -> &'static str {
        "Exports all contacts to a CSV file"
    }

    fn group(&self) -> Group {
        Group::Contacts
    }

    async fn execute(
        &self,
        ctx: &mut AppContext<S>,
        console: &mut dyn Console,
        args: &[String],
    ) -> Result<Outcome> {
        let dir = choose_export_dir(console, args, &ctx.settings.export_path)?;
        let storage = LocalStorage::new(&dir);
        let file = export::export_contacts(&ctx.book, &storage).await?;

        console.success(&format!(
            "Exported {} contact(s) to {}",
            ctx.book.len(),
            storage.resolve(&file).display()
        ));
        Ok(Outcome::Done)
    }
}
