use assistant_bot::utils::validation::Validate;
use assistant_bot::{AppContext, DataStore, LocalStorage, Settings, TomlConfig};
use tempfile::TempDir;

#[tokio::test]
async fn test_toml_settings_drive_file_names() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let data_dir = temp_dir.path().join("data");
    let toml_content = format!(
        r#"
[storage]
data_dir = "{}"
contacts_file = "people.json"
notes_file = "memos.json"

[export]
output_path = "./exports"

[assistant]
birthday_window_days = 10
"#,
        data_dir.to_str().unwrap()
    );

    let config = TomlConfig::from_toml_str(&toml_content)?;
    config.validate()?;
    let settings = Settings::from_provider(&config);
    assert_eq!(settings.birthday_window_days, 10);
    assert_eq!(settings.suggestion_threshold, 60);

    let store = DataStore::new(
        LocalStorage::new(&settings.data_dir),
        settings.contacts_file.clone(),
        settings.notes_file.clone(),
    );
    let mut ctx = AppContext::load(store, settings).await?;
    assert!(ctx.book.is_empty());
    assert!(ctx.notes.is_empty());

    ctx.book.add("anna")?;
    ctx.notes.add_note("Ideas")?;
    ctx.save_all().await?;

    assert!(data_dir.join("people.json").exists());
    assert!(data_dir.join("memos.json").exists());
    Ok(())
}

#[tokio::test]
async fn test_corrupt_data_file_is_reported() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(temp_dir.path().join("contacts.json"), b"{ not json")?;

    let store = DataStore::new(
        LocalStorage::new(temp_dir.path()),
        "contacts.json",
        "notes.json",
    );
    let result = AppContext::load(store, Settings::default()).await;

    let error = result.err().expect("corrupt file must fail to load");
    assert!(error.user_friendly_message().contains("unreadable"));
    Ok(())
}

#[tokio::test]
async fn test_invalid_values_in_saved_file_are_rejected() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    std::fs::write(
        temp_dir.path().join("contacts.json"),
        br#"[{"name": "Anna", "phones": ["12"]}]"#,
    )?;

    let store = DataStore::new(
        LocalStorage::new(temp_dir.path()),
        "contacts.json",
        "notes.json",
    );
    assert!(AppContext::load(store, Settings::default()).await.is_err());
    Ok(())
}
