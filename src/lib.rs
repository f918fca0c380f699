pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use app::commands::CommandRegistry;
pub use app::context::AppContext;
pub use app::repl::Repl;
pub use config::{cli::LocalStorage, toml_config::TomlConfig, CliConfig, Settings};
pub use core::{persistence::DataStore, AddressBook, Notebook};
pub use utils::error::{AssistantError, Result};
