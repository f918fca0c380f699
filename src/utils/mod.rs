pub mod error;
pub mod fuzzy;
pub mod logger;
pub mod validation;
