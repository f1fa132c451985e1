pub mod dictionary;
pub mod entry;
