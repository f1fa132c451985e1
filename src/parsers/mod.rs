pub mod clipboard;
pub mod line_format;
