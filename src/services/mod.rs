pub mod encoding;
pub mod export;
pub mod merge;
pub mod store;
pub mod sync;
