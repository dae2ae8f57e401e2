pub mod cache;
pub mod config;
pub mod document;
pub mod fetch;
pub mod format;
pub mod loader;
pub mod output;
pub mod pipeline;
pub mod queries;
pub mod reader;
pub mod store;
pub mod table;
pub mod transform;
