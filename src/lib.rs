pub mod codegen;
pub mod config;
pub mod error;
pub mod schema_reader;
pub mod types;
