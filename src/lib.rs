pub mod cli;
pub mod config;
pub mod context;
pub mod dates;
pub mod db;
pub mod linking;
pub mod logging;
pub mod models;

pub use context::DataContext;
pub use db::Database;
