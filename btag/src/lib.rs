// src/lib.rs
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod persist;
pub mod render;
pub mod utils;
pub mod workspace;

pub use crate::cli::{Args, Command, EntityAction, run};
pub use crate::config::{Config, load_config};
pub use crate::core::generator::OverlapPolicy;
pub use crate::core::store::TagStore;
pub use crate::error::TagError;
pub use crate::models::{Record, Span, Tag, TaggingStats};
pub use crate::workspace::{ImportSummary, Workspace};
