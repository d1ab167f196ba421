// src/core.rs
pub mod entities;
pub mod export;
pub mod generator;
pub mod ingest;
pub mod propagate;
pub mod records;
pub mod spans;
pub mod store;
pub mod tokenizer;
