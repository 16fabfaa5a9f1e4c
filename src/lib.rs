// Library exports for the Competia CLI
// This allows testing of internal modules

pub mod api;
pub mod commands;
pub mod config;
pub mod models;
pub mod pdf;
pub mod reports;
