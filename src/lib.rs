// ABOUTME: Library root for meeting-assistant — re-exports all modules for integration testing.
// ABOUTME: The binary entry point is in main.rs, which uses this crate as a library.

pub mod agent;
pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod documents;
pub mod error;
pub mod logging;
pub mod model;
pub mod presenter;
pub mod prompt;
pub mod session;
pub mod tui;
