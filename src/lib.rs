// src/lib.rs

pub mod app;
pub mod chat;
pub mod completion;
pub mod config;
pub mod errors;
pub mod indicator;
pub mod logging;
pub mod models;
pub mod render;
pub mod search;
pub mod session;
pub mod suggestions;
pub mod ui;
