pub mod api;
pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod game;
pub mod llm;
pub mod session;
