pub mod agent;
pub mod app;
pub mod code_actions;
pub mod config;
pub mod constants;
pub mod conversation;
pub mod message;
pub mod sandbox;
