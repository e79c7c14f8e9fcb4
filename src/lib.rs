// This file exposes the modules as public modules in the crate

pub mod config;
pub mod errors;
pub mod jira;
pub mod jira_handlers;
pub mod mcp;
pub mod models;
pub mod service;
pub mod views;
