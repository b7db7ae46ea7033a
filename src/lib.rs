pub mod cache;
pub mod cmd;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod infra;
pub mod logging;
pub mod parse;
pub mod services;
pub mod workflow;
