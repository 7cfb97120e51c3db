pub mod commands;
pub mod download;
pub mod error;
pub mod formula;
pub mod http;
pub mod install;
pub mod platform;
pub mod resolver;
pub mod runtime;
pub mod stage;
pub mod verify;
