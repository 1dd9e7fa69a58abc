mod client;
mod config;
mod models;
mod service;
mod xmlrpc;

pub use client::*;
pub use config::*;
pub use service::*;
pub use xmlrpc::Value;

pub const SERVICE_NAME: &str = "Webfaction";
