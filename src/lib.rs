pub mod common;
pub mod config;
pub mod resolvers;
pub mod service;
pub mod webfaction;

pub use self::config::*;
