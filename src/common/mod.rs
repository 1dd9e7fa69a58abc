mod error;
mod models;
mod patterns;

pub use error::*;
pub use models::*;
pub(crate) use patterns::*;
