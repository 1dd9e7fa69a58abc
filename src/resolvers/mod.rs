mod checkip;
mod config;
mod system;

pub use checkip::*;
pub use config::*;
pub use system::*;
