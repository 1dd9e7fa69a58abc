mod models;
mod reconciler;
mod sequencer;
mod service;

pub use models::*;
pub use reconciler::*;
pub use sequencer::*;
pub use service::*;
