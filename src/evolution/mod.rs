mod engine;
mod errors;

pub use engine::{Evolution, Scored, State};
pub use errors::Error;
