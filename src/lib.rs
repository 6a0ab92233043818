pub mod evolution;
pub mod models;

pub use evolution::Evolution;
