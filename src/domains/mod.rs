pub mod contact_tracing;
pub mod logger;

pub use contact_tracing::*;
pub use logger::*;
