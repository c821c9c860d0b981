pub mod in_memory;
pub mod kafka_source;

pub use in_memory::*;
pub use kafka_source::*;
