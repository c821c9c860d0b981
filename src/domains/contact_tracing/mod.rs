pub mod contact_history;
pub mod detector;
pub mod messages;
pub mod ports;
pub mod position_store;
pub mod responder;
pub mod simulator;
pub mod tracker;
pub mod types;

pub use contact_history::*;
pub use detector::*;
pub use messages::*;
pub use ports::*;
pub use position_store::*;
pub use responder::*;
pub use simulator::*;
pub use tracker::*;
pub use types::*;
