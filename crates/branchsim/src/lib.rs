//! branchsim: synchronization protocol engine for a bank branch simulation.

mod customer;
mod lifecycle;
mod teller;
mod types;

pub mod assignment;
pub mod barrier;
pub mod completion;
pub mod config;
pub mod engine;
pub mod gate;
pub mod handshake;
pub mod pool;
pub mod resources;

pub use engine::{Branch, BranchReport};

pub use config::{BranchConfig, ConfigError, WorkProfile};
pub use lifecycle::{CustomerStatus, StatusBoard, TellerStatus};
pub use types::{CustomerId, TellerId, TransactionKind};
