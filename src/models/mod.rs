pub mod investor;
pub mod agent;
pub mod contract;
pub mod movement;
pub mod order;
pub mod company;
pub mod geo;
pub mod identity;

pub use investor::Investor;
pub use agent::Agent;
pub use contract::Contract;
pub use movement::{Movement, MovementKind};
pub use order::Order;
pub use company::Company;
pub use geo::{City, Country};
pub use identity::{Identity, Role};
