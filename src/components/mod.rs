pub mod building;
pub mod network;

pub use building::*;
pub use network::*;
