pub mod building;
pub mod camera;
pub mod catalog;
pub mod grid;
pub mod input;
pub mod network;
pub mod overlay;
pub mod tool;

pub use building::*;
pub use camera::*;
pub use catalog::*;
pub use grid::*;
pub use input::*;
pub use network::*;
pub use overlay::*;
pub use tool::*;
