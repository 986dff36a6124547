mod angle;
mod executor_info;
mod geom;
pub mod math;
mod player;
mod settings;
mod world;

pub use angle::*;
pub use executor_info::*;
pub use geom::*;
pub use player::*;
pub use settings::*;
pub use world::*;

/// 2D vector in field coordinates, in mm.
pub type Vector2 = nalgebra::Vector2<f64>;
/// 3D vector in field coordinates, in mm.
pub type Vector3 = nalgebra::Vector3<f64>;

/// Number of role slots a play populates: the goalie plus four field roles.
pub const ROLE_SLOTS: usize = 5;
