//! Entity models owned by an arena instance

pub mod bomb;
pub mod player;
pub mod projectile;
pub mod wall;

pub use bomb::{Bomb, BombPhase};
pub use player::{Player, PlayerColor};
pub use projectile::Projectile;
pub use wall::{Wall, WallPhase};
