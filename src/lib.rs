//! A terminal snake game.
//!
//! The engine (`world`, `snake`, `food`, `game`) has no I/O and can be driven
//! programmatically. `term`, `input` and `play` wrap it in a crossterm front end.

pub mod config;
pub mod food;
pub mod game;
pub mod input;
pub mod play;
pub mod snake;
pub mod term;
pub mod world;

pub type TermInt = u16;
pub type Coords = (i32, i32);

pub use config::{ConfigError, GameConfig};
pub use food::{BoardFull, Food};
pub use game::{Ending, Game, GameState, MoveResult};
pub use snake::{Direction, Snake};
pub use world::{Bounds, BorderWall, Obstacles, WallShape, World};
