//! Core engine: board geometry, units, actions, and the gamestate pipeline.

pub mod action;
pub mod board;
pub mod player;
pub mod position;
pub mod state;
pub mod unit;

pub use action::{Action, UnitEffect};
pub use board::Board;
pub use player::{Facing, Player, PlayerId};
pub use position::{line_between, LineDir, Position};
pub use state::{GameResult, Gamestate};
pub use unit::{ActionTrigger, InterceptTrigger, TriggerId, Unit, UnitId, UnitKind};
