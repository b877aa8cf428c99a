//! A rules engine for turn-based tactical board games.
//!
//! Everything is an action: moving, attacking, damage, spells, artifacts,
//! and turn ends all flow through a single FIFO dispatch pipeline on
//! [`Gamestate`]. Game content hooks the pipeline with interceptors
//! (rewrite actions before they execute) and listeners (react after), so
//! cards are ordinary closures rather than engine special cases.
//!
//! ## Quick start
//!
//! ```
//! use skirmish_core::core::{Action, Facing, Gamestate, Player, PlayerId, Position, Unit};
//!
//! let mut game = Gamestate::new(
//!     9,
//!     5,
//!     vec![
//!         Player::new("p1", "Lyonar", Position::new(0, 2), Facing::Right),
//!         Player::new("p2", "Songhai", Position::new(8, 2), Facing::Left),
//!     ],
//! );
//!
//! let gremlin = game.spawn(Unit::minion("gremlin", 1, 1));
//! game.make_move(Action::Place {
//!     owner: PlayerId::new(0),
//!     unit: gremlin,
//!     at: Position::new(1, 2),
//! });
//! game.make_move(Action::EndTurn { player: PlayerId::new(0) });
//!
//! assert_eq!(game.active_player(), PlayerId::new(1));
//! ```
//!
//! ## Layout
//!
//! - [`core`] — positions, the board, units, actions, and [`Gamestate`].
//! - [`subscribers`] — the listener/interceptor protocol and scoped
//!   helpers (execute-once, until-end-of-turn).
//! - [`content`] — spells, artifacts, and token summons built purely on
//!   the public pipeline surface.

pub mod content;
pub mod core;
pub mod subscribers;

pub use crate::core::{
    Action, ActionTrigger, Board, Facing, GameResult, Gamestate, InterceptTrigger, Player,
    PlayerId, Position, TriggerId, Unit, UnitEffect, UnitId, UnitKind,
};
pub use crate::subscribers::{
    ExecuteOnceListener, Interceptor, InterceptorId, Listener, ListenerId,
    UntilEndOfTurnInterceptor, UntilEndOfTurnListener,
};
