//! Gamestate: the unit arena, the board, and the dispatch pipeline.
//!
//! ## Pipeline
//!
//! [`Gamestate::make_move`] pushes an action onto a FIFO queue and drains
//! it. Each drained action runs three phases:
//!
//! 1. every registered [`Interceptor`] may rewrite it,
//! 2. it executes,
//! 3. every registered [`Listener`] is notified.
//!
//! Handlers get `&mut Gamestate`, so they can enqueue follow-up actions or
//! change the subscriber registries mid-pass. Both registries are
//! persistent maps ([`im::OrdMap`]), cloned per pass in O(1): the pass runs
//! against a snapshot and registry edits take effect on the next action.
//! Follow-ups resolve breadth-first — a handler that calls `make_move`
//! while a drain is in progress just enqueues.
//!
//! ## Units and players
//!
//! Units live in an arena keyed by [`UnitId`]; the arena never shrinks, so
//! handles stay valid after death. "Alive" means "on the board". A player
//! is alive while a general they own is on the board, and the game has
//! ended when fewer than two players are alive.
//!
//! Queries are permissive: asking about a dead or unknown unit yields an
//! empty set, `false`, or the [`Position::OFF_BOARD`] sentinel rather than
//! an error. Constructor preconditions are hard asserts.

use std::collections::VecDeque;
use std::rc::Rc;

use im::OrdMap;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use super::action::Action;
use super::board::Board;
use super::player::{Player, PlayerId};
use super::position::{line_between, LineDir, Position};
use super::unit::{Unit, UnitId, UnitInterceptor, UnitKind, UnitListener};
use crate::subscribers::{Interceptor, InterceptorId, Listener, ListenerId};

/// Terminal status of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameResult {
    /// Two or more players still have a living general.
    InProgress,
    /// Exactly one player still has a living general.
    Winner(PlayerId),
    /// No player has a living general.
    Draw,
}

impl GameResult {
    /// Whether this result declares `player` the winner.
    #[must_use]
    pub fn is_winner(self, player: PlayerId) -> bool {
        self == GameResult::Winner(player)
    }
}

/// A complete game in progress.
pub struct Gamestate {
    players: Vec<Player>,
    active_player: PlayerId,
    board: Board,

    units: FxHashMap<UnitId, Unit>,
    next_unit_id: u32,

    queue: VecDeque<Action>,
    draining: bool,

    listeners: OrdMap<ListenerId, Rc<dyn Listener>>,
    interceptors: OrdMap<InterceptorId, Rc<dyn Interceptor>>,
    next_listener_id: u32,
    next_interceptor_id: u32,
}

impl Gamestate {
    /// Set up a game: an empty board of the given dimensions, one general
    /// spawned and placed per player, player 0 active.
    ///
    /// # Panics
    ///
    /// Panics if there are fewer than 2 or more than 255 players, or if a
    /// starting position is out of bounds or collides with another.
    pub fn new(width: i32, height: i32, players: Vec<Player>) -> Self {
        assert!(players.len() >= 2, "A game needs at least 2 players");
        assert!(players.len() <= 255, "At most 255 players are supported");

        let mut game = Self {
            players,
            active_player: PlayerId::new(0),
            board: Board::new(width, height),
            units: FxHashMap::default(),
            next_unit_id: 0,
            queue: VecDeque::new(),
            draining: false,
            listeners: OrdMap::new(),
            interceptors: OrdMap::new(),
            next_listener_id: 0,
            next_interceptor_id: 0,
        };

        for id in PlayerId::all(game.players.len()) {
            let player = &game.players[id.index()];
            let general = Unit::general(player.general.clone());
            let start = player.starting_position;

            let unit = game.spawn(general);
            game.place_unit(id, unit, start);
            assert!(
                game.board.contains(unit),
                "General starting position is invalid"
            );
        }

        game
    }

    // === Players ===

    /// The player whose turn it is.
    #[must_use]
    pub fn active_player(&self) -> PlayerId {
        self.active_player
    }

    /// Static setup record for a player.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    /// Number of players in the game.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Whether a general owned by `player` is on the board.
    #[must_use]
    pub fn is_alive(&self, player: PlayerId) -> bool {
        self.general_of(player).is_some()
    }

    /// The on-board general owned by `player`, if any.
    #[must_use]
    pub fn general_of(&self, player: PlayerId) -> Option<UnitId> {
        self.board.units().map(|(u, _)| u).find(|&u| {
            self.units
                .get(&u)
                .is_some_and(|unit| unit.kind() == UnitKind::General && unit.owner() == Some(player))
        })
    }

    /// All on-board units owned by `player`, in ascending id order.
    #[must_use]
    pub fn player_units(&self, player: PlayerId) -> Vec<UnitId> {
        let mut out: Vec<UnitId> = self
            .board
            .units()
            .map(|(u, _)| u)
            .filter(|&u| {
                self.units
                    .get(&u)
                    .is_some_and(|unit| unit.owner() == Some(player))
            })
            .collect();
        out.sort_unstable();
        out
    }

    // === Turn machine ===

    /// Advance the active player to the next alive one, skipping dead seats.
    ///
    /// No-op once the game has ended. The scan is bounded by the player
    /// count; failing to find an alive player after a full lap contradicts
    /// the not-ended precondition and trips a debug assertion.
    pub fn end_turn(&mut self) {
        if self.has_ended() {
            return;
        }

        let count = self.players.len();
        let mut index = self.active_player.index();
        for _ in 0..count {
            index = (index + 1) % count;
            let candidate = PlayerId::new(index as u8);
            if self.is_alive(candidate) {
                self.active_player = candidate;
                return;
            }
        }
        debug_assert!(false, "no alive player found after a full scan");
    }

    /// Whether fewer than two players remain alive.
    #[must_use]
    pub fn has_ended(&self) -> bool {
        PlayerId::all(self.players.len())
            .filter(|&p| self.is_alive(p))
            .count()
            < 2
    }

    /// Terminal status: in progress, won, or drawn.
    #[must_use]
    pub fn result(&self) -> GameResult {
        if !self.has_ended() {
            return GameResult::InProgress;
        }
        match PlayerId::all(self.players.len()).find(|&p| self.is_alive(p)) {
            Some(winner) => GameResult::Winner(winner),
            None => GameResult::Draw,
        }
    }

    /// The winning player, if the game has ended with a winner.
    #[must_use]
    pub fn winner(&self) -> Option<PlayerId> {
        match self.result() {
            GameResult::Winner(p) => Some(p),
            GameResult::InProgress | GameResult::Draw => None,
        }
    }

    // === Units ===

    /// Add a unit to the arena, off-board, returning its handle.
    pub fn spawn(&mut self, unit: Unit) -> UnitId {
        let id = UnitId(self.next_unit_id);
        self.next_unit_id += 1;
        self.units.insert(id, unit);
        id
    }

    /// Look up a unit. Works for dead units too; the arena never shrinks.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(&id)
    }

    /// Mutable unit lookup.
    pub fn unit_mut(&mut self, id: UnitId) -> Option<&mut Unit> {
        self.units.get_mut(&id)
    }

    /// Whether the unit is on the board.
    #[must_use]
    pub fn is_on_board(&self, id: UnitId) -> bool {
        self.board.contains(id)
    }

    /// The tile a unit stands on, or [`Position::OFF_BOARD`].
    #[must_use]
    pub fn position_of(&self, id: UnitId) -> Position {
        self.board.position_of(id).unwrap_or(Position::OFF_BOARD)
    }

    /// The board's occupancy view.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Bind a spawned unit to an owner, place it, and wire its triggers
    /// into the pipeline. A failed placement (occupied or out-of-bounds
    /// tile) leaves the unit off-board but still wired; attachment is
    /// idempotent, so a later successful placement registers nothing twice.
    pub(crate) fn place_unit(&mut self, owner: PlayerId, unit: UnitId, at: Position) {
        let Some(facing) = self.players.get(owner.index()).map(|p| p.facing) else {
            return;
        };
        let Some(u) = self.units.get_mut(&unit) else {
            return;
        };
        u.bind_owner(owner, facing);

        self.board.place(unit, at);
        self.attach_unit(unit);
    }

    /// Take a unit off the board and unwire its triggers.
    pub(crate) fn remove_unit(&mut self, unit: UnitId) {
        self.board.remove(unit);

        let Some(u) = self.units.get_mut(&unit) else {
            return;
        };
        let listener = u.listener_sub.take();
        let interceptor = u.interceptor_sub.take();

        if let Some(id) = listener {
            self.unsubscribe(id);
        }
        if let Some(id) = interceptor {
            self.remove_interceptor(id);
        }
    }

    // Idempotent: re-placing a unit must not double-register forwarders.
    fn attach_unit(&mut self, unit: UnitId) {
        let already = self
            .units
            .get(&unit)
            .is_some_and(|u| u.listener_sub.is_some());
        if already {
            return;
        }

        let listener = self.subscribe(Rc::new(UnitListener { unit }));
        let interceptor = self.add_interceptor(Rc::new(UnitInterceptor { unit }));
        if let Some(u) = self.units.get_mut(&unit) {
            u.listener_sub = Some(listener);
            u.interceptor_sub = Some(interceptor);
        }
    }

    // === Geometry and targeting ===

    /// Whether two units belong to different owners.
    #[must_use]
    pub fn is_enemy(&self, a: UnitId, b: UnitId) -> bool {
        match (self.units.get(&a), self.units.get(&b)) {
            (Some(a), Some(b)) => a.owner() != b.owner(),
            _ => false,
        }
    }

    /// Whether two units are adjacent (Chebyshev distance exactly 1).
    #[must_use]
    pub fn is_near(&self, a: UnitId, b: UnitId) -> bool {
        self.position_of(a).chebyshev(self.position_of(b)) == 1
    }

    /// The orthogonal direction from `a` to `b`, if they are inline.
    #[must_use]
    pub fn inline_direction(&self, a: UnitId, b: UnitId) -> Option<LineDir> {
        line_between(self.position_of(a), self.position_of(b))
    }

    /// Whether `attacker` may attack `target` from where it stands: ranged
    /// units always, blast units when inline, everyone when adjacent.
    #[must_use]
    pub fn in_range(&self, attacker: UnitId, target: UnitId) -> bool {
        let Some(a) = self.units.get(&attacker) else {
            return false;
        };
        if !self.units.contains_key(&target) {
            return false;
        }

        if a.has_attribute("ranged") {
            return true;
        }
        if a.has_attribute("blast") && self.inline_direction(attacker, target).is_some() {
            return true;
        }
        self.is_near(attacker, target)
    }

    /// Tiles a unit can move to this turn.
    ///
    /// Flood-fill of 4-directional steps, one ring per walk point. A step
    /// into a tile held by a friendly unit may be passed *through* but the
    /// final set keeps only unoccupied tiles — which also strips the
    /// starting tile, so "stay put" is never a valid move. Enemy-held tiles
    /// block both passage and landing.
    #[must_use]
    pub fn valid_moves(&self, unit: UnitId) -> FxHashSet<Position> {
        let Some(mover) = self.units.get(&unit) else {
            return FxHashSet::default();
        };
        let Some(start) = self.board.position_of(unit) else {
            return FxHashSet::default();
        };
        let owner = mover.owner();

        let mut reachable = FxHashSet::default();
        reachable.insert(start);

        for _ in 0..mover.walk_distance() {
            let mut ring = FxHashSet::default();
            for &tile in &reachable {
                let steps: SmallVec<[Position; 4]> = SmallVec::from_buf([
                    tile.add(Position::new(0, 1)),
                    tile.add(Position::new(0, -1)),
                    tile.add(Position::new(1, 0)),
                    tile.add(Position::new(-1, 0)),
                ]);
                for step in steps {
                    if reachable.contains(&step) || ring.contains(&step) {
                        continue;
                    }
                    if !self.board.in_bounds(step) {
                        continue;
                    }
                    let passable = match self.board.unit_at(step) {
                        None => true,
                        Some(occupant) => self
                            .units
                            .get(&occupant)
                            .is_some_and(|o| o.owner() == owner),
                    };
                    if passable {
                        ring.insert(step);
                    }
                }
            }
            reachable.extend(ring);
        }

        reachable.retain(|&p| !self.board.is_occupied(p));
        reachable
    }

    /// Enemy units the given unit could attack from where it stands.
    #[must_use]
    pub fn valid_targets(&self, unit: UnitId) -> FxHashSet<UnitId> {
        if !self.units.contains_key(&unit) {
            return FxHashSet::default();
        }
        self.board
            .units()
            .map(|(other, _)| other)
            .filter(|&other| self.is_enemy(unit, other) && self.in_range(unit, other))
            .collect()
    }

    // === Pipeline ===

    /// Enqueue an action without draining. Handlers use this for
    /// follow-ups; the in-progress drain picks them up.
    pub fn queue_action(&mut self, action: Action) {
        self.queue.push_back(action);
    }

    /// Submit an action and resolve everything it sets in motion.
    ///
    /// Ignored once the game has ended. Re-entrant calls from inside a
    /// handler degrade to [`Gamestate::queue_action`]: follow-ups resolve
    /// breadth-first, never nested.
    pub fn make_move(&mut self, action: Action) {
        if self.has_ended() {
            return;
        }

        self.queue.push_back(action);
        self.drain();
    }

    fn drain(&mut self) {
        if self.draining {
            return;
        }
        self.draining = true;

        while let Some(mut action) = self.queue.pop_front() {
            // O(1) snapshots: handlers may edit the registries mid-pass.
            let interceptors = self.interceptors.clone();
            for (id, interceptor) in interceptors.iter() {
                action = interceptor.intercept(*id, action, self);
            }

            action.execute(self);

            let listeners = self.listeners.clone();
            for (id, listener) in listeners.iter() {
                listener.notify(*id, &action, self);
            }
        }

        self.draining = false;
    }

    // === Subscriptions ===

    /// Register a listener, returning the id it can self-remove with.
    pub fn subscribe(&mut self, listener: Rc<dyn Listener>) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.insert(id, listener);
        id
    }

    /// Remove a listener. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }

    /// Register an interceptor, returning the id it can self-remove with.
    pub fn add_interceptor(&mut self, interceptor: Rc<dyn Interceptor>) -> InterceptorId {
        let id = InterceptorId(self.next_interceptor_id);
        self.next_interceptor_id += 1;
        self.interceptors.insert(id, interceptor);
        id
    }

    /// Remove an interceptor. Unknown ids are ignored.
    pub fn remove_interceptor(&mut self, id: InterceptorId) {
        self.interceptors.remove(&id);
    }
}
