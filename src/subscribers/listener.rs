//! Scoped listeners: lifetime management built on the subscribe contract.

use std::rc::Rc;

use super::{Listener, ListenerId};
use crate::core::{Action, Gamestate};

type Predicate = Box<dyn Fn(&Action, &Gamestate) -> bool>;
type NotifyEffect = Box<dyn Fn(&Action, &mut Gamestate)>;

/// A listener that fires at most once.
///
/// On each notification the predicate is checked; on the first match the
/// effect runs and the listener unsubscribes itself.
pub struct ExecuteOnceListener {
    matches: Predicate,
    effect: NotifyEffect,
}

impl ExecuteOnceListener {
    /// Create an execute-once listener from a predicate and an effect.
    pub fn new(
        matches: impl Fn(&Action, &Gamestate) -> bool + 'static,
        effect: impl Fn(&Action, &mut Gamestate) + 'static,
    ) -> Self {
        Self {
            matches: Box::new(matches),
            effect: Box::new(effect),
        }
    }

    /// Register with the pipeline.
    pub fn subscribe(self, game: &mut Gamestate) -> ListenerId {
        game.subscribe(Rc::new(self))
    }
}

impl Listener for ExecuteOnceListener {
    fn notify(&self, own_id: ListenerId, action: &Action, game: &mut Gamestate) {
        if (self.matches)(action, game) {
            (self.effect)(action, game);
            game.unsubscribe(own_id);
        }
    }
}

/// A listener that lives until the end of the current turn.
///
/// The effect runs on every matching action. The moment an
/// [`Action::EndTurn`] passes through — whether or not it actually advanced
/// the turn, and regardless of predicate match — the listener unsubscribes
/// itself, after running the effect one last time if the predicate matched.
///
/// This is the mechanism behind "this turn only" buffs: apply the buff,
/// subscribe a reverter keyed to EndTurn.
pub struct UntilEndOfTurnListener {
    matches: Predicate,
    effect: NotifyEffect,
}

impl UntilEndOfTurnListener {
    /// Create an until-end-of-turn listener from a predicate and an effect.
    pub fn new(
        matches: impl Fn(&Action, &Gamestate) -> bool + 'static,
        effect: impl Fn(&Action, &mut Gamestate) + 'static,
    ) -> Self {
        Self {
            matches: Box::new(matches),
            effect: Box::new(effect),
        }
    }

    /// Register with the pipeline.
    pub fn subscribe(self, game: &mut Gamestate) -> ListenerId {
        game.subscribe(Rc::new(self))
    }
}

impl Listener for UntilEndOfTurnListener {
    fn notify(&self, own_id: ListenerId, action: &Action, game: &mut Gamestate) {
        if (self.matches)(action, game) {
            (self.effect)(action, game);
        }

        if matches!(action, Action::EndTurn { .. }) {
            game.unsubscribe(own_id);
        }
    }
}
