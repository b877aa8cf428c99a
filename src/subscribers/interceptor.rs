//! Scoped interceptors.

use std::rc::Rc;

use super::listener::UntilEndOfTurnListener;
use super::{Interceptor, InterceptorId};
use crate::core::{Action, Gamestate};

type Predicate = Box<dyn Fn(&Action, &Gamestate) -> bool>;
type Transform = Box<dyn Fn(Action, &mut Gamestate) -> Action>;

/// An interceptor that lives until the end of the current turn.
///
/// Matching actions are rewritten by the transform; everything else passes
/// through untouched. Subscribing also registers a companion
/// until-end-of-turn listener whose only job is to remove the interceptor
/// when an [`Action::EndTurn`] resolves — interceptors only see actions
/// before execution, so the cleanup has to ride the notification pass.
pub struct UntilEndOfTurnInterceptor {
    matches: Predicate,
    transform: Transform,
}

impl UntilEndOfTurnInterceptor {
    /// Create an until-end-of-turn interceptor from a predicate and a
    /// transform.
    pub fn new(
        matches: impl Fn(&Action, &Gamestate) -> bool + 'static,
        transform: impl Fn(Action, &mut Gamestate) -> Action + 'static,
    ) -> Self {
        Self {
            matches: Box::new(matches),
            transform: Box::new(transform),
        }
    }

    /// Register with the pipeline, along with the EndTurn cleanup listener.
    pub fn subscribe(self, game: &mut Gamestate) -> InterceptorId {
        let id = game.add_interceptor(Rc::new(self));

        UntilEndOfTurnListener::new(
            |action, _| matches!(action, Action::EndTurn { .. }),
            move |_, game| game.remove_interceptor(id),
        )
        .subscribe(game);

        id
    }
}

impl Interceptor for UntilEndOfTurnInterceptor {
    fn intercept(&self, _own_id: InterceptorId, action: Action, game: &mut Gamestate) -> Action {
        if (self.matches)(&action, game) {
            (self.transform)(action, game)
        } else {
            action
        }
    }
}
