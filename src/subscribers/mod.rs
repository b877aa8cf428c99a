//! The pipeline's subscription protocol.
//!
//! Two kinds of subscribers hook the dispatch pipeline:
//!
//! - An [`Interceptor`] sees each action *before* it executes and may
//!   return a replacement.
//! - A [`Listener`] is notified with each action *after* it executes.
//!
//! Registrations are id-keyed. Each subscriber receives its own id on every
//! call, which is how self-limiting subscribers (execute-once,
//! until-end-of-turn) remove themselves without relying on object identity.
//!
//! The pipeline snapshots each registry at the start of a pass, so a
//! subscriber may subscribe or unsubscribe anything mid-pass; the mutation
//! takes effect on the next pass. Order within a pass is ascending
//! registration id — content must not rely on it.

mod interceptor;
mod listener;

pub use interceptor::UntilEndOfTurnInterceptor;
pub use listener::{ExecuteOnceListener, UntilEndOfTurnListener};

use serde::{Deserialize, Serialize};

use crate::core::{Action, Gamestate};

/// Registration id for a listener.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ListenerId(pub u32);

impl std::fmt::Display for ListenerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Listener({})", self.0)
    }
}

/// Registration id for an interceptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InterceptorId(pub u32);

impl std::fmt::Display for InterceptorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Interceptor({})", self.0)
    }
}

/// A pipeline subscriber notified of every action after it executes.
///
/// `own_id` is the id this listener was registered under; pass it to
/// [`Gamestate::unsubscribe`] to self-remove.
pub trait Listener {
    fn notify(&self, own_id: ListenerId, action: &Action, game: &mut Gamestate);
}

/// A pipeline subscriber that may transform each action before it executes.
///
/// Return the action unchanged to pass it through.
pub trait Interceptor {
    fn intercept(&self, own_id: InterceptorId, action: Action, game: &mut Gamestate) -> Action;
}
