//! Artifacts: persistent equipment hooked into the pipeline.
//!
//! An artifact equips to a player and registers itself as both a listener
//! and an interceptor; its hooks are how it acts. Every artifact carries
//! the same built-in wear rule: each time the owner's general takes
//! positive damage, one charge is spent, and at zero charges the artifact
//! submits its own removal.
//!
//! Artifacts are shared as `Rc<Artifact>` (the removal action needs a
//! handle to the artifact itself, obtained through a weak self-reference),
//! so mutable per-game state — charges, owner, subscription ids — lives in
//! `Cell`s.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use crate::core::{Action, Gamestate, PlayerId, UnitKind};
use crate::subscribers::{Interceptor, InterceptorId, Listener, ListenerId};

type EquipHook = Box<dyn Fn(&Artifact, &mut Gamestate)>;
type NotifyHook = Box<dyn Fn(&Artifact, &Action, &mut Gamestate)>;
type InterceptHook = Box<dyn Fn(&Artifact, Action, &mut Gamestate) -> Action>;

const DEFAULT_CHARGES: i32 = 3;

/// A piece of equipment bound to a player.
pub struct Artifact {
    name: String,
    cost: i32,

    charges: Cell<i32>,
    owner: Cell<Option<PlayerId>>,
    listener_sub: Cell<Option<ListenerId>>,
    interceptor_sub: Cell<Option<InterceptorId>>,
    self_ref: Weak<Artifact>,

    on_equip: Option<EquipHook>,
    on_unequip: Option<EquipHook>,
    on_notify: Option<NotifyHook>,
    on_intercept: Option<InterceptHook>,
}

impl Artifact {
    /// Start building an artifact with the default three charges.
    #[must_use]
    pub fn builder(name: impl Into<String>, cost: i32) -> ArtifactBuilder {
        ArtifactBuilder {
            name: name.into(),
            cost,
            charges: DEFAULT_CHARGES,
            on_equip: None,
            on_unequip: None,
            on_notify: None,
            on_intercept: None,
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mana cost.
    #[must_use]
    pub fn cost(&self) -> i32 {
        self.cost
    }

    /// Remaining charges.
    #[must_use]
    pub fn charges(&self) -> i32 {
        self.charges.get()
    }

    /// The player this artifact is equipped to, if any.
    #[must_use]
    pub fn owner(&self) -> Option<PlayerId> {
        self.owner.get()
    }

    /// Submit an equip through the pipeline.
    pub fn equip_to(self: &Rc<Self>, owner: PlayerId, game: &mut Gamestate) {
        game.make_move(Action::EquipArtifact {
            owner,
            artifact: Rc::clone(self),
        });
    }

    pub(crate) fn equip(&self, owner: PlayerId, game: &mut Gamestate) {
        self.owner.set(Some(owner));

        if let Some(this) = self.self_ref.upgrade() {
            let interceptor = game.add_interceptor(Rc::clone(&this) as Rc<dyn Interceptor>);
            let listener = game.subscribe(this as Rc<dyn Listener>);
            self.interceptor_sub.set(Some(interceptor));
            self.listener_sub.set(Some(listener));
        }

        if let Some(hook) = &self.on_equip {
            hook(self, game);
        }
    }

    pub(crate) fn remove(&self, game: &mut Gamestate) {
        if let Some(hook) = &self.on_unequip {
            hook(self, game);
        }

        if let Some(id) = self.interceptor_sub.take() {
            game.remove_interceptor(id);
        }
        if let Some(id) = self.listener_sub.take() {
            game.unsubscribe(id);
        }
        self.owner.set(None);
    }
}

impl std::fmt::Debug for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Artifact")
            .field("name", &self.name)
            .field("cost", &self.cost)
            .field("charges", &self.charges.get())
            .field("owner", &self.owner.get())
            .finish_non_exhaustive()
    }
}

impl Listener for Artifact {
    fn notify(&self, _own_id: ListenerId, action: &Action, game: &mut Gamestate) {
        if let Some(hook) = &self.on_notify {
            hook(self, action, game);
        }

        // Built-in wear: positive damage to the owner's general spends a
        // charge. Healing (negative amounts) never does.
        if let Action::Damage { unit, amount } = action {
            if *amount <= 0 {
                return;
            }
            let hits_owner_general = self.owner.get().is_some()
                && game.unit(*unit).is_some_and(|u| {
                    u.kind() == UnitKind::General && u.owner() == self.owner.get()
                });
            if !hits_owner_general {
                return;
            }

            self.charges.set(self.charges.get() - 1);
            if self.charges.get() <= 0 {
                if let Some(this) = self.self_ref.upgrade() {
                    game.make_move(Action::RemoveArtifact { artifact: this });
                }
            }
        }
    }
}

impl Interceptor for Artifact {
    fn intercept(&self, _own_id: InterceptorId, action: Action, game: &mut Gamestate) -> Action {
        match &self.on_intercept {
            Some(hook) => hook(self, action, game),
            None => action,
        }
    }
}

/// Builder for [`Artifact`]. Hooks default to no-ops.
pub struct ArtifactBuilder {
    name: String,
    cost: i32,
    charges: i32,
    on_equip: Option<EquipHook>,
    on_unequip: Option<EquipHook>,
    on_notify: Option<NotifyHook>,
    on_intercept: Option<InterceptHook>,
}

impl ArtifactBuilder {
    /// Override the starting charge count.
    #[must_use]
    pub fn charges(mut self, charges: i32) -> Self {
        self.charges = charges;
        self
    }

    /// Run when the artifact is equipped, after its hooks register.
    #[must_use]
    pub fn on_equip(mut self, hook: impl Fn(&Artifact, &mut Gamestate) + 'static) -> Self {
        self.on_equip = Some(Box::new(hook));
        self
    }

    /// Run when the artifact is removed, before its hooks unregister.
    #[must_use]
    pub fn on_unequip(mut self, hook: impl Fn(&Artifact, &mut Gamestate) + 'static) -> Self {
        self.on_unequip = Some(Box::new(hook));
        self
    }

    /// Run on every action notification while equipped.
    #[must_use]
    pub fn on_notify(mut self, hook: impl Fn(&Artifact, &Action, &mut Gamestate) + 'static) -> Self {
        self.on_notify = Some(Box::new(hook));
        self
    }

    /// Run on every action interception while equipped.
    #[must_use]
    pub fn on_intercept(
        mut self,
        hook: impl Fn(&Artifact, Action, &mut Gamestate) -> Action + 'static,
    ) -> Self {
        self.on_intercept = Some(Box::new(hook));
        self
    }

    /// Finish: the artifact holds a weak handle to itself so its hooks can
    /// enqueue actions that carry it.
    #[must_use]
    pub fn build(self) -> Rc<Artifact> {
        Rc::new_cyclic(|weak| Artifact {
            name: self.name,
            cost: self.cost,
            charges: Cell::new(self.charges),
            owner: Cell::new(None),
            listener_sub: Cell::new(None),
            interceptor_sub: Cell::new(None),
            self_ref: weak.clone(),
            on_equip: self.on_equip,
            on_unequip: self.on_unequip,
            on_notify: self.on_notify,
            on_intercept: self.on_intercept,
        })
    }
}
