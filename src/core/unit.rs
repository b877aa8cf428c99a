//! Units: generals, minions, and tokens.
//!
//! A unit is a bag of combat stats plus two extension surfaces:
//!
//! - **Attributes**: a name → magnitude map used both as boolean flags and
//!   as rule parameters ("ranged" → 0, "backstab" → 2). Combat reads these
//!   by name.
//! - **Triggers**: numbered callbacks the pipeline runs for every action —
//!   [`ActionTrigger`]s after execution, [`InterceptTrigger`]s before.
//!   Each is flagged dispellable or not; dispel strips only the former,
//!   which is how permanent innate behaviors (a wall's self-destruct on
//!   dispel) survive.
//!
//! Units live in the gamestate's arena and are addressed by [`UnitId`].
//! Dead units stay in the arena — "alive" means "on the board", nothing
//! else. Positions are looked up from the board, so all geometry queries
//! (range, adjacency, line alignment) live on
//! [`Gamestate`](crate::core::Gamestate).

use std::collections::BTreeMap;
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use super::action::Action;
use super::player::{Facing, PlayerId};
use super::state::Gamestate;
use crate::subscribers::{Interceptor, InterceptorId, Listener, ListenerId};

/// Arena handle for a unit. Stable for the unit's whole life, including
/// after death.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl UnitId {
    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Unit({})", self.0)
    }
}

/// The closed set of unit categories.
///
/// Win conditions only inspect `General`; everything else is flavor plus
/// subtype tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    General,
    Minion,
    Token,
}

/// Per-unit identifier for a registered trigger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TriggerId(pub u32);

/// Side-effect callback run after every resolved action.
pub type TriggerFn = Rc<dyn Fn(&Action, &mut Gamestate)>;

/// Transform callback run on every action before it executes.
pub type InterceptFn = Rc<dyn Fn(Action, &mut Gamestate) -> Action>;

/// A notification trigger attached to a unit.
#[derive(Clone)]
pub struct ActionTrigger {
    effect: TriggerFn,
    dispellable: bool,
}

impl ActionTrigger {
    /// A trigger that dispel removes.
    pub fn dispellable(effect: impl Fn(&Action, &mut Gamestate) + 'static) -> Self {
        Self {
            effect: Rc::new(effect),
            dispellable: true,
        }
    }

    /// A trigger that survives dispel (innate behavior).
    pub fn permanent(effect: impl Fn(&Action, &mut Gamestate) + 'static) -> Self {
        Self {
            effect: Rc::new(effect),
            dispellable: false,
        }
    }
}

impl std::fmt::Debug for ActionTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionTrigger")
            .field("dispellable", &self.dispellable)
            .finish_non_exhaustive()
    }
}

/// An interception trigger attached to a unit.
#[derive(Clone)]
pub struct InterceptTrigger {
    apply: InterceptFn,
    dispellable: bool,
}

impl InterceptTrigger {
    /// An intercept that dispel removes.
    pub fn dispellable(apply: impl Fn(Action, &mut Gamestate) -> Action + 'static) -> Self {
        Self {
            apply: Rc::new(apply),
            dispellable: true,
        }
    }

    /// An intercept that survives dispel.
    pub fn permanent(apply: impl Fn(Action, &mut Gamestate) -> Action + 'static) -> Self {
        Self {
            apply: Rc::new(apply),
            dispellable: false,
        }
    }
}

impl std::fmt::Debug for InterceptTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptTrigger")
            .field("dispellable", &self.dispellable)
            .finish_non_exhaustive()
    }
}

/// A general, minion, or token.
#[derive(Clone, Debug)]
pub struct Unit {
    name: String,
    kind: UnitKind,
    subtypes: FxHashSet<String>,
    owner: Option<PlayerId>,
    facing: Facing,
    walk_distance: u32,

    base_hp: i32,
    hp_delta: i32,
    damage: i32,
    base_attack: i32,
    attack_delta: i32,

    attributes: FxHashMap<String, i32>,

    // BTreeMap so trigger passes run in registration order.
    triggers: BTreeMap<TriggerId, ActionTrigger>,
    intercepts: BTreeMap<TriggerId, InterceptTrigger>,
    next_trigger_id: u32,

    // Pipeline registrations for this unit's forwarders, set on placement.
    pub(crate) listener_sub: Option<ListenerId>,
    pub(crate) interceptor_sub: Option<InterceptorId>,
}

impl Unit {
    fn new(name: impl Into<String>, kind: UnitKind, hp: i32, attack: i32, walk: u32) -> Self {
        Self {
            name: name.into(),
            kind,
            subtypes: FxHashSet::default(),
            owner: None,
            facing: Facing::Right,
            walk_distance: walk,
            base_hp: hp,
            hp_delta: 0,
            damage: 0,
            base_attack: attack,
            attack_delta: 0,
            attributes: FxHashMap::default(),
            triggers: BTreeMap::new(),
            intercepts: BTreeMap::new(),
            next_trigger_id: 0,
            listener_sub: None,
            interceptor_sub: None,
        }
    }

    /// A standard minion: given stats, walk distance 2.
    pub fn minion(name: impl Into<String>, hp: i32, attack: i32) -> Self {
        Self::new(name, UnitKind::Minion, hp, attack, 2)
    }

    /// A general: 25 HP, 2 attack, walk distance 2.
    pub fn general(name: impl Into<String>) -> Self {
        Self::new(name, UnitKind::General, 25, 2, 2)
    }

    /// A summoned token with the given stats and walk distance 2.
    pub fn token(name: impl Into<String>, hp: i32, attack: i32) -> Self {
        Self::new(name, UnitKind::Token, hp, attack, 2)
    }

    /// Set the walk distance (builder pattern).
    #[must_use]
    pub fn with_walk_distance(mut self, walk: u32) -> Self {
        self.walk_distance = walk;
        self
    }

    /// Add a subtype tag (builder pattern).
    #[must_use]
    pub fn with_subtype(mut self, subtype: impl Into<String>) -> Self {
        self.subtypes.insert(subtype.into());
        self
    }

    /// Add an attribute (builder pattern).
    #[must_use]
    pub fn with_attribute(mut self, attr: impl Into<String>, value: i32) -> Self {
        self.attributes.insert(attr.into(), value);
        self
    }

    // === Identity ===

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit category.
    #[must_use]
    pub fn kind(&self) -> UnitKind {
        self.kind
    }

    /// Whether the unit carries a subtype tag.
    #[must_use]
    pub fn has_subtype(&self, subtype: &str) -> bool {
        self.subtypes.contains(subtype)
    }

    /// Owning player, or `None` while the unit has never been placed.
    #[must_use]
    pub fn owner(&self) -> Option<PlayerId> {
        self.owner
    }

    /// Current facing. Follows the owner's orientation once placed.
    #[must_use]
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Tiles per turn this unit may walk.
    #[must_use]
    pub fn walk_distance(&self) -> u32 {
        self.walk_distance
    }

    pub(crate) fn bind_owner(&mut self, owner: PlayerId, facing: Facing) {
        self.owner = Some(owner);
        self.facing = facing;
    }

    // === Combat stats ===

    /// Current HP: base + buffs − cumulative damage.
    ///
    /// Not clamped: death is detected, not stored, by checking ≤ 0.
    #[must_use]
    pub fn hp(&self) -> i32 {
        self.base_hp + self.hp_delta - self.damage
    }

    /// Current attack: base + buffs.
    #[must_use]
    pub fn attack(&self) -> i32 {
        self.base_attack + self.attack_delta
    }

    /// Apply damage (positive) or healing (negative).
    ///
    /// Cumulative damage is floored at zero: overheal cannot bank future
    /// healing.
    pub fn apply_damage(&mut self, amount: i32) {
        self.damage = (self.damage + amount).max(0);
    }

    /// Buff (or debuff) attack.
    pub fn buff_attack(&mut self, delta: i32) {
        self.attack_delta += delta;
    }

    /// Buff (or debuff) max health.
    pub fn buff_health(&mut self, delta: i32) {
        self.hp_delta += delta;
    }

    // === Attributes ===

    /// Whether the unit has an attribute, regardless of magnitude.
    #[must_use]
    pub fn has_attribute(&self, attr: &str) -> bool {
        self.attributes.contains_key(attr)
    }

    /// Magnitude of an attribute, 0 when absent.
    #[must_use]
    pub fn attribute_value(&self, attr: &str) -> i32 {
        self.attributes.get(attr).copied().unwrap_or(0)
    }

    /// Add or overwrite an attribute.
    pub fn add_attribute(&mut self, attr: impl Into<String>, value: i32) {
        self.attributes.insert(attr.into(), value);
    }

    /// Remove an attribute.
    pub fn remove_attribute(&mut self, attr: &str) {
        self.attributes.remove(attr);
    }

    // === Triggers ===

    /// Register a notification trigger, returning its per-unit id.
    pub fn add_trigger(&mut self, trigger: ActionTrigger) -> TriggerId {
        let id = TriggerId(self.next_trigger_id);
        self.next_trigger_id += 1;
        self.triggers.insert(id, trigger);
        id
    }

    /// Remove a notification trigger.
    pub fn remove_trigger(&mut self, id: TriggerId) {
        self.triggers.remove(&id);
    }

    /// Register an interception trigger, returning its per-unit id.
    pub fn add_intercept(&mut self, intercept: InterceptTrigger) -> TriggerId {
        let id = TriggerId(self.next_trigger_id);
        self.next_trigger_id += 1;
        self.intercepts.insert(id, intercept);
        id
    }

    /// Remove an interception trigger.
    pub fn remove_intercept(&mut self, id: TriggerId) {
        self.intercepts.remove(&id);
    }

    /// Strip buffs, attributes, and every dispellable trigger.
    ///
    /// Non-dispellable triggers and intercepts survive.
    pub fn dispel(&mut self) {
        self.hp_delta = 0;
        self.attack_delta = 0;
        self.attributes.clear();
        self.triggers.retain(|_, t| !t.dispellable);
        self.intercepts.retain(|_, t| !t.dispellable);
    }

    pub(crate) fn trigger_fns(&self) -> Vec<TriggerFn> {
        self.triggers.values().map(|t| t.effect.clone()).collect()
    }

    pub(crate) fn intercept_fns(&self) -> Vec<InterceptFn> {
        self.intercepts.values().map(|t| t.apply.clone()).collect()
    }
}

/// Forwards pipeline notifications to a unit's action triggers.
///
/// Registered when the unit is placed, removed when it leaves the board.
/// The trigger set is snapshotted before running, so a trigger may add or
/// remove triggers (including itself) without disturbing the pass.
#[derive(Clone, Copy, Debug)]
pub(crate) struct UnitListener {
    pub unit: UnitId,
}

impl Listener for UnitListener {
    fn notify(&self, _own_id: ListenerId, action: &Action, game: &mut Gamestate) {
        let Some(unit) = game.unit(self.unit) else {
            return;
        };
        for trigger in unit.trigger_fns() {
            trigger(action, game);
        }
    }
}

/// Forwards pipeline interception to a unit's intercept triggers.
#[derive(Clone, Copy, Debug)]
pub(crate) struct UnitInterceptor {
    pub unit: UnitId,
}

impl Interceptor for UnitInterceptor {
    fn intercept(&self, _own_id: InterceptorId, mut action: Action, game: &mut Gamestate) -> Action {
        let Some(unit) = game.unit(self.unit) else {
            return action;
        };
        for apply in unit.intercept_fns() {
            action = apply(action, game);
        }
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_general_stats() {
        let general = Unit::general("Lyonar");

        assert_eq!(general.kind(), UnitKind::General);
        assert_eq!(general.hp(), 25);
        assert_eq!(general.attack(), 2);
        assert_eq!(general.walk_distance(), 2);
        assert_eq!(general.owner(), None);
    }

    #[test]
    fn test_damage_and_overheal_floor() {
        let mut minion = Unit::minion("gremlin", 10, 1);

        minion.apply_damage(4);
        assert_eq!(minion.hp(), 6);

        // Healing past full does not bank.
        minion.apply_damage(-9);
        assert_eq!(minion.hp(), 10);

        minion.apply_damage(2);
        assert_eq!(minion.hp(), 8);
    }

    #[test]
    fn test_hp_not_clamped_at_death() {
        let mut minion = Unit::minion("gremlin", 1, 1);
        minion.apply_damage(5);
        assert_eq!(minion.hp(), -4);
    }

    #[test]
    fn test_buffs() {
        let mut minion = Unit::minion("gremlin", 1, 1);

        minion.buff_attack(3);
        minion.buff_health(2);

        assert_eq!(minion.attack(), 4);
        assert_eq!(minion.hp(), 3);
    }

    #[test]
    fn test_attributes() {
        let mut unit = Unit::minion("assassin", 2, 2);

        assert!(!unit.has_attribute("backstab"));
        assert_eq!(unit.attribute_value("backstab"), 0);

        unit.add_attribute("backstab", 2);
        assert!(unit.has_attribute("backstab"));
        assert_eq!(unit.attribute_value("backstab"), 2);

        // Flag-style attributes have magnitude 0 but still count as present.
        unit.add_attribute("ranged", 0);
        assert!(unit.has_attribute("ranged"));

        unit.remove_attribute("backstab");
        assert!(!unit.has_attribute("backstab"));
    }

    #[test]
    fn test_dispel_keeps_permanent_triggers() {
        let mut unit = Unit::token("wall", 2, 0).with_attribute("ranged", 0);
        unit.buff_attack(1);
        unit.buff_health(1);

        let kept = unit.add_trigger(ActionTrigger::permanent(|_, _| {}));
        let dropped = unit.add_trigger(ActionTrigger::dispellable(|_, _| {}));
        let dropped_intercept = unit.add_intercept(InterceptTrigger::dispellable(|a, _| a));

        unit.dispel();

        assert!(!unit.has_attribute("ranged"));
        assert_eq!(unit.attack(), 0);
        assert_eq!(unit.hp(), 2);
        assert!(unit.triggers.contains_key(&kept));
        assert!(!unit.triggers.contains_key(&dropped));
        assert!(!unit.intercepts.contains_key(&dropped_intercept));
    }

    #[test]
    fn test_trigger_ids_are_unique_across_kinds() {
        let mut unit = Unit::minion("gremlin", 1, 1);

        let t = unit.add_trigger(ActionTrigger::dispellable(|_, _| {}));
        let i = unit.add_intercept(InterceptTrigger::dispellable(|a, _| a));

        assert_ne!(t, i);
    }

    #[test]
    fn test_subtypes() {
        let wall = Unit::token("Bonechill Barrier", 2, 0)
            .with_subtype("wall")
            .with_walk_distance(0);

        assert!(wall.has_subtype("wall"));
        assert!(!wall.has_subtype("structure"));
        assert_eq!(wall.walk_distance(), 0);
    }
}
