//! The closed set of state mutations.
//!
//! Every change to a game flows through an [`Action`]. Content code never
//! mutates the board or units directly: it constructs actions and hands
//! them to the pipeline, which lets interceptors rewrite them and listeners
//! observe them.
//!
//! The action set is fixed and small, so it is a plain enum dispatched by
//! exhaustive match rather than an open trait: adding a variant is a
//! deliberate engine change, and the compiler walks every execution site.

use std::collections::BTreeMap;
use std::rc::Rc;

use super::player::PlayerId;
use super::position::{line_between, Position};
use super::state::Gamestate;
use super::unit::UnitId;
use crate::content::{Artifact, SpellCast};

/// An arbitrary single-unit callback, used by generic spell mechanics
/// (forced dispel, stat rewrites) that don't warrant their own variant.
#[derive(Clone)]
pub struct UnitEffect(Rc<dyn Fn(UnitId, &mut Gamestate)>);

impl UnitEffect {
    /// Wrap a callback.
    pub fn new(effect: impl Fn(UnitId, &mut Gamestate) + 'static) -> Self {
        Self(Rc::new(effect))
    }
}

impl std::fmt::Debug for UnitEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("UnitEffect")
    }
}

/// A single discrete intent submitted to or generated within the pipeline.
///
/// Each variant carries only the data needed to execute itself and is
/// consumed exactly once by the drain loop. Execution may enqueue follow-up
/// actions; those are listed per variant.
#[derive(Clone, Debug)]
pub enum Action {
    /// Relocate a placed unit. No occupancy check — callers pre-filter via
    /// [`Gamestate::valid_moves`].
    Move { unit: UnitId, to: Position },

    /// Place a unit on the board under an owner and subscribe its triggers.
    Place {
        owner: PlayerId,
        unit: UnitId,
        at: Position,
    },

    /// Remove a unit from the board and unsubscribe its triggers.
    Remove { unit: UnitId },

    /// Apply damage (positive) or healing (negative). Enqueues `Remove`
    /// when the resulting HP is ≤ 0.
    Damage { unit: UnitId, amount: i32 },

    /// Sugar for `Damage` with a negated amount; shares its whole path,
    /// death check included.
    Heal { unit: UnitId, amount: i32 },

    /// Resolve combat: collateral damage per attacker attributes
    /// (backstab, blast, frenzy), then a possible counter-attack. Enqueues
    /// zero or more `Damage` actions.
    Attack { attacker: UnitId, defender: UnitId },

    /// Invoke an arbitrary single-unit callback.
    Effect { unit: UnitId, effect: UnitEffect },

    /// Strip a unit's buffs, attributes, and dispellable triggers.
    Dispel { unit: UnitId },

    /// Resolve a spell's effect with the (possibly rewritten) cast data.
    Spell(SpellCast),

    /// Bind an artifact to a player and register its hooks.
    EquipArtifact {
        owner: PlayerId,
        artifact: Rc<Artifact>,
    },

    /// Unbind an artifact and unregister its hooks.
    RemoveArtifact { artifact: Rc<Artifact> },

    /// Advance the active player, iff submitted by the current one.
    EndTurn { player: PlayerId },
}

impl Action {
    pub(crate) fn execute(&self, game: &mut Gamestate) {
        match self {
            Action::Move { unit, to } => game.board_mut().relocate(*unit, *to),
            Action::Place { owner, unit, at } => game.place_unit(*owner, *unit, *at),
            Action::Remove { unit } => game.remove_unit(*unit),
            Action::Damage { unit, amount } => apply_damage(game, *unit, *amount),
            Action::Heal { unit, amount } => apply_damage(game, *unit, -*amount),
            Action::Attack { attacker, defender } => resolve_attack(game, *attacker, *defender),
            Action::Effect { unit, effect } => (effect.0)(*unit, game),
            Action::Dispel { unit } => {
                if let Some(u) = game.unit_mut(*unit) {
                    u.dispel();
                }
            }
            Action::Spell(cast) => cast.resolve(game),
            Action::EquipArtifact { owner, artifact } => artifact.equip(*owner, game),
            Action::RemoveArtifact { artifact } => artifact.remove(game),
            Action::EndTurn { player } => {
                if game.active_player() == *player {
                    game.end_turn();
                }
            }
        }
    }
}

fn apply_damage(game: &mut Gamestate, unit: UnitId, amount: i32) {
    let Some(u) = game.unit_mut(unit) else {
        return;
    };
    u.apply_damage(amount);
    if u.hp() <= 0 {
        game.queue_action(Action::Remove { unit });
    }
}

/// The combat algorithm.
///
/// Collateral damage is collected into a map keyed by unit id and enqueued
/// in sorted key order, so resolution order is deterministic even though
/// the rules themselves don't care. The defender's entry is written first
/// (base attack, plus the backstab bonus when the attacker is behind the
/// defender's facing) and is never overwritten: the blast and frenzy scans
/// exclude both the attacker and the defender.
fn resolve_attack(game: &mut Gamestate, attacker: UnitId, defender: UnitId) {
    if !game.in_range(attacker, defender) {
        return;
    }

    let (attack_value, has_backstab, backstab_bonus, has_blast, has_frenzy) =
        match game.unit(attacker) {
            Some(a) => (
                a.attack(),
                a.has_attribute("backstab"),
                a.attribute_value("backstab"),
                a.has_attribute("blast"),
                a.has_attribute("frenzy"),
            ),
            None => return,
        };
    let (defender_attack, defender_ranged, defender_faces_right) = match game.unit(defender) {
        Some(d) => (d.attack(), d.has_attribute("ranged"), d.facing().faces_right()),
        None => return,
    };

    let attacker_pos = game.position_of(attacker);
    let defender_pos = game.position_of(defender);

    // Behind the defender: same row, one column opposite its facing.
    let diff = attacker_pos.diff(defender_pos);
    let was_backstabbed = has_backstab
        && diff.y == 0
        && ((diff.x == -1 && defender_faces_right) || (diff.x == 1 && !defender_faces_right));

    let mut collateral: BTreeMap<UnitId, i32> = BTreeMap::new();
    let mut defender_hit = attack_value;
    if was_backstabbed {
        defender_hit += backstab_bonus;
    }
    collateral.insert(defender, defender_hit);

    if has_blast {
        if let Some(dir) = line_between(attacker_pos, defender_pos) {
            for (unit, pos) in game.board().units() {
                if unit == attacker || unit == defender {
                    continue;
                }
                if dir.contains(attacker_pos, pos) && game.is_enemy(attacker, unit) {
                    collateral.insert(unit, attack_value);
                }
            }
        }
    }

    if has_frenzy && game.is_near(attacker, defender) {
        for (unit, pos) in game.board().units() {
            if unit == attacker || unit == defender {
                continue;
            }
            if attacker_pos.chebyshev(pos) == 1 && game.is_enemy(attacker, unit) {
                collateral.insert(unit, attack_value);
            }
        }
    }

    for (unit, amount) in collateral {
        game.queue_action(Action::Damage { unit, amount });
    }

    // Backstab bypasses the counter-attack entirely.
    if !was_backstabbed && (defender_ranged || game.is_near(defender, attacker)) {
        game.queue_action(Action::Damage {
            unit: attacker,
            amount: defender_attack,
        });
    }
}
