//! Summoned token units.

use crate::core::{Action, ActionTrigger, Gamestate, Unit, UnitId};

/// Spawn a wall token: zero walk distance, and an innate (non-dispellable)
/// trigger that removes the wall when it gets dispelled.
///
/// The caller still has to place it; walls die to dispel wherever they
/// stand, including after being relocated by other effects.
pub fn summon_wall(game: &mut Gamestate, name: &str, hp: i32, attack: i32) -> UnitId {
    let id = game.spawn(
        Unit::token(name, hp, attack)
            .with_subtype("wall")
            .with_walk_distance(0),
    );

    if let Some(wall) = game.unit_mut(id) {
        wall.add_trigger(ActionTrigger::permanent(move |action, game| {
            if matches!(action, Action::Dispel { unit } if *unit == id) {
                game.queue_action(Action::Remove { unit: id });
            }
        }));
    }

    id
}
