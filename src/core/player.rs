//! Player identity and orientation.
//!
//! A player owns units; nothing else. There is no player-level HP or
//! resource pool — a player is alive exactly while a general they own is on
//! the board, so aliveness is a [`Gamestate`](crate::core::Gamestate) query,
//! not a field here.

use serde::{Deserialize, Serialize};

use super::position::Position;

/// Player identifier: an index into the gamestate's ordered player list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Which way a player's units face.
///
/// Fixed at setup from the player's side of the board. Facing only matters
/// for the backstab rule: an attacker directly behind a defender's facing
/// bypasses the counter-attack.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// Whether this facing points in the +x direction.
    #[must_use]
    pub const fn faces_right(self) -> bool {
        matches!(self, Facing::Right)
    }
}

/// Static per-player setup: name, chosen general archetype, and board side.
///
/// The gamestate constructor spawns one general per player from this record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    /// Opaque display name.
    pub name: String,

    /// Name of the general archetype this player fields.
    pub general: String,

    /// Where the player's general starts.
    pub starting_position: Position,

    /// Orientation of every unit this player owns.
    pub facing: Facing,
}

impl Player {
    /// Create a player record.
    pub fn new(
        name: impl Into<String>,
        general: impl Into<String>,
        starting_position: Position,
        facing: Facing,
    ) -> Self {
        Self {
            name: name.into(),
            general: general.into(),
            starting_position,
            facing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_basics() {
        assert_eq!(PlayerId::new(1).index(), 1);
        assert_eq!(format!("{}", PlayerId::new(0)), "Player 0");
    }

    #[test]
    fn test_player_id_all() {
        let ids: Vec<_> = PlayerId::all(3).collect();
        assert_eq!(ids, vec![PlayerId::new(0), PlayerId::new(1), PlayerId::new(2)]);
    }

    #[test]
    fn test_facing() {
        assert!(Facing::Right.faces_right());
        assert!(!Facing::Left.faces_right());
    }

    #[test]
    fn test_player_record() {
        let p = Player::new("Foo", "Lyonar", Position::new(0, 2), Facing::Right);
        assert_eq!(p.name, "Foo");
        assert_eq!(p.general, "Lyonar");
        assert_eq!(p.starting_position, Position::new(0, 2));
    }
}
