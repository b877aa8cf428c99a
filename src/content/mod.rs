//! Game content built on the pipeline: spells, artifacts, and tokens.
//!
//! Nothing here is special-cased by the engine. A spell is a closure
//! resolved by an [`Action::Spell`](crate::core::Action); an artifact is a
//! listener/interceptor pair with a charge counter; a token is a unit with
//! an innate trigger. New content composes the same public surface.

pub mod artifact;
pub mod spell;
pub mod tokens;

pub use artifact::{Artifact, ArtifactBuilder};
pub use spell::{Spell, SpellCast};
pub use tokens::summon_wall;
