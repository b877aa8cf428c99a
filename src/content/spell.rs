//! Spells: one-shot effects expressed as closures over the pipeline.
//!
//! A spell is data (name, cost, optional base damage) plus an effect
//! closure. Casting wraps the effect in an [`Action::Spell`] and submits it
//! through [`Gamestate::make_move`], so spells are interceptable like any
//! other action: a damage-spell's effective amount rides on the cast and
//! can be rewritten before resolution.

use std::rc::Rc;

use smallvec::SmallVec;

use crate::core::{Action, Gamestate, PlayerId, Position, UnitId};

type GenericEffect = Rc<dyn Fn(PlayerId, &mut Gamestate, &[UnitId], &[Position])>;
type DamageEffect = Rc<dyn Fn(PlayerId, &mut Gamestate, i32, &[UnitId], &[Position])>;

enum SpellEffect {
    Generic(GenericEffect),
    Damage(DamageEffect),
}

/// A castable spell definition. Shared immutably via `Rc`; all per-cast
/// state travels on the [`SpellCast`].
pub struct Spell {
    name: String,
    cost: i32,
    base_damage: Option<i32>,
    effect: SpellEffect,
}

impl Spell {
    /// A spell with an arbitrary effect.
    pub fn generic(
        name: impl Into<String>,
        cost: i32,
        effect: impl Fn(PlayerId, &mut Gamestate, &[UnitId], &[Position]) + 'static,
    ) -> Rc<Spell> {
        Rc::new(Spell {
            name: name.into(),
            cost,
            base_damage: None,
            effect: SpellEffect::Generic(Rc::new(effect)),
        })
    }

    /// A damage spell. The effect receives the *effective* damage, which
    /// interceptors may have rewritten from `damage`.
    pub fn damage(
        name: impl Into<String>,
        cost: i32,
        damage: i32,
        effect: impl Fn(PlayerId, &mut Gamestate, i32, &[UnitId], &[Position]) + 'static,
    ) -> Rc<Spell> {
        Rc::new(Spell {
            name: name.into(),
            cost,
            base_damage: Some(damage),
            effect: SpellEffect::Damage(Rc::new(effect)),
        })
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

    /// Printed damage, for damage spells.
    #[must_use]
    pub fn base_damage(&self) -> Option<i32> {
        self.base_damage
    }

    /// Whether damage-amplification effects apply to this spell.
    #[must_use]
    pub fn is_damage_spell(&self) -> bool {
        matches!(self.effect, SpellEffect::Damage(_))
    }

    /// Cast the spell through the pipeline.
    pub fn cast(
        self: &Rc<Self>,
        owner: PlayerId,
        game: &mut Gamestate,
        targets: &[UnitId],
        tiles: &[Position],
    ) {
        game.make_move(Action::Spell(SpellCast {
            owner,
            spell: Rc::clone(self),
            targets: SmallVec::from_slice(targets),
            tiles: SmallVec::from_slice(tiles),
            damage: self.base_damage,
        }));
    }
}

impl std::fmt::Debug for Spell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Spell")
            .field("name", &self.name)
            .field("cost", &self.cost)
            .field("base_damage", &self.base_damage)
            .finish_non_exhaustive()
    }
}

/// One cast of a spell: the caster, chosen targets/tiles, and for damage
/// spells the effective amount.
#[derive(Clone, Debug)]
pub struct SpellCast {
    pub owner: PlayerId,
    pub spell: Rc<Spell>,
    pub targets: SmallVec<[UnitId; 2]>,
    pub tiles: SmallVec<[Position; 4]>,
    /// Effective damage for damage spells; interceptors rewrite this.
    pub damage: Option<i32>,
}

impl SpellCast {
    /// Copy of this cast with the effective damage replaced.
    #[must_use]
    pub fn with_damage(mut self, damage: i32) -> Self {
        self.damage = Some(damage);
        self
    }

    pub(crate) fn resolve(&self, game: &mut Gamestate) {
        match &self.spell.effect {
            SpellEffect::Generic(effect) => effect(self.owner, game, &self.targets, &self.tiles),
            SpellEffect::Damage(effect) => effect(
                self.owner,
                game,
                self.damage.unwrap_or(0),
                &self.targets,
                &self.tiles,
            ),
        }
    }
}
