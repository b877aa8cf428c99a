//! Combat integration tests: damage, healing, and the attack modifiers.

use skirmish_core::{Action, Facing, Gamestate, Player, PlayerId, Position, Unit, UnitId};

fn setup() -> (Gamestate, UnitId, UnitId) {
    let mut game = Gamestate::new(
        9,
        5,
        vec![
            Player::new("Foo", "Lyonar", Position::new(0, 2), Facing::Right),
            Player::new("Bar", "Songhai", Position::new(8, 2), Facing::Left),
        ],
    );

    let g1 = game.general_of(PlayerId::new(0)).unwrap();
    let g2 = game.general_of(PlayerId::new(1)).unwrap();
    (game, g1, g2)
}

#[test]
fn test_damage_and_overheal() {
    let (mut game, g1, _) = setup();

    game.make_move(Action::Damage { unit: g1, amount: 2 });
    assert_eq!(game.unit(g1).unwrap().hp(), 23);

    // Healing past full caps at max HP.
    game.make_move(Action::Heal { unit: g1, amount: 5 });
    assert_eq!(game.unit(g1).unwrap().hp(), 25);
}

#[test]
fn test_lethal_heal_reversal_kills() {
    // Heal shares the damage path end to end, death check included, so a
    // negative heal is lethal like any other damage.
    let (mut game, _, _) = setup();

    let gremlin = game.spawn(Unit::minion("gremlin", 1, 1));
    game.make_move(Action::Place {
        owner: PlayerId::new(0),
        unit: gremlin,
        at: Position::new(4, 2),
    });

    game.make_move(Action::Heal {
        unit: gremlin,
        amount: -3,
    });

    assert!(!game.is_on_board(gremlin));
}

#[test]
fn test_mutual_melee_attack() {
    let (mut game, g1, g2) = setup();

    let in_front_of_g2 = game.position_of(g2).diff(Position::new(1, 0));
    game.make_move(Action::Move {
        unit: g1,
        to: in_front_of_g2,
    });

    game.make_move(Action::Attack {
        attacker: g1,
        defender: g2,
    });

    assert_eq!(game.unit(g1).unwrap().hp(), 23);
    assert_eq!(game.unit(g2).unwrap().hp(), 23);
}

#[test]
fn test_attack_out_of_range_is_ignored() {
    let (mut game, g1, g2) = setup();

    game.make_move(Action::Attack {
        attacker: g1,
        defender: g2,
    });

    assert_eq!(game.unit(g1).unwrap().hp(), 25);
    assert_eq!(game.unit(g2).unwrap().hp(), 25);
}

#[test]
fn test_ranged_attack_draws_no_counter() {
    let (mut game, g1, g2) = setup();

    game.unit_mut(g1).unwrap().add_attribute("ranged", 0);

    game.make_move(Action::Attack {
        attacker: g1,
        defender: g2,
    });

    assert_eq!(game.unit(g2).unwrap().hp(), 23);
    assert_eq!(game.unit(g1).unwrap().hp(), 25);
}

#[test]
fn test_ranged_defender_counters_at_any_distance() {
    let (mut game, g1, g2) = setup();

    game.unit_mut(g1).unwrap().add_attribute("ranged", 0);
    game.unit_mut(g2).unwrap().add_attribute("ranged", 0);

    game.make_move(Action::Attack {
        attacker: g1,
        defender: g2,
    });

    assert_eq!(game.unit(g2).unwrap().hp(), 23);
    assert_eq!(game.unit(g1).unwrap().hp(), 23);
}

#[test]
fn test_backstab_bonus_and_no_counter() {
    let (mut game, g1, g2) = setup();

    game.unit_mut(g1).unwrap().add_attribute("backstab", 2);

    game.make_move(Action::Move {
        unit: g1,
        to: Position::new(1, 2),
    });
    // The left-facing defender walks past the attacker.
    game.make_move(Action::Move {
        unit: g2,
        to: Position::new(0, 2),
    });

    game.make_move(Action::Attack {
        attacker: g1,
        defender: g2,
    });

    assert_eq!(game.unit(g1).unwrap().hp(), 25);
    assert_eq!(game.unit(g2).unwrap().hp(), 21);
}

#[test]
fn test_backstab_from_the_front_is_plain_melee() {
    let (mut game, g1, g2) = setup();

    game.unit_mut(g1).unwrap().add_attribute("backstab", 2);

    let in_front_of_g2 = game.position_of(g2).diff(Position::new(1, 0));
    game.make_move(Action::Move {
        unit: g1,
        to: in_front_of_g2,
    });

    game.make_move(Action::Attack {
        attacker: g1,
        defender: g2,
    });

    assert_eq!(game.unit(g1).unwrap().hp(), 23);
    assert_eq!(game.unit(g2).unwrap().hp(), 21);
}

#[test]
fn test_blast_attack_sweeps_the_line() {
    let (mut game, g1, g2) = setup();

    game.unit_mut(g1).unwrap().add_attribute("blast", 0);

    let mut gremlins = Vec::new();
    for x in [7, 6, 5] {
        let gremlin = game.spawn(Unit::minion("gremlin", 1, 1));
        game.make_move(Action::Place {
            owner: PlayerId::new(1),
            unit: gremlin,
            at: Position::new(x, 2),
        });
        gremlins.push(gremlin);
    }

    game.make_move(Action::Attack {
        attacker: g1,
        defender: gremlins[0],
    });

    for &gremlin in &gremlins {
        assert!(!game.is_on_board(gremlin));
        assert_eq!(game.position_of(gremlin), Position::OFF_BOARD);
    }
    // The enemy general shares the line and is swept too.
    assert_eq!(game.unit(g2).unwrap().hp(), 23);
    // Too far for a counter-attack.
    assert_eq!(game.unit(g1).unwrap().hp(), 25);
}

#[test]
fn test_blast_spares_friendlies_on_the_line() {
    let (mut game, g1, g2) = setup();

    game.unit_mut(g1).unwrap().add_attribute("blast", 0);

    let friendly = game.spawn(Unit::minion("goblin", 1, 1));
    game.make_move(Action::Place {
        owner: PlayerId::new(0),
        unit: friendly,
        at: Position::new(4, 2),
    });

    game.make_move(Action::Attack {
        attacker: g1,
        defender: g2,
    });

    assert!(game.is_on_board(friendly));
    assert_eq!(game.unit(g2).unwrap().hp(), 23);
}

#[test]
fn test_frenzy_attack_hits_all_adjacent_enemies() {
    let (mut game, g1, _) = setup();

    game.unit_mut(g1).unwrap().add_attribute("frenzy", 0);

    let mut gremlins = Vec::new();
    for at in [Position::new(0, 1), Position::new(1, 2), Position::new(0, 3)] {
        let gremlin = game.spawn(Unit::minion("gremlin", 1, 1));
        game.make_move(Action::Place {
            owner: PlayerId::new(1),
            unit: gremlin,
            at,
        });
        gremlins.push(gremlin);
    }

    game.make_move(Action::Attack {
        attacker: g1,
        defender: gremlins[0],
    });

    for &gremlin in &gremlins {
        assert!(!game.is_on_board(gremlin));
        assert_eq!(game.position_of(gremlin), Position::OFF_BOARD);
    }

    // Exactly one counter-attack, from the defender proper.
    assert_eq!(game.unit(g1).unwrap().hp(), 24);
    assert!(game.is_on_board(g1));
}

#[test]
fn test_frenzy_hits_defender_once() {
    // The defender must not take a second hit from the frenzy sweep.
    let (mut game, g1, _) = setup();

    game.unit_mut(g1).unwrap().add_attribute("frenzy", 0);

    let tough = game.spawn(Unit::minion("ogre", 10, 1));
    game.make_move(Action::Place {
        owner: PlayerId::new(1),
        unit: tough,
        at: Position::new(1, 2),
    });

    game.make_move(Action::Attack {
        attacker: g1,
        defender: tough,
    });

    assert_eq!(game.unit(tough).unwrap().hp(), 8);
}
