//! Directive parser integration tests

use proptest::prelude::*;
use tank_arena::command::{parse, parse_intents, Directive, Intent};
use tank_arena::grid::{Compass, GridCoord, GridSpec};

fn cell_strategy() -> impl Strategy<Value = GridCoord> {
    (0u8..18, 0u8..12).prop_map(|(column, row)| GridCoord::new(column, row))
}

/// At most one intent per kind, in the order the parser reports them
fn intents_strategy() -> impl Strategy<Value = Vec<Intent>> {
    (
        proptest::option::of((cell_strategy(), cell_strategy())),
        proptest::option::of(cell_strategy()),
        proptest::option::of(cell_strategy()),
        proptest::option::of(0usize..8),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(patrol, guard, move_to, face, sight, once)| {
            let mut intents = Vec::new();
            if let Some((cell_a, cell_b)) = patrol {
                intents.push(Intent::Patrol { cell_a, cell_b });
            }
            if let Some(cell) = guard {
                intents.push(Intent::Guard { cell });
            }
            if let Some(cell) = move_to {
                intents.push(Intent::MoveTo { cell });
            }
            if let Some(index) = face {
                intents.push(Intent::Face {
                    direction: Compass::ALL[index],
                });
            }
            if sight {
                intents.push(Intent::ShootOnSight);
            }
            if once {
                intents.push(Intent::ShootOnce);
            }
            intents
        })
}

fn canonical(intents: &[Intent]) -> String {
    intents
        .iter()
        .map(Intent::directive)
        .collect::<Vec<_>>()
        .join(" and ")
}

proptest! {
    #[test]
    fn test_move_target_respects_arena_bounds(column in 0u8..26, row in 1u8..100) {
        let text = format!("move to {}{}", (b'A' + column) as char, row);
        let intents = parse(&text);
        if column < 18 && row <= 12 {
            prop_assert_eq!(intents, vec![Intent::MoveTo { cell: GridCoord::new(column, row - 1) }]);
        } else {
            prop_assert!(intents.is_empty(), "{} gave {:?}", text, intents);
        }
    }

    #[test]
    fn test_canonical_text_round_trips(intents in intents_strategy()) {
        let text = canonical(&intents);
        prop_assert_eq!(parse(&text), intents);
    }

    #[test]
    fn test_reparse_is_stable(intents in intents_strategy(), shout in any::<bool>()) {
        let mut text = canonical(&intents);
        if shout {
            text = text.to_uppercase();
        }
        let first = parse(&text);
        let second = parse(&canonical(&first));
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_parse_never_panics(text in "\\PC{0,80}") {
        let _ = parse(&text);
    }
}

#[test]
fn test_free_form_compound_directive() {
    let intents = parse("  Please PATROL between cell B2 and b9,   and fire at enemies in view ");
    assert_eq!(
        intents,
        vec![
            Intent::Patrol {
                cell_a: GridCoord::new(1, 1),
                cell_b: GridCoord::new(1, 8),
            },
            Intent::ShootOnSight,
        ]
    );
}

#[test]
fn test_larger_arena_accepts_more_cells() {
    let wide = GridSpec::new(26, 30, 50.0);
    assert!(parse("guard Z30").is_empty());
    assert_eq!(
        parse_intents("guard Z30", &wide),
        vec![Intent::Guard {
            cell: GridCoord::new(25, 29)
        }]
    );
}

#[test]
fn test_directive_classification() {
    let spec = GridSpec::default();
    assert_eq!(Directive::interpret("  STOP ", &spec), Directive::Stop);
    assert_eq!(Directive::interpret("", &spec), Directive::Stop);
    assert_eq!(Directive::interpret("sing a song", &spec), Directive::Unrecognized);
    assert_eq!(
        Directive::interpret("head towards C4", &spec),
        Directive::Strategy(vec![Intent::MoveTo {
            cell: GridCoord::new(2, 3)
        }])
    );
}

#[test]
fn test_clause_fallback_when_nothing_matches_whole() {
    let intents = parse("Please head to the J7, and then guard the spot at K8 and just fire");
    // "fire" matches the whole text, so no clause-by-clause retry happens
    assert_eq!(intents, vec![Intent::ShootOnce]);

    let intents = parse("Please head to the J7 and then look the west");
    assert_eq!(
        intents,
        vec![
            Intent::MoveTo {
                cell: GridCoord::new(9, 6)
            },
            Intent::Face {
                direction: Compass::W
            },
        ]
    );
}
