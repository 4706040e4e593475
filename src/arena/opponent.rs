//! Scripted opponent strategist
//!
//! Picks an aggressive strategy from the distance to the enemy, phrases it
//! as directive text and feeds it through the same parser a human uses.
//! Strategies are re-rolled every few seconds of ticks. Deterministic for a
//! given seed.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::command::intent::Intent;
use crate::command::parser::parse_intents;
use crate::core::types::{EntitySnapshot, Tick};
use crate::grid::{GridCoord, GridSpec};
use crate::navigation::geometry::distance;

/// Physics ticks per second of game time
pub const TICKS_PER_SECOND: Tick = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyKind {
    /// Drive at a cell near the enemy, firing on sight
    Assault,
    /// Hold a cell close to the enemy
    GuardNear,
    /// Patrol across the enemy's neighbourhood
    InterceptPatrol,
    /// Patrol between a far and a near cell, closing in
    ApproachPatrol,
}

/// Distance bands (pixels) that shape the strategy mix
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategistConfig {
    pub close_range: f32,
    pub medium_range: f32,
    /// Shortest time a strategy is kept
    pub min_hold_ticks: Tick,
    /// Longest time a strategy is kept
    pub max_hold_ticks: Tick,
    /// Idle ticks before the first strategy
    pub startup_delay_ticks: Tick,
}

impl Default for StrategistConfig {
    fn default() -> Self {
        Self {
            close_range: 200.0,
            medium_range: 400.0,
            min_hold_ticks: 4 * TICKS_PER_SECOND,
            max_hold_ticks: 10 * TICKS_PER_SECOND,
            startup_delay_ticks: 0,
        }
    }
}

const ASSAULT_TEMPLATES: &[&str] = &[
    "move to {a} and shoot at anything in your sight",
    "go to {a} and fire at enemies in sight",
    "advance to {a} and shoot at targets in view",
    "move to {a} and attack anything in sight",
];
const GUARD_TEMPLATES: &[&str] = &[
    "guard {a} and shoot at anything in your sight",
    "defend position {a} and fire at enemies in sight",
    "hold {a} and attack targets in view",
];
const INTERCEPT_TEMPLATES: &[&str] = &[
    "patrol between {a} and {b} and shoot at anything in your sight",
    "go back and forth between {a} and {b} and fire at enemies in sight",
    "circle between {a} and {b} and attack targets in view",
];
const APPROACH_TEMPLATES: &[&str] = &[
    "patrol between {a} and {b} and shoot at anything in your sight",
    "alternate between {a} and {b} and fire at enemies in sight",
    "loop between {a} and {b} and attack anything in view",
];

pub struct Strategist {
    rng: ChaCha8Rng,
    spec: GridSpec,
    config: StrategistConfig,
    /// Ticks until the next re-roll
    countdown: Tick,
    current: Option<(StrategyKind, String)>,
}

impl Strategist {
    pub fn new(seed: u64, spec: GridSpec, config: StrategistConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            spec,
            countdown: config.startup_delay_ticks,
            config,
            current: None,
        }
    }

    /// Text and kind of the strategy currently in force
    pub fn current(&self) -> Option<&(StrategyKind, String)> {
        self.current.as_ref()
    }

    /// Advance one tick; returns new intents when the strategy changes
    pub fn poll(&mut self, me: &EntitySnapshot, enemy: &EntitySnapshot) -> Option<Vec<Intent>> {
        if self.countdown > 0 {
            self.countdown -= 1;
            return None;
        }
        let min = self.config.min_hold_ticks;
        let max = self.config.max_hold_ticks.max(min);
        self.countdown = self.rng.gen_range(min..=max);

        let (kind, text) = self.next_strategy(me, enemy);
        let intents = parse_intents(&text, &self.spec);
        tracing::debug!(?kind, strategy = %text, hold_ticks = self.countdown, "opponent strategy");
        self.current = Some((kind, text));
        if intents.is_empty() {
            None
        } else {
            Some(intents)
        }
    }

    /// Choose and phrase a fresh strategy
    pub fn next_strategy(&mut self, me: &EntitySnapshot, enemy: &EntitySnapshot) -> (StrategyKind, String) {
        let kind = self.choose_kind(distance(me.position, enemy.position));
        let text = self.compose(kind, me, enemy);
        (kind, text)
    }

    pub fn choose_kind(&mut self, range: f32) -> StrategyKind {
        let roll: f32 = self.rng.gen();
        if range < self.config.close_range {
            if roll < 0.6 {
                StrategyKind::Assault
            } else {
                StrategyKind::GuardNear
            }
        } else if range < self.config.medium_range {
            if roll < 0.5 {
                StrategyKind::InterceptPatrol
            } else {
                StrategyKind::Assault
            }
        } else if roll < 0.4 {
            StrategyKind::ApproachPatrol
        } else {
            StrategyKind::Assault
        }
    }

    pub fn compose(&mut self, kind: StrategyKind, me: &EntitySnapshot, enemy: &EntitySnapshot) -> String {
        let enemy_cell = self.spec.cell_at(enemy.position);
        let my_cell = self.spec.cell_at(me.position);

        let (templates, a, b) = match kind {
            StrategyKind::Assault => (ASSAULT_TEMPLATES, self.pick_near(enemy_cell, 3), enemy_cell),
            StrategyKind::GuardNear => (GUARD_TEMPLATES, self.pick_near(enemy_cell, 2), enemy_cell),
            StrategyKind::InterceptPatrol => {
                let near = self.spec.cells_near(enemy_cell, 4);
                let picked: Vec<GridCoord> = near.choose_multiple(&mut self.rng, 2).copied().collect();
                match picked.as_slice() {
                    [a, b] => (INTERCEPT_TEMPLATES, *a, *b),
                    [a] => (INTERCEPT_TEMPLATES, enemy_cell, *a),
                    _ => (INTERCEPT_TEMPLATES, enemy_cell, my_cell),
                }
            }
            StrategyKind::ApproachPatrol => {
                let far = self.spec.cells_near(enemy_cell, 6);
                let a = far.choose(&mut self.rng).copied().unwrap_or(my_cell);
                let b = self.pick_near(enemy_cell, 3);
                (APPROACH_TEMPLATES, a, b)
            }
        };

        let template = templates.choose(&mut self.rng).copied().unwrap_or(templates[0]);
        template
            .replace("{a}", &a.to_string())
            .replace("{b}", &b.to_string())
    }

    fn pick_near(&mut self, center: GridCoord, radius: u8) -> GridCoord {
        self.spec
            .cells_near(center, radius)
            .choose(&mut self.rng)
            .copied()
            .unwrap_or(center)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::intent::IntentKind;

    fn strategist(seed: u64) -> Strategist {
        Strategist::new(seed, GridSpec::default(), StrategistConfig::default())
    }

    #[test]
    fn test_distance_bands() {
        let mut s = strategist(1);
        for _ in 0..50 {
            let close = s.choose_kind(100.0);
            assert!(matches!(close, StrategyKind::Assault | StrategyKind::GuardNear));
            let medium = s.choose_kind(300.0);
            assert!(matches!(medium, StrategyKind::Assault | StrategyKind::InterceptPatrol));
            let long = s.choose_kind(900.0);
            assert!(matches!(long, StrategyKind::Assault | StrategyKind::ApproachPatrol));
        }
    }

    #[test]
    fn test_every_strategy_parses() {
        let mut s = strategist(7);
        let me = EntitySnapshot::new(1650.0, 550.0, 270.0);
        let enemy = EntitySnapshot::new(150.0, 550.0, 90.0);
        for kind in [
            StrategyKind::Assault,
            StrategyKind::GuardNear,
            StrategyKind::InterceptPatrol,
            StrategyKind::ApproachPatrol,
        ] {
            for _ in 0..20 {
                let text = s.compose(kind, &me, &enemy);
                let intents = parse_intents(&text, &GridSpec::default());
                assert_eq!(intents.len(), 2, "{text}");
                assert_eq!(intents[1].kind(), IntentKind::ShootOnSight, "{text}");
                assert!(intents[0].is_movement(), "{text}");
            }
        }
    }

    #[test]
    fn test_same_seed_same_strategies() {
        let me = EntitySnapshot::new(1650.0, 550.0, 270.0);
        let enemy = EntitySnapshot::new(150.0, 550.0, 90.0);
        let mut a = strategist(42);
        let mut b = strategist(42);
        for _ in 0..10 {
            assert_eq!(a.next_strategy(&me, &enemy), b.next_strategy(&me, &enemy));
        }
    }

    #[test]
    fn test_poll_rerolls_on_schedule() {
        let config = StrategistConfig {
            min_hold_ticks: 3,
            max_hold_ticks: 3,
            startup_delay_ticks: 2,
            ..StrategistConfig::default()
        };
        let mut s = Strategist::new(3, GridSpec::default(), config);
        let me = EntitySnapshot::new(1650.0, 550.0, 270.0);
        let enemy = EntitySnapshot::new(150.0, 550.0, 90.0);

        let changes: Vec<bool> = (0..10).map(|_| s.poll(&me, &enemy).is_some()).collect();
        assert_eq!(
            changes,
            vec![false, false, true, false, false, false, true, false, false, false]
        );
        assert!(s.current().is_some());
    }
}
