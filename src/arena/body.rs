//! Minimal tank kinematics
//!
//! Enough physics to close the loop around the command core: turning,
//! driving with hitbox-vs-terrain checks, a fire cooldown and hit points.
//! Projectile flight is not simulated; an accepted SHOOT only counts a shot.

use crate::command::actuator::ActuatorCommand;
use crate::core::config::BodyConfig;
use crate::core::types::{normalize_heading, EntitySnapshot, Vec2};
use crate::grid::{GridSpec, Passability};

#[derive(Debug, Clone, PartialEq)]
pub struct TankBody {
    position: Vec2,
    heading: f32,
    health: u32,
    /// Ticks left before another shot is accepted
    cooldown: u32,
    shots_fired: u32,
    config: BodyConfig,
    spec: GridSpec,
}

impl TankBody {
    pub fn new(config: BodyConfig, spec: GridSpec, position: Vec2, heading: f32) -> Self {
        Self {
            position,
            heading: normalize_heading(heading),
            health: config.max_health,
            cooldown: 0,
            shots_fired: 0,
            config,
            spec,
        }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn shots_fired(&self) -> u32 {
        self.shots_fired
    }

    pub fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            position: self.position,
            heading: self.heading,
            alive: self.is_alive(),
        }
    }

    /// Would the hitbox fit entirely on passable cells at `position`?
    pub fn can_occupy(&self, position: Vec2, grid: &dyn Passability) -> bool {
        let h = self.config.hitbox_half;
        [(-h, -h), (h, -h), (-h, h), (h, h)].iter().all(|&(dx, dy)| {
            let (col, row) = self.spec.cell_index(position.x + dx, position.y + dy);
            grid.is_passable(col, row)
        })
    }

    /// Apply one actuator command. Returns true when a shot left the barrel.
    ///
    /// Dead bodies ignore everything. Moves that would put the hitbox on
    /// blocked terrain are dropped.
    pub fn apply(&mut self, command: ActuatorCommand, grid: &dyn Passability) -> bool {
        if !self.is_alive() {
            return false;
        }
        match command {
            ActuatorCommand::RotateLeft => {
                self.heading = normalize_heading(self.heading - self.config.rotation_speed);
            }
            ActuatorCommand::RotateRight => {
                self.heading = normalize_heading(self.heading + self.config.rotation_speed);
            }
            ActuatorCommand::Forward => self.translate(self.config.speed, grid),
            ActuatorCommand::Backward => self.translate(-self.config.speed, grid),
            ActuatorCommand::Shoot => return self.try_fire(),
            ActuatorCommand::Stop => {}
        }
        false
    }

    fn translate(&mut self, amount: f32, grid: &dyn Passability) {
        let next = self.position + Vec2::from_heading(self.heading) * amount;
        if self.can_occupy(next, grid) {
            self.position = next;
        }
    }

    fn try_fire(&mut self) -> bool {
        if self.cooldown > 0 {
            return false;
        }
        self.cooldown = self.config.fire_cooldown_ticks;
        self.shots_fired += 1;
        true
    }

    /// Advance the fire cooldown by one tick
    pub fn cool_down(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    /// Back to full health at a spawn point
    pub fn respawn(&mut self, position: Vec2, heading: f32) {
        self.position = position;
        self.heading = normalize_heading(heading);
        self.health = self.config.max_health;
        self.cooldown = 0;
        self.shots_fired = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GridCoord, ObstacleMap};

    fn body_at(x: f32, y: f32, heading: f32) -> TankBody {
        TankBody::new(BodyConfig::default(), GridSpec::default(), Vec2::new(x, y), heading)
    }

    #[test]
    fn test_rotation_wraps() {
        let map = ObstacleMap::open(&GridSpec::default());
        let mut body = body_at(450.0, 450.0, 1.0);
        body.apply(ActuatorCommand::RotateLeft, &map);
        assert!((body.heading() - 358.0).abs() < 1e-4);
    }

    #[test]
    fn test_forward_moves_along_heading() {
        let map = ObstacleMap::open(&GridSpec::default());
        let mut body = body_at(450.0, 450.0, 90.0);
        body.apply(ActuatorCommand::Forward, &map);
        assert!((body.position().x - 456.0).abs() < 1e-3);
        assert!((body.position().y - 450.0).abs() < 1e-3);
    }

    #[test]
    fn test_walls_block_movement() {
        let spec = GridSpec::default();
        let mut map = ObstacleMap::open(&spec);
        map.block(GridCoord::new(5, 4));
        // Hitbox right edge at 498; one more step would cross x = 500
        let mut body = body_at(462.0, 450.0, 90.0);
        body.apply(ActuatorCommand::Forward, &map);
        assert_eq!(body.position(), Vec2::new(462.0, 450.0));
    }

    #[test]
    fn test_fire_cooldown() {
        let map = ObstacleMap::open(&GridSpec::default());
        let mut body = body_at(450.0, 450.0, 0.0);
        assert!(body.apply(ActuatorCommand::Shoot, &map));
        assert!(!body.apply(ActuatorCommand::Shoot, &map));
        for _ in 0..BodyConfig::default().fire_cooldown_ticks {
            body.cool_down();
        }
        assert!(body.apply(ActuatorCommand::Shoot, &map));
        assert_eq!(body.shots_fired(), 2);
    }

    #[test]
    fn test_death_and_respawn() {
        let map = ObstacleMap::open(&GridSpec::default());
        let mut body = body_at(450.0, 450.0, 0.0);
        body.take_damage(5);
        assert!(!body.is_alive());
        assert!(!body.snapshot().alive);
        body.apply(ActuatorCommand::Forward, &map);
        assert_eq!(body.position(), Vec2::new(450.0, 450.0));

        body.respawn(Vec2::new(150.0, 550.0), 90.0);
        assert!(body.is_alive());
        assert_eq!(body.health(), 3);
    }
}
