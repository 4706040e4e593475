//! Per-entity command executor
//!
//! Owns one entity's active intents and turns them into actuator commands
//! once per tick. Engagement, the movement slot and one-shot completion are
//! resolved here; sight checks go through `navigation::visibility` and any
//! planned move is offered to the entity's `ObstacleAvoider` first.

use std::collections::HashSet;
use std::sync::Arc;

use crate::avoidance::ObstacleAvoider;
use crate::command::actuator::ActuatorCommand;
use crate::command::intent::Intent;
use crate::core::config::{ArenaConfig, AvoidanceConfig, ExecutorConfig};
use crate::core::types::{EntitySnapshot, Vec2};
use crate::grid::{GridSpec, Passability};
use crate::navigation::geometry::{angle_error, bearing_to, distance};
use crate::navigation::visibility::{is_in_sight, SightCone, SightGrid};

/// Tick-driven intent state machine for a single entity
///
/// Not synchronized: exactly one driver owns and ticks it.
pub struct CommandExecutor {
    config: ExecutorConfig,
    spec: GridSpec,
    cone: SightCone,
    /// Terrain for sight lines and avoidance; `None` disables both
    grid: Option<Arc<dyn Passability>>,
    avoider: Option<ObstacleAvoider>,
    intents: Vec<Intent>,
    /// 0 heads for `cell_a`, 1 for `cell_b`
    patrol_leg: usize,
    completed: HashSet<usize>,
}

impl CommandExecutor {
    pub fn new(
        config: ExecutorConfig,
        spec: GridSpec,
        grid: Option<Arc<dyn Passability>>,
        avoidance: AvoidanceConfig,
    ) -> Self {
        let avoider = grid
            .as_ref()
            .map(|_| ObstacleAvoider::new(avoidance, spec));
        Self {
            cone: SightCone::from(&config),
            config,
            spec,
            grid,
            avoider,
            intents: Vec::new(),
            patrol_leg: 0,
            completed: HashSet::new(),
        }
    }

    pub fn from_config(config: &ArenaConfig, grid: Option<Arc<dyn Passability>>) -> Self {
        Self::new(
            config.executor.clone(),
            config.grid,
            grid,
            config.avoidance.clone(),
        )
    }

    /// Replace the active intents wholesale
    pub fn set_intents(&mut self, intents: Vec<Intent>) {
        tracing::debug!(count = intents.len(), "new intents: {:?}", intents);
        self.intents = intents;
        self.patrol_leg = 0;
        self.completed.clear();
    }

    pub fn intents(&self) -> &[Intent] {
        &self.intents
    }

    pub fn patrol_leg(&self) -> usize {
        self.patrol_leg
    }

    pub fn is_completed(&self, index: usize) -> bool {
        self.completed.contains(&index)
    }

    pub fn avoider(&self) -> Option<&ObstacleAvoider> {
        self.avoider.as_ref()
    }

    /// Respawn: forget per-round progress and any avoidance commitment
    ///
    /// The intents themselves survive.
    pub fn reset(&mut self) {
        self.patrol_leg = 0;
        self.completed.clear();
        if let Some(avoider) = self.avoider.as_mut() {
            avoider.reset();
        }
    }

    /// Advance one tick and return this tick's actuator commands
    ///
    /// Never empty: with nothing to do the entity is told to STOP. Rotations
    /// always come first in the returned list.
    pub fn tick(&mut self, me: &EntitySnapshot, opponent: &EntitySnapshot) -> Vec<ActuatorCommand> {
        if !me.alive {
            return vec![ActuatorCommand::Stop];
        }

        let terrain = self
            .grid
            .as_deref()
            .map(|grid| SightGrid::new(grid, &self.spec));
        let in_sight = is_in_sight(me, opponent, &self.cone, terrain);
        let engaging = in_sight && self.intents.contains(&Intent::ShootOnSight);

        let mut out = Vec::new();
        let mut has_movement = false;

        for index in 0..self.intents.len() {
            if self.completed.contains(&index) {
                continue;
            }
            let intent = self.intents[index];
            match intent {
                Intent::MoveTo { cell } => {
                    if has_movement || engaging {
                        continue;
                    }
                    has_movement = true;
                    let target = self.spec.cell_center(cell);
                    let (cmds, arrived) = self.navigate_toward(me, target, true);
                    if arrived {
                        tracing::debug!(%cell, "move complete");
                        self.completed.insert(index);
                    }
                    out.extend(cmds);
                }
                Intent::Patrol { cell_a, cell_b } => {
                    if has_movement || engaging {
                        continue;
                    }
                    has_movement = true;
                    let leg = if self.patrol_leg == 0 { cell_a } else { cell_b };
                    let target = self.spec.cell_center(leg);
                    let (cmds, arrived) = self.navigate_toward(me, target, false);
                    if arrived {
                        self.patrol_leg = 1 - self.patrol_leg;
                        tracing::debug!(reached = %leg, "patrol leg flipped");
                    }
                    out.extend(cmds);
                }
                Intent::Guard { cell } => {
                    if has_movement || engaging {
                        continue;
                    }
                    has_movement = true;
                    let post = self.spec.cell_center(cell);
                    if distance(me.position, post) > self.config.guard_radius() {
                        // Returning to post; fire on the way if already lined up
                        let (cmds, _) = self.navigate_toward(me, post, false);
                        out.extend(cmds);
                        if in_sight && self.aim_error(me, opponent).abs() < self.config.fire_threshold {
                            out.push(ActuatorCommand::Shoot);
                        }
                    } else {
                        out.extend(self.hold_post(me, opponent, in_sight));
                    }
                }
                Intent::Face { direction } => {
                    if engaging {
                        continue;
                    }
                    let err = angle_error(direction.bearing(), me.heading);
                    if err.abs() < self.config.face_tolerance {
                        tracing::debug!(%direction, "face complete");
                        self.completed.insert(index);
                    } else {
                        out.push(ActuatorCommand::rotate_toward(err));
                    }
                }
                Intent::ShootOnce => {
                    out.push(ActuatorCommand::Shoot);
                    self.completed.insert(index);
                }
                Intent::ShootOnSight => {
                    if in_sight {
                        out.extend(self.engage(me, opponent));
                    }
                }
            }
        }

        if out.is_empty() {
            out.push(ActuatorCommand::Stop);
        }
        // Stable: relative order within each group is kept
        out.sort_by_key(|cmd| !cmd.is_rotation());
        out
    }

    /// Steer toward a point, deferring to the avoider when the way is blocked
    ///
    /// Once the point is inside the sensor ring with a clear straight line
    /// to it, the avoider is bypassed and released.
    ///
    /// Returns the commands and whether the point has been reached.
    fn navigate_toward(
        &mut self,
        me: &EntitySnapshot,
        target: Vec2,
        stop_on_arrival: bool,
    ) -> (Vec<ActuatorCommand>, bool) {
        if distance(me.position, target) < self.config.arrive_distance {
            let cmds = if stop_on_arrival {
                vec![ActuatorCommand::Stop]
            } else {
                Vec::new()
            };
            return (cmds, true);
        }

        if let (Some(grid), Some(avoider)) = (self.grid.as_deref(), self.avoider.as_mut()) {
            if avoider.reaches(me.position, target, grid) {
                // Final approach: walls past the waypoint are irrelevant
                avoider.reset();
            } else if let Some(steering) =
                avoider.evaluate(me.position, me.heading, grid, Some(target))
            {
                return (steering, false);
            }
        }

        let err = angle_error(bearing_to(me.position, target), me.heading);
        let mut cmds = Vec::with_capacity(2);
        if err.abs() > self.config.aim_threshold {
            cmds.push(ActuatorCommand::rotate_toward(err));
        }
        if err.abs() < self.config.move_angle {
            cmds.push(ActuatorCommand::Forward);
        }
        (cmds, false)
    }

    /// Stationary scan-and-fire at the guard post
    fn hold_post(
        &self,
        me: &EntitySnapshot,
        opponent: &EntitySnapshot,
        in_sight: bool,
    ) -> Vec<ActuatorCommand> {
        if !in_sight {
            return vec![ActuatorCommand::Stop];
        }
        let err = self.aim_error(me, opponent);
        let mut cmds = Vec::new();
        if err.abs() > self.config.aim_threshold {
            cmds.push(ActuatorCommand::rotate_toward(err));
        }
        if err.abs() < self.config.fire_threshold {
            cmds.push(ActuatorCommand::Shoot);
        }
        if cmds.is_empty() {
            cmds.push(ActuatorCommand::Stop);
        }
        cmds
    }

    /// Aim, fire when lined up, and keep creeping forward
    fn engage(&self, me: &EntitySnapshot, opponent: &EntitySnapshot) -> Vec<ActuatorCommand> {
        let err = self.aim_error(me, opponent);
        let mut cmds = Vec::with_capacity(3);
        if err.abs() > self.config.aim_threshold {
            cmds.push(ActuatorCommand::rotate_toward(err));
        }
        if err.abs() < self.config.fire_threshold {
            cmds.push(ActuatorCommand::Shoot);
        }
        cmds.push(ActuatorCommand::Forward);
        cmds
    }

    /// Angular error between the heading and the line from the barrel tip
    /// to the opponent
    fn aim_error(&self, me: &EntitySnapshot, opponent: &EntitySnapshot) -> f32 {
        let offset = self.spec.cell_size * self.config.barrel_offset_factor;
        let barrel = me.position + Vec2::from_heading(me.heading) * offset;
        angle_error(bearing_to(barrel, opponent.position), me.heading)
    }
}
