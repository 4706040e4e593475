//! Field-of-view and line-of-sight checks
//!
//! One geometric truth shared by targeting (the executor decides whether to
//! engage) and by anything else that needs to know if a target can be seen.

use serde::{Deserialize, Serialize};

use crate::core::config::ExecutorConfig;
use crate::core::types::{EntitySnapshot, Vec2};
use crate::grid::{GridSpec, Passability};
use crate::navigation::geometry::{angle_error, bearing_to, distance};

/// Angular window and reach of an entity's sight
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SightCone {
    /// Total cone angle in degrees; the target must be within +/- half
    pub fov_degrees: f32,
    /// Maximum detection distance in pixels
    pub max_range: f32,
}

impl Default for SightCone {
    fn default() -> Self {
        Self {
            fov_degrees: 120.0,
            max_range: 800.0,
        }
    }
}

impl From<&ExecutorConfig> for SightCone {
    fn from(config: &ExecutorConfig) -> Self {
        Self {
            fov_degrees: config.fov_degrees,
            max_range: config.max_range,
        }
    }
}

/// Terrain used to occlude sight lines
#[derive(Clone, Copy)]
pub struct SightGrid<'a> {
    pub grid: &'a dyn Passability,
    pub spec: &'a GridSpec,
}

impl<'a> SightGrid<'a> {
    pub fn new(grid: &'a dyn Passability, spec: &'a GridSpec) -> Self {
        Self { grid, spec }
    }
}

/// Cells crossed by the segment between two cells, endpoints included
///
/// Integer error accumulation (Bresenham), so no cell is skipped or
/// visited twice.
pub fn grid_line(from: (i32, i32), to: (i32, i32)) -> Vec<(i32, i32)> {
    let (c2, r2) = to;
    let dc = (c2 - from.0).abs();
    let dr = (r2 - from.1).abs();
    let step_c = if c2 >= from.0 { 1 } else { -1 };
    let step_r = if r2 >= from.1 { 1 } else { -1 };

    let mut cells = Vec::with_capacity((dc.max(dr) + 1) as usize);
    let mut error = dc - dr;
    let (mut c, mut r) = from;
    loop {
        cells.push((c, r));
        if c == c2 && r == r2 {
            break;
        }
        let e2 = 2 * error;
        if e2 > -dr {
            error -= dr;
            c += step_c;
        }
        if e2 < dc {
            error += dc;
            r += step_r;
        }
    }
    cells
}

/// Is the straight line between two pixel positions free of blocking cells?
///
/// The origin cell (the viewer's own) is never tested. The walk stops, clear,
/// at the first cell outside the grid.
pub fn has_clear_los(from: Vec2, to: Vec2, terrain: SightGrid<'_>) -> bool {
    let start = terrain.spec.cell_index(from.x, from.y);
    let end = terrain.spec.cell_index(to.x, to.y);

    for (c, r) in grid_line(start, end).into_iter().skip(1) {
        if !terrain.grid.in_bounds(c, r) {
            break;
        }
        if !terrain.grid.is_passable(c, r) {
            return false;
        }
    }
    true
}

/// Can `viewer` see `target`?
///
/// Requires the target to be alive, within range, strictly inside the FOV
/// cone around the viewer's heading and, when terrain is given, unoccluded.
pub fn is_in_sight(
    viewer: &EntitySnapshot,
    target: &EntitySnapshot,
    cone: &SightCone,
    terrain: Option<SightGrid<'_>>,
) -> bool {
    if !target.alive {
        return false;
    }
    if distance(viewer.position, target.position) > cone.max_range {
        return false;
    }
    let desired = bearing_to(viewer.position, target.position);
    if angle_error(desired, viewer.heading).abs() >= cone.fov_degrees / 2.0 {
        return false;
    }
    match terrain {
        Some(terrain) => has_clear_los(viewer.position, target.position, terrain),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{GridCoord, ObstacleMap};

    fn at_cell(spec: &GridSpec, cell: &str, heading: f32) -> EntitySnapshot {
        let center = spec.cell_center(cell.parse().unwrap());
        EntitySnapshot::new(center.x, center.y, heading)
    }

    #[test]
    fn test_grid_line_has_no_gaps_or_repeats() {
        let line = grid_line((0, 0), (7, 3));
        assert_eq!(line.first(), Some(&(0, 0)));
        assert_eq!(line.last(), Some(&(7, 3)));
        for pair in line.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert_ne!(a, b);
            assert!((a.0 - b.0).abs() <= 1 && (a.1 - b.1).abs() <= 1);
        }
    }

    #[test]
    fn test_grid_line_single_cell() {
        assert_eq!(grid_line((4, 4), (4, 4)), vec![(4, 4)]);
    }

    #[test]
    fn test_target_ahead_is_visible() {
        let spec = GridSpec::default();
        let me = at_cell(&spec, "E5", 90.0);
        let enemy = at_cell(&spec, "H5", 0.0);
        assert!(is_in_sight(&me, &enemy, &SightCone::default(), None));
    }

    #[test]
    fn test_target_behind_is_not_visible() {
        let spec = GridSpec::default();
        let me = at_cell(&spec, "E5", 270.0);
        let enemy = at_cell(&spec, "H5", 0.0);
        assert!(!is_in_sight(&me, &enemy, &SightCone::default(), None));
    }

    #[test]
    fn test_dead_or_distant_target_is_not_visible() {
        let spec = GridSpec::default();
        let me = at_cell(&spec, "A5", 90.0);
        let mut enemy = at_cell(&spec, "C5", 0.0);
        enemy.alive = false;
        assert!(!is_in_sight(&me, &enemy, &SightCone::default(), None));

        let far = at_cell(&spec, "R5", 0.0);
        assert!(!is_in_sight(&me, &far, &SightCone::default(), None));
    }

    #[test]
    fn test_obstacle_blocks_line_of_sight() {
        let spec = GridSpec::default();
        let mut map = ObstacleMap::open(&spec);
        map.block(GridCoord::new(5, 4)); // F5, between E5 and H5

        let me = at_cell(&spec, "E5", 90.0);
        let enemy = at_cell(&spec, "H5", 0.0);
        let terrain = SightGrid::new(&map, &spec);
        assert!(!is_in_sight(&me, &enemy, &SightCone::default(), Some(terrain)));

        let clear = ObstacleMap::open(&spec);
        assert!(is_in_sight(
            &me,
            &enemy,
            &SightCone::default(),
            Some(SightGrid::new(&clear, &spec))
        ));
    }

    #[test]
    fn test_own_cell_never_blocks() {
        let spec = GridSpec::default();
        let mut map = ObstacleMap::open(&spec);
        map.block(GridCoord::new(4, 4)); // E5, the viewer's own cell
        let from = spec.cell_center(GridCoord::new(4, 4));
        let to = spec.cell_center(GridCoord::new(7, 4));
        assert!(has_clear_los(from, to, SightGrid::new(&map, &spec)));
    }
}
