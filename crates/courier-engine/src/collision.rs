use courier_core::geometry::{Aabb, Face, GravityDir};
use serde::{Deserialize, Serialize};

use crate::tile::{TILE_SIZE, Tile, TileMap};

/// Tile-grid collision queries. Owns the grid; stateless between queries
/// apart from the rare one-way tile break.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollisionSystem {
    map: TileMap,
}

impl CollisionSystem {
    pub fn new(map: TileMap) -> Self {
        Self { map }
    }

    pub fn map(&self) -> &TileMap {
        &self.map
    }

    pub fn world_width(&self) -> f32 {
        self.map.world_width()
    }

    pub fn world_height(&self) -> f32 {
        self.map.world_height()
    }

    /// Boxes of all tiles that are solid for `gravity` and intersect `rect`.
    ///
    /// Scans only the grid cells the rect's bounding range spans, so the
    /// cost is proportional to the overlapped cells, not the grid.
    pub fn overlaps(&self, rect: &Aabb, gravity: GravityDir) -> Vec<Aabb> {
        let mut hits = Vec::new();
        let min_col = (rect.left() / TILE_SIZE).floor() as i32;
        let max_col = (rect.right() / TILE_SIZE).ceil() as i32;
        let min_row = (rect.top() / TILE_SIZE).floor() as i32;
        let max_row = (rect.bottom() / TILE_SIZE).ceil() as i32;

        for row in min_row..max_row {
            for col in min_col..max_col {
                let Some(tile) = self.map.get(col, row) else {
                    continue;
                };
                if !tile.is_solid_for_gravity(gravity) {
                    continue;
                }
                let tile_box = tile.aabb();
                if rect.intersects(&tile_box) {
                    hits.push(tile_box);
                }
            }
        }
        hits
    }

    /// Tile at a world position, if any.
    pub fn tile_at(&self, x: f32, y: f32) -> Option<&Tile> {
        let col = (x / TILE_SIZE).floor() as i32;
        let row = (y / TILE_SIZE).floor() as i32;
        self.map.get(col, row)
    }

    /// Tile by grid coordinates, if any.
    pub fn tile_at_grid(&self, col: i32, row: i32) -> Option<&Tile> {
        self.map.get(col, row)
    }

    /// Break the tile under a world position when hit from `side`.
    ///
    /// Succeeds iff the tile exists, is breakable, not already broken, and
    /// its charged face (if any) matches `side`. Spawning loot is the
    /// caller's job.
    pub fn break_tile_at(&mut self, x: f32, y: f32, side: Face) -> bool {
        let col = (x / TILE_SIZE).floor() as i32;
        let row = (y / TILE_SIZE).floor() as i32;
        match self.map.get_mut(col, row) {
            Some(tile) if tile.can_break_from(side) => {
                tile.break_tile();
                tracing::debug!(col, row, ?side, "tile broken");
                true
            },
            _ => false,
        }
    }

    /// Break whatever breakable tile `rect` is ramming into, probing just
    /// past the leading edge along the dominant velocity axis.
    pub fn break_on_contact(&mut self, rect: &Aabb, vel_x: f32, vel_y: f32) -> bool {
        let (side, probe_x, probe_y) = if vel_x.abs() > vel_y.abs() {
            if vel_x > 0.0 {
                (Face::Right, rect.right() + 1.0, rect.center_y())
            } else {
                (Face::Left, rect.left() - 1.0, rect.center_y())
            }
        } else if vel_y > 0.0 {
            (Face::Down, rect.center_x(), rect.bottom() + 1.0)
        } else {
            (Face::Up, rect.center_x(), rect.top() - 1.0)
        };
        self.break_tile_at(probe_x, probe_y, side)
    }
}

/// Result of resolving the vertical axis against a set of tile boxes.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerticalHit {
    /// Hit a floor-type face while moving the way gravity pulls.
    pub landed: bool,
    /// Hit a ceiling-type face faster than the bump threshold.
    pub bumped: bool,
}

/// Push `rect` out of each overlapping tile along the horizontal movement
/// direction and zero the horizontal velocity.
pub fn resolve_horizontal(rect: &mut Aabb, vel_x: &mut f32, hits: &[Aabb]) {
    for tile_box in hits {
        if *vel_x > 0.0 {
            rect.x = tile_box.left() - rect.w;
        } else if *vel_x < 0.0 {
            rect.x = tile_box.right();
        }
        *vel_x = 0.0;
    }
}

/// Push `rect` out of each overlapping tile along the vertical movement
/// direction, zero the vertical velocity, and classify the contact
/// relative to `gravity`: landing when moving with gravity into a floor
/// face, bump when moving against it into a ceiling face faster than
/// `bump_speed`.
pub fn resolve_vertical(
    rect: &mut Aabb,
    vel_y: &mut f32,
    gravity: GravityDir,
    bump_speed: f32,
    hits: &[Aabb],
) -> VerticalHit {
    let mut outcome = VerticalHit::default();
    for tile_box in hits {
        match gravity {
            GravityDir::Down => {
                if *vel_y > 0.0 {
                    rect.y = tile_box.top() - rect.h;
                    *vel_y = 0.0;
                    outcome.landed = true;
                } else if *vel_y < 0.0 {
                    if vel_y.abs() > bump_speed {
                        outcome.bumped = true;
                    }
                    rect.y = tile_box.bottom();
                    *vel_y = 0.0;
                }
            },
            GravityDir::Up => {
                if *vel_y < 0.0 {
                    rect.y = tile_box.bottom();
                    *vel_y = 0.0;
                    outcome.landed = true;
                } else if *vel_y > 0.0 {
                    if vel_y.abs() > bump_speed {
                        outcome.bumped = true;
                    }
                    rect.y = tile_box.top() - rect.h;
                    *vel_y = 0.0;
                }
            },
        }
    }
    outcome
}
