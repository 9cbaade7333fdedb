use courier_core::geometry::{Aabb, Face, GravityDir};
use serde::{Deserialize, Serialize};

/// Tile size in world pixels.
pub const TILE_SIZE: f32 = 32.0;

/// Tile archetypes as they arrive from the level loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileKind {
    /// Solid from every approach direction.
    Solid,
    /// One-way platform: stops a downward faller, passable from below.
    Platform,
    /// Breakable from any side.
    BreakableCrate,
    /// Breakable only through its charged face.
    ChargedPanel,
}

/// One grid cell with gravity-aware solidity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub kind: TileKind,
    pub col: u32,
    pub row: u32,
    /// Blocks an actor "falling" onto it from below (inverted gravity).
    pub solid_from_above: bool,
    /// Blocks an actor falling onto it from above (normal gravity).
    pub solid_from_below: bool,
    pub breakable: bool,
    /// The only side a breakable tile may be destroyed from, if restricted.
    pub charged_face: Option<Face>,
    pub broken: bool,
}

impl Tile {
    pub fn new(kind: TileKind, col: u32, row: u32) -> Self {
        let (solid_from_above, solid_from_below) = match kind {
            // A platform only stops actors pressing on its top face.
            TileKind::Platform => (false, true),
            _ => (true, true),
        };
        Self {
            kind,
            col,
            row,
            solid_from_above,
            solid_from_below,
            breakable: matches!(kind, TileKind::BreakableCrate | TileKind::ChargedPanel),
            charged_face: None,
            broken: false,
        }
    }

    pub fn with_charged_face(mut self, face: Face) -> Self {
        self.charged_face = Some(face);
        self
    }

    /// World-space box of this cell.
    pub fn aabb(&self) -> Aabb {
        Aabb::new(
            self.col as f32 * TILE_SIZE,
            self.row as f32 * TILE_SIZE,
            TILE_SIZE,
            TILE_SIZE,
        )
    }

    /// Whether the tile blocks an actor falling in direction `dir`.
    ///
    /// Under normal gravity the actor presses on the tile's top face, so the
    /// face that must hold is `solid_from_below`; inverted gravity checks
    /// the complement. A broken tile is never solid.
    pub fn is_solid_for_gravity(&self, dir: GravityDir) -> bool {
        if self.broken {
            return false;
        }
        match dir {
            GravityDir::Down => self.solid_from_below,
            GravityDir::Up => self.solid_from_above,
        }
    }

    /// Whether a hit from `side` is allowed to break this tile.
    pub fn can_break_from(&self, side: Face) -> bool {
        if !self.breakable || self.broken {
            return false;
        }
        match self.charged_face {
            None => true,
            Some(face) => face == side,
        }
    }

    /// One-way break: clears both solidity faces for the rest of the session.
    pub fn break_tile(&mut self) {
        self.broken = true;
        self.solid_from_above = false;
        self.solid_from_below = false;
    }
}

/// The finished tile grid handed over by the level loader, plus world
/// dimensions and the spawn point. Cells without a tile are `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TileMap {
    /// Width in tiles.
    pub width: u32,
    /// Height in tiles.
    pub height: u32,
    /// Tile data stored row-major (row * width + col).
    pub tiles: Vec<Option<Tile>>,
    /// Spawn position in world pixels.
    pub spawn_x: f32,
    pub spawn_y: f32,
}

impl TileMap {
    /// An all-empty map.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            tiles: vec![None; (width * height) as usize],
            spawn_x: TILE_SIZE,
            spawn_y: TILE_SIZE,
        }
    }

    pub fn world_width(&self) -> f32 {
        self.width as f32 * TILE_SIZE
    }

    pub fn world_height(&self) -> f32 {
        self.height as f32 * TILE_SIZE
    }

    /// Tile at grid coordinates; out of range is simply "no tile".
    pub fn get(&self, col: i32, row: i32) -> Option<&Tile> {
        if col < 0 || row < 0 || col >= self.width as i32 || row >= self.height as i32 {
            return None;
        }
        self.tiles[row as usize * self.width as usize + col as usize].as_ref()
    }

    pub fn get_mut(&mut self, col: i32, row: i32) -> Option<&mut Tile> {
        if col < 0 || row < 0 || col >= self.width as i32 || row >= self.height as i32 {
            return None;
        }
        self.tiles[row as usize * self.width as usize + col as usize].as_mut()
    }

    pub fn set(&mut self, col: u32, row: u32, kind: TileKind) {
        if col < self.width && row < self.height {
            self.tiles[row as usize * self.width as usize + col as usize] =
                Some(Tile::new(kind, col, row));
        }
    }

    pub fn set_tile(&mut self, tile: Tile) {
        if tile.col < self.width && tile.row < self.height {
            self.tiles[tile.row as usize * self.width as usize + tile.col as usize] = Some(tile);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_tile_blocks_both_gravities() {
        let tile = Tile::new(TileKind::Solid, 0, 0);
        assert!(tile.is_solid_for_gravity(GravityDir::Down));
        assert!(tile.is_solid_for_gravity(GravityDir::Up));
    }

    #[test]
    fn platform_blocks_only_downward_fallers() {
        let tile = Tile::new(TileKind::Platform, 0, 0);
        assert!(tile.is_solid_for_gravity(GravityDir::Down));
        assert!(!tile.is_solid_for_gravity(GravityDir::Up));
    }

    #[test]
    fn broken_tile_is_never_solid() {
        let mut tile = Tile::new(TileKind::Solid, 0, 0);
        tile.break_tile();
        assert!(!tile.is_solid_for_gravity(GravityDir::Down));
        assert!(!tile.is_solid_for_gravity(GravityDir::Up));
    }

    #[test]
    fn crate_breaks_from_any_side() {
        let tile = Tile::new(TileKind::BreakableCrate, 0, 0);
        for side in [Face::Up, Face::Down, Face::Left, Face::Right] {
            assert!(tile.can_break_from(side));
        }
    }

    #[test]
    fn charged_panel_breaks_only_through_its_face() {
        let tile = Tile::new(TileKind::ChargedPanel, 0, 0).with_charged_face(Face::Up);
        assert!(tile.can_break_from(Face::Up));
        assert!(!tile.can_break_from(Face::Left));
        assert!(!tile.can_break_from(Face::Down));
    }

    #[test]
    fn broken_tile_cannot_break_again() {
        let mut tile = Tile::new(TileKind::BreakableCrate, 0, 0);
        tile.break_tile();
        assert!(!tile.can_break_from(Face::Up));
    }

    #[test]
    fn unbreakable_tile_refuses_break_query() {
        let tile = Tile::new(TileKind::Solid, 0, 0);
        assert!(!tile.can_break_from(Face::Up));
    }

    #[test]
    fn tile_aabb_follows_grid() {
        let tile = Tile::new(TileKind::Solid, 3, 2);
        let b = tile.aabb();
        assert_eq!(b.x, 3.0 * TILE_SIZE);
        assert_eq!(b.y, 2.0 * TILE_SIZE);
        assert_eq!(b.w, TILE_SIZE);
        assert_eq!(b.h, TILE_SIZE);
    }

    #[test]
    fn map_lookups_out_of_range_return_none() {
        let map = TileMap::empty(4, 4);
        assert!(map.get(-1, 0).is_none());
        assert!(map.get(0, -1).is_none());
        assert!(map.get(4, 0).is_none());
        assert!(map.get(0, 4).is_none());
    }

    #[test]
    fn map_set_and_get_roundtrip() {
        let mut map = TileMap::empty(4, 4);
        map.set(2, 1, TileKind::Solid);
        let tile = map.get(2, 1).expect("tile was set");
        assert_eq!(tile.kind, TileKind::Solid);
        assert_eq!((tile.col, tile.row), (2, 1));
        assert!(map.get(1, 2).is_none());
    }
}
