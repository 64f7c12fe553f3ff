//! World map read model.
//!
//! The game server owns the simulation; the player only receives snapshots of
//! it once per turn. These types answer the questions the client asks of a
//! snapshot (what is at a cell, can an avatar stand there, what does an avatar
//! see) without ever mutating it.

use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::AvatarId;

/// A grid position in the game server's coordinates. `y` grows northwards and
/// either axis may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Location {
    pub x: i32,
    pub y: i32,
}

impl Location {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A displacement between two locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Direction {
    pub x: i32,
    pub y: i32,
}

impl Direction {
    pub const NORTH: Direction = Direction::new(0, 1);
    pub const EAST: Direction = Direction::new(1, 0);
    pub const SOUTH: Direction = Direction::new(0, -1);
    pub const WEST: Direction = Direction::new(-1, 0);

    pub const ALL: [Direction; 4] = [Self::NORTH, Self::EAST, Self::SOUTH, Self::WEST];

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add<Direction> for Location {
    type Output = Location;

    fn add(self, rhs: Direction) -> Location {
        Location::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub<Direction> for Location {
    type Output = Location;

    fn sub(self, rhs: Direction) -> Location {
        Location::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PickupKind {
    Health,
    Invulnerability,
    Damage,
}

/// One square of the map as seen in a snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub location: Location,
    /// Obstacles are not habitable.
    pub habitable: bool,
    pub generates_score: bool,
    pub avatar: Option<AvatarId>,
    pub pickup: Option<PickupKind>,
}

impl Cell {
    /// An empty, habitable cell.
    pub fn open(location: Location) -> Self {
        Self {
            location,
            habitable: true,
            generates_score: false,
            avatar: None,
            pickup: None,
        }
    }

    pub fn obstacle(location: Location) -> Self {
        Self {
            habitable: false,
            ..Self::open(location)
        }
    }

    pub fn score(location: Location) -> Self {
        Self {
            generates_score: true,
            ..Self::open(location)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvatarView {
    pub id: AvatarId,
    pub location: Location,
    pub health: i32,
    pub score: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Placed {
    location: Location,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PickupData {
    location: Location,
    #[serde(rename = "type")]
    kind: PickupKind,
}

fn one() -> u32 {
    1
}

fn wall() -> String {
    "wall".to_string()
}

fn north() -> String {
    "north".to_string()
}

/// An obstacle covering `width` x `height` cells, extending east and north
/// from `location`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ObstacleData {
    location: Location,
    #[serde(default = "one")]
    width: u32,
    #[serde(default = "one")]
    height: u32,
    #[serde(rename = "type", default = "wall")]
    kind: String,
    #[serde(default = "north")]
    orientation: String,
}

/// Wire shape of the game state pushed by the game server.
///
/// Only the corners are required. Feeds without a `turn` counter report
/// turn 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GameStateData {
    #[serde(default)]
    turn: u64,
    #[serde(default)]
    era: String,
    south_west_corner: Location,
    north_east_corner: Location,
    #[serde(default)]
    players: Vec<AvatarView>,
    #[serde(default)]
    score_locations: Vec<Placed>,
    #[serde(default)]
    pickups: Vec<PickupData>,
    #[serde(default)]
    obstacles: Vec<ObstacleData>,
}

/// The state of the world at the end of one turn.
///
/// The map is the rectangle from `south_west` spanning `width` x `height`.
/// Cells are stored row by row from the south-west corner
/// (`index = (y - south_west.y) * width + (x - south_west.x)`) and every
/// cell's `location` agrees with its index; the constructors reject anything
/// else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GameStateData", into = "GameStateData")]
pub struct WorldSnapshot {
    turn: u64,
    era: String,
    south_west: Location,
    width: u32,
    height: u32,
    cells: Vec<Cell>,
    avatars: Vec<AvatarView>,
}

impl WorldSnapshot {
    /// Largest map accepted from the wire.
    pub const MAX_CELLS: usize = 1 << 20;

    /// A snapshot whose south-west corner is `(0, 0)`.
    pub fn new(
        turn: u64,
        width: u32,
        height: u32,
        cells: Vec<Cell>,
        avatars: Vec<AvatarView>,
    ) -> Result<Self, DomainError> {
        Self::new_at(turn, Location::default(), width, height, cells, avatars)
    }

    pub fn new_at(
        turn: u64,
        south_west: Location,
        width: u32,
        height: u32,
        cells: Vec<Cell>,
        avatars: Vec<AvatarView>,
    ) -> Result<Self, DomainError> {
        check_extent(south_west, width, height)?;
        let expected = width as usize * height as usize;
        if cells.len() != expected {
            return Err(DomainError::validation(format!(
                "expected {expected} cells for a {width}x{height} world, got {}",
                cells.len()
            )));
        }
        for (index, cell) in cells.iter().enumerate() {
            let at = location_at(south_west, width, index);
            if cell.location != at {
                return Err(DomainError::validation(format!(
                    "cell at index {index} reports location ({}, {}), expected ({}, {})",
                    cell.location.x, cell.location.y, at.x, at.y
                )));
            }
        }
        Ok(Self {
            turn,
            era: String::new(),
            south_west,
            width,
            height,
            cells,
            avatars,
        })
    }

    /// Build a snapshot with its south-west corner at `(0, 0)` from a
    /// generator called once per location, row by row.
    pub fn from_fn(
        turn: u64,
        width: u32,
        height: u32,
        cell: impl FnMut(Location) -> Cell,
    ) -> Result<Self, DomainError> {
        Self::from_fn_at(turn, Location::default(), width, height, cell)
    }

    pub fn from_fn_at(
        turn: u64,
        south_west: Location,
        width: u32,
        height: u32,
        cell: impl FnMut(Location) -> Cell,
    ) -> Result<Self, DomainError> {
        check_extent(south_west, width, height)?;
        let cells = (0..width as usize * height as usize)
            .map(|index| location_at(south_west, width, index))
            .map(cell)
            .collect();
        Self::new_at(turn, south_west, width, height, cells, Vec::new())
    }

    pub fn with_avatars(mut self, avatars: Vec<AvatarView>) -> Self {
        self.avatars = avatars;
        self
    }

    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// Art set the server asked the client to draw with.
    pub fn era(&self) -> &str {
        &self.era
    }

    pub fn south_west(&self) -> Location {
        self.south_west
    }

    pub fn north_east(&self) -> Location {
        // In range: check_extent guarantees the far corner fits in i32.
        Location::new(
            self.south_west.x + (self.width - 1) as i32,
            self.south_west.y + (self.height - 1) as i32,
        )
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn avatars(&self) -> &[AvatarView] {
        &self.avatars
    }

    pub fn avatar(&self, id: AvatarId) -> Option<&AvatarView> {
        self.avatars.iter().find(|avatar| avatar.id == id)
    }

    fn index_of(&self, x: i64, y: i64) -> Option<usize> {
        let dx = x - i64::from(self.south_west.x);
        let dy = y - i64::from(self.south_west.y);
        if (0..i64::from(self.width)).contains(&dx) && (0..i64::from(self.height)).contains(&dy) {
            usize::try_from(dy * i64::from(self.width) + dx).ok()
        } else {
            None
        }
    }

    pub fn is_on_map(&self, location: Location) -> bool {
        self.index_of(location.x.into(), location.y.into()).is_some()
    }

    pub fn cell(&self, location: Location) -> Option<&Cell> {
        self.index_of(location.x.into(), location.y.into())
            .and_then(|index| self.cells.get(index))
    }

    pub fn can_move_to(&self, location: Location) -> bool {
        self.cell(location).is_some_and(|cell| cell.habitable)
    }

    /// Cells a new avatar could appear on: habitable, not a score square and
    /// not already occupied.
    pub fn spawn_candidates(&self) -> impl Iterator<Item = &Cell> {
        self.cells
            .iter()
            .filter(|cell| cell.habitable && !cell.generates_score && cell.avatar.is_none())
    }

    /// Cells within `distance` of `centre` on both axes, row by row from the
    /// south, cropped to the map edge. Empty when the square lies entirely
    /// off the map; any distance reaching past every edge yields the whole
    /// map.
    pub fn view_centred_at(&self, centre: Location, distance: u32) -> Vec<&Cell> {
        let distance = i64::from(distance);
        let (min_x, min_y) = (i64::from(self.south_west.x), i64::from(self.south_west.y));

        let col_start = (i64::from(centre.x) - distance).max(min_x);
        let col_end = (i64::from(centre.x) + distance + 1).min(min_x + i64::from(self.width));
        let row_start = (i64::from(centre.y) - distance).max(min_y);
        let row_end = (i64::from(centre.y) + distance + 1).min(min_y + i64::from(self.height));

        (row_start..row_end)
            .flat_map(|y| (col_start..col_end).map(move |x| (x, y)))
            .filter_map(|(x, y)| self.index_of(x, y))
            .filter_map(|index| self.cells.get(index))
            .collect()
    }
}

/// The map must be non-empty and its north-east corner representable.
fn check_extent(south_west: Location, width: u32, height: u32) -> Result<(), DomainError> {
    if width == 0 || height == 0 {
        return Err(DomainError::validation(format!(
            "world must have at least one cell, got {width}x{height}"
        )));
    }
    if width > i32::MAX as u32 || height > i32::MAX as u32 {
        return Err(DomainError::validation(format!(
            "a {width}x{height} world is too large"
        )));
    }
    let far_x = i64::from(south_west.x) + i64::from(width) - 1;
    let far_y = i64::from(south_west.y) + i64::from(height) - 1;
    if far_x > i64::from(i32::MAX) || far_y > i64::from(i32::MAX) {
        return Err(DomainError::validation(format!(
            "a {width}x{height} world from ({}, {}) leaves the coordinate range",
            south_west.x, south_west.y
        )));
    }
    Ok(())
}

/// Location of the cell stored at `index`. Callers have checked the extent.
fn location_at(south_west: Location, width: u32, index: usize) -> Location {
    let width = width as usize;
    Location::new(
        south_west.x + (index % width) as i32,
        south_west.y + (index / width) as i32,
    )
}

impl TryFrom<GameStateData> for WorldSnapshot {
    type Error = DomainError;

    fn try_from(data: GameStateData) -> Result<Self, Self::Error> {
        let (sw, ne) = (data.south_west_corner, data.north_east_corner);
        if ne.x < sw.x || ne.y < sw.y {
            return Err(DomainError::validation(format!(
                "north-east corner ({}, {}) lies south or west of south-west corner ({}, {})",
                ne.x, ne.y, sw.x, sw.y
            )));
        }
        let width = i64::from(ne.x) - i64::from(sw.x) + 1;
        let height = i64::from(ne.y) - i64::from(sw.y) + 1;
        if width.saturating_mul(height) > Self::MAX_CELLS as i64 {
            return Err(DomainError::validation(format!(
                "a {width}x{height} world exceeds {} cells",
                Self::MAX_CELLS
            )));
        }
        // Both fit: the product is at most MAX_CELLS.
        let (width, height) = (width as u32, height as u32);

        let mut world = Self::from_fn_at(data.turn, sw, width, height, Cell::open)?;
        world.era = data.era;

        for placed in &data.score_locations {
            world.cell_mut(placed.location, "score location")?.generates_score = true;
        }
        for pickup in &data.pickups {
            world.cell_mut(pickup.location, "pickup")?.pickup = Some(pickup.kind);
        }
        for obstacle in &data.obstacles {
            let origin = obstacle.location;
            for dy in 0..i64::from(obstacle.height) {
                for dx in 0..i64::from(obstacle.width) {
                    let index = world
                        .index_of(i64::from(origin.x) + dx, i64::from(origin.y) + dy)
                        .ok_or_else(|| off_map("obstacle", origin))?;
                    world.cells[index].habitable = false;
                }
            }
        }
        for player in &data.players {
            world.cell_mut(player.location, "player")?.avatar = Some(player.id);
        }
        world.avatars = data.players;
        Ok(world)
    }
}

fn off_map(what: &str, location: Location) -> DomainError {
    DomainError::validation(format!(
        "{what} at ({}, {}) lies outside the map",
        location.x, location.y
    ))
}

impl WorldSnapshot {
    fn cell_mut(&mut self, location: Location, what: &str) -> Result<&mut Cell, DomainError> {
        self.index_of(location.x.into(), location.y.into())
            .and_then(|index| self.cells.get_mut(index))
            .ok_or_else(|| off_map(what, location))
    }
}

impl From<WorldSnapshot> for GameStateData {
    fn from(world: WorldSnapshot) -> Self {
        let north_east_corner = world.north_east();
        let score_locations = world
            .cells
            .iter()
            .filter(|cell| cell.generates_score)
            .map(|cell| Placed {
                location: cell.location,
            })
            .collect();
        let pickups = world
            .cells
            .iter()
            .filter_map(|cell| {
                cell.pickup.map(|kind| PickupData {
                    location: cell.location,
                    kind,
                })
            })
            .collect();
        let obstacles = world
            .cells
            .iter()
            .filter(|cell| !cell.habitable)
            .map(|cell| ObstacleData {
                location: cell.location,
                width: 1,
                height: 1,
                kind: wall(),
                orientation: north(),
            })
            .collect();

        Self {
            turn: world.turn,
            era: world.era,
            south_west_corner: world.south_west,
            north_east_corner,
            score_locations,
            pickups,
            obstacles,
            players: world.avatars,
        }
    }
}
