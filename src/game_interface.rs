use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coordinates are signed so that neighbours falling off the map can still be
/// represented (and rejected) without wrapping around.
pub type Number = i32;

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub struct Position {
    pub row: Number,
    pub col: Number,
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum Tile {
    Path,
    Sand,
    Mountain,
    Wall,
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Medkit,
    Skeleton,
    Boss,
    /// Anything the game reports that we don't know how to interpret.
    #[serde(other)]
    Other,
}

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone, Copy)]
pub struct MapObject {
    pub label: ObjectKind,
    /// Strength gained (or lost, when negative) when the object is touched.
    pub delta: Number,
}

/// Objects discovered so far, keyed by where they sit on the map.
pub type MapObjects = FxHashMap<Position, MapObject>;

#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Hash, Clone, Copy)]
pub enum Direction {
    N,
    S,
    E,
    W,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MapError {
    #[error("The map has no tiles")]
    Empty,
    #[error("Row {row} has {found} tiles, expected {expected}")]
    Ragged { row: usize, expected: usize, found: usize },
    #[error("Unknown tile {symbol:?} at row {row}, column {col}")]
    UnknownTile { row: usize, col: usize, symbol: char },
}

/// Terrain of the whole map, stored row-major. On the wire this is a list of
/// strings, one character per tile (see `Tile::symbol`).
#[derive(Deserialize, Serialize, Debug, PartialEq, Eq, Clone)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct GameMap {
    pub height: Number,
    pub width: Number,
    pub(crate) tiles: Vec<Tile>,
}
