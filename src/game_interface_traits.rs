// Behaviour of the plain types in game_interface, kept apart from the
// wire definitions.

use rand::Rng;
use std::fmt;

use crate::game_interface::{
    Direction, GameMap, MapError, MapObjects, Number, ObjectKind, Position, Tile,
};

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::N, Direction::S, Direction::E, Direction::W];

    /// (row, col) displacement of a single step.
    pub fn offset(&self) -> (Number, Number) {
        match self {
            Direction::N => (-1, 0),
            Direction::S => (1, 0),
            Direction::E => (0, 1),
            Direction::W => (0, -1),
        }
    }

    /// The two directions perpendicular to this one.
    pub fn flanks(&self) -> [Direction; 2] {
        match self {
            Direction::N | Direction::S => [Direction::W, Direction::E],
            Direction::E | Direction::W => [Direction::N, Direction::S],
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Direction::N => 'N',
            Direction::S => 'S',
            Direction::E => 'E',
            Direction::W => 'W',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Direction> {
        Direction::ALL.into_iter().find(|direction| direction.symbol() == symbol)
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Direction {
        Direction::ALL[rng.gen_range(0..Direction::ALL.len())]
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::N => "NORTH",
            Direction::S => "SOUTH",
            Direction::E => "EAST",
            Direction::W => "WEST",
        };
        f.write_str(name)
    }
}

impl Position {
    pub fn new(row: Number, col: Number) -> Self {
        Position { row, col }
    }

    pub fn step(&self, direction: Direction) -> Position {
        let (d_row, d_col) = direction.offset();
        Position { row: self.row + d_row, col: self.col + d_col }
    }

    pub fn manhattan(&self, other: &Position) -> Number {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }
}

impl Tile {
    /// Strength spent to step on the tile, None when it can't be entered.
    pub fn cost(&self) -> Option<Number> {
        match self {
            Tile::Path => Some(1),
            Tile::Sand => Some(3),
            Tile::Mountain => Some(10),
            Tile::Wall => None,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Tile::Path => '.',
            Tile::Sand => ':',
            Tile::Mountain => '^',
            Tile::Wall => '#',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Tile> {
        [Tile::Path, Tile::Sand, Tile::Mountain, Tile::Wall]
            .into_iter()
            .find(|tile| tile.symbol() == symbol)
    }
}

impl ObjectKind {
    /// Only these kinds carry a delta the navigator trusts.
    pub fn is_known(&self) -> bool {
        !matches!(self, ObjectKind::Other)
    }

    pub fn symbol(&self) -> char {
        match self {
            ObjectKind::Medkit => '+',
            ObjectKind::Skeleton => 's',
            ObjectKind::Boss => 'B',
            ObjectKind::Other => '?',
        }
    }
}

impl GameMap {
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<GameMap, MapError> {
        let width = rows.first().map_or(0, |row| row.as_ref().chars().count());
        if width == 0 {
            return Err(MapError::Empty);
        }
        let mut tiles = Vec::with_capacity(width * rows.len());
        for (r, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let found = row.chars().count();
            if found != width {
                return Err(MapError::Ragged { row: r, expected: width, found });
            }
            for (c, symbol) in row.chars().enumerate() {
                let tile = Tile::from_symbol(symbol)
                    .ok_or(MapError::UnknownTile { row: r, col: c, symbol })?;
                tiles.push(tile);
            }
        }
        Ok(GameMap {
            height: rows.len() as Number,
            width: width as Number,
            tiles,
        })
    }

    pub fn contains(&self, pos: &Position) -> bool {
        pos.row >= 0 && pos.row < self.height && pos.col >= 0 && pos.col < self.width
    }

    /// Tile at `pos`, None when off the map.
    pub fn tile(&self, pos: Position) -> Option<Tile> {
        if self.contains(&pos) {
            Some(self.tiles[(pos.row * self.width + pos.col) as usize])
        } else {
            None
        }
    }

    pub fn rows(&self) -> Vec<String> {
        self.tiles
            .chunks(self.width as usize)
            .map(|row| row.iter().map(Tile::symbol).collect())
            .collect()
    }

    /// Text view of the map with the agent drawn as '@' and known objects on
    /// top of the terrain.
    pub fn render(&self, location: Position, objects: &MapObjects) -> String {
        let mut out = String::with_capacity(((self.width + 1) * self.height) as usize);
        for row in 0..self.height {
            for col in 0..self.width {
                let pos = Position { row, col };
                let symbol = if pos == location {
                    '@'
                } else if let Some(object) = objects.get(&pos) {
                    object.label.symbol()
                } else {
                    self.tiles[(row * self.width + col) as usize].symbol()
                };
                out.push(symbol);
            }
            out.push('\n');
        }
        out
    }
}

impl TryFrom<Vec<String>> for GameMap {
    type Error = MapError;

    fn try_from(rows: Vec<String>) -> Result<Self, Self::Error> {
        GameMap::from_rows(&rows)
    }
}

impl From<GameMap> for Vec<String> {
    fn from(map: GameMap) -> Self {
        map.rows()
    }
}

#[cfg(test)]
mod tests {
    use crate::game_interface::MapObject;
    use super::*;

    #[test]
    fn test_parse_map() {
        let map = GameMap::from_rows(&[".:^", "#.."]).unwrap();
        assert_eq!(map.height, 2);
        assert_eq!(map.width, 3);
        assert_eq!(map.tile(Position::new(0, 1)), Some(Tile::Sand));
        assert_eq!(map.tile(Position::new(0, 2)), Some(Tile::Mountain));
        assert_eq!(map.tile(Position::new(1, 0)), Some(Tile::Wall));
        assert_eq!(map.tile(Position::new(2, 0)), None);
        assert_eq!(map.tile(Position::new(0, -1)), None);
        assert_eq!(map.rows(), vec![".:^".to_string(), "#..".to_string()]);
    }

    #[test]
    fn test_parse_map_errors() {
        let empty: [&str; 0] = [];
        assert_eq!(GameMap::from_rows(&empty), Err(MapError::Empty));
        assert_eq!(GameMap::from_rows(&["..", "..."]),
                   Err(MapError::Ragged { row: 1, expected: 2, found: 3 }));
        assert_eq!(GameMap::from_rows(&["..", ".x"]),
                   Err(MapError::UnknownTile { row: 1, col: 1, symbol: 'x' }));
    }

    #[test]
    fn test_map_json() {
        let map: GameMap = serde_json::from_str(r##"["..", "#^"]"##).unwrap();
        assert_eq!(map.tile(Position::new(1, 1)), Some(Tile::Mountain));
        assert_eq!(serde_json::to_string(&map).unwrap(), r##"["..","#^"]"##);
        assert!(serde_json::from_str::<GameMap>(r##"["..", "#"]"##).is_err());
    }

    #[test]
    fn test_unknown_label() {
        let object: MapObject = serde_json::from_str(
            r#"{"label": "chest", "delta": 3}"#).unwrap();
        assert_eq!(object.label, ObjectKind::Other);
        assert!(!object.label.is_known());
        let object: MapObject = serde_json::from_str(
            r#"{"label": "boss", "delta": -20}"#).unwrap();
        assert_eq!(object.label, ObjectKind::Boss);
    }

    #[test]
    fn test_directions() {
        let origin = Position::new(2, 2);
        assert_eq!(origin.step(Direction::N), Position::new(1, 2));
        assert_eq!(origin.step(Direction::S), Position::new(3, 2));
        assert_eq!(origin.step(Direction::E), Position::new(2, 3));
        assert_eq!(origin.step(Direction::W), Position::new(2, 1));
        assert_eq!(Direction::N.flanks(), [Direction::W, Direction::E]);
        assert_eq!(Direction::W.flanks(), [Direction::N, Direction::S]);
        for direction in Direction::ALL {
            assert_eq!(Direction::from_symbol(direction.symbol()), Some(direction));
        }
        assert_eq!(Direction::from_symbol('X'), None);
        assert_eq!(Direction::E.to_string(), "EAST");
    }

    #[test]
    fn test_render() {
        let map = GameMap::from_rows(&["...", ".#:"]).unwrap();
        let mut objects = MapObjects::default();
        objects.insert(Position::new(0, 2),
                       MapObject { label: ObjectKind::Medkit, delta: 5 });
        objects.insert(Position::new(1, 0),
                       MapObject { label: ObjectKind::Boss, delta: -10 });
        assert_eq!(map.render(Position::new(0, 0), &objects), "@.+\nB#:\n");
    }
}
