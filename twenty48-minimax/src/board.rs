//! The grid, its tiles and the geometry queries the move resolver and the evaluator are built on

use std::fmt::{self, Display};

use itertools::iproduct;

/// The tile that wins the game once it is created by a merge
pub const WINNING_TILE: u32 = 2048;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// A cell on the board. `x` is the column and `y` is the row, with `(0, 0)` in the top left
/// corner.
///
/// Coordinates are signed so that stepping off the edge of the board is representable, which is
/// what [Board::find_farthest] relies on to report the boundary.
pub struct Position {
    #[allow(missing_docs)]
    pub x: i32,
    #[allow(missing_docs)]
    pub y: i32,
}

impl Position {
    #[allow(missing_docs)]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The position one step away along `vector`
    pub const fn step(self, vector: Vector) -> Self {
        Self {
            x: self.x + vector.x,
            y: self.y + vector.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// A unit movement on the grid
pub struct Vector {
    #[allow(missing_docs)]
    pub x: i32,
    #[allow(missing_docs)]
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// The four ways the player can slide the board
///
/// The declaration order is also the order the search tries them in.
pub enum Direction {
    #[allow(missing_docs)]
    Up,
    #[allow(missing_docs)]
    Right,
    #[allow(missing_docs)]
    Down,
    #[allow(missing_docs)]
    Left,
}

impl Direction {
    /// All the directions, in search order
    pub const fn all() -> [Direction; 4] {
        [
            Direction::Up,
            Direction::Right,
            Direction::Down,
            Direction::Left,
        ]
    }

    #[allow(missing_docs)]
    pub const fn as_index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Right => 1,
            Direction::Down => 2,
            Direction::Left => 3,
        }
    }

    /// The inverse of [Direction::as_index]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::all().get(index).copied()
    }

    /// The unit vector a tile travels along when this direction is played
    pub const fn vector(self) -> Vector {
        match self {
            Direction::Up => Vector { x: 0, y: -1 },
            Direction::Right => Vector { x: 1, y: 0 },
            Direction::Down => Vector { x: 0, y: 1 },
            Direction::Left => Vector { x: -1, y: 0 },
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        };

        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// A tile on the board. Tiles are never mutated, a merge replaces the two sources with a fresh
/// tile of double the value
pub struct Tile {
    #[allow(missing_docs)]
    pub position: Position,
    /// Always a power of two, starting from 2
    pub value: u32,
}

impl Tile {
    #[allow(missing_docs)]
    pub fn new(position: Position, value: u32) -> Self {
        debug_assert!(
            value >= 2 && value.is_power_of_two(),
            "tile values are powers of two, got {value}"
        );

        Self { position, value }
    }

    /// `log2` of the value. Exact, since values are powers of two
    pub fn log2(&self) -> f64 {
        f64::from(self.value.trailing_zeros())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Returned from [Board::find_farthest]
pub struct Farthest {
    /// The last empty cell reached walking from the start position
    pub farthest: Position,
    /// The first cell past `farthest`. Either occupied or off the board
    pub next: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// An `N` by `N` grid of tiles, plus whose ply comes next
///
/// The board is a plain value. Cloning it is a copy of the cell matrix so a clone can be mutated
/// freely without touching the board it came from.
pub struct Board<const N: usize> {
    /// Indexed as `cells[x][y]`
    pub(crate) cells: [[Option<u32>; N]; N],
    /// `true` when the player moves next, `false` when a tile is about to be spawned
    pub player_turn: bool,
}

/// The board the game is normally played on
pub type StandardBoard = Board<4>;

impl<const N: usize> Default for Board<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> Board<N> {
    /// An empty board with the player to move
    pub const fn new() -> Self {
        Self {
            cells: [[None; N]; N],
            player_turn: true,
        }
    }

    /// Build a board from rows of values, top row first. `0` is an empty cell.
    ///
    /// ```
    /// use twenty48_minimax::board::{Position, StandardBoard};
    ///
    /// let board = StandardBoard::from_rows([
    ///     [2, 0, 0, 0],
    ///     [0, 0, 0, 0],
    ///     [0, 0, 4, 0],
    ///     [0, 0, 0, 0],
    /// ]);
    ///
    /// assert_eq!(board.cell_at(Position::new(2, 2)).map(|t| t.value), Some(4));
    /// ```
    pub fn from_rows(rows: [[u32; N]; N]) -> Self {
        let mut board = Self::new();

        for (y, row) in rows.iter().enumerate() {
            for (x, &value) in row.iter().enumerate() {
                if value != 0 {
                    board.insert_tile(Tile::new(Position::new(x as i32, y as i32), value));
                }
            }
        }

        board
    }

    /// The side length of the board
    pub const fn size(&self) -> usize {
        N
    }

    #[allow(missing_docs)]
    pub fn within_bounds(&self, pos: Position) -> bool {
        let n = N as i32;
        pos.x >= 0 && pos.x < n && pos.y >= 0 && pos.y < n
    }

    /// The tile at `pos`, if there is one. Positions off the board are simply empty
    pub fn cell_at(&self, pos: Position) -> Option<Tile> {
        if !self.within_bounds(pos) {
            return None;
        }

        self.cells[pos.x as usize][pos.y as usize].map(|value| Tile::new(pos, value))
    }

    #[allow(missing_docs)]
    pub fn cell_occupied(&self, pos: Position) -> bool {
        self.cell_at(pos).is_some()
    }

    /// In bounds and empty
    pub fn cell_available(&self, pos: Position) -> bool {
        self.within_bounds(pos) && !self.cell_occupied(pos)
    }

    /// Place a tile, replacing whatever was in its cell
    pub fn insert_tile(&mut self, tile: Tile) {
        debug_assert!(self.within_bounds(tile.position));

        self.cells[tile.position.x as usize][tile.position.y as usize] = Some(tile.value);
    }

    #[allow(missing_docs)]
    pub fn remove_tile(&mut self, pos: Position) {
        debug_assert!(self.within_bounds(pos));

        self.cells[pos.x as usize][pos.y as usize] = None;
    }

    /// Every position on the board, `x` outer and `y` inner
    pub fn positions() -> impl Iterator<Item = Position> {
        iproduct!(0..N, 0..N).map(|(x, y)| Position::new(x as i32, y as i32))
    }

    /// Every tile on the board, in the same order as [Board::positions]
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        Self::positions().filter_map(move |pos| self.cell_at(pos))
    }

    /// All the empty cells, `x` outer and `y` inner
    ///
    /// The order is stable so that anything picking among them (the spawn heuristic, or a random
    /// spawn) is reproducible.
    pub fn available_cells(&self) -> Vec<Position> {
        Self::positions()
            .filter(|&pos| !self.cell_occupied(pos))
            .collect()
    }

    /// Is there at least one empty cell
    pub fn cells_available(&self) -> bool {
        Self::positions().any(|pos| !self.cell_occupied(pos))
    }

    /// Do any two orthogonally adjacent tiles share a value
    pub fn match_available(&self) -> bool {
        self.tiles().any(|tile| {
            Direction::all().iter().any(|d| {
                self.cell_at(tile.position.step(d.vector()))
                    .map_or(false, |other| other.value == tile.value)
            })
        })
    }

    /// `false` once the player has no legal move left, which is game over
    pub fn moves_available(&self) -> bool {
        self.cells_available() || self.match_available()
    }

    /// Walk from `pos` along `vector` for as long as the next cell is on the board and empty.
    pub fn find_farthest(&self, pos: Position, vector: Vector) -> Farthest {
        let mut farthest = pos;
        let mut next = pos.step(vector);

        while self.cell_available(next) {
            farthest = next;
            next = next.step(vector);
        }

        Farthest { farthest, next }
    }

    /// Has the winning tile been made
    pub fn is_win(&self) -> bool {
        self.tiles().any(|tile| tile.value == WINNING_TILE)
    }

    /// The largest tile value, `None` on an empty board
    pub fn max_value(&self) -> Option<u32> {
        self.tiles().map(|tile| tile.value).max()
    }

    /// The sum of every tile on the board
    pub fn total_value(&self) -> u64 {
        self.tiles().map(|tile| u64::from(tile.value)).sum()
    }
}

impl<const N: usize> Display for Board<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..N {
            for x in 0..N {
                if x > 0 {
                    write!(f, " ")?;
                }

                match self.cell_at(Position::new(x as i32, y as i32)) {
                    Some(tile) => write!(f, "{}", tile.value)?,
                    None => write!(f, "_")?,
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_at_out_of_bounds_is_empty() {
        let board = StandardBoard::from_rows([[2; 4]; 4]);

        assert_eq!(board.cell_at(Position::new(-1, 0)), None);
        assert_eq!(board.cell_at(Position::new(0, 4)), None);
        assert_eq!(board.cell_at(Position::new(4, 4)), None);
        assert_eq!(
            board.cell_at(Position::new(3, 3)),
            Some(Tile::new(Position::new(3, 3), 2))
        );
    }

    #[test]
    fn test_available_cells_are_column_major() {
        let board = StandardBoard::from_rows([
            [2, 0, 2, 2],
            [0, 2, 2, 2],
            [2, 2, 2, 2],
            [2, 2, 2, 2],
        ]);

        assert_eq!(
            board.available_cells(),
            vec![Position::new(0, 1), Position::new(1, 0)]
        );
    }

    #[test]
    fn test_find_farthest_walks_to_the_wall() {
        let board = StandardBoard::from_rows([
            [2, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);

        let found = board.find_farthest(Position::new(0, 0), Direction::Down.vector());

        assert_eq!(found.farthest, Position::new(0, 3));
        assert_eq!(found.next, Position::new(0, 4));
    }

    #[test]
    fn test_find_farthest_stops_before_a_tile() {
        let board = StandardBoard::from_rows([
            [2, 0, 0, 8],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);

        let found = board.find_farthest(Position::new(0, 0), Direction::Right.vector());

        assert_eq!(found.farthest, Position::new(2, 0));
        assert_eq!(found.next, Position::new(3, 0));

        let blocked = board.find_farthest(Position::new(2, 0), Direction::Right.vector());
        assert_eq!(blocked.farthest, Position::new(2, 0));
        assert_eq!(blocked.next, Position::new(3, 0));
    }

    #[test]
    fn test_moves_available() {
        let checkerboard = StandardBoard::from_rows([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ]);
        assert!(!checkerboard.cells_available());
        assert!(!checkerboard.match_available());
        assert!(!checkerboard.moves_available());

        let full_with_pair = StandardBoard::from_rows([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 4],
        ]);
        assert!(!full_with_pair.cells_available());
        assert!(full_with_pair.moves_available());
    }

    #[test]
    fn test_clone_does_not_share_cells() {
        let board = StandardBoard::from_rows([
            [2, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);

        let mut copy = board;
        copy.remove_tile(Position::new(0, 0));
        copy.insert_tile(Tile::new(Position::new(1, 1), 4));

        assert!(board.cell_occupied(Position::new(0, 0)));
        assert!(!board.cell_occupied(Position::new(1, 1)));
    }

    #[test]
    fn test_win_and_max_value() {
        let mut board = StandardBoard::new();
        assert_eq!(board.max_value(), None);
        assert!(!board.is_win());

        board.insert_tile(Tile::new(Position::new(2, 1), 1024));
        assert_eq!(board.max_value(), Some(1024));
        assert!(!board.is_win());

        board.insert_tile(Tile::new(Position::new(0, 3), WINNING_TILE));
        assert!(board.is_win());
    }

    #[test]
    fn test_display() {
        let board = StandardBoard::from_rows([
            [2, 0, 0, 0],
            [0, 4, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 2048],
        ]);

        assert_eq!(
            board.to_string(),
            "2 _ _ _\n_ 4 _ _\n_ _ _ _\n_ _ _ 2048\n"
        );
    }

    #[test]
    fn test_direction_indexes_round_trip() {
        for d in Direction::all() {
            assert_eq!(Direction::from_index(d.as_index()), Some(d));
        }
        assert_eq!(Direction::from_index(4), None);
        assert_eq!(Direction::Left.to_string(), "left");
    }
}
