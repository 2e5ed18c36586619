//! Sliding and merging tiles when the player picks a direction

use crate::board::{Board, Direction, Farthest, Position, Tile, Vector, WINNING_TILE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
/// What happened when a direction was applied to a board
pub struct MoveOutcome {
    /// Did any tile end up somewhere other than where it started
    pub moved: bool,
    /// The sum of the values of every tile created by a merge
    pub score: u64,
    /// Was the winning tile created by a merge
    pub won: bool,
}

/// The order cells are visited in so that the tiles farthest along `vector` move first
fn build_traversals<const N: usize>(vector: Vector) -> ([usize; N], [usize; N]) {
    let mut xs: [usize; N] = std::array::from_fn(|i| i);
    let mut ys: [usize; N] = std::array::from_fn(|i| i);

    if vector.x == 1 {
        xs.reverse();
    }
    if vector.y == 1 {
        ys.reverse();
    }

    (xs, ys)
}

impl<const N: usize> Board<N> {
    /// Slide every tile in `direction`, merging equal neighbours, in place.
    ///
    /// A cell receives at most one merge per call so `[2, 2, 2]` moved left becomes `[4, 2]`.
    /// If anything moved the board is handed over to the environment (`player_turn = false`).
    ///
    /// ```
    /// use twenty48_minimax::board::{Direction, StandardBoard};
    ///
    /// let mut board = StandardBoard::from_rows([
    ///     [2, 2, 2, 0],
    ///     [0, 0, 0, 0],
    ///     [0, 0, 0, 0],
    ///     [0, 0, 0, 0],
    /// ]);
    ///
    /// let outcome = board.apply_move(Direction::Left);
    ///
    /// assert!(outcome.moved);
    /// assert_eq!(outcome.score, 4);
    /// assert_eq!(board, {
    ///     let mut expected = StandardBoard::from_rows([
    ///         [4, 2, 0, 0],
    ///         [0, 0, 0, 0],
    ///         [0, 0, 0, 0],
    ///         [0, 0, 0, 0],
    ///     ]);
    ///     expected.player_turn = false;
    ///     expected
    /// });
    /// ```
    pub fn apply_move(&mut self, direction: Direction) -> MoveOutcome {
        let vector = direction.vector();
        let (xs, ys) = build_traversals::<N>(vector);

        let mut merged = [[false; N]; N];
        let mut outcome = MoveOutcome::default();

        for &x in &xs {
            for &y in &ys {
                let cell = Position::new(x as i32, y as i32);
                let Some(tile) = self.cell_at(cell) else {
                    continue;
                };

                let Farthest { farthest, next } = self.find_farthest(cell, vector);

                // Tiles too big to double stay put, like any other unequal neighbour
                let doubled = self
                    .cell_at(next)
                    .filter(|other| {
                        other.value == tile.value && !merged[next.x as usize][next.y as usize]
                    })
                    .and_then(|other| other.value.checked_mul(2));

                let destination = match doubled {
                    Some(value) => {
                        let combined = Tile::new(next, value);

                        self.remove_tile(cell);
                        self.insert_tile(combined);
                        merged[next.x as usize][next.y as usize] = true;

                        outcome.score += u64::from(combined.value);
                        if combined.value == WINNING_TILE {
                            outcome.won = true;
                        }

                        next
                    }
                    None => {
                        self.remove_tile(cell);
                        self.insert_tile(Tile::new(farthest, tile.value));

                        farthest
                    }
                };

                if destination != cell {
                    outcome.moved = true;
                }
            }
        }

        if outcome.moved {
            self.player_turn = false;
        }

        outcome
    }

    /// Apply `direction` to a copy of this board, leaving `self` untouched
    pub fn with_move(&self, direction: Direction) -> (Self, MoveOutcome) {
        let mut next = *self;
        let outcome = next.apply_move(direction);

        (next, outcome)
    }
}

#[cfg(test)]
mod tests {
    use crate::board::StandardBoard;

    use super::*;

    fn values(board: &StandardBoard) -> [[u32; 4]; 4] {
        let mut rows = [[0; 4]; 4];
        for tile in board.tiles() {
            rows[tile.position.y as usize][tile.position.x as usize] = tile.value;
        }
        rows
    }

    #[test]
    fn test_single_tile_slides_down() {
        let mut board = StandardBoard::new();
        board.insert_tile(Tile::new(Position::new(0, 0), 2));

        let outcome = board.apply_move(Direction::Down);

        assert_eq!(
            outcome,
            MoveOutcome {
                moved: true,
                score: 0,
                won: false
            }
        );
        assert_eq!(
            board.cell_at(Position::new(0, 3)),
            Some(Tile::new(Position::new(0, 3), 2))
        );
        assert!(!board.cell_occupied(Position::new(0, 0)));
        assert!(!board.player_turn);
    }

    #[test]
    fn test_blocked_move_changes_nothing() {
        let before = StandardBoard::from_rows([
            [2, 4, 0, 0],
            [8, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);

        for direction in [Direction::Up, Direction::Left] {
            let mut board = before;
            let outcome = board.apply_move(direction);

            assert_eq!(outcome, MoveOutcome::default());
            assert_eq!(board, before);
            assert!(board.player_turn);
        }
    }

    #[test]
    fn test_each_tile_merges_once() {
        let mut board = StandardBoard::from_rows([
            [2, 2, 2, 0],
            [2, 2, 2, 2],
            [4, 2, 2, 0],
            [0, 0, 0, 0],
        ]);

        let outcome = board.apply_move(Direction::Left);

        assert_eq!(
            values(&board),
            [[4, 2, 0, 0], [4, 4, 0, 0], [4, 4, 0, 0], [0, 0, 0, 0]]
        );
        assert_eq!(outcome.score, 4 + 4 + 4 + 4);
    }

    #[test]
    fn test_merges_happen_at_the_far_end() {
        let mut board = StandardBoard::from_rows([
            [2, 2, 2, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);

        board.apply_move(Direction::Right);

        assert_eq!(values(&board)[0], [0, 0, 2, 4]);
    }

    #[test]
    fn test_merged_tiles_do_not_merge_again() {
        let mut board = StandardBoard::from_rows([
            [4, 0, 0, 0],
            [2, 0, 0, 0],
            [2, 0, 0, 0],
            [0, 0, 0, 0],
        ]);

        let outcome = board.apply_move(Direction::Up);

        assert_eq!(values(&board), [[4, 0, 0, 0], [4, 0, 0, 0], [0; 4], [0; 4]]);
        assert_eq!(outcome.score, 4);
    }

    #[test]
    fn test_score_is_the_sum_of_merged_tiles() {
        let boards = [
            StandardBoard::from_rows([
                [2, 2, 4, 4],
                [8, 8, 8, 0],
                [16, 0, 16, 2],
                [2, 4, 8, 16],
            ]),
            StandardBoard::from_rows([
                [2, 2, 2, 2],
                [4, 0, 4, 0],
                [0, 0, 0, 0],
                [2, 0, 0, 2],
            ]),
        ];

        for before in boards {
            for direction in Direction::all() {
                let (after, outcome) = before.with_move(direction);

                // Merging never creates or destroys value on the board
                assert_eq!(before.total_value(), after.total_value());

                let merges = before.tiles().count() - after.tiles().count();
                assert_eq!(merges == 0, outcome.score == 0);
                assert_eq!(outcome.score % 4, 0);
            }
        }

        let (_, outcome) = boards[0].with_move(Direction::Left);
        assert_eq!(outcome.score, 4 + 8 + 16 + 32);

        let (after, outcome) = boards[1].with_move(Direction::Right);
        assert_eq!(outcome.score, 4 + 4 + 8 + 4);
        assert_eq!(
            values(&after),
            [[0, 0, 4, 4], [0, 0, 0, 8], [0; 4], [0, 0, 0, 4]]
        );
    }

    #[test]
    fn test_winning_merge() {
        let mut board = StandardBoard::from_rows([
            [1024, 1024, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);

        let outcome = board.apply_move(Direction::Left);

        assert!(outcome.won);
        assert_eq!(outcome.score, u64::from(WINNING_TILE));
        assert!(board.is_win());
    }

    #[test]
    fn test_largest_tiles_do_not_merge() {
        let top = 1 << 31;
        let mut board = StandardBoard::from_rows([
            [top, top, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [1 << 30, 1 << 30, 1 << 30, 1 << 30],
        ]);

        let outcome = board.apply_move(Direction::Right);

        assert!(outcome.moved);
        assert_eq!(values(&board)[0], [0, 0, top, top]);
        assert_eq!(values(&board)[3], [0, 0, top, top]);
        assert_eq!(outcome.score, 2 * u64::from(top));

        // Doubling a top tile is refused, so nothing moves right any more
        let mut stuck = board;
        stuck.player_turn = true;
        let (after, outcome) = stuck.with_move(Direction::Right);
        assert!(!outcome.moved);
        assert_eq!(outcome.score, 0);
        assert_eq!(values(&after), values(&stuck));
    }

    #[test]
    fn test_with_move_leaves_the_source_board_alone() {
        let board = StandardBoard::from_rows([
            [0, 0, 0, 0],
            [0, 2, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);

        let (moved, outcome) = board.with_move(Direction::Right);

        assert!(outcome.moved);
        assert!(board.cell_occupied(Position::new(1, 1)));
        assert!(board.player_turn);
        assert!(moved.cell_occupied(Position::new(3, 1)));
    }
}
