use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use twenty48_minimax::{
    board::{Direction, StandardBoard, Tile},
    moves::MoveOutcome,
};

/// How many tiles a new game starts with
const START_TILES: usize = 2;

/// Chance that a spawned tile is a 2 rather than a 4
const TWO_PROBABILITY: f64 = 0.9;

/// A game in progress: the live board plus what the player has earned so far
///
/// Spawns here are truly random, unlike the worst case spawns the search assumes.
#[derive(Debug)]
pub(crate) struct Game {
    pub board: StandardBoard,
    pub score: u64,
    pub won: bool,
    pub moves: usize,
    rng: StdRng,
}

impl Game {
    /// A new game with two random tiles. The same seed always gives the same game
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut game = Self {
            board: StandardBoard::new(),
            score: 0,
            won: false,
            moves: 0,
            rng,
        };

        for _ in 0..START_TILES {
            game.add_random_tile();
        }

        game
    }

    /// Put a 2 or a 4 on a uniformly chosen empty cell. Returns `false` if the board is full
    pub fn add_random_tile(&mut self) -> bool {
        let cells = self.board.available_cells();
        let Some(&cell) = cells.choose(&mut self.rng) else {
            return false;
        };

        let value = if self.rng.gen_bool(TWO_PROBABILITY) {
            2
        } else {
            4
        };

        self.board.insert_tile(Tile::new(cell, value));
        self.board.player_turn = true;

        true
    }

    /// Make a move, then spawn a tile if anything moved
    pub fn apply(&mut self, direction: Direction) -> MoveOutcome {
        let outcome = self.board.apply_move(direction);

        if outcome.moved {
            self.score += outcome.score;
            self.won |= outcome.won;
            self.moves += 1;

            self.add_random_tile();
        }

        outcome
    }

    pub fn is_over(&self) -> bool {
        !self.board.moves_available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_has_two_tiles() {
        let game = Game::new(Some(1));

        assert_eq!(game.board.tiles().count(), START_TILES);
        assert!(game.board.tiles().all(|t| t.value == 2 || t.value == 4));
        assert!(game.board.player_turn);
        assert_eq!(game.score, 0);
    }

    #[test]
    fn test_seeded_games_repeat() {
        let mut first = Game::new(Some(42));
        let mut second = Game::new(Some(42));
        assert_eq!(first.board, second.board);

        for direction in [Direction::Left, Direction::Up, Direction::Right] {
            first.apply(direction);
            second.apply(direction);
        }

        assert_eq!(first.board, second.board);
        assert_eq!(first.score, second.score);
    }

    #[test]
    fn test_blocked_move_spawns_nothing() {
        let mut game = Game::new(Some(3));
        game.board = StandardBoard::from_rows([
            [2, 4, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
        ]);

        let outcome = game.apply(Direction::Up);

        assert!(!outcome.moved);
        assert_eq!(game.board.tiles().count(), 2);
        assert_eq!(game.moves, 0);
    }

    #[test]
    fn test_merges_add_to_the_score() {
        let mut game = Game::new(Some(5));
        game.board = StandardBoard::from_rows([
            [2, 2, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 0, 0],
            [4, 4, 0, 0],
        ]);

        let outcome = game.apply(Direction::Left);

        assert_eq!(outcome.score, 12);
        assert_eq!(game.score, 12);
        assert_eq!(game.moves, 1);
        // Two merged tiles plus the spawn
        assert_eq!(game.board.tiles().count(), 3);
        assert!(game.board.player_turn);
    }

    #[test]
    fn test_full_board() {
        let mut game = Game::new(Some(9));
        game.board = StandardBoard::from_rows([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ]);

        assert!(!game.add_random_tile());
        assert!(game.is_over());
    }
}
