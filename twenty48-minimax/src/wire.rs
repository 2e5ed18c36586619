//! The JSON form a board travels in between the search and whatever is driving the game
//!
//! ```json
//! {
//!   "size": 4,
//!   "playerTurn": true,
//!   "cells": [{ "x": 0, "y": 0, "value": 2 }, { "x": 3, "y": 1, "value": 4 }]
//! }
//! ```
//!
//! Only occupied cells are listed. `x` is the column and `y` the row, with `(0, 0)` in the top
//! left corner.

use std::time::Duration;

use anyhow::{bail, ensure, Result};
use serde::{Deserialize, Serialize};

use crate::{
    alpha_beta::{AlphaBetaSearcher, SearchOptions},
    board::{Board, Direction, Position, Tile},
};

/// The largest tile a serialized board may hold
pub const MAX_TILE_VALUE: u32 = 1 << 30;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// A board as it appears on the wire. See the [module docs](self)
pub struct SerializedBoard {
    /// The side length of the board
    pub size: usize,
    #[serde(rename = "playerTurn")]
    /// `false` when the board is waiting on a tile to be spawned
    pub player_turn: bool,
    /// Every occupied cell, in any order
    pub cells: Vec<CellRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
/// One occupied cell
pub struct CellRecord {
    #[allow(missing_docs)]
    pub x: i32,
    #[allow(missing_docs)]
    pub y: i32,
    #[allow(missing_docs)]
    pub value: u32,
}

impl<const N: usize> Board<N> {
    /// The wire form of this board. Cells are listed column by column
    pub fn to_serialized(&self) -> SerializedBoard {
        SerializedBoard {
            size: N,
            player_turn: self.player_turn,
            cells: self
                .tiles()
                .map(|tile| CellRecord {
                    x: tile.position.x,
                    y: tile.position.y,
                    value: tile.value,
                })
                .collect(),
        }
    }
}

impl<const N: usize> TryFrom<&SerializedBoard> for Board<N> {
    type Error = anyhow::Error;

    fn try_from(serialized: &SerializedBoard) -> Result<Self> {
        ensure!(
            serialized.size == N,
            "Expected a board of size {N} but got size {}",
            serialized.size
        );

        let mut board = Board::new();
        board.player_turn = serialized.player_turn;

        for cell in &serialized.cells {
            let position = Position::new(cell.x, cell.y);

            ensure!(
                board.within_bounds(position),
                "Cell ({}, {}) is outside of a {N}x{N} board",
                cell.x,
                cell.y
            );
            ensure!(
                cell.value >= 2 && cell.value.is_power_of_two(),
                "Cell ({}, {}) has value {} which is not a power of two",
                cell.x,
                cell.y,
                cell.value
            );
            ensure!(
                cell.value <= MAX_TILE_VALUE,
                "Cell ({}, {}) has value {} which is larger than {MAX_TILE_VALUE}",
                cell.x,
                cell.y,
                cell.value
            );
            if board.cell_occupied(position) {
                bail!("Cell ({}, {}) is listed more than once", cell.x, cell.y);
            }

            board.insert_tile(Tile::new(position, cell.value));
        }

        Ok(board)
    }
}

fn search_sized<const N: usize>(
    serialized: &SerializedBoard,
    options: SearchOptions,
) -> Result<Option<Direction>> {
    let board = Board::<N>::try_from(serialized)?;
    let searcher = AlphaBetaSearcher::from_board_with_options(board, "compute_best_move", options);

    Ok(searcher.choose_move())
}

/// The single entry point for callers that only have the wire form of a board
///
/// Runs iterative deepening for roughly `time_budget_millis` and returns the chosen direction, or
/// `None` when nothing can move. Boards of size 3, 4, 5, 6 and 8 are supported.
///
/// ```
/// use twenty48_minimax::wire::{compute_best_move, SerializedBoard};
///
/// let serialized: SerializedBoard = serde_json::from_str(
///     r#"{ "size": 4, "playerTurn": true, "cells": [{ "x": 1, "y": 1, "value": 2 }] }"#,
/// )
/// .unwrap();
///
/// assert!(compute_best_move(&serialized, 10).unwrap().is_some());
/// ```
pub fn compute_best_move(
    serialized: &SerializedBoard,
    time_budget_millis: u64,
) -> Result<Option<Direction>> {
    let options = SearchOptions {
        time_budget: Duration::from_millis(time_budget_millis),
        ..Default::default()
    };

    compute_best_move_with_options(serialized, options)
}

/// [compute_best_move] with full control over the [SearchOptions]
pub fn compute_best_move_with_options(
    serialized: &SerializedBoard,
    options: SearchOptions,
) -> Result<Option<Direction>> {
    match serialized.size {
        3 => search_sized::<3>(serialized, options),
        4 => search_sized::<4>(serialized, options),
        5 => search_sized::<5>(serialized, options),
        6 => search_sized::<6>(serialized, options),
        8 => search_sized::<8>(serialized, options),
        size => bail!("Boards of size {size} are not supported"),
    }
}
