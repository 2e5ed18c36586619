//! Runs searches on a dedicated thread so the caller never blocks on one
//!
//! Requests are answered one at a time, in the order they were sent. Every response carries the
//! id of its request so a caller with several requests in flight can match them up.

use std::{
    sync::mpsc::{self, Receiver, Sender},
    thread::{self, JoinHandle},
    time::Duration,
};

use anyhow::{anyhow, Context, Result};
use tracing::{info_span, warn};

use crate::{
    board::Direction,
    wire::{compute_best_move, SerializedBoard},
};

#[derive(Debug, Clone, PartialEq, Eq)]
/// A board to pick a move for
pub struct SearchRequest {
    /// Echoed back on the matching [SearchResponse]
    pub id: u64,
    #[allow(missing_docs)]
    pub board: SerializedBoard,
    #[allow(missing_docs)]
    pub time_budget: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The answer to a [SearchRequest]
pub struct SearchResponse {
    #[allow(missing_docs)]
    pub id: u64,
    /// `None` when nothing can move, or when the request's board could not be read
    pub direction: Option<Direction>,
}

#[derive(Debug)]
/// A handle to the background search thread
///
/// Dropping the worker closes its request channel and waits for the search in progress, if any,
/// to finish.
///
/// ```
/// use std::time::Duration;
/// use twenty48_minimax::{
///     board::StandardBoard,
///     worker::{SearchRequest, SearchWorker},
/// };
///
/// let worker = SearchWorker::spawn().unwrap();
///
/// worker
///     .send(SearchRequest {
///         id: 7,
///         board: StandardBoard::from_rows([
///             [2, 0, 0, 0],
///             [0, 0, 0, 0],
///             [0, 0, 0, 0],
///             [0, 0, 0, 2],
///         ])
///         .to_serialized(),
///         time_budget: Duration::from_millis(10),
///     })
///     .unwrap();
///
/// let response = worker.recv().unwrap();
/// assert_eq!(response.id, 7);
/// assert!(response.direction.is_some());
/// ```
pub struct SearchWorker {
    requests: Option<Sender<SearchRequest>>,
    responses: Receiver<SearchResponse>,
    handle: Option<JoinHandle<()>>,
}

impl SearchWorker {
    /// Start the background thread
    pub fn spawn() -> Result<Self> {
        let (request_tx, request_rx) = mpsc::channel::<SearchRequest>();
        let (response_tx, response_rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("twenty48-search".to_owned())
            .spawn(move || {
                for request in request_rx {
                    let _span = info_span!("search_request", id = request.id).entered();

                    let time_budget_millis = request.time_budget.as_millis() as u64;
                    let direction = match compute_best_move(&request.board, time_budget_millis) {
                        Ok(direction) => direction,
                        Err(error) => {
                            warn!(%error, "Could not search the requested board");
                            None
                        }
                    };

                    if response_tx
                        .send(SearchResponse {
                            id: request.id,
                            direction,
                        })
                        .is_err()
                    {
                        return;
                    }
                }
            })
            .context("Failed to spawn the search thread")?;

        Ok(Self {
            requests: Some(request_tx),
            responses: response_rx,
            handle: Some(handle),
        })
    }

    /// Queue a board to be searched
    pub fn send(&self, request: SearchRequest) -> Result<()> {
        self.requests
            .as_ref()
            .ok_or_else(|| anyhow!("The search worker has been shut down"))?
            .send(request)
            .map_err(|_| anyhow!("The search thread has stopped"))
    }

    /// Wait for the next response
    pub fn recv(&self) -> Result<SearchResponse> {
        self.responses
            .recv()
            .map_err(|_| anyhow!("The search thread has stopped"))
    }

    /// The next response if one is already waiting
    pub fn try_recv(&self) -> Option<SearchResponse> {
        self.responses.try_recv().ok()
    }
}

impl Drop for SearchWorker {
    fn drop(&mut self) {
        self.requests.take();

        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("The search thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::board::StandardBoard;

    use super::*;

    fn request(id: u64, board: SerializedBoard) -> SearchRequest {
        SearchRequest {
            id,
            board,
            time_budget: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_responses_come_back_in_order() {
        let worker = SearchWorker::spawn().unwrap();

        let playable = StandardBoard::from_rows([
            [2, 2, 0, 0],
            [0, 0, 0, 0],
            [0, 0, 4, 0],
            [0, 0, 0, 0],
        ]);
        let stuck = StandardBoard::from_rows([
            [2, 4, 2, 4],
            [4, 2, 4, 2],
            [2, 4, 2, 4],
            [4, 2, 4, 2],
        ]);

        worker.send(request(1, playable.to_serialized())).unwrap();
        worker.send(request(2, stuck.to_serialized())).unwrap();

        let first = worker.recv().unwrap();
        assert_eq!(first.id, 1);
        assert!(first.direction.is_some());

        assert_eq!(
            worker.recv().unwrap(),
            SearchResponse {
                id: 2,
                direction: None
            }
        );
        assert_eq!(worker.try_recv(), None);
    }

    #[test]
    fn test_invalid_board_gets_no_move() {
        let worker = SearchWorker::spawn().unwrap();

        let mut board = StandardBoard::new().to_serialized();
        board.size = 7;

        worker.send(request(3, board)).unwrap();

        assert_eq!(
            worker.recv().unwrap(),
            SearchResponse {
                id: 3,
                direction: None
            }
        );
    }

    #[test]
    fn test_drop_joins_the_thread() {
        let worker = SearchWorker::spawn().unwrap();
        worker
            .send(request(4, StandardBoard::new().to_serialized()))
            .unwrap();

        drop(worker);
    }
}
