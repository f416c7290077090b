//! Match authority.
//!
//! One task per match. It takes ownership of both player connections and
//! runs the game to completion:
//!
//! ```text
//! announce:  R first, R second  → player 1, then the same → player 2
//! each turn: board → both players
//!            game over?  L → loser, W → winner, exit
//!            A → mover, Z → other, then read the mover's move
//! ```
//!
//! Any transport failure, malformed move frame or illegal move ends the
//! task immediately.
//! Nothing further is sent to either side; dropping the authority closes
//! both connections, so the surviving player sees the connection close
//! rather than a result.

use nim_core::{Board, EndReason, Game, Move, MoveError, Outcome, Seat};
use nim_protocol::{FrameError, FrameStream, Message, ProtocolError};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::types::{MatchId, Session};

/// Why a match ended without a result.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("lost connection to {seat:?} player {handle}: {source}")]
    Transport {
        seat: Seat,
        handle: String,
        source: FrameError,
    },

    #[error("{seat:?} player {handle} sent a malformed move frame: {source}")]
    MalformedMove {
        seat: Seat,
        handle: String,
        source: ProtocolError,
    },

    #[error("{seat:?} player {handle} sent illegal move {mv:?}: {source}")]
    IllegalMove {
        seat: Seat,
        handle: String,
        mv: Move,
        source: MoveError,
    },
}

/// How a completed match ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchReport {
    pub outcome: Outcome,

    /// Moves accepted, including a final resignation.
    pub moves: u32,
}

/// Owner of one game and both of its connections.
pub struct MatchAuthority<S> {
    id: MatchId,
    handles: [String; 2],
    players: [FrameStream<S>; 2],
    game: Game,
}

impl<S> MatchAuthority<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    /// `first` is player 1 and moves on odd turns.
    pub fn new(id: MatchId, first: Session<S>, second: Session<S>) -> Self {
        MatchAuthority {
            id,
            handles: [first.handle, second.handle],
            players: [first.stream, second.stream],
            game: Game::new(),
        }
    }

    /// Run the match until it has a result or fails.
    pub async fn run(mut self) -> Result<MatchReport, MatchError> {
        self.announce().await?;

        loop {
            let board = self.game.board().clone();
            self.send_board(Seat::First, &board).await?;
            self.send_board(Seat::Second, &board).await?;

            if let Some(outcome) = self.game.outcome() {
                self.send(outcome.loser, &Message::loss()).await?;
                self.send(outcome.winner, &Message::win()).await?;
                return Ok(MatchReport {
                    outcome,
                    moves: self.game.turn() - 1,
                });
            }

            let mover = self.game.mover();
            self.send(mover, &Message::move_request()).await?;
            self.send(mover.other(), &Message::filler()).await?;

            let mv = match self.players[index(mover)].recv_move().await {
                Ok(mv) => mv,
                Err(FrameError::Protocol(source)) => {
                    return Err(MatchError::MalformedMove {
                        seat: mover,
                        handle: self.handles[index(mover)].clone(),
                        source,
                    })
                }
                Err(e) => return Err(self.transport_error(mover, e)),
            };

            self.game.play(mv).map_err(|source| MatchError::IllegalMove {
                seat: mover,
                handle: self.handles[index(mover)].clone(),
                mv,
                source,
            })?;

            debug!(match_id = %self.id, turn = self.game.turn() - 1, ?mover, ?mv, "move applied");
        }
    }

    /// Both handles to both players, player 1's handle first.
    async fn announce(&mut self) -> Result<(), MatchError> {
        let first = Message::handle(self.handles[0].clone());
        let second = Message::handle(self.handles[1].clone());
        for seat in [Seat::First, Seat::Second] {
            self.send(seat, &first).await?;
            self.send(seat, &second).await?;
        }
        Ok(())
    }

    async fn send(&mut self, seat: Seat, msg: &Message) -> Result<(), MatchError> {
        self.players[index(seat)]
            .send_message(msg)
            .await
            .map_err(|source| self.transport_error(seat, source))
    }

    async fn send_board(&mut self, seat: Seat, board: &Board) -> Result<(), MatchError> {
        self.players[index(seat)]
            .send_board(board)
            .await
            .map_err(|source| self.transport_error(seat, source))
    }

    fn transport_error(&self, seat: Seat, source: FrameError) -> MatchError {
        MatchError::Transport {
            seat,
            handle: self.handles[index(seat)].clone(),
            source,
        }
    }
}

/// Spawn a match authority that owns both sessions.
///
/// The returned handle resolves once the match is over; the result is
/// logged here, not returned.
pub fn spawn<S>(id: MatchId, first: Session<S>, second: Session<S>) -> JoinHandle<()>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let authority = MatchAuthority::new(id, first, second);
    let players = authority.handles.clone();

    tokio::spawn(async move {
        match authority.run().await {
            Ok(report) => {
                let winner = &players[index(report.outcome.winner)];
                let loser = &players[index(report.outcome.loser)];
                let how = match report.outcome.reason {
                    EndReason::Exhausted => "took the last stone",
                    EndReason::Resigned => "resigned",
                };
                info!(match_id = %id, %winner, %loser, moves = report.moves, "match over: loser {}", how);
            }
            Err(e) => warn!(match_id = %id, "match failed: {}", e),
        }
    })
}

fn index(seat: Seat) -> usize {
    match seat {
        Seat::First => 0,
        Seat::Second => 1,
    }
}
