use crate::constants::MATE_SCORE;
use crate::moves::Move;
use crate::piece::{Piece, PieceKind, Side};
use crate::square::Square;
use itertools::Itertools;
use std::fmt::Debug;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum GameStateError {
    #[error("Cannot undo {requested} moves, only {available} were played")]
    UndoError { requested: usize, available: usize },
}

pub type Result<T> = std::result::Result<T, GameStateError>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DrawReason {
    FiftyMoveRule,
    InsufficientMaterial,
    Repetition,
}

impl DrawReason {
    pub fn to_str(&self) -> &str {
        match self {
            DrawReason::FiftyMoveRule => "fifty-move rule",
            DrawReason::InsufficientMaterial => "insufficient material",
            DrawReason::Repetition => "threefold repetition",
        }
    }
}

/// Whether a position is still being played, and if not, why
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Ongoing,
    /// The side to move is in check and has no legal moves
    Checkmate,
    /// The side to move is not in check and has no legal moves
    Stalemate,
    Draw(DrawReason),
    /// The side to move has no legal moves and loses (checkers)
    NoLegalMoves,
}

impl Status {
    pub fn is_terminal(&self) -> bool {
        *self != Status::Ongoing
    }

    /// The side that won, given who was to move when the game ended
    pub fn winner(&self, to_move: Side) -> Option<Side> {
        match self {
            Status::Checkmate | Status::NoLegalMoves => Some(to_move.opposite()),
            _ => None,
        }
    }

    /// Saturated score of a finished game from `side`'s point of view,
    /// None while the game is still going
    pub fn score_for(&self, to_move: Side, side: Side) -> Option<i32> {
        match self {
            Status::Ongoing => None,
            Status::Checkmate | Status::NoLegalMoves if side == to_move => Some(-MATE_SCORE),
            Status::Checkmate | Status::NoLegalMoves => Some(MATE_SCORE),
            Status::Stalemate | Status::Draw(_) => Some(0),
        }
    }
}

pub enum GameResult {
    WhiteWins,
    BlackWins,
    Draw,
}

impl GameResult {
    pub fn to_str(&self) -> &'static str {
        use GameResult::*;
        match self {
            WhiteWins => "WhiteWins",
            BlackWins => "BlackWins",
            Draw => "Draw",
        }
    }

    pub fn from_winner(winner: Option<Side>) -> GameResult {
        match winner {
            Some(Side::White) => GameResult::WhiteWins,
            Some(Side::Black) => GameResult::BlackWins,
            None => GameResult::Draw,
        }
    }
}

/// A game position together with the rules that move it forward.
///
/// Positions are values. `apply` hands back a new position and leaves the
/// receiver untouched, so a search can hold one position per frame without
/// any two frames sharing a board.
pub trait Position: Clone + Debug + PartialEq {
    type Kind: PieceKind;

    /// Draws by threefold repetition are claimed for this game
    const REPETITION_DRAWS: bool;

    /// Short lowercase name of the game, e.g. "chess"
    fn name() -> &'static str;

    /// The standard starting position
    fn initial() -> Self;

    fn side_to_move(&self) -> Side;

    fn occupant_at(&self, square: Square) -> Option<Piece<Self::Kind>>;

    /// All legal moves for `side`. An empty list means `side` cannot move.
    fn legal_moves(&self, side: Side) -> Vec<Move<Self::Kind>>;

    /// The position reached by playing `mv`, which must have been generated
    /// from this position
    fn apply(&self, mv: &Move<Self::Kind>) -> Self;

    /// Status of the position given the legal moves of the side to move
    fn outcome(&self, legal: &[Move<Self::Kind>]) -> Status;

    fn status(&self) -> Status {
        self.outcome(&self.legal_moves(self.side_to_move()))
    }

    /// Positional score from `side`'s point of view, ignoring whether the
    /// game is over. Must satisfy `heuristic(s) == -heuristic(s.opposite())`.
    fn heuristic(&self, side: Side) -> i32;

    /// Static score from `side`'s point of view, higher is better.
    /// Finished games score +/- MATE_SCORE or zero.
    fn evaluate(&self, side: Side) -> i32 {
        self.status()
            .score_for(self.side_to_move(), side)
            .unwrap_or_else(|| self.heuristic(side))
    }

    /// Identifies the position for repetition counting; clocks excluded
    fn position_key(&self) -> String;

    /// Writes the position as a diagram, fields included
    fn to_dsl(&self) -> String;
}

/// Represents a game with only legal moves taken and the positions that
/// resulted from them.
///
/// Owns exactly one current position. The initial position and the move
/// list are kept so that any earlier position can be rebuilt by replaying
/// the history; there is no inverse move.
#[derive(Debug, Clone)]
pub struct GameState<P: Position> {
    initial: P,
    current: P,
    history: Vec<Move<P::Kind>>,
    /// Side that played each move in `history`
    movers: Vec<Side>,
    /// Position keys of every position reached, starting with the initial one
    keys: Vec<String>,
}

impl<P: Position> GameState<P> {
    pub fn new(initial: P) -> GameState<P> {
        let keys = vec![initial.position_key()];
        GameState {
            current: initial.clone(),
            initial,
            history: Vec::new(),
            movers: Vec::new(),
            keys,
        }
    }

    pub fn current(&self) -> &P {
        &self.current
    }

    pub fn history(&self) -> &[Move<P::Kind>] {
        &self.history
    }

    pub fn movers(&self) -> &[Side] {
        &self.movers
    }

    /// Number of turns played; consecutive moves by the same side are one turn
    pub fn turns(&self) -> usize {
        self.movers.iter().dedup().count()
    }

    pub fn last_move(&self) -> Option<&Move<P::Kind>> {
        self.history.last()
    }

    /// Plays a move already known to be legal in the current position
    pub fn apply(&mut self, mv: Move<P::Kind>) {
        debug!(game = P::name(), "applying {}", mv);
        self.movers.push(self.current.side_to_move());
        self.current = self.current.apply(&mv);
        self.history.push(mv);
        self.keys.push(self.current.position_key());
    }

    /// Takes back the last `count` moves by replaying the rest of the
    /// history from the initial position
    pub fn undo(&mut self, count: usize) -> Result<()> {
        if count > self.history.len() {
            return Err(GameStateError::UndoError {
                requested: count,
                available: self.history.len(),
            });
        }

        let kept = self.history.len() - count;
        let replay: Vec<Move<P::Kind>> = self.history.drain(..).take(kept).collect();
        self.current = self.initial.clone();
        self.movers.clear();
        self.keys.truncate(1);
        for mv in replay {
            self.apply(mv);
        }
        Ok(())
    }

    /// How many times the current position has been reached
    pub fn repetitions(&self) -> usize {
        let current = self.keys.last();
        self.keys.iter().filter(|key| Some(*key) == current).count()
    }

    /// Status of the current position including draws that need the
    /// history to be seen
    pub fn status(&self) -> Status {
        let status = self.current.status();
        if status == Status::Ongoing && P::REPETITION_DRAWS && self.repetitions() >= 3 {
            return Status::Draw(DrawReason::Repetition);
        }
        status
    }
}
