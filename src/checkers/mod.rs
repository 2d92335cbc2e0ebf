//! Checkers (English draughts) rules on the shared 8x8 grid

mod board;
mod evaluation;
mod movegen;

pub use board::{CheckersMove, CheckersPosition};

use crate::game::{Position, Status};
use crate::piece::{CheckersKind, Piece, Side};
use crate::square::Square;

impl Position for CheckersPosition {
    type Kind = CheckersKind;

    const REPETITION_DRAWS: bool = false;

    fn name() -> &'static str {
        "checkers"
    }

    fn initial() -> Self {
        CheckersPosition::start()
    }

    fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    fn occupant_at(&self, square: Square) -> Option<Piece<CheckersKind>> {
        self.grid.occupant_at(square)
    }

    fn legal_moves(&self, side: Side) -> Vec<CheckersMove> {
        self.generate_moves(side)
    }

    fn apply(&self, mv: &CheckersMove) -> Self {
        self.play(mv)
    }

    fn outcome(&self, legal: &[CheckersMove]) -> Status {
        self.status_with(legal)
    }

    fn heuristic(&self, side: Side) -> i32 {
        self.positional_score(side)
    }

    fn position_key(&self) -> String {
        self.key()
    }

    fn to_dsl(&self) -> String {
        CheckersPosition::to_dsl(self)
    }
}
