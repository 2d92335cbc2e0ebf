//! Chess rules on the shared 8x8 grid

mod board;
mod evaluation;
mod movegen;

pub use board::{ChessMove, ChessPosition};

use crate::game::{Position, Status};
use crate::piece::{ChessKind, Piece, Side};
use crate::square::Square;

impl Position for ChessPosition {
    type Kind = ChessKind;

    const REPETITION_DRAWS: bool = true;

    fn name() -> &'static str {
        "chess"
    }

    fn initial() -> Self {
        ChessPosition::start()
    }

    fn side_to_move(&self) -> Side {
        self.side_to_move
    }

    fn occupant_at(&self, square: Square) -> Option<Piece<ChessKind>> {
        self.grid.occupant_at(square)
    }

    fn legal_moves(&self, side: Side) -> Vec<ChessMove> {
        self.generate_moves(side)
    }

    fn apply(&self, mv: &ChessMove) -> Self {
        self.play(mv)
    }

    fn outcome(&self, legal: &[ChessMove]) -> Status {
        self.status_with(legal)
    }

    fn heuristic(&self, side: Side) -> i32 {
        self.positional_score(side)
    }

    fn position_key(&self) -> String {
        self.key()
    }

    fn to_dsl(&self) -> String {
        ChessPosition::to_dsl(self)
    }
}
