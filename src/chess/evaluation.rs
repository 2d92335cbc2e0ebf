use super::board::ChessPosition;
use crate::piece::{ChessKind, Side};
use crate::square::Square;

pub const PAWN_VALUE: i32 = 100;
pub const KNIGHT_VALUE: i32 = 300;
pub const BISHOP_VALUE: i32 = 300;
pub const ROOK_VALUE: i32 = 500;
pub const QUEEN_VALUE: i32 = 900;

/// Bonus for any piece standing on d4, e4, d5 or e5
pub const CENTER_BONUS: i32 = 10;
/// Per square a knight, bishop, rook or queen could move to
pub const MOBILITY_BONUS: i32 = 2;
/// Charged for a king off its back rank while queens are on the board
pub const EXPOSED_KING_PENALTY: i32 = 20;

pub fn piece_value(kind: ChessKind) -> i32 {
    match kind {
        ChessKind::Pawn => PAWN_VALUE,
        ChessKind::Knight => KNIGHT_VALUE,
        ChessKind::Bishop => BISHOP_VALUE,
        ChessKind::Rook => ROOK_VALUE,
        ChessKind::Queen => QUEEN_VALUE,
        ChessKind::King => 0,
    }
}

fn is_center(square: Square) -> bool {
    (3..=4).contains(&square.file()) && (3..=4).contains(&square.rank())
}

impl ChessPosition {
    /// Material, centre control, mobility and king exposure for `side`
    /// minus the same for its opponent
    pub fn positional_score(&self, side: Side) -> i32 {
        side.sign() * (self.side_score(Side::White) - self.side_score(Side::Black))
    }

    fn side_score(&self, side: Side) -> i32 {
        let queens_on_board = self
            .grid
            .pieces()
            .iter()
            .any(|(piece, _)| piece.kind == ChessKind::Queen);

        let mut score = 0;
        for (piece, square) in self.grid.pieces_of(side) {
            score += piece_value(piece.kind);
            if is_center(square) {
                score += CENTER_BONUS;
            }
            match piece.kind {
                ChessKind::Knight | ChessKind::Bishop | ChessKind::Rook | ChessKind::Queen => {
                    score += MOBILITY_BONUS * self.targets(square, piece).len() as i32;
                }
                ChessKind::King if queens_on_board && square.relative_rank(side) != 0 => {
                    score -= EXPOSED_KING_PENALTY;
                }
                _ => {}
            }
        }
        score
    }
}
