use super::board::CheckersPosition;
use crate::piece::{CheckersKind, Side};

pub const MAN_VALUE: i32 = 100;
pub const KING_VALUE: i32 = 160;
/// Per rank a man has moved away from its own back rank
pub const ADVANCE_BONUS: i32 = 4;
/// Pieces on the a or h file cannot be jumped
pub const EDGE_BONUS: i32 = 5;
/// Men left on the back rank keep the opponent from crowning
pub const BACK_RANK_BONUS: i32 = 8;

impl CheckersPosition {
    pub fn positional_score(&self, side: Side) -> i32 {
        side.sign() * (self.side_score(Side::White) - self.side_score(Side::Black))
    }

    fn side_score(&self, side: Side) -> i32 {
        self.grid
            .pieces_of(side)
            .map(|(piece, square)| {
                let mut score = match piece.kind {
                    CheckersKind::Man => MAN_VALUE,
                    CheckersKind::King => KING_VALUE,
                };
                if square.file() == 0 || square.file() == 7 {
                    score += EDGE_BONUS;
                }
                if piece.kind == CheckersKind::Man {
                    let advanced = square.relative_rank(side) as i32;
                    score += ADVANCE_BONUS * advanced;
                    if advanced == 0 {
                        score += BACK_RANK_BONUS;
                    }
                }
                score
            })
            .sum()
    }
}
