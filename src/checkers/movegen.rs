use super::board::{CheckersMove, CheckersPosition};
use crate::grid::Grid;
use crate::moves::{Move, Special};
use crate::piece::{CheckersKind, Piece, Side};
use crate::square::{Direction, Square};

/// Men only move toward the opponent; kings move both ways
fn directions(piece: Piece<CheckersKind>) -> Vec<Direction> {
    match piece.kind {
        CheckersKind::Man => Direction::forward(piece.side).to_vec(),
        CheckersKind::King => Direction::all().to_vec(),
    }
}

/// Jumps available to `piece` standing on `from`, as (landing, jumped) pairs
fn jumps_from(grid: &Grid<CheckersKind>, from: Square, piece: Piece<CheckersKind>) -> Vec<(Square, Square)> {
    directions(piece)
        .into_iter()
        .filter_map(|direction| {
            let over = from.apply(direction)?;
            let landing = over.apply(direction)?;
            match grid.occupant_at(over) {
                Some(enemy) if enemy.side != piece.side && grid.is_empty_at(landing) => {
                    Some((landing, over))
                }
                _ => None,
            }
        })
        .collect()
}

impl CheckersPosition {
    /// Every jump the piece on `from` can make, each tagged as a multi-jump
    /// when the same piece could jump again from where it lands
    fn jumps(&self, from: Square, piece: Piece<CheckersKind>) -> Vec<CheckersMove> {
        jumps_from(&self.grid, from, piece)
            .into_iter()
            .map(|(landing, over)| {
                let jump = Move::capture(from, landing, over);
                let landed = CheckersPosition::landed(piece, landing);
                if landed.kind != piece.kind {
                    // Crowning ends the move
                    return jump;
                }
                let mut after = self.grid;
                after.remove(over);
                after.move_piece(from, landing);
                if jumps_from(&after, landing, piece).is_empty() {
                    jump
                } else {
                    jump.with_special(Special::MultiJump)
                }
            })
            .collect()
    }

    fn steps(&self, from: Square, piece: Piece<CheckersKind>) -> Vec<CheckersMove> {
        directions(piece)
            .into_iter()
            .filter_map(|direction| from.apply(direction))
            .filter(|to| self.grid.is_empty_at(*to))
            .map(|to| Move::quiet(from, to))
            .collect()
    }

    /// Legal moves with forced capture applied. During a multi-jump only
    /// the jumping piece may move, and only by jumping again.
    pub fn generate_moves(&self, side: Side) -> Vec<CheckersMove> {
        if let (Some(pending), true) = (self.pending_jump, side == self.side_to_move) {
            return match self.grid.occupant_at(pending) {
                Some(piece) if piece.side == side => self.jumps(pending, piece),
                _ => vec![],
            };
        }

        let pieces = self.grid.pieces_of(side).collect::<Vec<_>>();
        let jumps = pieces
            .iter()
            .flat_map(|(piece, from)| self.jumps(*from, *piece))
            .collect::<Vec<_>>();
        if !jumps.is_empty() {
            return jumps;
        }
        pieces
            .iter()
            .flat_map(|(piece, from)| self.steps(*from, *piece))
            .collect()
    }
}
