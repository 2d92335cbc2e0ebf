use crate::piece::{Piece, PieceError, PieceKind};
use crate::square::{Square, SquareError};
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MoveTextError {
    #[error("Move must look like e2e4 or e7e8q, got {0:?}")]
    Malformed(String),
    #[error(transparent)]
    Square(#[from] SquareError),
    #[error(transparent)]
    Piece(#[from] PieceError),
}

/// Tags for moves whose effect is more than "lift the piece, drop it on
/// the destination"
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Special {
    /// Pawn advanced two ranks and left an en-passant target behind it
    DoublePush,
    /// Pawn captured the pawn beside it by moving behind it
    EnPassant,
    /// King moved two files; the rook jumps to the king's other side
    Castle,
    /// Checkers jump after which the same piece must jump again
    MultiJump,
}

/// A transition from one position to the next.
///
/// Only meaningful relative to the position it was generated from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move<K: PieceKind> {
    pub from: Square,
    pub to: Square,
    /// Square of the piece removed by this move, if any. Equal to `to` for
    /// an ordinary chess capture.
    pub captured: Option<Square>,
    pub promotion: Option<K>,
    pub special: Option<Special>,
}

impl<K: PieceKind> Move<K> {
    pub fn quiet(from: Square, to: Square) -> Move<K> {
        Move {
            from,
            to,
            captured: None,
            promotion: None,
            special: None,
        }
    }

    pub fn capture(from: Square, to: Square, captured: Square) -> Move<K> {
        Move {
            captured: Some(captured),
            ..Move::quiet(from, to)
        }
    }

    pub fn with_promotion(self, kind: K) -> Move<K> {
        Move {
            promotion: Some(kind),
            ..self
        }
    }

    pub fn with_special(self, special: Special) -> Move<K> {
        Move {
            special: Some(special),
            ..self
        }
    }

    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// Whether this move is the one a player means by naming its origin,
    /// destination and (optionally) promotion piece
    pub fn matches(&self, from: Square, to: Square, promotion: Option<K>) -> bool {
        self.from == from && self.to == to && self.promotion == promotion
    }
}

/// Coordinate notation: origin, destination and a lowercase promotion letter
impl<K: PieceKind> fmt::Display for Move<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.to_char().to_ascii_lowercase())?;
        }
        Ok(())
    }
}

/// What a player typed: origin, destination and maybe a promotion piece
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MoveText<K: PieceKind> {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<K>,
}

impl<K: PieceKind> TryFrom<&str> for MoveText<K> {
    type Error = MoveTextError;

    /// Accepts `e2e4`, `e2 e4`, `e2-e4` and `e7e8q`
    fn try_from(text: &str) -> Result<MoveText<K>, MoveTextError> {
        let compact: String = text
            .trim()
            .chars()
            .filter(|c| *c != ' ' && *c != '-')
            .collect();
        if compact.len() < 4 || compact.len() > 5 || !compact.is_ascii() {
            return Err(MoveTextError::Malformed(text.to_string()));
        }

        let from = Square::try_from(&compact[0..2])?;
        let to = Square::try_from(&compact[2..4])?;
        let promotion = match compact[4..].chars().next() {
            Some(c) => Some(Piece::<K>::try_from_char(c)?.kind),
            None => None,
        };
        Ok(MoveText {
            from,
            to,
            promotion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::{CheckersKind, ChessKind};

    #[test]
    pub fn test_move_text() {
        let text = MoveText::<ChessKind>::try_from("e7e8q").unwrap();
        assert_eq!(text.from.to_string(), "e7");
        assert_eq!(text.to.to_string(), "e8");
        assert_eq!(text.promotion, Some(ChessKind::Queen));

        let text = MoveText::<ChessKind>::try_from(" e2-e4 ").unwrap();
        assert_eq!(text.promotion, None);
        let text = MoveText::<ChessKind>::try_from("g1 f3").unwrap();
        assert_eq!(text.to.to_string(), "f3");

        assert!(MoveText::<ChessKind>::try_from("e2").is_err());
        assert!(MoveText::<ChessKind>::try_from("e2e9").is_err());
        assert!(MoveText::<ChessKind>::try_from("e7e8x").is_err());
        assert!(MoveText::<CheckersKind>::try_from("c3d4q").is_err());
    }

    #[test]
    pub fn test_move_display() {
        let e7 = Square::try_from("e7").unwrap();
        let d8 = Square::try_from("d8").unwrap();
        let mv: Move<ChessKind> = Move::capture(e7, d8, d8).with_promotion(ChessKind::Knight);
        assert_eq!(mv.to_string(), "e7d8n");
        assert!(mv.is_capture());
        assert!(mv.matches(e7, d8, Some(ChessKind::Knight)));
        assert!(!mv.matches(e7, d8, None));
    }
}
