use std::fmt::Debug;
use std::hash::Hash;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PieceError {
    #[error("Character {0:?} does not name a piece")]
    UnknownPiece(char),
    #[error("Character {0:?} does not name a side")]
    UnknownSide(char),
}

type Result<T> = std::result::Result<T, PieceError>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    White,
    Black,
}

impl Side {
    pub fn opposite(&self) -> Side {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            Side::White => "White",
            Side::Black => "Black",
        }
    }

    pub fn to_char(&self) -> char {
        match self {
            Side::White => 'w',
            Side::Black => 'b',
        }
    }

    pub fn try_from_char(c: char) -> Result<Side> {
        match c.to_ascii_lowercase() {
            'w' => Ok(Side::White),
            'b' => Ok(Side::Black),
            _ => Err(PieceError::UnknownSide(c)),
        }
    }

    /// +1 for White, -1 for Black; used to fold per-side scores into one number
    pub fn sign(&self) -> i32 {
        match self {
            Side::White => 1,
            Side::Black => -1,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Side::White => 0,
            Side::Black => 1,
        }
    }
}

/// The closed set of piece kinds of one game.
///
/// Kinds are written as a single uppercase letter; the owning side is
/// carried by the letter's case when a whole piece is written.
pub trait PieceKind: Copy + Clone + Debug + PartialEq + Eq + Hash {
    fn to_char(&self) -> char;
    fn try_from_char(c: char) -> Result<Self>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChessKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl ChessKind {
    /// Kinds a pawn may promote to, in the order the search tries them
    pub const PROMOTIONS: [ChessKind; 4] = [
        ChessKind::Queen,
        ChessKind::Rook,
        ChessKind::Bishop,
        ChessKind::Knight,
    ];
}

impl PieceKind for ChessKind {
    fn to_char(&self) -> char {
        use ChessKind::*;
        match self {
            Pawn => 'P',
            Knight => 'N',
            Bishop => 'B',
            Rook => 'R',
            Queen => 'Q',
            King => 'K',
        }
    }

    fn try_from_char(c: char) -> Result<ChessKind> {
        use ChessKind::*;
        match c.to_ascii_uppercase() {
            'P' => Ok(Pawn),
            'N' => Ok(Knight),
            'B' => Ok(Bishop),
            'R' => Ok(Rook),
            'Q' => Ok(Queen),
            'K' => Ok(King),
            _ => Err(PieceError::UnknownPiece(c)),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CheckersKind {
    Man,
    /// A crowned man, free to move backwards
    King,
}

impl PieceKind for CheckersKind {
    fn to_char(&self) -> char {
        match self {
            CheckersKind::Man => 'M',
            CheckersKind::King => 'K',
        }
    }

    fn try_from_char(c: char) -> Result<CheckersKind> {
        match c.to_ascii_uppercase() {
            'M' => Ok(CheckersKind::Man),
            'K' => Ok(CheckersKind::King),
            _ => Err(PieceError::UnknownPiece(c)),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Piece<K: PieceKind> {
    pub kind: K,
    pub side: Side,
}

impl<K: PieceKind> Piece<K> {
    pub fn new(kind: K, side: Side) -> Piece<K> {
        Piece { kind, side }
    }

    /// Uppercase letter for white, lowercase for black
    pub fn to_char(&self) -> char {
        match self.side {
            Side::White => self.kind.to_char().to_ascii_uppercase(),
            Side::Black => self.kind.to_char().to_ascii_lowercase(),
        }
    }

    pub fn try_from_char(c: char) -> Result<Piece<K>> {
        let kind = K::try_from_char(c)?;
        let side = if c.is_ascii_uppercase() {
            Side::White
        } else {
            Side::Black
        };
        Ok(Piece::new(kind, side))
    }
}

#[test]
pub fn test_piece_letters() {
    let white_knight = Piece::new(ChessKind::Knight, Side::White);
    assert_eq!(white_knight.to_char(), 'N');
    assert_eq!(Piece::<ChessKind>::try_from_char('n').unwrap().side, Side::Black);
    assert_eq!(
        Piece::<CheckersKind>::try_from_char('K').unwrap(),
        Piece::new(CheckersKind::King, Side::White)
    );
    assert_eq!(
        Piece::<CheckersKind>::try_from_char('q'),
        Err(PieceError::UnknownPiece('q'))
    );
}

#[test]
pub fn test_side_opposite() {
    assert_eq!(Side::White.opposite(), Side::Black);
    assert_eq!(Side::Black.opposite().opposite(), Side::Black);
    assert_eq!(Side::White.sign() + Side::Black.sign(), 0);
}
