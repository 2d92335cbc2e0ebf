use crate::constants::BOARD_SIZE;
use crate::piece::Side;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SquareError {
    #[error("Square must be a file a-h followed by a rank 1-8, got {0:?}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, SquareError>;

/// Diagonal directions as seen from White's side of the board
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    NW,
    NE,
    SE,
    SW,
}

  //NW   NE
  //   X
  //SW   SE

impl Direction {
    pub fn all() -> [Direction; 4] {
        use Direction::*;
        [NW, NE, SE, SW]
    }

    /// The two diagonals that move toward the opponent's back rank
    pub fn forward(side: Side) -> [Direction; 2] {
        use Direction::*;
        match side {
            Side::White => [NW, NE],
            Side::Black => [SW, SE],
        }
    }

    pub fn delta(&self) -> (i8, i8) {
        use Direction::*;
        match self {
            NW => (-1, 1),
            NE => (1, 1),
            SE => (1, -1),
            SW => (-1, -1),
        }
    }
}

/// A coordinate on the 8x8 board.
///
/// Files a-h map to 0-7 and ranks 1-8 map to 0-7, so rank 0 is White's
/// back rank. A Square can only be constructed inside the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    pub fn new(file: u8, rank: u8) -> Option<Square> {
        if (file as usize) < BOARD_SIZE && (rank as usize) < BOARD_SIZE {
            Some(Square { file, rank })
        } else {
            None
        }
    }

    pub fn file(&self) -> u8 {
        self.file
    }

    pub fn rank(&self) -> u8 {
        self.rank
    }

    /// Row-major index, a1 = 0 and h8 = 63
    pub fn index(&self) -> usize {
        self.rank as usize * BOARD_SIZE + self.file as usize
    }

    pub fn from_index(index: usize) -> Option<Square> {
        if index >= BOARD_SIZE * BOARD_SIZE {
            return None;
        }
        Square::new((index % BOARD_SIZE) as u8, (index / BOARD_SIZE) as u8)
    }

    /// Returns the square displaced by (files, ranks), or None if it
    /// would fall off the board
    pub fn offset(&self, files: i8, ranks: i8) -> Option<Square> {
        let file = self.file as i8 + files;
        let rank = self.rank as i8 + ranks;
        if file < 0 || rank < 0 {
            return None;
        }
        Square::new(file as u8, rank as u8)
    }

    pub fn apply(&self, direction: Direction) -> Option<Square> {
        let (files, ranks) = direction.delta();
        self.offset(files, ranks)
    }

    /// Dark squares are the playable squares in checkers (a1 is dark)
    pub fn is_dark(&self) -> bool {
        (self.file + self.rank) % 2 == 0
    }

    /// Ranks travelled from `side`'s own back rank
    pub fn relative_rank(&self, side: Side) -> u8 {
        match side {
            Side::White => self.rank,
            Side::Black => (BOARD_SIZE as u8 - 1) - self.rank,
        }
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE * BOARD_SIZE).filter_map(Square::from_index)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", (b'a' + self.file) as char, self.rank + 1)
    }
}

impl TryFrom<&str> for Square {
    type Error = SquareError;
    fn try_from(s: &str) -> Result<Square> {
        let bytes = s.as_bytes();
        if bytes.len() != 2 {
            return Err(SquareError::Malformed(s.to_string()));
        }
        let file = bytes[0].to_ascii_lowercase().wrapping_sub(b'a');
        let rank = bytes[1].wrapping_sub(b'1');
        Square::new(file, rank).ok_or_else(|| SquareError::Malformed(s.to_string()))
    }
}

impl std::str::FromStr for Square {
    type Err = SquareError;
    fn from_str(s: &str) -> Result<Square> {
        Square::try_from(s)
    }
}
