use crate::constants::BOARD_SIZE;
use crate::piece::{Piece, PieceKind, Side};
use crate::square::Square;
use itertools::Itertools;

/// Represents the 8x8 playing surface shared by chess and checkers.
///
/// Every square holds at most one piece; squares are addressed only
/// through `Square`, which cannot name anything off the board. The grid
/// is a plain value: copying it is cheap, and positions built on top of
/// it hand out fresh copies instead of sharing one mutable board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Grid<K: PieceKind> {
    cells: [Option<Piece<K>>; BOARD_SIZE * BOARD_SIZE],
}

impl<K: PieceKind> Default for Grid<K> {
    fn default() -> Self {
        Grid::new()
    }
}

impl<K: PieceKind> Grid<K> {
    pub fn new() -> Grid<K> {
        Grid {
            cells: [None; BOARD_SIZE * BOARD_SIZE],
        }
    }

    /// Parses the board part of a diagram, see grid_dsl for the format
    #[cfg(test)]
    pub fn from_dsl(input: &str) -> Self {
        crate::grid_dsl::Parser::parse_grid(input).expect("Failed to parse input into Grid")
    }

    pub fn occupant_at(&self, square: Square) -> Option<Piece<K>> {
        self.cells[square.index()]
    }

    pub fn is_empty_at(&self, square: Square) -> bool {
        self.cells[square.index()].is_none()
    }

    /// Puts a piece on the square, returning whatever stood there before
    pub fn place(&mut self, piece: Piece<K>, square: Square) -> Option<Piece<K>> {
        self.cells[square.index()].replace(piece)
    }

    pub fn remove(&mut self, square: Square) -> Option<Piece<K>> {
        self.cells[square.index()].take()
    }

    /// Moves the piece on `from` to `to`, returning the piece that was
    /// standing on `to`
    pub fn move_piece(&mut self, from: Square, to: Square) -> Option<Piece<K>> {
        match self.remove(from) {
            Some(piece) => self.place(piece, to),
            None => None,
        }
    }

    /// Return pieces on the board in "board order", that is, from rank 8
    /// down to rank 1, then file a to h
    pub fn pieces(&self) -> Vec<(Piece<K>, Square)> {
        Grid::<K>::board_order()
            .filter_map(|square| self.occupant_at(square).map(|piece| (piece, square)))
            .collect()
    }

    pub fn pieces_of(&self, side: Side) -> impl Iterator<Item = (Piece<K>, Square)> + '_ {
        Grid::<K>::board_order().filter_map(move |square| match self.occupant_at(square) {
            Some(piece) if piece.side == side => Some((piece, square)),
            _ => None,
        })
    }

    pub fn find(&self, piece: Piece<K>) -> Option<Square> {
        Grid::<K>::board_order().find(|square| self.occupant_at(*square) == Some(piece))
    }

    pub fn count(&self, side: Side) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|piece| piece.side == side)
            .count()
    }

    pub fn num_pieces(&self) -> usize {
        self.cells.iter().flatten().count()
    }

    fn board_order() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE as u8)
            .rev()
            .cartesian_product(0..BOARD_SIZE as u8)
            .filter_map(|(rank, file)| Square::new(file, rank))
    }

    /// Outputs the grid as rows of the DSL, rank 8 first
    ///
    /// example:
    ///
    /// . . . . . . . k
    /// . . . . . . . .
    /// . . . . . . . .
    /// . . . . . . . .
    /// . . . . . . . .
    /// . . . . . . . .
    /// . . . . . . . .
    /// K . . . . . . q
    pub fn board_string(&self) -> String {
        let mut board = String::new();
        for rank in (0..BOARD_SIZE as u8).rev() {
            let row = (0..BOARD_SIZE as u8)
                .filter_map(|file| Square::new(file, rank))
                .map(|square| match self.occupant_at(square) {
                    Some(piece) => piece.to_char(),
                    None => '.',
                })
                .join(" ");
            board.push_str(&row);
            board.push('\n');
        }
        board
    }
}
