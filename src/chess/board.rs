use crate::game::{DrawReason, Status};
use crate::grid::Grid;
use crate::grid_dsl::{Diagram, Parser, ParserError};
use crate::moves::{Move, Special};
use crate::piece::{ChessKind, Piece, Side};
use crate::square::Square;
use itertools::Itertools;

pub type ChessMove = Move<ChessKind>;

/// Castling availability, indexed as K Q k q
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct CastlingRights([bool; 4]);

impl CastlingRights {
    const LETTERS: [char; 4] = ['K', 'Q', 'k', 'q'];

    pub fn all() -> CastlingRights {
        CastlingRights([true; 4])
    }

    pub fn none() -> CastlingRights {
        CastlingRights([false; 4])
    }

    fn index(side: Side, kingside: bool) -> usize {
        side.index() * 2 + if kingside { 0 } else { 1 }
    }

    pub fn has(&self, side: Side, kingside: bool) -> bool {
        self.0[CastlingRights::index(side, kingside)]
    }

    pub fn clear(&mut self, side: Side, kingside: bool) {
        self.0[CastlingRights::index(side, kingside)] = false;
    }

    pub fn clear_side(&mut self, side: Side) {
        self.clear(side, true);
        self.clear(side, false);
    }

    /// Drops whichever right depends on a rook standing on `corner`
    fn clear_corner(&mut self, corner: Square) {
        let side = match corner.rank() {
            0 => Side::White,
            7 => Side::Black,
            _ => return,
        };
        match corner.file() {
            0 => self.clear(side, false),
            7 => self.clear(side, true),
            _ => {}
        }
    }

    fn letters(&self) -> Vec<String> {
        CastlingRights::LETTERS
            .iter()
            .zip(self.0.iter())
            .filter(|(_, allowed)| **allowed)
            .map(|(letter, _)| letter.to_string())
            .collect()
    }

    fn from_letters(values: &[String]) -> Result<CastlingRights, ParserError> {
        let mut rights = CastlingRights::none();
        for value in values {
            let position = CastlingRights::LETTERS
                .iter()
                .position(|letter| value.len() == 1 && value.starts_with(*letter))
                .ok_or_else(|| ParserError::FieldValueError {
                    field: "castling".to_string(),
                    value: value.clone(),
                })?;
            rights.0[position] = true;
        }
        Ok(rights)
    }
}

/// A chess position: piece placement plus everything else the rules look at.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChessPosition {
    pub(super) grid: Grid<ChessKind>,
    pub(super) side_to_move: Side,
    pub(super) castling: CastlingRights,
    /// Square skipped by the last double pawn push
    pub(super) en_passant: Option<Square>,
    /// Plies since the last pawn move or capture
    pub(super) halfmove: u32,
    pub(super) fullmove: u32,
    /// Cached king squares, indexed by side
    pub(super) kings: [Option<Square>; 2],
}

impl ChessPosition {
    pub fn start() -> ChessPosition {
        use ChessKind::*;
        let back_rank = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];
        let mut grid = Grid::new();
        for (file, kind) in back_rank.iter().enumerate() {
            let file = file as u8;
            for (side, back, pawns) in [(Side::White, 0, 1), (Side::Black, 7, 6)] {
                if let Some(square) = Square::new(file, back) {
                    grid.place(Piece::new(*kind, side), square);
                }
                if let Some(square) = Square::new(file, pawns) {
                    grid.place(Piece::new(Pawn, side), square);
                }
            }
        }
        ChessPosition {
            castling: CastlingRights::all(),
            ..ChessPosition::from_grid(grid, Side::White)
        }
    }

    /// A position with the given placement, no castling rights and fresh clocks
    pub fn from_grid(grid: Grid<ChessKind>, side_to_move: Side) -> ChessPosition {
        let king = |side| grid.find(Piece::new(ChessKind::King, side));
        let kings = [king(Side::White), king(Side::Black)];
        ChessPosition {
            grid,
            side_to_move,
            castling: CastlingRights::none(),
            en_passant: None,
            halfmove: 0,
            fullmove: 1,
            kings,
        }
    }

    pub fn grid(&self) -> &Grid<ChessKind> {
        &self.grid
    }

    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove
    }

    pub fn king_square(&self, side: Side) -> Option<Square> {
        self.kings[side.index()]
    }

    /// Plays a move generated from this position and returns the result.
    /// The receiver is left as it was.
    pub fn play(&self, mv: &ChessMove) -> ChessPosition {
        let mut next = self.clone();
        let Some(piece) = next.grid.remove(mv.from) else {
            return next;
        };
        if let Some(captured) = mv.captured {
            next.grid.remove(captured);
        }
        let landed = match mv.promotion {
            Some(kind) => Piece::new(kind, piece.side),
            None => piece,
        };
        next.grid.place(landed, mv.to);

        if mv.special == Some(Special::Castle) {
            let rank = mv.from.rank();
            let (rook_from, rook_to) = if mv.to.file() > mv.from.file() {
                (7, 5)
            } else {
                (0, 3)
            };
            if let (Some(from), Some(to)) = (Square::new(rook_from, rank), Square::new(rook_to, rank)) {
                next.grid.move_piece(from, to);
            }
        }

        if piece.kind == ChessKind::King {
            next.kings[piece.side.index()] = Some(mv.to);
            next.castling.clear_side(piece.side);
        }
        next.castling.clear_corner(mv.from);
        next.castling.clear_corner(mv.to);

        next.en_passant = match mv.special {
            Some(Special::DoublePush) => Square::new(mv.from.file(), (mv.from.rank() + mv.to.rank()) / 2),
            _ => None,
        };

        if piece.kind == ChessKind::Pawn || mv.is_capture() {
            next.halfmove = 0;
        } else {
            next.halfmove = next.halfmove.saturating_add(1);
        }
        if piece.side == Side::Black {
            next.fullmove = next.fullmove.saturating_add(1);
        }
        next.side_to_move = piece.side.opposite();
        next
    }

    /// Status given the legal moves of the side to move
    pub fn status_with(&self, legal: &[ChessMove]) -> Status {
        if legal.is_empty() {
            return if self.is_in_check(self.side_to_move) {
                Status::Checkmate
            } else {
                Status::Stalemate
            };
        }
        if self.halfmove >= 100 {
            return Status::Draw(DrawReason::FiftyMoveRule);
        }
        if self.insufficient_material() {
            return Status::Draw(DrawReason::InsufficientMaterial);
        }
        Status::Ongoing
    }

    /// Neither side can ever deliver mate: K v K, K v K and one minor
    /// piece, or K+B v K+B with both bishops on the same colour
    pub fn insufficient_material(&self) -> bool {
        let others = self
            .grid
            .pieces()
            .into_iter()
            .filter(|(piece, _)| piece.kind != ChessKind::King)
            .collect::<Vec<_>>();
        match others.as_slice() {
            [] => true,
            [(piece, _)] => matches!(piece.kind, ChessKind::Knight | ChessKind::Bishop),
            [(a, a_square), (b, b_square)] => {
                a.kind == ChessKind::Bishop
                    && b.kind == ChessKind::Bishop
                    && a.side != b.side
                    && a_square.is_dark() == b_square.is_dark()
            }
            _ => false,
        }
    }

    /// Board, side to move, castling rights and en-passant target
    pub fn key(&self) -> String {
        let rights = self.castling.letters().join("");
        format!(
            "{} {} {} {}",
            self.grid.board_string().trim_end().replace('\n', "/"),
            self.side_to_move.to_char(),
            if rights.is_empty() { "-".to_string() } else { rights },
            self.en_passant.map_or("-".to_string(), |square| square.to_string()),
        )
    }

    pub fn to_dsl(&self) -> String {
        format!(
            "{}\nturn - [ {} ]\ncastling - [ {} ]\nen-passant - [ {} ]\nclocks - [ {} {} ]\n",
            self.grid.board_string(),
            self.side_to_move.to_char(),
            self.castling.letters().join(" "),
            self.en_passant.map_or(String::new(), |square| square.to_string()),
            self.halfmove,
            self.fullmove,
        )
    }

    /// Builds a position from a diagram. Recognised fields are `turn`,
    /// `castling`, `en-passant` and `clocks`; all are optional.
    pub fn from_dsl(input: &str) -> Result<ChessPosition, ParserError> {
        let diagram: Diagram<ChessKind> = Parser::parse_diagram(input)?;
        let invalid = |field: &str, values: &[String]| ParserError::FieldValueError {
            field: field.to_string(),
            value: values.join(" "),
        };

        let side = match diagram.field("turn") {
            None => Side::White,
            Some([value]) if value.len() == 1 => value
                .chars()
                .next()
                .and_then(|c| Side::try_from_char(c).ok())
                .ok_or_else(|| invalid("turn", &[value.clone()]))?,
            Some(values) => return Err(invalid("turn", values)),
        };

        let mut position = ChessPosition::from_grid(diagram.grid, side);
        if let Some(values) = diagram.field("castling") {
            position.castling = CastlingRights::from_letters(values)?;
        }
        position.en_passant = match diagram.field("en-passant") {
            None | Some([]) => None,
            Some([value]) => Some(
                Square::try_from(value.as_str()).map_err(|_| invalid("en-passant", &[value.clone()]))?,
            ),
            Some(values) => return Err(invalid("en-passant", values)),
        };
        if let Some(values) = diagram.field("clocks") {
            let clocks = values
                .iter()
                .map(|value| value.parse::<u32>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|_| invalid("clocks", values))?;
            let Some((halfmove, fullmove)) = clocks.into_iter().collect_tuple() else {
                return Err(invalid("clocks", values));
            };
            position.halfmove = halfmove;
            position.fullmove = fullmove;
        }
        Ok(position)
    }
}
