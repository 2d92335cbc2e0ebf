use crate::game::Status;
use crate::grid::Grid;
use crate::grid_dsl::{Diagram, Parser, ParserError};
use crate::moves::{Move, Special};
use crate::piece::{CheckersKind, Piece, Side};
use crate::square::Square;

pub type CheckersMove = Move<CheckersKind>;

/// A checkers position.
///
/// Pieces only ever stand on dark squares. While a multi-jump is under
/// way `pending_jump` holds the square the jumping piece landed on and the
/// same side stays to move.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CheckersPosition {
    pub(super) grid: Grid<CheckersKind>,
    pub(super) side_to_move: Side,
    pub(super) pending_jump: Option<Square>,
}

impl CheckersPosition {
    /// Twelve men each on the dark squares of the three nearest ranks;
    /// White starts at the bottom and moves first
    pub fn start() -> CheckersPosition {
        let mut grid = Grid::new();
        for square in Square::all().filter(|square| square.is_dark()) {
            let side = match square.rank() {
                0..=2 => Side::White,
                5..=7 => Side::Black,
                _ => continue,
            };
            grid.place(Piece::new(CheckersKind::Man, side), square);
        }
        CheckersPosition::from_grid(grid, Side::White)
    }

    pub fn from_grid(grid: Grid<CheckersKind>, side_to_move: Side) -> CheckersPosition {
        CheckersPosition {
            grid,
            side_to_move,
            pending_jump: None,
        }
    }

    pub fn grid(&self) -> &Grid<CheckersKind> {
        &self.grid
    }

    pub fn pending_jump(&self) -> Option<Square> {
        self.pending_jump
    }

    /// Plays a move generated from this position. A move tagged as a
    /// multi-jump leaves the same side to move.
    pub fn play(&self, mv: &CheckersMove) -> CheckersPosition {
        let mut next = self.clone();
        let Some(piece) = next.grid.remove(mv.from) else {
            return next;
        };
        if let Some(captured) = mv.captured {
            next.grid.remove(captured);
        }
        next.grid.place(CheckersPosition::landed(piece, mv.to), mv.to);

        if mv.special == Some(Special::MultiJump) {
            next.pending_jump = Some(mv.to);
            next.side_to_move = piece.side;
        } else {
            next.pending_jump = None;
            next.side_to_move = piece.side.opposite();
        }
        next
    }

    /// The piece as it stands after arriving on `to`; men reaching the far
    /// rank are crowned
    pub(super) fn landed(piece: Piece<CheckersKind>, to: Square) -> Piece<CheckersKind> {
        if piece.kind == CheckersKind::Man && to.relative_rank(piece.side) == 7 {
            Piece::new(CheckersKind::King, piece.side)
        } else {
            piece
        }
    }

    /// A side with no legal moves, including a side with no pieces, loses
    pub fn status_with(&self, legal: &[CheckersMove]) -> Status {
        if legal.is_empty() {
            Status::NoLegalMoves
        } else {
            Status::Ongoing
        }
    }

    pub fn key(&self) -> String {
        format!(
            "{} {} {}",
            self.grid.board_string().trim_end().replace('\n', "/"),
            self.side_to_move.to_char(),
            self.pending_jump.map_or("-".to_string(), |square| square.to_string()),
        )
    }

    pub fn to_dsl(&self) -> String {
        format!(
            "{}\nturn - [ {} ]\npending - [ {} ]\n",
            self.grid.board_string(),
            self.side_to_move.to_char(),
            self.pending_jump.map_or(String::new(), |square| square.to_string()),
        )
    }

    /// Builds a position from a diagram with optional `turn` and `pending`
    /// fields. Pieces on light squares are rejected.
    pub fn from_dsl(input: &str) -> Result<CheckersPosition, ParserError> {
        let diagram: Diagram<CheckersKind> = Parser::parse_diagram(input)?;
        let invalid = |field: &str, values: &[String]| ParserError::FieldValueError {
            field: field.to_string(),
            value: values.join(" "),
        };

        if let Some((_, square)) = diagram
            .grid
            .pieces()
            .into_iter()
            .find(|(_, square)| !square.is_dark())
        {
            return Err(ParserError::ParseError(format!(
                "Checkers pieces must stand on dark squares, found one on {}",
                square
            )));
        }

        let side = match diagram.field("turn") {
            None => Side::White,
            Some([value]) if value.len() == 1 => value
                .chars()
                .next()
                .and_then(|c| Side::try_from_char(c).ok())
                .ok_or_else(|| invalid("turn", &[value.clone()]))?,
            Some(values) => return Err(invalid("turn", values)),
        };

        let mut position = CheckersPosition::from_grid(diagram.grid, side);
        position.pending_jump = match diagram.field("pending") {
            None | Some([]) => None,
            Some([value]) => {
                let square = Square::try_from(value.as_str())
                    .map_err(|_| invalid("pending", &[value.clone()]))?;
                match position.grid.occupant_at(square) {
                    Some(piece) if piece.side == side => Some(square),
                    _ => return Err(invalid("pending", &[value.clone()])),
                }
            }
            Some(values) => return Err(invalid("pending", values)),
        };
        Ok(position)
    }
}
