use super::board::{ChessMove, ChessPosition};
use crate::moves::{Move, Special};
use crate::piece::{ChessKind, Piece, Side};
use crate::square::Square;

pub const ROOK_DIRS: [(i8, i8); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
pub const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub const QUEEN_DIRS: [(i8, i8); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];
pub const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// Unit directions for sliding pieces
fn slide_dirs(kind: ChessKind) -> &'static [(i8, i8)] {
    match kind {
        ChessKind::Queen => &QUEEN_DIRS,
        ChessKind::Rook => &ROOK_DIRS,
        ChessKind::Bishop => &BISHOP_DIRS,
        _ => &[],
    }
}

fn pawn_direction(side: Side) -> i8 {
    match side {
        Side::White => 1,
        Side::Black => -1,
    }
}

impl ChessPosition {
    /// True iff `target` is attacked by any piece of side `by`
    pub fn attacked_by(&self, target: Square, by: Side) -> bool {
        let holds = |square: Option<Square>, kinds: &[ChessKind]| match square
            .and_then(|square| self.grid.occupant_at(square))
        {
            Some(piece) => piece.side == by && kinds.contains(&piece.kind),
            None => false,
        };

        let behind = -pawn_direction(by);
        if holds(target.offset(-1, behind), &[ChessKind::Pawn])
            || holds(target.offset(1, behind), &[ChessKind::Pawn])
        {
            return true;
        }
        if KNIGHT_DELTAS
            .iter()
            .any(|(files, ranks)| holds(target.offset(*files, *ranks), &[ChessKind::Knight]))
        {
            return true;
        }
        if QUEEN_DIRS
            .iter()
            .any(|(files, ranks)| holds(target.offset(*files, *ranks), &[ChessKind::King]))
        {
            return true;
        }

        let rays = [
            (&ROOK_DIRS, [ChessKind::Rook, ChessKind::Queen]),
            (&BISHOP_DIRS, [ChessKind::Bishop, ChessKind::Queen]),
        ];
        for (dirs, sliders) in rays {
            for (files, ranks) in dirs {
                if holds(self.first_occupied(target, *files, *ranks), &sliders) {
                    return true;
                }
            }
        }
        false
    }

    /// First occupied square along a ray from `from`, not counting `from`
    fn first_occupied(&self, from: Square, files: i8, ranks: i8) -> Option<Square> {
        let mut current = from.offset(files, ranks);
        while let Some(square) = current {
            if !self.grid.is_empty_at(square) {
                return Some(square);
            }
            current = square.offset(files, ranks);
        }
        None
    }

    pub fn is_in_check(&self, side: Side) -> bool {
        match self.king_square(side) {
            Some(king) => self.attacked_by(king, side.opposite()),
            None => false,
        }
    }

    /// Squares a knight, bishop, rook, queen or king on `from` could move to,
    /// ignoring checks. Pawns are handled separately.
    pub fn targets(&self, from: Square, piece: Piece<ChessKind>) -> Vec<Square> {
        let open = |square: Square| match self.grid.occupant_at(square) {
            Some(other) => other.side != piece.side,
            None => true,
        };
        match piece.kind {
            ChessKind::Knight => KNIGHT_DELTAS
                .iter()
                .filter_map(|(files, ranks)| from.offset(*files, *ranks))
                .filter(|square| open(*square))
                .collect(),
            ChessKind::King => QUEEN_DIRS
                .iter()
                .filter_map(|(files, ranks)| from.offset(*files, *ranks))
                .filter(|square| open(*square))
                .collect(),
            ChessKind::Pawn => vec![],
            kind => {
                let mut squares = vec![];
                for (files, ranks) in slide_dirs(kind) {
                    let mut current = from.offset(*files, *ranks);
                    while let Some(square) = current {
                        if open(square) {
                            squares.push(square);
                        }
                        if !self.grid.is_empty_at(square) {
                            break;
                        }
                        current = square.offset(*files, *ranks);
                    }
                }
                squares
            }
        }
    }

    fn pawn_moves(&self, from: Square, side: Side, moves: &mut Vec<ChessMove>) {
        let forward = pawn_direction(side);
        let promotes = |to: Square| to.relative_rank(side) == 7;
        let mut push = |mv: ChessMove| {
            if promotes(mv.to) {
                moves.extend(
                    ChessKind::PROMOTIONS
                        .iter()
                        .map(|kind| mv.with_promotion(*kind)),
                );
            } else {
                moves.push(mv);
            }
        };

        if let Some(one) = from.offset(0, forward).filter(|to| self.grid.is_empty_at(*to)) {
            push(Move::quiet(from, one));
            if from.relative_rank(side) == 1 {
                if let Some(two) = one.offset(0, forward).filter(|to| self.grid.is_empty_at(*to)) {
                    push(Move::quiet(from, two).with_special(Special::DoublePush));
                }
            }
        }

        for files in [-1, 1] {
            let Some(to) = from.offset(files, forward) else {
                continue;
            };
            match self.grid.occupant_at(to) {
                Some(other) if other.side != side => push(Move::capture(from, to, to)),
                None if side == self.side_to_move && self.en_passant == Some(to) => {
                    if let Some(passed) = to.offset(0, -forward) {
                        push(Move::capture(from, to, passed).with_special(Special::EnPassant));
                    }
                }
                _ => {}
            }
        }
    }

    fn castling_moves(&self, side: Side, moves: &mut Vec<ChessMove>) {
        let rank = match side {
            Side::White => 0,
            Side::Black => 7,
        };
        let Some(king) = Square::new(4, rank) else {
            return;
        };
        if self.king_square(side) != Some(king) || self.attacked_by(king, side.opposite()) {
            return;
        }
        let rook = Piece::new(ChessKind::Rook, side);

        // (kingside, rook file, files that must be empty, files the king crosses)
        let wings: [(bool, u8, &[u8], [u8; 2]); 2] =
            [(true, 7, &[5, 6], [5, 6]), (false, 0, &[1, 2, 3], [3, 2])];
        for (kingside, rook_file, between, crossed) in wings {
            if !self.castling.has(side, kingside) {
                continue;
            }
            let rook_home = Square::new(rook_file, rank);
            if rook_home.and_then(|square| self.grid.occupant_at(square)) != Some(rook) {
                continue;
            }
            let clear = between
                .iter()
                .filter_map(|file| Square::new(*file, rank))
                .all(|square| self.grid.is_empty_at(square));
            let safe = crossed
                .iter()
                .filter_map(|file| Square::new(*file, rank))
                .all(|square| !self.attacked_by(square, side.opposite()));
            if let (true, true, Some(to)) = (clear, safe, Square::new(crossed[1], rank)) {
                moves.push(Move::quiet(king, to).with_special(Special::Castle));
            }
        }
    }

    /// Moves obeying piece geometry that may still leave the king in check
    pub fn pseudo_legal_moves(&self, side: Side) -> Vec<ChessMove> {
        let mut moves = vec![];
        for (piece, from) in self.grid.pieces_of(side) {
            if piece.kind == ChessKind::Pawn {
                self.pawn_moves(from, side, &mut moves);
                continue;
            }
            for to in self.targets(from, piece) {
                if self.grid.is_empty_at(to) {
                    moves.push(Move::quiet(from, to));
                } else {
                    moves.push(Move::capture(from, to, to));
                }
            }
        }
        self.castling_moves(side, &mut moves);
        moves
    }

    pub fn generate_moves(&self, side: Side) -> Vec<ChessMove> {
        self.pseudo_legal_moves(side)
            .into_iter()
            .filter(|mv| !self.play(mv).is_in_check(side))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Position, Status};
    use crate::testing_utils::{move_strings, positions};

    fn perft(position: &ChessPosition, depth: usize) -> usize {
        if depth == 0 {
            return 1;
        }
        position
            .legal_moves(position.side_to_move())
            .iter()
            .map(|mv| perft(&position.play(mv), depth - 1))
            .sum()
    }

    #[test]
    pub fn test_perft_from_start() {
        let start = ChessPosition::start();
        assert_eq!(perft(&start, 1), 20);
        assert_eq!(perft(&start, 2), 400);
        assert_eq!(perft(&start, 3), 8902);
    }

    #[test]
    pub fn test_queen_and_rook_mate_cornered_king() {
        let position = ChessPosition::from_dsl(positions::CORNER_MATE).unwrap();
        assert!(position.is_in_check(Side::White));
        assert!(position.legal_moves(Side::White).is_empty());
        assert_eq!(position.status(), Status::Checkmate);
    }

    #[test]
    pub fn test_lone_queen_check_is_not_mate() {
        // With only the queen on h1 the king walks out to a2 or b2
        let position = ChessPosition::from_dsl(positions::CORNER_CHECK).unwrap();
        assert!(position.is_in_check(Side::White));
        assert_eq!(
            move_strings(&position.legal_moves(Side::White)),
            vec!["a1a2", "a1b2"]
        );
        assert_eq!(position.status(), Status::Ongoing);
    }

    #[test]
    pub fn test_stalemate() {
        let position = ChessPosition::from_dsl(concat!(
            "k . . . . . . .\n",
            ". . Q . . . . .\n",
            ". K . . . . . .\n",
            ". . . . . . . .\n",
            ". . . . . . . .\n",
            ". . . . . . . .\n",
            ". . . . . . . .\n",
            ". . . . . . . .\n",
            "\n",
            "turn - [ b ]\n",
        ))
        .unwrap();
        assert!(!position.is_in_check(Side::Black));
        assert_eq!(position.status(), Status::Stalemate);
    }

    #[test]
    pub fn test_legal_moves_never_leave_king_in_check() {
        // The knight on d2 is pinned against the king by the bishop on b4
        let position = ChessPosition::from_dsl(concat!(
            "k . . . . . . .\n",
            ". . . . . . . .\n",
            ". . . . . . . .\n",
            ". . . . . . . .\n",
            ". b . . . . . .\n",
            ". . . . . . . .\n",
            ". . . N . . . .\n",
            ". . . . K . . .\n",
        ))
        .unwrap();
        let moves = position.legal_moves(Side::White);
        assert!(moves.iter().all(|mv| mv.from != Square::try_from("d2").unwrap()));
        for mv in moves {
            assert!(!position.play(&mv).is_in_check(Side::White));
        }
    }

    #[test]
    pub fn test_castling() {
        let position = ChessPosition::from_dsl(positions::CASTLING).unwrap();
        let moves = move_strings(&position.legal_moves(Side::White));
        assert!(moves.contains(&"e1g1".to_string()));
        // d1 is attacked by the rook on d8
        assert!(!moves.contains(&"e1c1".to_string()));

        let castle = position
            .legal_moves(Side::White)
            .into_iter()
            .find(|mv| mv.special == Some(Special::Castle))
            .unwrap();
        let after = position.play(&castle);
        let f1 = Square::try_from("f1").unwrap();
        assert_eq!(
            after.grid().occupant_at(f1),
            Some(Piece::new(ChessKind::Rook, Side::White))
        );
        assert!(after.grid().is_empty_at(Square::try_from("h1").unwrap()));
        assert!(!after.castling().has(Side::White, false));
    }

    #[test]
    pub fn test_castling_blocked_while_in_check() {
        let position = ChessPosition::from_dsl(concat!(
            ". . . . k . . .\n",
            ". . . . . . . .\n",
            ". . . . . . . .\n",
            ". . . . . . . .\n",
            ". . . . q . . .\n",
            ". . . . . . . .\n",
            ". . . . . . . .\n",
            "R . . . K . . R\n",
            "\n",
            "castling - [ K Q ]\n",
        ))
        .unwrap();
        assert!(position.is_in_check(Side::White));
        assert!(position
            .legal_moves(Side::White)
            .iter()
            .all(|mv| mv.special != Some(Special::Castle)));
    }

    #[test]
    pub fn test_en_passant() {
        let position = ChessPosition::from_dsl(concat!(
            "k . . . . . . .\n",
            ". . . . . . . .\n",
            ". . . . . . . .\n",
            ". . . p P . . .\n",
            ". . . . . . . .\n",
            ". . . . . . . .\n",
            ". . . . . . . .\n",
            "K . . . . . . .\n",
            "\n",
            "en-passant - [ d6 ]\n",
        ))
        .unwrap();
        let capture = position
            .legal_moves(Side::White)
            .into_iter()
            .find(|mv| mv.special == Some(Special::EnPassant))
            .unwrap();
        assert_eq!(capture.to_string(), "e5d6");
        let after = position.play(&capture);
        assert!(after.grid().is_empty_at(Square::try_from("d5").unwrap()));
        assert_eq!(after.grid().num_pieces(), 3);
        assert_eq!(after.halfmove_clock(), 0);
    }

    #[test]
    pub fn test_promotion_offers_four_pieces_queen_first() {
        let position = ChessPosition::from_dsl(concat!(
            "k . . . . . . .\n",
            ". . . . P . . .\n",
            ". . . . . . . .\n",
            ". . . . . . . .\n",
            ". . . . . . . .\n",
            ". . . . . . . .\n",
            ". . . . . . . .\n",
            ". . . . . . . K\n",
        ))
        .unwrap();
        let promotions = position
            .legal_moves(Side::White)
            .into_iter()
            .filter(|mv| mv.from == Square::try_from("e7").unwrap())
            .collect::<Vec<_>>();
        assert_eq!(move_strings(&promotions), vec!["e7e8q", "e7e8r", "e7e8b", "e7e8n"]);

        let after = position.play(&promotions[3]);
        assert_eq!(
            after.grid().occupant_at(Square::try_from("e8").unwrap()),
            Some(Piece::new(ChessKind::Knight, Side::White))
        );
    }
}
