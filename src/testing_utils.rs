pub mod positions;

use crate::moves::Move;
use crate::piece::PieceKind;
use itertools::Itertools;

/// Coordinate notation of each move, in generation order
pub fn move_strings<K: PieceKind>(moves: &[Move<K>]) -> Vec<String> {
    moves.iter().map(|mv| mv.to_string()).collect()
}

/// Asserts that `moves` holds exactly the expected moves, in any order
pub fn assert_same_moves<K: PieceKind>(moves: &[Move<K>], expected: &[&str]) {
    let found = move_strings(moves).into_iter().sorted().collect::<Vec<_>>();
    let expected = expected
        .iter()
        .map(|mv| mv.to_string())
        .sorted()
        .collect::<Vec<_>>();

    if found != expected {
        println!("found moves:    {}", found.join(" "));
        println!("expected moves: {}", expected.join(" "));
    }
    assert_eq!(found, expected);
}
