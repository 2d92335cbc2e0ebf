pub const ENGINE_NAME: &str = "tabletop";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const BOARD_SIZE: usize = 8;

/// Deepest search the engine accepts, in plies
pub const MAX_SEARCH_DEPTH: u8 = 8;
pub const DEFAULT_SEARCH_DEPTH: u8 = 3;

/// Score reported for a side that has been mated or has run out of moves.
/// Anything beyond MATE_THRESHOLD is a forced result found by the search.
pub const MATE_SCORE: i32 = 1_000_000;
pub const MATE_THRESHOLD: i32 = MATE_SCORE - 1_000;
