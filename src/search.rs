use crate::constants::{DEFAULT_SEARCH_DEPTH, MATE_SCORE, MATE_THRESHOLD, MAX_SEARCH_DEPTH};
use crate::game::Position;
use crate::moves::Move;
use crate::piece::{PieceKind, Side};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    #[error("No legal moves to choose from")]
    NoLegalMoves,
    #[error("{0} is not the side to move")]
    NotSideToMove(String),
    #[error("Search depth must be between 1 and {max}, got {0}", max = MAX_SEARCH_DEPTH)]
    InvalidDepth(u8),
}

pub type Result<T> = std::result::Result<T, SearchError>;

/// Larger than any score a position can be given
const INFINITY: i32 = MATE_SCORE + 1;
/// How many nodes are visited between looks at the clock
const CLOCK_INTERVAL: u64 = 1024;

/// How to choose among root moves that score exactly the same
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// The first such move in generation order
    #[default]
    FirstFound,
    /// Uniformly at random, reproducible from the seed
    Random { seed: u64 },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    depth: u8,
    pub tie_break: TieBreak,
    /// When set, deepen one ply at a time and stop once the limit passes
    pub time_limit: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth: DEFAULT_SEARCH_DEPTH,
            tie_break: TieBreak::FirstFound,
            time_limit: None,
        }
    }
}

impl SearchConfig {
    pub fn new(depth: u8) -> Result<SearchConfig> {
        SearchConfig::validate_depth(depth)?;
        Ok(SearchConfig {
            depth,
            ..SearchConfig::default()
        })
    }

    pub fn validate_depth(depth: u8) -> Result<u8> {
        if depth == 0 || depth > MAX_SEARCH_DEPTH {
            return Err(SearchError::InvalidDepth(depth));
        }
        Ok(depth)
    }

    pub fn depth(&self) -> u8 {
        self.depth
    }

    pub fn with_depth(self, depth: u8) -> Result<SearchConfig> {
        SearchConfig::validate_depth(depth)?;
        Ok(SearchConfig { depth, ..self })
    }

    pub fn with_tie_break(self, tie_break: TieBreak) -> SearchConfig {
        SearchConfig { tie_break, ..self }
    }

    pub fn with_time_limit(self, time_limit: Option<Duration>) -> SearchConfig {
        SearchConfig { time_limit, ..self }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub cutoffs: u64,
    /// Deepest iteration that ran to completion
    pub completed_depth: u8,
    pub best_score: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult<K: PieceKind> {
    pub best_move: Move<K>,
    pub score: i32,
    pub stats: SearchStats,
}

impl<K: PieceKind> SearchResult<K> {
    /// Plies until the game ends when the search found a forced result,
    /// positive when the searching side wins
    pub fn mate_in(&self) -> Option<i32> {
        if self.score.abs() < MATE_THRESHOLD {
            return None;
        }
        Some(self.score.signum() * (MATE_SCORE - self.score.abs()))
    }
}

/// Depth-limited negamax with alpha-beta pruning.
///
/// Scores are always from the point of view of the side to move at the
/// node being scored. A child position that keeps the same side to move (a
/// checkers multi-jump) is scored without flipping the sign or the window.
pub struct Searcher {
    config: SearchConfig,
    rng: Option<StdRng>,
    stats: SearchStats,
    deadline: Option<Instant>,
    timed_out: bool,
}

impl Searcher {
    pub fn new(config: SearchConfig) -> Searcher {
        let rng = match config.tie_break {
            TieBreak::FirstFound => None,
            TieBreak::Random { seed } => Some(StdRng::seed_from_u64(seed)),
        };
        Searcher {
            config,
            rng,
            stats: SearchStats::default(),
            deadline: None,
            timed_out: false,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Finds the best move for `side`, which must be the side to move.
    pub fn search<P: Position>(&mut self, position: &P, side: Side) -> Result<SearchResult<P::Kind>> {
        if side != position.side_to_move() {
            return Err(SearchError::NotSideToMove(side.to_str().to_string()));
        }
        SearchConfig::validate_depth(self.config.depth)?;
        let moves = order_moves(position.legal_moves(side));
        if moves.is_empty() {
            return Err(SearchError::NoLegalMoves);
        }

        self.stats = SearchStats::default();
        self.timed_out = false;
        let started = Instant::now();

        let mut best: Option<(Vec<Move<P::Kind>>, i32)> = None;
        match self.config.time_limit {
            None => {
                self.deadline = None;
                best = self.search_root(position, &moves, self.config.depth);
                self.stats.completed_depth = self.config.depth;
            }
            Some(limit) => {
                for depth in 1..=self.config.depth {
                    // Depth one always completes
                    self.deadline = if depth == 1 { None } else { Some(started + limit) };
                    match self.search_root(position, &moves, depth) {
                        Some(result) => {
                            trace!(depth, score = result.1, "finished iteration");
                            best = Some(result);
                            self.stats.completed_depth = depth;
                        }
                        None => {
                            debug!(depth, "time limit reached, keeping depth {}", depth - 1);
                            break;
                        }
                    }
                }
            }
        }

        let (candidates, score) = best.ok_or(SearchError::NoLegalMoves)?;
        let best_move = self.pick(&candidates).ok_or(SearchError::NoLegalMoves)?;
        self.stats.best_score = score;
        debug!(
            game = P::name(),
            nodes = self.stats.nodes,
            cutoffs = self.stats.cutoffs,
            depth = self.stats.completed_depth,
            score,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "search chose {}",
            best_move
        );
        Ok(SearchResult {
            best_move,
            score,
            stats: self.stats,
        })
    }

    pub fn best_move<P: Position>(&mut self, position: &P, side: Side) -> Result<Move<P::Kind>> {
        Ok(self.search(position, side)?.best_move)
    }

    fn pick<K: PieceKind>(&mut self, candidates: &[Move<K>]) -> Option<Move<K>> {
        match self.rng.as_mut() {
            Some(rng) if candidates.len() > 1 => {
                let index = rng.random_range(0..candidates.len());
                candidates.get(index).copied()
            }
            _ => candidates.first().copied(),
        }
    }

    /// Scores every root move and returns the best ones with their score.
    /// None if the clock ran out before all moves were scored.
    fn search_root<P: Position>(
        &mut self,
        position: &P,
        moves: &[Move<P::Kind>],
        depth: u8,
    ) -> Option<(Vec<Move<P::Kind>>, i32)> {
        let side = position.side_to_move();
        let collect_ties = self.rng.is_some();
        let mut best_score = -INFINITY;
        let mut best_moves = Vec::new();

        for mv in moves {
            // Ties only need exact scores when they might be picked
            let alpha = if collect_ties { best_score - 1 } else { best_score };
            let child = position.apply(mv);
            let score = if child.side_to_move() == side {
                self.negamax(&child, depth - 1, 1, alpha, INFINITY)?
            } else {
                -self.negamax(&child, depth - 1, 1, -INFINITY, -alpha)?
            };
            trace!(depth, score, "root move {}", mv);

            if score > best_score {
                best_score = score;
                best_moves = vec![*mv];
            } else if score == best_score && collect_ties {
                best_moves.push(*mv);
            }
        }
        Some((best_moves, best_score))
    }

    fn negamax<P: Position>(
        &mut self,
        position: &P,
        depth: u8,
        ply: i32,
        mut alpha: i32,
        beta: i32,
    ) -> Option<i32> {
        self.stats.nodes += 1;
        if self.out_of_time() {
            return None;
        }

        let side = position.side_to_move();
        let legal = position.legal_moves(side);
        if let Some(score) = position.outcome(&legal).score_for(side, side) {
            // Prefer the quicker win and the slower loss
            return Some(match score {
                s if s > 0 => s - ply,
                s if s < 0 => s + ply,
                _ => 0,
            });
        }
        if depth == 0 {
            return Some(position.heuristic(side));
        }

        let mut best = -INFINITY;
        for mv in order_moves(legal) {
            let child = position.apply(&mv);
            let score = if child.side_to_move() == side {
                self.negamax(&child, depth - 1, ply + 1, alpha, beta)?
            } else {
                -self.negamax(&child, depth - 1, ply + 1, -beta, -alpha)?
            };
            best = best.max(score);
            alpha = alpha.max(score);
            if alpha >= beta {
                self.stats.cutoffs += 1;
                break;
            }
        }
        Some(best)
    }

    fn out_of_time(&mut self) -> bool {
        if self.timed_out {
            return true;
        }
        if let Some(deadline) = self.deadline {
            if self.stats.nodes % CLOCK_INTERVAL == 0 && Instant::now() >= deadline {
                self.timed_out = true;
            }
        }
        self.timed_out
    }
}

/// Captures first; the sort is stable so generation order breaks ties
pub fn order_moves<K: PieceKind>(mut moves: Vec<Move<K>>) -> Vec<Move<K>> {
    moves.sort_by_key(|mv| !mv.is_capture());
    moves
}

/// Best move for `side` searching `depth` plies with the default tie-break.
/// `side` must be the side to move, otherwise `NotSideToMove`.
pub fn best_move<P: Position>(position: &P, side: Side, depth: u8) -> Result<Move<P::Kind>> {
    Searcher::new(SearchConfig::new(depth)?).best_move(position, side)
}
