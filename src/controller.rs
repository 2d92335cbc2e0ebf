use crate::game::{DrawReason, GameState, Position, Status};
use crate::moves::Move;
use crate::piece::Side;
use crate::search::{SearchConfig, SearchError, Searcher};
use crate::square::Square;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    #[error("Illegal move: {0}")]
    IllegalMove(String),
    #[error("No legal moves available")]
    NoLegalMoves,
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("It is not a human player's turn")]
    NotHumanTurn,
    #[error("It is not the computer's turn")]
    NotAiTurn,
    #[error("The game is already over")]
    GameAlreadyOver,
    #[error("There are no moves to undo")]
    NothingToUndo,
}

impl From<SearchError> for ControllerError {
    fn from(error: SearchError) -> Self {
        match error {
            SearchError::NoLegalMoves => ControllerError::NoLegalMoves,
            other => ControllerError::InvalidConfiguration(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, ControllerError>;

/// Who sits on each side. Fixed for the whole game.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SideAssignment {
    /// Both sides are played locally by people
    TwoHumans,
    /// A person plays White and moves first; the engine plays Black
    VersusAi,
}

impl SideAssignment {
    pub fn is_ai(&self, side: Side) -> bool {
        *self == SideAssignment::VersusAi && side == Side::Black
    }

    pub fn to_str(&self) -> &str {
        match self {
            SideAssignment::TwoHumans => "human",
            SideAssignment::VersusAi => "ai",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameOverReason {
    Checkmate { winner: Side },
    Stalemate,
    Draw(DrawReason),
    NoLegalMoves { winner: Side },
    Resignation { winner: Side },
}

impl GameOverReason {
    fn from_status(status: Status, to_move: Side) -> Option<GameOverReason> {
        let winner = to_move.opposite();
        match status {
            Status::Ongoing => None,
            Status::Checkmate => Some(GameOverReason::Checkmate { winner }),
            Status::Stalemate => Some(GameOverReason::Stalemate),
            Status::Draw(reason) => Some(GameOverReason::Draw(reason)),
            Status::NoLegalMoves => Some(GameOverReason::NoLegalMoves { winner }),
        }
    }

    pub fn winner(&self) -> Option<Side> {
        match self {
            GameOverReason::Checkmate { winner }
            | GameOverReason::NoLegalMoves { winner }
            | GameOverReason::Resignation { winner } => Some(*winner),
            GameOverReason::Stalemate | GameOverReason::Draw(_) => None,
        }
    }
}

impl fmt::Display for GameOverReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOverReason::Checkmate { winner } => write!(f, "{} wins by checkmate", winner.to_str()),
            GameOverReason::Stalemate => write!(f, "draw by stalemate"),
            GameOverReason::Draw(reason) => write!(f, "draw by {}", reason.to_str()),
            GameOverReason::NoLegalMoves { winner } => {
                write!(f, "{} wins, the opponent cannot move", winner.to_str())
            }
            GameOverReason::Resignation { winner } => {
                write!(f, "{} wins by resignation", winner.to_str())
            }
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ControllerState {
    AwaitingHumanMove,
    ComputingAiMove,
    GameOver(GameOverReason),
}

/// Runs the turn loop of one game.
///
/// Human moves are checked against the legal move list and applied; the
/// computer's turn is searched and applied synchronously. A checkers
/// multi-jump keeps the mover in place: a human stays in
/// `AwaitingHumanMove`, the computer keeps jumping until its chain ends.
pub struct GameController<P: Position> {
    game: GameState<P>,
    state: ControllerState,
    assignment: SideAssignment,
    searcher: Searcher,
}

impl<P: Position> GameController<P> {
    /// Starts a game from the standard initial position
    pub fn new_game(assignment: SideAssignment, config: SearchConfig) -> Result<GameController<P>> {
        GameController::from_position(P::initial(), assignment, config)
    }

    pub fn from_position(
        position: P,
        assignment: SideAssignment,
        config: SearchConfig,
    ) -> Result<GameController<P>> {
        SearchConfig::validate_depth(config.depth())?;
        info!(
            game = P::name(),
            opponent = assignment.to_str(),
            depth = config.depth(),
            "new game"
        );
        let mut controller = GameController {
            game: GameState::new(position),
            state: ControllerState::AwaitingHumanMove,
            assignment,
            searcher: Searcher::new(config),
        };
        controller.advance();
        Ok(controller)
    }

    pub fn state(&self) -> ControllerState {
        self.state
    }

    /// True while the computer owes a move
    pub fn is_thinking(&self) -> bool {
        self.state == ControllerState::ComputingAiMove
    }

    /// Read-only snapshot of the current position
    pub fn board(&self) -> &P {
        self.game.current()
    }

    pub fn last_move(&self) -> Option<&Move<P::Kind>> {
        self.game.last_move()
    }

    pub fn history(&self) -> &[Move<P::Kind>] {
        self.game.history()
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        match self.state {
            ControllerState::GameOver(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn side_to_move(&self) -> Side {
        self.game.current().side_to_move()
    }

    pub fn legal_moves(&self) -> Vec<Move<P::Kind>> {
        let position = self.game.current();
        position.legal_moves(position.side_to_move())
    }

    /// Plays a human move named by its squares. Without a promotion piece
    /// a pawn reaching the last rank becomes a queen.
    pub fn submit_human_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<P::Kind>,
    ) -> Result<ControllerState> {
        match self.state {
            ControllerState::GameOver(_) => return Err(ControllerError::GameAlreadyOver),
            ControllerState::ComputingAiMove => return Err(ControllerError::NotHumanTurn),
            ControllerState::AwaitingHumanMove => {}
        }

        let chosen = self
            .legal_moves()
            .into_iter()
            .filter(|mv| mv.from == from && mv.to == to)
            .find(|mv| promotion.is_none() || mv.promotion == promotion);
        let Some(mv) = chosen else {
            let text = match promotion {
                Some(kind) => Move::<P::Kind>::quiet(from, to).with_promotion(kind).to_string(),
                None => format!("{}{}", from, to),
            };
            let moving = self
                .game
                .current()
                .occupant_at(from)
                .map_or('.', |piece| piece.to_char());
            debug!(game = P::name(), piece = %moving, "rejected move {}", text);
            return Err(ControllerError::IllegalMove(text));
        };

        self.game.apply(mv);
        self.advance();
        Ok(self.state)
    }

    /// Searches and plays the computer's move, continuing a multi-jump
    /// until it ends. Returns the moves played.
    pub fn play_ai_turn(&mut self) -> Result<Vec<Move<P::Kind>>> {
        match self.state {
            ControllerState::GameOver(_) => return Err(ControllerError::GameAlreadyOver),
            ControllerState::AwaitingHumanMove => return Err(ControllerError::NotAiTurn),
            ControllerState::ComputingAiMove => {}
        }

        let mut played = Vec::new();
        while self.state == ControllerState::ComputingAiMove {
            let side = self.side_to_move();
            let result = self.searcher.search(self.game.current(), side)?;
            info!(
                game = P::name(),
                side = side.to_str(),
                score = result.score,
                mate_in = ?result.mate_in(),
                nodes = result.stats.nodes,
                "computer plays {}",
                result.best_move
            );
            self.game.apply(result.best_move);
            played.push(result.best_move);
            self.advance();
        }
        Ok(played)
    }

    /// Takes back moves. Against the computer, `count` counts the human's
    /// own moves, and the computer's replies after them are taken back too.
    pub fn undo(&mut self, count: usize) -> Result<ControllerState> {
        if count == 0 {
            return Err(ControllerError::InvalidConfiguration(
                "undo count must be at least 1".to_string(),
            ));
        }

        let movers = self.game.movers();
        let mut kept = movers.len();
        let mut undone = 0;
        while kept > 0 && undone < count {
            kept -= 1;
            if !self.assignment.is_ai(movers[kept]) {
                undone += 1;
            }
        }
        if undone < count {
            return Err(ControllerError::NothingToUndo);
        }

        let remove = movers.len() - kept;
        self.game
            .undo(remove)
            .map_err(|_| ControllerError::NothingToUndo)?;
        debug!(game = P::name(), remove, "took back moves");
        self.advance();
        Ok(self.state)
    }

    /// The side to move concedes
    pub fn resign(&mut self) -> Result<GameOverReason> {
        match self.state {
            ControllerState::GameOver(_) => Err(ControllerError::GameAlreadyOver),
            ControllerState::ComputingAiMove => Err(ControllerError::NotHumanTurn),
            ControllerState::AwaitingHumanMove => {
                let reason = GameOverReason::Resignation {
                    winner: self.side_to_move().opposite(),
                };
                info!(game = P::name(), "{}", reason);
                self.state = ControllerState::GameOver(reason);
                Ok(reason)
            }
        }
    }

    /// Suggests a move for the human to play without playing it
    pub fn hint(&self, depth: Option<u8>) -> Result<Move<P::Kind>> {
        match self.state {
            ControllerState::GameOver(_) => return Err(ControllerError::GameAlreadyOver),
            ControllerState::ComputingAiMove => return Err(ControllerError::NotHumanTurn),
            ControllerState::AwaitingHumanMove => {}
        }
        let config = self.hint_config(depth)?;
        Ok(Searcher::new(config).best_move(self.game.current(), self.side_to_move())?)
    }

    /// The session's search settings, at another depth if one is given
    fn hint_config(&self, depth: Option<u8>) -> Result<SearchConfig> {
        let config = *self.searcher.config();
        Ok(match depth {
            Some(depth) => config.with_depth(depth)?,
            None => config,
        })
    }

    /// Turn number in the style of `White[3]`: both sides play once in a
    /// turn, and a checkers multi-jump counts as a single move
    pub fn turn_number(&self) -> usize {
        self.game.turns() / 2 + 1
    }

    /// Moves to whatever state the current position calls for
    fn advance(&mut self) {
        let position = self.game.current();
        let to_move = position.side_to_move();
        self.state = match GameOverReason::from_status(self.game.status(), to_move) {
            Some(reason) => {
                info!(game = P::name(), "game over: {}", reason);
                ControllerState::GameOver(reason)
            }
            None if self.assignment.is_ai(to_move) => ControllerState::ComputingAiMove,
            None => ControllerState::AwaitingHumanMove,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checkers::CheckersPosition;
    use crate::chess::ChessPosition;
    use crate::piece::ChessKind;
    use crate::search::TieBreak;
    use crate::testing_utils::positions;
    use std::time::Duration;

    fn square(text: &str) -> Square {
        Square::try_from(text).unwrap()
    }

    fn config(depth: u8) -> SearchConfig {
        SearchConfig::new(depth).unwrap()
    }

    #[test]
    pub fn test_new_game_validates_depth() {
        assert!(
            GameController::<ChessPosition>::new_game(SideAssignment::VersusAi, SearchConfig::default())
                .is_ok()
        );
        assert!(matches!(
            SearchConfig::new(0).map_err(ControllerError::from),
            Err(ControllerError::InvalidConfiguration(_))
        ));
    }

    #[test]
    pub fn test_human_then_ai_turn() {
        let mut controller =
            GameController::<ChessPosition>::new_game(SideAssignment::VersusAi, config(2)).unwrap();
        assert_eq!(controller.state(), ControllerState::AwaitingHumanMove);
        assert!(!controller.is_thinking());

        let state = controller
            .submit_human_move(square("e2"), square("e4"), None)
            .unwrap();
        assert_eq!(state, ControllerState::ComputingAiMove);
        assert!(controller.is_thinking());
        assert_eq!(
            controller.submit_human_move(square("d2"), square("d4"), None),
            Err(ControllerError::NotHumanTurn)
        );

        let played = controller.play_ai_turn().unwrap();
        assert_eq!(played.len(), 1);
        assert_eq!(controller.last_move(), played.last());
        assert_eq!(controller.state(), ControllerState::AwaitingHumanMove);
        assert_eq!(controller.side_to_move(), Side::White);
        assert_eq!(controller.play_ai_turn(), Err(ControllerError::NotAiTurn));
    }

    #[test]
    pub fn test_illegal_move_changes_nothing() {
        let mut controller =
            GameController::<ChessPosition>::new_game(SideAssignment::TwoHumans, config(1)).unwrap();
        let before = controller.board().clone();
        assert_eq!(
            controller.submit_human_move(square("e2"), square("e5"), None),
            Err(ControllerError::IllegalMove("e2e5".to_string()))
        );
        assert_eq!(*controller.board(), before);
        assert_eq!(controller.state(), ControllerState::AwaitingHumanMove);
        assert!(controller.history().is_empty());
    }

    #[test]
    pub fn test_two_humans_alternate() {
        let mut controller =
            GameController::<ChessPosition>::new_game(SideAssignment::TwoHumans, config(1)).unwrap();
        controller.submit_human_move(square("e2"), square("e4"), None).unwrap();
        let state = controller.submit_human_move(square("e7"), square("e5"), None).unwrap();
        assert_eq!(state, ControllerState::AwaitingHumanMove);
        assert_eq!(controller.history().len(), 2);
    }

    #[test]
    pub fn test_checkmate_ends_game() {
        // Fool's mate
        let mut controller =
            GameController::<ChessPosition>::new_game(SideAssignment::TwoHumans, config(1)).unwrap();
        for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
            controller.submit_human_move(square(from), square(to), None).unwrap();
        }
        let reason = GameOverReason::Checkmate { winner: Side::Black };
        assert_eq!(controller.state(), ControllerState::GameOver(reason));
        assert_eq!(controller.game_over_reason().and_then(|r| r.winner()), Some(Side::Black));
        assert_eq!(
            controller.submit_human_move(square("a2"), square("a3"), None),
            Err(ControllerError::GameAlreadyOver)
        );
        assert_eq!(controller.resign(), Err(ControllerError::GameAlreadyOver));
    }

    #[test]
    pub fn test_promotion_choice() {
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
        let mut controller =
            GameController::from_position(position.clone(), SideAssignment::TwoHumans, config(1))
                .unwrap();
        controller.submit_human_move(square("e7"), square("e8"), None).unwrap();
        assert_eq!(controller.last_move().and_then(|mv| mv.promotion), Some(ChessKind::Queen));

        let mut controller =
            GameController::from_position(position, SideAssignment::TwoHumans, config(1)).unwrap();
        controller
            .submit_human_move(square("e7"), square("e8"), Some(ChessKind::Knight))
            .unwrap();
        assert_eq!(controller.last_move().map(|mv| mv.to_string()), Some("e7e8n".to_string()));
    }

    #[test]
    pub fn test_undo_against_ai_returns_to_human_turn() {
        let mut controller =
            GameController::<ChessPosition>::new_game(SideAssignment::VersusAi, config(1)).unwrap();
        assert_eq!(controller.undo(1), Err(ControllerError::NothingToUndo));

        controller.submit_human_move(square("e2"), square("e4"), None).unwrap();
        controller.play_ai_turn().unwrap();
        controller.submit_human_move(square("d2"), square("d4"), None).unwrap();
        let after_first_exchange = {
            let mut replay =
                GameController::<ChessPosition>::new_game(SideAssignment::VersusAi, config(1)).unwrap();
            replay.submit_human_move(square("e2"), square("e4"), None).unwrap();
            replay.play_ai_turn().unwrap();
            replay.board().clone()
        };

        // Pending AI reply: undo takes back only the human move
        assert_eq!(controller.undo(1), Ok(ControllerState::AwaitingHumanMove));
        assert_eq!(*controller.board(), after_first_exchange);

        // Takes back the AI reply together with the human move before it
        assert_eq!(controller.undo(1), Ok(ControllerState::AwaitingHumanMove));
        assert_eq!(*controller.board(), ChessPosition::initial());
        assert!(controller.history().is_empty());
    }

    #[test]
    pub fn test_resign_and_hint() {
        let mut controller =
            GameController::<CheckersPosition>::new_game(SideAssignment::VersusAi, config(3)).unwrap();
        let hint = controller.hint(Some(2)).unwrap();
        assert!(controller.legal_moves().contains(&hint));
        assert!(controller.history().is_empty());
        assert!(matches!(
            controller.hint(Some(9)),
            Err(ControllerError::InvalidConfiguration(_))
        ));

        let reason = controller.resign().unwrap();
        assert_eq!(reason, GameOverReason::Resignation { winner: Side::Black });
        assert_eq!(controller.hint(None), Err(ControllerError::GameAlreadyOver));
    }

    #[test]
    pub fn test_ai_finishes_multi_jump() {
        let position = CheckersPosition::from_dsl(concat!(
            ". . . . . . . .\n",
            ". . . . . . . .\n",
            ". . . . . m . .\n",
            ". . . . M . . .\n",
            ". . . . . . . .\n",
            ". . M . . . . .\n",
            ". . . . . . . .\n",
            "M . . . . . . .\n",
            "\n",
            "turn - [ b ]\n",
        ))
        .unwrap();
        let mut controller =
            GameController::from_position(position, SideAssignment::VersusAi, config(2)).unwrap();
        assert!(controller.is_thinking());

        let played = controller.play_ai_turn().unwrap();
        let played = played.iter().map(|mv| mv.to_string()).collect::<Vec<_>>();
        assert_eq!(played, vec!["f6d4", "d4b2"]);
        assert_eq!(controller.side_to_move(), Side::White);
        assert_eq!(controller.state(), ControllerState::AwaitingHumanMove);
    }

    #[test]
    pub fn test_human_keeps_turn_during_multi_jump() {
        let position = CheckersPosition::from_dsl(positions::CHECKERS_DOUBLE_JUMP).unwrap();
        let mut controller =
            GameController::from_position(position, SideAssignment::VersusAi, config(2)).unwrap();
        let state = controller.submit_human_move(square("c3"), square("e5"), None).unwrap();
        assert_eq!(state, ControllerState::AwaitingHumanMove);
        assert_eq!(controller.side_to_move(), Side::White);
        assert_eq!(
            controller.submit_human_move(square("e5"), square("f6"), None),
            Err(ControllerError::IllegalMove("e5f6".to_string()))
        );
        let state = controller.submit_human_move(square("e5"), square("c7"), None).unwrap();
        assert_eq!(state, ControllerState::ComputingAiMove);
    }

    #[test]
    pub fn test_repetition_ends_game_in_a_draw() {
        let mut controller =
            GameController::<ChessPosition>::new_game(SideAssignment::TwoHumans, config(1)).unwrap();
        let shuffle = [("g1", "f3"), ("g8", "f6"), ("f3", "g1"), ("f6", "g8")];
        for (from, to) in shuffle.iter().chain(shuffle.iter()).take(7) {
            let state = controller.submit_human_move(square(from), square(to), None).unwrap();
            assert_eq!(state, ControllerState::AwaitingHumanMove);
        }
        let state = controller.submit_human_move(square("f6"), square("g8"), None).unwrap();
        let reason = GameOverReason::Draw(DrawReason::Repetition);
        assert_eq!(state, ControllerState::GameOver(reason));
        assert_eq!(reason.winner(), None);
        assert_eq!(
            controller.submit_human_move(square("g1"), square("f3"), None),
            Err(ControllerError::GameAlreadyOver)
        );
    }

    #[test]
    pub fn test_multi_jump_is_one_turn() {
        let position = CheckersPosition::from_dsl(positions::CHECKERS_DOUBLE_JUMP).unwrap();
        let mut controller =
            GameController::from_position(position, SideAssignment::TwoHumans, config(1)).unwrap();
        assert_eq!(controller.turn_number(), 1);
        controller.submit_human_move(square("c3"), square("e5"), None).unwrap();
        controller.submit_human_move(square("e5"), square("c7"), None).unwrap();
        assert_eq!(controller.history().len(), 2);
        assert_eq!(controller.side_to_move(), Side::Black);
        assert_eq!(controller.turn_number(), 1);
    }

    #[test]
    pub fn test_hint_keeps_session_settings() {
        let session = config(3)
            .with_tie_break(TieBreak::Random { seed: 11 })
            .with_time_limit(Some(Duration::from_millis(50)));
        let controller =
            GameController::<ChessPosition>::new_game(SideAssignment::VersusAi, session).unwrap();

        let hinted = controller.hint_config(Some(5)).unwrap();
        assert_eq!(hinted.depth(), 5);
        assert_eq!(hinted.tie_break, TieBreak::Random { seed: 11 });
        assert_eq!(hinted.time_limit, Some(Duration::from_millis(50)));
        assert_eq!(controller.hint_config(None).unwrap(), session);

        let hint = controller.hint(Some(2)).unwrap();
        assert!(controller.legal_moves().contains(&hint));
    }
}
