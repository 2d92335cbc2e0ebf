use crate::checkers::CheckersPosition;
use crate::chess::ChessPosition;
use crate::constants::*;
use crate::controller::{ControllerState, GameController, SideAssignment};
use crate::game::{GameResult, Position};
use crate::moves::MoveText;
use crate::search::SearchConfig;
use itertools::Itertools;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("Unknown game {0:?}, expected chess or checkers")]
    UnknownGame(String),
}

pub type CommandResult = std::result::Result<String, String>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameKind {
    Chess,
    Checkers,
}

impl GameKind {
    pub fn to_str(&self) -> &str {
        match self {
            GameKind::Chess => "chess",
            GameKind::Checkers => "checkers",
        }
    }
}

impl FromStr for GameKind {
    type Err = ProtocolError;
    fn from_str(s: &str) -> Result<GameKind, ProtocolError> {
        match s.to_ascii_lowercase().as_str() {
            "chess" => Ok(GameKind::Chess),
            "checkers" | "draughts" => Ok(GameKind::Checkers),
            _ => Err(ProtocolError::UnknownGame(s.to_string())),
        }
    }
}

/// Everything needed to start a session
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    pub game: GameKind,
    pub assignment: SideAssignment,
    pub search: SearchConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            game: GameKind::Chess,
            assignment: SideAssignment::VersusAi,
            search: SearchConfig::default(),
        }
    }
}

enum Session {
    Chess(GameController<ChessPosition>),
    Checkers(GameController<CheckersPosition>),
}

/// Runs `$body` with `$controller` bound to whichever controller the
/// session holds
macro_rules! with_controller {
    ($session:expr, $controller:ident => $body:expr) => {
        match $session {
            Session::Chess($controller) => $body,
            Session::Checkers($controller) => $body,
        }
    };
}

/// Result of the game in the style of the status line
fn game_state<P: Position>(controller: &GameController<P>) -> &'static str {
    match (controller.state(), controller.history().is_empty()) {
        (ControllerState::GameOver(reason), _) => GameResult::from_winner(reason.winner()).to_str(),
        (_, true) => "NotStarted",
        (_, false) => "InProgress",
    }
}

/// `<game>;<state>;<Side>[<move number>];<moves;...>`
///
/// The move list is left out until a move has been played
fn status_line<P: Position>(controller: &GameController<P>) -> String {
    let turn_number = controller.turn_number();
    let head = format!(
        "{};{};{}[{}]",
        P::name(),
        game_state(controller),
        controller.side_to_move().to_str(),
        turn_number
    );
    if controller.history().is_empty() {
        return head;
    }
    format!("{};{}", head, controller.history().iter().join(";"))
}

fn play<P: Position>(controller: &mut GameController<P>, input: &str) -> CommandResult {
    let text = MoveText::<P::Kind>::try_from(input).map_err(|e| e.to_string())?;
    controller
        .submit_human_move(text.from, text.to, text.promotion)
        .map_err(|e| e.to_string())?;
    Ok(status_line(controller))
}

fn ensure_not_over<P: Position>(controller: &GameController<P>) -> Result<(), String> {
    match controller.game_over_reason() {
        Some(reason) => Err(format!("The game is over: {}", reason)),
        None => Ok(()),
    }
}

fn play_ai<P: Position>(controller: &mut GameController<P>) -> CommandResult {
    ensure_not_over(controller)?;
    if !controller.is_thinking() {
        return Err("It is not the computer's turn".to_string());
    }
    let played = controller.play_ai_turn().map_err(|e| e.to_string())?;
    Ok(format!("{}\n{}", played.iter().join(";"), status_line(controller)))
}

fn valid_moves<P: Position>(controller: &GameController<P>) -> CommandResult {
    ensure_not_over(controller)?;
    Ok(controller.legal_moves().iter().join(";"))
}

fn best_move<P: Position>(controller: &GameController<P>, depth: Option<u8>) -> CommandResult {
    let mv = controller.hint(depth).map_err(|e| e.to_string())?;
    Ok(mv.to_string())
}

fn undo<P: Position>(controller: &mut GameController<P>, count: usize) -> CommandResult {
    controller.undo(count).map_err(|e| e.to_string())?;
    Ok(status_line(controller))
}

fn resign<P: Position>(controller: &mut GameController<P>) -> CommandResult {
    let reason = controller.resign().map_err(|e| e.to_string())?;
    Ok(format!("{}\n{}", reason, status_line(controller)))
}

fn last_move<P: Position>(controller: &GameController<P>) -> CommandResult {
    Ok(controller
        .last_move()
        .map_or(String::new(), |mv| mv.to_string()))
}

fn board<P: Position>(controller: &GameController<P>) -> CommandResult {
    Ok(controller.board().to_dsl().trim_end().to_string())
}

/// Line protocol over one game session.
///
/// Every response ends with "ok\n"; failures begin with "err".
pub struct EngineInterface {
    defaults: SessionConfig,
    session: Option<Session>,
}

impl Default for EngineInterface {
    fn default() -> Self {
        EngineInterface::new(SessionConfig::default())
    }
}

impl EngineInterface {
    pub fn new(defaults: SessionConfig) -> EngineInterface {
        EngineInterface {
            defaults,
            session: None,
        }
    }

    fn info(&self) -> CommandResult {
        Ok("id ".to_string() + ENGINE_NAME + " v" + VERSION + "\n" + "chess;checkers")
    }

    fn unknown(&self) -> CommandResult {
        Err("Unknown command, cannot parse".to_string())
    }

    fn session(&mut self) -> Result<&mut Session, String> {
        self.session
            .as_mut()
            .ok_or_else(|| "No game in progress, start one with newgame".to_string())
    }

    /// Parses a `depth <n>` option
    fn depth_option<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Result<u8, String> {
        tokens
            .next()
            .ok_or_else(|| "Expected a number after depth".to_string())?
            .parse::<u8>()
            .map_err(|_| "Invalid number for depth".to_string())
    }

    /// Parse a newgame command,
    /// commands must be of the form:
    ///
    /// newgame
    /// newgame [chess|checkers] [ai|human] [depth n]
    ///
    /// Options left out keep the engine's defaults
    fn new_game(&mut self, input: &str) -> CommandResult {
        let mut config = self.defaults;
        let mut tokens = input.split_whitespace().skip(1);
        while let Some(token) = tokens.next() {
            match token {
                "ai" => config.assignment = SideAssignment::VersusAi,
                "human" => config.assignment = SideAssignment::TwoHumans,
                "depth" => {
                    let depth = EngineInterface::depth_option(&mut tokens)?;
                    config.search = config.search.with_depth(depth).map_err(|e| e.to_string())?;
                }
                game => config.game = game.parse::<GameKind>().map_err(|e| e.to_string())?,
            }
        }
        self.start(config)
    }

    /// Starts a session from a validated configuration
    pub fn start(&mut self, config: SessionConfig) -> CommandResult {
        let session = match config.game {
            GameKind::Chess => Session::Chess(
                GameController::new_game(config.assignment, config.search).map_err(|e| e.to_string())?,
            ),
            GameKind::Checkers => Session::Checkers(
                GameController::new_game(config.assignment, config.search).map_err(|e| e.to_string())?,
            ),
        };
        let status = with_controller!(&session, controller => status_line(controller));
        self.session = Some(session);
        Ok(status)
    }

    /// Parses a play command and submits the move as the human's
    fn play(&mut self, input: &str) -> CommandResult {
        let move_string = input[4..].trim();
        if move_string.is_empty() {
            return Err("Invalid move string for play command".to_string());
        }
        with_controller!(self.session()?, controller => play(controller, move_string))
    }

    /// bestmove
    /// bestmove depth n
    fn best_move(&mut self, input: &str) -> CommandResult {
        let mut tokens = input.split_whitespace().skip(1);
        let depth = match tokens.next() {
            None => None,
            Some("depth") => Some(EngineInterface::depth_option(&mut tokens)?),
            Some(_) => return Err("Expected bestmove or bestmove depth n".to_string()),
        };
        with_controller!(self.session()?, controller => best_move(controller, depth))
    }

    /// undo
    /// undo n
    fn undo(&mut self, input: &str) -> CommandResult {
        let count = match input[4..].trim() {
            "" => 1,
            number => number
                .parse::<usize>()
                .map_err(|_| "Invalid number for undo command".to_string())?,
        };
        if count < 1 {
            return Err("Invalid number for undo command".to_string());
        }
        with_controller!(self.session()?, controller => undo(controller, count))
    }

    /// Parses commands and returns the appropriate response
    ///
    /// All responses end with "ok\n"
    ///
    /// If the command encounters an error, the string returned will
    /// begin with "err"
    pub fn command(&mut self, input: &str) -> String {
        let response = match input.trim() {
            "info" => self.info(),
            "ai" => self
                .session()
                .and_then(|session| with_controller!(session, controller => play_ai(controller))),
            "validmoves" => self
                .session()
                .and_then(|session| with_controller!(session, controller => valid_moves(controller))),
            "resign" => self
                .session()
                .and_then(|session| with_controller!(session, controller => resign(controller))),
            "lastmove" => self
                .session()
                .and_then(|session| with_controller!(session, controller => last_move(controller))),
            "board" => self
                .session()
                .and_then(|session| with_controller!(session, controller => board(controller))),
            "status" => self
                .session()
                .map(|session| with_controller!(session, controller => status_line(controller))),
            a if a.starts_with("bestmove") => self.best_move(a),
            a if a.starts_with("newgame") => self.new_game(a),
            a if a.starts_with("play") => self.play(a),
            a if a.starts_with("undo") => self.undo(a),
            _ => self.unknown(),
        };
        let response = match response {
            Ok(response) => response,
            Err(response) => "err ".to_string() + &response,
        };

        debug_assert!(
            if !response.is_empty() {
                !response.ends_with('\n')
            } else {
                true
            },
            "Non-empty response should not end with a newline"
        );
        if response.is_empty() {
            "ok\n".to_string()
        } else {
            response + "\nok\n"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing_utils::positions;

    fn interface() -> EngineInterface {
        EngineInterface::new(SessionConfig {
            search: SearchConfig::new(1).unwrap(),
            ..SessionConfig::default()
        })
    }

    #[test]
    pub fn test_info() {
        let mut engine = interface();
        let result = engine.command("info");
        assert!(result.starts_with("id tabletop v"));
        assert!(result.ends_with("chess;checkers\nok\n"));
    }

    #[test]
    pub fn test_newgame() {
        let mut engine = interface();
        assert_eq!(engine.command("newgame"), "chess;NotStarted;White[1]\nok\n");
        assert_eq!(
            engine.command("newgame checkers human depth 2"),
            "checkers;NotStarted;White[1]\nok\n"
        );
        assert!(engine.command("newgame go").starts_with("err "));
        assert!(engine.command("newgame chess depth 0").starts_with("err "));
        assert!(engine.command("newgame chess depth").starts_with("err "));
    }

    #[test]
    pub fn test_commands_need_a_game() {
        let mut engine = interface();
        for command in [
            "play e2e4",
            "ai",
            "validmoves",
            "undo",
            "bestmove",
            "board",
            "status",
            "lastmove",
        ] {
            assert!(engine.command(command).starts_with("err "), "{}", command);
        }
        assert!(engine.command("castle").starts_with("err Unknown command"));
    }

    #[test]
    pub fn test_play_against_ai() {
        let mut engine = interface();
        engine.command("newgame chess ai");
        assert_eq!(engine.command("validmoves").split(';').count(), 20);
        assert_eq!(
            engine.command("play e2e4"),
            "chess;InProgress;Black[1];e2e4\nok\n"
        );
        assert!(engine.command("play e7e5").starts_with("err "));

        assert_eq!(engine.command("lastmove"), "e2e4\nok\n");
        let output = engine.command("ai");
        let mut lines = output.lines();
        let reply = lines.next().unwrap().to_string();
        assert_eq!(
            lines.next().unwrap(),
            format!("chess;InProgress;White[2];e2e4;{}", reply)
        );
        assert_eq!(lines.next(), Some("ok"));
        assert_eq!(engine.command("lastmove"), format!("{}\nok\n", reply));
        assert_eq!(engine.command("ai"), "err It is not the computer's turn\nok\n");
    }

    #[test]
    pub fn test_illegal_and_malformed_moves() {
        let mut engine = interface();
        engine.command("newgame chess human");
        assert_eq!(engine.command("play e2e5"), "err Illegal move: e2e5\nok\n");
        assert!(engine.command("play e2").starts_with("err "));
        assert!(engine.command("play").starts_with("err "));
        assert_eq!(engine.command("status"), "chess;NotStarted;White[1]\nok\n");
    }

    #[test]
    pub fn test_undo() {
        let mut engine = interface();
        engine.command("newgame chess human");
        engine.command("play e2e4");
        engine.command("play e7e5");
        engine.command("play g1f3");
        assert_eq!(
            engine.command("undo"),
            "chess;InProgress;White[2];e2e4;e7e5\nok\n"
        );
        assert_eq!(engine.command("undo 2"), "chess;NotStarted;White[1]\nok\n");
        assert!(engine.command("undo").starts_with("err "));
        assert!(engine.command("undo x").starts_with("err "));
        assert!(engine.command("undo 0").starts_with("err "));
    }

    #[test]
    pub fn test_checkers_session() {
        let mut engine = interface();
        engine.command("newgame checkers human");
        assert_eq!(engine.command("validmoves").split(';').count(), 7);
        assert_eq!(
            engine.command("play c3d4"),
            "checkers;InProgress;Black[1];c3d4\nok\n"
        );
        let board = engine.command("board");
        assert!(board.starts_with(". m . m . m . m\n"));
        assert!(board.contains("turn - [ b ]"));
        assert!(engine.command("play c3d4q").starts_with("err "));
    }

    #[test]
    pub fn test_bestmove_and_resign() {
        let mut engine = interface();
        engine.command("newgame chess ai");
        let output = engine.command("bestmove depth 2");
        let mv = output.lines().next().unwrap().to_string();
        assert!(engine.command("validmoves").contains(&mv));
        assert!(engine.command("bestmove depth 9").starts_with("err "));
        assert!(engine.command("bestmove 2").starts_with("err "));

        assert_eq!(
            engine.command("resign"),
            "Black wins by resignation\nchess;BlackWins;White[1]\nok\n"
        );
        assert!(engine.command("validmoves").starts_with("err "));
        assert_eq!(
            engine.command("ai"),
            "err The game is over: Black wins by resignation\nok\n"
        );
        assert_eq!(engine.command("lastmove"), "ok\n");
        assert!(engine.command("resign").starts_with("err "));
    }

    #[test]
    pub fn test_status_line_counts_multi_jump_as_one_move() {
        let position = CheckersPosition::from_dsl(positions::CHECKERS_DOUBLE_JUMP).unwrap();
        let mut controller = GameController::from_position(
            position,
            SideAssignment::TwoHumans,
            SearchConfig::new(1).unwrap(),
        )
        .unwrap();
        assert_eq!(
            play(&mut controller, "c3e5"),
            Ok("checkers;InProgress;White[1];c3e5".to_string())
        );
        assert_eq!(
            play(&mut controller, "e5c7"),
            Ok("checkers;InProgress;Black[1];c3e5;e5c7".to_string())
        );
        assert_eq!(
            play(&mut controller, "h8g7"),
            Ok("checkers;InProgress;White[2];c3e5;e5c7;h8g7".to_string())
        );
    }
}
