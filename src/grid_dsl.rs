use crate::constants::BOARD_SIZE;
use crate::grid::Grid;
use crate::piece::{Piece, PieceKind};
use crate::square::Square;
use regex::Regex;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParserError>;

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Could not parse board row: {0}")]
    RowError(String),
    #[error("Could not parse field line: {0}")]
    FieldSyntaxError(String),
    #[error("Invalid value for field {field}: {value}")]
    FieldValueError { field: String, value: String },
}

/// Domain specific language interpreter for Grids
///
/// Takes a string of the following form and interprets it deterministically
/// as a grid plus a list of named fields:
///
/// ```text
/// r . b q k b n r
/// p p p p . p p p
/// . . n . . . . .
/// . . . . p . . .
/// . . . . P . . .
/// . . . . . N . .
/// P P P P . P P P
/// R N B Q K B . R
///
/// turn - [ w ]
/// castling - [ K Q k q ]
/// ```
///
/// The board comes first, rank 8 at the top and file a on the left.
/// Uppercase letters are White pieces, lowercase Black, dots are empty.
/// Fields follow after a blank line; what each field means is up to the
/// position type that reads them.
pub struct Parser {}

/// A parsed diagram: the grid and its fields in input order
#[derive(Debug, Clone)]
pub struct Diagram<K: PieceKind> {
    pub grid: Grid<K>,
    pub fields: Vec<(String, Vec<String>)>,
}

impl<K: PieceKind> Diagram<K> {
    pub fn field(&self, name: &str) -> Option<&[String]> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, values)| values.as_slice())
    }
}

impl Parser {
    /// Parses a row of dots and letters into one entry per file.
    ///
    /// Entries are separated by exactly one space; leading and trailing
    /// whitespace is ignored.
    fn parse_row<K: PieceKind>(row: &str) -> Result<Vec<Option<Piece<K>>>> {
        use ParserError::*;
        let mut entries = Vec::new();
        let mut space_count = 0; // Consecutive # of spaces
        let mut entry_count = 0; // Consecutive # of entries

        for input in row.trim().chars() {
            match input {
                '.' => {
                    if entry_count > 0 {
                        return Err(RowError(format!("Entries must be space separated: {}", row)));
                    }
                    entries.push(None);
                    space_count = 0;
                    entry_count = 1;
                }
                ' ' => {
                    if space_count > 0 {
                        return Err(RowError(format!("Invalid space placement: {}", row)));
                    }
                    space_count += 1;
                    entry_count = 0;
                }
                c if c.is_ascii_alphabetic() => {
                    if entry_count > 0 {
                        return Err(RowError(format!("Entries must be space separated: {}", row)));
                    }
                    let piece = Piece::try_from_char(c)
                        .map_err(|e| RowError(format!("{} in {}", e, row)))?;
                    entries.push(Some(piece));
                    space_count = 0;
                    entry_count = 1;
                }
                _ => return Err(RowError(format!("Invalid character: {}", input))),
            }
        }

        if entries.len() != BOARD_SIZE {
            return Err(RowError(format!(
                "Expected {} squares, got {}: {}",
                BOARD_SIZE,
                entries.len(),
                row
            )));
        }

        Ok(entries)
    }

    /// Given the board part of a diagram, build the grid it describes
    fn parse_board<K: PieceKind>(input: &str) -> Result<Grid<K>> {
        let rows: Vec<&str> = input.lines().filter(|line| !line.trim().is_empty()).collect();
        if rows.len() != BOARD_SIZE {
            return Err(ParserError::ParseError(format!(
                "Expected {} rows, got {}",
                BOARD_SIZE,
                rows.len()
            )));
        }

        let mut grid = Grid::new();
        for (row_index, row) in rows.iter().enumerate() {
            let rank = (BOARD_SIZE - 1 - row_index) as u8;
            for (file, entry) in Parser::parse_row::<K>(row)?.into_iter().enumerate() {
                let square = Square::new(file as u8, rank)
                    .ok_or_else(|| ParserError::ParseError("Square off the board".to_string()))?;
                if let Some(piece) = entry {
                    grid.place(piece, square);
                }
            }
        }

        Ok(grid)
    }

    /// Parses field lines of the form `name - [ value value ... ]`
    fn parse_fields(input: &str) -> Result<Vec<(String, Vec<String>)>> {
        let re = Regex::new(r"^\s*([\w-]+)\s*-\s*\[\s*(.*?)\s*\]\s*$")
            .map_err(|e| ParserError::ParseError(e.to_string()))?;
        let mut fields = Vec::new();
        for line in input.lines().filter(|line| !line.trim().is_empty()) {
            let Some(captures) = re.captures(line) else {
                return Err(ParserError::FieldSyntaxError(line.to_string()));
            };
            let values = captures[2].split_whitespace().map(String::from).collect();
            fields.push((captures[1].to_string(), values));
        }
        Ok(fields)
    }

    /// Splits a diagram into its board and its fields. The board ends at
    /// the first line that looks like a field.
    pub fn parse_diagram<K: PieceKind>(input: &str) -> Result<Diagram<K>> {
        let mut board = String::new();
        let mut rest = String::new();
        for line in input.lines() {
            if !rest.is_empty() || line.contains('[') {
                rest.push_str(line);
                rest.push('\n');
            } else {
                board.push_str(line);
                board.push('\n');
            }
        }

        Ok(Diagram {
            grid: Parser::parse_board(&board)?,
            fields: Parser::parse_fields(&rest)?,
        })
    }

    #[cfg(test)]
    pub fn parse_grid<K: PieceKind>(input: &str) -> Result<Grid<K>> {
        Ok(Parser::parse_diagram(input)?.grid)
    }
}
