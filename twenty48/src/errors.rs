use std::num::ParseIntError;

/// The error type for parsing a saved board.
#[derive(Debug)]
pub enum ParseBoardError {
    /// The input contains no rows at all.
    Empty,
    /// A row has a different number of values than the first row.
    RaggedRow {
        line: usize,
        expected: usize,
        found: usize,
    },
    /// A field is not a non-negative integer.
    InvalidTile { line: usize, source: ParseIntError },
}

impl std::error::Error for ParseBoardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseBoardError::InvalidTile { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl std::fmt::Display for ParseBoardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseBoardError::Empty => write!(f, "The saved board contains no rows"),
            ParseBoardError::RaggedRow {
                line,
                expected,
                found,
            } => write!(
                f,
                "Line {} holds {} values, but the first line holds {}",
                line, found, expected
            ),
            ParseBoardError::InvalidTile { line, .. } => {
                write!(f, "Line {} contains a value that is not an integer", line)
            }
        }
    }
}

/// The error type for [`Board::load_from_file()`](crate::Board::load_from_file).
#[derive(Debug)]
pub enum LoadBoardError {
    Io(std::io::Error),
    Parse(ParseBoardError),
}

impl From<std::io::Error> for LoadBoardError {
    fn from(err: std::io::Error) -> Self {
        LoadBoardError::Io(err)
    }
}

impl From<ParseBoardError> for LoadBoardError {
    fn from(err: ParseBoardError) -> Self {
        LoadBoardError::Parse(err)
    }
}

impl std::error::Error for LoadBoardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadBoardError::Io(err) => Some(err),
            LoadBoardError::Parse(err) => Some(err),
        }
    }
}

impl std::fmt::Display for LoadBoardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadBoardError::Io(_) => write!(f, "Could not read the board file"),
            LoadBoardError::Parse(_) => write!(f, "The board file is malformed"),
        }
    }
}
