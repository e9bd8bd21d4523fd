use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::errors::{LoadBoardError, ParseBoardError};
use crate::Board;

impl Board {
    /// Serializes the grid as comma-separated integers, one line per row,
    /// with no trailing comma.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        for row in self.tiles() {
            let fields: Vec<String> = row.iter().map(u32::to_string).collect();
            out.push_str(&fields.join(","));
            out.push('\n');
        }
        out
    }

    /// Parses a grid in the format written by [`Self::to_csv()`].
    ///
    /// The row count is the number of lines and the column count is taken
    /// from the first line. The returned board holds exactly the parsed
    /// tiles, with no starting spawns mixed in.
    pub fn from_csv(text: &str) -> Result<Self, ParseBoardError> {
        let mut grid: Vec<Vec<u32>> = Vec::new();
        for (line_idx, line) in text.lines().enumerate() {
            let mut row = Vec::new();
            for field in line.split(',') {
                let value =
                    field
                        .trim()
                        .parse::<u32>()
                        .map_err(|source| ParseBoardError::InvalidTile {
                            line: line_idx + 1,
                            source,
                        })?;
                row.push(value);
            }
            if let Some(first) = grid.first() {
                if row.len() != first.len() {
                    return Err(ParseBoardError::RaggedRow {
                        line: line_idx + 1,
                        expected: first.len(),
                        found: row.len(),
                    });
                }
            }
            grid.push(row);
        }
        if grid.is_empty() {
            return Err(ParseBoardError::Empty);
        }
        Ok(Self::from_grid(grid))
    }

    /// Writes the grid to `path` in the comma-separated text format.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> std::io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        writer.write_all(self.to_csv().as_bytes())?;
        writer.flush()
    }

    /// Reads a board back from a file written by [`Self::save_to_file()`].
    ///
    /// The file is parsed in full before any board is constructed, so a
    /// malformed file never leaves a half-loaded board behind.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadBoardError> {
        let text = std::fs::read_to_string(path)?;
        Ok(Self::from_csv(&text)?)
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use crate::arbitrary::GridInput;
    use crate::{Board, LoadBoardError, ParseBoardError};

    quickcheck! {
        fn csv_round_trip(input: GridInput) -> bool {
            let board = Board::from_grid(input.grid);
            let restored = Board::from_csv(&board.to_csv()).unwrap();
            restored.tiles() == board.tiles()
        }
    }

    #[test]
    fn csv_has_no_trailing_comma() {
        let board = Board::from_grid(vec![vec![2, 0, 4], vec![0, 8, 0]]);
        assert_eq!(board.to_csv(), "2,0,4\n0,8,0\n");
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = Board::from_csv("2,4\n8\n").unwrap_err();
        assert!(matches!(
            err,
            ParseBoardError::RaggedRow {
                line: 2,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn non_integer_fields_are_rejected() {
        let err = Board::from_csv("2,x\n").unwrap_err();
        assert!(matches!(err, ParseBoardError::InvalidTile { line: 1, .. }));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert!(matches!(Board::from_csv(""), Err(ParseBoardError::Empty)));
    }

    #[test]
    fn save_and_load_round_trip_through_a_file() {
        let board = Board::from_grid(vec![vec![2, 0, 4], vec![16, 8, 0]]);
        let path = std::env::temp_dir().join("twenty48_round_trip_test.txt");
        board.save_to_file(&path).unwrap();
        let restored = Board::load_from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(restored.tiles(), board.tiles());
        assert_eq!((restored.rows(), restored.columns()), (2, 3));
    }

    #[test]
    fn loading_a_missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("twenty48_no_such_file.txt");
        assert!(matches!(
            Board::load_from_file(path),
            Err(LoadBoardError::Io(_))
        ));
    }
}
