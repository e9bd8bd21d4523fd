use crate::Board;

/// Renders the grid as text, one line per row.
///
/// Every value is padded to the width of the highest value plus one,
/// alternating spaces in front and behind so the numbers come out roughly
/// centered within their column.
pub fn render_grid(board: &Board) -> String {
    let width = board.highest_value().to_string().len() + 1;
    let mut result = String::new();
    for row in board.tiles() {
        for &value in row {
            let mut cell = value.to_string();
            let mut front = true;
            while cell.len() < width {
                if front {
                    cell.insert(0, ' ');
                } else {
                    cell.push(' ');
                }
                front = !front;
            }
            result.push_str(&cell);
        }
        result.push('\n');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_are_padded_to_a_uniform_width() {
        let board = Board::from_grid(vec![vec![2, 2048], vec![0, 16]]);
        assert_eq!(render_grid(&board), "  2   2048\n  0    16 \n");
    }

    #[test]
    fn display_matches_the_renderer() {
        let board = Board::from_grid(vec![vec![2, 4], vec![0, 8]]);
        assert_eq!(format!("{}", board), render_grid(&board));
    }
}
