//! Plain-text maze drawing for terminals and logs

use super::generator::Maze;

/// Draw the maze with `+`, `---` and `|`.
///
/// The top-left cell is marked `S` (ball start) and the bottom-right cell
/// `G` (goal). A 1x1 maze only shows the goal.
pub fn render_ascii(maze: &Maze) -> String {
    let rows = maze.rows();
    let cols = maze.cols();
    let mut out = String::with_capacity((rows * 2 + 1) * (cols * 4 + 2));

    out.push('+');
    for _ in 0..cols {
        out.push_str("---+");
    }
    out.push('\n');

    for row in 0..rows {
        out.push('|');
        for col in 0..cols {
            let mark = if row == rows - 1 && col == cols - 1 {
                'G'
            } else if row == 0 && col == 0 {
                'S'
            } else {
                ' '
            };
            out.push(' ');
            out.push(mark);
            out.push(' ');

            let open = col + 1 < cols && maze.vertical_walls()[row][col];
            out.push(if open { ' ' } else { '|' });
        }
        out.push('\n');

        out.push('+');
        for col in 0..cols {
            let open = row + 1 < rows && maze.horizontal_walls()[row][col];
            out.push_str(if open { "   +" } else { "---+" });
        }
        out.push('\n');
    }

    out
}
