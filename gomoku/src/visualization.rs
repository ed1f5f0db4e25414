use crate::{Board, BoundingBox, Position, Viewport};

/// Draws the part of the board inside the viewport.
///
/// Each cell is three characters wide. The `highlights` (the last move, or the
/// winning line) are put in brackets. The range of x coordinates is printed
/// above the box, and every row is labelled with its y coordinate.
pub fn visualize_window(board: &Board, viewport: &Viewport, highlights: &[Position]) -> String {
    let BoundingBox {
        x_min,
        y_min,
        x_max,
        y_max,
    } = viewport.bbox();
    let label_width = y_min.to_string().len().max(y_max.to_string().len());
    let columns = x_min..=x_max;

    // Draw the top of the box
    let mut result = format!("{:>w$}   x = {}..={}\n", "", x_min, x_max, w = label_width);
    result += &format!("{:>w$} ╭", "", w = label_width);
    for _ in columns.clone() {
        result += "───";
    }
    result += "╮\n";

    for y in y_min..=y_max {
        result += &format!("{:>w$} │", y, w = label_width);
        for x in columns.clone() {
            let position = Position { x, y };
            let symbol = board.get(position).map_or('·', |player| player.symbol());
            if highlights.contains(&position) {
                result += &format!("[{}]", symbol);
            } else {
                result += &format!(" {} ", symbol);
            }
        }
        result += "│\n";
    }

    // Draw the bottom of the box
    result += &format!("{:>w$} ╰", "", w = label_width);
    for _ in columns {
        result += "───";
    }
    result += "╯";
    result
}
