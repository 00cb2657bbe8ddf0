use crate::client::BoxInfo;
use std::collections::BTreeSet;

/// Local copy of the user's box grid.
///
/// Boxes are numbered `0..=total_squares`, so a grid of 100 shows 101 cells.
/// Selections outside that range, negative ones included, are kept; the server
/// doesn't bound them either. A negative total renders as an empty grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub total_squares: i64,
    pub selected: BTreeSet<i64>,
}

impl Grid {
    pub fn toggle(&mut self, index: i64) {
        if !self.selected.remove(&index) {
            self.selected.insert(index);
        }
    }

    /// Shift-click from `anchor` to `index`.
    ///
    /// Moving forward selects everything from the anchor to `index`, both ends
    /// included. Moving back deselects everything after `index` up to the anchor,
    /// leaving `index` itself alone.
    pub fn extend(&mut self, anchor: i64, index: i64) {
        if index > anchor {
            self.selected.extend(anchor..=index);
        } else if index < anchor {
            for i in index + 1..=anchor {
                self.selected.remove(&i);
            }
        }
    }

    /// Zero is a no-op.
    pub fn add_squares(&mut self, count: u32) {
        self.total_squares = self.total_squares.saturating_add(i64::from(count));
    }

    pub fn is_selected(&self, index: i64) -> bool {
        self.selected.contains(&index)
    }

    /// Lays the grid out `per_row` cells wide. `paint` gets each cell's
    /// padded label and whether it is selected, and returns what to print.
    pub fn render(&self, per_row: usize, paint: impl Fn(&str, bool) -> String) -> Vec<String> {
        let width = self.total_squares.to_string().len();
        let cells: Vec<String> = (0..=self.total_squares)
            .map(|i| {
                let selected = self.is_selected(i);
                let label = if selected {
                    format!("[{:>width$}]", i)
                } else {
                    format!(" {:>width$} ", i)
                };
                paint(&label, selected)
            })
            .collect();

        cells
            .chunks(per_row.max(1))
            .map(|row| row.join(" "))
            .collect()
    }
}

impl From<BoxInfo> for Grid {
    fn from(info: BoxInfo) -> Self {
        Self {
            total_squares: info.total_squares,
            selected: info.selected_squares.into_iter().collect(),
        }
    }
}

impl From<&Grid> for BoxInfo {
    fn from(grid: &Grid) -> Self {
        Self {
            total_squares: grid.total_squares,
            selected_squares: grid.selected.iter().copied().collect(),
        }
    }
}
