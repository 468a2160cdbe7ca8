//! A 2-D byte grid with possibly ragged rows

/// Offsets of the 8 cells surrounding a position
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Grid of ASCII cells
///
/// Rows may differ in length. Reads outside the grid, including past the end
/// of a short row, return `None` and never panic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharGrid {
    rows: Vec<Vec<u8>>,
}

impl CharGrid {
    /// Build a grid from the non-blank lines of `input`
    pub fn parse(input: &str) -> Self {
        Self::from_lines(input.lines().filter(|line| !line.trim().is_empty()))
    }

    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            rows: lines
                .into_iter()
                .map(|line| line.trim_end_matches('\r').as_bytes().to_vec())
                .collect(),
        }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, row: usize) -> Option<&[u8]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.rows.get(row)?.get(col).copied()
    }

    /// Overwrite a cell, returning `false` if it lies outside the grid
    pub fn set(&mut self, row: usize, col: usize, value: u8) -> bool {
        match self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// All positions holding `value`, row-major
    pub fn positions_of(&self, value: u8) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows.iter().enumerate().flat_map(move |(r, row)| {
            row.iter()
                .enumerate()
                .filter(move |&(_, &cell)| cell == value)
                .map(move |(c, _)| (r, c))
        })
    }

    /// Number of the 8 surrounding cells holding `value`
    pub fn count_neighbors(&self, row: usize, col: usize, value: u8) -> usize {
        NEIGHBOR_OFFSETS
            .iter()
            .filter_map(|&(dr, dc)| {
                let r = row.checked_add_signed(dr)?;
                let c = col.checked_add_signed(dc)?;
                self.get(r, c)
            })
            .filter(|&cell| cell == value)
            .count()
    }

    /// Rows rendered as text, for visualizations
    pub fn render(&self) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| String::from_utf8_lossy(row).into_owned())
            .collect()
    }
}
