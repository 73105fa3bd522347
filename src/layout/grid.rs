//! Grid placement engine.
//!
//! A [`Grid`] is an ordered list of [`Row`]s and every row an ordered list of
//! [`Cell`]s. A cell's column is never stored: it is the sum of the horizontal
//! weights before it. Placing a cell at a logical `(row, column)` therefore
//! walks cumulative weights to find the physical index, and resolves overlaps
//! by splitting, shrinking or consuming removable filler.
//!
//! Placement is all-or-nothing. Every row a placement touches (the target row
//! and the rows reserved beneath a multi-row cell) is planned and validated
//! first; only then is anything mutated.
//!
//! # Example
//! ```
//! use config_grid::layout::{Cell, Grid};
//!
//! let mut grid = Grid::new();
//! grid.place(Cell::text("basic", 2, 1, "Name"), 0, 0)?;
//! grid.place(Cell::text_input("val", 1, 1, "", 34523), 0, 2)?;
//! grid.place(Cell::button("go", 1, 1, "Go", 7), 0, 3)?;
//! assert_eq!(grid.effective_width(0), 4);
//! # Ok::<(), config_grid::LayoutError>(())
//! ```

use crate::error::{LayoutError, Result};
use crate::property::PropertyStore;
use crate::render::InputSource;

use super::cell::{Cell, Payload};

/// Largest logical extent of a grid on either axis. A placement must end at
/// or before it: `column + horizontal` and `row + vertical` are both bounded.
pub const MAX_EXTENT: u32 = u16::MAX as u32;

/// One step of a path from a grid down to a (possibly nested) cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathStep {
    pub row: usize,
    pub index: usize,
}

/// Ordered sequence of cells. Its effective width is the sum of their weights.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    cells: Vec<Cell>,
}

/// Where a new cell lands relative to the existing cells of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Anchor {
    /// Past the end of the row, after an optional gap filler.
    Append { gap: u32 },
    /// On an exact cell boundary, before the cell at `index`.
    Before { index: usize },
    /// Inside the removable filler at `index`, which is cut around the new cell.
    Split { index: usize, lead: u32, trail: u32 },
    /// Overlapping the tail of the removable filler at `index`, which shrinks to `lead`.
    Shrink { index: usize, lead: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Insertion {
    anchor: Anchor,
    /// Weight still to absorb from the removable filler that follows the new cell.
    eat: u32,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn effective_width(&self) -> u32 {
        saturating_weight(self.cells.iter())
    }

    /// Tallest vertical span in the row; empty rows still count as one tier.
    pub fn max_span(&self) -> u32 {
        self.cells
            .iter()
            .map(Cell::vertical)
            .max()
            .unwrap_or(1)
            .max(1)
    }

    /// Column at which the cell at `index` starts.
    pub fn column_of(&self, index: usize) -> u32 {
        saturating_weight(self.cells.iter().take(index))
    }

    /// Cell covering `column`, with its physical index.
    pub fn cell_at_column(&self, column: u32) -> Option<(usize, &Cell)> {
        let mut start = 0;
        for (index, cell) in self.cells.iter().enumerate() {
            let end = start + cell.horizontal();
            if column < end {
                return Some((index, cell));
            }
            start = end;
        }
        None
    }

    fn plan(&self, column: u32, weight: u32) -> Option<Insertion> {
        let width = self.effective_width();
        if column >= width {
            return Some(Insertion {
                anchor: Anchor::Append {
                    gap: column - width,
                },
                eat: 0,
            });
        }

        let mut running = 0;
        let mut index = 0;
        while running < column {
            running += self.cells[index].horizontal();
            index += 1;
        }

        if running == column {
            return self.can_eat(index, weight).then_some(Insertion {
                anchor: Anchor::Before { index },
                eat: weight,
            });
        }

        // The column falls strictly inside the cell ending at `running`.
        let host_index = index - 1;
        let host = &self.cells[host_index];
        if !host.is_removable() {
            return None;
        }
        let over = running - column;
        let lead = host.horizontal() - over;

        if weight <= over {
            Some(Insertion {
                anchor: Anchor::Split {
                    index: host_index,
                    lead,
                    trail: over - weight,
                },
                eat: 0,
            })
        } else {
            let eat = weight - over;
            self.can_eat(index, eat).then_some(Insertion {
                anchor: Anchor::Shrink {
                    index: host_index,
                    lead,
                },
                eat,
            })
        }
    }

    /// Whether the removable filler starting at `start` can absorb `amount`.
    /// Running off the end of the row is fine: the row simply grows.
    fn can_eat(&self, start: usize, amount: u32) -> bool {
        let mut remaining = amount;
        for cell in &self.cells[start.min(self.cells.len())..] {
            if remaining == 0 {
                break;
            }
            if !cell.is_removable() {
                return false;
            }
            remaining -= remaining.min(cell.horizontal());
        }
        true
    }

    fn apply(&mut self, insertion: Insertion, cell: Cell) {
        match insertion.anchor {
            Anchor::Append { gap } => {
                if gap > 0 {
                    self.cells.push(Cell::spacing(gap, 1));
                }
                self.cells.push(cell);
            }
            Anchor::Before { index } => {
                self.cells.insert(index, cell);
                self.eat_spacing(index + 1, insertion.eat);
            }
            Anchor::Split { index, lead, trail } => {
                let host_span = self.cells[index].vertical();
                self.cells[index].set_horizontal(lead);
                self.cells.insert(index + 1, cell);
                if trail > 0 {
                    self.cells.insert(index + 2, Cell::spacing(trail, host_span));
                }
            }
            Anchor::Shrink { index, lead } => {
                self.cells[index].set_horizontal(lead);
                self.cells.insert(index + 1, cell);
                self.eat_spacing(index + 2, insertion.eat);
            }
        }
    }

    /// Consume `amount` weight from the removable filler starting at `start`.
    /// Feasibility was established by [`Row::can_eat`].
    fn eat_spacing(&mut self, start: usize, amount: u32) {
        let mut remaining = amount;
        while remaining > 0 && start < self.cells.len() {
            let weight = self.cells[start].horizontal();
            if weight <= remaining {
                self.cells.remove(start);
                remaining -= weight;
            } else {
                self.cells[start].set_horizontal(weight - remaining);
                remaining = 0;
            }
        }
    }

    /// Merge neighbouring single-tier removable fillers into one.
    fn coalesce_spacing(&mut self) {
        let mut index = 1;
        while index < self.cells.len() {
            let (before, after) = self.cells.split_at_mut(index);
            let prev = &mut before[index - 1];
            let current = &after[0];
            if prev.is_removable()
                && current.is_removable()
                && prev.vertical() == 1
                && current.vertical() == 1
            {
                let merged = prev.horizontal() + current.horizontal();
                prev.set_horizontal(merged);
                self.cells.remove(index);
            } else {
                index += 1;
            }
        }
    }
}

/// Ordered rows of cells. Rows are contiguous: placing at row `r` creates any
/// missing rows before it as empty rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Row>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row(&self, row: usize) -> Option<&Row> {
        self.rows.get(row)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Effective width of `row`; rows that do not exist yet are zero wide.
    pub fn effective_width(&self, row: usize) -> u32 {
        self.rows.get(row).map(Row::effective_width).unwrap_or(0)
    }

    /// Number of cells directly in this grid (nested grids not included).
    pub fn cell_count(&self) -> usize {
        self.rows.iter().map(Row::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().all(Row::is_empty)
    }

    /// Place `cell` at logical `(row, column)`.
    ///
    /// Cells with a vertical span above one reserve the rows beneath them with
    /// fixed filler of the same horizontal weight. On error nothing changes.
    pub fn place(&mut self, cell: Cell, row: i64, column: i64) -> Result<()> {
        let (row, column) = validate_request(&cell, row, column)?;
        let plans = self.plan_placement(cell.horizontal(), cell.vertical(), row, column)?;

        let last_row = plans.last().map(|(r, _)| *r).unwrap_or(row);
        self.ensure_row(last_row);

        let horizontal = cell.horizontal();
        let vertical = cell.vertical();
        let mut pending = Some(cell);
        for (offset, (target, insertion)) in plans.into_iter().enumerate() {
            let placed = match pending.take() {
                Some(cell) => cell,
                None => Cell::fixed_spacing(horizontal, vertical - offset as u32),
            };
            self.rows[target].apply(insertion, placed);
        }
        Ok(())
    }

    /// Check whether `cell` could be placed at `(row, column)` without mutating.
    pub fn check_placement(&self, cell: &Cell, row: i64, column: i64) -> Result<()> {
        let (row, column) = validate_request(cell, row, column)?;
        self.plan_placement(cell.horizontal(), cell.vertical(), row, column)
            .map(|_| ())
    }

    fn plan_placement(
        &self,
        horizontal: u32,
        vertical: u32,
        row: usize,
        column: u32,
    ) -> Result<Vec<(usize, Insertion)>> {
        let mut plans = Vec::with_capacity(vertical as usize);
        for offset in 0..vertical as usize {
            let target = row + offset;
            let insertion = match self.rows.get(target) {
                Some(existing) => existing.plan(column, horizontal).ok_or(
                    LayoutError::PlacementConflict {
                        row: target,
                        column,
                    },
                )?,
                None => Insertion {
                    anchor: Anchor::Append { gap: column },
                    eat: 0,
                },
            };
            plans.push((target, insertion));
        }
        Ok(plans)
    }

    fn ensure_row(&mut self, row: usize) {
        while self.rows.len() <= row {
            self.rows.push(Row::new());
        }
    }

    /// First cell (depth-first, rows then cells) carrying `identity`. Fillers never match.
    pub fn find(&self, identity: &str) -> Option<&Cell> {
        for row in &self.rows {
            for cell in &row.cells {
                if cell.is_filler() {
                    continue;
                }
                if cell.identity() == identity {
                    return Some(cell);
                }
                if let Some(found) = cell.grid().and_then(|grid| grid.find(identity)) {
                    return Some(found);
                }
            }
        }
        None
    }

    pub fn find_mut(&mut self, identity: &str) -> Option<&mut Cell> {
        let path = self.path_of(identity)?;
        self.cell_at_path_mut(&path)
    }

    /// Current content of the first feature named `identity`; missing features read as `None`.
    pub fn read_content(&self, identity: &str) -> Option<String> {
        self.find(identity).and_then(Cell::content)
    }

    /// [`Grid::read_content`] with property text read from `properties`.
    pub fn resolve_content(&self, identity: &str, properties: &dyn PropertyStore) -> Option<String> {
        self.find(identity)
            .and_then(|cell| cell.resolve_content(properties))
    }

    /// Path to the first cell carrying `identity`, matching [`Grid::find`] order.
    pub fn path_of(&self, identity: &str) -> Option<Vec<PathStep>> {
        let mut found = None;
        self.walk(&mut |path, cell| {
            if found.is_none() && !cell.is_filler() && cell.identity() == identity {
                found = Some(path.to_vec());
            }
        });
        found
    }

    pub fn cell_at_path(&self, path: &[PathStep]) -> Option<&Cell> {
        let (first, rest) = path.split_first()?;
        let cell = self.rows.get(first.row)?.cells.get(first.index)?;
        if rest.is_empty() {
            Some(cell)
        } else {
            cell.grid()?.cell_at_path(rest)
        }
    }

    pub fn cell_at_path_mut(&mut self, path: &[PathStep]) -> Option<&mut Cell> {
        let (first, rest) = path.split_first()?;
        let cell = self.rows.get_mut(first.row)?.cells.get_mut(first.index)?;
        if rest.is_empty() {
            Some(cell)
        } else {
            cell.grid_mut()?.cell_at_path_mut(rest)
        }
    }

    /// Visit every cell depth-first with its path from this grid.
    pub fn walk(&self, visit: &mut dyn FnMut(&[PathStep], &Cell)) {
        let mut path = Vec::new();
        self.walk_inner(&mut path, visit);
    }

    fn walk_inner(&self, path: &mut Vec<PathStep>, visit: &mut dyn FnMut(&[PathStep], &Cell)) {
        for (row_index, row) in self.rows.iter().enumerate() {
            for (index, cell) in row.cells.iter().enumerate() {
                path.push(PathStep {
                    row: row_index,
                    index,
                });
                visit(path, cell);
                if let Some(grid) = cell.grid() {
                    grid.walk_inner(path, visit);
                }
                path.pop();
            }
        }
    }

    /// Remove the first feature named `identity`, searching nested composites.
    ///
    /// The cell is replaced by removable filler of the same weight so its
    /// neighbours keep their columns, and the fixed filler it reserved in the
    /// rows beneath becomes removable.
    pub fn remove(&mut self, identity: &str) -> Option<Cell> {
        for row_index in 0..self.rows.len() {
            for index in 0..self.rows[row_index].cells.len() {
                let cell = &self.rows[row_index].cells[index];
                if cell.is_filler() {
                    continue;
                }
                if cell.identity() == identity {
                    return Some(self.take_at(row_index, index));
                }
                let nested = self.rows[row_index].cells[index]
                    .grid_mut()
                    .and_then(|grid| grid.remove(identity));
                if nested.is_some() {
                    return nested;
                }
            }
        }
        None
    }

    fn take_at(&mut self, row: usize, index: usize) -> Cell {
        let column = self.rows[row].column_of(index);
        let horizontal = self.rows[row].cells[index].horizontal();
        let removed = std::mem::replace(
            &mut self.rows[row].cells[index],
            Cell::spacing(horizontal, 1),
        );

        for below in 1..removed.vertical() as usize {
            let Some(reserved_row) = self.rows.get_mut(row + below) else {
                break;
            };
            let reserved = reserved_row
                .cell_at_column(column)
                .filter(|(i, cell)| {
                    cell.is_fixed() && cell.horizontal() == horizontal
                        && reserved_row.column_of(*i) == column
                })
                .map(|(i, _)| i);
            if let Some(i) = reserved {
                reserved_row.cells[i].release_reservation();
                reserved_row.coalesce_spacing();
            }
        }
        self.rows[row].coalesce_spacing();
        removed
    }

    /// Pull the latest stored text for every text input, nested ones included.
    /// Returns how many inputs changed.
    pub fn capture_inputs<S: InputSource + ?Sized>(&mut self, source: &S) -> usize {
        let mut changed = 0;
        for row in &mut self.rows {
            for cell in &mut row.cells {
                if let Some(grid) = cell.grid_mut() {
                    changed += grid.capture_inputs(source);
                    continue;
                }
                let current = match cell.payload() {
                    Some(Payload::TextInput { value, .. }) => value.clone(),
                    _ => continue,
                };
                if let Some(stored) = source.stored_text(cell.identity()) {
                    if stored != current {
                        cell.set_input_value(stored);
                        changed += 1;
                    }
                }
            }
        }
        changed
    }
}

fn validate_request(cell: &Cell, row: i64, column: i64) -> Result<(usize, u32)> {
    let invalid = || LayoutError::InvalidPosition { row, column };
    let row_index = u32::try_from(row).map_err(|_| invalid())?;
    let column_index = u32::try_from(column).map_err(|_| invalid())?;
    let within = |start: u32, extent: u32| {
        start
            .checked_add(extent)
            .is_some_and(|end| end <= MAX_EXTENT)
    };
    if !within(row_index, cell.vertical()) || !within(column_index, cell.horizontal()) {
        return Err(invalid());
    }
    Ok((row_index as usize, column_index))
}

fn saturating_weight<'a>(cells: impl Iterator<Item = &'a Cell>) -> u32 {
    cells.fold(0u32, |total, cell| total.saturating_add(cell.horizontal()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::cell::{FIXED_SPACING, REMOVABLE_SPACING};

    /// `(identity, start, end)` for every cell of `row`.
    fn spans(grid: &Grid, row: usize) -> Vec<(String, u32, u32)> {
        let mut start = 0;
        grid.row(row)
            .map(|r| r.cells())
            .unwrap_or(&[])
            .iter()
            .map(|cell| {
                let end = start + cell.horizontal();
                let span = (cell.identity().to_string(), start, end);
                start = end;
                span
            })
            .collect()
    }

    fn span(identity: &str, start: u32, end: u32) -> (String, u32, u32) {
        (identity.to_string(), start, end)
    }

    fn content_columns(grid: &Grid, row: usize) -> Vec<(String, u32)> {
        spans(grid, row)
            .into_iter()
            .filter(|(id, _, _)| id != REMOVABLE_SPACING && id != FIXED_SPACING)
            .map(|(id, start, _)| (id, start))
            .collect()
    }

    #[test]
    fn exact_boundaries_append_without_filler() {
        let mut grid = Grid::new();
        grid.place(Cell::text("basic", 2, 1, "Basic"), 0, 0).unwrap();
        grid.place(Cell::text_input("val", 1, 1, "", 1), 0, 2).unwrap();
        grid.place(Cell::button("go", 1, 1, "Go", 2), 0, 3).unwrap();

        assert_eq!(grid.row(0).unwrap().len(), 3);
        assert_eq!(grid.effective_width(0), 4);
        assert_eq!(
            spans(&grid, 0),
            vec![span("basic", 0, 2), span("val", 2, 3), span("go", 3, 4)]
        );
    }

    #[test]
    fn appending_at_width_grows_by_weight() {
        let mut grid = Grid::new();
        grid.place(Cell::text("a", 3, 1, "a"), 0, 0).unwrap();
        let before = grid.effective_width(0);
        grid.place(Cell::text("b", 2, 1, "b"), 0, i64::from(before)).unwrap();
        assert_eq!(grid.effective_width(0), before + 2);
        assert_eq!(grid.row(0).unwrap().len(), 2);
    }

    #[test]
    fn gap_is_filled_with_removable_spacing() {
        let mut grid = Grid::new();
        grid.place(Cell::text("far", 1, 1, "far"), 0, 5).unwrap();

        let row = grid.row(0).unwrap();
        assert_eq!(row.len(), 2);
        assert!(row.cells()[0].is_removable());
        assert_eq!(row.cells()[0].horizontal(), 5);
        assert_eq!(grid.effective_width(0), 6);
    }

    #[test]
    fn rows_are_created_contiguously() {
        let mut grid = Grid::new();
        grid.place(Cell::text("deep", 1, 1, "x"), 3, 0).unwrap();
        assert_eq!(grid.row_count(), 4);
        assert!(grid.row(0).unwrap().is_empty());
        assert!(grid.row(2).unwrap().is_empty());
        assert_eq!(grid.row(3).unwrap().len(), 1);
    }

    #[test]
    fn negative_positions_are_rejected() {
        let mut grid = Grid::new();
        let err = grid.place(Cell::text("x", 1, 1, "x"), -1, 0).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidPosition { row: -1, column: 0 }));
        let err = grid.place(Cell::text("x", 1, 1, "x"), 0, -2).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidPosition { row: 0, column: -2 }));
        assert_eq!(grid.row_count(), 0);
    }

    #[test]
    fn placements_past_the_grid_extent_are_rejected() {
        let mut grid = Grid::new();
        let far = i64::from(u32::MAX);
        let err = grid.place(Cell::text("far", 1, 1, "x"), 0, far).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidPosition { row: 0, .. }));
        assert_eq!(grid.effective_width(0), 0);
        assert_eq!(grid.row_count(), 0);

        let edge = i64::from(MAX_EXTENT);
        assert!(grid.place(Cell::text("wide", 2, 1, "x"), 0, edge - 1).is_err());
        assert!(grid.place(Cell::text("tall", 1, u32::MAX, "x"), 0, 0).is_err());
        assert!(grid.place(Cell::text("deep", 1, 2, "x"), edge - 1, 0).is_err());
        assert_eq!(grid.row_count(), 0);

        grid.place(Cell::text("last", 1, 1, "x"), 0, edge - 1).unwrap();
        assert_eq!(grid.effective_width(0), MAX_EXTENT);
        assert_eq!(grid.row(0).unwrap().column_of(1), MAX_EXTENT - 1);
    }

    #[test]
    fn filler_is_split_around_a_contained_cell() {
        let mut grid = Grid::new();
        grid.place(Cell::text("left", 2, 1, "l"), 0, 0).unwrap();
        grid.place(Cell::text("right", 1, 1, "r"), 0, 7).unwrap();
        assert_eq!(spans(&grid, 0)[1], span(REMOVABLE_SPACING, 2, 7));

        grid.place(Cell::text("new", 2, 1, "n"), 0, 3).unwrap();
        assert_eq!(
            spans(&grid, 0),
            vec![
                span("left", 0, 2),
                span(REMOVABLE_SPACING, 2, 3),
                span("new", 3, 5),
                span(REMOVABLE_SPACING, 5, 7),
                span("right", 7, 8),
            ]
        );
    }

    #[test]
    fn split_that_fills_the_tail_leaves_no_trailing_filler() {
        let mut grid = Grid::new();
        grid.place(Cell::text("end", 1, 1, "e"), 0, 4).unwrap();
        grid.place(Cell::text("fill", 2, 1, "f"), 0, 2).unwrap();
        assert_eq!(
            spans(&grid, 0),
            vec![
                span(REMOVABLE_SPACING, 0, 2),
                span("fill", 2, 4),
                span("end", 4, 5),
            ]
        );
    }

    #[test]
    fn placement_inside_content_conflicts_and_leaves_row_untouched() {
        let mut grid = Grid::new();
        grid.place(Cell::text("wide", 3, 1, "w"), 0, 0).unwrap();
        let snapshot = grid.clone();

        let err = grid.place(Cell::text("x", 1, 1, "x"), 0, 1).unwrap_err();
        assert!(matches!(err, LayoutError::PlacementConflict { row: 0, column: 1 }));
        assert_eq!(grid, snapshot);
    }

    #[test]
    fn overlapping_later_content_conflicts() {
        let mut grid = Grid::new();
        grid.place(Cell::text("a", 1, 1, "a"), 0, 6).unwrap();
        grid.place(Cell::text("b", 1, 1, "b"), 0, 2).unwrap();
        let snapshot = grid.clone();

        // [4, 7) would run into "a" at [6, 7).
        let err = grid.place(Cell::text("c", 3, 1, "c"), 0, 4).unwrap_err();
        assert!(matches!(err, LayoutError::PlacementConflict { .. }));
        assert_eq!(grid, snapshot);

        grid.place(Cell::text("c", 2, 1, "c"), 0, 4).unwrap();
        assert_eq!(
            content_columns(&grid, 0),
            vec![("b".into(), 2), ("c".into(), 4), ("a".into(), 6)]
        );
    }

    #[test]
    fn boundary_insert_before_content_conflicts() {
        let mut grid = Grid::new();
        grid.place(Cell::text("a", 1, 1, "a"), 0, 0).unwrap();
        let snapshot = grid.clone();
        let err = grid.place(Cell::text("b", 1, 1, "b"), 0, 0).unwrap_err();
        assert!(matches!(err, LayoutError::PlacementConflict { .. }));
        assert_eq!(grid, snapshot);
    }

    #[test]
    fn shrink_then_eat_keeps_later_content_in_place() {
        let mut grid = Grid::new();
        grid.place(Cell::text("a", 1, 1, "a"), 0, 6).unwrap();
        // Two adjacent removable fillers: [0, 2) and [2, 6).
        grid.place(Cell::spacing(2, 1), 0, 0).unwrap();
        assert_eq!(grid.row(0).unwrap().len(), 3);

        grid.place(Cell::text("c", 3, 1, "c"), 0, 1).unwrap();
        assert_eq!(
            spans(&grid, 0),
            vec![
                span(REMOVABLE_SPACING, 0, 1),
                span("c", 1, 4),
                span(REMOVABLE_SPACING, 4, 6),
                span("a", 6, 7),
            ]
        );
    }

    #[test]
    fn eating_past_row_end_grows_the_row() {
        let mut grid = Grid::new();
        grid.place(Cell::text("a", 1, 1, "a"), 0, 2).unwrap();
        grid.remove("a").unwrap();
        // Row is now a single removable filler [0, 3).
        grid.place(Cell::text("wide", 5, 1, "w"), 0, 0).unwrap();
        assert_eq!(spans(&grid, 0), vec![span("wide", 0, 5)]);
    }

    #[test]
    fn multi_row_cell_reserves_fixed_filler_beneath() {
        let mut grid = Grid::new();
        grid.place(Cell::text("a", 1, 1, "a"), 1, 0).unwrap();
        grid.place(Cell::text("b", 1, 2, "b"), 1, 1).unwrap();

        let (index, reserved) = grid.row(2).unwrap().cell_at_column(1).unwrap();
        assert!(reserved.is_fixed());
        assert_eq!(reserved.horizontal(), 1);
        assert_eq!(reserved.vertical(), 1);
        assert_eq!(grid.row(2).unwrap().column_of(index), 1);
    }

    #[test]
    fn reservation_chain_decrements_span() {
        let mut grid = Grid::new();
        grid.place(Cell::text("tall", 2, 3, "t"), 0, 0).unwrap();
        assert_eq!(grid.row_count(), 3);
        let first = &grid.row(1).unwrap().cells()[0];
        let second = &grid.row(2).unwrap().cells()[0];
        assert!(first.is_fixed() && second.is_fixed());
        assert_eq!((first.horizontal(), first.vertical()), (2, 2));
        assert_eq!((second.horizontal(), second.vertical()), (2, 1));
    }

    #[test]
    fn fixed_filler_cannot_be_overwritten() {
        let mut grid = Grid::new();
        grid.place(Cell::text("tall", 1, 2, "t"), 0, 2).unwrap();
        let snapshot = grid.clone();

        let err = grid.place(Cell::text("x", 1, 1, "x"), 1, 2).unwrap_err();
        assert!(matches!(err, LayoutError::PlacementConflict { row: 1, column: 2 }));
        // Eating through the gap filler into the reservation also fails.
        let err = grid.place(Cell::text("y", 3, 1, "y"), 1, 0).unwrap_err();
        assert!(matches!(err, LayoutError::PlacementConflict { .. }));
        assert_eq!(grid, snapshot);

        grid.place(Cell::text("z", 2, 1, "z"), 1, 0).unwrap();
        assert_eq!(
            spans(&grid, 1),
            vec![span("z", 0, 2), span(FIXED_SPACING, 2, 3)]
        );
    }

    #[test]
    fn failed_reservation_rolls_back_the_whole_placement() {
        let mut grid = Grid::new();
        grid.place(Cell::text("below", 1, 1, "b"), 1, 0).unwrap();
        let snapshot = grid.clone();

        let err = grid.place(Cell::text("tall", 1, 2, "t"), 0, 0).unwrap_err();
        assert!(matches!(err, LayoutError::PlacementConflict { row: 1, column: 0 }));
        assert_eq!(grid, snapshot);
    }

    #[test]
    fn placed_content_never_moves_column() {
        let mut grid = Grid::new();
        let requests: [(&str, u32, i64); 6] = [
            ("a", 1, 9),
            ("b", 2, 3),
            ("c", 1, 0),
            ("d", 3, 5),
            ("e", 1, 1),
            ("f", 2, 7),
        ];
        let mut expected = Vec::new();
        for (id, weight, column) in requests {
            if grid
                .place(Cell::text(id, weight, 1, id), 0, column)
                .is_ok()
            {
                expected.push((id.to_string(), column as u32));
            }
            let mut actual = content_columns(&grid, 0);
            actual.sort_by_key(|(_, col)| *col);
            let mut sorted = expected.clone();
            sorted.sort_by_key(|(_, col)| *col);
            assert_eq!(actual, sorted);
        }
        // Real content partitions without overlap.
        let spans = spans(&grid, 0);
        for pair in spans.windows(2) {
            assert_eq!(pair[0].2, pair[1].1);
        }
    }

    #[test]
    fn find_searches_nested_composites_first_match_wins() {
        let mut inner = Grid::new();
        inner.place(Cell::text("label", 1, 1, "inner"), 0, 0).unwrap();
        let mut grid = Grid::new();
        grid.place(Cell::composite("box", 2, 1, inner), 0, 0).unwrap();
        grid.place(Cell::text("label", 1, 1, "outer"), 1, 0).unwrap();

        assert_eq!(grid.read_content("label").as_deref(), Some("inner"));
        assert!(grid.find("box").unwrap().grid().is_some());
        assert_eq!(grid.read_content("missing"), None);
        assert_eq!(grid.find(REMOVABLE_SPACING), None);
    }

    #[test]
    fn remove_leaves_filler_and_releases_reservation() {
        let mut grid = Grid::new();
        grid.place(Cell::text("a", 1, 1, "a"), 0, 0).unwrap();
        grid.place(Cell::text("tall", 2, 2, "t"), 0, 1).unwrap();
        grid.place(Cell::text("c", 1, 1, "c"), 0, 3).unwrap();

        let removed = grid.remove("tall").unwrap();
        assert_eq!(removed.identity(), "tall");
        assert_eq!(
            spans(&grid, 0),
            vec![
                span("a", 0, 1),
                span(REMOVABLE_SPACING, 1, 3),
                span("c", 3, 4),
            ]
        );
        assert!(grid.row(1).unwrap().cells().iter().all(Cell::is_removable));

        // The freed reservation can now be used.
        grid.place(Cell::text("under", 2, 1, "u"), 1, 1).unwrap();
        assert_eq!(grid.remove("missing"), None);
    }

    #[test]
    fn path_lookup_matches_find() {
        let mut inner = Grid::new();
        inner.place(Cell::text("deep", 1, 1, "d"), 1, 2).unwrap();
        let mut grid = Grid::new();
        grid.place(Cell::composite("box", 1, 1, inner), 0, 3).unwrap();

        let path = grid.path_of("deep").unwrap();
        assert_eq!(
            path,
            vec![PathStep { row: 0, index: 1 }, PathStep { row: 1, index: 1 }]
        );
        assert_eq!(grid.cell_at_path(&path), grid.find("deep"));
        grid.find_mut("deep").unwrap().rename("renamed");
        assert!(grid.find("renamed").is_some());
    }
}
