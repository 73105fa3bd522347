use crate::geometry::Rect;
use crate::property::PropertyStore;
use crate::render::{Element, ElementContent, Renderer};

use super::cell::{Cell, CellKind, Payload};
use super::grid::Grid;

/// A cell together with the rectangle the measurement pass allocated to it.
#[derive(Debug, Clone, PartialEq)]
pub struct SolvedCell<'a> {
    pub cell: &'a Cell,
    pub rect: Rect,
    /// Nesting depth; cells of the top-level grid are at depth 0.
    pub depth: usize,
}

impl SolvedCell<'_> {
    /// Fillers take space but show nothing; composites are drawn through their children.
    pub fn is_visible(&self) -> bool {
        matches!(self.cell.kind(), CellKind::Leaf(_))
    }
}

/// Inputs the draw pass needs besides the grid itself.
pub struct DrawContext<'a> {
    /// Height of one vertical-span tier.
    pub unit: u16,
    pub properties: &'a dyn PropertyStore,
}

impl Grid {
    /// Measure every cell, depth-first over rows then cells.
    ///
    /// Row height is `unit` times the tallest span in the row. Each row splits
    /// `area.width` evenly over its effective width; a cell gets its weight in
    /// those units, offset by the weight before it. Composites recurse into
    /// their own rectangle. The pass is pure and can be re-run on every resize.
    pub fn solve(&self, area: Rect, unit: u16) -> Vec<SolvedCell<'_>> {
        let mut solved = Vec::with_capacity(self.cell_count());
        self.solve_into(area, unit, 0, &mut solved);
        solved
    }

    fn solve_into<'a>(&'a self, area: Rect, unit: u16, depth: usize, out: &mut Vec<SolvedCell<'a>>) {
        let mut y = area.y;
        for row in self.rows() {
            let row_height = unit.saturating_mul(clamp_u16(row.max_span()));
            let width = row.effective_width();
            if width > 0 {
                let unit_width = u32::from(area.width) / width;
                let mut preceding = 0u32;
                for cell in row.cells() {
                    let rect = Rect::new(
                        area.x.saturating_add(clamp_u16(unit_width.saturating_mul(preceding))),
                        y,
                        clamp_u16(unit_width.saturating_mul(cell.horizontal())),
                        unit.saturating_mul(clamp_u16(cell.vertical())),
                    );
                    out.push(SolvedCell { cell, rect, depth });
                    if let Some(grid) = cell.grid() {
                        grid.solve_into(rect, unit, depth + 1, out);
                    }
                    preceding = preceding.saturating_add(cell.horizontal());
                }
            }
            y = y.saturating_add(row_height);
        }
    }

    /// Total height in span tiers: the sum of every row's tallest span.
    pub fn height_units(&self) -> u32 {
        self.rows()
            .iter()
            .fold(0u32, |total, row| total.saturating_add(row.max_span()))
    }

    /// Measure, then hand every leaf to `renderer`. Returns how many elements were drawn.
    ///
    /// Property text falls back to its default when the store has no value;
    /// text inputs show whatever the renderer last stored for them.
    pub fn draw(&self, area: Rect, ctx: &DrawContext<'_>, renderer: &mut dyn Renderer) -> usize {
        let mut drawn = 0;
        for solved in self.solve(area, ctx.unit) {
            let Some(payload) = solved.cell.payload() else {
                continue;
            };
            let identity = solved.cell.identity();
            let content = match payload {
                Payload::Text { text } => ElementContent::Text(text.clone()),
                Payload::PropertyText { property, fallback } => {
                    ElementContent::Text(ctx.properties.read_or(property, fallback))
                }
                Payload::Button { label, code } => ElementContent::Button {
                    label: label.clone(),
                    code: *code,
                },
                Payload::TextInput { code, value } => ElementContent::TextInput {
                    text: renderer
                        .stored_text(identity)
                        .unwrap_or_else(|| value.clone()),
                    code: *code,
                },
            };
            renderer.draw(&Element {
                identity,
                rect: solved.rect,
                content,
            });
            drawn += 1;
        }
        drawn
    }
}

fn clamp_u16(value: u32) -> u16 {
    value.min(u32::from(u16::MAX)) as u16
}
