use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::surface::{NodeId, Surface};
use crate::ui::theme::Theme;

pub const LINE_BREAK_GLYPH: char = '\u{21b5}'; // ↵

/// One terminal cell of laid-out surface text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridCell {
    pub glyph: char,
    /// Linear offset of the character in the surface's rendered text.
    pub offset: usize,
    pub node: NodeId,
}

/// Surface text hard-wrapped to a fixed width. Rendering and hit testing both
/// go through the same grid, so a click always lands on the node that was drawn.
pub struct CellGrid {
    rows: Vec<Vec<GridCell>>,
}

impl CellGrid {
    pub fn layout(surface: &Surface, width: usize) -> Self {
        let mut rows: Vec<Vec<GridCell>> = vec![Vec::new()];
        if width == 0 {
            return Self { rows };
        }
        let mut offset = 0;
        for node in surface.text_nodes(surface.root()) {
            let Some(text) = surface.text(node) else {
                continue;
            };
            for ch in text.chars() {
                if rows.last().map_or(0, Vec::len) >= width {
                    rows.push(Vec::new());
                }
                let glyph = if ch == '\n' { LINE_BREAK_GLYPH } else { ch };
                if let Some(row) = rows.last_mut() {
                    row.push(GridCell {
                        glyph,
                        offset,
                        node,
                    });
                }
                offset += 1;
                if ch == '\n' {
                    rows.push(Vec::new());
                }
            }
        }
        Self { rows }
    }

    pub fn rows(&self) -> &[Vec<GridCell>] {
        &self.rows
    }

    /// Row holding `offset`; offsets past the text sit on the last row.
    pub fn row_of(&self, offset: usize) -> usize {
        self.rows
            .iter()
            .position(|row| row.iter().any(|c| c.offset == offset))
            .unwrap_or(self.rows.len().saturating_sub(1))
    }

    /// First visible row that keeps `offset` on screen.
    pub fn scroll_for(&self, offset: usize, height: usize) -> usize {
        (self.row_of(offset) + 1).saturating_sub(height)
    }

    pub fn cell_at(&self, col: usize, row: usize) -> Option<&GridCell> {
        self.rows.get(row)?.get(col)
    }
}

/// Inner drawing rect and scroll position of the target view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Viewport {
    pub inner: Rect,
    pub scroll: usize,
}

impl Viewport {
    pub fn compute(area: Rect, surface: &Surface, typed_len: usize) -> Self {
        let inner = Block::bordered().inner(area);
        let grid = CellGrid::layout(surface, inner.width as usize);
        Self {
            inner,
            scroll: grid.scroll_for(typed_len, inner.height as usize),
        }
    }

    /// Node drawn at the given screen cell, if any.
    pub fn hit_test(&self, surface: &Surface, column: u16, row: u16) -> Option<NodeId> {
        let inner = self.inner;
        if column < inner.x
            || row < inner.y
            || column >= inner.x + inner.width
            || row >= inner.y + inner.height
        {
            return None;
        }
        let grid = CellGrid::layout(surface, inner.width as usize);
        let col = (column - inner.x) as usize;
        let line = (row - inner.y) as usize + self.scroll;
        grid.cell_at(col, line).map(|c| c.node)
    }
}

/// The read-only target text, dimmed up to what has been typed.
pub struct TargetArea<'a> {
    surface: &'a Surface,
    typed_len: usize,
    theme: &'a Theme,
}

impl<'a> TargetArea<'a> {
    pub fn new(surface: &'a Surface, typed_len: usize, theme: &'a Theme) -> Self {
        Self {
            surface,
            typed_len,
            theme,
        }
    }
}

impl Widget for TargetArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" Text ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        if self.surface.text_len(self.surface.root()) == 0 {
            let hint = Paragraph::new(Line::from(Span::styled(
                " Paste some text to start practising.",
                Style::default().fg(colors.text_pending()),
            )))
            .block(block);
            hint.render(area, buf);
            return;
        }

        let viewport = Viewport::compute(area, self.surface, self.typed_len);
        let grid = CellGrid::layout(self.surface, viewport.inner.width as usize);

        let lines: Vec<Line> = grid
            .rows()
            .iter()
            .skip(viewport.scroll)
            .take(viewport.inner.height as usize)
            .map(|row| {
                let spans: Vec<Span> = row
                    .iter()
                    .map(|cell| {
                        let style = if cell.offset < self.typed_len {
                            Style::default().fg(colors.text_typed())
                        } else if cell.offset == self.typed_len {
                            Style::default()
                                .fg(colors.accent())
                                .add_modifier(Modifier::UNDERLINED)
                        } else {
                            Style::default().fg(colors.text_pending())
                        };
                        Span::styled(cell.glyph.to_string(), style)
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
