use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::highlight::ErrorRun;
use crate::surface::Surface;
use crate::ui::components::typing_area::CellGrid;
use crate::ui::theme::Theme;

/// The editable input, with mismatched runs underlined and the caret drawn
/// as a block cell while focused.
pub struct InputPane<'a> {
    input: &'a Surface,
    runs: &'a [ErrorRun],
    caret: Option<usize>,
    focused: bool,
    theme: &'a Theme,
}

impl<'a> InputPane<'a> {
    pub fn new(input: &'a Surface, runs: &'a [ErrorRun], theme: &'a Theme) -> Self {
        Self {
            input,
            runs,
            caret: None,
            focused: false,
            theme,
        }
    }

    pub fn caret(mut self, caret: Option<usize>, focused: bool) -> Self {
        self.caret = caret;
        self.focused = focused;
        self
    }
}

impl Widget for InputPane<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let border = if self.focused {
            colors.border_focused()
        } else {
            colors.border()
        };
        let block = Block::bordered()
            .title(" Type here ")
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);

        let grid = CellGrid::layout(self.input, inner.width as usize);
        let total = self.input.text_len(self.input.root());
        let caret = self.caret.filter(|_| self.focused);
        let scroll = grid.scroll_for(caret.unwrap_or(total), inner.height as usize);

        let cursor_style = Style::default()
            .fg(colors.text_cursor_fg())
            .bg(colors.text_cursor_bg());
        let error_style = Style::default()
            .fg(colors.text_incorrect())
            .bg(colors.text_incorrect_bg())
            .add_modifier(Modifier::UNDERLINED);

        let caret_row = caret.map(|c| grid.row_of(c));
        let lines: Vec<Line> = grid
            .rows()
            .iter()
            .enumerate()
            .skip(scroll)
            .take(inner.height as usize)
            .map(|(row_idx, row)| {
                let mut spans: Vec<Span> = row
                    .iter()
                    .map(|cell| {
                        let style = if Some(cell.offset) == caret {
                            cursor_style
                        } else if self.runs.iter().any(|r| r.contains(cell.offset)) {
                            error_style
                        } else {
                            Style::default().fg(colors.fg())
                        };
                        Span::styled(cell.glyph.to_string(), style)
                    })
                    .collect();
                if caret == Some(total) && caret_row == Some(row_idx) {
                    spans.push(Span::styled(" ", cursor_style));
                }
                Line::from(spans)
            })
            .collect();

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::set_content;

    #[test]
    fn test_errors_and_caret_are_styled() {
        let theme = Theme::default();
        let colors = &theme.colors;
        let mut s = Surface::new();
        set_content(&mut s, "tha");
        let runs = [ErrorRun { start: 2, end: 3 }];
        let area = Rect::new(0, 0, 12, 3);
        let mut buf = Buffer::empty(area);
        InputPane::new(&s, &runs, &theme)
            .caret(Some(3), true)
            .render(area, &mut buf);

        assert_eq!(buf[(1, 1)].symbol(), "t");
        assert_eq!(buf[(1, 1)].fg, colors.fg());
        assert_eq!(buf[(3, 1)].symbol(), "a");
        assert_eq!(buf[(3, 1)].fg, colors.text_incorrect());
        assert_eq!(buf[(4, 1)].bg, colors.text_cursor_bg());
    }

    #[test]
    fn test_unfocused_has_no_cursor() {
        let theme = Theme::default();
        let mut s = Surface::new();
        set_content(&mut s, "ab");
        let area = Rect::new(0, 0, 12, 3);
        let mut buf = Buffer::empty(area);
        InputPane::new(&s, &[], &theme)
            .caret(Some(2), false)
            .render(area, &mut buf);
        assert_ne!(buf[(3, 1)].bg, theme.colors.text_cursor_bg());
    }
}
