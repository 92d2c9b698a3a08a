use std::error::Error;

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::config::Colors;
use crate::models::Header;
use crate::tui::{Frame, Rect};

/// Header sub-viewer. Headers are shown in wire order, duplicates included.
pub struct HeadersViewer {
    colors: Colors,
    pub scroll: u16,
}

impl HeadersViewer {
    pub fn new(colors: Colors) -> HeadersViewer {
        HeadersViewer { colors, scroll: 0 }
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    pub fn render(
        &mut self,
        f: &mut Frame,
        rect: Rect,
        headers: &[Header],
        active: bool,
    ) -> Result<(), Box<dyn Error>> {
        self.scroll = self.scroll.min((headers.len() as u16).saturating_sub(1));

        let lines: Vec<Line> = headers
            .iter()
            .map(|header| {
                Line::from(vec![
                    Span::styled(
                        header.name.clone(),
                        Style::default().fg(self.colors.surface.selected),
                    ),
                    Span::raw(": "),
                    Span::styled(
                        header.value.clone(),
                        Style::default().fg(self.colors.text.default),
                    ),
                ])
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Plain)
            .style(Style::default().fg(if active {
                self.colors.text.default
            } else {
                self.colors.text.unselected
            }))
            .title(format!("Headers ({})", headers.len()));

        f.render_widget(
            Paragraph::new(lines).block(block).scroll((self.scroll, 0)),
            rect,
        );

        Ok(())
    }
}
