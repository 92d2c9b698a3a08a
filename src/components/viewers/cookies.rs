use std::error::Error;

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

use crate::config::Colors;
use crate::models::Header;
use crate::tui::{Frame, Rect};

/// Cookie sub-viewer: the `Set-Cookie` subset of the response headers plus
/// the per-request cookie settings flags.
pub struct CookiesViewer {
    colors: Colors,
    pub scroll: u16,
}

impl CookiesViewer {
    pub fn new(colors: Colors) -> CookiesViewer {
        CookiesViewer { colors, scroll: 0 }
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
        cookie_headers: &[&Header],
        cookies_sent: bool,
        cookies_stored: bool,
        active: bool,
    ) -> Result<(), Box<dyn Error>> {
        let mut lines: Vec<Line> = Vec::new();

        if cookie_headers.is_empty() {
            lines.push(Line::styled(
                "No cookies returned with response",
                Style::default().fg(self.colors.text.unselected),
            ));
        }

        for header in cookie_headers {
            lines.push(Line::styled(
                header.value.clone(),
                Style::default().fg(self.colors.text.default),
            ));
        }

        if !cookies_sent || !cookies_stored {
            lines.push(Line::raw(""));
            if !cookies_sent {
                lines.push(disabled_note(
                    "Cookie sending is disabled for this request",
                    &self.colors,
                ));
            }
            if !cookies_stored {
                lines.push(disabled_note(
                    "Cookie storing is disabled for this request",
                    &self.colors,
                ));
            }
            lines.push(Line::styled(
                "Press s to open request settings",
                Style::default().fg(self.colors.text.unselected),
            ));
        }

        self.scroll = self.scroll.min((lines.len() as u16).saturating_sub(1));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Plain)
            .style(Style::default().fg(if active {
                self.colors.text.default
            } else {
                self.colors.text.unselected
            }))
            .title(format!("Cookies ({})", cookie_headers.len()));

        f.render_widget(
            Paragraph::new(lines).block(block).scroll((self.scroll, 0)),
            rect,
        );

        Ok(())
    }
}

fn disabled_note(text: &str, colors: &Colors) -> Line<'static> {
    Line::from(Span::styled(
        text.to_string(),
        Style::default().fg(colors.status.redirect),
    ))
}
