use std::error::Error;
use std::time::Instant;

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::config::Colors;
use crate::tui::{Frame, Rect};

/// One-line timer shown while a request is in flight, with the cancel hint.
/// Start/settle are driven by the external network engine; cancel is wired
/// back to it through the pane.
pub struct ResponseTimer {
    colors: Colors,
    load_start: Option<Instant>,
}

impl ResponseTimer {
    pub fn new(colors: Colors) -> ResponseTimer {
        ResponseTimer {
            colors,
            load_start: None,
        }
    }

    pub fn start(&mut self) {
        self.load_start = Some(Instant::now());
    }

    pub fn settle(&mut self) {
        self.load_start = None;
    }

    pub fn is_running(&self) -> bool {
        self.load_start.is_some()
    }

    pub fn elapsed_seconds(&self) -> Option<f64> {
        self.load_start.map(|start| start.elapsed().as_secs_f64())
    }

    pub fn render(&mut self, f: &mut Frame, rect: Rect) -> Result<(), Box<dyn Error>> {
        let Some(elapsed) = self.elapsed_seconds() else {
            return Ok(());
        };

        let line = Line::from(vec![
            Span::styled(
                format!("Loading... {:.1} s ", elapsed),
                Style::default()
                    .fg(self.colors.text.default)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "(press c to cancel)",
                Style::default().fg(self.colors.text.unselected),
            ),
        ]);

        f.render_widget(Paragraph::new(line), rect);

        Ok(())
    }
}
