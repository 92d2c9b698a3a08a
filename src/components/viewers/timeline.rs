use std::error::Error;

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Wrap};

use crate::config::{Colors, EditorOptions};
use crate::models::TimelineEvent;
use crate::tui::{Frame, Rect};

/// Direction of a transport trace entry, derived from its event name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Direction {
    In,
    Out,
    Info,
}

fn direction(event: &TimelineEvent) -> Direction {
    if event.name.ends_with("_IN") {
        Direction::In
    } else if event.name.ends_with("_OUT") {
        Direction::Out
    } else {
        Direction::Info
    }
}

/// Timeline sub-viewer: the ordered transport trace, one prefixed line per
/// event, colored by direction.
pub struct TimelineViewer {
    options: EditorOptions,
    colors: Colors,
    pub scroll: u16,
}

impl TimelineViewer {
    pub fn new(options: EditorOptions, colors: Colors) -> TimelineViewer {
        TimelineViewer {
            options,
            colors,
            scroll: 0,
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll = self.scroll.saturating_add(1);
    }

    fn event_line(&self, event: &TimelineEvent) -> Line<'static> {
        let (prefix, color) = match direction(event) {
            Direction::In => ("< ", self.colors.status.success),
            Direction::Out => ("> ", self.colors.surface.selected),
            Direction::Info => ("* ", self.colors.text.unselected),
        };

        Line::from(vec![
            Span::styled(prefix, Style::default().fg(color)),
            Span::styled(
                event.value.trim_end().to_string(),
                Style::default().fg(color),
            ),
        ])
    }

    pub fn render(
        &mut self,
        f: &mut Frame,
        rect: Rect,
        timeline: &[TimelineEvent],
        active: bool,
    ) -> Result<(), Box<dyn Error>> {
        self.scroll = self.scroll.min((timeline.len() as u16).saturating_sub(1));

        let lines: Vec<Line> = timeline.iter().map(|event| self.event_line(event)).collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Plain)
            .style(Style::default().fg(if active {
                self.colors.text.default
            } else {
                self.colors.text.unselected
            }))
            .title("Timeline");

        let mut paragraph = Paragraph::new(lines).block(block).scroll((self.scroll, 0));

        if self.options.line_wrapping {
            paragraph = paragraph.wrap(Wrap { trim: false });
        }

        f.render_widget(paragraph, rect);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn event(name: &str) -> TimelineEvent {
        TimelineEvent {
            name: name.to_string(),
            value: "payload".to_string(),
        }
    }

    #[test]
    fn event_names_map_to_directions() {
        assert_eq!(direction(&event("HEADER_IN")), Direction::In);
        assert_eq!(direction(&event("DATA_OUT")), Direction::Out);
        assert_eq!(direction(&event("SSL_DATA_IN")), Direction::In);
        assert_eq!(direction(&event("TEXT")), Direction::Info);
    }
}
