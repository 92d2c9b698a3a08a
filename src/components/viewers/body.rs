use std::error::Error;

use ratatui::style::Style;
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap};

use crate::config::{Colors, EditorOptions};
use crate::models::{PreviewMode, ResponseRecord};
use crate::tui::{Frame, Rect};
use crate::utils::pretty_print_json;

/// Body sub-viewer. Built fresh for every response id, so scroll position
/// never leaks from one response to the next.
pub struct BodyViewer {
    options: EditorOptions,
    colors: Colors,
    pub scroll: u16,
}

impl BodyViewer {
    pub fn new(options: EditorOptions, colors: Colors) -> BodyViewer {
        BodyViewer {
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

    /// The text that ends up on screen. A response carrying an error is data,
    /// not a fault: its error text is shown in plain source mode regardless
    /// of the requested preview mode.
    pub fn display_text(
        &self,
        response: &ResponseRecord,
        preview_mode: PreviewMode,
        filter: &str,
    ) -> String {
        if let Some(error) = &response.error {
            return error.clone();
        }

        let source = response.body_text();

        let text = match preview_mode {
            PreviewMode::Friendly => pretty_print_json(&source).unwrap_or(source),
            PreviewMode::Source | PreviewMode::Raw => source,
        };

        if filter.is_empty() || preview_mode == PreviewMode::Raw {
            return text;
        }

        let needle = filter.to_lowercase();
        text.lines()
            .filter(|line| line.to_lowercase().contains(&needle))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn render(
        &mut self,
        f: &mut Frame,
        rect: Rect,
        response: &ResponseRecord,
        preview_mode: PreviewMode,
        filter: &str,
        active: bool,
    ) -> Result<(), Box<dyn Error>> {
        let text = self.display_text(response, preview_mode, filter);

        let line_count = text.lines().count() as u16;
        self.scroll = self.scroll.min(line_count.saturating_sub(1));

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Plain)
            .padding(Padding::zero())
            .style(Style::default().fg(if active {
                self.colors.text.default
            } else {
                self.colors.text.unselected
            }))
            .title("Response body");

        let mut paragraph = Paragraph::new(text)
            .block(block)
            .scroll((self.scroll, 0));

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
    use crate::models::BodyEncoding;

    fn viewer() -> BodyViewer {
        BodyViewer::new(EditorOptions::default(), Colors::default())
    }

    fn json_response() -> ResponseRecord {
        ResponseRecord {
            body: r#"{"name":"widget","count":3}"#.to_string(),
            encoding: BodyEncoding::Utf8,
            content_type: "application/json".to_string(),
            ..ResponseRecord::default()
        }
    }

    #[test]
    fn friendly_mode_pretty_prints_json() {
        let text = viewer().display_text(&json_response(), PreviewMode::Friendly, "");

        assert_eq!(text, "{\n  \"name\": \"widget\",\n  \"count\": 3\n}");
    }

    #[test]
    fn source_mode_leaves_the_body_alone() {
        let text = viewer().display_text(&json_response(), PreviewMode::Source, "");

        assert_eq!(text, r#"{"name":"widget","count":3}"#);
    }

    #[test]
    fn errors_replace_the_body_in_any_mode() {
        let response = ResponseRecord {
            error: Some("Couldn't resolve host".to_string()),
            ..json_response()
        };

        let text = viewer().display_text(&response, PreviewMode::Friendly, "widget");

        assert_eq!(text, "Couldn't resolve host");
    }

    #[test]
    fn filter_keeps_matching_lines_case_insensitively() {
        let text = viewer().display_text(&json_response(), PreviewMode::Friendly, "WIDGET");

        assert_eq!(text, "  \"name\": \"widget\",");
    }

    #[test]
    fn raw_mode_ignores_the_filter() {
        let text = viewer().display_text(&json_response(), PreviewMode::Raw, "widget");

        assert_eq!(text, r#"{"name":"widget","count":3}"#);
    }

    #[test]
    fn scroll_never_underflows() {
        let mut v = viewer();
        v.scroll_up();
        assert_eq!(v.scroll, 0);
        v.scroll_down();
        v.scroll_down();
        assert_eq!(v.scroll, 2);
    }
}
