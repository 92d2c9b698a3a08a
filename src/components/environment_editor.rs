use std::error::Error;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;

use crate::app::Action;
use crate::config::{Colors, EditorOptions};
use crate::models::Environment;
use crate::tui::{Frame, Rect};

// The change notification waits for a longer quiet period than ordinary
// editor debouncing so the owner is not re-pulling on every keystroke.
const CHANGE_DEBOUNCE_MULTIPLIER: u64 = 6;

/// Editable JSON surface for an environment. The buffer is the sole source
/// of truth while the editor is open; the owner pulls the parsed value back
/// out through `get_value` when it wants one.
pub struct EnvironmentEditor {
    pub action_tx: Option<UnboundedSender<Action>>,
    options: EditorOptions,
    colors: Colors,
    buffer: Vec<String>,
    cursor_row: usize,
    cursor_col: usize,
    scroll: u16,
    valid: bool,
    debounce: Option<AbortHandle>,
}

impl EnvironmentEditor {
    pub fn new(
        environment: &Environment,
        options: EditorOptions,
        colors: Colors,
    ) -> Result<EnvironmentEditor, Box<dyn Error>> {
        let text =
            serde_json::to_string_pretty(&serde_json::Value::Object(environment.clone()))?;

        let buffer: Vec<String> = text.lines().map(str::to_string).collect();

        Ok(EnvironmentEditor {
            action_tx: None,
            options,
            colors,
            buffer,
            cursor_row: 0,
            cursor_col: 0,
            scroll: 0,
            valid: true,
            debounce: None,
        })
    }

    pub fn register_action_handler(
        &mut self,
        tx: UnboundedSender<Action>,
    ) -> Result<(), Box<dyn Error>> {
        self.action_tx = Some(tx);
        Ok(())
    }

    pub fn text(&self) -> String {
        self.buffer.join("\n")
    }

    /// Parses the buffer as JSON. Callers are expected to guard with
    /// `is_valid` when they cannot handle the error.
    pub fn get_value(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.text())
    }

    /// True iff the buffer currently parses. Never panics.
    pub fn is_valid(&self) -> bool {
        self.get_value().is_ok()
    }

    fn current_line_len(&self) -> usize {
        self.buffer
            .get(self.cursor_row)
            .map(|line| line.chars().count())
            .unwrap_or(0)
    }

    fn byte_index(line: &str, char_col: usize) -> usize {
        line.char_indices()
            .nth(char_col)
            .map(|(idx, _)| idx)
            .unwrap_or(line.len())
    }

    fn insert_char(&mut self, c: char) {
        if let Some(line) = self.buffer.get_mut(self.cursor_row) {
            let idx = Self::byte_index(line, self.cursor_col);
            line.insert(idx, c);
            self.cursor_col += 1;
        }
    }

    fn insert_newline(&mut self) {
        if let Some(line) = self.buffer.get_mut(self.cursor_row) {
            let idx = Self::byte_index(line, self.cursor_col);
            let rest = line.split_off(idx);
            self.buffer.insert(self.cursor_row + 1, rest);
            self.cursor_row += 1;
            self.cursor_col = 0;
        }
    }

    fn backspace(&mut self) {
        if self.cursor_col > 0 {
            if let Some(line) = self.buffer.get_mut(self.cursor_row) {
                let idx = Self::byte_index(line, self.cursor_col - 1);
                line.remove(idx);
                self.cursor_col -= 1;
            }
        } else if self.cursor_row > 0 {
            let removed = self.buffer.remove(self.cursor_row);
            self.cursor_row -= 1;
            self.cursor_col = self.current_line_len();
            if let Some(line) = self.buffer.get_mut(self.cursor_row) {
                line.push_str(&removed);
            }
        }
    }

    fn on_edit(&mut self) {
        self.valid = self.is_valid();
        self.schedule_change_notification();
    }

    /// Coalesces rapid edits into one no-payload notification. The owner
    /// re-pulls the value on receipt; nothing is pushed inline.
    fn schedule_change_notification(&mut self) {
        if let Some(pending) = self.debounce.take() {
            pending.abort();
        }

        let Some(tx) = self.action_tx.clone() else {
            return;
        };

        let delay =
            Duration::from_millis(self.options.debounce_millis * CHANGE_DEBOUNCE_MULTIPLIER);

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Action::EnvironmentDidChange);
        });

        self.debounce = Some(task.abort_handle());
    }

    pub fn handle_key_events(
        &mut self,
        key: KeyEvent,
    ) -> Result<Option<Action>, Box<dyn Error>> {
        match key.code {
            KeyCode::Esc => return Ok(Some(Action::CloseEnvironmentEditor)),
            KeyCode::Char(c) => {
                self.insert_char(c);
                self.on_edit();
            }
            KeyCode::Enter => {
                self.insert_newline();
                self.on_edit();
            }
            KeyCode::Tab => {
                for _ in 0..self.options.indent_size {
                    self.insert_char(' ');
                }
                self.on_edit();
            }
            KeyCode::Backspace => {
                self.backspace();
                self.on_edit();
            }
            KeyCode::Up => {
                self.cursor_row = self.cursor_row.saturating_sub(1);
                self.cursor_col = self.cursor_col.min(self.current_line_len());
            }
            KeyCode::Down => {
                self.cursor_row = (self.cursor_row + 1).min(self.buffer.len().saturating_sub(1));
                self.cursor_col = self.cursor_col.min(self.current_line_len());
            }
            KeyCode::Left => self.cursor_col = self.cursor_col.saturating_sub(1),
            KeyCode::Right => self.cursor_col = (self.cursor_col + 1).min(self.current_line_len()),
            KeyCode::Home => self.cursor_col = 0,
            KeyCode::End => self.cursor_col = self.current_line_len(),
            _ => {}
        }

        Ok(None)
    }

    fn buffer_lines(&self) -> Vec<Line<'static>> {
        let cursor_style = Style::default()
            .fg(self.colors.text.selected)
            .bg(self.colors.text.default);

        self.buffer
            .iter()
            .enumerate()
            .map(|(row, line)| {
                if row != self.cursor_row {
                    return Line::raw(line.clone());
                }

                let chars: Vec<char> = line.chars().collect();
                let col = self.cursor_col.min(chars.len());
                let before: String = chars[..col].iter().collect();
                let at: String = chars.get(col).map(|c| c.to_string()).unwrap_or(" ".into());
                let after: String = if col < chars.len() {
                    chars[col + 1..].iter().collect()
                } else {
                    String::new()
                };

                Line::from(vec![
                    Span::raw(before),
                    Span::styled(at, cursor_style),
                    Span::raw(after),
                ])
            })
            .collect()
    }

    pub fn render(&mut self, f: &mut Frame, rect: Rect) -> Result<(), Box<dyn Error>> {
        let title = if self.valid {
            "Environment (JSON)".to_string()
        } else {
            "Environment (JSON) [invalid]".to_string()
        };

        let border_color = if self.valid {
            self.colors.surface.selected
        } else {
            self.colors.status.error
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Plain)
            .border_style(Style::default().fg(border_color))
            .padding(Padding::new(1, 1, 0, 0))
            .title(title)
            .title_style(Style::default().add_modifier(Modifier::BOLD));

        let inner_height = block.inner(rect).height;

        // Keep the cursor row on screen.
        let cursor_row = self.cursor_row as u16;
        if cursor_row < self.scroll {
            self.scroll = cursor_row;
        } else if inner_height > 0 && cursor_row >= self.scroll + inner_height {
            self.scroll = cursor_row - inner_height + 1;
        }

        let paragraph = Paragraph::new(self.buffer_lines())
            .block(block)
            .style(Style::default().fg(self.colors.text.default))
            .scroll((self.scroll, 0));

        f.render_widget(Clear, rect);
        f.render_widget(paragraph, rect);

        Ok(())
    }
}

impl Drop for EnvironmentEditor {
    fn drop(&mut self) {
        // A pending notification must not outlive the editor it came from.
        if let Some(pending) = self.debounce.take() {
            pending.abort();
        }
    }
}
