use std::collections::HashMap;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::AbortHandle;

use crate::components::component::Component;
use crate::components::environment_editor::EnvironmentEditor;
use crate::components::response_pane::ResponsePane;
use crate::config::{Colors, Config, EditorOptions};
use crate::models::{Environment, PreviewMode, RequestSummary, ResponseRecord};
use crate::services::analytics::Analytics;
use crate::services::export::SaveDialog;
use crate::services::network::RequestHandle;
use crate::services::store::ResponseStore;
use crate::tui::{Frame, Rect};

const STATUS_MESSAGE_SECONDS: u64 = 5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Action {
    Quit,
    NavigateUp(Option<KeyEvent>),
    NavigateDown(Option<KeyEvent>),
    Select,
    NextTab,
    PreviousTab,
    CyclePreviewMode,
    SetPreviewMode(PreviewMode),
    NewBodyFilter,
    SelectRequest(Option<String>),
    SetActiveResponse(Option<String>),
    CycleResponseHistory,
    ResponseResolved {
        token: u64,
        response: Option<ResponseRecord>,
    },
    RequestStarted,
    RequestSettled,
    CancelRequest,
    DownloadResponseBody,
    OpenEnvironmentEditor,
    CloseEnvironmentEditor,
    EnvironmentDidChange,
    ShowRequestSettings,
    SetStatusMessage(String),
    ClearStatusMessage,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum ActiveBlock {
    #[default]
    RequestList,
    ResponsePane,
}

/// Root component: the request list on the left, the response pane on the
/// right, an optional environment editor overlay, and a one-line footer.
pub struct App {
    pub action_tx: Option<UnboundedSender<Action>>,
    pub should_quit: bool,
    key_map: HashMap<KeyEvent, Action>,
    colors: Colors,
    editor_options: EditorOptions,

    requests: Vec<RequestSummary>,
    selected_request_index: usize,
    active_block: ActiveBlock,

    environment: Environment,
    response_pane: ResponsePane,
    environment_editor: Option<EnvironmentEditor>,

    status_message: Option<String>,
    status_clear: Option<AbortHandle>,
}

impl App {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: Config,
        requests: Vec<RequestSummary>,
        environment: Environment,
        store: Arc<dyn ResponseStore>,
        analytics: Arc<dyn Analytics>,
        save_dialog: Arc<dyn SaveDialog>,
        request_handle: Arc<dyn RequestHandle>,
    ) -> App {
        let response_pane = ResponsePane::new(
            store,
            analytics,
            save_dialog,
            request_handle,
            config.editor.clone(),
            config.colors,
        );

        App {
            action_tx: None,
            should_quit: false,
            key_map: config.mapping.0,
            colors: config.colors,
            editor_options: config.editor,
            requests,
            selected_request_index: 0,
            active_block: ActiveBlock::default(),
            environment,
            response_pane,
            environment_editor: None,
            status_message: None,
            status_clear: None,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    fn current_request_id(&self) -> Option<String> {
        self.requests
            .get(self.selected_request_index)
            .map(|request| request.id.clone())
    }

    fn set_status(&mut self, message: String) {
        if let Some(pending) = self.status_clear.take() {
            pending.abort();
        }

        self.status_message = Some(message);

        let Some(tx) = self.action_tx.clone() else {
            return;
        };

        let task = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(STATUS_MESSAGE_SECONDS)).await;
            let _ = tx.send(Action::ClearStatusMessage);
        });

        self.status_clear = Some(task.abort_handle());
    }

    fn open_environment_editor(&mut self) -> Result<(), Box<dyn Error>> {
        let mut editor =
            EnvironmentEditor::new(&self.environment, self.editor_options.clone(), self.colors)?;

        if let Some(tx) = self.action_tx.clone() {
            editor.register_action_handler(tx)?;
        }

        self.environment_editor = Some(editor);

        Ok(())
    }

    /// Pulls the parsed value out of the editor. Invalid buffers are left
    /// alone so the last good environment survives.
    fn pull_environment(&mut self) {
        let Some(editor) = &self.environment_editor else {
            return;
        };

        match editor.get_value() {
            Ok(serde_json::Value::Object(map)) => self.environment = map,
            Ok(_) => log::debug!("environment buffer is valid JSON but not an object"),
            Err(_) => {}
        }
    }

    fn close_environment_editor(&mut self) {
        self.pull_environment();
        self.environment_editor = None;
    }

    fn navigate_request_list(&mut self, down: bool) -> Option<Action> {
        let before = self.selected_request_index;

        if down {
            self.selected_request_index = (self.selected_request_index + 1)
                .min(self.requests.len().saturating_sub(1));
        } else {
            self.selected_request_index = self.selected_request_index.saturating_sub(1);
        }

        if self.selected_request_index == before {
            return None;
        }

        Some(Action::SelectRequest(self.current_request_id()))
    }

    fn show_request_settings(&mut self) {
        let message = match self.response_pane.response() {
            Some(response) => format!(
                "Request settings: send cookies {}, store cookies {}",
                if response.setting_send_cookies { "on" } else { "off" },
                if response.setting_store_cookies { "on" } else { "off" },
            ),
            None => "Request settings: no response loaded".to_string(),
        };

        self.set_status(message);
    }

    fn render_request_list(&mut self, f: &mut Frame, rect: Rect) {
        let active = self.active_block == ActiveBlock::RequestList;

        let items: Vec<ListItem> = self
            .requests
            .iter()
            .map(|request| ListItem::new(format!("{} {}", request.method, request.name)))
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Plain)
            .style(Style::default().fg(if active {
                self.colors.text.default
            } else {
                self.colors.text.unselected
            }))
            .title("Requests");

        let list = List::new(items).block(block).highlight_style(
            Style::default()
                .fg(self.colors.text.selected)
                .bg(self.colors.surface.selected)
                .add_modifier(Modifier::BOLD),
        );

        let mut state = ListState::default();
        state.select(Some(self.selected_request_index));

        f.render_stateful_widget(list, rect, &mut state);
    }

    fn render_footer(&self, f: &mut Frame, rect: Rect) {
        let line = match &self.status_message {
            Some(message) => Line::styled(
                message.clone(),
                Style::default().fg(self.colors.status.redirect),
            ),
            None => Line::styled(
                "q quit | tab tabs | p preview | r history | / filter | d download | e environment | s settings",
                Style::default().fg(self.colors.text.unselected),
            ),
        };

        f.render_widget(Paragraph::new(line), rect);
    }
}

impl Component for App {
    fn register_action_handler(
        &mut self,
        tx: UnboundedSender<Action>,
    ) -> Result<(), Box<dyn Error>> {
        self.action_tx = Some(tx.clone());
        self.response_pane.register_action_handler(tx)?;
        Ok(())
    }

    fn on_mount(&mut self) -> Result<Option<Action>, Box<dyn Error>> {
        Ok(Some(Action::SelectRequest(self.current_request_id())))
    }

    fn handle_key_events(&mut self, key: KeyEvent) -> Result<Option<Action>, Box<dyn Error>> {
        if let Some(editor) = &mut self.environment_editor {
            return editor.handle_key_events(key);
        }

        if self.response_pane.is_entering_filter() {
            return self.response_pane.handle_key_events(key);
        }

        if let Some(action) = self.key_map.get(&key) {
            return Ok(Some(action.clone()));
        }

        let action = match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Action::NavigateUp(Some(key))),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::NavigateDown(Some(key))),
            KeyCode::Left | KeyCode::Char('h') => {
                self.active_block = ActiveBlock::RequestList;
                None
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.active_block = ActiveBlock::ResponsePane;
                None
            }
            KeyCode::Enter => Some(Action::Select),
            KeyCode::Char('/') => Some(Action::NewBodyFilter),
            _ => None,
        };

        Ok(action)
    }

    fn update(&mut self, action: Action) -> Result<Option<Action>, Box<dyn Error>> {
        match action {
            Action::Quit => {
                self.should_quit = true;
                Ok(None)
            }
            Action::NavigateUp(_) if self.active_block == ActiveBlock::RequestList => {
                Ok(self.navigate_request_list(false))
            }
            Action::NavigateDown(_) if self.active_block == ActiveBlock::RequestList => {
                Ok(self.navigate_request_list(true))
            }
            Action::Select => {
                self.active_block = ActiveBlock::ResponsePane;
                Ok(Some(Action::SelectRequest(self.current_request_id())))
            }
            Action::OpenEnvironmentEditor => {
                self.open_environment_editor()?;
                Ok(None)
            }
            Action::CloseEnvironmentEditor => {
                self.close_environment_editor();
                Ok(None)
            }
            Action::EnvironmentDidChange => {
                self.pull_environment();
                Ok(None)
            }
            Action::ShowRequestSettings => {
                self.show_request_settings();
                Ok(None)
            }
            Action::SetStatusMessage(message) => {
                self.set_status(message);
                Ok(None)
            }
            Action::ClearStatusMessage => {
                self.status_message = None;
                Ok(None)
            }
            other => self.response_pane.update(other),
        }
    }

    fn render(&mut self, f: &mut Frame, rect: Rect) -> Result<(), Box<dyn Error>> {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(5), Constraint::Length(1)].as_ref())
            .split(rect);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(30), Constraint::Percentage(70)].as_ref())
            .split(rows[0]);

        self.render_request_list(f, columns[0]);
        self.response_pane.render(
            f,
            columns[1],
            self.active_block == ActiveBlock::ResponsePane,
        )?;
        self.render_footer(f, rows[1]);

        if let Some(editor) = &mut self.environment_editor {
            editor.render(f, centered_rect(rows[0], 80, 80))?;
        }

        Ok(())
    }
}

fn centered_rect(rect: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ]
            .as_ref(),
        )
        .split(rect);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyModifiers;
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc::unbounded_channel;

    use super::*;
    use crate::services::analytics::RecordingAnalytics;
    use crate::services::export::DirectorySaveDialog;
    use crate::services::network::NoopRequestHandle;
    use crate::services::store::InMemoryResponseStore;

    fn environment() -> Environment {
        match serde_json::json!({ "base_url": "https://api.example.com" }) {
            serde_json::Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn app() -> App {
        app_with(Config::default())
    }

    fn app_with(config: Config) -> App {
        let requests = vec![
            RequestSummary {
                id: "r1".to_string(),
                name: "List widgets".to_string(),
                method: "GET".to_string(),
                url: "https://api.example.com/widgets".to_string(),
            },
            RequestSummary {
                id: "r2".to_string(),
                name: "Create widget".to_string(),
                method: "POST".to_string(),
                url: "https://api.example.com/widgets".to_string(),
            },
        ];

        App::new(
            config,
            requests,
            environment(),
            InMemoryResponseStore::new(),
            Arc::new(RecordingAnalytics::default()),
            Arc::new(DirectorySaveDialog::new(std::env::temp_dir())),
            Arc::new(NoopRequestHandle),
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::empty())
    }

    #[test]
    fn quit_action_flags_shutdown() {
        let mut app = app();

        app.update(Action::Quit).unwrap();

        assert!(app.should_quit);
    }

    #[test]
    fn mounting_selects_the_first_request() {
        let mut app = app();

        let action = app.on_mount().unwrap();

        assert_eq!(action, Some(Action::SelectRequest(Some("r1".to_string()))));
    }

    #[tokio::test]
    async fn list_navigation_reselects_the_request() {
        let mut app = app();

        let action = app
            .update(Action::NavigateDown(Some(key(KeyCode::Down))))
            .unwrap();
        assert_eq!(action, Some(Action::SelectRequest(Some("r2".to_string()))));

        // Already at the bottom: no reselection.
        let action = app
            .update(Action::NavigateDown(Some(key(KeyCode::Down))))
            .unwrap();
        assert_eq!(action, None);
    }

    #[tokio::test]
    async fn editor_close_commits_a_valid_environment() {
        let mut app = app();
        let (tx, _rx) = unbounded_channel();
        app.register_action_handler(tx).unwrap();

        app.update(Action::OpenEnvironmentEditor).unwrap();
        assert!(app.environment_editor.is_some());

        // Whole-buffer edit: replace the environment with a new object.
        let editor = app.environment_editor.as_mut().unwrap();
        editor.handle_key_events(key(KeyCode::Esc)).unwrap();
        app.update(Action::CloseEnvironmentEditor).unwrap();

        assert!(app.environment_editor.is_none());
        assert_eq!(app.environment(), &environment());
    }

    #[tokio::test]
    async fn an_invalid_buffer_keeps_the_previous_environment() {
        let mut app = app();
        let (tx, _rx) = unbounded_channel();
        app.register_action_handler(tx).unwrap();

        app.update(Action::OpenEnvironmentEditor).unwrap();
        let editor = app.environment_editor.as_mut().unwrap();
        editor.handle_key_events(key(KeyCode::Char('x'))).unwrap();
        assert!(!editor.is_valid());

        app.update(Action::EnvironmentDidChange).unwrap();
        app.update(Action::CloseEnvironmentEditor).unwrap();

        assert_eq!(app.environment(), &environment());
    }

    #[tokio::test]
    async fn change_notifications_pull_the_new_value() {
        let mut app = app();
        let (tx, _rx) = unbounded_channel();
        app.register_action_handler(tx).unwrap();

        app.update(Action::OpenEnvironmentEditor).unwrap();
        let editor = app.environment_editor.as_mut().unwrap();
        editor.handle_key_events(key(KeyCode::End)).unwrap();
        for c in " ".chars() {
            editor.handle_key_events(key(KeyCode::Char(c))).unwrap();
        }
        assert!(editor.is_valid());

        app.update(Action::EnvironmentDidChange).unwrap();

        // Whitespace-only edits parse back to the same object.
        assert_eq!(app.environment(), &environment());
    }

    #[tokio::test]
    async fn request_settings_surface_a_status_message() {
        let mut app = app();
        let (tx, _rx) = unbounded_channel();
        app.register_action_handler(tx).unwrap();

        app.update(Action::ShowRequestSettings).unwrap();

        assert!(app.status_message().unwrap().starts_with("Request settings"));

        app.update(Action::ClearStatusMessage).unwrap();
        assert_eq!(app.status_message(), None);
    }

    #[test]
    fn history_key_produces_the_cycle_action() {
        let config = crate::config::parse("mapping:\n  r: CycleResponseHistory\n").unwrap();
        let mut app = app_with(config);

        let action = app.handle_key_events(key(KeyCode::Char('r'))).unwrap();

        assert_eq!(action, Some(Action::CycleResponseHistory));
    }

    #[test]
    fn editor_keys_are_routed_to_the_open_editor() {
        let mut app = app();

        app.update(Action::OpenEnvironmentEditor).unwrap();
        let action = app.handle_key_events(key(KeyCode::Esc)).unwrap();

        assert_eq!(action, Some(Action::CloseEnvironmentEditor));
    }
}
