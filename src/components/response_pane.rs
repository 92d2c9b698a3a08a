use std::error::Error;
use std::sync::Arc;

use chrono::DateTime;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table, Tabs};
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter};
use tokio::sync::mpsc::UnboundedSender;

use crate::app::Action;
use crate::components::response_timer::ResponseTimer;
use crate::components::tags;
use crate::components::viewers::body::BodyViewer;
use crate::components::viewers::cookies::CookiesViewer;
use crate::components::viewers::headers::HeadersViewer;
use crate::components::viewers::timeline::TimelineViewer;
use crate::config::{Colors, EditorOptions};
use crate::models::{PreviewMode, ResponseRecord};
use crate::services::analytics::Analytics;
use crate::services::export::{save_response_body, SaveDialog};
use crate::services::network::RequestHandle;
use crate::services::store::ResponseStore;
use crate::tui::{Frame, Rect};
use crate::utils::get_set_cookie_headers;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter,
)]
pub enum ResponseTab {
    #[default]
    Body,
    Headers,
    Cookies,
    Timeline,
}

impl ResponseTab {
    /// Label recorded with the tab-view analytics event.
    fn analytics_label(self) -> &'static str {
        match self {
            ResponseTab::Body => "Response",
            ResponseTab::Headers => "Headers",
            ResponseTab::Cookies => "Cookies",
            ResponseTab::Timeline => "Timeline",
        }
    }
}

/// The response half of the request workspace. Resolves the record to show
/// whenever the active request or response id changes, then delegates each
/// tab to a dedicated viewer keyed by response id.
pub struct ResponsePane {
    pub action_tx: Option<UnboundedSender<Action>>,
    store: Arc<dyn ResponseStore>,
    analytics: Arc<dyn Analytics>,
    save_dialog: Arc<dyn SaveDialog>,
    request_handle: Arc<dyn RequestHandle>,
    editor_options: EditorOptions,
    colors: Colors,

    request_id: Option<String>,
    active_response_id: Option<String>,
    response: Option<ResponseRecord>,
    // Monotonically increasing fetch guard; results from superseded fetches
    // are discarded on arrival.
    fetch_token: u64,

    active_tab: ResponseTab,
    preview_mode: PreviewMode,
    body_filter: String,
    entering_filter: bool,

    timer: ResponseTimer,
    body_viewer: BodyViewer,
    headers_viewer: HeadersViewer,
    cookies_viewer: CookiesViewer,
    timeline_viewer: TimelineViewer,
}

impl ResponsePane {
    pub fn new(
        store: Arc<dyn ResponseStore>,
        analytics: Arc<dyn Analytics>,
        save_dialog: Arc<dyn SaveDialog>,
        request_handle: Arc<dyn RequestHandle>,
        editor_options: EditorOptions,
        colors: Colors,
    ) -> ResponsePane {
        ResponsePane {
            action_tx: None,
            timer: ResponseTimer::new(colors),
            body_viewer: BodyViewer::new(editor_options.clone(), colors),
            headers_viewer: HeadersViewer::new(colors),
            cookies_viewer: CookiesViewer::new(colors),
            timeline_viewer: TimelineViewer::new(editor_options.clone(), colors),
            store,
            analytics,
            save_dialog,
            request_handle,
            editor_options,
            colors,
            request_id: None,
            active_response_id: None,
            response: None,
            fetch_token: 0,
            active_tab: ResponseTab::default(),
            preview_mode: PreviewMode::default(),
            body_filter: String::new(),
            entering_filter: false,
        }
    }

    pub fn register_action_handler(
        &mut self,
        tx: UnboundedSender<Action>,
    ) -> Result<(), Box<dyn Error>> {
        self.action_tx = Some(tx);
        Ok(())
    }

    pub fn response(&self) -> Option<&ResponseRecord> {
        self.response.as_ref()
    }

    pub fn active_tab(&self) -> ResponseTab {
        self.active_tab
    }

    pub fn is_entering_filter(&self) -> bool {
        self.entering_filter
    }

    pub fn body_filter(&self) -> &str {
        &self.body_filter
    }

    /// The preview mode actually in effect: error responses are forced into
    /// plain source view.
    pub fn effective_preview_mode(&self) -> PreviewMode {
        match &self.response {
            Some(response) if response.error.is_some() => PreviewMode::Source,
            _ => self.preview_mode,
        }
    }

    pub fn available_tabs(&self) -> Vec<ResponseTab> {
        ResponseTab::iter()
            .filter(|tab| match tab {
                ResponseTab::Timeline => self
                    .response
                    .as_ref()
                    .map(|response| !response.timeline.is_empty())
                    .unwrap_or(false),
                _ => true,
            })
            .collect()
    }

    pub fn tab_title(&self, tab: ResponseTab) -> String {
        match (tab, &self.response) {
            (ResponseTab::Body, _) => self.effective_preview_mode().to_string(),
            (ResponseTab::Headers, Some(response)) => {
                format!("Headers {}", response.headers.len())
            }
            (ResponseTab::Cookies, Some(response)) => {
                format!(
                    "Cookies {}",
                    get_set_cookie_headers(&response.headers).len()
                )
            }
            (tab, _) => tab.to_string(),
        }
    }

    /// Kicks off a fetch for the record to display: the explicit response id
    /// when one is set, otherwise the latest response for the active request.
    fn resolve_response(&mut self) {
        self.fetch_token += 1;
        let token = self.fetch_token;

        let Some(tx) = self.action_tx.clone() else {
            return;
        };

        let store = self.store.clone();
        let request_id = self.request_id.clone();
        let response_id = self.active_response_id.clone();

        tokio::spawn(async move {
            let mut response = match &response_id {
                Some(id) => store.get_by_id(id).await,
                None => None,
            };

            if response.is_none() {
                if let Some(request_id) = &request_id {
                    response = store.get_latest_by_parent_id(request_id).await;
                }
            }

            let _ = tx.send(Action::ResponseResolved { token, response });
        });
    }

    /// Steps through the request's response history, newest to oldest, then
    /// wraps back to following the latest. Each step lands as a
    /// `SetActiveResponse` request so the normal resolution path applies.
    fn cycle_response_history(&mut self) {
        let Some(tx) = self.action_tx.clone() else {
            return;
        };
        let Some(request_id) = self.request_id.clone() else {
            return;
        };

        let current_id = self.response.as_ref().map(|response| response.id.clone());
        let store = self.store.clone();

        tokio::spawn(async move {
            let history = store.get_all_by_parent_id(&request_id).await;
            if history.len() < 2 {
                return;
            }

            let position = current_id
                .and_then(|id| history.iter().position(|response| response.id == id));

            let next = match position {
                Some(position) if position + 1 < history.len() => {
                    Some(history[position + 1].id.clone())
                }
                _ => None,
            };

            let _ = tx.send(Action::SetActiveResponse(next));
        });
    }

    /// Viewers are keyed by response id: a new id gets fresh viewers, so any
    /// per-response view state (scroll position) is discarded.
    fn remount_viewers(&mut self) {
        self.body_viewer = BodyViewer::new(self.editor_options.clone(), self.colors);
        self.headers_viewer = HeadersViewer::new(self.colors);
        self.cookies_viewer = CookiesViewer::new(self.colors);
        self.timeline_viewer = TimelineViewer::new(self.editor_options.clone(), self.colors);
    }

    fn accept_resolved(&mut self, token: u64, response: Option<ResponseRecord>) {
        if token != self.fetch_token {
            log::debug!("discarding superseded response fetch (token {})", token);
            return;
        }

        let previous_id = self.response.as_ref().map(|r| r.id.clone());
        let next_id = response.as_ref().map(|r| r.id.clone());

        if previous_id != next_id {
            self.remount_viewers();
        }

        self.response = response;

        if !self.available_tabs().contains(&self.active_tab) {
            self.active_tab = ResponseTab::Body;
        }
    }

    fn select_tab(&mut self, tab: ResponseTab) {
        if tab == self.active_tab {
            return;
        }

        self.active_tab = tab;
        self.analytics
            .track("Response Pane", "View", Some(tab.analytics_label()));
    }

    fn next_tab(&mut self) {
        let tabs = self.available_tabs();
        if let Some(position) = tabs.iter().position(|&tab| tab == self.active_tab) {
            self.select_tab(tabs[(position + 1) % tabs.len()]);
        }
    }

    fn previous_tab(&mut self) {
        let tabs = self.available_tabs();
        if let Some(position) = tabs.iter().position(|&tab| tab == self.active_tab) {
            self.select_tab(tabs[(position + tabs.len() - 1) % tabs.len()]);
        }
    }

    fn scroll_active_viewer(&mut self, down: bool) {
        match (self.active_tab, down) {
            (ResponseTab::Body, true) => self.body_viewer.scroll_down(),
            (ResponseTab::Body, false) => self.body_viewer.scroll_up(),
            (ResponseTab::Headers, true) => self.headers_viewer.scroll_down(),
            (ResponseTab::Headers, false) => self.headers_viewer.scroll_up(),
            (ResponseTab::Cookies, true) => self.cookies_viewer.scroll_down(),
            (ResponseTab::Cookies, false) => self.cookies_viewer.scroll_up(),
            (ResponseTab::Timeline, true) => self.timeline_viewer.scroll_down(),
            (ResponseTab::Timeline, false) => self.timeline_viewer.scroll_up(),
        }
    }

    fn download_body(&mut self) {
        let Some(response) = self.response.clone() else {
            // Should never happen: the action is only reachable with a
            // response on screen.
            log::warn!("no response to download");
            return;
        };

        let save_dialog = self.save_dialog.clone();
        let analytics = self.analytics.clone();

        tokio::spawn(async move {
            save_response_body(&response, save_dialog.as_ref(), analytics.as_ref()).await;
        });
    }

    pub fn handle_key_events(
        &mut self,
        key: KeyEvent,
    ) -> Result<Option<Action>, Box<dyn Error>> {
        if self.entering_filter {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => self.entering_filter = false,
                KeyCode::Backspace => {
                    self.body_filter.pop();
                }
                KeyCode::Char(c) => self.body_filter.push(c),
                _ => {}
            }
            return Ok(None);
        }

        Ok(None)
    }

    pub fn update(&mut self, action: Action) -> Result<Option<Action>, Box<dyn Error>> {
        match action {
            Action::SelectRequest(request_id) => {
                self.request_id = request_id;
                self.active_response_id = None;
                self.resolve_response();
            }
            Action::SetActiveResponse(response_id) => {
                self.active_response_id = response_id;
                self.resolve_response();
            }
            Action::CycleResponseHistory => self.cycle_response_history(),
            Action::ResponseResolved { token, response } => {
                self.accept_resolved(token, response);
            }
            Action::NextTab => self.next_tab(),
            Action::PreviousTab => self.previous_tab(),
            Action::CyclePreviewMode => {
                if self.response.is_some() {
                    self.preview_mode = self.preview_mode.next();
                }
            }
            Action::SetPreviewMode(mode) => self.preview_mode = mode,
            Action::NewBodyFilter => {
                if self.response.is_some() {
                    self.entering_filter = true;
                }
            }
            Action::NavigateUp(Some(_)) => self.scroll_active_viewer(false),
            Action::NavigateDown(Some(_)) => self.scroll_active_viewer(true),
            Action::RequestStarted => self.timer.start(),
            Action::RequestSettled => self.timer.settle(),
            Action::CancelRequest => {
                if self.timer.is_running() {
                    self.request_handle.cancel_current_request();
                    self.timer.settle();
                }
            }
            Action::DownloadResponseBody => {
                if self.response.is_some() {
                    self.download_body();
                }
            }
            _ => {}
        }

        Ok(None)
    }

    fn render_placeholder(&mut self, f: &mut Frame, rect: Rect) -> Result<(), Box<dyn Error>> {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Plain)
            .style(Style::default().fg(self.colors.text.unselected))
            .title("Response");

        let inner = block.inner(rect);
        f.render_widget(block, rect);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([Constraint::Min(4), Constraint::Length(1)].as_ref())
            .split(inner);

        let hint_style = Style::default().fg(self.colors.text.default);
        let key_style = Style::default()
            .fg(self.colors.surface.selected)
            .add_modifier(Modifier::BOLD);

        let rows = vec![
            Row::new(vec![
                Cell::from(Span::styled("Send Request", hint_style)),
                Cell::from(Span::styled("Enter", key_style)),
            ]),
            Row::new(vec![
                Cell::from(Span::styled("Focus Url Bar", hint_style)),
                Cell::from(Span::styled("L", key_style)),
            ]),
            Row::new(vec![
                Cell::from(Span::styled("Manage Cookies", hint_style)),
                Cell::from(Span::styled("K", key_style)),
            ]),
            Row::new(vec![
                Cell::from(Span::styled("Edit Environments", hint_style)),
                Cell::from(Span::styled("E", key_style)),
            ]),
        ];

        let widths = [Constraint::Length(20), Constraint::Length(8)];
        let table = Table::new(rows).widths(&widths);

        f.render_widget(table, layout[0]);
        self.timer.render(f, layout[1])?;

        Ok(())
    }

    fn render_header_strip(
        &self,
        f: &mut Frame,
        rect: Rect,
        response: &ResponseRecord,
    ) -> Result<(), Box<dyn Error>> {
        let history_label = match self.active_response_id {
            Some(_) => {
                let received = DateTime::from_timestamp(response.created_at, 0)
                    .map(|timestamp| timestamp.format("%Y-%m-%d %H:%M:%S").to_string())
                    .unwrap_or_default();
                format!("pinned: {}", received)
            }
            None => "latest".to_string(),
        };

        let line = Line::from(vec![
            tags::status_tag(response, &self.colors),
            tags::time_tag(response, &self.colors),
            tags::size_tag(response, &self.colors),
            Span::styled(
                format!("  [{}]", history_label),
                Style::default().fg(self.colors.text.unselected),
            ),
        ]);

        f.render_widget(Paragraph::new(line), rect);

        Ok(())
    }

    fn render_footer(&mut self, f: &mut Frame, rect: Rect) -> Result<(), Box<dyn Error>> {
        if self.entering_filter || !self.body_filter.is_empty() {
            let line = Line::from(vec![
                Span::styled("/", Style::default().fg(self.colors.surface.selected)),
                Span::styled(
                    self.body_filter.clone(),
                    Style::default().fg(self.colors.text.default),
                ),
            ]);
            f.render_widget(Paragraph::new(line), rect);
            return Ok(());
        }

        self.timer.render(f, rect)
    }

    pub fn render(
        &mut self,
        f: &mut Frame,
        rect: Rect,
        active: bool,
    ) -> Result<(), Box<dyn Error>> {
        if self.request_id.is_none() {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Plain)
                .style(Style::default().fg(self.colors.text.unselected))
                .title("Response");
            f.render_widget(block, rect);
            return Ok(());
        }

        let Some(response) = self.response.clone() else {
            return self.render_placeholder(f, rect);
        };

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                [
                    Constraint::Length(1),
                    Constraint::Length(1),
                    Constraint::Min(3),
                    Constraint::Length(1),
                ]
                .as_ref(),
            )
            .split(rect);

        self.render_header_strip(f, layout[0], &response)?;

        let tabs = self.available_tabs();
        let selected = tabs
            .iter()
            .position(|&tab| tab == self.active_tab)
            .unwrap_or(0);

        let titles: Vec<Line> = tabs
            .iter()
            .map(|&tab| Line::from(self.tab_title(tab)))
            .collect();

        let tabs_widget = Tabs::new(titles)
            .select(selected)
            .style(Style::default().fg(self.colors.text.unselected))
            .highlight_style(
                Style::default()
                    .fg(self.colors.text.default)
                    .add_modifier(Modifier::BOLD),
            );

        f.render_widget(tabs_widget, layout[1]);

        match self.active_tab {
            ResponseTab::Body => {
                let preview_mode = self.effective_preview_mode();
                let filter = self.body_filter.clone();
                self.body_viewer
                    .render(f, layout[2], &response, preview_mode, &filter, active)?;
            }
            ResponseTab::Headers => {
                self.headers_viewer
                    .render(f, layout[2], &response.headers, active)?;
            }
            ResponseTab::Cookies => {
                let cookie_headers = get_set_cookie_headers(&response.headers);
                self.cookies_viewer.render(
                    f,
                    layout[2],
                    &cookie_headers,
                    response.setting_send_cookies,
                    response.setting_store_cookies,
                    active,
                )?;
            }
            ResponseTab::Timeline => {
                self.timeline_viewer
                    .render(f, layout[2], &response.timeline, active)?;
            }
        }

        self.render_footer(f, layout[3])
    }
}
