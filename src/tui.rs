use std::error::Error;
use std::io::{stdout, Stdout};

use crossterm::{
    event::KeyEvent,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::{FutureExt, StreamExt};
use ratatui::prelude::CrosstermBackend;
use ratatui::terminal::Terminal;
use tokio::{sync::mpsc, task::JoinHandle};

pub type Frame<'a> = ratatui::Frame<'a>;
pub use ratatui::prelude::Rect;

#[derive(Clone, Copy, Debug)]
pub enum Event {
    Error,
    Key(KeyEvent),
    Render,
    Tick,
}

pub struct Tui {
    pub terminal: Terminal<CrosstermBackend<Stdout>>,
    pub event_tx: mpsc::UnboundedSender<Event>,
    pub event_rx: mpsc::UnboundedReceiver<Event>,
    pub task: JoinHandle<()>,
    pub frame_rate: f64,
    pub tick_rate: f64,
}

impl Tui {
    pub fn new() -> Result<Self, Box<dyn Error>> {
        let tick_rate = 4.0;
        let frame_rate = 60.0;
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(async {});
        let terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

        Ok(Self {
            event_tx,
            event_rx,
            frame_rate,
            task,
            terminal,
            tick_rate,
        })
    }

    pub fn enter(&mut self) -> Result<(), Box<dyn Error>> {
        enable_raw_mode()?;
        execute!(stdout(), EnterAlternateScreen)?;
        self.terminal.clear()?;
        self.start();
        Ok(())
    }

    pub fn exit(&mut self) -> Result<(), Box<dyn Error>> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    pub fn start(&mut self) {
        let tick_delay = std::time::Duration::from_secs_f64(1.0 / self.tick_rate);
        let render_delay = std::time::Duration::from_secs_f64(1.0 / self.frame_rate);
        let tx = self.event_tx.clone();

        self.task = tokio::spawn(async move {
            let mut reader = crossterm::event::EventStream::new();
            let mut tick_interval = tokio::time::interval(tick_delay);
            let mut render_interval = tokio::time::interval(render_delay);

            loop {
                let tick_delay = tick_interval.tick();
                let render_delay = render_interval.tick();
                let crossterm_event = reader.next().fuse();
                tokio::select! {
                    maybe_event = crossterm_event => {
                        match maybe_event {
                            Some(Ok(crossterm::event::Event::Key(key))) => {
                                if key.kind == crossterm::event::KeyEventKind::Press {
                                    let _ = tx.send(Event::Key(key));
                                }
                            }
                            Some(Ok(_)) => {}
                            Some(Err(_)) => {
                                let _ = tx.send(Event::Error);
                            }
                            None => {}
                        }
                    },
                    _ = tick_delay => {
                        let _ = tx.send(Event::Tick);
                    },
                    _ = render_delay => {
                        let _ = tx.send(Event::Render);
                    }
                }
            }
        });
    }

    pub async fn next(&mut self) -> Option<Event> {
        self.event_rx.recv().await
    }
}
