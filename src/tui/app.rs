use crate::event::{Event, EventResult};
use crate::pipeline::{Pipeline, PipelineEvent};
use crate::tui::{InputWidget, ResultsTable};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tokio::sync::mpsc;

/// What the status bar shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Ready,
    Searching { query: String, done: usize, total: Option<usize> },
    Saving,
    Done { results: usize, shopping: usize, untrusted: usize },
    Failed(String),
}

/// Main application state
pub struct App {
    pipeline: Pipeline,
    /// Query input
    pub input: InputWidget,
    results: ResultsTable,
    status: Status,
    /// Per-URL fallbacks in the current run
    degraded: usize,
    should_quit: bool,
    /// Events of the run in progress
    receiver: Option<mpsc::UnboundedReceiver<PipelineEvent>>,
}

impl App {
    pub fn new(pipeline: Pipeline) -> Self {
        Self {
            pipeline,
            input: InputWidget::new(),
            results: ResultsTable::new(),
            status: Status::Ready,
            degraded: 0,
            should_quit: false,
            receiver: None,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn results(&self) -> &ResultsTable {
        &self.results
    }

    pub fn is_searching(&self) -> bool {
        self.receiver.is_some()
    }

    /// Drain whatever the running search has produced so far
    pub fn poll_pipeline(&mut self) {
        while let Some(receiver) = self.receiver.as_mut() {
            match receiver.try_recv() {
                Ok(event) => self.handle_pipeline_event(event),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    self.receiver = None;
                    if matches!(self.status, Status::Searching { .. } | Status::Saving) {
                        self.status = Status::Failed("search task ended unexpectedly".to_string());
                    }
                }
            }
        }
    }

    pub fn handle_pipeline_event(&mut self, event: PipelineEvent) {
        match event {
            PipelineEvent::Started { query } => {
                self.status = Status::Searching {
                    query,
                    done: 0,
                    total: None,
                };
            }
            PipelineEvent::Sourced { count } => {
                if let Status::Searching { total, .. } = &mut self.status {
                    *total = Some(count);
                }
            }
            PipelineEvent::Classifying { .. } => {}
            PipelineEvent::Degraded { .. } => self.degraded += 1,
            PipelineEvent::Record { record, .. } => {
                self.results.push(record);
                if let Status::Searching { done, .. } = &mut self.status {
                    *done += 1;
                }
            }
            PipelineEvent::Persisting => self.status = Status::Saving,
            PipelineEvent::Finished(log) => {
                self.status = Status::Done {
                    results: log.results.len(),
                    shopping: log.shopping_count(),
                    untrusted: log.untrusted_count(),
                };
                self.receiver = None;
            }
            PipelineEvent::Failed(err) => {
                self.status = Status::Failed(err);
                self.receiver = None;
            }
        }
    }

    /// Handle an event
    pub fn handle_event(&mut self, event: Event) -> EventResult<()> {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Tick => {
                self.poll_pipeline();
                Ok(())
            }
            Event::Quit => {
                self.should_quit = true;
                Ok(())
            }
            Event::Resize(..) => Ok(()),
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> EventResult<()> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Ok(());
        }

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Up => self.results.select_previous(),
            KeyCode::Down => self.results.select_next(),
            KeyCode::Enter => {
                // One search at a time: each run rewrites the whole log.
                if !self.is_searching() {
                    self.submit_query();
                }
            }
            _ => self.input.handle_key(key),
        }
        Ok(())
    }

    fn submit_query(&mut self) {
        let query = self.input.take_text();
        if query.trim().is_empty() {
            return;
        }

        self.results.clear();
        self.degraded = 0;
        self.status = Status::Searching {
            query: query.trim().to_string(),
            done: 0,
            total: None,
        };
        self.receiver = Some(self.pipeline.start(query));
    }

    /// Render the application UI
    pub fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Query input
                Constraint::Min(5),    // Results table
                Constraint::Length(3), // Status bar
            ])
            .split(frame.area());

        self.input.render(frame, chunks[0]);
        self.results.render(frame, chunks[1]);
        self.render_status(frame, chunks[2]);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled("Status: ", Style::default().fg(Color::Yellow))];

        match &self.status {
            Status::Ready => spans.push(Span::raw("Ready")),
            Status::Searching { query, done, total } => {
                let progress = match total {
                    Some(total) => format!("{done}/{total}"),
                    None => "fetching results".to_string(),
                };
                spans.push(Span::raw(format!("Searching \"{query}\" ({progress})")));
            }
            Status::Saving => spans.push(Span::raw("Saving log...")),
            Status::Done {
                results,
                shopping,
                untrusted,
            } => {
                spans.push(Span::raw(format!("{results} results")));
                spans.push(Span::raw(" | "));
                spans.push(Span::styled("Shopping: ", Style::default().fg(Color::Cyan)));
                spans.push(Span::raw(shopping.to_string()));
                spans.push(Span::raw(" | "));
                spans.push(Span::styled("Untrusted: ", Style::default().fg(Color::Red)));
                spans.push(Span::raw(untrusted.to_string()));
            }
            Status::Failed(err) => {
                spans.push(Span::styled(err.clone(), Style::default().fg(Color::Red)))
            }
        }

        if self.degraded > 0 {
            spans.push(Span::raw(" | "));
            spans.push(Span::styled(
                format!("{} lookups failed", self.degraded),
                Style::default().fg(Color::Yellow),
            ));
        }

        let status = Paragraph::new(vec![Line::from(spans)]).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Status")
                .border_style(Style::default().fg(Color::White)),
        );

        frame.render_widget(status, area);
    }
}
