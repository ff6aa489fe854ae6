use crate::record::{Category, SearchRecord, Trusted};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, BorderType, Borders, Cell, Row, Table, TableState},
    Frame,
};

/// Visual classification of a result row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowTone {
    /// Not a shopping site
    Neutral,
    /// Shopping site with a clean reputation
    Positive,
    /// Shopping site flagged as malicious
    Negative,
    /// Shopping site whose reputation lookup failed
    Unknown,
}

impl RowTone {
    pub fn of(record: &SearchRecord) -> Self {
        match (record.category, record.trusted) {
            (Category::Information, _) => RowTone::Neutral,
            (Category::Shopping, Trusted::Yes) => RowTone::Positive,
            (Category::Shopping, Trusted::No) => RowTone::Negative,
            (Category::Shopping, _) => RowTone::Unknown,
        }
    }

    fn style(self) -> Style {
        match self {
            RowTone::Neutral => Style::default().fg(Color::Gray),
            RowTone::Positive => Style::default().fg(Color::Green),
            RowTone::Negative => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            RowTone::Unknown => Style::default().fg(Color::Yellow),
        }
    }
}

/// Results table with row selection
pub struct ResultsTable {
    records: Vec<SearchRecord>,
    state: TableState,
}

impl ResultsTable {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            state: TableState::default(),
        }
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.state.select(None);
    }

    pub fn push(&mut self, record: SearchRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn selected(&self) -> Option<&SearchRecord> {
        self.state.selected().and_then(|i| self.records.get(i))
    }

    pub fn select_next(&mut self) {
        if self.records.is_empty() {
            return;
        }
        let next = match self.state.selected() {
            Some(i) => (i + 1).min(self.records.len() - 1),
            None => 0,
        };
        self.state.select(Some(next));
    }

    pub fn select_previous(&mut self) {
        if self.records.is_empty() {
            return;
        }
        let prev = self.state.selected().map_or(0, |i| i.saturating_sub(1));
        self.state.select(Some(prev));
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let header = Row::new(["Searched URL", "Category", "Trusted"])
            .style(Style::default().add_modifier(Modifier::BOLD))
            .bottom_margin(1);

        let rows = self.records.iter().map(|record| {
            Row::new([
                Cell::from(record.url.as_str()),
                Cell::from(record.category.as_str()),
                Cell::from(match record.trusted {
                    Trusted::NotApplicable => "-",
                    other => other.as_str(),
                }),
            ])
            .style(RowTone::of(record).style())
        });

        let table = Table::new(
            rows,
            [
                Constraint::Min(20),
                Constraint::Length(12),
                Constraint::Length(8),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(Span::styled(" Results ", Style::default().fg(Color::White)))
                .border_style(Style::default().fg(Color::DarkGray)),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("▶ ");

        frame.render_stateful_widget(table, area, &mut self.state);
    }
}

impl Default for ResultsTable {
    fn default() -> Self {
        Self::new()
    }
}
