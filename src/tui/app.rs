//! Interactive TUI application.

#![allow(clippy::too_many_lines)]
#![allow(clippy::missing_errors_doc)]

use crate::dns::progress::{ProgressEvent, ScanProgress, DEFAULT_BAR_WIDTH};
use crate::dns::scan::{rank, ScanEvent, ScanState, Scanner};
use crate::dns::trial::DirectResolver;
use crate::dns::types::{Provider, ProviderSummary, ScanReport, ScanSettings};
use crate::error::Result;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Cell, Gauge, Paragraph, Row, Table, TableState},
    Frame,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Duration;

/// Messages sent from the scan task to the main event loop.
#[derive(Debug)]
enum AppMessage {
    /// A hostname finished.
    Progress(ProgressEvent),
    /// A provider finished.
    ProviderFinished(ProviderSummary),
    /// The scan finished and its report is ranked.
    Completed(ScanReport),
    /// The scan could not run.
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum View {
    #[default]
    Scan,
    Help,
}

pub struct App {
    providers: Vec<Provider>,
    hostnames: Vec<String>,
    settings: ScanSettings,
    summaries: Vec<ProviderSummary>,
    current: Option<ProgressEvent>,
    progress: ScanProgress,
    state: ScanState,
    error: Option<String>,
    elapsed: Option<chrono::Duration>,
    current_view: View,
    selected_index: usize,
    /// Channel sender for the scan task.
    message_tx: Option<mpsc::UnboundedSender<AppMessage>>,
    scan_task: Option<JoinHandle<()>>,
    /// Table state for scrolling.
    table_state: TableState,
}

impl App {
    #[must_use]
    pub fn new(providers: Vec<Provider>, hostnames: Vec<String>, settings: ScanSettings) -> Self {
        let progress = ScanProgress::start(&providers, hostnames.len());
        Self {
            providers,
            hostnames,
            settings,
            summaries: Vec::new(),
            current: None,
            progress,
            state: ScanState::Idle,
            error: None,
            elapsed: None,
            current_view: View::default(),
            selected_index: 0,
            message_tx: None,
            scan_task: None,
            table_state: TableState::default(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        self.message_tx = Some(tx);

        // Raw mode and alternate screen
        let mut terminal = ratatui::init();

        let res = self.run_loop(&mut terminal, &mut rx).await;

        if let Some(task) = self.scan_task.take() {
            task.abort();
        }
        ratatui::restore();

        res
    }

    async fn run_loop(
        &mut self,
        terminal: &mut ratatui::DefaultTerminal,
        rx: &mut mpsc::UnboundedReceiver<AppMessage>,
    ) -> Result<()> {
        loop {
            while let Ok(msg) = rx.try_recv() {
                self.handle_message(msg);
            }

            terminal.draw(|f| self.draw(f))?;

            if crossterm::event::poll(Duration::from_millis(50))? {
                if let crossterm::event::Event::Key(key) = crossterm::event::read()? {
                    if !self.handle_key(key) {
                        break;
                    }
                }
            }
        }

        Ok(())
    }

    fn handle_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::Progress(event) => {
                self.progress = event.progress;
                self.current = Some(event);
            }
            AppMessage::ProviderFinished(summary) => {
                self.summaries.push(summary);
                rank(&mut self.summaries);
            }
            AppMessage::Completed(report) => {
                self.elapsed = Some(report.elapsed());
                self.summaries = report.summaries;
                self.state = ScanState::Complete;
                self.current = None;
                self.scan_task = None;
            }
            AppMessage::Failed(error) => {
                tracing::debug!("Scan failed: {error}");
                self.error = Some(error);
                self.state = ScanState::Idle;
                self.scan_task = None;
            }
        }
    }

    fn handle_key(&mut self, key: crossterm::event::KeyEvent) -> bool {
        use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};

        if key.kind != KeyEventKind::Press {
            return true;
        }

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => false,

            KeyCode::Esc | KeyCode::Char('q') if self.current_view == View::Help => {
                self.current_view = View::Scan;
                true
            }
            KeyCode::Char('q') => false,

            KeyCode::Char('?') => {
                self.current_view = match self.current_view {
                    View::Scan => View::Help,
                    View::Help => View::Scan,
                };
                true
            }

            KeyCode::Char(' ') if self.current_view == View::Scan => {
                if self.state != ScanState::Scanning {
                    self.start_scan();
                }
                true
            }

            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_index = self.selected_index.saturating_sub(1);
                self.table_state.select(Some(self.selected_index));
                true
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let max = self.summaries.len().saturating_sub(1);
                if self.selected_index < max {
                    self.selected_index += 1;
                    self.table_state.select(Some(self.selected_index));
                }
                true
            }

            _ => true,
        }
    }

    fn start_scan(&mut self) {
        let Some(tx) = self.message_tx.clone() else {
            return;
        };

        self.state = ScanState::Scanning;
        self.summaries.clear();
        self.current = None;
        self.error = None;
        self.elapsed = None;
        self.selected_index = 0;
        self.table_state.select(None);
        self.progress = ScanProgress::start(&self.providers, self.hostnames.len());

        let providers = self.providers.clone();
        let hostnames = self.hostnames.clone();
        let settings = self.settings;

        self.scan_task = Some(tokio::spawn(async move {
            let mut scanner = Scanner::new(DirectResolver::new(settings.trial_timeout), settings);
            let events = tx.clone();

            let result = scanner
                .run(&providers, &hostnames, move |event| {
                    let msg = match event {
                        ScanEvent::Progress(p) => AppMessage::Progress(p),
                        ScanEvent::ProviderFinished(s) => AppMessage::ProviderFinished(s),
                    };
                    let _ = events.send(msg);
                })
                .await;

            let _ = tx.send(match result {
                Ok(report) => AppMessage::Completed(report),
                Err(e) => AppMessage::Failed(e.to_string()),
            });
        }));
    }

    fn draw(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(3),
                Constraint::Length(5),
                Constraint::Min(8),
                Constraint::Length(3),
            ])
            .split(f.area());

        self.draw_title_bar(f, chunks[0]);
        self.draw_progress(f, chunks[1]);
        self.draw_sampling(f, chunks[2]);

        match self.current_view {
            View::Scan => self.draw_results(f, chunks[3]),
            View::Help => self.draw_help(f, chunks[3]),
        }

        self.draw_status_bar(f, chunks[4]);
    }

    fn draw_title_bar(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(24),
                Constraint::Min(10),
                Constraint::Length(36),
            ])
            .split(area);

        let title = Paragraph::new("D N S / E V A L").style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );
        f.render_widget(title, chunks[0]);

        let version = Paragraph::new(concat!("dnseval v", env!("CARGO_PKG_VERSION")))
            .style(Style::default().fg(Color::DarkGray))
            .alignment(ratatui::layout::Alignment::Center);
        f.render_widget(version, chunks[1]);

        let counts = Paragraph::new(format!(
            "{} providers, {} hosts, {} samples",
            self.providers.len(),
            self.hostnames.len(),
            self.settings.sample_count
        ))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(ratatui::layout::Alignment::Right);
        f.render_widget(counts, chunks[2]);
    }

    fn draw_progress(&self, f: &mut Frame, area: Rect) {
        let bar = self.progress.bar(DEFAULT_BAR_WIDTH);
        let title = format!(
            " {}/{} pairs ",
            self.progress.completed, self.progress.total
        );

        let gauge = Gauge::default()
            .block(
                Block::default()
                    .title(title)
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded),
            )
            .gauge_style(Style::default().fg(Color::Yellow))
            .ratio((bar.percent / 100.0).clamp(0.0, 1.0))
            .label(bar.percent_label());

        f.render_widget(gauge, area);
    }

    fn draw_sampling(&self, f: &mut Frame, area: Rect) {
        let dim = Style::default().fg(Color::DarkGray);
        let lines = match (&self.current, self.state) {
            (Some(event), ScanState::Scanning) => vec![
                Row::new(vec![
                    Cell::from("Sampling").style(dim),
                    Cell::from(event.provider.clone()),
                ]),
                Row::new(vec![
                    Cell::from("IP").style(dim),
                    Cell::from(event.address.clone()),
                ]),
                Row::new(vec![
                    Cell::from("Host").style(dim),
                    Cell::from(event.hostname.clone()),
                ]),
            ],
            (None, ScanState::Scanning) => {
                vec![Row::new(vec![Cell::from("Starting scan...").style(dim)])]
            }
            (_, ScanState::Complete) => {
                let took = self
                    .elapsed
                    .map(|d| format!(" in {}s", d.num_seconds()))
                    .unwrap_or_default();
                vec![Row::new(vec![
                    Cell::from(format!("Scanning complete{took}.")).style(dim),
                ])]
            }
            (_, ScanState::Idle) => {
                vec![Row::new(vec![
                    Cell::from("Press [Space] to start scan").style(dim),
                ])]
            }
        };

        let table = Table::new(lines, [Constraint::Length(10), Constraint::Min(20)]).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        );
        f.render_widget(table, area);
    }

    fn draw_results(&mut self, f: &mut Frame, area: Rect) {
        if self.summaries.is_empty() {
            let msg = if self.state == ScanState::Scanning {
                "Waiting for the first provider..."
            } else {
                "No results yet"
            };
            let empty_msg = Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(ratatui::layout::Alignment::Center);
            f.render_widget(empty_msg, area);
            return;
        }

        let header = Row::new(vec!["#", "Name", "Median ms", "Min ms", "Max ms", "Samples"])
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            );

        let rows: Vec<Row> = self
            .summaries
            .iter()
            .enumerate()
            .map(|(idx, s)| {
                let style = if s.is_available() {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::Red)
                };

                Row::new(vec![
                    Cell::from(format!("{}", idx + 1)),
                    Cell::from(s.name.clone()),
                    Cell::from(s.median_display()).style(style),
                    Cell::from(s.min_display()),
                    Cell::from(s.max_display()),
                    Cell::from(s.samples.to_string()),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(4),
                Constraint::Min(20),
                Constraint::Length(12),
                Constraint::Length(12),
                Constraint::Length(12),
                Constraint::Length(8),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .title(" Ranking ")
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        )
        .row_highlight_style(Style::default().bg(Color::Blue));

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn draw_help(&self, f: &mut Frame, area: Rect) {
        use ratatui::widgets::Clear;

        f.render_widget(Clear, area);

        let help_items = [
            ("Space", "Start scan"),
            ("j/k or Up/Down", "Navigate results"),
            ("?", "Toggle help"),
            ("q", "Quit (stops a running scan)"),
        ];

        let rows: Vec<Row> = help_items
            .iter()
            .map(|(key, desc)| {
                Row::new(vec![
                    Cell::from(format!("  {}  ", key)).style(Style::default().fg(Color::Yellow)),
                    Cell::from(*desc).style(Style::default().fg(Color::White)),
                ])
            })
            .collect();

        let help_table = Table::new(rows, [Constraint::Length(16), Constraint::Min(30)])
            .block(
                Block::default()
                    .title(" Keyboard Shortcuts ")
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded),
            )
            .column_spacing(2);

        f.render_widget(help_table, area);
    }

    fn draw_status_bar(&self, f: &mut Frame, area: Rect) {
        let (text, color) = match &self.error {
            Some(error) => (format!("Error: {error}"), Color::Red),
            None => {
                let answered = self.summaries.iter().filter(|s| s.is_available()).count();
                (
                    format!(
                        "Providers done: {}/{}  |  Answered: {}  |  [?] help  [q] quit",
                        self.summaries.len(),
                        self.providers.len(),
                        answered
                    ),
                    Color::White,
                )
            }
        };

        let status = Paragraph::new(text).style(Style::default().fg(color)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded),
        );
        f.render_widget(status, area);
    }
}
