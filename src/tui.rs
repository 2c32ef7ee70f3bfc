use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap};
use ratatui::{Frame, Terminal};
use tracing::info;

use crate::cancel::CancelToken;
use crate::config::DashboardConfig;
use crate::feed::{HttpFeed, TradeFeed};
use crate::loader::{DashboardStore, Loader};
use crate::view::{
    build_view, Align, Badge, DashboardView, MetricCard, Tone, TradeTable, COLUMNS,
    LOADING_MESSAGE,
};

const SPINNER: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

pub struct App {
    pub title: String,
    pub view: DashboardView,
    pub scroll_offset: usize,
    pub should_quit: bool,
    tick: usize,
}

impl App {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            view: DashboardView::Loading,
            scroll_offset: 0,
            should_quit: false,
            tick: 0,
        }
    }

    pub fn set_view(&mut self, view: DashboardView) {
        self.view = view;
        self.scroll_offset = 0;
    }

    fn row_count(&self) -> usize {
        match &self.view {
            DashboardView::Loaded { table: TradeTable::Rows { rows }, .. } => rows.len(),
            _ => 0,
        }
    }

    pub fn scroll_down(&mut self) {
        if self.scroll_offset + 1 < self.row_count() {
            self.scroll_offset += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }
}

pub async fn run(config: DashboardConfig) -> Result<(), Box<dyn std::error::Error>> {
    let feed = HttpFeed::new(&config)?;
    let loader = Loader::new(feed, DashboardStore::new());
    let cancel = CancelToken::new();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &config.title, loader, &cancel).await;
    cancel.cancel();

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_app<F: TradeFeed>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    title: &str,
    loader: Loader<F>,
    cancel: &CancelToken,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut app = App::new(title);
    let mut rx = loader.store().subscribe();

    spawn_load(&loader, cancel, false);

    while !app.should_quit {
        if rx.has_changed().unwrap_or(false) {
            let view = build_view(&rx.borrow_and_update());
            app.set_view(view);
        }

        terminal.draw(|f| draw(f, &app))?;
        app.tick = app.tick.wrapping_add(1);

        // Handle input
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
                        KeyCode::Char('r') if matches!(app.view, DashboardView::Failed { .. }) => {
                            spawn_load(&loader, cancel, true);
                        }
                        KeyCode::Up => app.scroll_up(),
                        KeyCode::Down => app.scroll_down(),
                        _ => {}
                    }
                }
            }
        }
    }

    info!("dashboard closed");
    Ok(())
}

fn spawn_load<F: TradeFeed>(loader: &Loader<F>, cancel: &CancelToken, retry: bool) {
    let loader = loader.clone();
    let cancel = cancel.clone();
    tokio::spawn(async move {
        if retry {
            loader.retry(&cancel).await
        } else {
            loader.load(&cancel).await
        }
    });
}

pub fn draw(f: &mut Frame, app: &App) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(5),    // body
        ])
        .split(size);

    draw_header(f, app, chunks[0]);
    match &app.view {
        DashboardView::Loading => draw_loading(f, app, chunks[1]),
        DashboardView::Failed { failure } => {
            let text = vec![
                Line::from(Span::styled(
                    failure.kind.label(),
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(failure.message.clone()),
                Line::from(""),
                Line::from(Span::styled("Press r to retry", Style::default().fg(Color::Yellow))),
            ];
            let p = Paragraph::new(text)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).title(" Load failed "));
            f.render_widget(p, chunks[1]);
        }
        DashboardView::Loaded { .. } => {
            let body = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(5), Constraint::Min(4)])
                .split(chunks[1]);
            draw_cards(f, app, body[0]);
            draw_trade_log(f, app, body[1]);
        }
    }
}

fn draw_header(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let header = vec![
        Span::styled(format!(" {} ", app.title), Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw(" | "),
        Span::styled("q=quit  r=retry  Up/Down=scroll", Style::default().fg(Color::DarkGray)),
    ];
    let p = Paragraph::new(Line::from(header)).block(Block::default().borders(Borders::ALL));
    f.render_widget(p, area);
}

fn draw_loading(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let frame = SPINNER[app.tick % SPINNER.len()];
    let pad = area.height.saturating_sub(3) / 2;
    let mut lines: Vec<Line> = (0..pad).map(|_| Line::from("")).collect();
    lines.push(Line::from(format!("{frame} {LOADING_MESSAGE}")));
    let p = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(p, area);
}

fn draw_cards(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let DashboardView::Loaded { summary, .. } = &app.view else {
        return;
    };
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(area);

    for (card, chunk) in [&summary.balance, &summary.open_trades, &summary.daily_pnl]
        .into_iter()
        .zip(chunks.iter())
    {
        draw_card(f, card, *chunk);
    }

    let status = Paragraph::new(vec![Line::from(""), Line::from(badge_span(&summary.running))])
        .block(Block::default().borders(Borders::ALL).title(" Status "));
    f.render_widget(status, chunks[3]);
}

fn draw_card(f: &mut ratatui::Frame, card: &MetricCard, area: Rect) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            card.value.clone(),
            Style::default().fg(tone_color(card.tone)).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(card.caption, Style::default().fg(Color::DarkGray))),
    ];
    let p = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(format!(" {} ", card.label)));
    f.render_widget(p, area);
}

fn draw_trade_log(f: &mut ratatui::Frame, app: &App, area: Rect) {
    let DashboardView::Loaded { table, .. } = &app.view else {
        return;
    };

    let header = Row::new(
        COLUMNS
            .iter()
            .map(|c| Cell::from(aligned(c.title.to_string(), c.align)))
            .collect::<Vec<_>>(),
    )
    .style(Style::default().add_modifier(Modifier::BOLD).fg(Color::White));

    let widths = [
        Constraint::Length(24),
        Constraint::Length(12),
        Constraint::Min(10),
        Constraint::Min(10),
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Min(10),
    ];

    let (rows, count): (Vec<Row>, usize) = match table {
        TradeTable::Empty { .. } => (Vec::new(), 0),
        TradeTable::Rows { rows } => {
            let visible = rows
                .iter()
                .skip(app.scroll_offset)
                .map(|row| {
                    Row::new(vec![
                        Cell::from(row.time.clone()),
                        Cell::from(badge_span(&row.pair)),
                        Cell::from(aligned(row.price.clone(), Align::Right)),
                        Cell::from(aligned(row.size.clone(), Align::Right)),
                        Cell::from(aligned(row.volatility.clone(), Align::Right)),
                        Cell::from(badge_span(&row.action)),
                        Cell::from(aligned(row.stop_price.clone(), Align::Right)),
                    ])
                })
                .collect();
            (visible, rows.len())
        }
    };

    let block = Block::default().borders(Borders::ALL).title(format!(" Trade Log ({count}) "));
    let t = Table::new(rows, widths).header(header).block(block);
    f.render_widget(t, area);

    if let TradeTable::Empty { message, .. } = table {
        // Below the border and header row, spanning the full table width.
        let inner = Rect {
            x: area.x + 1,
            y: area.y + 2,
            width: area.width.saturating_sub(2),
            height: area.height.saturating_sub(3).min(1),
        };
        f.render_widget(Paragraph::new(*message).alignment(Alignment::Center), inner);
    }
}

fn aligned(text: String, align: Align) -> Line<'static> {
    match align {
        Align::Left => Line::from(text),
        Align::Right => Line::from(text).alignment(Alignment::Right),
    }
}

fn badge_span(badge: &Badge) -> Span<'static> {
    Span::styled(
        badge.label.clone(),
        Style::default().fg(tone_color(badge.tone)).add_modifier(Modifier::BOLD),
    )
}

fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Positive => Color::Green,
        Tone::Negative => Color::Red,
        Tone::Neutral => Color::White,
        Tone::Accent => Color::Magenta,
    }
}
