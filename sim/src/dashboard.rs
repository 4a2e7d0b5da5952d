//! Terminal dashboard (C10): a polling view over the engine's public
//! snapshot surface. Never touches engine internals directly — every
//! refresh goes through `top_bids`/`top_asks`/`recent_trades_for_symbol`,
//! the same surface an external publisher would use.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use clob_engine::MatchingEngine;
use crossterm::event::{self, Event, KeyCode};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Terminal;

const FRAME_INTERVAL: Duration = Duration::from_millis(80); // ~12.5 FPS
const MIN_DEPTH: usize = 1;
const MAX_DEPTH: usize = 50;
const DEFAULT_DEPTH: usize = 15;
const RECENT_TRADES: usize = 12;

pub fn run(engine: Arc<MatchingEngine>) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, engine);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    engine: Arc<MatchingEngine>,
) -> io::Result<()> {
    let mut symbols = engine.symbols();
    symbols.sort();
    let mut symbol_idx = 0usize;
    let mut depth = DEFAULT_DEPTH;

    loop {
        if symbols.is_empty() {
            symbols = engine.symbols();
            symbols.sort();
        }
        let symbol = symbols.get(symbol_idx).cloned().unwrap_or_default();

        let bids = engine.top_bids(&symbol, depth);
        let asks = engine.top_asks(&symbol, depth);
        let trades = engine.recent_trades_for_symbol(&symbol, RECENT_TRADES);

        terminal.draw(|frame| {
            let area = frame.size();
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(1),
                    Constraint::Min(5),
                    Constraint::Length(1),
                    Constraint::Length((RECENT_TRADES + 2) as u16),
                ])
                .split(area);

            let header = Paragraph::new(format!(
                "CLOB Viewer | Symbol: {symbol} | Depth: {depth} | q=quit arrows=switch +/- depth"
            ));
            frame.render_widget(header, chunks[0]);

            let book_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(chunks[1]);

            let bid_lines: Vec<Line> = bids
                .iter()
                .map(|(price, qty)| {
                    Line::from(Span::styled(
                        format!("{qty:>8} @ {price:>10.2}"),
                        Style::default().fg(Color::Green),
                    ))
                })
                .collect();
            frame.render_widget(
                Paragraph::new(bid_lines).block(Block::default().borders(Borders::ALL).title("BIDS")),
                book_chunks[0],
            );

            let ask_lines: Vec<Line> = asks
                .iter()
                .map(|(price, qty)| {
                    Line::from(Span::styled(
                        format!("{qty:>8} @ {price:>10.2}"),
                        Style::default().fg(Color::Red),
                    ))
                })
                .collect();
            frame.render_widget(
                Paragraph::new(ask_lines).block(Block::default().borders(Borders::ALL).title("ASKS")),
                book_chunks[1],
            );

            let spread_line = match (bids.first(), asks.first()) {
                (Some((bid, _)), Some((ask, _))) => format!(
                    "Best Bid {bid:.2} | Best Ask {ask:.2} | Spread {:.2}",
                    ask - bid
                ),
                _ => "Best Bid - | Best Ask - | Spread -".to_string(),
            };
            frame.render_widget(
                Paragraph::new(spread_line).style(Style::default().fg(Color::Yellow)),
                chunks[2],
            );

            let trade_lines: Vec<Line> = trades
                .iter()
                .rev()
                .map(|trade| {
                    Line::from(format!(
                        "{:>8} @ {:>10.2}  {}",
                        trade.quantity,
                        trade.price,
                        clob_engine::format_wall_time(&trade.wall_time)
                    ))
                })
                .collect();
            frame.render_widget(
                Paragraph::new(trade_lines)
                    .block(Block::default().borders(Borders::ALL).title("Recent Trades")),
                chunks[3],
            );
        })?;

        if event::poll(FRAME_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(()),
                    KeyCode::Right => symbol_idx = (symbol_idx + 1) % symbols.len().max(1),
                    KeyCode::Left => {
                        symbol_idx = (symbol_idx + symbols.len().saturating_sub(1)) % symbols.len().max(1)
                    }
                    KeyCode::Char('+') | KeyCode::Char('=') => depth = (depth + 1).min(MAX_DEPTH),
                    KeyCode::Char('-') | KeyCode::Char('_') => depth = depth.saturating_sub(1).max(MIN_DEPTH),
                    _ => {}
                }
            }
        }
    }
}
