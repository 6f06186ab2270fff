use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event as CEvent, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, List, ListItem, Paragraph, Sparkline},
    Terminal,
};
use roshambo_engine::{Opponent, RoundReport};
use roshambo_session::GameSession;
use roshambo_store::RecordStore;
use roshambo_types::moves::{Move, Outcome};

pub fn run<S, O>(session: &mut GameSession<S, O>) -> Result<()>
where
    S: RecordStore,
    O: Opponent,
{
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let res = run_loop(&mut terminal, session);

    terminal.show_cursor()?;
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    res
}

fn run_loop<B, S, O>(terminal: &mut Terminal<B>, session: &mut GameSession<S, O>) -> Result<()>
where
    B: ratatui::backend::Backend,
    S: RecordStore,
    O: Opponent,
{
    let mut banner = String::from("Make your choice!");
    let mut banner_color = Color::Gray;

    loop {
        terminal.draw(|f| {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints(
                    [
                        Constraint::Length(3),
                        Constraint::Length(3),
                        Constraint::Length(10),
                        Constraint::Min(0),
                    ]
                    .as_ref(),
                )
                .split(f.size());

            let user = session.current_user().unwrap_or("local player").to_string();
            let header = Paragraph::new(Line::from(vec![
                Span::styled(
                    "Rock, Paper, Scissors",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw("  "),
                Span::styled(user, Style::default().fg(Color::Magenta)),
                Span::raw("  "),
                Span::raw(session.score_line()),
                Span::raw("  "),
                Span::styled("r/p/s", Style::default().fg(Color::Yellow)),
                Span::raw(" play  "),
                Span::styled("q", Style::default().fg(Color::Yellow)),
                Span::raw(" quit"),
            ]))
            .block(Block::default().borders(Borders::ALL).title("Dashboard"));
            f.render_widget(header, rows[0]);

            let result = Paragraph::new(Span::styled(
                banner.clone(),
                Style::default()
                    .fg(banner_color)
                    .add_modifier(Modifier::BOLD),
            ))
            .block(Block::default().borders(Borders::ALL).title("Result"));
            f.render_widget(result, rows[1]);

            let charts = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(40), Constraint::Percentage(60)].as_ref())
                .split(rows[2]);

            let distribution: Vec<(&str, u64)> = session
                .move_distribution()
                .into_iter()
                .map(|(name, count)| (name, u64::from(count)))
                .collect();
            let bars = BarChart::default()
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Move Distribution"),
                )
                .data(distribution.as_slice())
                .bar_width(9)
                .bar_gap(2)
                .bar_style(Style::default().fg(Color::Blue))
                .value_style(Style::default().fg(Color::White).bg(Color::Blue));
            f.render_widget(bars, charts[0]);

            let trend = trend_points(session.win_rate_trend(), charts[1].width);
            let sparkline = Sparkline::default()
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!("Win Rate Trend ({})", session.stats().win_rate)),
                )
                .data(&trend)
                .max(100)
                .style(Style::default().fg(Color::Green));
            f.render_widget(sparkline, charts[1]);

            let items: Vec<ListItem> = session
                .recent_history()
                .into_iter()
                .map(|record| ListItem::new(record.describe()))
                .collect();
            let list = List::new(items)
                .block(Block::default().borders(Borders::ALL).title("Game History"));
            f.render_widget(list, rows[3]);
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let CEvent::Key(key) = event::read()? {
                let choice = match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('r') => Move::Rock,
                    KeyCode::Char('p') => Move::Paper,
                    KeyCode::Char('s') => Move::Scissors,
                    _ => continue,
                };
                match session.play(choice)? {
                    Some(report) => {
                        banner = describe_round(choice, report);
                        banner_color = outcome_color(report.outcome);
                    }
                    None => {
                        banner = "Log in before playing".into();
                        banner_color = Color::Red;
                    }
                }
            }
        }
    }

    Ok(())
}

fn describe_round(player: Move, report: RoundReport) -> String {
    format!(
        "You chose {} | Computer chose {} | {}",
        player.display_name(),
        report.computer.display_name(),
        report.outcome.headline()
    )
}

fn outcome_color(outcome: Outcome) -> Color {
    match outcome {
        Outcome::Win => Color::Green,
        Outcome::Loss => Color::Red,
        Outcome::Tie => Color::Yellow,
    }
}

/// Keeps the most recent points that fit inside the chart's borders.
fn trend_points(trend: &[f64], width: u16) -> Vec<u64> {
    let visible = usize::from(width.saturating_sub(2)).max(1);
    let start = trend.len().saturating_sub(visible);
    trend[start..]
        .iter()
        .map(|rate| rate.round().clamp(0.0, 100.0) as u64)
        .collect()
}
