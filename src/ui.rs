//! Terminal UI rendering with ratatui
//!
//! Draws only from a [`Snapshot`]; the renderer never touches the game itself.

use crate::settings::Settings;
use blockdrop::board::{BOARD_HEIGHT, BOARD_WIDTH};
use blockdrop::game::Phase;
use blockdrop::snapshot::{NextView, Snapshot};
use blockdrop::tetromino::TetrominoType;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const EMPTY: &str = "  ";

/// Total width needed: board(22) + next/stats(18) = 40
const GAME_WIDTH: u16 = 40;
/// Total height needed: board(20) + 2 for borders = 22
const GAME_HEIGHT: u16 = 22;

fn color_of(kind: TetrominoType) -> Color {
    let (r, g, b) = kind.color();
    Color::Rgb(r, g, b)
}

/// Render the entire game UI
pub fn render_game(frame: &mut Frame, snapshot: &Snapshot, settings: &Settings) {
    let area = frame.area();

    // Center the game area
    let game_area = center_rect(area, GAME_WIDTH, GAME_HEIGHT);

    // Create main layout: board | next + stats
    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(22), // Board (10*2 + 2 for borders)
            Constraint::Length(18), // Next piece + stats
        ])
        .split(game_area);

    render_board(frame, main_layout[0], snapshot, settings);

    let right_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Next piece
            Constraint::Min(12),   // Stats
        ])
        .split(main_layout[1]);

    let (block_char, _) = settings.visual.block_chars();
    render_next(frame, right_layout[0], &snapshot.next, block_char);
    render_stats(frame, right_layout[1], snapshot, settings.best_score());

    // Overlays
    if snapshot.phase == Phase::GameOver {
        render_overlay(frame, area, "GAME OVER", "R to restart, Q to quit");
    } else if snapshot.paused {
        render_overlay(frame, area, "PAUSED", "Press P to resume");
    }
}

/// Center a rect within another rect
fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render the next piece preview
fn render_next(frame: &mut Frame, area: Rect, next: &NextView, block_char: &str) {
    let block = Block::default()
        .title(" NEXT ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 1 || inner.width < 4 {
        return;
    }

    let color = color_of(next.kind);
    let lines: Vec<Line> = (0..next.rows)
        .map(|row| {
            let spans: Vec<Span> = (0..next.cols)
                .map(|col| {
                    if next.cells.contains(&(row, col)) {
                        Span::styled(block_char, Style::default().fg(color))
                    } else {
                        Span::raw(EMPTY)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}

/// Render the game board
fn render_board(frame: &mut Frame, area: Rect, snapshot: &Snapshot, settings: &Settings) {
    let (block_char, ghost_char) = settings.visual.block_chars();
    let show_ghost = settings.visual.show_ghost;

    let block = Block::default()
        .title(" BLOCKDROP ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let active_color = color_of(snapshot.active.kind);
    let mut lines: Vec<Line> = Vec::with_capacity(BOARD_HEIGHT);

    // Row 0 is the top of the board
    for row in 0..BOARD_HEIGHT {
        let spans: Vec<Span> = (0..BOARD_WIDTH)
            .map(|col| {
                let (r, c) = (row as i32, col as i32);
                if snapshot.is_active(r, c) {
                    Span::styled(block_char, Style::default().fg(active_color))
                } else if let Some(kind) = snapshot.grid[row][col] {
                    Span::styled(block_char, Style::default().fg(color_of(kind)))
                } else if show_ghost && snapshot.is_ghost(r, c) {
                    Span::styled(ghost_char, Style::default().fg(active_color).dim())
                } else {
                    Span::raw(EMPTY)
                }
            })
            .collect();
        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);
}

/// Render stats panel
fn render_stats(frame: &mut Frame, area: Rect, snapshot: &Snapshot, best: Option<u64>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let label = |text: &'static str| Line::from(Span::styled(text, Style::default().fg(Color::Gray)));

    let mut lines = vec![
        label("SCORE"),
        Line::from(Span::styled(
            snapshot.score.points.to_string(),
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::raw(""),
        label("LEVEL"),
        Line::from(Span::styled(
            snapshot.score.level.to_string(),
            Style::default().fg(Color::Cyan),
        )),
        Line::raw(""),
        label("LINES"),
        Line::from(Span::styled(
            snapshot.score.lines.to_string(),
            Style::default().fg(Color::Green),
        )),
        Line::raw(""),
        label("SPEED"),
        Line::from(Span::styled(
            format!("{} ms", snapshot.drop_interval_ms),
            Style::default().fg(Color::Magenta),
        )),
    ];

    if let Some(best) = best {
        lines.push(Line::raw(""));
        lines.push(label("BEST"));
        lines.push(Line::from(Span::styled(
            best.to_string(),
            Style::default().fg(Color::White),
        )));
    }

    let paragraph = Paragraph::new(lines);
    frame.render_widget(paragraph, inner);
}

/// Render an overlay (for pause/game over)
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_width = 28u16;
    let popup_height = 5u16;
    let popup_area = center_rect(area, popup_width, popup_height);

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let text = vec![
        Line::styled(title, Style::default().fg(Color::Yellow).bold()),
        Line::raw(""),
        Line::styled(subtitle, Style::default().fg(Color::Gray)),
    ];

    let paragraph = Paragraph::new(text).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}
