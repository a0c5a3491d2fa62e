//! Terminal UI rendering with ratatui
//!
//! Read-only: everything here looks at the game, nothing mutates it.

use crate::board::Cell;
use crate::game::Game;
use crate::piece::{Piece, Point};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

const BLOCK: &str = "██";
const LOCKED: &str = "▓▓";
const EMPTY: &str = "  ";

/// Width of the side panel
const PANEL_WIDTH: u16 = 18;

/// What the renderer needs besides the game itself
pub struct View<'a> {
    pub next: Option<&'a Piece>,
    pub help: &'a [(String, &'static str)],
}

/// Render the board, the side panel and any overlay
pub fn render_game(frame: &mut Frame, game: &Game, view: &View) {
    let area = frame.area();
    let board = game.board();
    let board_width = board.width() as u16 * 2 + 2;
    let board_height = board.height() as u16 + 2;

    let game_area = center_rect(area, board_width + PANEL_WIDTH, board_height);
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(board_width), Constraint::Length(PANEL_WIDTH)])
        .split(game_area);

    render_board(frame, layout[0], game);
    render_panel(frame, layout[1], game, view);

    if game.is_game_over() {
        render_overlay(frame, layout[0], "GAME OVER", "n: new game");
    }
}

fn render_board(frame: &mut Frame, area: Rect, game: &Game) {
    let block = Block::default()
        .title(" stackfall ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let falling = game.active_piece();
    let lines: Vec<Line> = game
        .board()
        .rows()
        .enumerate()
        .map(|(y, row)| {
            let spans: Vec<Span> = row
                .iter()
                .enumerate()
                .map(|(x, cell)| {
                    let point = Point::new(x as i32, y as i32);
                    match falling {
                        Some(active) if active.cells().contains(&point) => {
                            Span::styled(BLOCK, Style::default().fg(active.piece.color()))
                        }
                        _ => match cell {
                            Cell::Locked(color) => Span::styled(LOCKED, Style::default().fg(*color)),
                            Cell::Empty => Span::raw(EMPTY),
                        },
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_panel(frame: &mut Frame, area: Rect, game: &Game, view: &View) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(7), Constraint::Length(3), Constraint::Min(4)])
        .split(area);

    let next_block = Block::default().title(" NEXT ").borders(Borders::ALL);
    let next_inner = next_block.inner(layout[0]);
    frame.render_widget(next_block, layout[0]);
    if let Some(piece) = view.next {
        render_mini_piece(frame, next_inner, piece);
    }

    let lines = Paragraph::new(Line::from(vec![
        Span::styled("Lines ", Style::default().fg(Color::Gray)),
        Span::styled(game.lines_cleared().to_string(), Style::default().bold()),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(lines, layout[1]);

    let help: Vec<Line> = view
        .help
        .iter()
        .map(|(key, label)| {
            Line::from(vec![
                Span::styled(format!("{key:>5} "), Style::default().fg(Color::Yellow)),
                Span::styled(*label, Style::default().fg(Color::DarkGray)),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(help).block(Block::default().title(" KEYS ").borders(Borders::ALL)),
        layout[2],
    );
}

/// Draw a piece centred in a small box
fn render_mini_piece(frame: &mut Frame, area: Rect, piece: &Piece) {
    let points = piece.points();
    let min_x = points.iter().map(|p| p.x).min().unwrap_or(0);
    let max_x = points.iter().map(|p| p.x).max().unwrap_or(0);
    let min_y = points.iter().map(|p| p.y).min().unwrap_or(0);
    let max_y = points.iter().map(|p| p.y).max().unwrap_or(0);

    let lines: Vec<Line> = (min_y..=max_y)
        .map(|y| {
            let spans: Vec<Span> = (min_x..=max_x)
                .map(|x| {
                    if points.contains(&Point::new(x, y)) {
                        Span::styled(BLOCK, Style::default().fg(piece.color()))
                    } else {
                        Span::raw(EMPTY)
                    }
                })
                .collect();
            Line::from(spans)
        })
        .collect();

    let height = lines.len() as u16;
    let width = (max_x - min_x + 1) as u16 * 2;
    frame.render_widget(Paragraph::new(lines), center_rect(area, width, height));
}

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

/// Render an overlay (for game over)
fn render_overlay(frame: &mut Frame, area: Rect, title: &str, subtitle: &str) {
    let popup_area = center_rect(area, 20, 5);

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

    frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), inner);
}
