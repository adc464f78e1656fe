use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::simulation::agent::ForagerAgent;
use crate::simulation::scheduler::SimulationReport;

const fn glyph_color(ch: char) -> Color {
    match ch {
        'T' => Color::Yellow,
        'O' => Color::Blue,
        '#' => Color::DarkGray,
        'F' => Color::Green,
        '0'..='9' => Color::Red,
        _ => Color::Gray,
    }
}

/// One-line summary shown above the field.
#[must_use]
pub fn format_hud(report: &SimulationReport, agents: &[ForagerAgent]) -> String {
    let mut hud = format!("Tick: {} | Score: {}", report.ticks, report.total_score);
    for agent in agents {
        hud.push_str(&format!(
            " | {}: {} fuel {:.0} carry {}",
            agent.id(),
            agent.mode(),
            agent.status.fuel,
            agent.status.carried.len()
        ));
    }
    hud
}

pub fn draw_ui(f: &mut Frame, grid_lines: Vec<String>, hud_info: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // HUD
            Constraint::Min(0),    // Field
        ])
        .split(f.area());

    let hud = Paragraph::new(Span::styled(
        hud_info,
        Style::default().add_modifier(Modifier::REVERSED),
    ));
    f.render_widget(hud, chunks[0]);

    let text: Vec<Line> = grid_lines
        .into_iter()
        .map(|s| {
            Line::from(
                s.chars()
                    .map(|ch| Span::styled(ch.to_string(), Style::default().fg(glyph_color(ch))))
                    .collect::<Vec<_>>(),
            )
        })
        .collect();

    let field = Paragraph::new(text)
        .block(Block::default().borders(Borders::NONE))
        .style(Style::default().bg(Color::Black));

    f.render_widget(field, chunks[1]);
}
