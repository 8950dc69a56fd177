pub mod widgets;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

use crate::app::state::{AppMode, AppState};

pub fn render(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    if area.width < 40 || area.height < 18 {
        let warning = Paragraph::new("Terminal too small. Resize to at least 40x18.")
            .block(Block::default().borders(Borders::ALL).title("vayu-tui"));
        frame.render_widget(warning, area);
        return;
    }

    if state.mode == AppMode::Loading {
        render_loading(frame, area, state);
        return;
    }

    let banner_height = u16::from(state.advisory.is_some()) + u16::from(state.data_notice.is_some());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(banner_height),
            Constraint::Length(9),
            Constraint::Length(6),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    widgets::render_banners(frame, chunks[0], state);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(chunks[1]);
    widgets::render_hero(frame, columns[0], state);
    widgets::render_recommendations(frame, columns[1], state);

    widgets::render_forecast(frame, chunks[2], state);
    widgets::render_pollutants(frame, chunks[3], state);
    widgets::render_footer(frame, chunks[4], state);

    if state.picker_open {
        widgets::render_picker(frame, centered_rect(70, 60, area), state);
    }
}

fn render_loading(frame: &mut Frame, area: Rect, state: &AppState) {
    let mut lines = vec![Line::raw(""), Line::raw(state.loading_message.clone())];
    if let Some(advisory) = &state.advisory {
        lines.push(Line::raw(""));
        lines.push(Line::raw(advisory.clone()));
    }
    let paragraph = Paragraph::new(lines)
        .centered()
        .block(Block::default().borders(Borders::ALL).title("vayu-tui"));
    frame.render_widget(paragraph, centered_rect(60, 30, area));
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
