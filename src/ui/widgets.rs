use ratatui::{
    Frame,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Row, Table},
};

use crate::{
    app::state::AppState,
    domain::{
        aqi::{ForecastPoint, level_of},
        health::recommendations_for,
    },
};

pub fn level_color(severity_rank: u8) -> Color {
    match severity_rank {
        0 => Color::Green,
        1 => Color::Yellow,
        2 => Color::Rgb(255, 165, 0),
        3 => Color::Red,
        4 => Color::Magenta,
        _ => Color::Rgb(139, 0, 0),
    }
}

pub fn render_banners(frame: &mut Frame, area: Rect, state: &AppState) {
    if area.height == 0 {
        return;
    }
    let mut lines = Vec::new();
    if let Some(advisory) = &state.advisory {
        lines.push(Line::styled(
            format!("⚠ {advisory}"),
            Style::default().fg(Color::Yellow),
        ));
    }
    if let Some(notice) = &state.data_notice {
        lines.push(Line::styled(
            format!("⚠ {notice}"),
            Style::default().fg(Color::LightRed),
        ));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

pub fn render_hero(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().borders(Borders::ALL).title("Your Location");

    let Some(reading) = &state.reading else {
        frame.render_widget(
            Paragraph::new("No reading yet.").block(block),
            area,
        );
        return;
    };

    let level = level_of(reading.aqi);
    let color = level_color(level.severity_rank);
    let mut lines = vec![
        Line::raw(reading.location_label.clone()),
        Line::raw(""),
        Line::styled(
            format!("AQI {}", reading.aqi),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Line::styled(level.label, Style::default().fg(color)),
        Line::raw(""),
        Line::raw(format!(
            "Last updated: {}",
            reading.observed_at.format("%H:%M:%S")
        )),
    ];
    if state.refreshing {
        lines.push(Line::styled(
            "↻ refreshing...",
            Style::default().fg(Color::DarkGray),
        ));
    }

    frame.render_widget(Paragraph::new(lines).centered().block(block), area);
}

pub fn render_recommendations(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Health Recommendations");

    let Some(reading) = &state.reading else {
        frame.render_widget(Paragraph::new("").block(block), area);
        return;
    };

    let items: Vec<ListItem> = recommendations_for(reading.aqi)
        .into_iter()
        .map(|rec| {
            ListItem::new(vec![
                Line::styled(
                    format!("{}: {}", rec.level, rec.message),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Line::styled(
                    format!("  {}", rec.description),
                    Style::default().fg(Color::DarkGray),
                ),
                Line::raw(""),
            ])
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

pub fn render_forecast(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("7-Day AQI Forecast");

    if state.forecast.is_empty() {
        frame.render_widget(Paragraph::new("No forecast yet.").block(block), area);
        return;
    }

    let header = Row::new(
        state
            .forecast
            .iter()
            .map(|point| Span::raw(point.day_label.clone())),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));
    let values = Row::new(state.forecast.iter().map(forecast_cell));
    let labels = Row::new(state.forecast.iter().map(|point| {
        let level = level_of(point.aqi);
        Span::styled(
            level.label.split(' ').next().unwrap_or_default().to_string(),
            Style::default().fg(level_color(level.severity_rank)),
        )
    }));

    let widths = vec![Constraint::Ratio(1, 7); state.forecast.len()];
    frame.render_widget(
        Table::new([header, values, labels], widths).block(block),
        area,
    );
}

fn forecast_cell(point: &ForecastPoint) -> Span<'static> {
    let level = level_of(point.aqi);
    Span::styled(
        point.aqi.to_string(),
        Style::default()
            .fg(level_color(level.severity_rank))
            .add_modifier(Modifier::BOLD),
    )
}

pub fn render_pollutants(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Pollutants (µg/m³)");

    let Some(reading) = &state.reading else {
        frame.render_widget(Paragraph::new("").block(block), area);
        return;
    };

    let entries = reading.pollutants.entries();
    let names = Row::new(
        entries
            .iter()
            .map(|(name, _)| Span::raw((*name).to_string())),
    )
    .style(Style::default().add_modifier(Modifier::BOLD));
    let values = Row::new(
        entries
            .iter()
            .map(|(_, value)| Span::raw(format!("{value:.1}"))),
    );

    let widths = vec![Constraint::Ratio(1, 6); entries.len()];
    frame.render_widget(Table::new([names, values], widths).block(block), area);
}

pub fn render_footer(frame: &mut Frame, area: Rect, state: &AppState) {
    let text = if state.picker_open {
        "type to search  ↑/↓ select  Enter choose  Esc cancel"
    } else {
        "r refresh  s change city  q quit"
    };
    frame.render_widget(
        Paragraph::new(Line::styled(text, Style::default().fg(Color::DarkGray))),
        area,
    );
}

pub fn render_picker(frame: &mut Frame, area: Rect, state: &AppState) {
    frame.render_widget(Clear, area);

    let title = if state.searching {
        "Select Your City (searching...)"
    } else {
        "Select Your City"
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    let mut lines = vec![
        Line::raw(format!("Search: {}_", state.picker_query)),
        Line::raw(""),
    ];
    if state.picker_results.is_empty() && !state.picker_query.trim().is_empty() && !state.searching
    {
        lines.push(Line::styled(
            "No cities found. Try a different search term.",
            Style::default().fg(Color::DarkGray),
        ));
    }
    for (idx, candidate) in state.picker_results.iter().enumerate() {
        let label = format!(
            "{}, {}, {}",
            candidate.name, candidate.state, candidate.country
        );
        let style = if idx == state.picker_selected {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        lines.push(Line::styled(label, style));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
