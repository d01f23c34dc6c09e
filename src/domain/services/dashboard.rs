#[cfg(test)]
#[path = "dashboard_test.rs"]
mod tests;

use ratatui::prelude::*;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Scrollbar;
use ratatui::widgets::ScrollbarOrientation;
use ratatui::widgets::Wrap;
use ratatui::Frame;

use super::AppState;
use crate::domain::models::format_query_date;
use crate::domain::models::Loading;

pub const TITLE: &str = "Octavio Dashboard";

const HINTS: &str = "←/h previous · →/l next · t today · r refresh · q quit";

fn block(title: String, stale: bool) -> Block<'static> {
    let mut style = Style::default();
    if stale {
        style = style.fg(Color::Red);
    }

    return Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(style)
        .padding(Padding::new(1, 1, 0, 0));
}

pub fn instruments_title(app_state: &AppState) -> String {
    let mut title = " Online Instruments ".to_string();
    if let Some(updated_at) = app_state.instruments_updated_at {
        title = format!(" Online Instruments (updated {}) ", updated_at.format("%H:%M:%S"));
    }
    if app_state.instruments_error.is_some() {
        title = format!("{}(stale) ", title);
    }

    return title;
}

pub fn instruments_text(app_state: &AppState) -> Text<'static> {
    let mut lines = vec![];
    if let Some(instruments) = &app_state.instruments {
        for line in instruments.lines() {
            lines.push(Line::from(line.to_string()));
        }
    }
    if let Some(err) = &app_state.instruments_error {
        lines.push(Line::from(Span::styled(
            format!("Fetch failed: {err}"),
            Style::default().fg(Color::Red),
        )));
    }

    return Text::from(lines);
}

pub fn date_text(app_state: &AppState) -> String {
    let mut text = format!(
        "{} ({})",
        format_query_date(app_state.selected_date),
        app_state.selected_date.format("%a")
    );
    if app_state.waiting_for_log {
        text = format!("{text} loading...");
    }

    return format!("{text}   {HINTS}");
}

pub fn log_title(app_state: &AppState) -> String {
    let shown = match &app_state.log {
        Some(log) => log.date,
        None => app_state.selected_date,
    };

    let mut title = format!(" Log for {} ", format_query_date(shown));
    if let Some(err) = &app_state.log_error {
        title = format!("{title}(stale: {err}) ");
    } else if app_state.is_log_stale() {
        title = format!("{title}(stale) ");
    }

    return title;
}

/// Renders the whole dashboard into the frame.
pub fn render<B: Backend>(frame: &mut Frame<B>, app_state: &mut AppState) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(1),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(3),
        ])
        .split(frame.size());

    frame.render_widget(
        Paragraph::new(TITLE)
            .style(Style::default().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        layout[0],
    );

    if app_state.instruments.is_none() && app_state.instruments_error.is_none() {
        Loading::new(" Online Instruments ").render(frame, layout[1]);
    } else {
        frame.render_widget(
            Paragraph::new(instruments_text(app_state))
                .block(block(
                    instruments_title(app_state),
                    app_state.instruments_error.is_some(),
                ))
                .wrap(Wrap { trim: false }),
            layout[1],
        );
    }

    frame.render_widget(
        Paragraph::new(date_text(app_state)).block(block(" Date ".to_string(), false)),
        layout[2],
    );

    let mut sessions_style = Style::default();
    if app_state.session_ids.is_empty() {
        sessions_style = sessions_style.fg(Color::DarkGray);
    }
    frame.render_widget(
        Paragraph::new(app_state.session_ids.to_string())
            .style(sessions_style)
            .block(block(" Sessions ".to_string(), false)),
        layout[3],
    );

    let log_rect = layout[4].inner(&Margin {
        vertical: 1,
        horizontal: 2,
    });
    if log_rect.width != app_state.last_known_width
        || log_rect.height != app_state.last_known_height
    {
        app_state.set_rect(log_rect);
    }

    if app_state.log.is_none() && app_state.log_error.is_none() {
        Loading::new(" Log ").render(frame, layout[4]);
        return;
    }

    let lines = app_state
        .log_lines
        .iter()
        .map(|line| return Line::from(line.to_string()))
        .collect::<Vec<Line>>();

    frame.render_widget(
        Paragraph::new(lines)
            .block(block(log_title(app_state), app_state.is_log_stale()))
            .scroll((app_state.scroll.position, 0)),
        layout[4],
    );
    frame.render_stateful_widget(
        Scrollbar::new(ScrollbarOrientation::VerticalRight),
        layout[4].inner(&Margin {
            vertical: 1,
            horizontal: 0,
        }),
        &mut app_state.scroll.scrollbar_state,
    );
}
