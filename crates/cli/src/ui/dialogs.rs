//! Rename and confirm popups, and the upload file picker.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use s4_core::path::base_name;

use super::browser::notice_line;
use super::{Screen, dim, format_size, popup, range_indicator, title_style};
use crate::app::NavigationState;

pub(super) fn render_rename(frame: &mut Frame, area: Rect, state: &NavigationState) {
    let Some(dialog) = &state.rename else {
        return;
    };
    let area = popup(area, 60, 6);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" Rename '{}' ", base_name(&dialog.key)))
        .title_style(title_style());
    let inner = block.inner(area);

    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    let [input_row, notice_row, hint_row] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(inner);

    let (before, after) = dialog.input.split_at_cursor();
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("> ", title_style()),
            Span::raw(before.to_string()),
            Span::raw(after.to_string()),
        ])),
        input_row,
    );
    let offset = u16::try_from(before.chars().count() + 2).unwrap_or(u16::MAX);
    frame.set_cursor_position(Position::new(
        input_row.x.saturating_add(offset).min(input_row.right().saturating_sub(1)),
        input_row.y,
    ));

    frame.render_widget(
        Paragraph::new(notice_line(state.notice.as_ref())),
        notice_row,
    );
    frame.render_widget(
        Paragraph::new("enter confirm  esc cancel  ctrl+u clear  ctrl+w delete word").style(dim()),
        hint_row,
    );
}

pub(super) fn render_confirm(frame: &mut Frame, area: Rect, state: &NavigationState) {
    let Some(action) = &state.confirm else {
        return;
    };
    let area = popup(area, 60, 5);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Confirm ")
        .title_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let lines = vec![
        Line::raw(action.prompt()),
        Line::default(),
        Line::styled("[y] yes   [n] no", dim()),
    ];

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

pub(super) fn render_picker(frame: &mut Frame, area: Rect, state: &NavigationState) {
    let Some(picker) = &state.picker else {
        return;
    };
    let screen = Screen::new(area);
    let visible = state.visible_rows();

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(" Upload to ", title_style()),
            Span::raw(format!("{}/{}", state.bucket, state.dir)),
        ])),
        screen.title,
    );

    let lines: Vec<Line> = picker
        .entries
        .iter()
        .enumerate()
        .skip(picker.scroll)
        .take(visible)
        .map(|(index, entry)| {
            let text = if entry.is_dir {
                format!("{}/", entry.name)
            } else {
                format!("{:<40} {:>12}", entry.name, format_size(entry.size))
            };
            let style = match (index == picker.cursor, entry.is_dir) {
                (true, _) => Style::default().add_modifier(Modifier::REVERSED),
                (false, true) => Style::default().fg(Color::Blue),
                (false, false) => Style::default(),
            };
            Line::styled(text, style)
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", picker.path.display()));
    frame.render_widget(Paragraph::new(lines).block(block), screen.body);

    frame.render_widget(
        Paragraph::new(range_indicator(picker.scroll, visible, picker.entries.len())).style(dim()),
        screen.position,
    );
    frame.render_widget(
        Paragraph::new(notice_line(state.notice.as_ref())),
        screen.notice,
    );
    frame.render_widget(
        Paragraph::new("↑/↓ move  enter open/select  ←/h parent  esc cancel").style(dim()),
        screen.help,
    );
}
