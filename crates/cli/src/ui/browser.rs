//! Main bucket listing.

use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table};

use s4_core::Entry;

use super::{Screen, dim, dir_date_cell, dir_size_cell, format_time, range_indicator, title_style};
use crate::app::{NavigationState, Notice};

const HELP_LINE: &str =
    "↑/↓ move  ←/→ navigate  d download  u upload  x delete  y yank  p paste  r rename  ? help  q quit";

pub(super) fn render(frame: &mut Frame, area: Rect, state: &NavigationState) {
    let screen = Screen::new(area);

    frame.render_widget(Paragraph::new(title(state)), screen.title);
    render_table(frame, screen.body, state);

    let total = state.entries.len();
    let position = if state.loading {
        "Loading...".to_string()
    } else if total > state.visible_rows() {
        range_indicator(state.scroll, state.visible_rows(), total)
    } else {
        format!("{total} item(s)")
    };
    frame.render_widget(Paragraph::new(position).style(dim()), screen.position);

    frame.render_widget(
        Paragraph::new(notice_line(state.notice.as_ref())),
        screen.notice,
    );
    frame.render_widget(Paragraph::new(HELP_LINE).style(dim()), screen.help);
}

fn title(state: &NavigationState) -> Line<'static> {
    let mut spans = vec![
        Span::styled(format!(" s4 {}", state.bucket), title_style()),
        Span::raw(format!("  /{}", state.dir)),
    ];
    if !state.marked.is_empty() {
        spans.push(Span::styled(
            format!("  [{} yanked]", state.marked.len()),
            Style::default().fg(Color::Yellow),
        ));
    }
    Line::from(spans)
}

pub(super) fn notice_line(notice: Option<&Notice>) -> Line<'static> {
    match notice {
        Some(Notice::Error(message)) => Line::styled(
            format!(" Error: {message}"),
            Style::default().fg(Color::Red),
        ),
        Some(Notice::Status(message)) => {
            Line::styled(format!(" {message}"), Style::default().fg(Color::Green))
        }
        None => Line::default(),
    }
}

fn render_table(frame: &mut Frame, area: Rect, state: &NavigationState) {
    let visible = state.visible_rows();
    let rows = state
        .entries
        .iter()
        .enumerate()
        .skip(state.scroll)
        .take(visible)
        .map(|(index, entry)| {
            let marked = state.is_marked(entry);
            let row = entry_row(entry, marked, state);
            if index == state.cursor {
                row.style(Style::default().add_modifier(Modifier::REVERSED))
            } else if marked {
                row.style(Style::default().fg(Color::Yellow))
            } else {
                row
            }
        });

    let header = Row::new(["", "Name", "Size", "Modified"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let mut block = Block::default().borders(Borders::ALL);
    if !state.loading && state.entries.is_empty() {
        block = block.title(" No objects ");
    }

    let table = Table::new(
        rows,
        [
            Constraint::Length(1),
            Constraint::Min(20),
            Constraint::Length(12),
            Constraint::Length(16),
        ],
    )
    .header(header)
    .block(block);

    frame.render_widget(table, area);
}

fn entry_row(entry: &Entry, marked: bool, state: &NavigationState) -> Row<'static> {
    let mark = if marked { "*" } else { " " };

    if entry.is_dir {
        let stats = state.stats.get(&entry.key);
        Row::new([
            mark.to_string(),
            format!("{}/", entry.name()),
            dir_size_cell(stats),
            dir_date_cell(stats),
        ])
        .style(Style::default().fg(Color::Blue))
    } else {
        Row::new([
            mark.to_string(),
            entry.name().to_string(),
            entry.size_human(),
            entry.last_modified.map(format_time).unwrap_or_default(),
        ])
    }
}
