//! Text preview pane.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use s4_core::path::base_name;

use super::browser::notice_line;
use super::{Screen, dim, title_style};
use crate::app::{NavigationState, Preview};

const HELP_LINE: &str = "↑/↓ scroll  u/d page  g/G top/bottom  ←/esc back  q quit";

pub(super) fn render(frame: &mut Frame, area: Rect, state: &NavigationState) {
    let Some(preview) = &state.preview else {
        return;
    };
    let screen = Screen::new(area);
    let visible = state.visible_rows();

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!(" s4 {}", state.bucket), title_style()),
            Span::raw(format!("  /{}", preview.key)),
        ])),
        screen.title,
    );

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", base_name(&preview.key)));
    frame.render_widget(
        Paragraph::new(numbered_lines(preview, visible)).block(block),
        screen.body,
    );

    frame.render_widget(
        Paragraph::new(position(preview, visible)).style(dim()),
        screen.position,
    );
    frame.render_widget(
        Paragraph::new(notice_line(state.notice.as_ref())),
        screen.notice,
    );
    frame.render_widget(Paragraph::new(HELP_LINE).style(dim()), screen.help);
}

/// Visible window of the preview with 1-based line numbers.
fn numbered_lines(preview: &Preview, visible: usize) -> Vec<Line<'static>> {
    preview
        .lines
        .iter()
        .enumerate()
        .skip(preview.scroll)
        .take(visible)
        .map(|(index, text)| {
            Line::from(vec![
                Span::styled(format!("{:4} │ ", index + 1), dim()),
                Span::raw(text.clone()),
            ])
        })
        .collect()
}

/// `[Showing lines a-b of n]`
fn position(preview: &Preview, visible: usize) -> String {
    let total = preview.lines.len();
    let first = (preview.scroll + 1).min(total);
    let last = (preview.scroll + visible).min(total);
    format!("[Showing lines {first}-{last} of {total}]")
}
