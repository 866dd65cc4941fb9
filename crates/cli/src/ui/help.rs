//! Help overlay.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::{popup, title_style};

const BROWSER_KEYS: &[(&str, &str)] = &[
    ("↑/k", "Move up"),
    ("↓/j", "Move down"),
    ("ctrl+u", "Half page up"),
    ("ctrl+d", "Half page down"),
    ("g / G", "Top / bottom"),
    ("←/h", "Parent directory"),
    ("→/l/o/enter", "Open directory or preview file"),
    ("d", "Download file"),
    ("u", "Upload file"),
    ("x", "Delete file"),
    ("r", "Rename file"),
    ("y", "Yank (mark) file"),
    ("p", "Paste yanked files here"),
    ("c", "Clear yanked files"),
    ("R", "Refresh listing"),
    ("?", "Toggle help"),
    ("q/ctrl+c", "Quit"),
];

const PREVIEW_KEYS: &[(&str, &str)] = &[
    ("↑/k ↓/j", "Scroll one line"),
    ("u / d", "Scroll 10 lines"),
    ("g / G", "Top / bottom"),
    ("←/h/esc", "Back to browser"),
];

pub(super) fn render(frame: &mut Frame, area: Rect) {
    let lines = help_lines();
    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2);
    let area = popup(area, 56, height);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help - press any key to close ")
        .title_style(title_style());

    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn help_lines() -> Vec<Line<'static>> {
    let heading = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![Line::styled("Browser", heading)];
    lines.extend(BROWSER_KEYS.iter().map(binding));
    lines.push(Line::default());
    lines.push(Line::styled("Preview", heading));
    lines.extend(PREVIEW_KEYS.iter().map(binding));
    lines
}

fn binding(&(keys, action): &(&'static str, &'static str)) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {keys:<14}"), title_style()),
        Span::raw(action),
    ])
}
