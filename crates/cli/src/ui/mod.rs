//! Rendering. Pure functions of [`NavigationState`].

mod browser;
mod dialogs;
mod help;
mod preview;

use jiff::Timestamp;
use jiff::tz::TimeZone;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};

use crate::app::{NavigationState, ViewMode};
use crate::dispatch::DirStats;

/// Placeholder shown while a directory stat is still being computed.
pub const PENDING: &str = "...";

/// Draw the whole screen for the current state.
pub fn render(frame: &mut Frame, state: &NavigationState) {
    let area = frame.area();

    match state.mode {
        ViewMode::Preview => preview::render(frame, area, state),
        ViewMode::Upload => dialogs::render_picker(frame, area, state),
        ViewMode::Browser => browser::render(frame, area, state),
        ViewMode::Help => {
            browser::render(frame, area, state);
            help::render(frame, area);
        }
        ViewMode::Rename => {
            browser::render(frame, area, state);
            dialogs::render_rename(frame, area, state);
        }
        ViewMode::Confirm => {
            browser::render(frame, area, state);
            dialogs::render_confirm(frame, area, state);
        }
    }
}

/// Split the screen into title, body, position, notice and help rows.
///
/// The body gets one blank row above it; together with its borders and
/// header the chrome adds up to [`crate::app::scroll::CHROME_ROWS`].
struct Screen {
    title: Rect,
    body: Rect,
    position: Rect,
    notice: Rect,
    help: Rect,
}

impl Screen {
    fn new(area: Rect) -> Self {
        let [title, _, body, position, notice, help] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        Self {
            title,
            body,
            position,
            notice,
            help,
        }
    }
}

fn title_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Popup of at most `width` x `height`, centered in `area`.
fn popup(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

/// Format a byte size in human-readable form.
pub fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Format a timestamp in the local time zone.
pub fn format_time(ts: Timestamp) -> String {
    format_time_in(ts, TimeZone::system())
}

fn format_time_in(ts: Timestamp, tz: TimeZone) -> String {
    ts.to_zoned(tz).strftime("%Y-%m-%d %H:%M").to_string()
}

/// Size column for a directory.
pub fn dir_size_cell(stats: Option<&DirStats>) -> String {
    match stats {
        None => PENDING.to_string(),
        Some(s) if s.size_timed_out => "? B".to_string(),
        Some(s) => format_size(s.size),
    }
}

/// Date column for a directory.
pub fn dir_date_cell(stats: Option<&DirStats>) -> String {
    match stats {
        None => PENDING.to_string(),
        Some(s) if s.date_timed_out => "N/A".to_string(),
        Some(s) => s.last_modified.map(format_time).unwrap_or_else(|| "-".into()),
    }
}

/// `(start-end of total)` for a window over a list.
pub fn range_indicator(scroll: usize, visible: usize, total: usize) -> String {
    if total == 0 {
        return "(0 of 0)".to_string();
    }
    let start = scroll.min(total - 1) + 1;
    let end = (scroll + visible).min(total);
    format!("({start}-{end} of {total})")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(size_timed_out: bool, date_timed_out: bool) -> DirStats {
        DirStats {
            size: 3 * 1024,
            size_timed_out,
            last_modified: Some(Timestamp::from_second(1_700_000_000).unwrap()),
            date_timed_out,
        }
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(0), "0 B");
        let formatted = format_size(1536);
        assert!(formatted.starts_with("1.5") && formatted.ends_with("KiB"));
    }

    #[test]
    fn test_format_time_in_utc() {
        let ts = Timestamp::from_second(1_700_000_000).unwrap();
        assert_eq!(format_time_in(ts, TimeZone::UTC), "2023-11-14 22:13");
    }

    #[test]
    fn test_dir_cells_pending() {
        assert_eq!(dir_size_cell(None), PENDING);
        assert_eq!(dir_date_cell(None), PENDING);
    }

    #[test]
    fn test_dir_cells_timed_out() {
        let s = stats(true, true);
        assert_eq!(dir_size_cell(Some(&s)), "? B");
        assert_eq!(dir_date_cell(Some(&s)), "N/A");
    }

    #[test]
    fn test_dir_cells_resolved() {
        let s = stats(false, false);
        let size = dir_size_cell(Some(&s));
        assert!(size.starts_with('3') && size.ends_with("KiB"));
        assert_ne!(dir_date_cell(Some(&s)), "N/A");

        let empty = DirStats {
            size: 0,
            size_timed_out: false,
            last_modified: None,
            date_timed_out: false,
        };
        assert_eq!(dir_date_cell(Some(&empty)), "-");
    }

    #[test]
    fn test_range_indicator() {
        assert_eq!(range_indicator(0, 20, 143), "(1-20 of 143)");
        assert_eq!(range_indicator(130, 20, 143), "(131-143 of 143)");
        assert_eq!(range_indicator(0, 20, 3), "(1-3 of 3)");
        assert_eq!(range_indicator(0, 20, 0), "(0 of 0)");
    }
}
