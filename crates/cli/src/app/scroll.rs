//! Viewport arithmetic for the entry lists and the preview pane.

/// Rows taken by the title, header, status and help lines.
pub const CHROME_ROWS: u16 = 8;

/// Smallest list window, however short the terminal.
pub const MIN_VISIBLE_ROWS: usize = 5;

/// Rows kept between the cursor and the window edge.
pub const SCROLL_MARGIN: usize = 2;

/// Lines moved by a preview page step.
pub const PREVIEW_PAGE: usize = 10;

/// List rows visible for a terminal of the given height.
pub fn visible_rows(terminal_height: u16) -> usize {
    usize::from(terminal_height.saturating_sub(CHROME_ROWS)).max(MIN_VISIBLE_ROWS)
}

/// Half-page step for ctrl+u / ctrl+d.
pub fn half_page(visible: usize) -> usize {
    (visible / 2).max(1)
}

/// Scroll offset that keeps `cursor` inside the window with the margin applied.
///
/// Moves the window by the smallest amount needed, then clamps it so it never
/// extends past the end of the list.
pub fn follow_cursor(cursor: usize, scroll: usize, visible: usize, len: usize) -> usize {
    if len == 0 || visible == 0 {
        return 0;
    }

    // A margin wider than half the window would make it jitter
    let margin = SCROLL_MARGIN.min(visible.saturating_sub(1) / 2);
    let mut scroll = scroll;

    if cursor + margin >= scroll + visible {
        scroll = cursor + margin + 1 - visible;
    }
    if cursor < scroll + margin {
        scroll = cursor.saturating_sub(margin);
    }

    scroll.min(len.saturating_sub(visible))
}

/// Largest valid preview scroll offset.
pub fn max_preview_scroll(total_lines: usize, visible: usize) -> usize {
    total_lines.saturating_sub(visible)
}

/// Move `cursor` by `delta`, clamped into `[0, len - 1]` (0 for an empty list).
pub fn step_cursor(cursor: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    cursor.saturating_add_signed(delta).min(len - 1)
}
