//! Screen layout calculations for the story reader TUI

use ratatui::layout::{Constraint, Layout, Rect};

/// Layout for the reader screen.
///
/// The content row is split into the story column and an optional history
/// sidebar; the story column stacks the segment text over the choice panel.
pub struct ReaderLayout {
    pub title_area: Rect,
    pub banner_area: Option<Rect>,
    pub segment_area: Rect,
    pub panel_area: Rect,
    pub history_area: Option<Rect>,
    pub status_area: Rect,
}

impl ReaderLayout {
    pub fn calculate(area: Rect, show_history: bool, has_banner: bool, panel_rows: u16) -> Self {
        let mut constraints = vec![Constraint::Length(1)];
        if has_banner {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Min(5));
        constraints.push(Constraint::Length(1));
        let rows = Layout::vertical(constraints).split(area);

        let title_area = rows[0];
        let (banner_area, content, status_area) = if has_banner {
            (Some(rows[1]), rows[2], rows[3])
        } else {
            (None, rows[1], rows[2])
        };

        let (main, history_area) = if show_history {
            let cols =
                Layout::horizontal([Constraint::Min(40), Constraint::Length(32)]).split(content);
            (cols[0], Some(cols[1]))
        } else {
            (content, None)
        };

        let body =
            Layout::vertical([Constraint::Min(3), Constraint::Length(panel_rows)]).split(main);

        Self {
            title_area,
            banner_area,
            segment_area: body[0],
            panel_area: body[1],
            history_area,
            status_area,
        }
    }
}

/// Layout for the story picker: title bar, list, status line.
pub struct PickerLayout {
    pub title_area: Rect,
    pub list_area: Rect,
    pub status_area: Rect,
}

impl PickerLayout {
    pub fn calculate(area: Rect) -> Self {
        let rows = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

        Self {
            title_area: rows[0],
            list_area: rows[1],
            status_area: rows[2],
        }
    }
}

/// Layout for the record view: title bar, body, status line.
pub struct RecordLayout {
    pub title_area: Rect,
    pub body_area: Rect,
    pub status_area: Rect,
}

impl RecordLayout {
    pub fn calculate(area: Rect) -> Self {
        let rows = Layout::vertical([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area);

        Self {
            title_area: rows[0],
            body_area: rows[1],
            status_area: rows[2],
        }
    }
}

/// A fixed-size rectangle centered in `area`, clamped to fit.
pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_layout_accounts_for_banner() {
        let area = Rect::new(0, 0, 100, 40);
        let without = ReaderLayout::calculate(area, false, false, 6);
        assert!(without.banner_area.is_none());

        let with = ReaderLayout::calculate(area, false, true, 6);
        let banner = with.banner_area.unwrap();
        assert_eq!(banner.y, 1);
        assert_eq!(with.segment_area.y, 2);
    }

    #[test]
    fn test_reader_layout_sidebar_toggles() {
        let area = Rect::new(0, 0, 100, 40);
        let hidden = ReaderLayout::calculate(area, false, false, 6);
        assert!(hidden.history_area.is_none());
        assert_eq!(hidden.segment_area.width, 100);

        let shown = ReaderLayout::calculate(area, true, false, 6);
        let sidebar = shown.history_area.unwrap();
        assert_eq!(sidebar.width, 32);
        assert_eq!(shown.segment_area.width, 68);
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 40, 10);
        let popup = centered_rect_fixed(60, 20, area);
        assert!(popup.width <= area.width);
        assert!(popup.height <= area.height);
        assert_eq!(popup.x, 0);
    }
}
