// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
use crate::extensions::geometry::FromEgui as _;
use egui::ahash::HashMap;
use glance_core::splash::popup::ViewportQuery;
use glance_core::types::{Rect, Size};

/// Element rects recorded while the splash is drawn, answered back to popup anchors.
///
/// The window never scrolls, so the scroll offset stays at zero.
#[derive(Debug, Default)]
pub(crate) struct FrameViewport {
    rects: HashMap<&'static str, Rect>,
    size: Size,
}

impl FrameViewport {
    pub(crate) fn begin_frame(&mut self, screen: egui::Rect) {
        self.rects.clear();
        self.size = Size::from_egui(screen.size());
    }

    pub(crate) fn record(&mut self, id: &'static str, rect: egui::Rect) {
        self.rects.insert(id, Rect::from_egui(rect));
    }
}

impl ViewportQuery for FrameViewport {
    fn element_rect(&self, id: &str) -> Option<Rect> {
        self.rects.get(id).copied()
    }

    fn viewport_size(&self) -> Size {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::{pos2, vec2};
    use glance_core::splash::popup::{PopupAnchor, PopupPlacement};
    use glance_core::types::Point;

    #[test]
    fn test_recorded_rect_positions_popup() {
        let mut viewport = FrameViewport::default();
        viewport.begin_frame(egui::Rect::from_min_size(pos2(0.0, 0.0), vec2(1000.0, 800.0)));
        viewport.record("coffee", egui::Rect::from_min_size(pos2(100.0, 300.0), vec2(80.0, 40.0)));

        let mut anchor = PopupAnchor::new("coffee", PopupPlacement::COFFEE_STAIN);
        assert_eq!(anchor.update(true, &viewport), Some(Point::new(204.0, 220.0)));
        assert_eq!(viewport.viewport_size(), Size::new(1000.0, 800.0));
    }

    #[test]
    fn test_begin_frame_forgets_old_rects() {
        let mut viewport = FrameViewport::default();
        viewport.record("stamp", egui::Rect::from_min_size(pos2(0.0, 0.0), vec2(1.0, 1.0)));
        viewport.begin_frame(egui::Rect::from_min_size(pos2(0.0, 0.0), vec2(10.0, 10.0)));
        assert_eq!(viewport.element_rect("stamp"), None);
    }
}
