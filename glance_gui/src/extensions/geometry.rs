// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
use egui::{Pos2, Rect, Vec2, pos2, vec2};
use glance_core::types::{Point, Rect as CoreRect, Size};

/// Moves geometry between the core's DOM-shaped types and egui's.
pub(crate) trait ToEgui {
    type Output;

    fn to_egui(&self) -> Self::Output;
}

pub(crate) trait FromEgui<T> {
    fn from_egui(value: T) -> Self;
}

impl ToEgui for Point {
    type Output = Pos2;

    fn to_egui(&self) -> Pos2 {
        pos2(self.x, self.y)
    }
}

impl ToEgui for Size {
    type Output = Vec2;

    fn to_egui(&self) -> Vec2 {
        vec2(self.width, self.height)
    }
}

impl ToEgui for CoreRect {
    type Output = Rect;

    fn to_egui(&self) -> Rect {
        Rect::from_min_size(pos2(self.left, self.top), vec2(self.width, self.height))
    }
}

impl FromEgui<Pos2> for Point {
    fn from_egui(value: Pos2) -> Self {
        Self::new(value.x, value.y)
    }
}

impl FromEgui<Vec2> for Size {
    fn from_egui(value: Vec2) -> Self {
        Self::new(value.x, value.y)
    }
}

impl FromEgui<Rect> for CoreRect {
    fn from_egui(value: Rect) -> Self {
        Self::new(value.min.x, value.min.y, value.width(), value.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_conversion_keeps_edges() {
        let rect = CoreRect::new(10.0, 20.0, 30.0, 40.0);
        let egui_rect = rect.to_egui();
        assert_eq!(egui_rect.min, pos2(10.0, 20.0));
        assert_eq!(egui_rect.max, pos2(40.0, 60.0));
        assert_eq!(CoreRect::from_egui(egui_rect), rect);
    }

    #[test]
    fn test_point_and_size_conversion() {
        assert_eq!(Point::new(1.5, -2.0).to_egui(), pos2(1.5, -2.0));
        assert_eq!(Point::from_egui(pos2(3.0, 4.0)), Point::new(3.0, 4.0));
        assert_eq!(Size::new(1920.0, 1080.0).to_egui(), vec2(1920.0, 1080.0));
        assert_eq!(Size::from_egui(vec2(8.0, 9.0)), Size::new(8.0, 9.0));
    }
}
