// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
use crate::types::{Point, Size};

/// The splash is laid out on this canvas and scaled to fit the window.
pub const DESIGN_CANVAS: Size = Size::new(1920.0, 1080.0);

/// Uniform scale that fits the design canvas inside `viewport`.
pub fn splash_scale(viewport: Size) -> f32 {
    (viewport.width / DESIGN_CANVAS.width).min(viewport.height / DESIGN_CANVAS.height)
}

/// Top-left corner of the scaled canvas when centred in `viewport`.
pub fn canvas_origin(viewport: Size) -> Point {
    let scale = splash_scale(viewport);
    Point::new(
        (viewport.width - DESIGN_CANVAS.width * scale) / 2.0,
        (viewport.height - DESIGN_CANVAS.height * scale) / 2.0,
    )
}

/// Maps a point on the design canvas to viewport coordinates.
pub fn to_viewport(design: Point, viewport: Size) -> Point {
    let scale = splash_scale(viewport);
    let origin = canvas_origin(viewport);
    Point::new(origin.x + design.x * scale, origin.y + design.y * scale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_fits_the_tighter_axis() {
        assert_eq!(splash_scale(Size::new(1920.0, 1080.0)), 1.0);
        assert_eq!(splash_scale(Size::new(960.0, 1080.0)), 0.5);
        assert_eq!(splash_scale(Size::new(3840.0, 1080.0)), 1.0);
    }

    #[test]
    fn test_canvas_is_letterboxed() {
        let viewport = Size::new(3840.0, 1080.0);
        assert_eq!(canvas_origin(viewport), Point::new(960.0, 0.0));
        assert_eq!(
            to_viewport(Point::new(100.0, 50.0), viewport),
            Point::new(1060.0, 50.0)
        );

        let viewport = Size::new(960.0, 1080.0);
        assert_eq!(canvas_origin(viewport), Point::new(0.0, 270.0));
        assert_eq!(
            to_viewport(Point::new(1920.0, 1080.0), viewport),
            Point::new(960.0, 810.0)
        );
    }
}
