// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
//! Where badge popups appear relative to the element that triggered them.
use crate::types::{Point, Rect, Size};

/// Read access to on-screen layout, supplied by whatever draws the splash.
pub trait ViewportQuery {
    /// Bounding box of a named element in viewport coordinates.
    fn element_rect(&self, id: &str) -> Option<Rect>;

    fn viewport_size(&self) -> Size;

    fn scroll_offset(&self) -> Point {
        Point::ZERO
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PopupPlacement {
    /// Top-aligned, `gap` past the right edge.
    RightOf { gap: f32, dy: f32 },
    /// `gap` past the right edge, top `above_centre` above the element's centre.
    RightCentred { gap: f32, above_centre: f32 },
    /// Mirror of `RightCentred` for a popup of known width.
    LeftCentred {
        gap: f32,
        popup_width: f32,
        above_centre: f32,
    },
    /// Gap, width and rise are fractions of the viewport; the result is in
    /// document coordinates (scroll included).
    ViewportRelative {
        side: Side,
        gap_frac: f32,
        width_frac: f32,
        above_frac: f32,
    },
}

impl PopupPlacement {
    pub const SVG_BADGE: Self = Self::RightOf { gap: 16.0, dy: 0.0 };
    pub const QUARTER: Self = Self::RightCentred {
        gap: 24.0,
        above_centre: 220.0,
    };
    pub const COFFEE_STAIN: Self = Self::RightCentred {
        gap: 24.0,
        above_centre: 100.0,
    };
    pub const PAPERCLIP_RIGHT: Self = Self::RightCentred {
        gap: 24.0,
        above_centre: 60.0,
    };
    pub const PAPERCLIP_LEFT: Self = Self::LeftCentred {
        gap: 24.0,
        popup_width: 216.0,
        above_centre: 60.0,
    };

    pub const fn stamp(side: Side) -> Self {
        Self::ViewportRelative {
            side,
            gap_frac: 0.01,
            width_frac: 0.3,
            above_frac: 0.2,
        }
    }

    /// Top-left corner of the popup for an element at `rect`.
    pub fn position(&self, rect: Rect, viewport: Size, scroll: Point) -> Point {
        match *self {
            Self::RightOf { gap, dy } => Point::new(rect.right() + gap, rect.top + dy),
            Self::RightCentred { gap, above_centre } => {
                Point::new(rect.right() + gap, rect.centre_y() - above_centre)
            }
            Self::LeftCentred {
                gap,
                popup_width,
                above_centre,
            } => Point::new(
                rect.left - popup_width - gap,
                rect.centre_y() - above_centre,
            ),
            Self::ViewportRelative {
                side,
                gap_frac,
                width_frac,
                above_frac,
            } => {
                let gap = viewport.width * gap_frac;
                let left = match side {
                    Side::Left => rect.left - viewport.width * width_frac - gap,
                    Side::Right => rect.right() + gap,
                };
                Point::new(
                    scroll.x + left,
                    scroll.y + rect.centre_y() - viewport.height * above_frac,
                )
            }
        }
    }

    /// Width the popup must be drawn at for the position to line up, if fixed.
    pub fn popup_width(&self, viewport: Size) -> Option<f32> {
        match *self {
            Self::LeftCentred { popup_width, .. } => Some(popup_width),
            Self::ViewportRelative { width_frac, .. } => Some(viewport.width * width_frac),
            Self::RightOf { .. } | Self::RightCentred { .. } => None,
        }
    }
}

/// A popup position taken once per hover.
///
/// The position is computed on hover-enter and kept until hover-leave; it does
/// not follow the element if the layout changes in between.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupAnchor {
    element_id: String,
    placement: PopupPlacement,
    hovered: bool,
    position: Option<Point>,
}

impl PopupAnchor {
    pub fn new(element_id: impl Into<String>, placement: PopupPlacement) -> Self {
        Self {
            element_id: element_id.into(),
            placement,
            hovered: false,
            position: None,
        }
    }

    pub fn hover_enter(&mut self, query: &impl ViewportQuery) {
        self.hovered = true;
        self.position = query.element_rect(&self.element_id).map(|rect| {
            self.placement
                .position(rect, query.viewport_size(), query.scroll_offset())
        });
    }

    pub fn hover_leave(&mut self) {
        self.hovered = false;
        self.position = None;
    }

    /// Feeds the current hover state, reacting only to its edges.
    pub fn update(&mut self, hovered: bool, query: &impl ViewportQuery) -> Option<Point> {
        match (self.hovered, hovered) {
            (false, true) => self.hover_enter(query),
            (true, false) => self.hover_leave(),
            _ => {}
        }
        self.position
    }

    pub fn position(&self) -> Option<Point> {
        self.position
    }
}
