// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
//! The hover badges scattered over the splash and what their popups show.
use egui::{Vec2, vec2};
use glance_core::splash::popup::{PopupPlacement, Side};
use glance_core::splash::shake::rock_offset;
use glance_core::types::Rect;

/// The badge whose art spins with the coin physics.
pub(crate) const QUARTER_ID: &str = "quarter";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BadgeArt {
    /// Decoded through the texture cache.
    Raster(&'static str),
    /// Rasterised by the egui_extras SVG loader.
    Svg(&'static str),
}

/// How a piece of art moves while the pointer is over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HoverMotion {
    Still,
    /// Tilts back, grows and lifts, as if peeling off the page.
    Peel,
    /// Rests at a slant and leans away from the viewer on hover.
    Bend,
    /// Rocks back and forth for as long as it is hovered.
    Rock,
}

/// Transform applied to art about the centre of its rect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Pose {
    pub degrees: f32,
    pub scale: Vec2,
    /// On the design canvas.
    pub offset: Vec2,
}

impl Pose {
    pub const REST: Self = Self {
        degrees: 0.0,
        scale: Vec2::splat(1.0),
        offset: Vec2::ZERO,
    };

    /// `rect` moved and scaled by this pose; rotation is left to the painter.
    pub fn apply(&self, rect: egui::Rect, canvas_scale: f32) -> egui::Rect {
        egui::Rect::from_center_size(
            rect.center() + self.offset * canvas_scale,
            rect.size() * self.scale,
        )
    }
}

const PAPERCLIP_SLANT_DEGREES: f32 = 10.0;
/// Horizontal foreshortening of a 12 degree turn away from the viewer.
const PAPERCLIP_LEAN: f32 = 0.978;

impl HoverMotion {
    /// The pose `hovered_secs` into a hover, or at rest for `None`.
    pub fn pose(self, hovered_secs: Option<f32>) -> Pose {
        match (self, hovered_secs) {
            (Self::Bend, None) => Pose {
                degrees: PAPERCLIP_SLANT_DEGREES,
                ..Pose::REST
            },
            (Self::Still, _) | (_, None) => Pose::REST,
            (Self::Peel, Some(_)) => Pose {
                degrees: -8.0,
                scale: Vec2::splat(1.28 / 1.2),
                offset: vec2(0.0, -8.64),
            },
            (Self::Bend, Some(_)) => Pose {
                degrees: PAPERCLIP_SLANT_DEGREES,
                scale: vec2(1.04 * PAPERCLIP_LEAN, 1.04),
                offset: vec2(0.0, -2.0),
            },
            (Self::Rock, Some(secs)) => {
                let frame = rock_offset(secs);
                Pose {
                    degrees: frame.degrees,
                    scale: Vec2::splat(1.04),
                    offset: vec2(frame.dx, 0.0),
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Photo {
    pub src: &'static str,
    /// Drawn height on the design canvas; width follows the image.
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Badge {
    pub id: &'static str,
    pub alt: &'static str,
    pub art: BadgeArt,
    /// Bounds on the design canvas.
    pub bounds: Rect,
    pub placement: PopupPlacement,
    pub photo: Option<Photo>,
    pub caption: &'static str,
    pub motion: HoverMotion,
}

pub(crate) static BADGES: [Badge; 7] = [
    Badge {
        id: "coffee_stain",
        alt: "Coffee Stain",
        art: BadgeArt::Raster("/optimized/coffee_stain-400.webp"),
        bounds: Rect::new(96.0, 54.0, 200.0, 200.0),
        placement: PopupPlacement::COFFEE_STAIN,
        photo: Some(Photo {
            src: "/optimized/white_sands-800.JPG",
            height: 200.0,
        }),
        caption: "White Sands National Park",
        motion: HoverMotion::Still,
    },
    Badge {
        id: "stamp",
        alt: "Stamp",
        art: BadgeArt::Raster("/optimized/stamp-400.webp"),
        bounds: Rect::new(384.0, 54.0, 130.0, 162.0),
        placement: PopupPlacement::stamp(Side::Right),
        photo: Some(Photo {
            src: "/optimized/pose-800.jpg",
            height: 302.0,
        }),
        caption: "Glacier National Park (2025)",
        motion: HoverMotion::Peel,
    },
    Badge {
        id: "paperclip",
        alt: "Paperclip",
        art: BadgeArt::Raster("/optimized/paperclip-400.webp"),
        bounds: Rect::new(154.0, 270.0, 90.0, 180.0),
        placement: PopupPlacement::PAPERCLIP_RIGHT,
        photo: Some(Photo {
            src: "/optimized/banff-800.JPG",
            height: 160.0,
        }),
        caption: "Banff National Park (2024)",
        motion: HoverMotion::Bend,
    },
    Badge {
        id: QUARTER_ID,
        alt: "Quarter",
        art: BadgeArt::Raster("/quarter.webp"),
        bounds: Rect::new(422.0, 432.0, 162.0, 162.0),
        placement: PopupPlacement::QUARTER,
        photo: Some(Photo {
            src: "/mountains.jpg",
            height: 300.0,
        }),
        caption: "Mt. Olympus! (2023)",
        motion: HoverMotion::Still,
    },
    Badge {
        id: "gecko",
        alt: "Gecko Head",
        art: BadgeArt::Raster("/gecko.png"),
        bounds: Rect::new(0.0, 400.0, 120.0, 120.0),
        placement: PopupPlacement::SVG_BADGE,
        photo: Some(Photo {
            src: "/my_gecko.jpg",
            height: 240.0,
        }),
        caption: "",
        motion: HoverMotion::Still,
    },
    Badge {
        id: "rice_ring",
        alt: "Rice Ring",
        art: BadgeArt::Svg("/rice_ring.svg"),
        bounds: Rect::new(1344.0, 454.0, 192.0, 192.0),
        placement: PopupPlacement::SVG_BADGE,
        photo: None,
        caption: "Attended Rice University (2020-2024)\n\
                  BS in Electrical Engineering (magna cum laude)\n\
                  BA in Philosophy (cum laude)\n\
                  Undergraduate Researcher in MAHI Lab",
        motion: HoverMotion::Still,
    },
    Badge {
        id: "ucsb_flag",
        alt: "UCSB Flag",
        art: BadgeArt::Svg("/ucsb_flag.svg"),
        bounds: Rect::new(1594.0, 432.0, 230.0, 230.0),
        placement: PopupPlacement::RightOf {
            gap: 16.0,
            dy: 96.0,
        },
        photo: None,
        caption: "Attending UCSB (2024-)\n\
                  Pursuing MS/PhD in Electrical & Computer Engineering\n\
                  Researcher in Ikuko Smith Lab\n\
                  Focus on audiovisual processing in mouse model",
        motion: HoverMotion::Still,
    },
];

pub(crate) fn raster_paths() -> impl Iterator<Item = &'static str> {
    BADGES.iter().flat_map(|badge| {
        let art = match badge.art {
            BadgeArt::Raster(src) => Some(src),
            BadgeArt::Svg(_) => None,
        };
        art.into_iter().chain(badge.photo.map(|photo| photo.src))
    })
}
