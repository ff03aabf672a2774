// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
use crate::chess::ChessStats;
use crate::splash::timer::Timer;
use std::time::{Duration, Instant};
use strum_macros::{Display, EnumIter};

pub const SHAKE_DURATION: Duration = Duration::from_millis(400);

/// The items the bag cycles through, in click order.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy, EnumIter, Display)]
pub enum BagItemKind {
    Tamagotchi,
    Camera,
    Chess,
}

impl BagItemKind {
    pub fn item(self) -> &'static BagItem {
        &BAG_ITEMS[self as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupContent {
    Text(&'static str),
    /// Live ratings, fetched when the popup is first shown.
    ChessStats,
}

impl PopupContent {
    pub fn needs_remote(&self) -> bool {
        matches!(self, Self::ChessStats)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BagItem {
    pub kind: BagItemKind,
    pub src: &'static str,
    pub alt: &'static str,
    pub link: Option<&'static str>,
    pub popup: PopupContent,
}

pub static BAG_ITEMS: [BagItem; 3] = [
    BagItem {
        kind: BagItemKind::Tamagotchi,
        src: "/tamogotchi.svg",
        alt: "Tamagotchi",
        link: None,
        popup: PopupContent::Text(
            "This is my Tamagotchi! It kept me company during long study sessions.",
        ),
    },
    BagItem {
        kind: BagItemKind::Camera,
        src: "/camera.svg",
        alt: "Camera",
        link: Some("https://www.instagram.com/gabetakesphotos111/"),
        popup: PopupContent::Text("Some photos I took!\nClick to see more."),
    },
    BagItem {
        kind: BagItemKind::Chess,
        src: "/chess.svg",
        alt: "Chess",
        link: None,
        popup: PopupContent::ChessStats,
    },
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CycleState {
    /// Nothing has been pulled out of the bag yet.
    #[default]
    Idle,
    Showing(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RemoteData {
    #[default]
    NotRequested,
    Loading,
    Ready(ChessStats),
    Failed(String),
}

/// Identifies the selection a fetch was started for. A response is only
/// accepted while its generation is still current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub item: BagItemKind,
}

/// Click-to-cycle state for the tote bag and the popup of the item on show.
#[derive(Debug, Default)]
pub struct BagCycler {
    state: CycleState,
    shake: Timer,
    generation: u64,
    remote: RemoteData,
    bag_hovered: bool,
    item_hovered: bool,
    popup_hovered: bool,
}

impl BagCycler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn current(&self) -> Option<&'static BagItem> {
        match self.state {
            CycleState::Idle => None,
            CycleState::Showing(index) => BAG_ITEMS.get(index),
        }
    }

    /// Advances to the next item and shakes the bag.
    ///
    /// Any data fetched for the previous selection is dropped, and responses
    /// still in flight for it will be discarded.
    pub fn click(&mut self, now: Instant) {
        self.state = match self.state {
            CycleState::Idle => CycleState::Showing(0),
            CycleState::Showing(index) => CycleState::Showing((index + 1) % BAG_ITEMS.len()),
        };
        self.shake.start(now, SHAKE_DURATION);
        self.generation = self.generation.wrapping_add(1);
        self.remote = RemoteData::NotRequested;
    }

    /// Expires the shake. Call once per frame.
    pub fn tick(&mut self, now: Instant) {
        self.shake.poll(now);
    }

    pub fn is_shaking(&self, now: Instant) -> bool {
        self.shake.is_active(now)
    }

    pub fn shake_progress(&self, now: Instant) -> Option<f32> {
        self.shake.progress(now)
    }

    /// Hovering the bag itself only dims it; it never opens the popup.
    pub fn set_bag_hovered(&mut self, hovered: bool) {
        self.bag_hovered = hovered;
    }

    pub fn bag_hovered(&self) -> bool {
        self.bag_hovered
    }

    pub fn set_item_hovered(&mut self, hovered: bool) {
        self.item_hovered = hovered;
    }

    pub fn set_popup_hovered(&mut self, hovered: bool) {
        self.popup_hovered = hovered;
    }

    /// The popup stays open while either the item or the popup itself is hovered.
    pub fn popup_visible(&self) -> bool {
        self.current().is_some() && (self.item_hovered || self.popup_hovered)
    }

    /// Starts a fetch for the shown item if it needs remote data and none has
    /// been requested for the current selection.
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        let item = self.current()?;
        if !item.popup.needs_remote() || self.remote != RemoteData::NotRequested {
            return None;
        }
        self.remote = RemoteData::Loading;
        Some(FetchTicket {
            generation: self.generation,
            item: item.kind,
        })
    }

    /// Stores a fetch result. Returns false and drops it when the selection
    /// has changed since the ticket was issued.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: Result<ChessStats, String>) -> bool {
        if ticket.generation != self.generation {
            log::debug!(
                "Discarding stale {} data (generation {} != {})",
                ticket.item,
                ticket.generation,
                self.generation
            );
            return false;
        }
        self.remote = match result {
            Ok(stats) => RemoteData::Ready(stats),
            Err(message) => RemoteData::Failed(message),
        };
        true
    }

    pub fn remote(&self) -> &RemoteData {
        &self.remote
    }
}
