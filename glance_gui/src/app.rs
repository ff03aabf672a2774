// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
mod badges;
mod splash_ui;
mod viewport;

use badges::BADGES;
use egui::ahash::{HashMap, HashSet};
use egui::{ColorImage, Context, TextureOptions};
use egui_notify::{Anchor, Toasts};
use futures_channel::{mpsc, oneshot};
use glance_core::album::Album;
use glance_core::book::Book;
use glance_core::chess::{ChessStats, fetch_chess_stats};
use glance_core::config::SplashConfig;
use glance_core::file_io::{
    load_albums, load_books_or_fallback, load_image_bytes, resolve_web_path,
};
use glance_core::splash::bag::{BagCycler, FetchTicket};
use glance_core::splash::carousel::Carousel;
use glance_core::splash::gallery::{album_preload_paths, book_preload_paths};
use glance_core::splash::popup::{PopupAnchor, PopupPlacement};
use glance_core::splash::spin::{FixedStep, RecordSpin, SpinState};
use glance_core::splash::title::{AnswerPrompt, TitleSequence};
use image::RgbaImage;
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Runtime;
use viewport::FrameViewport;

type ImageResult = (String, Result<Arc<RgbaImage>, String>);
type ChessResult = (FetchTicket, Result<ChessStats, String>);

const BAG_ITEM_ID: &str = "bag_item";
/// Flush against the item so the pointer can cross onto the popup.
const BAG_POPUP_PLACEMENT: PopupPlacement = PopupPlacement::RightOf { gap: 0.0, dy: 0.0 };

pub struct GlanceSplash {
    config: SplashConfig,
    tokio_runtime: Arc<Runtime>,
    http: reqwest::Client,

    albums: Carousel<Album>,
    albums_receiver: Option<oneshot::Receiver<Result<Vec<Album>, String>>>,
    books: Carousel<Book>,
    books_receiver: Option<oneshot::Receiver<Vec<Book>>>,

    texture_cache: HashMap<String, egui::TextureHandle>,
    images_in_flight: HashSet<String>,
    image_sender: mpsc::UnboundedSender<ImageResult>,
    image_receiver: mpsc::UnboundedReceiver<ImageResult>,

    bag: BagCycler,
    bag_popup: PopupAnchor,
    chess_sender: mpsc::UnboundedSender<ChessResult>,
    chess_receiver: mpsc::UnboundedReceiver<ChessResult>,

    coin: SpinState,
    coin_clock: FixedStep,
    record: RecordSpin,
    title: TitleSequence,
    prompt: AnswerPrompt,
    couple_hovered_since: Option<Instant>,
    badge_popups: Vec<PopupAnchor>,
    viewport: FrameViewport,

    toasts: Toasts,
}

impl GlanceSplash {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: SplashConfig,
        config_error: Option<String>,
    ) -> std::io::Result<Self> {
        let tokio_runtime = Arc::new(Runtime::new()?);
        let ctx = cc.egui_ctx.clone();

        let (albums_tx, albums_rx) = oneshot::channel();
        let data_dir = config.data_dir.clone();
        let albums_ctx = ctx.clone();
        let albums_task = async move {
            let albums = load_albums(&data_dir).await.map_err(|e| e.to_string());
            if albums_tx.send(albums).is_err() {
                log::warn!("Albums receiver dropped before albums were sent");
            }
            albums_ctx.request_repaint();
        };

        let (books_tx, books_rx) = oneshot::channel();
        let data_dir = config.data_dir.clone();
        let books_ctx = ctx.clone();
        let books_task = async move {
            let books = load_books_or_fallback(&data_dir).await;
            if books_tx.send(books).is_err() {
                log::warn!("Books receiver dropped before books were sent");
            }
            books_ctx.request_repaint();
        };

        tokio_runtime.spawn(albums_task);
        tokio_runtime.spawn(books_task);

        let (image_sender, image_receiver) = mpsc::unbounded();
        let (chess_sender, chess_receiver) = mpsc::unbounded();

        let mut toasts = Toasts::new().with_anchor(Anchor::BottomRight);
        if let Some(e) = config_error {
            toasts.error(format!("Invalid configuration, using defaults: {e}"));
        }

        let mut splash = Self {
            config,
            tokio_runtime,
            http: reqwest::Client::new(),
            albums: Carousel::default(),
            albums_receiver: Some(albums_rx),
            books: Carousel::default(),
            books_receiver: Some(books_rx),
            texture_cache: HashMap::default(),
            images_in_flight: HashSet::default(),
            image_sender,
            image_receiver,
            bag: BagCycler::new(),
            bag_popup: PopupAnchor::new(BAG_ITEM_ID, BAG_POPUP_PLACEMENT),
            chess_sender,
            chess_receiver,
            coin: SpinState::default(),
            coin_clock: FixedStep::default(),
            record: RecordSpin::default(),
            title: TitleSequence::new(),
            prompt: AnswerPrompt::default(),
            couple_hovered_since: None,
            badge_popups: BADGES
                .iter()
                .map(|badge| PopupAnchor::new(badge.id, badge.placement))
                .collect(),
            viewport: FrameViewport::default(),
            toasts,
        };

        for path in badges::raster_paths().chain(splash_ui::STATIC_ART) {
            splash.request_image(&ctx, path);
        }

        Ok(splash)
    }

    /// Picks up the album and book lists once their loaders finish.
    fn poll_loads(&mut self, ctx: &Context) {
        if let Some(receiver) = &mut self.albums_receiver {
            match receiver.try_recv() {
                Ok(Some(Ok(albums))) => {
                    log::info!("Loaded {} albums", albums.len());
                    self.albums.set_items(albums);
                    self.albums_receiver = None;
                    for path in album_preload_paths(&self.albums) {
                        self.request_image(ctx, &path);
                    }
                }
                Ok(Some(Err(e))) => {
                    log::error!("Failed to load albums: {e}");
                    self.toasts.warning("Couldn't load albums, showing a blank record");
                    self.albums_receiver = None;
                }
                Ok(None) => {}
                Err(_) => {
                    log::error!("Albums sender dropped");
                    self.albums_receiver = None;
                }
            }
        }

        if let Some(receiver) = &mut self.books_receiver {
            match receiver.try_recv() {
                Ok(Some(books)) => {
                    log::info!("Loaded {} books", books.len());
                    self.books.set_items(books);
                    self.books_receiver = None;
                    for path in book_preload_paths(&self.books) {
                        self.request_image(ctx, &path);
                    }
                }
                Ok(None) => {}
                Err(_) => {
                    log::error!("Books sender dropped");
                    self.books_receiver = None;
                }
            }
        }
    }

    /// Returns the texture for a web path, starting a background load on a miss.
    fn texture(&mut self, ctx: &Context, web_path: &str) -> Option<egui::TextureHandle> {
        if let Some(texture) = self.texture_cache.get(web_path) {
            return Some(texture.clone());
        }
        self.request_image(ctx, web_path);
        None
    }

    /// Decodes an image off the UI thread. Each path is attempted once; a
    /// failure is logged and the image is simply not drawn.
    fn request_image(&mut self, ctx: &Context, web_path: &str) {
        if self.texture_cache.contains_key(web_path)
            || !self.images_in_flight.insert(web_path.to_owned())
        {
            return;
        }

        let path = resolve_web_path(&self.config.data_dir, web_path);
        let sender = self.image_sender.clone();
        let ctx_clone = ctx.clone();
        let image_id = web_path.to_owned();

        let task = async move {
            let result = match load_image_bytes(&path).await {
                Ok(bytes) => image::load_from_memory(&bytes)
                    .map(|img| Arc::new(img.to_rgba8()))
                    .map_err(|e| e.to_string()),
                Err(e) => Err(e.to_string()),
            };
            if sender.unbounded_send((image_id, result)).is_err() {
                log::warn!("Image receiver dropped before {path:?} was sent");
            }
            ctx_clone.request_repaint();
        };
        self.tokio_runtime.spawn(task);
    }

    fn receive_images(&mut self, ctx: &Context) {
        while let Ok(Some((image_id, result))) = self.image_receiver.try_next() {
            match result {
                Ok(image) => {
                    let size = [image.width() as usize, image.height() as usize];
                    let colour_image = ColorImage::from_rgba_unmultiplied(size, image.as_raw());
                    let texture = ctx.load_texture(&image_id, colour_image, TextureOptions::LINEAR);
                    self.texture_cache.insert(image_id, texture);
                }
                Err(e) => log::warn!("Failed to load image {image_id}: {e}"),
            }
        }
    }

    /// Starts the chess ratings request for the item on show, if it wants one.
    fn start_chess_fetch(&mut self, ctx: &Context) {
        let Some(ticket) = self.bag.begin_fetch() else {
            return;
        };
        let Some(username) = self.config.chess_username.clone() else {
            log::warn!("No chess username configured");
            self.bag
                .complete_fetch(ticket, Err("No chess username configured".to_owned()));
            return;
        };

        let client = self.http.clone();
        let sender = self.chess_sender.clone();
        let ctx_clone = ctx.clone();
        let task = async move {
            let result = fetch_chess_stats(&client, &username)
                .await
                .map_err(|e| {
                    log::warn!("Failed to fetch chess stats for {username}: {e}");
                    e.to_string()
                });
            if sender.unbounded_send((ticket, result)).is_err() {
                log::warn!("Chess stats receiver dropped");
            }
            ctx_clone.request_repaint();
        };
        self.tokio_runtime.spawn(task);
    }

    fn receive_chess_stats(&mut self) {
        while let Ok(Some((ticket, result))) = self.chess_receiver.try_next() {
            self.bag.complete_fetch(ticket, result);
        }
    }

    /// `file://` URI for art rasterised by the egui_extras loaders.
    fn file_uri(&self, web_path: &str) -> String {
        format!(
            "file://{}",
            resolve_web_path(&self.config.data_dir, web_path).display()
        )
    }
}
