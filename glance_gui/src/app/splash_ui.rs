// Copyright (C) 2025 aidan-es. Licensed under the GNU AGPLv3.
use super::badges::{BADGES, Badge, BadgeArt, HoverMotion, QUARTER_ID};
use super::{BAG_ITEM_ID, GlanceSplash};
use crate::extensions::geometry::{FromEgui as _, ToEgui as _};
use egui::emath::Rot2;
use egui::{
    Align, Align2, Color32, Context, CornerRadius, FontId, Id, Image, Key, Layout, Margin, OpenUrl,
    Order, Pos2, RichText, Sense, Shape, TextEdit, Ui, UiBuilder, Vec2, pos2, vec2,
};
use egui_extras::install_image_loaders;
use glance_core::splash::bag::{PopupContent, RemoteData};
use glance_core::splash::gallery::{
    BOOK_AUTHOR_FONT_SIZE, BOOK_TEXT_MAX_WIDTH, BOOK_TITLE_FONT_SIZE, book_view, fit_font_size,
    record_view,
};
use glance_core::splash::popup::ViewportQuery as _;
use glance_core::splash::layout::{DESIGN_CANVAS, splash_scale, to_viewport};
use glance_core::splash::shake::shake_offset;
use glance_core::splash::spin::SpinParams;
use glance_core::splash::title::{PROMPT_LABEL, PROMPT_PLACEHOLDER, SHAKE_AMPLITUDE, TitlePhase};
use glance_core::types::{Point, Rect, Size};
use std::time::Instant;

const BACKGROUND: &str = "/splash_bg.jpg";
const COFFEE_CUP: &str = "/optimized/coffee_cup-800.webp";
const NAME_IMAGE: &str = "/optimized/name_img-800.webp";
const TOTE_BAG: &str = "/tote_bag.svg";
const COUPLE: &str = "/optimized/couple-400.webp";

/// Raster art that is always on screen, loaded up front.
pub(super) const STATIC_ART: [&str; 4] = [BACKGROUND, COFFEE_CUP, NAME_IMAGE, COUPLE];

// Bounds on the design canvas.
const CANVAS_BOUNDS: Rect = Rect::new(0.0, 0.0, DESIGN_CANVAS.width, DESIGN_CANVAS.height);
const COFFEE_CUP_BOUNDS: Rect = Rect::new(-288.0, -162.0, 576.0, 576.0);
const TITLE_BOUNDS: Rect = Rect::new(384.0, 0.0, 1152.0, 432.0);
const COUPLE_BOUNDS: Rect = Rect::new(1504.0, 10.0, 320.0, 320.0);
const BAG_BOUNDS: Rect = Rect::new(672.0, 648.0, 288.0, 288.0);
const BAG_ITEM_BOUNDS: Rect = Rect::new(796.5, 523.0, 115.0, 115.0);
const RECORD_BOUNDS: Rect = Rect::new(1382.0, 600.0, 440.0, 440.0);
const RECORD_NEXT_BOUNDS: Rect = Rect::new(1300.0, 790.0, 64.0, 64.0);
const BOOK_BG_BOUNDS: Rect = Rect::new(0.0, 610.0, 440.0, 440.0);
const BOOK_COVER_BOUNDS: Rect = Rect::new(60.0, 700.0, 120.0, 180.0);
const BOOK_TEXT_ORIGIN: Point = Point::new(190.0, 780.0);
const BOOK_PREV_BOUNDS: Rect = Rect::new(60.0, 890.0, 54.0, 40.0);
const BOOK_NEXT_BOUNDS: Rect = Rect::new(126.0, 890.0, 54.0, 40.0);

const TITLE_FALL_DISTANCE: f32 = 1296.0;
const TITLE_FALL_DEGREES: f32 = 20.0;
const POPUP_FONT_SIZE: f32 = 22.0;
const PROMPT_FONT_SIZE: f32 = 38.4;
const PROMPT_ERROR_FONT_SIZE: f32 = 19.2;
const PROMPT_GREEN: Color32 = Color32::from_rgb(0x39, 0xFF, 0x14);
const PROMPT_ERROR: Color32 = Color32::from_rgb(0xFF, 0x44, 0x44);
const HOVER_DIM: Color32 = Color32::from_gray(179);

/// Maps design-canvas geometry into the window.
#[derive(Debug, Clone, Copy)]
struct Canvas {
    viewport: Size,
    scale: f32,
}

impl Canvas {
    fn new(screen: egui::Rect) -> Self {
        let viewport = Size::from_egui(screen.size());
        Self {
            viewport,
            scale: splash_scale(viewport),
        }
    }

    fn rect(&self, bounds: Rect) -> egui::Rect {
        let min = to_viewport(Point::new(bounds.left, bounds.top), self.viewport).to_egui();
        egui::Rect::from_min_size(min, Size::new(bounds.width, bounds.height).to_egui() * self.scale)
    }

    fn pos(&self, point: Point) -> Pos2 {
        to_viewport(point, self.viewport).to_egui()
    }

    fn scaled(&self, design: f32) -> f32 {
        design * self.scale
    }
}

/// The largest rect with the texture's aspect ratio centred in `bounds`.
fn fit(texture_size: Vec2, bounds: egui::Rect) -> egui::Rect {
    if texture_size.x <= 0.0 || texture_size.y <= 0.0 {
        return bounds;
    }
    let scale = (bounds.width() / texture_size.x).min(bounds.height() / texture_size.y);
    egui::Rect::from_center_size(bounds.center(), texture_size * scale)
}

fn paint_rotated(
    painter: &egui::Painter,
    texture: &egui::TextureHandle,
    rect: egui::Rect,
    angle: f32,
    tint: Color32,
) {
    let mut mesh = egui::Mesh::with_texture(texture.id());
    let uv = egui::Rect::from_min_max(Pos2::ZERO, pos2(1.0, 1.0));
    mesh.add_rect_with_uv(rect, uv, tint);
    mesh.rotate(Rot2::from_angle(angle), rect.center());
    painter.add(Shape::mesh(mesh));
}

fn popup_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(Color32::from_black_alpha(217))
        .corner_radius(CornerRadius::same(14))
        .inner_margin(Margin::same(12))
}

fn popup_text(text: &str, canvas: Canvas) -> RichText {
    RichText::new(text)
        .color(Color32::WHITE)
        .size(canvas.scaled(POPUP_FONT_SIZE))
}

impl eframe::App for GlanceSplash {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        install_image_loaders(ctx);

        let now = Instant::now();
        self.poll_loads(ctx);
        self.receive_images(ctx);
        self.receive_chess_stats();
        self.bag.tick(now);
        self.title.tick(now);

        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(Color32::BLACK))
            .show(ctx, |ui| {
                let screen = ui.max_rect();
                self.viewport.begin_frame(screen);
                let canvas = Canvas::new(screen);

                self.draw_backdrop(ui, canvas);
                self.draw_books(ui, canvas);
                self.draw_record(ui, canvas, now);
                self.draw_title(ui, canvas, now);
                self.draw_couple(ui, canvas, now);
                self.draw_badges(ui, canvas, now);
                self.draw_bag(ui, canvas, now);
            });

        self.toasts.show(ctx);
        // The record never stops turning.
        ctx.request_repaint();
    }
}

impl GlanceSplash {
    fn draw_backdrop(&mut self, ui: &Ui, canvas: Canvas) {
        if let Some(texture) = self.texture(ui.ctx(), BACKGROUND) {
            paint_rotated(
                ui.painter(),
                &texture,
                canvas.rect(CANVAS_BOUNDS),
                0.0,
                Color32::WHITE,
            );
        }
        if let Some(texture) = self.texture(ui.ctx(), COFFEE_CUP) {
            let rect = fit(texture.size_vec2(), canvas.rect(COFFEE_CUP_BOUNDS));
            paint_rotated(ui.painter(), &texture, rect, 0.0, Color32::WHITE);
        }
    }

    fn draw_couple(&mut self, ui: &Ui, canvas: Canvas, now: Instant) {
        let rect = canvas.rect(COUPLE_BOUNDS);
        let hovered = ui
            .interact(rect, ui.id().with("couple"), Sense::hover())
            .hovered();
        self.couple_hovered_since = match (hovered, self.couple_hovered_since) {
            (true, None) => Some(now),
            (true, since) => since,
            (false, _) => None,
        };

        let hovered_secs = self
            .couple_hovered_since
            .map(|since| now.saturating_duration_since(since).as_secs_f32());
        let pose = HoverMotion::Rock.pose(hovered_secs);
        if let Some(texture) = self.texture(ui.ctx(), COUPLE) {
            let art_rect = pose.apply(fit(texture.size_vec2(), rect), canvas.scale);
            paint_rotated(
                ui.painter(),
                &texture,
                art_rect,
                pose.degrees.to_radians(),
                Color32::WHITE,
            );
        }
    }

    fn draw_badges(&mut self, ui: &Ui, canvas: Canvas, now: Instant) {
        let coin_steps = self.coin_clock.advance(now);

        for (index, badge) in BADGES.iter().enumerate() {
            let rect = canvas.rect(badge.bounds);
            self.viewport.record(badge.id, rect);
            let hovered = ui
                .interact(rect, ui.id().with(badge.id), Sense::hover())
                .hovered();

            let spin = if badge.id == QUARTER_ID {
                for _ in 0..coin_steps {
                    self.coin.step(hovered, &SpinParams::COIN);
                }
                self.coin.angle
            } else {
                0.0
            };
            let pose = badge.motion.pose(hovered.then_some(0.0));
            let angle = (spin + pose.degrees).to_radians();

            match badge.art {
                BadgeArt::Raster(src) => {
                    if let Some(texture) = self.texture(ui.ctx(), src) {
                        let art_rect = pose.apply(fit(texture.size_vec2(), rect), canvas.scale);
                        paint_rotated(ui.painter(), &texture, art_rect, angle, Color32::WHITE);
                    }
                }
                BadgeArt::Svg(src) => Image::new(self.file_uri(src))
                    .rotate(angle, Vec2::splat(0.5))
                    .paint_at(ui, pose.apply(rect, canvas.scale)),
            }

            if let Some(position) = self.badge_popups[index].update(hovered, &self.viewport) {
                self.show_badge_popup(ui.ctx(), canvas, badge, position.to_egui());
            }
        }
    }

    fn show_badge_popup(&mut self, ctx: &Context, canvas: Canvas, badge: &Badge, position: Pos2) {
        let width = badge.placement.popup_width(self.viewport.viewport_size());
        let photo = badge.photo.and_then(|photo| {
            let texture = self.texture(ctx, photo.src)?;
            let texture_size = texture.size_vec2();
            let size = match width {
                Some(width) => vec2(width, width * texture_size.y / texture_size.x),
                None => texture_size * (canvas.scaled(photo.height) / texture_size.y),
            };
            Some((texture, size))
        });

        egui::Area::new(Id::new(("badge_popup", badge.id)))
            .order(Order::Foreground)
            .fixed_pos(position)
            .interactable(false)
            .show(ctx, |ui| {
                popup_frame().show(ui, |ui| {
                    if let Some(width) = width {
                        ui.set_width(width);
                    }
                    if let Some((texture, size)) = &photo {
                        ui.image((texture.id(), *size));
                    }
                    if !badge.caption.is_empty() {
                        ui.label(popup_text(badge.caption, canvas));
                    }
                });
            });
    }

    fn draw_bag(&mut self, ui: &Ui, canvas: Canvas, now: Instant) {
        let bag_rect = canvas.rect(BAG_BOUNDS);
        let response = ui.interact(bag_rect, ui.id().with("bag"), Sense::click());
        self.bag.set_bag_hovered(response.hovered());
        if response.clicked() {
            self.bag.click(now);
        }

        let shake = self
            .bag
            .shake_progress(now)
            .map(|progress| shake_offset(progress, 1.0))
            .unwrap_or_default();
        let tint = if self.bag.bag_hovered() {
            HOVER_DIM
        } else {
            Color32::WHITE
        };
        Image::new(self.file_uri(TOTE_BAG))
            .rotate(shake.degrees.to_radians(), Vec2::splat(0.5))
            .tint(tint)
            .paint_at(ui, bag_rect.translate(vec2(canvas.scaled(shake.dx), 0.0)));

        let Some(item) = self.bag.current() else {
            self.bag.set_item_hovered(false);
            self.bag.set_popup_hovered(false);
            return;
        };

        let item_rect = canvas.rect(BAG_ITEM_BOUNDS);
        self.viewport.record(BAG_ITEM_ID, item_rect);
        let item_response = ui.interact(item_rect, ui.id().with(BAG_ITEM_ID), Sense::click());
        Image::new(self.file_uri(item.src)).paint_at(ui, item_rect);
        self.bag.set_item_hovered(item_response.hovered());
        if item_response.clicked()
            && let Some(link) = item.link
        {
            ui.ctx().open_url(OpenUrl::new_tab(link));
        }

        let Some(position) = self
            .bag_popup
            .update(self.bag.popup_visible(), &self.viewport)
        else {
            self.bag.set_popup_hovered(false);
            return;
        };

        if item.popup.needs_remote() {
            self.start_chess_fetch(ui.ctx());
        }
        let text = match item.popup {
            PopupContent::Text(text) => text.to_owned(),
            PopupContent::ChessStats => match self.bag.remote() {
                RemoteData::NotRequested | RemoteData::Loading => "Loading…".to_owned(),
                RemoteData::Ready(stats) => stats.summary(),
                RemoteData::Failed(_) => "Ratings unavailable".to_owned(),
            },
        };

        let area = egui::Area::new(Id::new("bag_popup"))
            .order(Order::Foreground)
            .fixed_pos(position.to_egui())
            .show(ui.ctx(), |ui| {
                popup_frame().show(ui, |ui| {
                    ui.label(popup_text(&text, canvas));
                });
            });
        self.bag.set_popup_hovered(area.response.contains_pointer());
    }

    fn draw_record(&mut self, ui: &mut Ui, canvas: Canvas, now: Instant) {
        let view = record_view(&self.albums);
        let rect = canvas.rect(RECORD_BOUNDS);
        let response = ui.interact(rect, ui.id().with("record"), Sense::click());
        let hovered = response.hovered();
        let angle = self.record.update(now, hovered);

        if let Some(texture) = self.texture(ui.ctx(), &view.image) {
            let tint = if hovered { HOVER_DIM } else { Color32::WHITE };
            let record_rect = fit(texture.size_vec2(), rect);
            paint_rotated(ui.painter(), &texture, record_rect, angle.to_radians(), tint);
        }
        if response.clicked()
            && let Some(link) = view.link
        {
            ui.ctx().open_url(OpenUrl::new_tab(link));
        }

        if self.albums.len() > 1 {
            let button = egui::Button::new(RichText::new(">").size(canvas.scaled(32.0)));
            if ui.put(canvas.rect(RECORD_NEXT_BOUNDS), button).clicked() {
                self.albums.next();
            }
        }
    }

    fn draw_books(&mut self, ui: &mut Ui, canvas: Canvas) {
        let Some(view) = book_view(&self.books) else {
            return;
        };

        if let Some(background) = &view.background
            && let Some(texture) = self.texture(ui.ctx(), background)
        {
            let rect = fit(texture.size_vec2(), canvas.rect(BOOK_BG_BOUNDS));
            paint_rotated(ui.painter(), &texture, rect, 0.0, Color32::WHITE);
        }

        let cover_rect = canvas.rect(BOOK_COVER_BOUNDS);
        if !view.cover.is_empty()
            && let Some(texture) = self.texture(ui.ctx(), &view.cover)
        {
            paint_rotated(ui.painter(), &texture, cover_rect, 0.0, Color32::WHITE);
        }
        let cover = ui.interact(cover_rect, ui.id().with("book_cover"), Sense::click());
        if cover.clicked()
            && let Some(link) = view.link
        {
            ui.ctx().open_url(OpenUrl::new_tab(link));
        }

        {
            let painter = ui.painter();
            let measure = |text: &str, size: f32| {
                painter
                    .layout_no_wrap(text.to_owned(), FontId::proportional(size), Color32::BLACK)
                    .size()
                    .x
            };
            let title_size = fit_font_size(&view.title, BOOK_TEXT_MAX_WIDTH, BOOK_TITLE_FONT_SIZE, measure);
            let author_size =
                fit_font_size(&view.author, BOOK_TEXT_MAX_WIDTH, BOOK_AUTHOR_FONT_SIZE, measure);

            let origin = canvas.pos(BOOK_TEXT_ORIGIN);
            painter.text(
                origin,
                Align2::LEFT_TOP,
                &view.title,
                FontId::proportional(canvas.scaled(title_size)),
                Color32::BLACK,
            );
            painter.text(
                origin + vec2(0.0, canvas.scaled(title_size + 6.0)),
                Align2::LEFT_TOP,
                &view.author,
                FontId::proportional(canvas.scaled(author_size)),
                Color32::DARK_GRAY,
            );
        }

        if self.books.len() > 1 {
            let size = canvas.scaled(20.0);
            if ui
                .put(canvas.rect(BOOK_PREV_BOUNDS), egui::Button::new(RichText::new("<").size(size)))
                .clicked()
            {
                self.books.prev();
            }
            if ui
                .put(canvas.rect(BOOK_NEXT_BOUNDS), egui::Button::new(RichText::new(">").size(size)))
                .clicked()
            {
                self.books.next();
            }
        }
    }

    fn draw_title(&mut self, ui: &mut Ui, canvas: Canvas, now: Instant) {
        let bounds = canvas.rect(TITLE_BOUNDS);
        if self.title.phase() == TitlePhase::AskingAnswer {
            self.draw_answer_prompt(ui, canvas, bounds);
            return;
        }

        let Some(texture) = self.texture(ui.ctx(), NAME_IMAGE) else {
            return;
        };
        let rect = fit(texture.size_vec2(), bounds);
        if ui
            .interact(rect, ui.id().with("title"), Sense::click())
            .clicked()
        {
            self.title.click(now);
        }

        let shake = self
            .title
            .shake_progress(now)
            .map(|progress| shake_offset(progress, SHAKE_AMPLITUDE))
            .unwrap_or_default();
        let fall = self.title.fall_progress(now).unwrap_or(0.0);
        let offset = vec2(canvas.scaled(shake.dx), canvas.scaled(TITLE_FALL_DISTANCE * fall));
        let angle = (shake.degrees + TITLE_FALL_DEGREES * fall).to_radians();
        paint_rotated(
            ui.painter(),
            &texture,
            rect.translate(offset),
            angle,
            Color32::WHITE.gamma_multiply(1.0 - fall),
        );
    }

    fn draw_answer_prompt(&mut self, ui: &mut Ui, canvas: Canvas, bounds: egui::Rect) {
        let builder = UiBuilder::new()
            .max_rect(bounds)
            .layout(Layout::top_down(Align::Center));
        ui.scope_builder(builder, |ui| {
            ui.add_space(bounds.height() / 3.0);
            ui.label(
                RichText::new(PROMPT_LABEL)
                    .size(canvas.scaled(PROMPT_FONT_SIZE))
                    .color(Color32::BLACK),
            );

            let response = ui.add(
                TextEdit::singleline(&mut self.prompt.input)
                    .password(true)
                    .hint_text(PROMPT_PLACEHOLDER)
                    .font(FontId::monospace(canvas.scaled(PROMPT_FONT_SIZE)))
                    .text_color(PROMPT_GREEN)
                    .background_color(Color32::from_gray(0x11))
                    .desired_width(canvas.scaled(384.0)),
            );
            if response.changed() {
                self.prompt.edited();
            }
            if response.lost_focus()
                && ui.input(|input| input.key_pressed(Key::Enter))
                && let Some(url) = self.prompt.submit(self.config.easter_egg.as_ref())
            {
                log::info!("Title answer accepted");
                ui.ctx().open_url(OpenUrl::new_tab(url));
            }

            if let Some(error) = self.prompt.error() {
                ui.label(
                    RichText::new(error)
                        .size(canvas.scaled(PROMPT_ERROR_FONT_SIZE))
                        .color(PROMPT_ERROR)
                        .monospace(),
                );
            }
        });
    }
}
