#![windows_subsystem = "windows"]
//! Subdeck - Main entry point

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

mod app;
mod cards;
mod constants;
mod feed;
mod resolver;
mod settings;
mod theme;
mod types;
mod ui;
mod utils;

use app::App;
use cards::{card_descriptors, filter_card_indices};
use constants::*;
use eframe::egui;
use std::path::PathBuf;
use tracing::info;
use ui::components::{empty_state, subscription_card, CARD_ENTER_SECS};

/// Initialize file logging. Returns a guard that must be held for the app lifetime.
fn init_logging(data_dir: &std::path::Path) -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let logs_dir = data_dir.join("logs");
    std::fs::create_dir_all(&logs_dir).ok();

    let file_appender = tracing_appender::rolling::daily(&logs_dir, "subdeck.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,subdeck=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    guard
}

fn main() -> eframe::Result<()> {
    let data_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Subdeck");

    std::fs::create_dir_all(&data_dir).ok();

    // Initialize logging - guard must live for entire app lifetime
    let _log_guard = init_logging(&data_dir);

    info!(version = APP_VERSION, "Subdeck starting");

    // Load saved window position/size
    let settings = settings::Settings::load(&data_dir);
    let win_pos = match (settings.window_x, settings.window_y) {
        (Some(x), Some(y)) => Some(egui::pos2(x, y)),
        _ => None,
    };
    let win_size = match (settings.window_w, settings.window_h) {
        (Some(w), Some(h)) => Some(egui::vec2(w, h)),
        _ => None,
    };

    let mut viewport = egui::ViewportBuilder::default()
        .with_inner_size(win_size.unwrap_or(egui::vec2(440.0, 720.0)))
        .with_min_inner_size([360.0, 480.0])
        .with_title("Subdeck");

    // Window/taskbar icon rasterized from the inline logo SVG
    {
        let (rgba, width, height) = utils::rasterize_logo_square(64);
        let icon = egui::IconData { rgba, width, height };
        viewport = viewport.with_icon(std::sync::Arc::new(icon));
    }

    let needs_center = win_pos.is_none();

    if let Some(pos) = win_pos {
        viewport = viewport.with_position(pos);
    }

    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    eframe::run_native(
        "Subdeck",
        options,
        Box::new(move |cc| {
            let mut app = App::new(cc, settings, data_dir);
            app.needs_center = needs_center;
            Ok(Box::new(app))
        }),
    )
}

// ============================================================================
// MAIN UPDATE LOOP & UI RENDERING
// ============================================================================

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Track window position/size for saving on exit
        ctx.input(|i| {
            if let Some(rect) = i.viewport().outer_rect {
                self.window_pos = Some(rect.min);
            }
            if let Some(rect) = i.viewport().inner_rect {
                self.window_size = Some(rect.size());
            }
        });

        // Global keyboard capture: type anywhere to search
        if !ctx.wants_keyboard_input() {
            let mut typed_text = String::new();
            let mut backspace = false;
            ctx.input(|i| {
                for event in &i.events {
                    if let egui::Event::Text(text) = event {
                        if !text.is_empty() && text.chars().all(|c| !c.is_control()) {
                            typed_text.push_str(text);
                        }
                    }
                    if let egui::Event::Key { key: egui::Key::Backspace, pressed: true, .. } = event
                    {
                        backspace = true;
                    }
                }
            });
            if !typed_text.is_empty() {
                self.search_query.push_str(&typed_text);
                self.focus_search = true;
            }
            if backspace && !self.search_query.is_empty() {
                self.search_query.pop();
                self.focus_search = true;
            }
        }

        // Kick off resolution on the first frame
        self.begin_resolution();

        // Center window on first launch
        if self.needs_center {
            self.needs_center = false;
            if let Some(cmd) = egui::ViewportCommand::center_on_screen(ctx) {
                ctx.send_viewport_cmd(cmd);
            }
        }

        let snapshot = self.feed.snapshot();

        // Stamp an arrival instant for every record that appeared since
        // the last frame; the enter animation runs from these.
        while self.card_arrivals.len() < snapshot.len() {
            self.card_arrivals.push(std::time::Instant::now());
        }

        // Top navigation bar
        egui::TopBottomPanel::top("nav_bar")
            .exact_height(54.0)
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin::symmetric(16, 10)),
            )
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    let texture = self.logo_texture.get_or_insert_with(|| {
                        let (pixels, w, h) = utils::rasterize_logo(72);
                        ctx.load_texture(
                            "logo",
                            egui::ColorImage::from_rgba_unmultiplied(
                                [w as usize, h as usize],
                                &pixels,
                            ),
                            egui::TextureOptions::LINEAR,
                        )
                    });
                    let aspect = texture.size()[1] as f32 / texture.size()[0] as f32;
                    let logo_size = egui::vec2(26.0, 26.0 * aspect);
                    ui.image(egui::load::SizedTexture::new(texture.id(), logo_size));
                    ui.add_space(theme::SPACING_MD);
                    ui.add(
                        egui::Label::new(
                            egui::RichText::new("SUBSCRIPTIONS")
                                .size(13.0)
                                .color(theme::TEXT_SECONDARY),
                        )
                        .selectable(false),
                    );

                    // Resolution progress; completion is never signalled,
                    // this just mirrors the feed length
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        let label = format!("{} of {}", snapshot.len(), self.references.len());
                        ui.add(
                            egui::Label::new(
                                egui::RichText::new(label).size(11.0).color(theme::TEXT_DIM),
                            )
                            .selectable(false),
                        );
                    });
                });
            });

        egui::CentralPanel::default()
            .frame(
                egui::Frame::new()
                    .fill(theme::BG_BASE)
                    .inner_margin(egui::Margin {
                        left: 16,
                        right: 16,
                        top: 8,
                        bottom: 12,
                    }),
            )
            .show(ctx, |ui| {
                self.render_search_box(ui);
                ui.add_space(theme::SPACING_LG);

                let cards = card_descriptors(&snapshot);
                let visible = filter_card_indices(&cards, &self.search_query);

                if self.references.is_empty() {
                    empty_state(ui, "No subscriptions configured");
                    return;
                }
                if cards.is_empty() {
                    empty_state(ui, "Resolving subscriptions…");
                    return;
                }
                if visible.is_empty() {
                    empty_state(ui, "No matches");
                    return;
                }

                let mut animating = false;
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ui.spacing_mut().item_spacing.y = theme::SPACING_MD;
                        for &idx in &visible {
                            let age = self.card_arrivals[idx].elapsed().as_secs_f32();
                            let enter = (age / CARD_ENTER_SECS).clamp(0.0, 1.0);
                            if enter < 1.0 {
                                animating = true;
                            }
                            subscription_card(ui, &cards[idx], enter);
                        }
                    });

                if animating {
                    ctx.request_repaint();
                }
            });
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application shutting down");
        // Stragglers still in flight must not touch view state once the
        // window is gone
        self.feed.retire();
        self.save_settings();
    }
}

// ============================================================================
// SEARCH BOX
// ============================================================================

impl App {
    fn render_search_box(&mut self, ui: &mut egui::Ui) {
        let search_frame_resp = theme::input_frame().show(ui, |ui| {
            ui.spacing_mut().item_spacing.x = theme::SPACING_SM;
            ui.horizontal(|ui| {
                ui.add(
                    egui::Label::new(
                        egui::RichText::new(egui_phosphor::regular::MAGNIFYING_GLASS)
                            .size(14.0)
                            .color(theme::TEXT_DIM),
                    )
                    .selectable(false),
                );
                let search_id = ui.make_persistent_id("search_box");
                let search_response = ui.add(
                    egui::TextEdit::singleline(&mut self.search_query)
                        .id(search_id)
                        .hint_text("Search subscriptions...")
                        .frame(false)
                        .desired_width(ui.available_width()),
                );
                if self.focus_search {
                    self.focus_search = false;
                    search_response.request_focus();
                    if let Some(mut state) = egui::TextEdit::load_state(ui.ctx(), search_id) {
                        let ccursor = egui::text::CCursor::new(self.search_query.len());
                        state
                            .cursor
                            .set_char_range(Some(egui::text::CCursorRange::one(ccursor)));
                        state.store(ui.ctx(), search_id);
                    }
                }
            });
        });

        // Clear button overlaid on right side of search frame
        if !self.search_query.is_empty() {
            let frame_rect = search_frame_resp.response.rect;
            let btn_size = 16.0;
            let btn_rect = egui::Rect::from_center_size(
                egui::pos2(frame_rect.right() - 14.0, frame_rect.center().y),
                egui::vec2(btn_size, btn_size),
            );
            let clear_resp = ui.interact(btn_rect, ui.id().with("search_clear"), egui::Sense::click());
            let color = if clear_resp.hovered() {
                theme::TEXT_MUTED
            } else {
                theme::TEXT_DIM
            };
            if clear_resp.hovered() {
                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
            }
            ui.painter().text(
                btn_rect.center(),
                egui::Align2::CENTER_CENTER,
                egui_phosphor::regular::X,
                egui::FontId::proportional(12.0),
                color,
            );
            if clear_resp.clicked() {
                self.search_query.clear();
            }
        }
    }
}
