//! App module - contains the main application state and logic

mod resolution;

use crate::feed::SubscriptionFeed;
use crate::resolver::{DirectoryResolver, Resolve};
use crate::settings::Settings;
use crate::theme;
use crate::types::SubscriptionRef;
use eframe::egui;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

// ============================================================================
// APP STATE
// ============================================================================

pub struct App {
    // Configured reference list, read once at startup and passed into
    // activation by value
    pub(crate) references: Vec<SubscriptionRef>,
    pub(crate) feed: Arc<SubscriptionFeed>,
    pub(crate) resolver: Arc<dyn Resolve>,
    pub(crate) runtime: tokio::runtime::Runtime,
    pub(crate) activated: bool,
    // Search
    pub(crate) search_query: String,
    pub(crate) focus_search: bool,
    // One arrival instant per record; drives the card enter animation
    pub(crate) card_arrivals: Vec<Instant>,
    // Chrome
    pub(crate) logo_texture: Option<egui::TextureHandle>,
    // Window tracking for saving on exit
    pub(crate) window_pos: Option<egui::Pos2>,
    pub(crate) window_size: Option<egui::Vec2>,
    pub(crate) needs_center: bool,
    pub(crate) data_dir: PathBuf,
    pub(crate) directory_url: Option<String>,
}

// ============================================================================
// APP INITIALIZATION & HELPERS
// ============================================================================

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: Settings, data_dir: PathBuf) -> Self {
        // Force dark theme
        cc.egui_ctx.set_theme(egui::Theme::Dark);

        // Add Phosphor icons font
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        // Apply theme from theme.rs
        theme::apply_visuals(&cc.egui_ctx);

        let references: Vec<SubscriptionRef> = settings
            .subscriptions
            .iter()
            .cloned()
            .map(SubscriptionRef::new)
            .collect();

        // Appends wake the UI so cards show up as resolutions land
        let ctx = cc.egui_ctx.clone();
        let feed = Arc::new(SubscriptionFeed::new(move || ctx.request_repaint()));

        Self {
            references,
            feed,
            resolver: Arc::new(DirectoryResolver::new(settings.directory_url_or_default())),
            runtime: tokio::runtime::Runtime::new().unwrap(),
            activated: false,
            search_query: String::new(),
            focus_search: false,
            card_arrivals: Vec::new(),
            logo_texture: None,
            window_pos: None,
            window_size: None,
            needs_center: false,
            data_dir,
            directory_url: settings.directory_url,
        }
    }

    pub fn save_settings(&self) {
        let settings = Settings {
            window_x: self.window_pos.map(|p| p.x),
            window_y: self.window_pos.map(|p| p.y),
            window_w: self.window_size.map(|s| s.x),
            window_h: self.window_size.map(|s| s.y),
            directory_url: self.directory_url.clone(),
            subscriptions: self
                .references
                .iter()
                .map(|r| r.as_str().to_string())
                .collect(),
        };
        settings.save(&self.data_dir);
    }
}
