//! Centralized theme constants for Subdeck
//! All colors, sizes, and styling should reference these constants

use egui::Color32;

// =============================================================================
// COLORS - Backgrounds
// =============================================================================
pub const BG_BASE: Color32 = Color32::from_rgb(0x09, 0x09, 0x0b); // zinc-950
pub const BG_ELEVATED: Color32 = Color32::from_rgb(0x18, 0x18, 0x1b); // zinc-900
pub const BG_INPUT: Color32 = Color32::from_rgb(0x14, 0x14, 0x18); // input field background
pub const BG_SURFACE: Color32 = Color32::from_rgb(0x27, 0x27, 0x2a); // zinc-800
pub const BG_HOVER: Color32 = Color32::from_rgb(0x16, 0x13, 0x1e); // subtle violet hover

// =============================================================================
// COLORS - Accent (Violet)
// =============================================================================
pub const ACCENT: Color32 = Color32::from_rgb(0xa7, 0x8b, 0xfa); // violet-400

// =============================================================================
// COLORS - Text
// =============================================================================
pub const TEXT_PRIMARY: Color32 = Color32::WHITE;
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(0xe4, 0xe4, 0xe7); // zinc-200
pub const TEXT_MUTED: Color32 = Color32::from_rgb(0xa1, 0xa1, 0xaa); // zinc-400
pub const TEXT_DIM: Color32 = Color32::from_rgb(0x71, 0x71, 0x7a); // zinc-500

// =============================================================================
// COLORS - Borders
// =============================================================================
pub const BORDER_SUBTLE: Color32 = Color32::from_rgb(0x27, 0x27, 0x2a); // zinc-800

// =============================================================================
// SIZES
// =============================================================================
pub const RADIUS_DEFAULT: f32 = 4.0;
pub const RADIUS_MEDIUM: f32 = 6.0;
pub const STROKE_DEFAULT: f32 = 1.0;
pub const STROKE_MEDIUM: f32 = 1.5;

pub const SPACING_SM: f32 = 4.0;
pub const SPACING_MD: f32 = 8.0;
pub const SPACING_LG: f32 = 12.0;

// =============================================================================
// GLOBAL VISUALS
// =============================================================================
pub fn apply_visuals(ctx: &egui::Context) {
    ctx.set_visuals(egui::Visuals {
        dark_mode: true,
        panel_fill: BG_BASE,
        window_fill: Color32::from_rgb(0x1a, 0x1a, 0x1e),
        extreme_bg_color: BG_BASE,
        faint_bg_color: BG_ELEVATED,
        hyperlink_color: ACCENT,
        selection: egui::style::Selection {
            bg_fill: Color32::from_rgb(0x3a, 0x3a, 0x3f),
            stroke: egui::Stroke::NONE,
        },
        widgets: egui::style::Widgets {
            noninteractive: egui::style::WidgetVisuals {
                bg_fill: BG_ELEVATED,
                weak_bg_fill: BG_SURFACE,
                bg_stroke: egui::Stroke::new(STROKE_DEFAULT, BORDER_SUBTLE),
                fg_stroke: egui::Stroke::new(STROKE_DEFAULT, TEXT_PRIMARY),
                corner_radius: RADIUS_DEFAULT.into(),
                expansion: 0.0,
            },
            inactive: egui::style::WidgetVisuals {
                bg_fill: Color32::TRANSPARENT,
                weak_bg_fill: BG_ELEVATED,
                bg_stroke: egui::Stroke::new(STROKE_DEFAULT, BORDER_SUBTLE),
                fg_stroke: egui::Stroke::new(STROKE_DEFAULT, TEXT_SECONDARY),
                corner_radius: RADIUS_DEFAULT.into(),
                expansion: 0.0,
            },
            hovered: egui::style::WidgetVisuals {
                bg_fill: BG_HOVER,
                weak_bg_fill: Color32::from_rgb(0x30, 0x30, 0x35),
                bg_stroke: egui::Stroke::NONE,
                fg_stroke: egui::Stroke::new(STROKE_MEDIUM, TEXT_PRIMARY),
                corner_radius: RADIUS_DEFAULT.into(),
                expansion: 0.0,
            },
            active: egui::style::WidgetVisuals {
                bg_fill: Color32::from_rgb(0x2e, 0x2e, 0x33),
                weak_bg_fill: Color32::from_rgb(0x2e, 0x2e, 0x33),
                bg_stroke: egui::Stroke::NONE,
                fg_stroke: egui::Stroke::new(STROKE_DEFAULT, TEXT_PRIMARY),
                corner_radius: RADIUS_DEFAULT.into(),
                expansion: -2.0,
            },
            open: egui::style::WidgetVisuals {
                bg_fill: BG_SURFACE,
                weak_bg_fill: BG_ELEVATED,
                bg_stroke: egui::Stroke::new(STROKE_DEFAULT, BORDER_SUBTLE),
                fg_stroke: egui::Stroke::new(STROKE_DEFAULT, TEXT_PRIMARY),
                corner_radius: RADIUS_DEFAULT.into(),
                expansion: 0.0,
            },
        },
        striped: false,
        interact_cursor: Some(egui::CursorIcon::PointingHand),
        window_stroke: egui::Stroke::new(1.0, Color32::from_rgb(0x2a, 0x2a, 0x2e)),
        window_corner_radius: egui::CornerRadius::same(8),
        menu_corner_radius: egui::CornerRadius::same(8),
        ..egui::Visuals::dark()
    });

    ctx.style_mut(|style| {
        style.interaction.selectable_labels = false;
        style.spacing.item_spacing = egui::vec2(8.0, 6.0);
        style.spacing.button_padding = egui::vec2(12.0, 6.0);
        style.spacing.scroll.bar_inner_margin = 2.0;
        style.spacing.scroll.bar_width = 6.0;
        style.spacing.scroll.bar_outer_margin = 2.0;
        style.spacing.scroll.handle_min_length = 20.0;
        style.spacing.scroll.floating_allocated_width = 0.0;
        style.spacing.scroll.floating = false;
    });
}

// =============================================================================
// FRAMES
// =============================================================================

/// Frame for one subscription card.
pub fn card_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(BG_ELEVATED)
        .stroke(egui::Stroke::new(STROKE_DEFAULT, BORDER_SUBTLE))
        .corner_radius(RADIUS_MEDIUM)
        .inner_margin(egui::Margin::symmetric(14, 12))
}

/// Bordered frame for the search input.
pub fn input_frame() -> egui::Frame {
    egui::Frame::new()
        .fill(BG_INPUT)
        .stroke(egui::Stroke::new(STROKE_DEFAULT, BORDER_SUBTLE))
        .corner_radius(RADIUS_DEFAULT)
        .inner_margin(egui::Margin::symmetric(8, 8))
}
