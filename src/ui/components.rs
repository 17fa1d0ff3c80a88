//! Reusable UI components

use crate::theme;
use crate::types::CardDescriptor;
use eframe::egui;

/// Seconds a card takes to fade and slide in after its record arrives.
pub const CARD_ENTER_SECS: f32 = 0.4;

/// Render one subscription card, faded and slid in by `enter` (0..=1).
/// The animation is purely decorative; the card content comes straight
/// from the descriptor.
pub fn subscription_card(ui: &mut egui::Ui, card: &CardDescriptor, enter: f32) {
    ui.add_space((1.0 - enter) * 12.0);
    theme::card_frame()
        .fill(theme::BG_ELEVATED.gamma_multiply(enter))
        .stroke(egui::Stroke::new(
            theme::STROKE_DEFAULT,
            theme::BORDER_SUBTLE.gamma_multiply(enter),
        ))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.add(
                egui::Label::new(
                    egui::RichText::new(&card.title)
                        .size(16.0)
                        .strong()
                        .color(theme::TEXT_PRIMARY.gamma_multiply(enter)),
                )
                .selectable(false),
            );
        });
}

/// Centered dim hint for the empty states.
pub fn empty_state(ui: &mut egui::Ui, text: &str) {
    ui.add_space(48.0);
    ui.vertical_centered(|ui| {
        ui.add(
            egui::Label::new(
                egui::RichText::new(text)
                    .size(13.0)
                    .color(theme::TEXT_DIM),
            )
            .selectable(false),
        );
    });
}
