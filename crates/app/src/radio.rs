use eframe::egui::{self, RichText, Ui};
use onair_core::RadioSession;
use onair_reveal::{Reveal, RevealSpec};

use crate::page_view::geometry;
use crate::theme::{Theme, faded};

const LAMP_RADIUS: f32 = 7.0;

/// The on-air button. Fades in the first time it is scrolled into view.
pub struct RadioWidget {
    pub session: RadioSession,
    reveal: Reveal,
}

impl RadioWidget {
    pub fn new(session: RadioSession) -> Self {
        Self {
            session,
            reveal: Reveal::new(RevealSpec::fade_in().with_once(true), 1),
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.reveal.advance(dt);
    }

    pub fn is_animating(&self) -> bool {
        self.reveal.is_animating()
    }

    pub fn show(&mut self, ui: &mut Ui, theme: &Theme, reduced_motion: bool) {
        let state = *self.session.ui();
        let opacity = self.reveal.sample(0).opacity_or_rest();

        let response = ui
            .vertical_centered(|ui| {
                ui.multiply_opacity(opacity);

                let text_color = if state.on_air { theme.accent } else { theme.text };
                let button = egui::Button::new(RichText::new(state.label()).size(28.0).color(text_color))
                    .stroke(egui::Stroke::new(2.0, text_color))
                    .min_size(egui::vec2(240.0, 64.0));
                let button = ui.add(button);

                // A focused button reports Enter and Space as clicks too
                if button.clicked() {
                    self.session.activate();
                }

                let lamp = if state.on_air { theme.accent } else { theme.lamp_off };
                let center = egui::pos2(
                    button.rect.left() + LAMP_RADIUS * 3.0,
                    button.rect.center().y,
                );
                ui.painter()
                    .circle_filled(center, LAMP_RADIUS, faded(lamp, opacity));

                ui.label(RichText::new(state.hint()).color(theme.text_muted));
                if let Some(failure) = self.session.last_failure() {
                    ui.label(RichText::new(failure.to_string()).small().color(theme.text_muted));
                }
            })
            .response;

        let viewport = geometry(response.rect, ui.clip_rect());
        if self.reveal.observe(&viewport).is_some() && reduced_motion {
            self.reveal.advance(self.reveal.total_duration());
        }
    }
}
