use eframe::egui::{self, Color32};

/// Page colors. Dark paper, warm text, a red "on air" lamp.
#[derive(Clone)]
pub struct Theme {
    pub background: Color32,
    pub text: Color32,
    pub text_muted: Color32,
    pub accent: Color32,
    pub lamp_off: Color32,
    pub heading_size: f32,
    pub body_size: f32,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            background: Color32::from_rgb(27, 25, 23),
            text: Color32::from_rgb(240, 236, 228),
            text_muted: Color32::from_rgb(150, 142, 130),
            accent: Color32::from_rgb(223, 51, 38),
            lamp_off: Color32::from_rgb(70, 64, 58),
            heading_size: 44.0,
            body_size: 22.0,
        }
    }

    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = egui::Visuals::dark();
        visuals.panel_fill = self.background;
        visuals.override_text_color = Some(self.text);
        ctx.set_visuals(visuals);
    }
}

/// `color` with its alpha scaled by `opacity`.
pub fn faded(color: Color32, opacity: f32) -> Color32 {
    color.gamma_multiply(opacity.clamp(0.0, 1.0))
}
