use std::time::Duration;

use eframe::egui::{self, FontId, Pos2, Rect, Sense, Stroke, Ui, emath::Rot2, epaint::TextShape};
use onair_page::{Block, BlockKind};
use onair_reveal::{
    CrossoutSwap, Props, Reveal, ScrollTrigger, TriggerPoint, Typewriter, ViewportGeometry,
    parallax_offset, split_chars, split_words,
};

use crate::theme::{Theme, faded};

const RULE_WIDTH: f32 = 2.5;

/// Where a drawn line sits against its text.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Rule {
    Under,
    Through,
}

/// One run of text drawn as a unit. Only animated pieces take part in the stagger.
#[derive(Debug, Clone, PartialEq)]
struct Piece {
    text: String,
    item: Option<usize>,
}

fn pieces_for(block: &Block) -> Vec<Piece> {
    match block.kind {
        BlockKind::Heading
        | BlockKind::Line
        | BlockKind::Typewriter
        | BlockKind::Underline
        | BlockKind::Strike
        | BlockKind::Crossout => vec![Piece {
            text: strip_tags(&block.text),
            item: Some(0),
        }],
        BlockKind::Words => {
            let mut next = 0;
            split_words(&block.text)
                .into_iter()
                .map(|token| {
                    let item = token.animate.then(|| {
                        next += 1;
                        next - 1
                    });
                    Piece {
                        text: strip_tags(&token.text),
                        item,
                    }
                })
                .collect()
        }
        BlockKind::Chars => split_chars(&block.text)
            .into_iter()
            .enumerate()
            .map(|(i, text)| Piece {
                text,
                item: Some(i),
            })
            .collect(),
    }
}

/// Drop `<...>` markup, which egui has no way to render.
pub fn strip_tags(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_tag = false;
    for ch in text.chars() {
        match ch {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

/// The drawn part of a line under or through `rect`, or `None` before it starts.
fn rule_segment(rect: Rect, rule: Rule, drawn: f32) -> Option<[Pos2; 2]> {
    if drawn <= 0.0 {
        return None;
    }
    let y = match rule {
        Rule::Under => rect.bottom(),
        Rule::Through => rect.center().y,
    };
    let end = rect.left() + rect.width() * drawn.min(1.0);
    Some([egui::pos2(rect.left(), y), egui::pos2(end, y)])
}

/// Top-left corner that keeps a `size` box centred on `center` once it is
/// turned by `angle` radians about that corner.
fn rotated_origin(center: Pos2, size: egui::Vec2, angle: f32) -> Pos2 {
    center - Rot2::from_angle(angle) * (size / 2.0)
}

pub fn geometry(element: Rect, viewport: Rect) -> ViewportGeometry {
    ViewportGeometry {
        element_top: element.top() - viewport.top(),
        element_height: element.height(),
        viewport_height: viewport.height(),
    }
}

/// A page block plus its reveal state.
pub struct BlockView {
    block: Block,
    pieces: Vec<Piece>,
    reveal: Reveal,
    typewriter: Option<Typewriter>,
    typed_for: Duration,
    swap: Option<CrossoutSwap>,
    parallax: Option<(ScrollTrigger, f32)>,
    drift: f32,
}

impl BlockView {
    pub fn new(block: Block, reduced_motion: bool) -> Self {
        let pieces = pieces_for(&block);
        let items = pieces.iter().filter(|p| p.item.is_some()).count();
        let reveal = Reveal::new(block.reveal_spec(), items);
        let typewriter =
            (block.kind == BlockKind::Typewriter).then(|| Typewriter::new(&block.text, reduced_motion));
        let swap = (block.kind == BlockKind::Crossout).then(CrossoutSwap::default);
        let parallax = block.parallax.filter(|_| !reduced_motion).map(|y_percent| {
            let trigger = ScrollTrigger {
                start: TriggerPoint::new(0.0, 1.0),
                end: TriggerPoint::new(1.0, 0.0),
            };
            (trigger, y_percent)
        });

        Self {
            block,
            pieces,
            reveal,
            typewriter,
            typed_for: Duration::ZERO,
            swap,
            parallax,
            drift: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.reveal.advance(dt);
        if self.typewriter.is_some() && self.reveal.has_played() {
            self.typed_for += Duration::from_secs_f32(dt.max(0.0));
        }
    }

    /// Whether anything is still moving without further input.
    pub fn is_animating(&self) -> bool {
        let typing = self
            .typewriter
            .as_ref()
            .is_some_and(|t| self.reveal.has_played() && !t.is_done_at(self.typed_for));
        self.reveal.is_animating() || typing
    }

    fn font(&self, theme: &Theme) -> FontId {
        match self.block.kind {
            BlockKind::Heading | BlockKind::Chars => FontId::proportional(theme.heading_size),
            _ => FontId::proportional(theme.body_size),
        }
    }

    pub fn show(&mut self, ui: &mut Ui, theme: &Theme, reduced_motion: bool) {
        let font = self.font(theme);
        let rect = match &self.typewriter {
            Some(typewriter) => {
                let visible = strip_tags(&typewriter.visible_at(self.typed_for));
                let props = self.reveal.sample(0);
                self.show_typed(ui, &visible, props, &font, theme)
            }
            None => match (self.block.kind, &self.swap) {
                (BlockKind::Crossout, Some(swap)) => self.show_crossout(ui, swap, &font, theme),
                (BlockKind::Underline, _) => self.show_ruled(ui, Rule::Under, &font, theme),
                (BlockKind::Strike, _) => self.show_ruled(ui, Rule::Through, &font, theme),
                _ => self.show_pieces(ui, &font, theme),
            },
        };

        let viewport = geometry(rect, ui.clip_rect());
        if self.reveal.observe(&viewport).is_some() && reduced_motion {
            self.reveal.advance(self.reveal.total_duration());
        }
        if let Some((trigger, y_percent)) = self.parallax {
            self.drift = parallax_offset(trigger.progress(&viewport), y_percent, rect.height());
        }
    }

    fn show_pieces(&self, ui: &mut Ui, font: &FontId, theme: &Theme) -> Rect {
        let wrap = if self.pieces.len() == 1 {
            ui.available_width()
        } else {
            f32::INFINITY
        };
        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing.x = 0.0;
            for piece in &self.pieces {
                let props = match piece.item {
                    Some(item) => self.reveal.sample(item),
                    None => self.reveal.sample(0),
                };
                paint_piece(ui, &piece.text, props, self.drift, font, theme.text, wrap);
            }
        })
        .response
        .rect
    }

    fn show_ruled(&self, ui: &mut Ui, rule: Rule, font: &FontId, theme: &Theme) -> Rect {
        let props = self.reveal.sample(0);
        let wrap = ui.available_width();
        let rect = paint_piece(ui, &self.pieces[0].text, props, self.drift, font, theme.text, wrap);
        let shifted = rect.translate(egui::vec2(0.0, self.drift));
        if let Some(points) = rule_segment(shifted, rule, props.drawn_fraction()) {
            let color = faded(theme.accent, props.opacity_or_rest());
            ui.painter().line_segment(points, Stroke::new(RULE_WIDTH, color));
        }
        rect
    }

    /// Old text struck through, with the replacement rising in beneath it.
    fn show_crossout(&self, ui: &mut Ui, swap: &CrossoutSwap, font: &FontId, theme: &Theme) -> Rect {
        let frame = swap.sample(self.reveal.time());
        let wrap = ui.available_width();
        let old = paint_piece(ui, &self.pieces[0].text, frame.old, self.drift, font, theme.text, wrap);
        let shifted = old.translate(egui::vec2(0.0, self.drift));
        if let Some(points) = rule_segment(shifted, Rule::Through, frame.line.drawn_fraction()) {
            ui.painter().line_segment(points, Stroke::new(RULE_WIDTH, theme.accent));
        }

        let replacement = self.block.replacement.as_deref().map(strip_tags).unwrap_or_default();
        let new = paint_piece(ui, &replacement, frame.new, self.drift, font, theme.accent, wrap);
        old.union(new)
    }

    fn show_typed(&self, ui: &mut Ui, visible: &str, props: Props, font: &FontId, theme: &Theme) -> Rect {
        let wrap = ui.available_width();
        // Reserve the finished size so the layout does not grow while typing
        let full = ui
            .painter()
            .layout(strip_tags(&self.block.text), font.clone(), theme.text, wrap);
        let (rect, _) = ui.allocate_exact_size(full.size(), Sense::hover());
        if ui.is_rect_visible(rect) {
            let color = faded(theme.text, props.opacity_or_rest());
            let galley = ui.painter().layout(visible.to_string(), font.clone(), color, wrap);
            let offset = egui::vec2(props.offset_x(rect.width()), props.offset_y(rect.height()) + self.drift);
            ui.painter().galley(rect.min + offset, galley, color);
        }
        rect
    }
}

/// Lay out and paint one piece at its animated position. Returns the
/// resting rect it occupies in the layout.
fn paint_piece(
    ui: &mut Ui,
    text: &str,
    props: Props,
    drift: f32,
    font: &FontId,
    color: egui::Color32,
    wrap: f32,
) -> Rect {
    let galley = ui.painter().layout(text.to_string(), font.clone(), color, wrap);
    let (rect, _) = ui.allocate_exact_size(galley.size(), Sense::hover());
    if !ui.is_rect_visible(rect) {
        return rect;
    }

    let color = faded(color, props.opacity_or_rest());
    let scale = props.scale_or_rest();
    let scaled_font = FontId::new(font.size * scale.max(0.01), font.family.clone());
    let painted = ui.painter().layout(text.to_string(), scaled_font, color, wrap);
    let offset = egui::vec2(
        props.offset_x(rect.width()),
        props.offset_y(rect.height()) + drift,
    );
    let angle = props.rotation_radians();
    let pos = rotated_origin(rect.center() + offset, painted.size(), angle);
    ui.painter()
        .add(TextShape::new(pos, painted, color).with_angle(angle));
    rect
}
