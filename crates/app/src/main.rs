use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use onair_core::RadioSession;
use onair_page::{Page, load_page, save_page};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod demo;
mod page_view;
mod radio;
mod theme;

use config::Config;
use page_view::BlockView;
use radio::RadioWidget;
use theme::Theme;

/// How often to check the engine for a finished lead-in while on air.
const ON_AIR_POLL: Duration = Duration::from_millis(50);

#[derive(Parser, Debug)]
#[command(name = "onair")]
#[command(about = "Scroll-revealed story page with an on-air radio")]
#[command(version)]
struct Args {
    /// Page file (JSON or MessagePack). Defaults to the last page opened
    #[arg(short, long)]
    page: Option<PathBuf>,

    /// Directory the page's audio paths are relative to. Defaults to the page's directory
    #[arg(short, long)]
    assets: Option<PathBuf>,

    /// Wait this long for the lead-in before starting the track anyway
    #[arg(long)]
    fallback_ms: Option<u64>,

    /// Skip parallax and shorten the reveals
    #[arg(long)]
    reduced_motion: bool,

    /// Write the built-in demo page to this path and exit
    #[arg(long, value_name = "PATH")]
    write_demo: Option<PathBuf>,
}

struct OnAirApp {
    theme: Theme,
    blocks: Vec<BlockView>,
    radio: Option<RadioWidget>,
    reduced_motion: bool,
}

impl OnAirApp {
    fn new(cc: &eframe::CreationContext<'_>, page: Page, assets: &Path, reduced_motion: bool) -> Self {
        let theme = Theme::dark();
        theme.apply(&cc.egui_ctx);

        let radio = RadioSession::from_page(&page, assets).map(RadioWidget::new);
        let blocks = page
            .blocks
            .into_iter()
            .map(|block| BlockView::new(block, reduced_motion))
            .collect();

        Self {
            theme,
            blocks,
            radio,
            reduced_motion,
        }
    }
}

impl eframe::App for OnAirApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let dt = ctx.input(|i| i.stable_dt).min(0.1);

        if let Some(radio) = &mut self.radio {
            radio.session.poll();
            if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
                radio.session.stop();
            }
            radio.advance(dt);
        }
        for block in &mut self.blocks {
            block.advance(dt);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    let lead = ui.clip_rect().height() * 0.4;
                    ui.add_space(lead);

                    for block in &mut self.blocks {
                        block.show(ui, &self.theme, self.reduced_motion);
                        ui.add_space(48.0);
                    }

                    if let Some(radio) = &mut self.radio {
                        ui.add_space(32.0);
                        radio.show(ui, &self.theme, self.reduced_motion);
                    }

                    ui.add_space(lead);
                });
        });

        let animating = self.blocks.iter().any(BlockView::is_animating)
            || self.radio.as_ref().is_some_and(RadioWidget::is_animating);
        if animating {
            ctx.request_repaint();
        }

        if let Some(radio) = &self.radio {
            if let Some(deadline) = radio.session.next_deadline() {
                ctx.request_repaint_after(deadline.saturating_duration_since(Instant::now()));
            }
            if radio.session.ui().on_air {
                ctx.request_repaint_after(ON_AIR_POLL);
            }
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "onair=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let mut config = Config::load();

    if let Some(path) = &args.write_demo {
        save_page(path, &demo::demo_page())
            .with_context(|| format!("writing demo page to {}", path.display()))?;
        info!("demo page written to {}", path.display());
        return Ok(());
    }

    let page_path = args
        .page
        .clone()
        .or_else(|| config.last_page.clone().filter(|p| p.exists()));

    let mut page = match &page_path {
        Some(path) => {
            load_page(path).with_context(|| format!("loading page {}", path.display()))?
        }
        None => demo::demo_page(),
    };
    info!(page = %page.name, blocks = page.blocks.len(), "page loaded");

    if let Some(fallback_ms) = args.fallback_ms.or(config.fallback_ms) {
        if let Some(radio) = page.radio.as_mut() {
            radio.fallback_ms = fallback_ms;
        }
    }

    let assets = args
        .assets
        .clone()
        .or_else(|| page_path.as_deref().and_then(Path::parent).map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));
    let reduced_motion = args.reduced_motion || config.reduced_motion;

    if args.page.is_some() && args.page != config.last_page {
        config.last_page = args.page.clone();
        config.save();
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([720.0, 800.0]),
        ..Default::default()
    };

    let title = page.name.clone();
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| Ok(Box::new(OnAirApp::new(cc, page, &assets, reduced_motion)))),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
