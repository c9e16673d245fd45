use onair_page::{Block, BlockKind, DEFAULT_FALLBACK_MS, Page, RadioConfig};
use onair_reveal::{Props, RevealSpec};
use std::path::PathBuf;

/// The page shown when none is given on the command line.
pub fn demo_page() -> Page {
    Page {
        name: "Mailing Pigeon".to_string(),
        radio: Some(RadioConfig {
            lead_in: PathBuf::from("tunein.mp3"),
            tracks: vec![
                PathBuf::from("ches ami song 3.mp3"),
                PathBuf::from("Ches Ami second song 2.mp3"),
                PathBuf::from("Ches Ami song 1.mp3"),
            ],
            fallback_ms: DEFAULT_FALLBACK_MS,
        }),
        blocks: vec![
            Block::new(BlockKind::Chars, "Mailing Pigeon"),
            Block::new(BlockKind::Line, "Before wires, before radio, there were wings.")
                .with_parallax(-5.0),
            Block::new(
                BlockKind::Words,
                "A pigeon finds its way home across hundreds of miles of open country.",
            ),
            Block::new(BlockKind::Line, "Strap a message to its leg, and the message goes home too.")
                .with_reveal(RevealSpec {
                    from: Props {
                        opacity: Some(0.0),
                        x_percent: Some(-10.0),
                        ..Props::default()
                    },
                    to: Props {
                        opacity: Some(1.0),
                        x_percent: Some(0.0),
                        ..Props::default()
                    },
                    ease: "power2.out".parse().unwrap_or_default(),
                    ..RevealSpec::default()
                }),
            Block::new(BlockKind::Heading, "Cher Ami"),
            Block::new(BlockKind::Crossout, "Just a bird.").with_replacement("A war hero."),
            Block::new(BlockKind::Strike, "Message lost."),
            Block::new(
                BlockKind::Typewriter,
                "Shot down over the Argonne, she flew on <em>anyway</em>...but the message had to get through!",
            ),
            Block::new(BlockKind::Line, "DELIVERED").with_reveal(RevealSpec {
                from: Props::opacity(0.0).with_scale(0.92).with_rotation(-12.0),
                to: Props::opacity(1.0).with_scale(1.0).with_rotation(-6.0),
                duration: 0.7,
                ease: "back.out(1.4)".parse().unwrap_or_default(),
                ..RevealSpec::default()
            }),
            Block::new(BlockKind::Underline, "Tune in below for the rest of the story.")
                .with_parallax(5.0),
        ],
    }
}
