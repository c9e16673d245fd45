use basedrop::Shared;
use onair_transport::{AudioArc, Command, Status, Token, Voice};

pub const MAX_OUTPUT_CHANNELS: usize = 8;

/// Status slots positions never fill, one per voice, so completions get through.
const COMPLETION_RESERVE: usize = 2;

/// Everything a voice ring can carry. Loads share the ring with control
/// commands so a `Load` followed by `Play` is never reordered.
pub enum VoiceMessage {
    Load(Shared<AudioArc>),
    Control(Command),
}

struct VoiceState {
    voice: Voice,
    audio: Option<Shared<AudioArc>>,
    playing: bool,
    position: usize, // frames
    subscription: Option<Token>,
    /// A natural end not yet reported, with the token armed when it ended.
    pending_completion: Option<Option<Token>>,
}

impl VoiceState {
    fn new(voice: Voice) -> Self {
        Self {
            voice,
            audio: None,
            playing: false,
            position: 0,
            subscription: None,
            pending_completion: None,
        }
    }

    fn apply(&mut self, message: VoiceMessage) {
        match message {
            VoiceMessage::Load(audio) => {
                // Replaced buffer goes back to the collector, not freed here
                self.audio = Some(audio);
                self.playing = false;
                self.position = 0;
                self.pending_completion = None;
            }
            VoiceMessage::Control(Command::Play) => {
                self.playing = self.audio.is_some();
                self.pending_completion = None;
            }
            VoiceMessage::Control(Command::Pause) => self.playing = false,
            VoiceMessage::Control(Command::Rewind) => {
                self.position = 0;
                self.pending_completion = None;
            }
            VoiceMessage::Control(Command::Subscribe { token }) => self.subscription = Some(token),
            VoiceMessage::Control(Command::Unsubscribe) => {
                self.subscription = None;
                self.pending_completion = None;
            }
        }
    }

    fn mix_into(&mut self, frame: &mut [f32]) {
        if !self.playing {
            return;
        }
        let Some(audio) = self.audio.as_ref() else {
            self.playing = false;
            return;
        };

        if self.position >= audio.frames() {
            self.playing = false;
            // The token is captured now, a later Subscribe belongs to the next run
            self.pending_completion = Some(self.subscription.take());
            return;
        }

        for (ch, sample) in frame.iter_mut().enumerate() {
            *sample += audio.sample_for_output(self.position, ch);
        }
        self.position += 1;
    }
}

/// Two-voice mixer run inside the output callback.
pub struct Mixer {
    voices: [VoiceState; 2],
}

impl Mixer {
    pub fn new() -> Self {
        Self {
            voices: [VoiceState::new(Voice::LeadIn), VoiceState::new(Voice::Track)],
        }
    }

    pub fn apply(&mut self, voice: Voice, message: VoiceMessage) {
        self.voices[voice.index()].apply(message);
    }

    /// Sum every playing voice into one output frame.
    pub fn render_frame(&mut self, frame: &mut [f32]) {
        frame.fill(0.0);
        for voice in &mut self.voices {
            voice.mix_into(frame);
        }
    }

    /// Publish positions and natural completions for the block just rendered.
    /// A completion that does not fit stays pending until the next block.
    pub fn report(&mut self, status: &mut rtrb::Producer<Status>) {
        for state in &mut self.voices {
            if let Some(token) = state.pending_completion {
                let event = Status::Completed {
                    voice: state.voice,
                    token,
                };
                if status.push(event).is_ok() {
                    state.pending_completion = None;
                }
            } else if state.playing && status.slots() > COMPLETION_RESERVE {
                let _ = status.push(Status::Position {
                    voice: state.voice,
                    frame: state.position as u64,
                });
            }
        }
    }

    pub fn is_playing(&self, voice: Voice) -> bool {
        self.voices[voice.index()].playing
    }

    pub fn position(&self, voice: Voice) -> usize {
        self.voices[voice.index()].position
    }
}

impl Default for Mixer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basedrop::Collector;

    fn load(mixer: &mut Mixer, collector: &Collector, voice: Voice, samples: Vec<f32>) {
        let audio = AudioArc::new(samples, 48000, 1);
        mixer.apply(voice, VoiceMessage::Load(Shared::new(&collector.handle(), audio)));
    }

    fn render(mixer: &mut Mixer, frames: usize) -> Vec<f32> {
        let mut out = Vec::new();
        for _ in 0..frames {
            let mut frame = [0.0f32; 2];
            mixer.render_frame(&mut frame);
            out.push(frame[0]);
        }
        out
    }

    #[test]
    fn test_paused_voice_is_silent() {
        let collector = Collector::new();
        let mut mixer = Mixer::new();
        load(&mut mixer, &collector, Voice::Track, vec![0.5; 4]);

        assert_eq!(render(&mut mixer, 4), vec![0.0; 4]);
        assert_eq!(mixer.position(Voice::Track), 0);
    }

    #[test]
    fn test_voices_are_summed() {
        let collector = Collector::new();
        let mut mixer = Mixer::new();
        load(&mut mixer, &collector, Voice::LeadIn, vec![0.25; 4]);
        load(&mut mixer, &collector, Voice::Track, vec![0.5; 4]);
        mixer.apply(Voice::LeadIn, VoiceMessage::Control(Command::Play));
        mixer.apply(Voice::Track, VoiceMessage::Control(Command::Play));

        assert_eq!(render(&mut mixer, 2), vec![0.75, 0.75]);
    }

    #[test]
    fn test_completion_carries_subscription_once() {
        let collector = Collector::new();
        let (mut tx, mut rx) = rtrb::RingBuffer::<Status>::new(16);
        let mut mixer = Mixer::new();
        load(&mut mixer, &collector, Voice::LeadIn, vec![0.1; 2]);
        mixer.apply(Voice::LeadIn, VoiceMessage::Control(Command::Play));
        mixer.apply(
            Voice::LeadIn,
            VoiceMessage::Control(Command::Subscribe { token: Token(3) }),
        );

        render(&mut mixer, 3);
        mixer.report(&mut tx);
        render(&mut mixer, 3);
        mixer.report(&mut tx);

        let mut completions = Vec::new();
        while let Ok(status) = rx.pop() {
            if let Status::Completed { voice, token } = status {
                completions.push((voice, token));
            }
        }
        assert_eq!(completions, vec![(Voice::LeadIn, Some(Token(3)))]);
        assert!(!mixer.is_playing(Voice::LeadIn));
    }

    #[test]
    fn test_rewind_resets_position() {
        let collector = Collector::new();
        let mut mixer = Mixer::new();
        load(&mut mixer, &collector, Voice::Track, vec![0.1, 0.2, 0.3, 0.4]);
        mixer.apply(Voice::Track, VoiceMessage::Control(Command::Play));
        render(&mut mixer, 3);
        mixer.apply(Voice::Track, VoiceMessage::Control(Command::Pause));
        mixer.apply(Voice::Track, VoiceMessage::Control(Command::Rewind));

        assert_eq!(mixer.position(Voice::Track), 0);
        mixer.apply(Voice::Track, VoiceMessage::Control(Command::Play));
        assert_eq!(render(&mut mixer, 1), vec![0.1]);
    }

    #[test]
    fn test_load_stops_playback() {
        let collector = Collector::new();
        let mut mixer = Mixer::new();
        load(&mut mixer, &collector, Voice::Track, vec![0.1; 8]);
        mixer.apply(Voice::Track, VoiceMessage::Control(Command::Play));
        render(&mut mixer, 2);
        load(&mut mixer, &collector, Voice::Track, vec![0.9; 8]);

        assert!(!mixer.is_playing(Voice::Track));
        assert_eq!(mixer.position(Voice::Track), 0);
    }

    #[test]
    fn test_play_without_audio_does_nothing() {
        let mut mixer = Mixer::new();
        mixer.apply(Voice::Track, VoiceMessage::Control(Command::Play));
        assert!(!mixer.is_playing(Voice::Track));
    }

    fn completions(rx: &mut rtrb::Consumer<Status>) -> Vec<Option<Token>> {
        let mut out = Vec::new();
        while let Ok(status) = rx.pop() {
            if let Status::Completed { token, .. } = status {
                out.push(token);
            }
        }
        out
    }

    #[test]
    fn test_unreported_completion_not_carried_into_next_run() {
        let collector = Collector::new();
        let (mut tx, mut rx) = rtrb::RingBuffer::<Status>::new(1);
        let mut mixer = Mixer::new();
        load(&mut mixer, &collector, Voice::LeadIn, vec![0.1; 4]);
        mixer.apply(Voice::LeadIn, VoiceMessage::Control(Command::Play));
        mixer.apply(
            Voice::LeadIn,
            VoiceMessage::Control(Command::Subscribe { token: Token(1) }),
        );

        // Host not draining: the ring is already full when the clip ends
        tx.push(Status::Position {
            voice: Voice::Track,
            frame: 0,
        })
        .unwrap();
        render(&mut mixer, 5);
        mixer.report(&mut tx);
        assert!(completions(&mut rx).is_empty());

        // Next activation restarts the same clip under a new token
        for command in [
            Command::Unsubscribe,
            Command::Pause,
            Command::Rewind,
            Command::Play,
            Command::Subscribe { token: Token(2) },
        ] {
            mixer.apply(Voice::LeadIn, VoiceMessage::Control(command));
        }
        render(&mut mixer, 1);
        mixer.report(&mut tx);
        assert!(completions(&mut rx).is_empty());
        assert!(mixer.is_playing(Voice::LeadIn));

        render(&mut mixer, 4);
        mixer.report(&mut tx);
        assert_eq!(completions(&mut rx), vec![Some(Token(2))]);
    }

    #[test]
    fn test_pending_completion_reported_once_ring_has_room() {
        let collector = Collector::new();
        let (mut tx, mut rx) = rtrb::RingBuffer::<Status>::new(1);
        let mut mixer = Mixer::new();
        load(&mut mixer, &collector, Voice::LeadIn, vec![0.1; 2]);
        mixer.apply(Voice::LeadIn, VoiceMessage::Control(Command::Play));
        mixer.apply(
            Voice::LeadIn,
            VoiceMessage::Control(Command::Subscribe { token: Token(4) }),
        );

        tx.push(Status::Position {
            voice: Voice::Track,
            frame: 0,
        })
        .unwrap();
        render(&mut mixer, 3);
        mixer.report(&mut tx);
        assert!(completions(&mut rx).is_empty());

        mixer.report(&mut tx);
        mixer.report(&mut tx);
        assert_eq!(completions(&mut rx), vec![Some(Token(4))]);
    }

    #[test]
    fn test_positions_leave_room_for_completion() {
        let collector = Collector::new();
        let (mut tx, mut rx) = rtrb::RingBuffer::<Status>::new(4);
        let mut mixer = Mixer::new();
        load(&mut mixer, &collector, Voice::Track, vec![0.1; 64]);
        load(&mut mixer, &collector, Voice::LeadIn, vec![0.1; 8]);
        mixer.apply(Voice::Track, VoiceMessage::Control(Command::Play));
        mixer.apply(Voice::LeadIn, VoiceMessage::Control(Command::Play));
        mixer.apply(
            Voice::LeadIn,
            VoiceMessage::Control(Command::Subscribe { token: Token(9) }),
        );

        // Nobody drains while the lead-in plays out
        for _ in 0..10 {
            render(&mut mixer, 1);
            mixer.report(&mut tx);
        }

        assert_eq!(completions(&mut rx), vec![Some(Token(9))]);
    }
}
