/// Generation counter value captured by a deferred continuation.
///
/// Tokens are compared by value: a continuation whose token differs from the
/// controller's current one belongs to a superseded activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Token(pub u64);

impl Token {
    pub fn next(self) -> Self {
        Token(self.0 + 1)
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One of the engine's two independent playback slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Voice {
    LeadIn,
    Track,
}

impl Voice {
    pub const ALL: [Voice; 2] = [Voice::LeadIn, Voice::Track];

    pub fn index(self) -> usize {
        match self {
            Voice::LeadIn => 0,
            Voice::Track => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Voice::LeadIn => "lead-in",
            Voice::Track => "track",
        }
    }
}

/// Control messages for a single voice. Audio data travels on its own ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Play,
    Pause,
    /// Seek back to the first frame without changing the play state.
    Rewind,
    /// Report the next natural completion with this token.
    Subscribe { token: Token },
    Unsubscribe,
}

/// Messages from the audio thread back to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Position { voice: Voice, frame: u64 },
    /// The voice ran past its last frame and stopped by itself.
    Completed { voice: Voice, token: Option<Token> },
}
