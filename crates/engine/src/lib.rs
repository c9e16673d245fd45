mod mixer;

use basedrop::{Collector, Handle, Shared};
use cpal::{
    FromSample, SizedSample,
    traits::{DeviceTrait, HostTrait, StreamTrait},
};
use onair_transport::{AudioArc, Command, Status, Token, Voice};
use tracing::{error, info};

pub use mixer::{MAX_OUTPUT_CHANNELS, Mixer, VoiceMessage};

const VOICE_RING_CAPACITY: usize = 64;
const STATUS_RING_CAPACITY: usize = 256;

#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    #[error("{0} command queue is full")]
    Busy(&'static str),

    #[error("nothing loaded on the {0} voice")]
    NotLoaded(&'static str),
}

/// Host side of one engine voice.
///
/// Each voice has its own command ring, so a handle can be moved into
/// whatever owns that voice without sharing the engine.
pub struct VoiceHandle {
    voice: Voice,
    messages: rtrb::Producer<VoiceMessage>,
    handle: Handle,
    loaded: bool,
}

impl VoiceHandle {
    pub fn voice(&self) -> Voice {
        self.voice
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn load(&mut self, audio: AudioArc) -> Result<(), VoiceError> {
        let shared = Shared::new(&self.handle, audio);
        self.messages
            .push(VoiceMessage::Load(shared))
            .map_err(|_| VoiceError::Busy(self.voice.name()))?;
        self.loaded = true;
        Ok(())
    }

    pub fn play(&mut self) -> Result<(), VoiceError> {
        if !self.loaded {
            return Err(VoiceError::NotLoaded(self.voice.name()));
        }
        self.send(Command::Play)
    }

    pub fn pause(&mut self) -> Result<(), VoiceError> {
        self.send(Command::Pause)
    }

    pub fn rewind(&mut self) -> Result<(), VoiceError> {
        self.send(Command::Rewind)
    }

    pub fn subscribe(&mut self, token: Token) -> Result<(), VoiceError> {
        self.send(Command::Subscribe { token })
    }

    pub fn unsubscribe(&mut self) -> Result<(), VoiceError> {
        self.send(Command::Unsubscribe)
    }

    fn send(&mut self, command: Command) -> Result<(), VoiceError> {
        self.messages
            .push(VoiceMessage::Control(command))
            .map_err(|_| VoiceError::Busy(self.voice.name()))
    }
}

/// Keeps the output stream alive and collects what the audio thread reports.
pub struct AudioEngineHandle {
    pub status: rtrb::Consumer<Status>,
    pub collector: Collector,
    sample_rate: u32,
    channels: u16,
    _stream: cpal::Stream,
}

impl AudioEngineHandle {
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Drain pending status messages and free buffers the audio thread released.
    pub fn drain(&mut self) -> Vec<Status> {
        let mut events = Vec::new();
        while let Ok(status) = self.status.pop() {
            events.push(status);
        }
        self.collector.collect();
        events
    }
}

pub struct Engine {
    pub handle: AudioEngineHandle,
    pub lead_in: VoiceHandle,
    pub track: VoiceHandle,
}

pub fn start() -> anyhow::Result<Engine> {
    let collector = Collector::new();
    let handle = collector.handle();

    let (lead_in_tx, lead_in_rx) = rtrb::RingBuffer::<VoiceMessage>::new(VOICE_RING_CAPACITY);
    let (track_tx, track_rx) = rtrb::RingBuffer::<VoiceMessage>::new(VOICE_RING_CAPACITY);
    let (status_tx, status_rx) = rtrb::RingBuffer::<Status>::new(STATUS_RING_CAPACITY);

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow::anyhow!("no output device found"))?;

    let config = device.default_output_config()?;
    let sample_format = config.sample_format();
    let stream_config: cpal::StreamConfig = config.into();
    let sample_rate = stream_config.sample_rate.0;
    let channels = stream_config.channels;

    let stream = match sample_format {
        cpal::SampleFormat::F32 => {
            build_stream::<f32>(&device, &stream_config, lead_in_rx, track_rx, status_tx)?
        }
        cpal::SampleFormat::I16 => {
            build_stream::<i16>(&device, &stream_config, lead_in_rx, track_rx, status_tx)?
        }
        sample_format => anyhow::bail!("unsupported sample format '{sample_format}'"),
    };

    stream.play()?;
    info!(sample_rate, channels, "audio output started");

    Ok(Engine {
        handle: AudioEngineHandle {
            status: status_rx,
            collector,
            sample_rate,
            channels,
            _stream: stream,
        },
        lead_in: VoiceHandle {
            voice: Voice::LeadIn,
            messages: lead_in_tx,
            handle: handle.clone(),
            loaded: false,
        },
        track: VoiceHandle {
            voice: Voice::Track,
            messages: track_tx,
            handle,
            loaded: false,
        },
    })
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut lead_in_rx: rtrb::Consumer<VoiceMessage>,
    mut track_rx: rtrb::Consumer<VoiceMessage>,
    mut status_tx: rtrb::Producer<Status>,
) -> anyhow::Result<cpal::Stream>
where
    T: SizedSample + FromSample<f32>,
{
    let output_channels = config.channels as usize;
    let mut mixer = Mixer::new();

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            while let Ok(message) = lead_in_rx.pop() {
                mixer.apply(Voice::LeadIn, message);
            }
            while let Ok(message) = track_rx.pop() {
                mixer.apply(Voice::Track, message);
            }

            let mixed_channels = output_channels.min(MAX_OUTPUT_CHANNELS);
            for frame in data.chunks_mut(output_channels) {
                let mut mixed = [0.0f32; MAX_OUTPUT_CHANNELS];
                mixer.render_frame(&mut mixed[..mixed_channels]);
                for (ch, sample) in frame.iter_mut().enumerate() {
                    *sample = T::from_sample(mixed.get(ch).copied().unwrap_or(0.0));
                }
            }

            mixer.report(&mut status_tx);
        },
        |err| error!("stream error: {err}"),
        None,
    )?;

    Ok(stream)
}
