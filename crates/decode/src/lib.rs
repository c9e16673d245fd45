use std::collections::HashMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use onair_transport::AudioArc;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

/// Resolve a clip path against the assets root.
/// Accepts paths that exist as given, or paths relative to `assets_root`.
pub fn resolve_clip_path(assets_root: &Path, path: &Path) -> Option<PathBuf> {
    if path.exists() {
        return Some(path.to_path_buf());
    }

    let with_root = assets_root.join(path);
    if with_root.exists() {
        return Some(with_root);
    }

    None
}

pub fn decode_file(assets_root: &Path, path: &Path) -> anyhow::Result<AudioArc> {
    let resolved = resolve_clip_path(assets_root, path)
        .ok_or_else(|| anyhow::anyhow!("clip not found: {}", path.display()))?;
    decode_file_direct(&resolved)
}

pub fn decode_file_direct(path: &Path) -> anyhow::Result<AudioArc> {
    let file = File::open(path)?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;

    let mut format = probed.format;

    let track = format
        .default_track()
        .ok_or_else(|| anyhow::anyhow!("no default track in {}", path.display()))?;

    let sample_rate = track.codec_params.sample_rate.unwrap_or(44100);
    let mut channels = track.codec_params.channels.map(|c| c.count()).unwrap_or(0) as u16;
    let track_id = track.id;

    let mut decoder =
        symphonia::default::get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut samples = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(decoded) => decoded,
            // A corrupt frame in an mp3 is not worth losing the whole clip over
            Err(symphonia::core::errors::Error::DecodeError(e)) => {
                debug!(path = %path.display(), "skipping undecodable packet: {e}");
                continue;
            }
            Err(e) => return Err(e.into()),
        };
        let spec = *decoded.spec();
        if channels == 0 {
            channels = spec.channels.count() as u16;
        }

        let mut sample_buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);
        samples.extend_from_slice(sample_buf.samples());
    }

    let channels = channels.max(1);
    // Drop a trailing partial frame rather than panic in AudioArc::new
    samples.truncate(samples.len() - samples.len() % channels as usize);

    debug!(
        path = %path.display(),
        sample_rate,
        channels,
        frames = samples.len() / channels as usize,
        "decoded clip"
    );

    Ok(AudioArc::new(samples, sample_rate, channels))
}

/// Decoded clips keyed by resolved path, optionally converted to one output rate.
///
/// Every activation reloads the lead-in clip, so the cache keeps that from
/// hitting the decoder more than once. Fill it with [`AudioCache::preload`]
/// up front and later lookups never touch the filesystem or the decoder.
#[derive(Debug, Default)]
pub struct AudioCache {
    assets_root: PathBuf,
    target_sample_rate: Option<u32>,
    clips: HashMap<PathBuf, AudioArc>,
    /// Requested path to the resolved path it was decoded from.
    aliases: HashMap<PathBuf, PathBuf>,
}

impl AudioCache {
    pub fn new(assets_root: impl Into<PathBuf>, target_sample_rate: Option<u32>) -> Self {
        Self {
            assets_root: assets_root.into(),
            target_sample_rate,
            clips: HashMap::new(),
            aliases: HashMap::new(),
        }
    }

    pub fn assets_root(&self) -> &Path {
        &self.assets_root
    }

    /// Already decoded, without resolving or decoding anything.
    pub fn get(&self, path: &Path) -> Option<AudioArc> {
        let resolved = self.aliases.get(path)?;
        self.clips.get(resolved).cloned()
    }

    /// Decode every clip in `paths`. Clips that fail are returned with their
    /// error and left out; asking for them later fails the same way.
    pub fn preload<'a>(
        &mut self,
        paths: impl IntoIterator<Item = &'a Path>,
    ) -> Vec<(PathBuf, anyhow::Error)> {
        paths
            .into_iter()
            .filter_map(|path| {
                self.get_or_decode(path)
                    .err()
                    .map(|e| (path.to_path_buf(), e))
            })
            .collect()
    }

    pub fn get_or_decode(&mut self, path: &Path) -> anyhow::Result<AudioArc> {
        if let Some(audio) = self.get(path) {
            return Ok(audio);
        }

        let resolved = resolve_clip_path(&self.assets_root, path)
            .ok_or_else(|| anyhow::anyhow!("clip not found: {}", path.display()))?;

        if let Some(audio) = self.clips.get(&resolved).cloned() {
            self.aliases.insert(path.to_path_buf(), resolved);
            return Ok(audio);
        }

        let mut audio = decode_file_direct(&resolved)?;
        if let Some(rate) = self.target_sample_rate {
            audio = audio.resample(rate)?;
        }
        self.aliases.insert(path.to_path_buf(), resolved.clone());
        self.clips.insert(resolved, audio.clone());
        Ok(audio)
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }
}
