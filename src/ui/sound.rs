/// Sound engine: procedural 8-bit style sound effects via rodio.
///
/// All sounds are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Compile with `--no-default-features` or without "sound" feature
/// to disable audio entirely (the stub SoundEngine does nothing).

#[cfg(feature = "sound")]
mod inner {
    use std::f32::consts::TAU;
    use std::io::Cursor;
    use std::sync::Arc;

    use log::warn;
    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;

    /// Pre-generated WAV buffers for each sound effect.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_paddle: Arc<Vec<u8>>,
        sfx_wall: Arc<Vec<u8>>,
        sfx_click: Arc<Vec<u8>>,
        sfx_go: Arc<Vec<u8>>,
        sfx_game_over: Arc<Vec<u8>>,
        sfx_new_best: Arc<Vec<u8>>,
        /// Countdown beeps, indexed by digit - 1.
        sfx_count: [Arc<Vec<u8>>; 3],
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("no audio output, sound disabled: {e}");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_paddle: Arc::new(make_wav(&gen_paddle())),
                sfx_wall: Arc::new(make_wav(&gen_blip(440.0, 0.03, 0.2))),
                sfx_click: Arc::new(make_wav(&gen_blip(1200.0, 0.015, 0.15))),
                sfx_go: Arc::new(make_wav(&gen_blip(1047.0, 0.18, 0.3))),
                sfx_game_over: Arc::new(make_wav(&gen_game_over())),
                sfx_new_best: Arc::new(make_wav(&gen_new_best())),
                sfx_count: [1, 2, 3].map(|d| Arc::new(make_wav(&gen_count(d)))),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        /// Countdown beep; pitch drops with the digit.
        pub fn play_countdown(&self, shown: u32) {
            let idx = (shown.clamp(1, 3) - 1) as usize;
            self.play(&self.sfx_count[idx]);
        }

        pub fn play_paddle(&self) { self.play(&self.sfx_paddle); }
        pub fn play_wall(&self) { self.play(&self.sfx_wall); }
        pub fn play_click(&self) { self.play(&self.sfx_click); }
        pub fn play_go(&self) { self.play(&self.sfx_go); }
        pub fn play_game_over(&self) { self.play(&self.sfx_game_over); }
        pub fn play_new_best(&self) { self.play(&self.sfx_new_best); }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators — all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    fn samples_for(duration: f32) -> usize {
        (SAMPLE_RATE as f32 * duration) as usize
    }

    /// Simple sine blip at given frequency and duration
    fn gen_blip(freq: f32, duration: f32, volume: f32) -> Vec<f32> {
        let n = samples_for(duration);
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32); // linear fade out
                (t * freq * TAU).sin() * env * volume
            })
            .collect()
    }

    /// Sequence of (frequency, seconds) notes with a retro overtone.
    fn gen_notes(notes: &[(f32, f32)], volume: f32) -> Vec<f32> {
        let mut samples = Vec::new();
        for &(freq, dur) in notes {
            let n = samples_for(dur);
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32).powf(0.5);
                let wave = (t * freq * TAU).sin() * 0.7 + (t * freq * 3.0 * TAU).sin() * 0.3;
                samples.push(wave * env * volume);
            }
        }
        samples
    }

    /// Paddle hit: square-ish pop with a quick upward bend
    fn gen_paddle() -> Vec<f32> {
        let n = samples_for(0.05);
        (0..n)
            .map(|i| {
                let p = i as f32 / n as f32;
                let freq = 520.0 + p * 260.0;
                let t = i as f32 / SAMPLE_RATE as f32;
                let s = (t * freq * TAU).sin();
                s.signum() * 0.6 * (1.0 - p) * 0.3
            })
            .collect()
    }

    /// Countdown digit: 3 → low, 1 → high
    fn gen_count(digit: u32) -> Vec<f32> {
        let freq = 880.0 - (digit as f32 - 1.0) * 110.0;
        gen_blip(freq, 0.08, 0.25)
    }

    /// Game over: sad descending line with a final fade
    fn gen_game_over() -> Vec<f32> {
        let mut samples = gen_notes(&[(440.0, 0.12), (370.0, 0.12), (311.0, 0.12), (261.0, 0.2)], 0.3);
        let fade_len = samples.len() / 4;
        let total = samples.len();
        for (k, s) in samples[total - fade_len..].iter_mut().enumerate() {
            *s *= (fade_len - k) as f32 / fade_len as f32;
        }
        samples
    }

    /// New best time: ascending fanfare C5→E5→G5→C6
    fn gen_new_best() -> Vec<f32> {
        gen_notes(&[(523.0, 0.1), (659.0, 0.1), (784.0, 0.1), (1047.0, 0.3)], 0.3)
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder — wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2; // 16-bit = 2 bytes per sample
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        // RIFF header
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        // fmt chunk
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes()); // chunk size
        buf.extend_from_slice(&1u16.to_le_bytes());  // PCM format
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        // data chunk
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }

}

// ════════════════════════════════════════════════════════════
//  Public API — compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_countdown(&self, _shown: u32) {}
    pub fn play_paddle(&self) {}
    pub fn play_wall(&self) {}
    pub fn play_click(&self) {}
    pub fn play_go(&self) {}
    pub fn play_game_over(&self) {}
    pub fn play_new_best(&self) {}
}
