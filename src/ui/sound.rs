//! Sound engine: procedural chiptune-style effects through rodio.
//!
//! Every effect is synthesized once at startup into an in-memory WAV
//! buffer; playback clones the Arc, hands it to a detached sink, and
//! returns immediately. Built without the "sound" feature the stub
//! engine at the bottom compiles to no-ops.

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;
    const TAU: f32 = std::f32::consts::TAU;

    /// One pre-rendered WAV buffer per effect.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_jump: Arc<[u8]>,
        sfx_coin: Arc<[u8]>,
        sfx_throw: Arc<[u8]>,
        sfx_squash: Arc<[u8]>,
        sfx_boss_hurt: Arc<[u8]>,
        sfx_boss_dead: Arc<[u8]>,
        sfx_char_dead: Arc<[u8]>,
    }

    impl SoundEngine {
        /// None when no audio device is available; the game then runs
        /// silent.
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;
            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_jump: encode_wav(&gen_jump()).into(),
                sfx_coin: encode_wav(&gen_coin()).into(),
                sfx_throw: encode_wav(&gen_throw()).into(),
                sfx_squash: encode_wav(&gen_squash()).into(),
                sfx_boss_hurt: encode_wav(&gen_boss_hurt()).into(),
                sfx_boss_dead: encode_wav(&gen_boss_dead()).into(),
                sfx_char_dead: encode_wav(&gen_char_dead()).into(),
            })
        }

        fn play(&self, buf: &Arc<[u8]>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                if let Ok(src) = Decoder::new(Cursor::new(Arc::clone(buf))) {
                    sink.append(src);
                    sink.detach();
                }
            }
        }

        pub fn play_jump(&self) { self.play(&self.sfx_jump); }
        pub fn play_coin(&self) { self.play(&self.sfx_coin); }
        pub fn play_throw(&self) { self.play(&self.sfx_throw); }
        pub fn play_squash(&self) { self.play(&self.sfx_squash); }
        pub fn play_boss_hurt(&self) { self.play(&self.sfx_boss_hurt); }
        pub fn play_boss_dead(&self) { self.play(&self.sfx_boss_dead); }
        pub fn play_char_dead(&self) { self.play(&self.sfx_char_dead); }
    }

    // ════════════════════════════════════════════════════════════
    //  Synthesis helpers
    // ════════════════════════════════════════════════════════════

    fn sine(t: f32, freq: f32) -> f32 {
        (TAU * freq * t).sin()
    }

    /// Tiny LCG, good enough for percussive noise.
    fn lcg_noise(state: &mut u32) -> f32 {
        *state = state.wrapping_mul(1103515245).wrapping_add(12345);
        (*state as f32 / u32::MAX as f32) * 2.0 - 1.0
    }

    /// Append one note built from `partials` (frequency multiplier,
    /// amplitude) with a linear fade of `fade` over its length.
    fn push_note(out: &mut Vec<f32>, freq: f32, dur: f32, partials: &[(f32, f32)], fade: f32, vol: f32) {
        let n = (SAMPLE_RATE as f32 * dur) as usize;
        for i in 0..n {
            let t = i as f32 / SAMPLE_RATE as f32;
            let env = 1.0 - (i as f32 / n as f32) * fade;
            let wave: f32 = partials.iter().map(|&(mult, amp)| sine(t, freq * mult) * amp).sum();
            out.push(wave * env * vol);
        }
    }

    // ════════════════════════════════════════════════════════════
    //  Effects
    // ════════════════════════════════════════════════════════════

    /// Jump: a quick 280 to 640 Hz sweep with a soft tail.
    fn gen_jump() -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 0.09) as usize;
        let mut out = Vec::with_capacity(n);
        let mut phase = 0.0_f32;
        for i in 0..n {
            let t = i as f32 / n as f32;
            phase += (280.0 + 360.0 * t) * TAU / SAMPLE_RATE as f32;
            out.push(phase.sin() * (1.0 - t).powf(0.4) * 0.25);
        }
        out
    }

    /// Coin: two bright chime notes, B5 then E6.
    fn gen_coin() -> Vec<f32> {
        let mut out = Vec::new();
        for &(freq, dur) in &[(988.0_f32, 0.05), (1319.0, 0.12)] {
            let n = (SAMPLE_RATE as f32 * dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32).sqrt();
                let wave = sine(t, freq) * 0.7 + sine(t, freq * 2.0) * 0.3;
                out.push(wave * env * 0.28);
            }
        }
        out
    }

    /// Throw: noise over a rising tone, shaped into a short whoosh.
    fn gen_throw() -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 0.1) as usize;
        let mut seed: u32 = 22222;
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let t = i as f32 / n as f32;
            let ti = i as f32 / SAMPLE_RATE as f32;
            let tone = sine(ti, 150.0 + 350.0 * t);
            let env = (t * (1.0 - t) * 4.0).powf(0.7);
            out.push((tone * 0.3 + lcg_noise(&mut seed) * 0.7) * env * 0.22);
        }
        out
    }

    /// Stomp: a dull descending thud with a noisy edge.
    fn gen_squash() -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * 0.11) as usize;
        let mut seed: u32 = 7777;
        let mut out = Vec::with_capacity(n);
        for i in 0..n {
            let t = i as f32 / n as f32;
            let ti = i as f32 / SAMPLE_RATE as f32;
            let tone = sine(ti, 260.0 - 180.0 * t);
            let env = (1.0 - t).powf(1.2);
            out.push((tone * 0.6 + lcg_noise(&mut seed) * 0.4) * env * 0.3);
        }
        out
    }

    /// Boss hit: a harsh two-step squawk. Odd partials read as a buzz.
    fn gen_boss_hurt() -> Vec<f32> {
        let buzz = [(1.0, 0.5), (3.0, 0.3), (5.0, 0.2)];
        let mut out = Vec::new();
        for &freq in &[520.0_f32, 380.0] {
            push_note(&mut out, freq, 0.07, &buzz, 0.4, 0.28);
        }
        out
    }

    /// Boss down: an ascending G major fanfare with a held top note.
    fn gen_boss_dead() -> Vec<f32> {
        let bright = [(1.0, 0.6), (2.0, 0.3), (3.0, 0.1)];
        let mut out = Vec::new();
        for &freq in &[392.0_f32, 523.0, 659.0, 784.0] {
            push_note(&mut out, freq, 0.1, &bright, 0.3, 0.3);
        }
        // Hold the octave above the last note until it dies away.
        push_note(&mut out, 1047.0, 0.3, &[(1.0, 1.0)], 1.0, 0.3);
        out
    }

    /// Character down: a slow descending line that fades to nothing.
    fn gen_char_dead() -> Vec<f32> {
        let mut out = Vec::new();
        for &freq in &[330.0_f32, 262.0, 220.0, 175.0] {
            push_note(&mut out, freq, 0.13, &[(1.0, 1.0)], 0.3, 0.3);
        }
        let total = out.len();
        let fade = total / 4;
        for i in (total - fade)..total {
            out[i] *= (total - i) as f32 / fade as f32;
        }
        out
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoding
    // ════════════════════════════════════════════════════════════

    /// Wrap mono f32 samples as 16-bit PCM in a RIFF/WAV container.
    fn encode_wav(samples: &[f32]) -> Vec<u8> {
        const CHANNELS: u16 = 1;
        const BITS: u16 = 16;
        let data_len = (samples.len() * 2) as u32;

        let mut wav = Vec::with_capacity(44 + data_len as usize);
        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data_len).to_le_bytes());
        wav.extend_from_slice(b"WAVE");
        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
        wav.extend_from_slice(&CHANNELS.to_le_bytes());
        wav.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        wav.extend_from_slice(&(SAMPLE_RATE * CHANNELS as u32 * BITS as u32 / 8).to_le_bytes());
        wav.extend_from_slice(&(CHANNELS * BITS / 8).to_le_bytes());
        wav.extend_from_slice(&BITS.to_le_bytes());
        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_len.to_le_bytes());
        for &s in samples {
            let pcm = (s.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            wav.extend_from_slice(&pcm.to_le_bytes());
        }
        wav
    }
}

// ════════════════════════════════════════════════════════════
//  Public surface: no-ops when the sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_jump(&self) {}
    pub fn play_coin(&self) {}
    pub fn play_throw(&self) {}
    pub fn play_squash(&self) {}
    pub fn play_boss_hurt(&self) {}
    pub fn play_boss_dead(&self) {}
    pub fn play_char_dead(&self) {}
}
