//! Sound engine: procedural chiptune effects via rodio.
//!
//! Each effect is a short note sequence rendered to mono f32 samples
//! once at startup. Playback is fire-and-forget through a detached Sink.
//!
//! Build without the "sound" feature to drop audio entirely (the stub
//! SoundEngine does nothing).

#[cfg(feature = "sound")]
mod inner {
    use std::f32::consts::TAU;

    use rodio::buffer::SamplesBuffer;
    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;

    /// One note: frequency in Hz, length in seconds.
    #[derive(Clone, Copy)]
    struct Note(f32, f32);

    /// How a note decays over its length.
    #[derive(Clone, Copy)]
    enum Envelope {
        /// Sharp attack, fast fall-off.
        Pluck,
        /// Drops to 70% by the end of the note.
        Hold,
    }

    /// Relative amplitudes of the 1st, 2nd and 3rd harmonics.
    type Timbre = [f32; 3];

    const PURE: Timbre = [1.0, 0.0, 0.0];
    const HOLLOW: Timbre = [0.7, 0.0, 0.3];
    const BRIGHT: Timbre = [0.6, 0.3, 0.1];

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_pick: Vec<f32>,
        sfx_correct: Vec<f32>,
        sfx_incorrect: Vec<f32>,
        sfx_level_up: Vec<f32>,
        sfx_level_start: Vec<f32>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    log::info!("no audio output: {e}");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_pick: gen_pick(),
                sfx_correct: gen_correct(),
                sfx_incorrect: gen_incorrect(),
                sfx_level_up: gen_level_up(),
                sfx_level_start: gen_level_start(),
            })
        }

        fn play(&self, samples: &[f32]) {
            match Sink::try_new(&self.handle) {
                Ok(sink) => {
                    sink.append(SamplesBuffer::new(1, SAMPLE_RATE, samples.to_vec()));
                    sink.detach();
                }
                Err(e) => log::debug!("sound dropped: {e}"),
            }
        }

        pub fn play_pick(&self) { self.play(&self.sfx_pick); }
        pub fn play_correct(&self) { self.play(&self.sfx_correct); }
        pub fn play_incorrect(&self) { self.play(&self.sfx_incorrect); }
        pub fn play_level_up(&self) { self.play(&self.sfx_level_up); }
        pub fn play_level_start(&self) { self.play(&self.sfx_level_start); }
    }

    // ════════════════════════════════════════════════════════════
    //  Effects
    // ════════════════════════════════════════════════════════════

    /// Fragment picked: single short tick.
    fn gen_pick() -> Vec<f32> {
        render(&[Note(880.0, 0.04)], PURE, Envelope::Pluck, 0.25)
    }

    /// Word solved: quick C6 E6 G6 arpeggio.
    fn gen_correct() -> Vec<f32> {
        render(
            &[Note(1047.0, 0.05), Note(1319.0, 0.05), Note(1568.0, 0.08)],
            HOLLOW,
            Envelope::Pluck,
            0.25,
        )
    }

    /// Wrong guess: two falling low notes.
    fn gen_incorrect() -> Vec<f32> {
        let mut samples = render(
            &[Note(311.0, 0.1), Note(233.0, 0.18)],
            PURE,
            Envelope::Hold,
            0.3,
        );
        fade_tail(&mut samples, 4);
        samples
    }

    /// Level-up offer: C5 E5 G5 C6 fanfare with a ringing last note.
    fn gen_level_up() -> Vec<f32> {
        let mut samples = render(
            &[Note(523.0, 0.1), Note(659.0, 0.1), Note(784.0, 0.1), Note(1047.0, 0.1)],
            BRIGHT,
            Envelope::Hold,
            0.3,
        );
        samples.extend(render(&[Note(1047.0, 0.25)], PURE, Envelope::Pluck, 0.3));
        samples
    }

    /// New level on the board: G5 then C6.
    fn gen_level_start() -> Vec<f32> {
        render(
            &[Note(784.0, 0.08), Note(1047.0, 0.15)],
            [0.7, 0.3, 0.0],
            Envelope::Pluck,
            0.3,
        )
    }

    // ════════════════════════════════════════════════════════════
    //  Synth
    // ════════════════════════════════════════════════════════════

    fn render(notes: &[Note], timbre: Timbre, envelope: Envelope, volume: f32) -> Vec<f32> {
        let mut samples = Vec::new();
        for &Note(freq, dur) in notes {
            let n = (SAMPLE_RATE as f32 * dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let progress = i as f32 / n as f32;
                let env = match envelope {
                    Envelope::Pluck => 1.0 - progress.sqrt(),
                    Envelope::Hold => 1.0 - progress * 0.3,
                };
                let wave: f32 = timbre
                    .iter()
                    .enumerate()
                    .map(|(h, amp)| (t * freq * (h + 1) as f32 * TAU).sin() * amp)
                    .sum();
                samples.push(wave * env * volume);
            }
        }
        samples
    }

    /// Linear fade over the last `1/fraction` of the buffer.
    fn fade_tail(samples: &mut [f32], fraction: usize) {
        let total = samples.len();
        let fade_len = total / fraction.max(1);
        if fade_len == 0 {
            return;
        }
        for (k, s) in samples[total - fade_len..].iter_mut().enumerate() {
            *s *= 1.0 - k as f32 / fade_len as f32;
        }
    }

}

// ════════════════════════════════════════════════════════════
//  Public API: compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_pick(&self) {}
    pub fn play_correct(&self) {}
    pub fn play_incorrect(&self) {}
    pub fn play_level_up(&self) {}
    pub fn play_level_start(&self) {}
}
