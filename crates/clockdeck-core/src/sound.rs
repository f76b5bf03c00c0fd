//! Alarm audio.
//!
//! Engines never play sound. The application reacts to `AlarmRinging` by
//! calling [`AlarmSound::play`] and to `AlarmCleared` by calling
//! [`AlarmSound::stop`]. Playback is fire-and-forget and a failure only gets
//! logged.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::error::SoundError;
use crate::events::Event;

/// One tone of the melody.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub freq_hz: u32,
    /// Offset from the start of the melody.
    pub start_ms: u64,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Melody {
    pub notes: Vec<Note>,
}

const C5: u32 = 523;
const E5: u32 = 659;
const G5: u32 = 784;
const NOTE_MS: u64 = 500;

impl Melody {
    /// C5 E5 G5 E5 twice per 4 s cycle, `repeats` cycles.
    pub fn alarm(repeats: u32) -> Self {
        const PATTERN: [u32; 8] = [C5, E5, G5, E5, C5, E5, G5, E5];
        let cycle_ms = PATTERN.len() as u64 * NOTE_MS;
        let notes = (0..u64::from(repeats))
            .flat_map(|cycle| {
                PATTERN.iter().enumerate().map(move |(i, &freq_hz)| Note {
                    freq_hz,
                    start_ms: cycle * cycle_ms + i as u64 * NOTE_MS,
                    duration_ms: NOTE_MS,
                })
            })
            .collect();
        Self { notes }
    }

    pub fn duration_ms(&self) -> u64 {
        self.notes
            .iter()
            .map(|n| n.start_ms + n.duration_ms)
            .max()
            .unwrap_or(0)
    }
}

impl Default for Melody {
    fn default() -> Self {
        Self::alarm(3)
    }
}

/// Something that can voice the alarm.
pub trait AlarmSound {
    /// Start playback. Must return promptly; any earlier playback is stopped.
    fn play(&mut self, melody: &Melody) -> Result<(), SoundError>;
    /// Silence any playback in progress. Safe to call when idle.
    fn stop(&mut self);
}

/// Rings the terminal bell once per note onset.
///
/// The bells are written at once; terminals collapse them into a short
/// burst, which is as close to a melody as a bell gets.
pub struct TerminalBell<W: Write> {
    out: W,
    playing: bool,
}

impl TerminalBell<std::io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            playing: false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> AlarmSound for TerminalBell<W> {
    fn play(&mut self, melody: &Melody) -> Result<(), SoundError> {
        self.stop();
        let bells = "\x07".repeat(melody.notes.len());
        self.out.write_all(bells.as_bytes())?;
        self.out.flush()?;
        self.playing = true;
        Ok(())
    }

    fn stop(&mut self) {
        self.playing = false;
    }
}

/// Plays nothing; used when sound is disabled in the config.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl AlarmSound for Silent {
    fn play(&mut self, _melody: &Melody) -> Result<(), SoundError> {
        Err(SoundError::Disabled)
    }

    fn stop(&mut self) {}
}

/// React to a notification: ring on `AlarmRinging` (one cycle for
/// `TimerFinished`), silence on `AlarmCleared`. Other events are ignored.
pub fn voice<A: AlarmSound + ?Sized>(sound: &mut A, melody: &Melody, event: &Event) {
    let result = match event {
        Event::AlarmRinging { .. } => sound.play(melody),
        Event::TimerFinished { .. } => sound.play(&Melody::alarm(1)),
        Event::AlarmCleared { .. } => {
            sound.stop();
            Ok(())
        }
        _ => Ok(()),
    };
    match result {
        Ok(()) => {}
        Err(SoundError::Disabled) => tracing::debug!("alarm sound disabled"),
        Err(e) => tracing::warn!(error = %e, "could not play alarm sound"),
    }
}
