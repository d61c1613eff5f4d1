// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! Absolute pitches and the arithmetic that moves them around.

use crate::error::{MidiVrError, Result};
use midly::num::u7;
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, fmt, str::FromStr};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;

/// The twelve semitones of an octave, sharps only. The discriminant is the
/// semitone's offset from C.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    EnumIter,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum NoteLabel {
    #[default]
    C = 0,
    Cs = 1,
    D = 2,
    Ds = 3,
    E = 4,
    F = 5,
    Fs = 6,
    G = 7,
    Gs = 8,
    A = 9,
    As = 10,
    B = 11,
}
impl NoteLabel {
    /// The semitone offset from C, 0..=11.
    pub const fn ordinal(&self) -> u8 {
        *self as u8
    }

    /// Maps any integer onto a label, wrapping every twelve semitones.
    pub fn from_semitone(semitone: i32) -> Self {
        Self::iter()
            .nth(semitone.rem_euclid(Pitch::OCTAVE_LENGTH) as usize)
            .unwrap_or_default()
    }

    /// The display name, e.g. `C#`.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::C => "C",
            Self::Cs => "C#",
            Self::D => "D",
            Self::Ds => "D#",
            Self::E => "E",
            Self::F => "F",
            Self::Fs => "F#",
            Self::G => "G",
            Self::Gs => "G#",
            Self::A => "A",
            Self::As => "A#",
            Self::B => "B",
        }
    }
}
impl fmt::Display for NoteLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
impl FromStr for NoteLabel {
    type Err = MidiVrError;

    /// Accepts `C`, `C#`, `Cs`, and flats like `Db` or `Bb`.
    fn from_str(s: &str) -> Result<Self> {
        let mut chars = s.trim().chars();
        let natural = match chars.next().map(|c| c.to_ascii_uppercase()) {
            Some('C') => 0,
            Some('D') => 2,
            Some('E') => 4,
            Some('F') => 5,
            Some('G') => 7,
            Some('A') => 9,
            Some('B') => 11,
            _ => return Err(MidiVrError::ParsePitch(s.to_string())),
        };
        let accidental = match chars.as_str() {
            "" => 0,
            "#" | "s" | "S" => 1,
            "b" => -1,
            _ => return Err(MidiVrError::ParsePitch(s.to_string())),
        };
        Ok(Self::from_semitone(natural + accidental))
    }
}

/// An absolute pitch: a [NoteLabel] in a given octave.
///
/// The absolute index is `octave * 12 + label`, so C5 is 60, which is also
/// its MIDI key number. Two pitches are equal exactly when their absolute
/// indices are equal, and they order the same way.
///
/// Pitches are immutable. Arithmetic goes through the absolute index and
/// returns a new value. It never fails; a pitch below zero simply lands in a
/// negative octave (index -1 is B-1), and it's the MIDI encoder's job to
/// reject whatever can't go on the wire.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Pitch {
    label: NoteLabel,
    octave: i32,
}
impl Default for Pitch {
    fn default() -> Self {
        Self::DEFAULT
    }
}
impl Pitch {
    /// Number of semitones in an octave.
    pub const OCTAVE_LENGTH: i32 = 12;

    /// The highest index a MIDI data byte can carry.
    pub const MAX_MIDI_KEY: i32 = 127;

    /// C5, MIDI key 60.
    pub const DEFAULT: Self = Self::new(NoteLabel::C, 5);

    #[allow(missing_docs)]
    pub const fn new(label: NoteLabel, octave: i32) -> Self {
        Self { label, octave }
    }

    /// Rebuilds a pitch from its absolute index. Lossless for every `i32`.
    pub fn from_absolute_index(index: i32) -> Self {
        Self {
            label: NoteLabel::from_semitone(index),
            octave: index.div_euclid(Self::OCTAVE_LENGTH),
        }
    }

    /// `octave * 12 + label`.
    pub fn absolute_index(&self) -> i32 {
        self.octave
            .saturating_mul(Self::OCTAVE_LENGTH)
            .saturating_add(self.label.ordinal() as i32)
    }

    #[allow(missing_docs)]
    pub const fn label(&self) -> NoteLabel {
        self.label
    }

    #[allow(missing_docs)]
    pub const fn octave(&self) -> i32 {
        self.octave
    }

    /// The same label in a different octave.
    pub const fn with_octave(&self, octave: i32) -> Self {
        Self::new(self.label, octave)
    }

    /// Moves the pitch by `semitones`, up if positive.
    pub fn pitch(&self, semitones: i32) -> Self {
        Self::from_absolute_index(self.absolute_index().saturating_add(semitones))
    }

    #[allow(missing_docs)]
    pub fn pitch_up(&self, semitones: i32) -> Self {
        self.pitch(semitones)
    }

    #[allow(missing_docs)]
    pub fn pitch_down(&self, semitones: i32) -> Self {
        Self::from_absolute_index(self.absolute_index().saturating_sub(semitones))
    }

    /// The 7-bit MIDI key number for this pitch, if it has one.
    pub fn midi_key(&self) -> Result<u7> {
        let index = self.absolute_index();
        if (0..=Self::MAX_MIDI_KEY).contains(&index) {
            Ok(u7::from(index as u8))
        } else {
            Err(MidiVrError::PitchOutOfRange(index))
        }
    }
}
impl Ord for Pitch {
    fn cmp(&self, other: &Self) -> Ordering {
        self.absolute_index().cmp(&other.absolute_index())
    }
}
impl PartialOrd for Pitch {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl fmt::Display for Pitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.label, self.octave)
    }
}
impl FromStr for Pitch {
    type Err = MidiVrError;

    /// Parses `C5`, `F#3`, `Bb4`, or `B-1`.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s
            .char_indices()
            .skip(1)
            .find(|(_, c)| c.is_ascii_digit() || *c == '-')
            .map(|(i, _)| i)
            .ok_or_else(|| MidiVrError::ParsePitch(s.to_string()))?;
        let (label, octave) = s.split_at(split);
        let label: NoteLabel = label.parse()?;
        let octave: i32 = octave
            .parse()
            .map_err(|_| MidiVrError::ParsePitch(s.to_string()))?;
        // Flats and sharps that cross the octave boundary (Cb, B#) keep the
        // written octave, matching how the label alone wraps.
        Ok(Self::new(label, octave))
    }
}
impl From<u7> for Pitch {
    fn from(value: u7) -> Self {
        Self::from_absolute_index(value.as_int() as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_index_round_trips() {
        for index in -30..160 {
            let p = Pitch::from_absolute_index(index);
            assert_eq!(p.absolute_index(), index);
            assert_eq!(Pitch::from_absolute_index(p.absolute_index()), p);
        }
        for label in NoteLabel::iter() {
            let p = Pitch::new(label, 3);
            assert_eq!(Pitch::from_absolute_index(p.absolute_index()), p);
        }
    }

    #[test]
    fn labels_wrap_every_octave() {
        assert_eq!(NoteLabel::from_semitone(-1), NoteLabel::B);
        assert_eq!(NoteLabel::from_semitone(-12), NoteLabel::C);
        assert_eq!(NoteLabel::from_semitone(12), NoteLabel::C);
        assert_eq!(NoteLabel::from_semitone(25), NoteLabel::Cs);
        for (i, label) in NoteLabel::iter().enumerate() {
            assert_eq!(label.ordinal() as usize, i);
            assert_eq!(NoteLabel::from_semitone(i as i32), label);
        }
    }

    #[test]
    fn arithmetic_is_additive() {
        let p = Pitch::new(NoteLabel::D, 4);
        for n in -20..20 {
            for m in -20..20 {
                assert_eq!(p.pitch(n).pitch(m), p.pitch(n + m));
            }
        }
        assert_eq!(p.pitch_up(5), p.pitch(5));
        assert_eq!(p.pitch_down(5), p.pitch(-5));
    }

    #[test]
    fn octave_boundaries() {
        let b4 = Pitch::new(NoteLabel::B, 4);
        assert_eq!(b4.pitch_up(1), Pitch::new(NoteLabel::C, 5));
        assert_eq!(Pitch::DEFAULT.pitch_down(1), b4);
        assert_eq!(Pitch::DEFAULT.absolute_index(), 60);
    }

    #[test]
    fn negative_indices_land_in_negative_octaves() {
        let p = Pitch::new(NoteLabel::C, 0).pitch_down(1);
        assert_eq!(p.label(), NoteLabel::B);
        assert_eq!(p.octave(), -1);
        assert_eq!(p.absolute_index(), -1);
        assert_eq!(p.to_string(), "B-1");
        assert_eq!(p.midi_key(), Err(MidiVrError::PitchOutOfRange(-1)));
    }

    #[test]
    fn midi_key_range() {
        assert_eq!(Pitch::from_absolute_index(0).midi_key().unwrap().as_int(), 0);
        assert_eq!(
            Pitch::from_absolute_index(127).midi_key().unwrap().as_int(),
            127
        );
        assert_eq!(
            Pitch::from_absolute_index(128).midi_key(),
            Err(MidiVrError::PitchOutOfRange(128))
        );
    }

    #[test]
    fn ordering_follows_absolute_index() {
        let a = Pitch::new(NoteLabel::B, 3);
        let b = Pitch::new(NoteLabel::C, 4);
        assert!(a < b);
        assert_eq!(a.max(b), b);
    }

    #[test]
    fn parse_and_display() {
        assert_eq!("C5".parse::<Pitch>().unwrap(), Pitch::DEFAULT);
        assert_eq!(
            "F#3".parse::<Pitch>().unwrap(),
            Pitch::new(NoteLabel::Fs, 3)
        );
        assert_eq!(
            "bb4".parse::<Pitch>().unwrap(),
            Pitch::new(NoteLabel::As, 4)
        );
        assert_eq!(
            "Cs2".parse::<Pitch>().unwrap(),
            Pitch::new(NoteLabel::Cs, 2)
        );
        assert_eq!(
            "B-1".parse::<Pitch>().unwrap(),
            Pitch::from_absolute_index(-1)
        );
        assert!("H2".parse::<Pitch>().is_err());
        assert!("C".parse::<Pitch>().is_err());
        assert!("C#x".parse::<Pitch>().is_err());

        for index in 0..128 {
            let p = Pitch::from_absolute_index(index);
            assert_eq!(p.to_string().parse::<Pitch>().unwrap(), p);
        }
    }
}
