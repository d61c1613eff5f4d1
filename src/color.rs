// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! Scale and chord "colors": bitmask blueprints that say which semitones above
//! a root belong to a scale or chord.
//!
//! Bit *i* set means the note *i* semitones above the root is a member. A C
//! major chord is C, E and G:
//!
//! ```text
//! Notes:  B   A#  A   G#  G   F#  F   E   D#  D   C#  C
//! Order:  11  10  9   8   7   6   5   4   3   2   1   0
//! Bits:   0   0   0   0   1   0   0   1   0   0   0   1
//! ```
//!
//! Several names can share a mask (Ionian is Major), so colors are mask
//! newtypes with a name table on the side rather than enums.

use crate::error::{MidiVrError, Result};
use std::{fmt, str::FromStr};

/// What [ScaleColor] and [ChordColor] have in common.
pub trait IsColor: Copy + fmt::Debug {
    /// How many bits of the mask are scanned, from bit 0 upward.
    const RESOLUTION: u32;

    /// The raw bitmask. Bit 0 is always set.
    fn mask(&self) -> u32;

    /// The set bit offsets in ascending order, root (0) first.
    fn intervals(&self) -> Intervals {
        Intervals {
            mask: self.mask(),
            bit: 0,
            resolution: Self::RESOLUTION,
        }
    }

    /// The number of notes this color puts in a collection.
    fn note_count(&self) -> usize {
        self.mask().count_ones() as usize
    }
}

/// Iterator over the set bits of a color mask.
#[derive(Clone, Debug)]
pub struct Intervals {
    mask: u32,
    bit: u32,
    resolution: u32,
}
impl Iterator for Intervals {
    type Item = i32;

    fn next(&mut self) -> Option<Self::Item> {
        while self.bit < self.resolution {
            let bit = self.bit;
            self.bit += 1;
            if (self.mask >> bit) & 1 == 1 {
                return Some(bit as i32);
            }
        }
        None
    }
}

// Names compare case-insensitively with separators dropped, so "minor-seventh",
// "MinorSeventh" and "minor_seventh" are the same name.
fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn lookup<C: Copy>(table: &[(&'static str, C)], name: &str) -> Option<C> {
    let wanted = normalize_name(name);
    table
        .iter()
        .find(|(n, _)| normalize_name(n) == wanted)
        .map(|(_, c)| *c)
}

/// A scale blueprint with 12-bit resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ScaleColor(u16);
#[allow(missing_docs)]
impl ScaleColor {
    pub const MAJOR: Self = Self::from_bits(&[0, 2, 4, 5, 7, 9, 11]);
    pub const HARMONIC_MINOR: Self = Self::from_bits(&[0, 2, 3, 5, 7, 8, 11]);
    pub const MELODIC_MINOR: Self = Self::from_bits(&[0, 2, 3, 5, 7, 9, 11]);
    pub const NATURAL_MINOR: Self = Self::from_bits(&[0, 2, 3, 5, 7, 8, 10]);
    pub const IONIAN: Self = Self::MAJOR;
    pub const DORIAN: Self = Self::MELODIC_MINOR;
    pub const PHRYGIAN: Self = Self::from_bits(&[0, 1, 3, 5, 7, 8, 10]);
    pub const LYDIAN: Self = Self::from_bits(&[0, 2, 4, 6, 7, 9, 11]);
    pub const MIXOLYDIAN: Self = Self::from_bits(&[0, 2, 4, 5, 7, 9, 10]);
    pub const AEOLIAN: Self = Self::NATURAL_MINOR;
    pub const LOCRIAN: Self = Self::from_bits(&[0, 1, 3, 5, 6, 8, 10]);

    /// Canonical names come before their aliases.
    const NAMED: &'static [(&'static str, Self)] = &[
        ("Major", Self::MAJOR),
        ("HarmonicMinor", Self::HARMONIC_MINOR),
        ("MelodicMinor", Self::MELODIC_MINOR),
        ("NaturalMinor", Self::NATURAL_MINOR),
        ("Phrygian", Self::PHRYGIAN),
        ("Lydian", Self::LYDIAN),
        ("Mixolydian", Self::MIXOLYDIAN),
        ("Locrian", Self::LOCRIAN),
        ("Ionian", Self::IONIAN),
        ("Dorian", Self::DORIAN),
        ("Aeolian", Self::AEOLIAN),
    ];

    const fn from_bits(bits: &[u8]) -> Self {
        let mut mask = 0u16;
        let mut i = 0;
        while i < bits.len() {
            mask |= 1 << bits[i];
            i += 1;
        }
        Self(mask | 1)
    }

    /// Any 12-bit mask is a scale. The root bit is forced on and bits above
    /// the resolution are dropped.
    pub const fn new(mask: u16) -> Self {
        Self((mask & 0x0fff) | 1)
    }

    /// The canonical name of this mask, if it has one.
    pub fn name(&self) -> Option<&'static str> {
        Self::NAMED
            .iter()
            .find(|(_, c)| c == self)
            .map(|(n, _)| *n)
    }

    /// Finds a color by canonical name or alias.
    pub fn from_name(name: &str) -> Result<Self> {
        lookup(Self::NAMED, name).ok_or_else(|| MidiVrError::UnknownColor(name.to_string()))
    }

    /// Every distinct named scale, once each.
    pub fn all() -> impl Iterator<Item = (&'static str, Self)> {
        Self::NAMED
            .iter()
            .copied()
            .filter(|(n, c)| c.name() == Some(*n))
    }
}
impl Default for ScaleColor {
    fn default() -> Self {
        Self::MAJOR
    }
}
impl IsColor for ScaleColor {
    const RESOLUTION: u32 = 12;

    fn mask(&self) -> u32 {
        self.0 as u32
    }
}
impl FromStr for ScaleColor {
    type Err = MidiVrError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}
impl fmt::Display for ScaleColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{:#014b}", self.0),
        }
    }
}

/// A chord blueprint. The mask is 32 bits wide and always scanned in full, so
/// extended chords can reach above the octave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChordColor(u32);
#[allow(missing_docs)]
impl ChordColor {
    pub const MAJOR: Self = Self::from_bits(&[0, 4, 7]);
    pub const MINOR: Self = Self::from_bits(&[0, 3, 7]);

    pub const AUGMENTED: Self = Self::from_bits(&[0, 4, 8]);
    pub const DIMINISHED: Self = Self::from_bits(&[0, 3, 6]);

    pub const FULL_AUGMENTED: Self = Self::from_bits(&[0, 4, 8, 12]);
    pub const DIMINISHED_SEVENTH: Self = Self::from_bits(&[0, 3, 6, 9]);

    pub const HALF_DIMINISHED_SEVENTH: Self = Self::from_bits(&[0, 3, 6, 10]);
    pub const MINOR_SEVENTH_FLAT_FIVE: Self = Self::HALF_DIMINISHED_SEVENTH;
    pub const MAJOR_SEVENTH_FLAT_FIVE: Self = Self::from_bits(&[0, 4, 6, 10]);

    pub const AUGMENTED_NINTH: Self = Self::from_bits(&[0, 4, 7, 10, 15]);
    pub const HENDRIX: Self = Self::AUGMENTED_NINTH;
    pub const MINOR_SEVENTH_NINTH: Self = Self::from_bits(&[0, 3, 7, 10, 14]);

    pub const MAJOR_SEVENTH: Self = Self::from_bits(&[0, 4, 7, 11]);
    pub const MINOR_SEVENTH: Self = Self::from_bits(&[0, 3, 7, 10]);

    pub const MAJOR_SIXTH: Self = Self::from_bits(&[0, 4, 7, 9]);
    pub const MINOR_SIXTH: Self = Self::from_bits(&[0, 3, 7, 9]);

    pub const MAJOR_SIXTH_NINTH: Self = Self::from_bits(&[0, 4, 7, 9, 14]);
    pub const MINOR_SIXTH_NINTH: Self = Self::from_bits(&[0, 3, 7, 9, 14]);

    pub const MAJOR_NINTH: Self = Self::from_bits(&[0, 4, 7, 11, 14]);
    pub const MINOR_NINTH: Self = Self::from_bits(&[0, 3, 7, 11, 14]);

    pub const MAJOR_ELEVENTH: Self = Self::from_bits(&[0, 4, 7, 11, 14, 17]);
    pub const MINOR_ELEVENTH: Self = Self::from_bits(&[0, 3, 7, 10, 14, 17]);

    pub const DOMINANT_SEVENTH: Self = Self::from_bits(&[0, 4, 7, 10]);
    pub const MAJOR_MINOR_SEVENTH: Self = Self::DOMINANT_SEVENTH;
    pub const MINOR_MAJOR_SEVENTH: Self = Self::from_bits(&[0, 3, 7, 11]);

    pub const MU1: Self = Self::from_bits(&[0, 2, 4, 7]);
    pub const MU2: Self = Self::from_bits(&[0, 7, 14, 16]);
    pub const MU3: Self = Self::from_bits(&[0, 14, 16, 18]);

    pub const POWERCHORD: Self = Self::from_bits(&[0, 7, 12]);

    pub const SEVENTH_SUSPENSION_FOUR: Self = Self::from_bits(&[0, 5, 7, 10]);

    pub const SUSPENDED: Self = Self::from_bits(&[0, 5, 7]);

    /// Canonical names come before their aliases.
    const NAMED: &'static [(&'static str, Self)] = &[
        ("Major", Self::MAJOR),
        ("Minor", Self::MINOR),
        ("Augmented", Self::AUGMENTED),
        ("Diminished", Self::DIMINISHED),
        ("FullAugmented", Self::FULL_AUGMENTED),
        ("DiminishedSeventh", Self::DIMINISHED_SEVENTH),
        ("HalfDiminishedSeventh", Self::HALF_DIMINISHED_SEVENTH),
        ("MajorSeventhFlatFive", Self::MAJOR_SEVENTH_FLAT_FIVE),
        ("AugmentedNinth", Self::AUGMENTED_NINTH),
        ("MinorSeventhNinth", Self::MINOR_SEVENTH_NINTH),
        ("MajorSeventh", Self::MAJOR_SEVENTH),
        ("MinorSeventh", Self::MINOR_SEVENTH),
        ("MajorSixth", Self::MAJOR_SIXTH),
        ("MinorSixth", Self::MINOR_SIXTH),
        ("MajorSixthNinth", Self::MAJOR_SIXTH_NINTH),
        ("MinorSixthNinth", Self::MINOR_SIXTH_NINTH),
        ("MajorNinth", Self::MAJOR_NINTH),
        ("MinorNinth", Self::MINOR_NINTH),
        ("MajorEleventh", Self::MAJOR_ELEVENTH),
        ("MinorEleventh", Self::MINOR_ELEVENTH),
        ("DominantSeventh", Self::DOMINANT_SEVENTH),
        ("MinorMajorSeventh", Self::MINOR_MAJOR_SEVENTH),
        ("Mu1", Self::MU1),
        ("Mu2", Self::MU2),
        ("Mu3", Self::MU3),
        ("Powerchord", Self::POWERCHORD),
        ("SeventhSuspensionFour", Self::SEVENTH_SUSPENSION_FOUR),
        ("Suspended", Self::SUSPENDED),
        ("MinorSeventhFlatFive", Self::MINOR_SEVENTH_FLAT_FIVE),
        ("Hendrix", Self::HENDRIX),
        ("MajorMinorSeventh", Self::MAJOR_MINOR_SEVENTH),
    ];

    // Each pair appears once; lookups go both ways.
    const OPPOSITES: &'static [(Self, Self)] = &[
        (Self::MAJOR, Self::MINOR),
        (Self::AUGMENTED, Self::DIMINISHED),
        (Self::FULL_AUGMENTED, Self::DIMINISHED_SEVENTH),
        (Self::MINOR_SEVENTH_FLAT_FIVE, Self::MAJOR_SEVENTH_FLAT_FIVE),
        (Self::AUGMENTED_NINTH, Self::MINOR_SEVENTH_NINTH),
        (Self::MAJOR_SEVENTH, Self::MINOR_SEVENTH),
        (Self::MAJOR_SIXTH, Self::MINOR_SIXTH),
        (Self::MAJOR_SIXTH_NINTH, Self::MINOR_SIXTH_NINTH),
        (Self::MAJOR_NINTH, Self::MINOR_NINTH),
        (Self::MAJOR_ELEVENTH, Self::MINOR_ELEVENTH),
        (Self::DOMINANT_SEVENTH, Self::MINOR_MAJOR_SEVENTH),
    ];

    const SHORT_NAMES: &'static [(Self, &'static str)] = &[
        (Self::MAJOR, ""),
        (Self::MINOR, "-"),
        (Self::AUGMENTED, "aug"),
        (Self::DIMINISHED, "dim"),
        (Self::FULL_AUGMENTED, "aug"),
        (Self::MINOR_SEVENTH_FLAT_FIVE, "-7b5"),
        (Self::AUGMENTED_NINTH, "add9"),
        (Self::MINOR_SEVENTH_NINTH, "-7,9"),
        (Self::MAJOR_SEVENTH, "7"),
        (Self::MINOR_SEVENTH, "-7"),
        (Self::MAJOR_SIXTH, "6"),
        (Self::MINOR_SIXTH, "-6"),
        (Self::MAJOR_SIXTH_NINTH, "6,9"),
        (Self::MINOR_SIXTH_NINTH, "-6,9"),
        (Self::MAJOR_NINTH, "9"),
        (Self::MINOR_NINTH, "-9"),
        (Self::MAJOR_ELEVENTH, "11"),
        (Self::MINOR_ELEVENTH, "-11"),
        (Self::DOMINANT_SEVENTH, "Maj7"),
        (Self::MINOR_MAJOR_SEVENTH, "-7Maj"),
        (Self::MU1, "Mu1"),
        (Self::MU2, "Mu2"),
        (Self::MU3, "Mu3"),
        (Self::POWERCHORD, "P"),
        (Self::SEVENTH_SUSPENSION_FOUR, "7add4"),
        (Self::SUSPENDED, "sus4"),
    ];

    const fn from_bits(bits: &[u8]) -> Self {
        let mut mask = 0u32;
        let mut i = 0;
        while i < bits.len() {
            mask |= 1 << bits[i];
            i += 1;
        }
        Self(mask | 1)
    }

    /// Any mask is a chord. The root bit is forced on.
    pub const fn new(mask: u32) -> Self {
        Self(mask | 1)
    }

    /// The paired color used when the chord lattice flips rows, e.g. Major
    /// and Minor. Colors without a partner are their own opposite.
    pub fn opposite(&self) -> Self {
        Self::OPPOSITES
            .iter()
            .find_map(|(a, b)| {
                if a == self {
                    Some(*b)
                } else if b == self {
                    Some(*a)
                } else {
                    None
                }
            })
            .unwrap_or(*self)
    }

    /// The suffix written after the root in chord symbols, like `-7` in
    /// `A-7`. Major is the empty string, and so is any unnamed mask.
    pub fn short_name(&self) -> &'static str {
        Self::SHORT_NAMES
            .iter()
            .find(|(c, _)| c == self)
            .map(|(_, s)| *s)
            .unwrap_or_default()
    }

    /// The canonical name of this mask, if it has one.
    pub fn name(&self) -> Option<&'static str> {
        Self::NAMED
            .iter()
            .find(|(_, c)| c == self)
            .map(|(n, _)| *n)
    }

    /// Finds a color by canonical name or alias.
    pub fn from_name(name: &str) -> Result<Self> {
        lookup(Self::NAMED, name).ok_or_else(|| MidiVrError::UnknownColor(name.to_string()))
    }

    /// Every distinct named chord, once each.
    pub fn all() -> impl Iterator<Item = (&'static str, Self)> {
        Self::NAMED
            .iter()
            .copied()
            .filter(|(n, c)| c.name() == Some(*n))
    }
}
impl Default for ChordColor {
    fn default() -> Self {
        Self::MAJOR
    }
}
impl IsColor for ChordColor {
    const RESOLUTION: u32 = 32;

    fn mask(&self) -> u32 {
        self.0
    }
}
impl FromStr for ChordColor {
    type Err = MidiVrError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}
impl fmt::Display for ChordColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{:#x}", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_match_documented_values() {
        assert_eq!(ChordColor::MAJOR.mask(), 145);
        assert_eq!(ScaleColor::MAJOR.mask(), 2741);
        assert_eq!(ChordColor::MAJOR.mask(), (1 << 7) + (1 << 4) + 1);
        assert_eq!(
            ChordColor::MINOR_ELEVENTH.mask(),
            (1 << 17) + (1 << 14) + (1 << 10) + (1 << 7) + (1 << 3) + 1
        );
    }

    #[test]
    fn resolutions_are_fixed() {
        assert_eq!(ScaleColor::RESOLUTION, 12);
        assert_eq!(ChordColor::RESOLUTION, 32);
    }

    #[test]
    fn root_bit_is_always_set() {
        assert_eq!(ChordColor::new(0).mask(), 1);
        assert_eq!(ChordColor::new(0b1000_0000).mask(), 0b1000_0001);
        assert_eq!(ScaleColor::new(0xf000).mask(), 1);
        for (_, c) in ChordColor::all() {
            assert_eq!(c.mask() & 1, 1);
        }
        for (_, c) in ScaleColor::all() {
            assert_eq!(c.mask() & 1, 1);
        }
    }

    #[test]
    fn intervals_ascend_from_root() {
        assert_eq!(
            ChordColor::MAJOR.intervals().collect::<Vec<_>>(),
            vec![0, 4, 7]
        );
        assert_eq!(
            ChordColor::MU3.intervals().collect::<Vec<_>>(),
            vec![0, 14, 16, 18]
        );
        assert_eq!(
            ScaleColor::MAJOR.intervals().collect::<Vec<_>>(),
            vec![0, 2, 4, 5, 7, 9, 11]
        );
        assert_eq!(ChordColor::new(1 << 31).note_count(), 2);
        assert_eq!(ChordColor::new(1 << 31).intervals().last(), Some(31));
    }

    #[test]
    fn opposite_is_involutive() {
        for (name, c) in ChordColor::all() {
            assert_eq!(c.opposite().opposite(), c, "{name}");
        }
        assert_eq!(ChordColor::MAJOR.opposite(), ChordColor::MINOR);
        assert_eq!(
            ChordColor::DOMINANT_SEVENTH.opposite(),
            ChordColor::MINOR_MAJOR_SEVENTH
        );
        assert_eq!(
            ChordColor::HENDRIX.opposite(),
            ChordColor::MINOR_SEVENTH_NINTH
        );
    }

    #[test]
    fn unpaired_colors_are_fixed_points() {
        for c in [
            ChordColor::MU1,
            ChordColor::MU2,
            ChordColor::MU3,
            ChordColor::POWERCHORD,
            ChordColor::SUSPENDED,
            ChordColor::SEVENTH_SUSPENSION_FOUR,
            ChordColor::new(0b11),
        ] {
            assert_eq!(c.opposite(), c);
        }
    }

    #[test]
    fn short_names_are_total() {
        assert_eq!(ChordColor::MAJOR.short_name(), "");
        assert_eq!(ChordColor::MINOR.short_name(), "-");
        assert_eq!(ChordColor::MINOR_SEVENTH.short_name(), "-7");
        assert_eq!(ChordColor::HALF_DIMINISHED_SEVENTH.short_name(), "-7b5");
        assert_eq!(ChordColor::new(0b11).short_name(), "");

        // The labels the instrument has always shown, including the ones
        // that read oddly to a jazz player.
        assert_eq!(ChordColor::MAJOR_SEVENTH.short_name(), "7");
        assert_eq!(ChordColor::DOMINANT_SEVENTH.short_name(), "Maj7");
        assert_eq!(ChordColor::AUGMENTED_NINTH.short_name(), "add9");
        assert_eq!(ChordColor::DIMINISHED_SEVENTH.short_name(), "");
        assert_eq!(ChordColor::MAJOR_SEVENTH_FLAT_FIVE.short_name(), "");
    }

    #[test]
    fn dorian_is_melodic_minor() {
        assert_eq!(ScaleColor::DORIAN, ScaleColor::MELODIC_MINOR);
        assert_eq!(
            "dorian".parse::<ScaleColor>().unwrap(),
            ScaleColor::MELODIC_MINOR
        );
        assert_eq!(ScaleColor::DORIAN.name(), Some("MelodicMinor"));
        assert_eq!(
            ScaleColor::DORIAN.intervals().collect::<Vec<_>>(),
            vec![0, 2, 3, 5, 7, 9, 11]
        );
    }

    #[test]
    fn names_and_aliases() {
        assert_eq!(ChordColor::HENDRIX.name(), Some("AugmentedNinth"));
        assert_eq!(
            ChordColor::from_name("hendrix").unwrap(),
            ChordColor::AUGMENTED_NINTH
        );
        assert_eq!(
            "minor-seventh".parse::<ChordColor>().unwrap(),
            ChordColor::MINOR_SEVENTH
        );
        assert_eq!(
            "Aeolian".parse::<ScaleColor>().unwrap(),
            ScaleColor::NATURAL_MINOR
        );
        assert_eq!(ScaleColor::IONIAN.to_string(), "Major");
        assert!(matches!(
            "lydian dominant".parse::<ScaleColor>(),
            Err(MidiVrError::UnknownColor(_))
        ));
        assert_eq!(ChordColor::all().count(), 28);
        assert_eq!(ScaleColor::all().count(), 8);
    }
}
