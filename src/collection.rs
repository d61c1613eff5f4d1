// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! [Scale]s and [Chord]s: a root [Pitch] plus a color, expanded once into the
//! ordered pitches the color describes.

use crate::{
    color::{ChordColor, IsColor, ScaleColor},
    pitch::Pitch,
    traits::Voicing,
};
use std::{fmt, sync::Arc};

/// Walks the color's bits from 0 upward and stacks each set offset on the
/// root. The result is root-first and ascending, one pitch per set bit.
pub fn build_collection<C: IsColor>(base: Pitch, color: C) -> Arc<[Pitch]> {
    color.intervals().map(|offset| base.pitch_up(offset)).collect()
}

/// A scale rooted on `base`.
///
/// Clones share the same collection.
#[derive(Clone, Debug)]
pub struct Scale {
    base: Pitch,
    color: ScaleColor,
    collection: Arc<[Pitch]>,
}
impl Default for Scale {
    fn default() -> Self {
        Self::new(Pitch::DEFAULT, ScaleColor::MAJOR)
    }
}
impl PartialEq for Scale {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base && self.color == other.color
    }
}
impl Eq for Scale {}
impl Scale {
    #[allow(missing_docs)]
    pub fn new(base: Pitch, color: ScaleColor) -> Self {
        Self {
            base,
            color,
            collection: build_collection(base, color),
        }
    }

    #[allow(missing_docs)]
    pub fn base(&self) -> Pitch {
        self.base
    }

    #[allow(missing_docs)]
    pub fn color(&self) -> ScaleColor {
        self.color
    }

    /// The scale's pitches within one octave of the base, ascending.
    pub fn collection(&self) -> &[Pitch] {
        &self.collection
    }

    /// Treats the scale as repeating forever in both directions. Index 0 is
    /// the base, index `len` is the base an octave up, and index -1 is the
    /// top degree an octave down.
    pub fn note_at_extended_index(&self, index: i32) -> Pitch {
        let len = self.collection.len() as i32;
        let wrapped = self.collection[index.rem_euclid(len) as usize];
        wrapped.pitch(index.div_euclid(len).saturating_mul(Pitch::OCTAVE_LENGTH))
    }

    /// Builds a chord of the given color on a scale degree.
    pub fn chord_at_degree(&self, degree: i32, color: ChordColor) -> Chord {
        Chord::new(self.note_at_extended_index(degree), color)
    }
}
impl Voicing for Scale {
    fn pitches(&self) -> &[Pitch] {
        self.collection()
    }
}

/// A chord rooted on `base`. The color is 32 bits wide, so the collection can
/// extend past the octave (ninths, elevenths).
///
/// Clones share the same collection.
#[derive(Clone, Debug)]
pub struct Chord {
    base: Pitch,
    color: ChordColor,
    collection: Arc<[Pitch]>,
}
impl Default for Chord {
    fn default() -> Self {
        Self::new(Pitch::DEFAULT, ChordColor::MAJOR)
    }
}
impl PartialEq for Chord {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base && self.color == other.color
    }
}
impl Eq for Chord {}
impl Chord {
    #[allow(missing_docs)]
    pub fn new(base: Pitch, color: ChordColor) -> Self {
        Self {
            base,
            color,
            collection: build_collection(base, color),
        }
    }

    #[allow(missing_docs)]
    pub fn base(&self) -> Pitch {
        self.base
    }

    #[allow(missing_docs)]
    pub fn color(&self) -> ChordColor {
        self.color
    }

    /// The chord's pitches, root first.
    pub fn collection(&self) -> &[Pitch] {
        &self.collection
    }
}
impl Voicing for Chord {
    fn pitches(&self) -> &[Pitch] {
        self.collection()
    }
}
impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.base, self.color.short_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::NoteLabel;

    fn c5() -> Pitch {
        Pitch::new(NoteLabel::C, 5)
    }

    #[test]
    fn major_scale_from_c5() {
        let scale = Scale::new(c5(), ScaleColor::MAJOR);
        let expected: Vec<Pitch> = [
            NoteLabel::C,
            NoteLabel::D,
            NoteLabel::E,
            NoteLabel::F,
            NoteLabel::G,
            NoteLabel::A,
            NoteLabel::B,
        ]
        .into_iter()
        .map(|l| Pitch::new(l, 5))
        .collect();
        assert_eq!(scale.collection(), expected.as_slice());
    }

    #[test]
    fn major_chord_from_c5() {
        let chord = Chord::new(c5(), ChordColor::MAJOR);
        assert_eq!(
            chord.collection(),
            &[
                Pitch::new(NoteLabel::C, 5),
                Pitch::new(NoteLabel::E, 5),
                Pitch::new(NoteLabel::G, 5)
            ]
        );
    }

    #[test]
    fn extended_chords_cross_the_octave() {
        let chord = Chord::new(c5(), ChordColor::MAJOR_NINTH);
        assert_eq!(chord.collection().len(), 5);
        assert_eq!(
            chord.collection().last(),
            Some(&Pitch::new(NoteLabel::D, 6))
        );
    }

    #[test]
    fn collection_length_is_popcount() {
        for (_, color) in ChordColor::all() {
            let chord = Chord::new(c5(), color);
            assert_eq!(chord.collection().len(), color.note_count());
            assert_eq!(chord.collection()[0], c5());
            assert!(chord.collection().windows(2).all(|w| w[0] < w[1]));
        }
        assert_eq!(Chord::new(c5(), ChordColor::new(0)).collection(), &[c5()]);
    }

    #[test]
    fn clones_share_the_collection() {
        let chord = Chord::new(c5(), ChordColor::MINOR_SEVENTH);
        let copy = chord.clone();
        assert!(Arc::ptr_eq(&chord.collection, &copy.collection));
        assert_eq!(chord, copy);
    }

    #[test]
    fn extended_index_wraps_by_octave() {
        let scale = Scale::default();
        assert_eq!(scale.note_at_extended_index(0), c5());
        assert_eq!(scale.note_at_extended_index(7), Pitch::new(NoteLabel::C, 6));
        assert_eq!(scale.note_at_extended_index(9), Pitch::new(NoteLabel::E, 6));
        assert_eq!(
            scale.note_at_extended_index(14),
            Pitch::new(NoteLabel::C, 7)
        );
        assert_eq!(
            scale.note_at_extended_index(-1),
            Pitch::new(NoteLabel::B, 4)
        );
        assert_eq!(
            scale.note_at_extended_index(-7),
            Pitch::new(NoteLabel::C, 4)
        );
        assert_eq!(
            scale.note_at_extended_index(-8),
            Pitch::new(NoteLabel::B, 3)
        );
    }

    #[test]
    fn extended_index_on_a_scale_that_crosses_octaves() {
        let scale = Scale::new(Pitch::new(NoteLabel::A, 4), ScaleColor::NATURAL_MINOR);
        // A B C D E F G: C is already in octave 5.
        assert_eq!(scale.note_at_extended_index(2), Pitch::new(NoteLabel::C, 5));
        assert_eq!(scale.note_at_extended_index(9), Pitch::new(NoteLabel::C, 6));
        assert_eq!(
            scale.note_at_extended_index(-5),
            Pitch::new(NoteLabel::C, 4)
        );
    }

    #[test]
    fn chords_on_scale_degrees() {
        let scale = Scale::default();
        let v = scale.chord_at_degree(4, ChordColor::DOMINANT_SEVENTH);
        assert_eq!(v.base(), Pitch::new(NoteLabel::G, 5));
        assert_eq!(v.to_string(), "G5Maj7");
        assert_eq!(
            scale.chord_at_degree(5, ChordColor::MINOR).to_string(),
            "A5-"
        );
    }
}
