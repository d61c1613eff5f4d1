// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! A two-dimensional grid of related chords, for tonal-grid instruments.
//!
//! Taking the origin chord as (0, 0), each step right moves the root up a
//! fifth, and each step up flips the color to its opposite while moving the
//! root so that neighbors share tones:
//!
//! ```text
//! -1,1    0,1    1,1           C-     G-     D-
//! -1,0    0,0    1,0           F      C      G
//! -1,-1   0,-1   1,-1          D-     A-     E-
//! ```

use crate::{collection::Chord, pitch::Pitch};
use std::ops::RangeInclusive;

/// Navigates the chord lattice around an origin chord.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChordLattice {
    origin: Chord,
}
impl ChordLattice {
    /// Semitones per step along x: a perfect fifth.
    pub const FIFTH: i32 = 7;

    /// Semitones the root falls for every two steps up.
    pub const ROW_PAIR: i32 = 2;

    /// Semitones the root falls for a single leftover step down.
    pub const MINOR_THIRD: i32 = 3;

    #[allow(missing_docs)]
    pub fn new(origin: Chord) -> Self {
        Self { origin }
    }

    #[allow(missing_docs)]
    pub fn origin(&self) -> &Chord {
        &self.origin
    }

    /// The chord at `(x, y)`. Pure and deterministic; `(0, 0)` is the origin.
    ///
    /// Only the root's label moves. Its octave is pinned to the origin's, so
    /// the lattice never drifts out of the instrument's register.
    pub fn chord_at(&self, x: i32, y: i32) -> Chord {
        let origin_root = self.origin.base();
        let mut color = self.origin.color();

        let mut root = origin_root.pitch(Self::FIFTH.saturating_mul(x));

        let row_pairs = y.unsigned_abs() / 2;
        let has_odd_row = y.unsigned_abs() % 2 == 1;
        let pair_shift = (row_pairs as i32).saturating_mul(Self::ROW_PAIR);
        if y > 0 {
            root = root.pitch_down(pair_shift);
            if has_odd_row {
                root = root.pitch_up(Self::FIFTH);
                color = color.opposite();
            }
        } else if y < 0 {
            root = root.pitch_up(pair_shift);
            if has_odd_row {
                root = root.pitch_down(Self::MINOR_THIRD);
                color = color.opposite();
            }
        }

        Chord::new(root.with_octave(origin_root.octave()), color)
    }

    /// Rows of chords, top row (highest y) first, each row ordered by
    /// ascending x. Handy for drawing the grid.
    pub fn grid(&self, xs: RangeInclusive<i32>, ys: RangeInclusive<i32>) -> Vec<Vec<Chord>> {
        ys.rev()
            .map(|y| xs.clone().map(|x| self.chord_at(x, y)).collect())
            .collect()
    }

    /// The same lattice around a different root, keeping the origin's color.
    pub fn recentered(&self, root: Pitch) -> Self {
        Self::new(Chord::new(root, self.origin.color()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{color::ChordColor, pitch::NoteLabel};

    fn c_major() -> ChordLattice {
        ChordLattice::new(Chord::new(Pitch::new(NoteLabel::C, 5), ChordColor::MAJOR))
    }

    fn assert_chord(chord: &Chord, label: NoteLabel, color: ChordColor) {
        assert_eq!(chord.base(), Pitch::new(label, 5), "{chord}");
        assert_eq!(chord.color(), color, "{chord}");
    }

    #[test]
    fn origin_is_unchanged() {
        let lattice = c_major();
        assert_eq!(&lattice.chord_at(0, 0), lattice.origin());
    }

    #[test]
    fn x_moves_by_fifths() {
        let lattice = c_major();
        assert_chord(&lattice.chord_at(1, 0), NoteLabel::G, ChordColor::MAJOR);
        assert_chord(&lattice.chord_at(2, 0), NoteLabel::D, ChordColor::MAJOR);
        assert_chord(&lattice.chord_at(-1, 0), NoteLabel::F, ChordColor::MAJOR);
        for x in -20..20 {
            let chord = lattice.chord_at(x, 0);
            assert_eq!(chord.color(), ChordColor::MAJOR);
            assert_eq!(
                chord.base().label(),
                Pitch::DEFAULT.pitch(7 * x).label(),
                "x = {x}"
            );
        }
    }

    #[test]
    fn matches_the_documented_diagram() {
        let lattice = c_major();
        assert_chord(&lattice.chord_at(-1, 1), NoteLabel::C, ChordColor::MINOR);
        assert_chord(&lattice.chord_at(0, 1), NoteLabel::G, ChordColor::MINOR);
        assert_chord(&lattice.chord_at(1, 1), NoteLabel::D, ChordColor::MINOR);
        assert_chord(&lattice.chord_at(-1, -1), NoteLabel::D, ChordColor::MINOR);
        assert_chord(&lattice.chord_at(0, -1), NoteLabel::A, ChordColor::MINOR);
        assert_chord(&lattice.chord_at(1, -1), NoteLabel::E, ChordColor::MINOR);
    }

    #[test]
    fn even_rows_keep_color() {
        let lattice = c_major();
        assert_chord(&lattice.chord_at(0, 2), NoteLabel::As, ChordColor::MAJOR);
        assert_chord(&lattice.chord_at(0, -2), NoteLabel::D, ChordColor::MAJOR);
        assert_chord(&lattice.chord_at(0, 3), NoteLabel::F, ChordColor::MINOR);
        assert_chord(&lattice.chord_at(0, -3), NoteLabel::B, ChordColor::MINOR);
        for y in -10..10 {
            let expected = if y % 2 == 0 {
                ChordColor::MAJOR
            } else {
                ChordColor::MINOR
            };
            assert_eq!(lattice.chord_at(0, y).color(), expected, "y = {y}");
        }
    }

    #[test]
    fn octave_is_pinned_to_origin() {
        let lattice = c_major();
        for x in -12..12 {
            for y in -12..12 {
                assert_eq!(lattice.chord_at(x, y).base().octave(), 5);
            }
        }
    }

    #[test]
    fn starting_from_minor_flips_to_major() {
        let lattice = ChordLattice::new(Chord::new(
            Pitch::new(NoteLabel::A, 5),
            ChordColor::MINOR,
        ));
        assert_chord(&lattice.chord_at(0, 1), NoteLabel::E, ChordColor::MAJOR);
    }

    #[test]
    fn grid_is_top_row_first() {
        let grid = c_major().grid(-1..=1, -1..=1);
        let names: Vec<Vec<String>> = grid
            .iter()
            .map(|row| row.iter().map(|c| c.to_string()).collect())
            .collect();
        assert_eq!(
            names,
            vec![
                vec!["C5-", "G5-", "D5-"],
                vec!["F5", "C5", "G5"],
                vec!["D5-", "A5-", "E5-"],
            ]
        );
    }

    #[test]
    fn recentering_keeps_color() {
        let lattice = c_major().recentered(Pitch::new(NoteLabel::G, 4));
        assert_eq!(lattice.origin().base(), Pitch::new(NoteLabel::G, 4));
        assert_eq!(lattice.origin().color(), ChordColor::MAJOR);
    }
}
