// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! The traits that define many characteristics and relationships among parts of
//! the system.

use crate::pitch::Pitch;

/// Quick import of all important traits.
pub mod prelude {
    pub use super::{HasSettings, Voicing};
}

/// Anything the sender can turn on and off: a single [Pitch], or every pitch
/// of a [Chord](crate::collection::Chord) or
/// [Scale](crate::collection::Scale) at once.
pub trait Voicing {
    /// The pitches that sound together, in the order their messages go out.
    fn pitches(&self) -> &[Pitch];
}
impl Voicing for Pitch {
    fn pitches(&self) -> &[Pitch] {
        std::slice::from_ref(self)
    }
}

/// Some structs have configuration information that should persist, but it's
/// not necessarily part of the project or saved with it. Implementing
/// [HasSettings] lets the owner know when the settings have changed and need
/// to be written back.
pub trait HasSettings {
    /// Whether the current state of this struct has been saved to disk.
    fn has_been_saved(&self) -> bool;
    /// Call this whenever the struct changes.
    fn needs_save(&mut self);
    /// Call this after a load() or a save().
    fn mark_clean(&mut self);
}
