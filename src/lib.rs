// Copyright (c) 2023 Mike Tsao. All rights reserved.

#![warn(missing_docs)]

//! The `midivr` crate is the musical core of a virtual-reality MIDI
//! instrument. It knows about pitches, scale and chord colors, and the chord
//! lattice, and it turns all of those into MIDI note and control messages.
//!
//! Where those messages go is up to the caller: install any [MidiSink] in a
//! [MidiPort] and hand the port to a [NoteSender].
//!
//! ```
//! use midivr::prelude::*;
//! use std::sync::Arc;
//!
//! let sink = Arc::new(RecordingSink::default());
//! let sender = NoteSender::new_with(Arc::new(MidiPort::new_with(sink.clone())));
//! let lattice = ChordLattice::default();
//! sender.note_on_default(&lattice.chord_at(1, 0));
//! assert_eq!(sink.messages().len(), 3);
//! ```

pub mod collection;
pub mod color;
pub mod error;
pub mod lattice;
pub mod midi;
pub mod pitch;
pub mod sender;
pub mod services;
pub mod sink;
pub mod traits;
pub mod util;

pub use sender::NoteSender;
pub use sink::{MidiPort, MidiSink};

/// A collection of imports that are useful to users of this crate. `use
/// midivr::prelude::*;` for easier onboarding.
pub mod prelude {
    pub use super::{
        collection::{Chord, Scale},
        color::{ChordColor, IsColor, ScaleColor},
        error::MidiVrError,
        lattice::ChordLattice,
        midi::prelude::*,
        pitch::{NoteLabel, Pitch},
        sender::{ContinuousControl, NoteSender, Voice},
        services::prelude::*,
        sink::{ChannelSink, MidiPort, MidiSink, RecordingSink},
        traits::prelude::*,
        util::prelude::*,
    };
}
