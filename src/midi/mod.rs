// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! Management of all MIDI-related information that flows out of the system.

/// Recommended imports for easy onboarding.
pub mod prelude {
    pub use super::{
        u4, u7, ControllerId, ControllerIdFactory, MidiChannel, MidiMessage, MidiUtils,
    };
}

pub use {
    midly::{
        live::LiveEvent,
        num::{u4, u7},
        MidiMessage,
    },
    types::{ControllerId, ControllerIdFactory, MidiChannel},
    util::MidiUtils,
};

mod types;
mod util;
