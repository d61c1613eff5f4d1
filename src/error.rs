// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! The crate's error type.

use thiserror::Error;

/// Everything that can go wrong between a [Pitch](crate::pitch::Pitch) and the
/// wire. Pitch arithmetic, color lookups, and lattice navigation never fail;
/// these errors appear only when a message is encoded or handed to a sink, or
/// when text from a config file or command line is parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MidiVrError {
    /// The pitch's absolute index can't be carried in a 7-bit MIDI data byte.
    #[error("pitch index {0} is too high or too low for MIDI to handle")]
    PitchOutOfRange(i32),

    /// A velocity, controller id, or control value exceeded 127.
    #[error("{what} value {value} exceeds the 7-bit MIDI range")]
    ValueOutOfRange {
        /// Which data byte was being encoded.
        what: &'static str,
        /// The offending value.
        value: u8,
    },

    /// MIDI channels are 0..=15.
    #[error("MIDI channel {0} is out of range")]
    ChannelOutOfRange(u8),

    /// Only three-byte channel messages go through a sink.
    #[error("not a three-byte channel message: {0}")]
    UnsupportedMessage(String),

    /// No sink is installed in the port.
    #[error("no MIDI sink is available")]
    SinkUnavailable,

    /// The sink accepted the message but couldn't deliver it.
    #[error("MIDI transport failed: {0}")]
    Transport(String),

    /// A color name didn't match any entry in the color tables.
    #[error("unknown color name: {0}")]
    UnknownColor(String),

    /// A pitch name like `C#5` couldn't be parsed.
    #[error("couldn't parse pitch: {0}")]
    ParsePitch(String),
}

/// Shorthand for results carrying [MidiVrError].
pub type Result<T> = core::result::Result<T, MidiVrError>;
