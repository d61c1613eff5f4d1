// Copyright (c) 2024 Mike Tsao. All rights reserved.

use super::{u7, ControllerId, LiveEvent, MidiChannel, MidiMessage};
use crate::{
    error::{MidiVrError, Result},
    pitch::Pitch,
};

/// Builders and the wire encoder for the messages this crate sends.
pub struct MidiUtils {}
impl MidiUtils {
    /// Status nibble for note-off.
    pub const NOTE_OFF: u8 = 0x80;
    /// Status nibble for note-on.
    pub const NOTE_ON: u8 = 0x90;
    /// Status nibble for polyphonic aftertouch.
    pub const AFTERTOUCH: u8 = 0xA0;
    /// Status nibble for control-change.
    pub const CONTROL_CHANGE: u8 = 0xB0;

    /// Default velocity for note-on.
    pub const DEFAULT_NOTE_ON_VELOCITY: u8 = 0x64;
    /// Default velocity for note-off.
    pub const DEFAULT_NOTE_OFF_VELOCITY: u8 = 0x40;

    fn data_byte(what: &'static str, value: u8) -> Result<u7> {
        if value <= 0x7f {
            Ok(u7::from(value))
        } else {
            Err(MidiVrError::ValueOutOfRange { what, value })
        }
    }

    /// Makes a note-on [MidiMessage], checking that both data bytes fit in
    /// seven bits.
    pub fn new_note_on(pitch: &Pitch, vel: u8) -> Result<MidiMessage> {
        Ok(MidiMessage::NoteOn {
            key: pitch.midi_key()?,
            vel: Self::data_byte("velocity", vel)?,
        })
    }

    /// Makes a note-off [MidiMessage].
    pub fn new_note_off(pitch: &Pitch, vel: u8) -> Result<MidiMessage> {
        Ok(MidiMessage::NoteOff {
            key: pitch.midi_key()?,
            vel: Self::data_byte("velocity", vel)?,
        })
    }

    /// Makes a control-change [MidiMessage].
    pub fn new_controller(controller: ControllerId, value: u8) -> Result<MidiMessage> {
        Ok(MidiMessage::Controller {
            controller: Self::data_byte("controller", controller.0)?,
            value: Self::data_byte("control", value)?,
        })
    }

    /// Encodes a three-byte channel message: status with the channel in the
    /// low nibble, then the two data bytes.
    pub fn encode(channel: MidiChannel, message: &MidiMessage) -> Result<[u8; 3]> {
        if !channel.is_valid() {
            return Err(MidiVrError::ChannelOutOfRange(channel.0));
        }
        let (status, data1, data2) = match *message {
            MidiMessage::NoteOff { key, vel } => (Self::NOTE_OFF, key, vel),
            MidiMessage::NoteOn { key, vel } => (Self::NOTE_ON, key, vel),
            MidiMessage::Aftertouch { key, vel } => (Self::AFTERTOUCH, key, vel),
            MidiMessage::Controller { controller, value } => {
                (Self::CONTROL_CHANGE, controller, value)
            }
            _ => return Err(MidiVrError::UnsupportedMessage(format!("{message:?}"))),
        };
        Ok([status | channel.0, data1.as_int(), data2.as_int()])
    }

    /// Parses a raw triple back into a channel and message. Returns None for
    /// anything that isn't a channel message.
    pub fn decode(bytes: &[u8; 3]) -> Option<(MidiChannel, MidiMessage)> {
        match LiveEvent::parse(bytes) {
            Ok(LiveEvent::Midi { channel, message }) => Some((channel.into(), message)),
            _ => None,
        }
    }
}
