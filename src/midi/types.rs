// Copyright (c) 2024 Mike Tsao. All rights reserved.

use super::u4;
use derive_more::Display as DeriveDisplay;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU8, Ordering};

/// Newtype for MIDI channel.
#[derive(
    Clone, Copy, Debug, Default, DeriveDisplay, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub struct MidiChannel(pub u8);
#[allow(missing_docs)]
impl MidiChannel {
    pub const MIN_VALUE: u8 = 0;
    pub const MAX_VALUE: u8 = 15; // inclusive

    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    pub const fn is_valid(&self) -> bool {
        self.0 <= Self::MAX_VALUE
    }
}
impl From<u4> for MidiChannel {
    fn from(value: u4) -> Self {
        Self(value.as_int())
    }
}
impl From<u8> for MidiChannel {
    fn from(value: u8) -> Self {
        Self(value)
    }
}
impl From<MidiChannel> for u8 {
    fn from(value: MidiChannel) -> Self {
        value.0
    }
}

/// Identifies a continuous controller (knob, slider) in control-change
/// messages.
#[derive(
    Clone, Copy, Debug, Default, DeriveDisplay, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub struct ControllerId(pub u8);
impl From<u8> for ControllerId {
    fn from(value: u8) -> Self {
        Self(value)
    }
}

/// Hands out [ControllerId]s, starting at 0 and counting up by one for each
/// request. After 255 the counter wraps to 0 and ids repeat; nothing tracks
/// which ids are still in use.
#[derive(Debug)]
pub struct ControllerIdFactory {
    next_id_value: AtomicU8,
}
impl Default for ControllerIdFactory {
    fn default() -> Self {
        Self::new(0)
    }
}
impl ControllerIdFactory {
    /// Creates a factory whose first id is `first_id`.
    pub const fn new(first_id: u8) -> Self {
        Self {
            next_id_value: AtomicU8::new(first_id),
        }
    }

    /// The process-wide factory.
    pub fn global() -> &'static Self {
        static INSTANCE: ControllerIdFactory = ControllerIdFactory::new(0);
        &INSTANCE
    }

    /// Generates the next [ControllerId].
    pub fn mint_next(&self) -> ControllerId {
        ControllerId(self.next_id_value.fetch_add(1, Ordering::Relaxed))
    }
}
