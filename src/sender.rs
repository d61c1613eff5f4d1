// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! Turns pitches, chords, and knob positions into MIDI traffic.
//!
//! Nothing here returns an error. A note that can't be encoded is skipped
//! (and logged at debug level), and a missing or failing sink is handled by
//! the [MidiPort] policy: one warning, then silence.

use crate::{
    error::Result,
    midi::{ControllerId, ControllerIdFactory, MidiChannel, MidiMessage, MidiUtils},
    pitch::Pitch,
    services::{ProvidesService, TimedNoteService, TimedNoteServiceInput},
    sink::MidiPort,
    traits::Voicing,
    util::SenderSettings,
};
use once_cell::sync::OnceCell;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

fn send_each(
    port: &MidiPort,
    channel: MidiChannel,
    pitches: &[Pitch],
    velocity: u8,
    make_message: fn(&Pitch, u8) -> Result<MidiMessage>,
) {
    for pitch in pitches {
        match make_message(pitch, velocity) {
            Ok(message) => port.send(channel, &message),
            Err(e) => log::debug!("skipping {pitch}: {e}"),
        }
    }
}

/// Sends one note-on per pitch, in order.
pub(crate) fn send_note_ons(port: &MidiPort, channel: MidiChannel, pitches: &[Pitch], vel: u8) {
    send_each(port, channel, pitches, vel, MidiUtils::new_note_on);
}

/// Sends one note-off per pitch, in order.
pub(crate) fn send_note_offs(port: &MidiPort, channel: MidiChannel, pitches: &[Pitch], vel: u8) {
    send_each(port, channel, pitches, vel, MidiUtils::new_note_off);
}

/// A cheaply cloneable handle that plays [Voicing]s on one MIDI channel.
///
/// Clones share the port and the timer thread used by [NoteSender::note()].
/// The timer thread starts the first time it's needed. Dropping the last
/// clone doesn't cut timed notes short: the thread finishes releasing them at
/// their deadlines and then exits.
#[derive(Clone, Debug)]
pub struct NoteSender {
    port: Arc<MidiPort>,
    channel: MidiChannel,
    note_on_velocity: u8,
    note_off_velocity: u8,
    note_duration: Duration,
    timer: Arc<OnceCell<TimedNoteService>>,
}
impl NoteSender {
    /// A sender on channel 0 with the default velocities.
    pub fn new_with(port: Arc<MidiPort>) -> Self {
        Self::new_with_settings(port, &SenderSettings::default())
    }

    #[allow(missing_docs)]
    pub fn new_with_settings(port: Arc<MidiPort>, settings: &SenderSettings) -> Self {
        Self {
            port,
            channel: settings.channel(),
            note_on_velocity: settings.note_on_velocity(),
            note_off_velocity: settings.note_off_velocity(),
            note_duration: settings.note_duration(),
            timer: Default::default(),
        }
    }

    #[allow(missing_docs)]
    pub fn port(&self) -> &Arc<MidiPort> {
        &self.port
    }

    #[allow(missing_docs)]
    pub fn channel(&self) -> MidiChannel {
        self.channel
    }

    #[allow(missing_docs)]
    pub fn set_channel(&mut self, channel: MidiChannel) {
        self.channel = channel;
    }

    /// One note-on per pitch of `voice`.
    pub fn note_on<V: Voicing + ?Sized>(&self, voice: &V, velocity: u8) {
        send_note_ons(&self.port, self.channel, voice.pitches(), velocity);
    }

    /// One note-off per pitch of `voice`. Nothing remembers which notes are
    /// sounding, so calling this twice sends everything twice.
    pub fn note_off<V: Voicing + ?Sized>(&self, voice: &V, velocity: u8) {
        send_note_offs(&self.port, self.channel, voice.pitches(), velocity);
    }

    /// [NoteSender::note_on()] at the configured velocity (100 unless
    /// settings say otherwise).
    pub fn note_on_default<V: Voicing + ?Sized>(&self, voice: &V) {
        self.note_on(voice, self.note_on_velocity);
    }

    /// [NoteSender::note_off()] at the configured velocity (64 unless
    /// settings say otherwise).
    pub fn note_off_default<V: Voicing + ?Sized>(&self, voice: &V) {
        self.note_off(voice, self.note_off_velocity);
    }

    /// Plays `voice` for `duration`, blocking the calling thread the whole
    /// time. Every note-on goes out before any note-off. The note-offs carry
    /// the same velocity as the note-ons.
    pub fn note_on_off<V: Voicing + ?Sized>(&self, voice: &V, velocity: u8, duration: Duration) {
        self.note_on(voice, velocity);
        std::thread::sleep(duration);
        self.note_off(voice, velocity);
    }

    /// Like [NoteSender::note_on_off()], but returns immediately. The
    /// note-ons go out before this returns; the release happens on the timer
    /// thread. There's no way to cancel it or to learn when it has happened,
    /// and timed notes overlap freely.
    pub fn note<V: Voicing + ?Sized>(&self, voice: &V, velocity: u8, duration: Duration) {
        let deadline = Instant::now()
            .checked_add(duration)
            .unwrap_or_else(Instant::now);
        self.note_on(voice, velocity);
        self.timer().send_input(TimedNoteServiceInput::Release {
            channel: self.channel,
            pitches: Arc::from(voice.pitches()),
            velocity,
            deadline,
        });
    }

    /// [NoteSender::note()] with the configured velocity and duration.
    pub fn note_default<V: Voicing + ?Sized>(&self, voice: &V) {
        self.note(voice, self.note_on_velocity, self.note_duration);
    }

    fn timer(&self) -> &TimedNoteService {
        self.timer.get_or_init(|| {
            log::debug!("NoteSender: starting timer thread");
            TimedNoteService::new_with(Arc::clone(&self.port))
        })
    }
}

/// A [NoteSender] bound to the pitch or chord it plays, like a single key on
/// a keyboard.
#[derive(Clone, Debug)]
pub struct Voice<V: Voicing> {
    sender: NoteSender,
    voicing: V,
}
impl<V: Voicing> Voice<V> {
    #[allow(missing_docs)]
    pub fn new_with(sender: NoteSender, voicing: V) -> Self {
        Self { sender, voicing }
    }

    #[allow(missing_docs)]
    pub fn voicing(&self) -> &V {
        &self.voicing
    }

    /// Replaces what this voice plays. Notes already sounding aren't touched;
    /// turn them off first if that matters.
    pub fn set_voicing(&mut self, voicing: V) {
        self.voicing = voicing;
    }

    #[allow(missing_docs)]
    pub fn note_on(&self) {
        self.sender.note_on_default(&self.voicing);
    }

    #[allow(missing_docs)]
    pub fn note_off(&self) {
        self.sender.note_off_default(&self.voicing);
    }

    #[allow(missing_docs)]
    pub fn note_on_off(&self, duration: Duration) {
        self.sender
            .note_on_off(&self.voicing, self.sender.note_on_velocity, duration);
    }

    #[allow(missing_docs)]
    pub fn note(&self, duration: Duration) {
        self.sender
            .note(&self.voicing, self.sender.note_on_velocity, duration);
    }
}

/// A knob or slider that sends control-change messages.
///
/// The controller id is allocated once, at construction. Positions are
/// quantized to 0..=127 and a message goes out only when the quantized value
/// changes. The first position is always sent.
#[derive(Debug)]
pub struct ContinuousControl {
    port: Arc<MidiPort>,
    channel: MidiChannel,
    id: ControllerId,
    value: Option<u8>,
}
impl ContinuousControl {
    /// The highest value a control-change can carry.
    pub const RANGE: u8 = 127;

    #[allow(missing_docs)]
    pub fn new_with(port: Arc<MidiPort>, channel: MidiChannel, ids: &ControllerIdFactory) -> Self {
        Self {
            port,
            channel,
            id: ids.mint_next(),
            value: None,
        }
    }

    #[allow(missing_docs)]
    pub fn id(&self) -> ControllerId {
        self.id
    }

    /// The last value sent, if any.
    pub fn value(&self) -> Option<u8> {
        self.value
    }

    /// Takes a position in 0.0..=1.0 (clamped; NaN counts as 0.0) and sends
    /// it if it quantizes to a new value. Returns whether anything was sent.
    pub fn set_normalized(&mut self, position: f32) -> bool {
        let position = if position.is_nan() {
            0.0
        } else {
            position.clamp(0.0, 1.0)
        };
        self.set_value((position * Self::RANGE as f32) as u8)
    }

    /// Sends `value` (clamped to 127) if it differs from the last one.
    /// Returns whether anything was sent.
    pub fn set_value(&mut self, value: u8) -> bool {
        let value = value.min(Self::RANGE);
        if self.value == Some(value) {
            return false;
        }
        self.value = Some(value);
        match MidiUtils::new_controller(self.id, value) {
            Ok(message) => self.port.send(self.channel, &message),
            // Ids past 127 come from counter wraparound and can't go on the wire.
            Err(e) => log::debug!("ContinuousControl {}: {e}", self.id),
        }
        true
    }
}
