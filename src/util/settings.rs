// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! Structs that hold configuration information about various parts of the
//! system. Intended to be serialized.

use crate::{
    midi::{MidiChannel, MidiUtils},
    traits::HasSettings,
};
use derivative::Derivative;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
    time::Duration,
};

/// Contains persistent note-sending settings.
#[derive(Debug, Derivative, Serialize, Deserialize, PartialEq)]
#[derivative(Default)]
#[serde(rename_all = "kebab-case", default)]
pub struct SenderSettings {
    /// Name of the MIDI port to open or publish.
    #[derivative(Default(value = "Self::DEFAULT_PORT_NAME.to_string()"))]
    port_name: String,

    channel: MidiChannel,

    #[derivative(Default(value = "MidiUtils::DEFAULT_NOTE_ON_VELOCITY"))]
    note_on_velocity: u8,

    #[derivative(Default(value = "MidiUtils::DEFAULT_NOTE_OFF_VELOCITY"))]
    note_off_velocity: u8,

    /// How long a timed note rings when the caller doesn't say.
    #[derivative(Default(value = "500"))]
    note_duration_ms: u64,

    #[serde(skip)]
    has_been_saved: bool,
}
impl HasSettings for SenderSettings {
    fn has_been_saved(&self) -> bool {
        self.has_been_saved
    }

    fn needs_save(&mut self) {
        self.has_been_saved = false;
    }

    fn mark_clean(&mut self) {
        self.has_been_saved = true;
    }
}
impl SenderSettings {
    /// The port name the instrument has always used.
    pub const DEFAULT_PORT_NAME: &'static str = "MidiVR";

    /// Velocities are 7-bit data bytes on the wire.
    pub const MAX_VELOCITY: u8 = 127;

    // A velocity that can't be encoded would silence every note, so it's
    // pinned to the top of the range instead.
    fn clamp_velocity(what: &str, velocity: u8) -> u8 {
        if velocity > Self::MAX_VELOCITY {
            log::warn!("{what} {velocity} is out of range; using {}", Self::MAX_VELOCITY);
            Self::MAX_VELOCITY
        } else {
            velocity
        }
    }

    #[allow(missing_docs)]
    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    #[allow(missing_docs)]
    pub fn channel(&self) -> MidiChannel {
        self.channel
    }

    #[allow(missing_docs)]
    pub fn note_on_velocity(&self) -> u8 {
        self.note_on_velocity
    }

    #[allow(missing_docs)]
    pub fn note_off_velocity(&self) -> u8 {
        self.note_off_velocity
    }

    #[allow(missing_docs)]
    pub fn note_duration(&self) -> Duration {
        Duration::from_millis(self.note_duration_ms)
    }

    /// Updates the field and marks the struct eligible to save.
    pub fn set_port_name(&mut self, port_name: &str) {
        if port_name != self.port_name {
            self.port_name = port_name.to_string();
            self.needs_save();
        }
    }

    /// Updates the field and marks the struct eligible to save.
    pub fn set_channel(&mut self, channel: MidiChannel) {
        if channel != self.channel {
            self.channel = channel;
            self.needs_save();
        }
    }

    /// Updates the field and marks the struct eligible to save. Values above
    /// [SenderSettings::MAX_VELOCITY] are clamped.
    pub fn set_note_on_velocity(&mut self, velocity: u8) {
        let velocity = Self::clamp_velocity("note-on velocity", velocity);
        if velocity != self.note_on_velocity {
            self.note_on_velocity = velocity;
            self.needs_save();
        }
    }

    /// Updates the field and marks the struct eligible to save. Values above
    /// [SenderSettings::MAX_VELOCITY] are clamped.
    pub fn set_note_off_velocity(&mut self, velocity: u8) {
        let velocity = Self::clamp_velocity("note-off velocity", velocity);
        if velocity != self.note_off_velocity {
            self.note_off_velocity = velocity;
            self.needs_save();
        }
    }

    /// Updates the field and marks the struct eligible to save.
    pub fn set_note_duration(&mut self, duration: Duration) {
        let ms = duration.as_millis() as u64;
        if ms != self.note_duration_ms {
            self.note_duration_ms = ms;
            self.needs_save();
        }
    }

    /// Reads settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut contents = String::new();
        let mut file = File::open(path)
            .map_err(|e| anyhow::format_err!("Couldn't open {path:?}: {}", e))?;
        file.read_to_string(&mut contents)
            .map_err(|e| anyhow::format_err!("Couldn't read {path:?}: {}", e))?;
        let mut settings = Self::from_json(&contents)
            .map_err(|e| anyhow::format_err!("Couldn't parse {path:?}: {}", e))?;
        settings.mark_clean();
        Ok(settings)
    }

    /// Writes settings as pretty-printed JSON and marks them clean.
    pub fn save(&mut self, path: &Path) -> anyhow::Result<()> {
        let json = self.to_json()?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(|e| {
                anyhow::format_err!("Unable to create {path:?} parent directories: {}", e)
            })?;
        }
        let mut file =
            File::create(path).map_err(|e| anyhow::format_err!("Unable to create {path:?}: {}", e))?;
        file.write_all(json.as_bytes())
            .map_err(|e| anyhow::format_err!("Unable to write {path:?}: {}", e))?;
        self.mark_clean();
        Ok(())
    }

    /// Parses settings, clamping out-of-range velocities.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.note_on_velocity =
            Self::clamp_velocity("note-on velocity", settings.note_on_velocity);
        settings.note_off_velocity =
            Self::clamp_velocity("note-off velocity", settings.note_off_velocity);
        Ok(settings)
    }

    #[allow(missing_docs)]
    pub fn to_json(&self) -> anyhow::Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|_| anyhow::format_err!("Unable to serialize settings JSON"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        pitch::Pitch,
        sender::NoteSender,
        sink::{MidiPort, RecordingSink},
    };
    use std::sync::Arc;

    #[test]
    fn defaults_match_the_instrument() {
        let settings = SenderSettings::default();
        assert_eq!(settings.port_name(), "MidiVR");
        assert_eq!(settings.channel(), MidiChannel::default());
        assert_eq!(settings.note_on_velocity(), 0x64);
        assert_eq!(settings.note_off_velocity(), 0x40);
        assert_eq!(settings.note_duration(), Duration::from_millis(500));
        assert!(!settings.has_been_saved());
    }

    #[test]
    fn setters_mark_dirty_only_on_change() {
        let mut settings = SenderSettings::default();
        settings.mark_clean();
        settings.set_note_on_velocity(0x64);
        assert!(settings.has_been_saved());
        settings.set_note_on_velocity(90);
        assert!(!settings.has_been_saved());

        settings.mark_clean();
        settings.set_channel(MidiChannel::new(3));
        assert!(!settings.has_been_saved());
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let settings =
            SenderSettings::from_json(r#"{ "channel": 2, "note-on-velocity": 80 }"#).unwrap();
        assert_eq!(settings.channel(), MidiChannel::new(2));
        assert_eq!(settings.note_on_velocity(), 80);
        assert_eq!(settings.note_off_velocity(), 0x40);
        assert_eq!(settings.port_name(), "MidiVR");
    }

    #[test]
    fn velocities_are_clamped_to_seven_bits() {
        let settings = SenderSettings::from_json(
            r#"{ "note-on-velocity": 200, "note-off-velocity": 128 }"#,
        )
        .unwrap();
        assert_eq!(settings.note_on_velocity(), 127);
        assert_eq!(settings.note_off_velocity(), 127);

        let mut settings = SenderSettings::default();
        settings.set_note_on_velocity(255);
        assert_eq!(settings.note_on_velocity(), 127);
        settings.set_note_off_velocity(127);
        assert_eq!(settings.note_off_velocity(), 127);

        // A sender built from clamped settings still makes sound.
        let sink = Arc::new(RecordingSink::default());
        let sender =
            NoteSender::new_with_settings(Arc::new(MidiPort::new_with(sink.clone())), &settings);
        sender.note_on_default(&Pitch::DEFAULT);
        assert_eq!(sink.messages(), vec![[0x90, 60, 127]]);
    }

    #[test]
    fn load_clamps_velocities() {
        let path = std::env::temp_dir().join(format!(
            "midivr-settings-clamp-test-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{ "note-on-velocity": 200 }"#).unwrap();
        let loaded = SenderSettings::load(&path).unwrap();
        assert_eq!(loaded.note_on_velocity(), 127);
        assert!(loaded.has_been_saved());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn json_round_trip() {
        let mut settings = SenderSettings::default();
        settings.set_port_name("Loopback");
        settings.set_note_duration(Duration::from_millis(250));
        let json = settings.to_json().unwrap();
        assert!(json.contains("\"port-name\": \"Loopback\""));
        assert_eq!(SenderSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn save_and_load() {
        let path = std::env::temp_dir().join(format!(
            "midivr-settings-test-{}.json",
            std::process::id()
        ));
        let mut settings = SenderSettings::default();
        settings.set_channel(MidiChannel::new(5));
        settings.save(&path).unwrap();
        assert!(settings.has_been_saved());

        let loaded = SenderSettings::load(&path).unwrap();
        assert_eq!(loaded.channel(), MidiChannel::new(5));
        assert!(loaded.has_been_saved());
        let _ = std::fs::remove_file(&path);
    }
}
