// Copyright (c) 2023 Mike Tsao. All rights reserved.

//! The boundary between this crate and whatever actually carries MIDI bytes.
//!
//! A [MidiSink] takes raw three-byte messages. A [MidiPort] is the slot that
//! senders hold on to: it may be empty, and a sink can be plugged in (or
//! pulled out) at any time. An empty or failing port turns every send into a
//! no-op, and says so in the log exactly once.

use crate::{
    error::{MidiVrError, Result},
    midi::{MidiChannel, MidiMessage, MidiUtils},
};
use crossbeam_channel::{Receiver, Sender};
use once_cell::sync::OnceCell;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, RwLock,
};

/// Something that transmits raw MIDI messages.
///
/// Implementations are shared between threads, so each call to
/// [MidiSink::send_raw()] must put the whole triple on the wire before any
/// other caller's triple.
pub trait MidiSink: Send + Sync + core::fmt::Debug {
    /// Transmits `[status, data1, data2]`.
    fn send_raw(&self, bytes: [u8; 3]) -> Result<()>;
}

/// A pluggable, possibly empty, slot for a [MidiSink].
#[derive(Debug, Default)]
pub struct MidiPort {
    sink: RwLock<Option<Arc<dyn MidiSink>>>,
    has_reported_failure: AtomicBool,
}
impl MidiPort {
    /// A port with `sink` already installed.
    pub fn new_with(sink: Arc<dyn MidiSink>) -> Self {
        Self {
            sink: RwLock::new(Some(sink)),
            has_reported_failure: Default::default(),
        }
    }

    /// The process-wide port, created empty on first use. Prefer passing an
    /// explicit `Arc<MidiPort>` around; this exists for callers that have no
    /// good way to receive one.
    pub fn global() -> &'static Arc<MidiPort> {
        static INSTANCE: OnceCell<Arc<MidiPort>> = OnceCell::new();
        INSTANCE.get_or_init(Default::default)
    }

    /// Plugs in a sink, replacing any previous one.
    pub fn install(&self, sink: Arc<dyn MidiSink>) {
        if let Ok(mut slot) = self.sink.write() {
            log::debug!("MidiPort: installing {sink:?}");
            *slot = Some(sink);
        }
    }

    /// Unplugs the current sink, if any.
    pub fn take(&self) -> Option<Arc<dyn MidiSink>> {
        self.sink.write().ok().and_then(|mut slot| slot.take())
    }

    /// Whether a sink is installed.
    pub fn is_available(&self) -> bool {
        self.sink.read().map(|slot| slot.is_some()).unwrap_or_default()
    }

    /// Encodes and transmits one message, reporting what went wrong.
    pub fn try_send(&self, channel: MidiChannel, message: &MidiMessage) -> Result<()> {
        let bytes = MidiUtils::encode(channel, message)?;
        self.try_send_raw(bytes)
    }

    /// Transmits an already-encoded triple.
    pub fn try_send_raw(&self, bytes: [u8; 3]) -> Result<()> {
        let sink = self
            .sink
            .read()
            .ok()
            .and_then(|slot| slot.clone())
            .ok_or(MidiVrError::SinkUnavailable)?;
        log::trace!("MidiPort: {bytes:02x?}");
        sink.send_raw(bytes)
    }

    /// Like [MidiPort::try_send()], but never fails. A missing or broken sink
    /// is logged once per port and then ignored; an unencodable message is
    /// logged at debug level and dropped.
    pub fn send(&self, channel: MidiChannel, message: &MidiMessage) {
        match self.try_send(channel, message) {
            Ok(()) => {}
            Err(e @ (MidiVrError::SinkUnavailable | MidiVrError::Transport(_))) => {
                self.report_failure_once(&e)
            }
            Err(e) => log::debug!("MidiPort: dropping {message:?}: {e}"),
        }
    }

    /// Whether [MidiPort::send()] has already logged a sink failure.
    pub fn has_reported_failure(&self) -> bool {
        self.has_reported_failure.load(Ordering::Relaxed)
    }

    fn report_failure_once(&self, e: &MidiVrError) {
        if !self.has_reported_failure.swap(true, Ordering::Relaxed) {
            log::warn!("MidiPort: {e}; further MIDI output will be dropped silently");
        }
    }
}

/// Keeps every triple it receives. Useful for tests and dry runs.
#[derive(Debug, Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<[u8; 3]>>,
}
impl MidiSink for RecordingSink {
    fn send_raw(&self, bytes: [u8; 3]) -> Result<()> {
        self.messages
            .lock()
            .map_err(|e| MidiVrError::Transport(e.to_string()))?
            .push(bytes);
        Ok(())
    }
}
impl RecordingSink {
    /// A copy of everything received so far, in arrival order.
    pub fn messages(&self) -> Vec<[u8; 3]> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Everything received so far, decoded.
    pub fn decoded(&self) -> Vec<(MidiChannel, MidiMessage)> {
        self.messages()
            .iter()
            .filter_map(MidiUtils::decode)
            .collect()
    }

    /// Forgets everything received so far.
    pub fn clear(&self) {
        if let Ok(mut m) = self.messages.lock() {
            m.clear();
        }
    }
}

/// Forwards each triple into a crossbeam channel, for consumers that live on
/// another thread.
#[derive(Debug)]
pub struct ChannelSink {
    sender: Sender<[u8; 3]>,
}
impl MidiSink for ChannelSink {
    fn send_raw(&self, bytes: [u8; 3]) -> Result<()> {
        self.sender
            .send(bytes)
            .map_err(|e| MidiVrError::Transport(e.to_string()))
    }
}
impl ChannelSink {
    #[allow(missing_docs)]
    pub fn new_with(sender: Sender<[u8; 3]>) -> Self {
        Self { sender }
    }

    /// A sink plus the receiving end of its channel.
    pub fn new_pair() -> (Self, Receiver<[u8; 3]>) {
        let (sender, receiver) = crossbeam_channel::unbounded();
        (Self::new_with(sender), receiver)
    }
}

#[cfg(feature = "midir")]
pub use midir_sink::MidirSink;

#[cfg(feature = "midir")]
mod midir_sink {
    use super::MidiSink;
    use crate::error::{MidiVrError, Result};
    use std::sync::Mutex;

    /// Sends to an OS MIDI output through [midir].
    pub struct MidirSink {
        connection: Mutex<midir::MidiOutputConnection>,
        port_name: String,
    }
    impl core::fmt::Debug for MidirSink {
        fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
            f.debug_struct("MidirSink")
                .field("port_name", &self.port_name)
                .finish()
        }
    }
    impl MidiSink for MidirSink {
        fn send_raw(&self, bytes: [u8; 3]) -> Result<()> {
            let mut connection = self
                .connection
                .lock()
                .map_err(|e| MidiVrError::Transport(e.to_string()))?;
            connection
                .send(&bytes)
                .map_err(|e| MidiVrError::Transport(e.to_string()))
        }
    }
    impl MidirSink {
        /// Connects to the first output port whose name contains
        /// `port_hint`, or to the first port at all if there's no hint.
        pub fn connect(client_name: &str, port_hint: Option<&str>) -> Result<Self> {
            let output = midir::MidiOutput::new(client_name)
                .map_err(|e| MidiVrError::Transport(e.to_string()))?;
            let ports = output.ports();
            let port = ports
                .iter()
                .find(|port| match port_hint {
                    Some(hint) => output
                        .port_name(port)
                        .map(|name| name.contains(hint))
                        .unwrap_or_default(),
                    None => true,
                })
                .cloned()
                .ok_or(MidiVrError::SinkUnavailable)?;
            let port_name = output.port_name(&port).unwrap_or_default();
            let connection = output
                .connect(&port, client_name)
                .map_err(|e| MidiVrError::Transport(e.to_string()))?;
            log::info!("MidirSink: connected to {port_name}");
            Ok(Self {
                connection: Mutex::new(connection),
                port_name,
            })
        }

        /// Publishes a virtual output port that other applications can
        /// subscribe to.
        #[cfg(unix)]
        pub fn create_virtual(port_name: &str) -> Result<Self> {
            use midir::os::unix::VirtualOutput;

            let output = midir::MidiOutput::new(port_name)
                .map_err(|e| MidiVrError::Transport(e.to_string()))?;
            let connection = output
                .create_virtual(port_name)
                .map_err(|e| MidiVrError::Transport(e.to_string()))?;
            log::info!("MidirSink: created virtual port {port_name}");
            Ok(Self {
                connection: Mutex::new(connection),
                port_name: port_name.to_string(),
            })
        }

        #[allow(missing_docs)]
        pub fn port_name(&self) -> &str {
            &self.port_name
        }
    }
}
