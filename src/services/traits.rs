// Copyright (c) 2024 Mike Tsao. All rights reserved.

use crossbeam_channel::Sender;

/// Service methods.
///
/// A service is something that usually runs in its own thread, as a daemon, and
/// that communicates with client(s) by crossbeam channels. It accepts Inputs.
pub trait ProvidesService<I: core::fmt::Debug> {
    /// The sender side of the Input channel. Use this to send commands to the
    /// service.
    fn sender(&self) -> &Sender<I>;

    /// A convenience method to send Inputs to the service.
    fn send_input(&self, input: I) {
        if let Err(e) = self.sender().try_send(input) {
            log::warn!("While sending: {e:?}");
        }
    }
}
