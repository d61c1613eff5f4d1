// Copyright (c) 2024 Mike Tsao. All rights reserved.

use super::ProvidesService;
use crate::{midi::MidiChannel, pitch::Pitch, sender, sink::MidiPort};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use std::{
    cmp::Reverse,
    collections::BinaryHeap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

/// The app sends [TimedNoteServiceInput] messages to control the service.
#[derive(Debug)]
pub enum TimedNoteServiceInput {
    /// Turn these pitches on now, and off again after `duration`.
    Play {
        #[allow(missing_docs)]
        channel: MidiChannel,
        #[allow(missing_docs)]
        pitches: Arc<[Pitch]>,
        /// Used for both the note-ons and the note-offs.
        velocity: u8,
        #[allow(missing_docs)]
        duration: Duration,
    },

    /// Schedule note-offs for pitches the caller has already turned on.
    Release {
        #[allow(missing_docs)]
        channel: MidiChannel,
        #[allow(missing_docs)]
        pitches: Arc<[Pitch]>,
        #[allow(missing_docs)]
        velocity: u8,
        /// When the note-offs go out.
        deadline: Instant,
    },

    /// Stop taking input. Notes already playing still end on time, and the
    /// thread exits after the last one is released.
    Quit,
}

/// A group of note-offs waiting for their deadline.
#[derive(Debug)]
struct PendingRelease {
    deadline: Instant,
    // Breaks ties between equal deadlines in arrival order.
    sequence: u64,
    channel: MidiChannel,
    pitches: Arc<[Pitch]>,
    velocity: u8,
}
impl PartialEq for PendingRelease {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.sequence == other.sequence
    }
}
impl Eq for PendingRelease {}
impl PartialOrd for PendingRelease {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for PendingRelease {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        (self.deadline, self.sequence).cmp(&(other.deadline, other.sequence))
    }
}

/// [TimedNoteService] plays notes that turn themselves off. Each
/// [TimedNoteServiceInput::Play] sends its note-ons right away and schedules
/// the matching note-offs; a single timer thread handles every outstanding
/// note, so callers never block and overlapping notes don't interfere.
///
/// A note that has started can't be cut short. Dropping the service stops
/// it from taking new notes, but the thread lives on by itself until every
/// pending note-off has gone out at its deadline.
#[derive(Debug)]
pub struct TimedNoteService {
    sender: Sender<TimedNoteServiceInput>,
    pending: Arc<AtomicUsize>,
}
impl ProvidesService<TimedNoteServiceInput> for TimedNoteService {
    fn sender(&self) -> &Sender<TimedNoteServiceInput> {
        &self.sender
    }
}
impl TimedNoteService {
    /// Creates a new [TimedNoteService] that sends through `port`.
    pub fn new_with(port: Arc<MidiPort>) -> Self {
        let (sender, receiver) = crossbeam_channel::unbounded();
        let pending: Arc<AtomicUsize> = Default::default();
        Self::spawn_thread(receiver, port, Arc::clone(&pending));
        Self { sender, pending }
    }

    /// How many groups of note-offs are waiting for their deadline.
    pub fn pending_releases(&self) -> usize {
        self.pending.load(Ordering::Acquire)
    }

    // Sits in a loop, waking up for whichever comes first: the next input,
    // or the next release deadline. Once input stops, it only sleeps from one
    // deadline to the next until the heap is empty.
    fn spawn_thread(
        receiver: Receiver<TimedNoteServiceInput>,
        port: Arc<MidiPort>,
        pending: Arc<AtomicUsize>,
    ) {
        std::thread::spawn(move || {
            let mut releases: BinaryHeap<Reverse<PendingRelease>> = BinaryHeap::new();
            let mut sequence = 0u64;
            let mut accepting = true;
            loop {
                let now = Instant::now();
                while releases
                    .peek()
                    .is_some_and(|Reverse(next)| next.deadline <= now)
                {
                    if let Some(Reverse(release)) = releases.pop() {
                        Self::release(&port, &pending, release);
                    }
                }

                if !accepting {
                    match releases.peek() {
                        Some(Reverse(next)) => {
                            std::thread::sleep(next.deadline.saturating_duration_since(now));
                            continue;
                        }
                        None => break,
                    }
                }

                let input = match releases.peek() {
                    Some(Reverse(next)) => {
                        receiver.recv_timeout(next.deadline.saturating_duration_since(now))
                    }
                    None => receiver.recv().map_err(|_| RecvTimeoutError::Disconnected),
                };
                match input {
                    Ok(TimedNoteServiceInput::Play {
                        channel,
                        pitches,
                        velocity,
                        duration,
                    }) => {
                        pending.fetch_add(1, Ordering::AcqRel);
                        sender::send_note_ons(&port, channel, &pitches, velocity);
                        let deadline = Instant::now()
                            .checked_add(duration)
                            .unwrap_or_else(Instant::now);
                        releases.push(Reverse(PendingRelease {
                            deadline,
                            sequence,
                            channel,
                            pitches,
                            velocity,
                        }));
                        sequence = sequence.wrapping_add(1);
                    }
                    Ok(TimedNoteServiceInput::Release {
                        channel,
                        pitches,
                        velocity,
                        deadline,
                    }) => {
                        pending.fetch_add(1, Ordering::AcqRel);
                        releases.push(Reverse(PendingRelease {
                            deadline,
                            sequence,
                            channel,
                            pitches,
                            velocity,
                        }));
                        sequence = sequence.wrapping_add(1);
                    }
                    Ok(TimedNoteServiceInput::Quit) | Err(RecvTimeoutError::Disconnected) => {
                        accepting = false;
                        if !releases.is_empty() {
                            log::debug!(
                                "TimedNoteService: input closed, {} notes still to release",
                                releases.len()
                            );
                        }
                    }
                    Err(RecvTimeoutError::Timeout) => {}
                }
            }
            log::debug!("TimedNoteService exit");
        });
    }

    fn release(port: &MidiPort, pending: &AtomicUsize, release: PendingRelease) {
        sender::send_note_offs(port, release.channel, &release.pitches, release.velocity);
        pending.fetch_sub(1, Ordering::AcqRel);
    }
}
impl Drop for TimedNoteService {
    fn drop(&mut self) {
        self.send_input(TimedNoteServiceInput::Quit);
    }
}
