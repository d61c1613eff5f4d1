// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! Long-running services that are useful to a music application.

/// The most commonly used imports.
pub mod prelude {
    pub use super::{ProvidesService, TimedNoteService, TimedNoteServiceInput};
}

pub use timed_note::{TimedNoteService, TimedNoteServiceInput};
pub use traits::ProvidesService;

mod timed_note;
mod traits;
