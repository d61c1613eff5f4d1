// Copyright (c) 2024 Mike Tsao. All rights reserved.

//! Useful things that don't have anything to do with music theory.

/// The most commonly used imports.
pub mod prelude {
    pub use super::SenderSettings;
}

pub use settings::SenderSettings;

pub mod settings;
