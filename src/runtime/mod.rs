//! Single-writer catalog loop: owns the store, sequences fetches, debounces search.

/// Events broadcast by the loop.
pub mod events;
/// Handle, config, and command loop.
pub mod handle;
