//! Platform abstraction layer
//!
//! Browser bridge for the wasm32 build: pointer events and animation frames
//! come in from JS, the renderer collaborator is reached through JS functions.
//! Native builds drive `Game` directly (see the `disc-combat` binary).

#[cfg(target_arch = "wasm32")]
pub mod web;
