//! Texture loading with a placeholder-then-swap scheme.
//!
//! A scene gets a usable 1x1 placeholder immediately; the real image is
//! decoded on a background thread and swapped in when it arrives. Consumers
//! watch the slot's generation counter to notice the swap.

mod loader;

pub use loader::{default_sampler, SceneTexture};
