// src/lib.rs
//! Haunted House
//!
//! A night scene rendered with wgpu and winit: a house on a textured lawn,
//! procedurally scattered graves, moonlight, fog and three ghost lights
//! circling the house.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod wgpu_utils;
pub mod world;

#[cfg(test)]
mod test_support;

// Re-export main types for convenience
pub use app::HauntedHouseApp;
pub use config::SceneConfig;
pub use world::HauntedScene;

/// Creates the application with the default scene and asset root from the environment
pub fn default() -> anyhow::Result<HauntedHouseApp> {
    HauntedHouseApp::new(SceneConfig::from_env())
}
