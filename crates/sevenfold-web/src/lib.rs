#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod gpu;
pub mod input;
#[cfg(target_arch = "wasm32")]
mod start;
pub mod ui;
