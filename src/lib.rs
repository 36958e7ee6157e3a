pub mod app;
pub mod audio;
pub mod color;
pub mod config;
pub mod error;
pub mod palette;
pub mod particles;
pub mod platform;
pub mod render;
pub mod render_loop;
pub mod surface;
pub mod synth;
pub mod terminal;

pub use error::{Error, Result};
