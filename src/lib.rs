#![forbid(unsafe_code)]

pub mod animation;
pub mod artnet;
pub mod audio;
pub mod buffer;
pub mod color;
pub mod config;
pub mod core;
pub mod error;
pub mod layout;
pub mod math;
pub mod player;

pub use animation::{Animation, AnimationKind};
pub use artnet::ArtNetClient;
pub use audio::{AudioProvider, NoAudio, SpectrumFeed, SpectrumSource};
pub use buffer::PixelBuffer;
pub use config::SessionConfig;
pub use crate::core::{Canvas, Nanos, Rgb8};
pub use error::{LedfxError, LedfxResult};
pub use layout::{Device, PixelMapping, compose_device};
pub use player::Player;
