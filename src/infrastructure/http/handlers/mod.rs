//! HTTP Handlers

mod clone;
mod ping;
mod voice;

pub use clone::*;
pub use ping::*;
pub use voice::*;
