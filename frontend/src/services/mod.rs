//! Browser-side services.
//!
//! # Services
//!
//! - [`http`] - `StorageApi` over `gloo-net`
//! - [`timer`] - `Pause` over `gloo-timers`
//! - [`files`] - reading picked files into memory

pub mod files;
pub mod http;
pub mod timer;

pub use files::*;
pub use http::*;
pub use timer::*;
