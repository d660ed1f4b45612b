//! Platform abstraction layer
//!
//! The engine itself is platform-free. On the web, `web` exposes a
//! [`WebSession`](web::WebSession) to JavaScript, which owns DOM rendering,
//! input binding and audio and drives the session clock from
//! `requestAnimationFrame`.

#[cfg(target_arch = "wasm32")]
pub mod web;
