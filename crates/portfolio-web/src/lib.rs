#![forbid(unsafe_code)]

//! Browser host for `portfolio-core`.
//!
//! On load the module installs `window.portfolioApp`, waits for
//! `DOMContentLoaded`, then wires every listener and observer the controller
//! asks for. File decoding and deferred style changes run on the browser's
//! own `FileReader` and `setTimeout`.

pub mod registry;
pub mod timeout;

#[cfg(target_arch = "wasm32")]
pub mod file_read;
#[cfg(target_arch = "wasm32")]
pub mod web_dom;

#[cfg(target_arch = "wasm32")]
mod wasm;
