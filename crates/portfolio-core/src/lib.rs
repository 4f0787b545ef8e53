#![forbid(unsafe_code)]

//! `portfolio-core` drives the interactive parts of the portfolio page:
//! image previews, smooth anchor scrolling, scroll-triggered reveals, hover
//! and ripple effects, and the responsive profile picture.
//!
//! Design goals:
//! - **Host-independent**: the page is reached only through the [`Dom`]
//!   trait; `portfolio-web` implements it over `web-sys`, [`MemoryDom`]
//!   implements it for tests.
//! - **Host-driven**: the host forwards events and reports monotonic time;
//!   nothing here blocks, spawns or owns a timer.
//! - **Graceful absence**: missing markup turns a feature off, never fails.
//!
//! [`Dom`]: dom::Dom
//! [`MemoryDom`]: memory_dom::MemoryDom

pub mod clock;
pub mod config;
pub mod controller;
pub mod dom;
pub mod effects;
pub mod error;
pub mod markup;
pub mod memory_dom;
pub mod reveal;
pub mod scroll;
pub mod styles;
pub mod upload;

pub use config::PortfolioConfig;
pub use controller::{Dispatch, ListenerKind, ListenerSpec, ObserverSpec, PortfolioController, UiEvent, Wiring};
pub use dom::{Dom, NodeId, Rect, ScrollOptions, Selector};
pub use error::{ConfigError, UploadError};
pub use reveal::{IntersectionEntry, ObserverKind};
pub use upload::{BindingKind, SelectedFile, UploadTicket};
