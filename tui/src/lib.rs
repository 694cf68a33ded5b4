//! Aura TUI - Terminal surface for the Aura wellness companion
//!
//! A phone-sized frame in the middle of the terminal, driven by the
//! headless `companion-core` crate.
//!
//! # Architecture
//!
//! - **App**: event loop, input routing and chat reply tasks
//! - **Pages**: one module per screen, rebuilt on every visit
//! - **Hits**: click areas recorded while drawing
//! - **Widgets**: avatar face, bottom navigation, chat transcript

pub mod app;
pub mod hits;
pub mod pages;
pub mod theme;
pub mod widgets;

pub use app::App;
