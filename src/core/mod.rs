//! # Core Playback Logic
//!
//! This module contains termfolio's scripted-session logic.
//! It knows nothing about any specific output technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Session (prompt)     │
//!                    │  • Step (script)        │
//!                    │  • play() (interpreter) │
//!                    │                         │
//!                    │  Output via Renderer.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                    ┌───────────┴───────────┐
//!                    ▼                       ▼
//!             ┌────────────┐          ┌────────────┐
//!             │  Terminal  │          │ Transcript │
//!             │ (crossterm)│          │ (headless) │
//!             └────────────┘          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`session`]: what the prompt prefix shows
//! - [`prompt`]: typewriter, new line, output and tree primitives
//! - [`script`]: the `Step` enum and the `play` interpreter
//! - [`portfolio`]: the fixed script built from fetched data
//! - [`config`]: config file and override resolution

pub mod config;
pub mod delay;
pub mod portfolio;
pub mod prompt;
pub mod render;
pub mod script;
pub mod session;
pub mod tree;
