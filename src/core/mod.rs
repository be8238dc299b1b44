//! # Core Application Logic
//!
//! This module contains StudyMate's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • Session (state)      │
//!                    │  • SessionController    │
//!                    │  • Action / update()    │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┴───────────────────┐
//!            ▼                                       ▼
//!     ┌────────────┐                          ┌────────────┐
//!     │    TUI     │                          │  Backend   │
//!     │  Adapter   │                          │  (reqwest) │
//!     │ (ratatui)  │                          │            │
//!     └────────────┘                          └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`session`]: the per-session object and its turn types
//! - [`controller`]: `SessionController`, the only writer of a `Session`
//! - [`action`]: the `Action` enum and `update()` reducer the TUI drives
//! - [`state`]: the `App` struct wrapping the controller with UI status
//! - [`error`]: one error type per operation
//! - [`config`]: config file and override resolution

pub mod action;
pub mod config;
pub mod controller;
pub mod error;
pub mod session;
pub mod state;
