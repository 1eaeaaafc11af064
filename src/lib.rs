//! newsdesk: client core of a news dashboard.
//!
//! ```text
//!  user action ──► capture / feed / digest / stats ──► api (HttpNewsApi)
//!                         │                                │
//!                         ▼                                ▼
//!                 view (render models) ◄── notify ◄── result or error
//! ```
//!
//! Controllers own their state and draw through the [`view::View`] trait, so
//! the whole pipeline runs against any render surface.

pub mod api;
pub mod capture;
pub mod command;
pub mod config;
pub mod console;
pub mod dashboard;
pub mod digest;
pub mod error;
pub mod feed;
pub mod models;
pub mod notify;
pub mod overlay;
pub mod stats;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::{Mutex, MutexGuard};

/// Lock a mutex, recovering the data if a previous holder panicked.
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
