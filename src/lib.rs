//! An insertion-ordered map that is also a position-indexed sequence.
//!
//! This crate provides [`OrderedMap`], which keeps its entries in an explicit order
//! and lets callers address them either by position or by unique key:
//!
//! - [`index_of`](OrderedMap::index_of) - Get the position of a key in O(1)
//! - [`insert_at`](OrderedMap::insert_at) / [`remove_at`](OrderedMap::remove_at) /
//!   [`move_index`](OrderedMap::move_index) - Reorder entries while the key index
//!   stays consistent
//! - Indexing by [`Position`] - e.g., `map[Position(0)]` for the first value
//!
//! # Example
//!
//! ```
//! use dual_map::{OrderedMap, Position};
//!
//! let mut steps = OrderedMap::new();
//! steps.set_value("fetch", 10);
//! steps.set_value("build", 20);
//! steps.insert_at(0, "clean", 5).unwrap();
//!
//! // Positional and keyed access agree.
//! assert_eq!(steps.index_of("fetch"), Some(1));
//! assert_eq!(steps[Position(0)], 5);
//! assert_eq!(steps["build"], 20);
//!
//! // Reordering keeps every key reachable.
//! steps.move_index(2, 0).unwrap();
//! assert_eq!(steps.keys().iter().flatten().copied().collect::<Vec<_>>(), ["build", "clean", "fetch"]);
//! assert_eq!(steps.index_of("clean"), Some(1));
//! ```
//!
//! # Persisted data
//!
//! A map is saved as two parallel sequences, [`Persisted`], and loaded back through
//! reconciliation: mismatched lengths, missing keys and repeated keys never fail a
//! load. Offending slots stay visible by position and are reported through
//! [`Diagnostics`] and `tracing` warnings.
//!
//! # Features
//!
//! - **`no_std` compatible** - Only requires `alloc`, no standard library dependency
//! - **Strict cursors** - A [`Cursor`] fails on its next step after any structural
//!   change, even an append
//! - **`serde`** (optional) - Serializes the persisted form and reconciles on
//!   deserialization

#![no_std]
// These forbid rules and lint groups are meant to be very restrictive.
#![forbid(unsafe_code)]
#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]
// Enable coverage attributes for nightly builds.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

extern crate alloc;

mod cursor;
mod diagnostics;
mod error;
mod persisted;
mod position;
mod raw;
mod sequence;

pub mod ordered_map;

pub use cursor::{Cursor, CursorState};
pub use diagnostics::{Diagnostics, LengthMismatch};
pub use error::{Error, Result};
pub use ordered_map::{KeysView, OrderedMap, ValuesView};
pub use persisted::Persisted;
pub use position::Position;
pub use sequence::{OrderedSequence, SequenceMut};
