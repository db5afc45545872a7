//! Lock-free atomic updaters for **individual struct fields**, resolved by
//! name and type-checked once at construction.
//!
//! Derive [`FieldUpdaters`] on a struct and declare the fields you want to
//! drive atomically as [`Volatile<V>`]. An [`AtomicFieldUpdater<Owner, V>`]
//! then performs `get`, `set`, `lazy_set`, `compare_and_set`,
//! `weak_compare_and_set` and `get_and_set` on that field of any `Owner`
//! instance, without the owner exposing methods for it.
//!
//! # Quick Start
//!
//! ```rust
//! use field_updater::{AtomicFieldUpdater, FieldUpdaters, Volatile};
//!
//! #[allow(dead_code)]
//! #[derive(FieldUpdaters)]
//! struct Job {
//!     state: Volatile<u32>,
//!     attempts: u32,
//! }
//!
//! let state = AtomicFieldUpdater::<Job, u32>::new("state").unwrap();
//!
//! let job = Job { state: Volatile::new(0), attempts: 0 };
//! assert!(state.compare_and_set(&job, &0, 1));
//! assert!(!state.compare_and_set(&job, &0, 2));
//! assert_eq!(state.get(&job), 1);
//! ```
//!
//! # Resolution errors
//!
//! Construction checks, in order, that the field exists, that it holds the
//! requested value type, and that it is volatile:
//!
//! ```rust
//! # use field_updater::{AtomicFieldUpdater, FieldUpdaters, UpdaterError, Volatile};
//! # #[allow(dead_code)]
//! # #[derive(FieldUpdaters)]
//! # struct Job { state: Volatile<u32>, attempts: u32 }
//! use std::error::Error;
//!
//! let missing = AtomicFieldUpdater::<Job, u32>::new("owner").unwrap_err();
//! assert!(matches!(missing, UpdaterError::LookupFailure(_)));
//! assert!(missing.source().is_some());
//!
//! let wrong_type = AtomicFieldUpdater::<Job, u64>::new("state").unwrap_err();
//! assert!(matches!(wrong_type, UpdaterError::TypeMismatch { .. }));
//!
//! let not_volatile = AtomicFieldUpdater::<Job, u32>::new("attempts").unwrap_err();
//! assert!(matches!(not_volatile, UpdaterError::NotVolatile { .. }));
//! ```
//!
//! # Reference fields
//!
//! `Arc<T>` and `Option<Arc<T>>` fields compare by identity:
//!
//! ```rust
//! # use field_updater::{FieldUpdaters, Volatile};
//! use std::sync::Arc;
//!
//! #[derive(FieldUpdaters, Default)]
//! struct Slot {
//!     value: Volatile<Option<Arc<String>>>,
//! }
//!
//! let slot = Slot::default();
//! let value = Slot::value_updater();
//!
//! let a = Arc::new(String::from("a"));
//! assert!(value.compare_and_set(&slot, &None, Some(a.clone())));
//! // An equal string in a different allocation does not match.
//! assert!(!value.compare_and_set(&slot, &Some(Arc::new("a".into())), None));
//! assert!(value.compare_and_set(&slot, &Some(a), None));
//! ```
//!
//! # Generated Items
//!
//! For a struct `Foo`, `#[derive(FieldUpdaters)]` generates:
//!
//! | Item | Purpose |
//! |------|---------|
//! | `unsafe impl FieldTable for Foo` | Name lookup used by [`AtomicFieldUpdater::new`] |
//! | `Foo::x_updater()` | Infallible updater for each `Volatile` field `x` |
//!
//! Field attributes: `#[updater(skip)]` leaves a field out of the table,
//! `#[updater(rename = "name")]` registers it under a different lookup name.

extern crate self as field_updater;

mod descriptor;
mod error;
mod updater;
mod value;
mod volatile;

pub use descriptor::{FieldDescriptor, FieldMeta, FieldTable, LookupError};
pub use error::UpdaterError;
pub use field_updater_derive::FieldUpdaters;
pub use updater::AtomicFieldUpdater;
pub use value::{AtomicCell, AtomicF32, AtomicF64, FieldValue, ValueKind};
pub use volatile::{Volatile, VolatileField};
