//! Nullable infrastructure for deterministic testing.
//!
//! Components that read the wall clock take a `&dyn Clock`; tests swap in
//! [`NullClock`] so permit deadlines can be crossed on demand.

pub mod clock;

pub use clock::NullClock;
