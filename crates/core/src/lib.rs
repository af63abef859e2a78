//! Dynvar Core: typed dynamic variables keyed by name
//!
//! A [`VarMap`] holds named fields whose values can be any of a small closed
//! set of types. Looking up a key that does not exist creates it, and asking
//! for a key as a specific type promotes the field to that type while keeping
//! its value. Maps persist to a line-oriented text format where a short sigil
//! in front of each key records its type, optionally wrapped in gzip.
//!
//! Key design principles:
//! - Value: what a field holds (bool, integers, floats, string, opaque object)
//! - Field: a value plus the variant it is pinned to; reads coerce to the variant
//! - Var: shared handle to one field, so updates are visible through every clone
//!
//! # Modules
//!
//! - `value`: the tagged [`Value`] union and its loose equality
//! - `coerce`: [`Variant`] and the coercion table between value kinds
//! - `arithmetic`: left-operand-wins arithmetic on values
//! - `field` / `var`: a single field and its shared handle
//! - `map`: the auto-vivifying, promoting [`VarMap`]
//! - `direct`: raw slot access that bypasses inference
//! - `literal`: literal classification used when decoding
//! - `codec`: the sigil-tagged text format
//! - `disk`, `store`, `config`: file persistence with optional gzip
//! - `time`: wall-clock helpers for time fields

pub mod arithmetic;
pub mod codec;
pub mod coerce;
pub mod config;
pub mod direct;
pub mod disk;
pub mod error;
pub mod field;
pub mod literal;
pub mod map;
pub mod store;
pub mod time;
pub mod value;
pub mod var;

// Re-export key types
pub use coerce::Variant;
pub use field::Field;
pub use map::VarMap;
pub use value::{FromValue, Opaque, Value, ValueKind};
pub use var::Var;

// Persistence
pub use codec::LoadReport;
pub use config::StoreConfig;
pub use disk::Framing;
pub use store::VarStore;

// Error handling
pub use error::{CodecError, ConfigError, StoreError, VarError};
