//! Runtime support primitives for protolite messages.
//!
//! Generated and reflective message code leans on this crate for the parts of
//! the runtime with bit-level or ordering invariants. It has **no internal
//! protolite dependencies**, a pure leaf crate that the schema and codec
//! layers build on.
//!
//! # Services
//!
//! ```text
//! LongBits ← 64-bit values as two u32 words
//!     └── from_value / from_number / parse   (number, text, {low, high})
//!     └── to_hash ⇄ from_hash                (8-byte map key, bijective)
//!     └── to_number                          (lossy above 2^53)
//!
//! OneOf ← one per oneof group, shared by every instance
//!     └── get(msg)       → last-assigned present member
//!     └── set(msg, name) → clears the other members
//!
//! resolve_lazy ← once, after the namespace tree is complete
//!     └── LazyRef::Unresolved(path) → Resolved(node) | Absent
//! ```
//!
//! # Key Types
//!
//! |---------------------|--------------------------------------------|
//! | Type                | Purpose                                    |
//! |---------------------|--------------------------------------------|
//! | [`LongBits`]        | 64-bit bit pattern as `lo`/`hi` words      |
//! | [`LongHash`]        | Opaque 8-byte key form of a `LongBits`     |
//! | [`OneOf`]           | Getter/setter for one oneof group          |
//! | [`FieldSet`]        | What a message must expose to a `OneOf`    |
//! | [`DynamicMessage`]  | Assignment-ordered `FieldSet`              |
//! | [`LazyRef`]         | Pending, resolved, or absent type ref      |
//! | [`ReferenceTable`]  | Keyed collection of `LazyRef`s             |
//! | [`Namespace`]       | Namespace tree node                        |
//! |---------------------|--------------------------------------------|

pub mod error;
pub mod lazy;
pub mod long_bits;
pub mod message;
pub mod namespace;
pub mod oneof;

// Re-export primary types at crate root for convenience.
pub use error::{LongBitsError, NamespaceError};
pub use lazy::{LazyRef, Lookup, ReferenceTable, ResolveStats, resolve_lazy, resolve_path};
pub use long_bits::{Long, LongBits, LongHash, LongValue, ZERO_HASH, long_ne};
pub use message::DynamicMessage;
pub use namespace::{Namespace, NodeKind};
pub use oneof::{FieldSet, OneOf};
