//! Nothing but the allocator exports pulled in from the guest crate.
pub use wasm_marshal_guest::allocation::*;
