use crate::GuestPtr;
use crate::Len;
use crate::ValueKind;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Everything that can go wrong while moving values across the host/guest boundary.
///
/// There is no variant for malformed utf-8, text is always decoded lossily.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
#[rustfmt::skip]
pub enum MarshalError {
    /// the value has a kind with no defined encoding (null, array, object...)
    /// nothing was reserved in the guest
    #[error("unsupported value kind: {0}")]
    UnsupportedKind(String),
    /// the guest could not hand out a range of the requested size
    /// there is no retry policy, the allocation simply does not exist
    #[error("guest failed to reserve {len} bytes: {reason}")]
    Reservation { len: Len, reason: String },
    /// the guest rejected a release, e.g. the length does not match the reservation
    /// the handle is consumed regardless and the range may now be leaked
    #[error("guest failed to release {len} bytes at {guest_ptr:#x}: {reason}")]
    Release { guest_ptr: GuestPtr, len: Len, reason: String },
    /// something went wrong while writing or reading bytes to/from wasm memory
    /// in practice this means the range is outside the guest's linear memory
    #[error("memory access of {len} bytes at {guest_ptr:#x} failed: {reason}")]
    Memory { guest_ptr: GuestPtr, len: Len, reason: String },
    /// a length or offset does not fit in a wasm32 u32
    #[error("length or offset does not fit in wasm32")]
    PointerMap,
    /// bytes read back as a fixed width kind have the wrong length
    #[error("{kind} needs {expected} bytes, got {actual}")]
    WrongLength { kind: ValueKind, expected: usize, actual: usize },
    /// a string descriptor must be exactly DESCRIPTOR_BYTES long
    #[error("string descriptor must be 8 bytes, got {0}")]
    Descriptor(usize),
    /// the guest does not export something the host relies on, or exports it with the wrong type
    #[error("guest export {name} unavailable: {reason}")]
    Export { name: String, reason: String },
    /// a guest function trapped
    #[error("guest call {name} failed: {reason}")]
    Call { name: String, reason: String },
    /// the wasm failed to compile or instantiate
    #[error("failed to build module: {0}")]
    ModuleBuild(String),
}

impl From<std::num::TryFromIntError> for MarshalError {
    fn from(_: std::num::TryFromIntError) -> Self {
        Self::PointerMap
    }
}

pub type MarshalResult<T> = Result<T, MarshalError>;
