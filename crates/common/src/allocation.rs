use crate::GuestPtr;
use crate::Len;

/// Allocation is an offset/length pair for a live range of guest memory.
///
/// the offset always represents a position in wasm linear memory _never_ on the host
/// the length always represents u8 bytes _not_ items
///
/// The Allocation intentionally does not implement Clone or Copy.
/// Releasing consumes it, so safe code cannot hand the same range back to the guest twice.
/// If the guest reuses the freed offset for a later reservation, a stale copy of the old
/// handle would release somebody else's bytes.
#[derive(Debug, PartialEq, Eq)]
pub struct Allocation {
    guest_ptr: GuestPtr,
    len: Len,
}

impl Allocation {
    /// Wrap a range the caller already owns.
    ///
    /// The host allocator builds these from its own reservations. Anything else (e.g. the
    /// ranges a guest hands over through a string descriptor) must come from the guest
    /// and must not be wrapped twice.
    pub fn from_raw_parts(guest_ptr: GuestPtr, len: Len) -> Self {
        Self { guest_ptr, len }
    }

    pub fn guest_ptr(&self) -> GuestPtr {
        self.guest_ptr
    }

    pub fn len(&self) -> Len {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Exclusive end offset of the range, if it fits in wasm32.
    pub fn end(&self) -> Option<GuestPtr> {
        self.guest_ptr.checked_add(self.len)
    }
}

impl std::fmt::Display for Allocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}+{}", self.guest_ptr, self.len)
    }
}
