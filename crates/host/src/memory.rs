use wasm_marshal_common::GuestPtr;
use wasm_marshal_common::Len;
use wasm_marshal_common::MarshalResult;

/// Everything the host needs from a guest to marshal values into it.
///
/// `reserve` and `release` are calls into the guest's own allocator, the host never decides
/// where anything lives. `read` and `write` copy bytes in and out of the guest's linear memory
/// and must fail rather than touch anything outside it.
///
/// Implementors make no attempt to detect overlapping use of a range, the caller is expected to
/// only touch ranges it holds an `Allocation` for.
pub trait GuestMemory {
    /// Ask the guest for `len` bytes that nothing else is using.
    fn reserve(&mut self, len: Len) -> MarshalResult<GuestPtr>;

    /// Hand a range back to the guest. `len` must match the reservation exactly.
    fn release(&mut self, guest_ptr: GuestPtr, len: Len) -> MarshalResult<()>;

    fn read(&self, guest_ptr: GuestPtr, len: Len) -> MarshalResult<Vec<u8>>;

    fn write(&mut self, guest_ptr: GuestPtr, bytes: &[u8]) -> MarshalResult<()>;
}

impl<G: GuestMemory + ?Sized> GuestMemory for &mut G {
    fn reserve(&mut self, len: Len) -> MarshalResult<GuestPtr> {
        (**self).reserve(len)
    }

    fn release(&mut self, guest_ptr: GuestPtr, len: Len) -> MarshalResult<()> {
        (**self).release(guest_ptr, len)
    }

    fn read(&self, guest_ptr: GuestPtr, len: Len) -> MarshalResult<Vec<u8>> {
        (**self).read(guest_ptr, len)
    }

    fn write(&mut self, guest_ptr: GuestPtr, bytes: &[u8]) -> MarshalResult<()> {
        (**self).write(guest_ptr, bytes)
    }
}
