use std::mem;
use wasm_marshal_common::*;

#[no_mangle]
/// allocate a length of bytes that won't be dropped by the allocator
/// return the pointer to it so the host can write into it
///
/// the vector is created with exactly `len` capacity so that `deallocate` can rebuild it
pub extern "C" fn allocate(len: Len) -> GuestPtr {
    let dummy: Vec<u8> = vec![0; len as usize];
    let mut dummy = mem::ManuallyDrop::new(dummy);
    dummy.as_mut_ptr() as GuestPtr
}

#[no_mangle]
/// restore an allocation so that it is dropped immediately
/// this needs to be called on anything allocated above as the allocator
/// will never free the memory otherwise
///
/// `len` must be exactly what was passed to `allocate`, and every range must come back once.
/// anything else is undefined behaviour inside the guest allocator, there is no bookkeeping here
/// to catch it.
pub extern "C" fn deallocate(guest_ptr: GuestPtr, len: Len) {
    let _: Vec<u8> = unsafe { Vec::from_raw_parts(guest_ptr as _, len as _, len as _) };
}

/// Leak bytes so the host can take ownership of them.
/// The returned range must eventually go back through `deallocate`.
///
/// this is analagous to Box::into_raw()
pub fn leak_bytes(bytes: Vec<u8>) -> (GuestPtr, Len) {
    // shrink to an exact fit so the capacity matches the length the host will release with
    let bytes = mem::ManuallyDrop::new(bytes.into_boxed_slice());
    (bytes.as_ptr() as GuestPtr, bytes.len() as Len)
}

/// Leak a string and a descriptor pointing at it, returning the descriptor's offset.
///
/// Both the text and the descriptor's own DESCRIPTOR_BYTES are the host's to release.
pub fn leak_string(text: String) -> GuestPtr {
    let (text_ptr, len) = leak_bytes(text.into_bytes());
    let descriptor = StringDescriptor::from([text_ptr, len]);
    let descriptor_ptr = allocate(DESCRIPTOR_BYTES as Len);
    let descriptor_bytes = descriptor.to_le_bytes();
    unsafe {
        std::ptr::copy_nonoverlapping(
            descriptor_bytes.as_ptr(),
            descriptor_ptr as *mut u8,
            DESCRIPTOR_BYTES,
        );
    }
    descriptor_ptr
}
