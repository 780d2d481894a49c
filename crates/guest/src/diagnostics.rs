//! The guest's half of the diagnostic calls. Each wasm that wants them re-exports these under the
//! names in `abi` with `#[no_mangle]` wrappers.
use crate::allocation;
use crate::host_print;
use wasm_marshal_common::*;

/// One line for the range and one per byte, in the order they sit in memory.
pub fn byte_report(guest_ptr: GuestPtr, bytes: &[u8]) -> Vec<String> {
    std::iter::once(format!("[wasm] reading {} bytes from {:#x}", bytes.len(), guest_ptr))
        .chain(bytes.iter().map(|byte| format!("[wasm] {}", byte)))
        .collect()
}

/// Borrow a range of our own memory that the host points at.
///
/// Offset 0 is real wasm memory but a null pointer to rust, and the guest allocator never hands
/// it out, so any non-empty range there is refused rather than read.
pub fn guest_bytes(guest_ptr: GuestPtr, len: Len) -> Option<&'static [u8]> {
    if len == 0 {
        Some(&[])
    } else if guest_ptr == 0 {
        None
    } else {
        Some(unsafe { std::slice::from_raw_parts(guest_ptr as *const u8, len as usize) })
    }
}

/// Print a range the host wrote back to it, byte by byte.
pub fn confirm_bytes(guest_ptr: GuestPtr, len: Len) {
    match guest_bytes(guest_ptr, len) {
        Some(bytes) => {
            for line in byte_report(guest_ptr, bytes) {
                host_print(&line);
            }
        }
        None => host_print(&format!("[wasm] refusing to read {} bytes at null", len)),
    }
}

/// Anything but exactly 8 bytes is NaN, and the host is told why.
pub fn number_from_bytes(bytes: &[u8]) -> f64 {
    match HostValue::decode(ValueKind::Number, bytes) {
        Ok(HostValue::Number(n)) => n,
        Ok(_) => f64::NAN,
        Err(e) => {
            host_print(&format!("[wasm] {}", e));
            f64::NAN
        }
    }
}

/// Decode a range as a little endian f64 on the guest side.
pub fn decode_number(guest_ptr: GuestPtr, len: Len) -> f64 {
    // don't read a range that can't be a number
    if len as usize != NUMBER_BYTES {
        host_print(&format!(
            "[wasm] {}",
            MarshalError::WrongLength {
                kind: ValueKind::Number,
                expected: NUMBER_BYTES,
                actual: len as usize,
            }
        ));
        return f64::NAN;
    }
    match guest_bytes(guest_ptr, len) {
        Some(bytes) => number_from_bytes(bytes),
        None => {
            host_print("[wasm] refusing to read a number at null");
            f64::NAN
        }
    }
}

/// Leak the greeting and a descriptor for it.
/// @see allocation::leak_string()
pub fn string_descriptor() -> GuestPtr {
    allocation::leak_string(abi::GREETING.to_string())
}
