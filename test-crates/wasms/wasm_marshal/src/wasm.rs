use wasm_marshal_guest::diagnostics;
use wasm_marshal_guest::*;

pub use wasm_marshal_guest::allocation::*;

#[no_mangle]
pub extern "C" fn read_bytes_from_memory(guest_ptr: GuestPtr, len: Len) {
    diagnostics::confirm_bytes(guest_ptr, len);
}

#[no_mangle]
pub extern "C" fn read_number_from_memory(guest_ptr: GuestPtr, len: Len) -> f64 {
    diagnostics::decode_number(guest_ptr, len)
}

#[no_mangle]
pub extern "C" fn string_descriptor() -> GuestPtr {
    diagnostics::string_descriptor()
}
