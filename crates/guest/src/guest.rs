pub mod allocation;
pub mod diagnostics;

pub use wasm_marshal_common::*;

#[cfg(target_arch = "wasm32")]
#[link(wasm_import_module = "env")]
extern "C" {
    fn print(guest_ptr: GuestPtr, len: Len);
}

/// Hand a message to the host's `print` import.
///
/// The host copies the bytes out before returning so the message can be dropped straight after.
/// Messages longer than a wasm length can describe are cut short.
#[cfg(target_arch = "wasm32")]
pub fn host_print(message: &str) {
    let len = Len::try_from(message.len()).unwrap_or(Len::MAX);
    unsafe {
        print(message.as_ptr() as GuestPtr, len);
    }
}

/// Outside of wasm there is no host, native builds (tests etc.) print to stdout.
#[cfg(not(target_arch = "wasm32"))]
pub fn host_print(message: &str) {
    println!("{}", message);
}
