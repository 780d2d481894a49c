use crate::memory::GuestMemory;
use wasm_marshal_common::*;

/// Read a string the guest allocated itself, given the offset of its descriptor.
///
/// The descriptor is the 8 byte `[offset, length]` record described by StringDescriptor. This
/// only reads, it releases nothing: the caller now owns the returned text Allocation and the
/// descriptor's own 8 bytes at `descriptor_ptr`, and must free both.
///
/// A zero length descriptor is an empty string and its offset is never touched. Malformed utf-8
/// is decoded lossily rather than rejected.
pub fn decode_descriptor<G: GuestMemory + ?Sized>(
    guest: &G,
    descriptor_ptr: GuestPtr,
) -> MarshalResult<(String, Allocation)> {
    let bytes = guest.read(descriptor_ptr, DESCRIPTOR_BYTES as Len)?;
    let descriptor = StringDescriptor::try_from(bytes.as_slice())?;

    let text = if descriptor.is_empty() {
        String::new()
    } else {
        decode_text(&guest.read(descriptor.ptr(), descriptor.len())?)
    };

    tracing::debug!(
        descriptor_ptr,
        text_ptr = descriptor.ptr(),
        len = descriptor.len(),
        "decoded string descriptor"
    );

    Ok((
        text,
        Allocation::from_raw_parts(descriptor.ptr(), descriptor.len()),
    ))
}
