use crate::result::MarshalError;
use crate::GuestPtr;
use crate::Len;
use crate::WasmSize;

pub const DESCRIPTOR_ITEMS: usize = 2;
pub const DESCRIPTOR_BYTES: usize = std::mem::size_of::<WasmSize>() * DESCRIPTOR_ITEMS;

/// Need a StringDescriptor to be a u8 array to copy as bytes across host/guest
pub type StringDescriptorBytes = [u8; DESCRIPTOR_BYTES];

/// StringDescriptor is a 2 item WasmSize array of offset/length for a string the guest
/// allocated itself.
///
/// the guest leaks the string bytes, leaks a second allocation holding this descriptor and
/// returns the descriptor's offset. the host reads the descriptor, then the bytes it points to.
/// the descriptor does not own the string bytes: both ranges must be released, once each.
///
/// the layout is two little endian WasmSize integers `[offset, length]` and nothing else.
/// we don't share structs or tuples across the boundary because their representation is up to
/// the compiler on each side, an array of fixed-width integers in a fixed byte order is not.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(transparent)]
pub struct StringDescriptor([WasmSize; DESCRIPTOR_ITEMS]);

impl StringDescriptor {
    pub fn ptr(&self) -> GuestPtr {
        (self.0)[0]
    }

    pub fn len(&self) -> Len {
        (self.0)[1]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn to_le_bytes(&self) -> StringDescriptorBytes {
        let mut bytes = [0; DESCRIPTOR_BYTES];
        bytes[..4].copy_from_slice(&self.ptr().to_le_bytes());
        bytes[4..].copy_from_slice(&self.len().to_le_bytes());
        bytes
    }

    pub fn from_le_bytes(bytes: StringDescriptorBytes) -> Self {
        let [p0, p1, p2, p3, l0, l1, l2, l3] = bytes;
        Self([
            WasmSize::from_le_bytes([p0, p1, p2, p3]),
            WasmSize::from_le_bytes([l0, l1, l2, l3]),
        ])
    }
}

/// wraps a naked array in a StringDescriptor newtype for type safety
impl From<[WasmSize; DESCRIPTOR_ITEMS]> for StringDescriptor {
    fn from(array: [WasmSize; DESCRIPTOR_ITEMS]) -> Self {
        Self(array)
    }
}

/// attempts to read a descriptor out of exactly DESCRIPTOR_BYTES bytes
/// this will fail for any other length rather than guessing at a partial record
impl TryFrom<&[u8]> for StringDescriptor {
    type Error = MarshalError;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let bytes: StringDescriptorBytes = bytes
            .try_into()
            .map_err(|_| MarshalError::Descriptor(bytes.len()))?;
        Ok(Self::from_le_bytes(bytes))
    }
}
