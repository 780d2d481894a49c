pub mod allocation;
pub mod descriptor;
pub mod result;
pub mod value;

pub use allocation::Allocation;
pub use descriptor::*;
pub use result::*;
pub use value::*;

/// something like usize for wasm
/// wasm has a memory limit of 4GB so offsets and lengths fit in u32
///
/// the host needs to directly read and write to the guest's memory so we need a predictable number
/// of bytes to represent offsets and lengths
/// we don't want the width of an offset to depend on the `usize` of whoever compiled the host,
/// the guest always sees u32 and the host always talks to it in u32
pub type WasmSize = u32;

pub type Len = WasmSize;
pub type GuestPtr = WasmSize;

/// Names of everything the guest exports or imports.
/// Host and guest are built independently so these strings are the whole contract.
pub mod abi {
    pub const MEMORY: &str = "memory";
    pub const ALLOCATE: &str = "allocate";
    pub const DEALLOCATE: &str = "deallocate";
    pub const READ_BYTES: &str = "read_bytes_from_memory";
    pub const READ_NUMBER: &str = "read_number_from_memory";
    pub const STRING_DESCRIPTOR: &str = "string_descriptor";

    pub const IMPORT_MODULE: &str = "env";
    pub const PRINT: &str = "print";

    /// The fixed text a guest hands back through `string_descriptor`.
    pub const GREETING: &str = "Hello World! 🌎";
}
