use crate::import::imports;
use crate::memory::GuestMemory;
use crate::prelude::*;
use wasmer_middlewares::metering;

/// Global the metering middleware adds to every module it compiles.
const METERING_REMAINING_POINTS: &str = "wasmer_metering_remaining_points";

/// Check a range against the current size of the guest memory before touching it.
///
/// wasmer bounds checks reads and writes itself, but a bogus length from the guest (e.g. a
/// corrupt string descriptor) would otherwise have the host allocate a buffer of up to 4GB just
/// to find out it can't be filled.
fn check_bounds(
    store: &impl AsStoreRef,
    memory: &Memory,
    guest_ptr: GuestPtr,
    len: Len,
) -> MarshalResult<()> {
    let data_size = memory.view(store).data_size();
    let end = u64::from(guest_ptr) + u64::from(len);
    if end > data_size {
        return Err(MarshalError::Memory {
            guest_ptr,
            len,
            reason: format!("range ends at {:#x} but memory is {:#x} bytes", end, data_size),
        });
    }
    Ok(())
}

/// Write a slice of bytes to the guest in a safe-ish way.
///
/// The guest memory is part of the host memory, so a naive approach would add `guest_ptr` to the
/// host's pointer to the start of the guest memory and copy straight across. A guest that hands
/// out a bogus `guest_ptr` could then have the host write... wherever, basically.
///
/// Going through a MemoryView bounds checks every access against the guest memory.
/// This is still not completely safe in the face of shared memory and threads, etc.
pub fn write_bytes(
    store: &impl AsStoreRef,
    memory: &Memory,
    guest_ptr: GuestPtr,
    slice: &[u8],
) -> MarshalResult<()> {
    let len: Len = slice.len().try_into()?;

    #[cfg(feature = "debug_memory")]
    tracing::debug!(guest_ptr, len, "writing bytes from host to guest");

    check_bounds(store, memory, guest_ptr, len)?;
    memory
        .view(store)
        .write(u64::from(guest_ptr), slice)
        .map_err(|e| MarshalError::Memory {
            guest_ptr,
            len,
            reason: e.to_string(),
        })
}

/// Read a slice of bytes from the guest in a safe-ish way.
/// @see write_bytes()
pub fn read_bytes(
    store: &impl AsStoreRef,
    memory: &Memory,
    guest_ptr: GuestPtr,
    len: Len,
) -> MarshalResult<Vec<u8>> {
    #[cfg(feature = "debug_memory")]
    tracing::debug!(guest_ptr, len, "reading bytes from guest to host");

    check_bounds(store, memory, guest_ptr, len)?;
    let mut bytes = vec![0; len as usize];
    memory
        .view(store)
        .read(u64::from(guest_ptr), &mut bytes)
        .map_err(|e| MarshalError::Memory {
            guest_ptr,
            len,
            reason: e.to_string(),
        })?;
    Ok(bytes)
}

/// A running guest: the instance, the store it lives in and the env its imports see.
///
/// Besides the allocator calls of `GuestMemory` this exposes the guest's diagnostic exports.
/// Those are looked up on every call so a guest without them still works as plain memory.
///
/// The metering budget is per call: every call into the guest starts with the full limit.
pub struct GuestInstance {
    store: Store,
    instance: Instance,
    env: FunctionEnv<Env>,
    metering_limit: u64,
}

impl GuestInstance {
    /// Instantiate the module with the host's imports and bind the memory and allocator
    /// exports. A guest without `memory`, `allocate` or `deallocate` can't be marshaled into so
    /// it fails here rather than on first use.
    ///
    /// The module must have been compiled with metering, i.e. through ModuleBuilder.
    pub fn new(module: &Module, metering_limit: u64) -> MarshalResult<Self> {
        let mut store = Store::default();
        let env = FunctionEnv::new(&mut store, Env::default());
        let built_imports: Imports = imports(&mut store, &env);
        let instance = Instance::new(&mut store, module, &built_imports)
            .map_err(|e| MarshalError::ModuleBuild(e.to_string()))?;

        let memory = instance
            .exports
            .get_memory(abi::MEMORY)
            .map_err(|e| export_error(abi::MEMORY, e))?
            .clone();
        let allocate = instance
            .exports
            .get_typed_function::<Len, GuestPtr>(&store, abi::ALLOCATE)
            .map_err(|e| export_error(abi::ALLOCATE, e))?;
        let deallocate = instance
            .exports
            .get_typed_function::<(GuestPtr, Len), ()>(&store, abi::DEALLOCATE)
            .map_err(|e| export_error(abi::DEALLOCATE, e))?;
        instance
            .exports
            .get_global(METERING_REMAINING_POINTS)
            .map_err(|e| export_error(METERING_REMAINING_POINTS, e))?;

        {
            let env_mut = env.as_mut(&mut store);
            env_mut.memory = Some(memory);
            env_mut.allocate = Some(allocate);
            env_mut.deallocate = Some(deallocate);
        }

        Ok(Self {
            store,
            instance,
            env,
            metering_limit,
        })
    }

    pub fn metering_limit(&self) -> u64 {
        self.metering_limit
    }

    /// Metering points left over from the last call into the guest.
    pub fn remaining_points(&mut self) -> metering::MeteringPoints {
        metering::get_remaining_points(&mut self.store, &self.instance)
    }

    /// Reset the metering budget, called before every call into the guest.
    fn refuel(&mut self) {
        metering::set_remaining_points(&mut self.store, &self.instance, self.metering_limit);
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn env(&self) -> &Env {
        self.env.as_ref(&self.store)
    }

    /// Current size of the guest's linear memory in bytes.
    pub fn memory_size(&self) -> MarshalResult<u64> {
        Ok(self.env().memory()?.view(&self.store).data_size())
    }

    fn typed_function<Args, Rets>(&self, name: &str) -> MarshalResult<TypedFunction<Args, Rets>>
    where
        Args: WasmTypeList,
        Rets: WasmTypeList,
    {
        self.instance
            .exports
            .get_typed_function(&self.store, name)
            .map_err(|e| export_error(name, e))
    }

    /// Have the guest print the raw bytes of a range back to us through `print`.
    /// Purely diagnostic, ownership of the range is unaffected.
    pub fn confirm_bytes(&mut self, guest_ptr: GuestPtr, len: Len) -> MarshalResult<()> {
        let read_bytes_from_memory: TypedFunction<(GuestPtr, Len), ()> =
            self.typed_function(abi::READ_BYTES)?;
        self.refuel();
        read_bytes_from_memory
            .call(&mut self.store, guest_ptr, len)
            .map_err(|e| call_error(abi::READ_BYTES, e))
    }

    /// Have the guest decode a range as a double on its side of the boundary.
    /// The guest answers NaN for anything that isn't exactly 8 bytes.
    pub fn decode_number(&mut self, guest_ptr: GuestPtr, len: Len) -> MarshalResult<f64> {
        let read_number_from_memory: TypedFunction<(GuestPtr, Len), f64> =
            self.typed_function(abi::READ_NUMBER)?;
        self.refuel();
        read_number_from_memory
            .call(&mut self.store, guest_ptr, len)
            .map_err(|e| call_error(abi::READ_NUMBER, e))
    }

    /// Have the guest allocate its greeting and a string descriptor pointing at it.
    /// Returns the descriptor's offset, both ranges now belong to the host.
    pub fn produce_text(&mut self) -> MarshalResult<GuestPtr> {
        let string_descriptor: TypedFunction<(), GuestPtr> =
            self.typed_function(abi::STRING_DESCRIPTOR)?;
        self.refuel();
        string_descriptor
            .call(&mut self.store)
            .map_err(|e| call_error(abi::STRING_DESCRIPTOR, e))
    }
}

impl GuestMemory for GuestInstance {
    fn reserve(&mut self, len: Len) -> MarshalResult<GuestPtr> {
        let allocate = self.env().allocate()?.clone();
        self.refuel();
        allocate
            .call(&mut self.store, len)
            .map_err(|e| MarshalError::Reservation {
                len,
                reason: e.to_string(),
            })
    }

    fn release(&mut self, guest_ptr: GuestPtr, len: Len) -> MarshalResult<()> {
        let deallocate = self.env().deallocate()?.clone();
        self.refuel();
        deallocate
            .call(&mut self.store, guest_ptr, len)
            .map_err(|e| MarshalError::Release {
                guest_ptr,
                len,
                reason: e.to_string(),
            })
    }

    fn read(&self, guest_ptr: GuestPtr, len: Len) -> MarshalResult<Vec<u8>> {
        read_bytes(&self.store, self.env().memory()?, guest_ptr, len)
    }

    fn write(&mut self, guest_ptr: GuestPtr, bytes: &[u8]) -> MarshalResult<()> {
        write_bytes(&self.store, self.env().memory()?, guest_ptr, bytes)
    }
}

fn export_error(name: &str, e: impl std::fmt::Display) -> MarshalError {
    MarshalError::Export {
        name: name.to_string(),
        reason: e.to_string(),
    }
}

fn call_error(name: &str, e: impl std::fmt::Display) -> MarshalError {
    MarshalError::Call {
        name: name.to_string(),
        reason: e.to_string(),
    }
}
