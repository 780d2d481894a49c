use crate::descriptor;
use crate::memory::GuestMemory;
use serde::Deserialize;
use serde::Serialize;
use wasm_marshal_common::*;

/// What `free` does when the guest rejects a release.
///
/// Either way the failure is logged and the Allocation is gone, there is nothing left to retry
/// with. The only question is whether the caller hears about it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReleaseFailure {
    /// return the error from `free` so the caller can decide whether to escalate
    #[default]
    Propagate,
    /// log it and report success, best effort cleanup
    Log,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocatorConfig {
    pub release_failure: ReleaseFailure,
}

impl AllocatorConfig {
    pub fn with_release_failure(mut self, release_failure: ReleaseFailure) -> Self {
        self.release_failure = release_failure;
        self
    }
}

/// Moves host values into guest memory and hands ranges back.
///
/// The allocator owns its guest, there is no other path to the guest memory while it exists.
/// It does not remember what it allocated: every Allocation it returns belongs to the caller and
/// must come back through `free` exactly once.
pub struct Allocator<G: GuestMemory> {
    guest: G,
    config: AllocatorConfig,
}

impl<G: GuestMemory> Allocator<G> {
    pub fn new(guest: G) -> Self {
        Self::with_config(guest, AllocatorConfig::default())
    }

    pub fn with_config(guest: G, config: AllocatorConfig) -> Self {
        Self { guest, config }
    }

    pub fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    pub fn guest(&self) -> &G {
        &self.guest
    }

    /// Direct access for guest specific calls (diagnostics etc.)
    /// Anything reserved through here is not the allocator's problem.
    pub fn guest_mut(&mut self) -> &mut G {
        &mut self.guest
    }

    pub fn into_guest(self) -> G {
        self.guest
    }

    /// Encode a value, reserve exactly its size in the guest and write it there.
    ///
    /// If the write fails the reservation is released again before the error is returned, a
    /// failed allocate leaves nothing live in the guest.
    pub fn allocate(&mut self, value: impl Into<HostValue>) -> MarshalResult<Allocation> {
        let value: HostValue = value.into();
        let bytes = value.encode();
        let len: Len = match value.len() {
            Ok(len) => len,
            Err(e) => {
                tracing::error!(kind = %value.kind(), error = %e, "failed to allocate");
                return Err(e);
            }
        };

        let guest_ptr = match self.guest.reserve(len) {
            Ok(guest_ptr) => guest_ptr,
            Err(e) => {
                tracing::error!(kind = %value.kind(), len, error = %e, "failed to allocate");
                return Err(e);
            }
        };

        if let Err(e) = self.guest.write(guest_ptr, &bytes) {
            tracing::error!(kind = %value.kind(), guest_ptr, len, error = %e, "failed to allocate");
            if let Err(release_error) = self.guest.release(guest_ptr, len) {
                tracing::error!(
                    guest_ptr,
                    len,
                    error = %release_error,
                    "failed to release reservation after a failed write"
                );
            }
            return Err(e);
        }

        tracing::info!(kind = %value.kind(), guest_ptr, len, "allocated");
        // text can be arbitrarily large, keep it out of info
        tracing::debug!(guest_ptr, %value, "allocated value");
        Ok(Allocation::from_raw_parts(guest_ptr, len))
    }

    /// Allocate a dynamically typed value.
    /// Values with no encoding are rejected before anything is reserved.
    pub fn allocate_dynamic(&mut self, value: serde_json::Value) -> MarshalResult<Allocation> {
        match HostValue::try_from(value) {
            Ok(value) => self.allocate(value),
            Err(e) => {
                tracing::error!(error = %e, "failed to allocate");
                Err(e)
            }
        }
    }

    /// Give a range back to the guest.
    ///
    /// The Allocation is consumed whatever happens. A rejected release is always logged, the
    /// configured ReleaseFailure decides whether it is also returned.
    pub fn free(&mut self, allocation: Allocation) -> MarshalResult<()> {
        let guest_ptr = allocation.guest_ptr();
        let len = allocation.len();
        match self.guest.release(guest_ptr, len) {
            Ok(()) => {
                tracing::info!(guest_ptr, len, "deallocated");
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    guest_ptr,
                    len,
                    error = %e,
                    "failed to deallocate"
                );
                match self.config.release_failure {
                    ReleaseFailure::Propagate => Err(e),
                    ReleaseFailure::Log => Ok(()),
                }
            }
        }
    }

    /// Copy the current bytes of a live range back out of the guest.
    pub fn read(&self, allocation: &Allocation) -> MarshalResult<Vec<u8>> {
        self.guest.read(allocation.guest_ptr(), allocation.len())
    }

    /// Read a live range back as the kind it was written as.
    pub fn read_value(&self, allocation: &Allocation, kind: ValueKind) -> MarshalResult<HostValue> {
        HostValue::decode(kind, &self.read(allocation)?)
    }

    /// @see descriptor::decode_descriptor()
    pub fn decode_descriptor(&self, descriptor_ptr: GuestPtr) -> MarshalResult<(String, Allocation)> {
        descriptor::decode_descriptor(&self.guest, descriptor_ptr)
    }

    /// Decode a guest produced string and release both the text and the descriptor record.
    ///
    /// Both releases are attempted even if decoding or the first release fails, the first error
    /// is the one returned.
    pub fn take_string(&mut self, descriptor_ptr: GuestPtr) -> MarshalResult<String> {
        let descriptor_allocation =
            Allocation::from_raw_parts(descriptor_ptr, DESCRIPTOR_BYTES as Len);
        let (text, text_allocation) = match self.decode_descriptor(descriptor_ptr) {
            Ok(decoded) => decoded,
            Err(e) => {
                // the text range is unknown so only the descriptor can be given back
                if let Err(release_error) = self.free(descriptor_allocation) {
                    tracing::error!(error = %release_error, "failed to release string descriptor");
                }
                return Err(e);
            }
        };
        let text_result = self.free(text_allocation);
        let descriptor_result = self.free(descriptor_allocation);
        text_result.and(descriptor_result)?;
        Ok(text)
    }
}
