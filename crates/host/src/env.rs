use crate::prelude::*;

/// Guest exports the host needs from inside imported functions and allocator calls.
///
/// Everything is None until the instance exists, imports are built before instantiation so the
/// fields are filled in immediately afterwards.
#[derive(Clone, Default)]
pub struct Env {
    pub memory: Option<Memory>,
    pub allocate: Option<TypedFunction<Len, GuestPtr>>,
    pub deallocate: Option<TypedFunction<(GuestPtr, Len), ()>>,
}

impl Env {
    pub fn memory(&self) -> MarshalResult<&Memory> {
        self.memory.as_ref().ok_or_else(|| unbound(abi::MEMORY))
    }

    pub fn allocate(&self) -> MarshalResult<&TypedFunction<Len, GuestPtr>> {
        self.allocate.as_ref().ok_or_else(|| unbound(abi::ALLOCATE))
    }

    pub fn deallocate(&self) -> MarshalResult<&TypedFunction<(GuestPtr, Len), ()>> {
        self.deallocate.as_ref().ok_or_else(|| unbound(abi::DEALLOCATE))
    }
}

fn unbound(name: &str) -> MarshalError {
    MarshalError::Export {
        name: name.to_string(),
        reason: "not bound to the env yet".to_string(),
    }
}
