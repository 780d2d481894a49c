pub use crate::allocator::Allocator;
pub use crate::allocator::AllocatorConfig;
pub use crate::allocator::ReleaseFailure;
pub use crate::descriptor::decode_descriptor;
pub use crate::memory::GuestMemory;
pub use wasm_marshal_common::*;

#[cfg(feature = "wasmer_sys")]
pub use crate::env::Env;
#[cfg(feature = "wasmer_sys")]
pub use crate::guest::GuestInstance;
#[cfg(feature = "wasmer_sys")]
pub use crate::module::ModuleBuilder;
#[cfg(feature = "wasmer_sys")]
pub use wasmer::{
    AsStoreMut, AsStoreRef, Engine, Function, FunctionEnv, FunctionEnvMut, Imports, Instance,
    Memory, Module, Store, TypedFunction, WasmTypeList,
};
