use crate::prelude::*;
use std::sync::Arc;
use wasmer::sys::CompilerConfig;
use wasmer::wasmparser;
use wasmer_middlewares::Metering;

#[cfg(not(test))]
/// one hundred giga ops
pub const WASM_METERING_LIMIT: u64 = 100_000_000_000;

#[cfg(test)]
/// ten mega ops.
/// We don't want tests to run forever, and it can take several minutes for 100 giga ops to run.
pub const WASM_METERING_LIMIT: u64 = 10_000_000;

/// Generate an engine with a wasm compiler
/// and Metering (use limits) in place.
///
/// Metering tracks per-module state so every module needs a fresh engine.
pub(crate) fn make_engine(metering_limit: u64) -> Engine {
    let cost_function = |_operator: &wasmparser::Operator| -> u64 { 1 };
    let metering = Arc::new(Metering::new(metering_limit, cost_function));

    let mut compiler = wasmer::sys::Cranelift::default();
    compiler.canonicalize_nans(true);
    compiler.push_middleware(metering);

    Engine::from(compiler)
}

/// Compiles guest wasm and instantiates it against the host's imports.
///
/// Where the wasm comes from and whether compiled modules get cached is up to the caller.
#[derive(Clone, Debug)]
pub struct ModuleBuilder {
    metering_limit: u64,
}

impl Default for ModuleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleBuilder {
    pub fn new() -> Self {
        Self {
            metering_limit: WASM_METERING_LIMIT,
        }
    }

    /// Every call into the guest gets this many operations before it traps.
    /// The budget is reset before each call, it is not shared across the instance's lifetime.
    pub fn with_metering_limit(mut self, metering_limit: u64) -> Self {
        self.metering_limit = metering_limit;
        self
    }

    pub fn metering_limit(&self) -> u64 {
        self.metering_limit
    }

    /// Accepts wasm binaries, and wat text as well since wasmer is built with the `wat` feature.
    pub fn from_binary(&self, wasm: &[u8]) -> MarshalResult<Module> {
        let compiler_engine = make_engine(self.metering_limit);
        Module::new(&compiler_engine, wasm).map_err(|e| MarshalError::ModuleBuild(e.to_string()))
    }

    pub fn instantiate(&self, module: &Module) -> MarshalResult<GuestInstance> {
        GuestInstance::new(module, self.metering_limit)
    }

    pub fn instance(&self, wasm: &[u8]) -> MarshalResult<GuestInstance> {
        let module = self.from_binary(wasm)?;
        tracing::debug!(metering_limit = self.metering_limit, "instantiating guest");
        self.instantiate(&module)
    }
}
