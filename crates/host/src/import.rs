use crate::guest::read_bytes;
use crate::prelude::*;

/// The guest's only way to call the host: log a range of its memory as text.
///
/// This runs nested inside whatever host -> guest call the guest is servicing. It must never
/// trap back into the guest, a bad range or missing memory is logged here and that's it.
pub fn host_print(env: FunctionEnvMut<Env>, guest_ptr: GuestPtr, len: Len) {
    match guest_text(&env, env.data(), guest_ptr, len) {
        Ok(message) => tracing::info!(target: "guest", "{}", message),
        Err(e) => tracing::error!(guest_ptr, len, error = %e, "guest print failed"),
    }
}

/// The text `print` logs for a range, lossily decoded.
pub(crate) fn guest_text(
    store: &impl AsStoreRef,
    env: &Env,
    guest_ptr: GuestPtr,
    len: Len,
) -> MarshalResult<String> {
    let bytes = read_bytes(store, env.memory()?, guest_ptr, len)?;
    Ok(decode_text(&bytes))
}

/// Everything the guest imports from the host.
pub fn imports(store: &mut impl AsStoreMut, env: &FunctionEnv<Env>) -> Imports {
    let mut imports = Imports::new();
    imports.define(
        abi::IMPORT_MODULE,
        abi::PRINT,
        Function::new_typed_with_env(store, env, host_print),
    );
    imports
}
