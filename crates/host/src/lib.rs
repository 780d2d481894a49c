pub mod allocator;
pub mod descriptor;
pub mod memory;
pub mod prelude;

#[cfg(feature = "wasmer_sys")]
pub mod env;
#[cfg(feature = "wasmer_sys")]
pub mod guest;
#[cfg(feature = "wasmer_sys")]
pub mod import;
#[cfg(feature = "wasmer_sys")]
pub mod module;

#[cfg(test)]
mod fake;
#[cfg(all(test, feature = "wasmer_sys"))]
mod test_guest;

#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
