/// Entrypoint name markers for clang-built native targets.
pub const NATIVE_ENTRYPOINTS: &[&str] = &["LLVMFuzzerTestOneInput"];
/// Entrypoint name markers for JVM targets.
pub const JVM_ENTRYPOINTS: &[&str] = &["fuzzerTestOneInput"];
/// Entrypoint name markers for interpreted targets.
pub const PYTHON_ENTRYPOINTS: &[&str] = &["TestOneInput"];
