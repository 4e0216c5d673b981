//! Symbol and path helpers shared across the pipeline.

use std::path::Path;

/// Best-effort demangling of a native symbol name.
///
/// Unmangled names come back unchanged, so this is safe to apply to every
/// destination spelling a frontend emits.
pub fn demangle_native(name: &str) -> String {
    match rustc_demangle::try_demangle(name) {
        Ok(demangled) => format!("{demangled:#}"),
        Err(_) => name.to_owned(),
    }
}

/// JVM display spelling `[source_file].method`.
///
/// Names already wrapped in a class qualifier are returned unchanged.
pub fn demangle_jvm(source_file: &str, name: &str) -> String {
    if name.starts_with('[') {
        name.to_owned()
    } else {
        format!("[{source_file}].{name}")
    }
}

/// Strips all whitespace from a symbol spelling.
///
/// Frontends disagree on spacing inside template and signature spellings;
/// lookup caches store both the raw and the normalized form.
pub fn normalize_spelling(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Last path component of a source-file spelling.
pub fn basename(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map_or_else(|| path.to_owned(), |name| name.to_string_lossy().into_owned())
}
