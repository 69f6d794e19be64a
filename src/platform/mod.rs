//! Platform helpers shared by the native and wasm builds.

pub mod runtime;
