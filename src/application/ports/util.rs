// src/application/ports/util.rs

/// Source of opaque credential strings (authorization codes, refresh
/// tokens). Implementations must provide at least 256 bits of entropy;
/// uniqueness rests on that entropy, not on a store-level check.
pub trait TokenGenerator: Send + Sync {
    fn generate(&self) -> String;
}
