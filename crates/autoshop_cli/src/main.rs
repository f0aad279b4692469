//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `autoshop_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("autoshop_core version={}", autoshop_core::core_version());
}
