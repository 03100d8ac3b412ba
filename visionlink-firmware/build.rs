//! Build script for visionlink-firmware
//!
//! - Passes the cortex-m-rt and defmt linker scripts
//! - `memory.x` is generated by embassy-stm32 (`memory-x` feature)

fn main() {
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    if std::env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }
    println!("cargo:rerun-if-changed=build.rs");
}
