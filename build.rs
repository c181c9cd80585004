use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // NEON kernels are always compiled from Rust sources; on other targets
    // they run as portable scalar code.
    if env::var_os("CARGO_FEATURE_NEON").is_none() {
        return;
    }

    let arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
    if arch != "aarch64" && arch != "arm" {
        println!(
            "cargo:warning=neon feature enabled for target arch '{}'; kernels will use the scalar path",
            arch
        );
    }
}
