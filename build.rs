use std::env;

const EMBEDDED_TARGET: &str = "thumbv7em-none-eabihf";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Host builds (unit tests) link against std and need no linker scripts
    if env::var_os("CARGO_FEATURE_EMBEDDED").is_none() {
        return;
    }

    let target = env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());
    if target != EMBEDDED_TARGET {
        panic!(
            "\n\nWrong target: the `embedded` feature builds for {}, got {}\n\
             Example: `cargo build --release --target {} --features embedded`\n\n",
            EMBEDDED_TARGET, target, EMBEDDED_TARGET
        );
    }

    // memory.x comes from embassy-stm32's `memory-x` feature
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
}
