// Stamps CARBON_VERSION into carbonctl for `--version`

fn main() {
    println!("cargo:rerun-if-env-changed=CARBON_VERSION");
    println!("cargo:rerun-if-changed=Cargo.toml");

    // packagers set CARBON_VERSION, everyone else gets the crate version
    let version = match std::env::var("CARBON_VERSION") {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => env!("CARGO_PKG_VERSION").to_string(),
    };
    println!("cargo:rustc-env=CARBON_VERSION={}", version);
}
