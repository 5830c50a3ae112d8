fn main() {
    // Deployment target selected at build time (development or production)
    let target = std::env::var("POTLUCK_TARGET").unwrap_or_default();
    let target = match target.trim().to_lowercase().as_str() {
        "production" | "prod" => "production",
        "" | "development" | "dev" => "development",
        other => {
            println!(
                "cargo:warning=Unknown POTLUCK_TARGET '{}', falling back to development",
                other
            );
            "development"
        }
    };
    println!("cargo:rustc-env=POTLUCK_BUILD_TARGET={}", target);

    // Forward the per-target base URLs so the binary carries its own defaults
    for (source, dest) in [
        ("POTLUCK_DEVELOPMENT_URL", "POTLUCK_BUILD_DEVELOPMENT_URL"),
        ("POTLUCK_PRODUCTION_URL", "POTLUCK_BUILD_PRODUCTION_URL"),
    ] {
        match std::env::var(source) {
            Ok(url) if !url.trim().is_empty() => {
                println!("cargo:rustc-env={}={}", dest, url.trim());
            }
            _ => println!("cargo:rustc-env={}=", dest),
        }
        println!("cargo:rerun-if-env-changed={}", source);
    }
    println!("cargo:rerun-if-env-changed=POTLUCK_TARGET");

    #[cfg(feature = "desktop")]
    tauri_build::build()
}
