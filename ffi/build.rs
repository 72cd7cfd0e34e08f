use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src");

    let crate_dir =
        PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string()));
    let Ok(out_dir) = std::env::var("OUT_DIR") else {
        println!("cargo:warning=header generation skipped: OUT_DIR is not set");
        return;
    };
    let out = PathBuf::from(out_dir).join("webreq.h");

    let config = cbindgen::Config {
        language: cbindgen::Language::C,
        include_guard: Some("WEBREQ_H".to_string()),
        enumeration: cbindgen::EnumConfig {
            prefix_with_name: true,
            ..Default::default()
        },
        ..Default::default()
    };

    match cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_config(config)
        .generate()
    {
        Ok(bindings) => {
            bindings.write_to_file(out);
        }
        Err(e) => println!("cargo:warning=header generation skipped: {e}"),
    }
}
