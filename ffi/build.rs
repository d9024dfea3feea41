use std::env;
use std::path::PathBuf;

fn main() {
    println!("cargo:rerun-if-changed=src/lib.rs");
    println!("cargo:rerun-if-changed=src/types.rs");

    let crate_dir = env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo");
    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));

    let generated = cbindgen::Builder::new()
        .with_crate(&crate_dir)
        .with_language(cbindgen::Language::C)
        .with_include_guard("MUNKI_FACTS_H")
        .with_cpp_compat(true)
        .generate();

    match generated {
        Ok(bindings) => {
            bindings.write_to_file(out_dir.join("munki_facts.h"));
        }
        Err(err) => println!("cargo:warning=cbindgen could not generate munki_facts.h: {err}"),
    }
}
