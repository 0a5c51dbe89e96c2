use std::env;
use std::path::PathBuf;

fn main() {
    // Generate bindings
    let bindings = bindgen::Builder::default()
        .header("include/gdextension_interface.h")
        .clang_arg("-I./include")
        .clang_arg("-xc")
        .impl_debug(true)
        .generate_comments(false)
        .allowlist_type("GDExtension.*")
        .allowlist_type("GDObjectInstanceID")
        .constified_enum("GDExtension.*")
        .use_core()
        .derive_default(true)
        .parse_callbacks(Box::new(bindgen::CargoCallbacks::new()))
        .generate()
        .expect("Unable to generate bindings");

    let out_path = PathBuf::from(env::var("OUT_DIR").unwrap());
    bindings
        .write_to_file(out_path.join("bindings.rs"))
        .expect("Couldn't write bindings!");

    println!("cargo:rerun-if-changed=include/gdextension_interface.h");
}
