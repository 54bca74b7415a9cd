fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    // Build timestamp shown by `drawkit --version`
    let build_date = chrono::Utc::now().format("%Y-%m-%d %H:%M UTC").to_string();
    println!("cargo:rustc-env=BUILD_DATE={}", build_date);
}
