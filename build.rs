// Compiles the sphlib 3.0 sources for the `sphlib` feature.
//
// SPHLIB_DIR must point at the `c/` directory of the sphlib-3.0 release
// (sphlib-3.0.zip from https://www.saphir2.com/sphlib/), which holds
// `sph_types.h` and the per-family `.c` files.

#[cfg(feature = "sphlib")]
const SPH_SOURCES: [&str; 7] = [
    "bmw.c",
    "luffa.c",
    "shavite.c",
    "simd.c",
    "echo.c",
    "hamsi.c",
    "fugue.c",
];

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    #[cfg(feature = "sphlib")]
    {
        println!("cargo:rerun-if-env-changed=SPHLIB_DIR");
        let dir = match std::env::var_os("SPHLIB_DIR") {
            Some(dir) => std::path::PathBuf::from(dir),
            None => panic!(
                "the `sphlib` feature needs SPHLIB_DIR set to the `c/` directory of sphlib 3.0"
            ),
        };

        let mut build = cc::Build::new();
        build.include(&dir).warnings(false);
        for file in SPH_SOURCES {
            let path = dir.join(file);
            if !path.is_file() {
                panic!("missing sphlib source {}", path.display());
            }
            println!("cargo:rerun-if-changed={}", path.display());
            build.file(path);
        }
        build.compile("sph");
    }
}
