//! This build script copies the `memory.x` file from the crate root into a directory where
//! the linker can always find it at build time, and generates the build-time clock
//! configuration included by `src/config.rs`.

use chrono::{Local, Offset};
use std::{env, fs::File, io::Write, path::PathBuf};

/// Environment variable overriding the UTC offset of the watch, in seconds.
const UTC_OFFSET_VAR: &str = "TERMFACE_UTC_OFFSET";

fn main() {
    // Put memory layout in the output directory and ensure it's on the linker search path.
    let out = &PathBuf::from(env::var_os("OUT_DIR").expect("OUT_DIR is set by cargo"));
    File::create(out.join("memory.x"))
        .expect("create memory.x")
        .write_all(include_bytes!("memory.x"))
        .expect("write memory.x");
    println!("cargo:rustc-link-search={}", out.display());

    // Local offset of the build host unless overridden
    let utc_offset = match env::var(UTC_OFFSET_VAR) {
        Ok(value) => value
            .trim()
            .parse::<i32>()
            .unwrap_or_else(|_| panic!("{UTC_OFFSET_VAR} must be an offset in seconds, got {value:?}")),
        Err(_) => Local::now().offset().fix().local_minus_utc(),
    };

    // create rs file with current UTC time
    File::create(out.join("build_info.rs"))
        .expect("create build_info.rs")
        .write_fmt(format_args!(
            "/// UTC seconds since the epoch at build time.\n\
             pub const BUILD_EPOCH: i64 = {};\n\
             /// Offset of local time to UTC, in seconds.\n\
             pub const UTC_OFFSET_SECS: i32 = {};\n",
            chrono::Utc::now().timestamp(),
            utc_offset,
        ))
        .expect("write build_info.rs");

    // By default, Cargo will re-run a build script whenever any file in the project changes,
    // which keeps the build epoch fresh. Don't narrow it down with `rerun-if-changed`.
}
