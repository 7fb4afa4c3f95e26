//! Build script checking for the native libraries behind the `opencv` crate.
//!
//! Missing libraries are reported as cargo warnings with installation hints;
//! the `opencv` crate's own build produces the hard error.

use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=PKG_CONFIG_PATH");
    println!("cargo:rerun-if-env-changed=OPENCV_LINK_PATHS");
    println!("cargo:rerun-if-env-changed=OPENCV_INCLUDE_PATHS");

    match pkg_config(&["--version"]) {
        Some(version) => println!("cargo:warning=Found pkg-config version: {version}"),
        None => hint(
            "pkg-config not found. It is used to locate OpenCV.",
            "sudo apt-get install pkg-config",
            "brew install pkg-config",
        ),
    }

    // opencv4 first, then the legacy module name
    match pkg_config(&["--modversion", "opencv4"]).or_else(|| pkg_config(&["--modversion", "opencv"])) {
        Some(version) => println!("cargo:warning=Found OpenCV version: {version}"),
        None => hint(
            "OpenCV not found via pkg-config. The imgproc and imgcodecs modules are required.",
            "sudo apt-get install libopencv-dev",
            "brew install opencv",
        ),
    }

    println!("cargo:rustc-env=BUILD_TARGET={}", env::var("TARGET").unwrap_or_default());
}

fn pkg_config(args: &[&str]) -> Option<String> {
    let output = Command::new("pkg-config").args(args).output().ok()?;
    output
        .status
        .success()
        .then(|| String::from_utf8_lossy(&output.stdout).trim().to_string())
}

fn hint(message: &str, ubuntu: &str, macos: &str) {
    println!("cargo:warning={message}");
    println!("cargo:warning=On Ubuntu: {ubuntu}");
    println!("cargo:warning=On macOS: {macos}");
}
