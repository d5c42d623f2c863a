//! Command line runner for the `tabnufft` library.

#[cfg(not(feature = "for-testing"))]
#[quit::main]
fn main() {
    tabnufft::cli::run::run();
}

#[cfg(feature = "for-testing")]
fn main() {
    eprintln!(
        "Warning: The `for-testing` feature is enabled, which will clutter error messages"
    );
    tabnufft::cli::run::run();
}
