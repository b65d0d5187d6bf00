//! taskrun CLI binary
//!
//! This is the minimal entrypoint for the taskrun CLI.
//! All logic is in the library; main.rs only invokes cli::run().

fn main() {
    // cli::run() handles ALL output including errors
    if let Err(code) = taskrun::cli::run() {
        std::process::exit(code.as_i32());
    }
}
