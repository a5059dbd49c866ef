//! Binary entry point for `go-move`.

use std::process;

fn main() {
    if let Err(e) = go_move::run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
