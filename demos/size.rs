// Copyright 2021-2026 Kyle Schreiber
// SPDX-License-Identifier: BSD-3-Clause

use keyterm::{get_dimensions, isatty, Stream};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    println!("stdin_tty : {}", isatty(Stream::Stdin));
    println!("stdout_tty: {}", isatty(Stream::Stdout));
    println!("stderr_tty: {}", isatty(Stream::Stderr));

    match get_dimensions() {
        Some(size) => println!("rows: {}, columns: {}", size.rows, size.columns),
        None => println!("console dimensions unavailable"),
    }
}
