// Copyright 2021-2026 Kyle Schreiber
// SPDX-License-Identifier: BSD-3-Clause

use keyterm::{try_read_event, InputEvent};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    println!("Use the arrow keys, Enter, or press q / Esc to quit.");

    loop {
        let event = try_read_event()?;
        println!("got: {:?}", event);
        if event == InputEvent::Exit {
            break;
        }
    }

    Ok(())
}
