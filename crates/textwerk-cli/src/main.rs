// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Textwerk — document-to-text extraction worker.
//
// Entry point. Initialises logging (stderr only; stdout carries nothing
// but the single JSON result line), drains stdin, runs the extraction
// pipeline, and emits exactly one record. Exits 0 on every path — failures
// are reported through the record's error field and stderr, never through
// the exit status.

mod pipeline;

use std::io::{self, Read};

use textwerk_core::Extraction;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let mut buffer = Vec::new();
    let record = match io::stdin().read_to_end(&mut buffer) {
        Ok(_) if buffer.is_empty() => Extraction::empty(),
        Ok(bytes) => {
            tracing::debug!(bytes, "document read from stdin");
            pipeline::run(&buffer)
        }
        Err(err) => {
            // Read failures are logged but not surfaced in the record.
            tracing::error!(error = %err, "failed reading stdin");
            Extraction::empty()
        }
    };

    println!("{}", pipeline::render_record(&record));
}
