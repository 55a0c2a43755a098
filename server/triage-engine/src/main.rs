//! Binary entrypoint: read JSON lines from stdin, write JSON lines to stdout.
//!
//! Each input line is an InboundReport. Output lines are either:
//! - A TriageOutcome (classification + routing + risk for the report)
//! - An ErrorOutput (when input validation fails)

use std::io::{self, BufRead, Write};
use triage_engine::types::ErrorOutput;
use triage_engine::{InboundReport, TriageEngine};

fn main() {
  let stdin = io::stdin();
  let stdout = io::stdout();
  let mut out = io::BufWriter::new(stdout.lock());
  let mut engine = TriageEngine::with_defaults();

  for line in stdin.lock().lines() {
    let line = match line {
      Ok(l) => l,
      Err(e) => {
        let _ = writeln!(io::stderr(), "triage-engine: read error: {}", e);
        std::process::exit(1);
      }
    };

    // Skip blank lines.
    let trimmed = line.trim();
    if trimmed.is_empty() {
      continue;
    }

    // Parse inbound report.
    let raw: InboundReport = match serde_json::from_str(trimmed) {
      Ok(v) => v,
      Err(e) => {
        let err = ErrorOutput::new(format!("json parse: {}", e));
        let _ = serde_json::to_writer(&mut out, &err);
        let _ = writeln!(out);
        continue;
      }
    };

    // Process through engine.
    match engine.process(&raw) {
      Ok(outcome) => {
        let _ = serde_json::to_writer(&mut out, &outcome);
        let _ = writeln!(out);
      }
      Err(e) => {
        let err = match &e {
          triage_engine::TriageError::Validation { field, reason } => {
            ErrorOutput::new(reason.clone()).with_field(field.clone())
          }
          _ => ErrorOutput::new(e.to_string()),
        };
        let _ = serde_json::to_writer(&mut out, &err);
        let _ = writeln!(out);
      }
    }
  }

  let _ = out.flush();
}
