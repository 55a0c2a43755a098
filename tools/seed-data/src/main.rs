//! seed-data: sample fixtures for local development
//!
//! Usage:
//!   seed-data units            # unit roster, one JSON object per line
//!   seed-data reports [count]  # sample inbound reports, one per line
//!
//! Output is JSON lines. POST each line to the ops gateway (/units with an
//! admin actor, /incidents for reports) or pipe reports into the triage
//! engine binary.

use std::env;
use std::process;

#[derive(serde::Serialize)]
struct SeedUnit {
    callsign: &'static str,
    unit_type: &'static str,
    latitude: f64,
    longitude: f64,
}

#[derive(serde::Serialize)]
struct SeedReport {
    title: String,
    description: &'static str,
    latitude: f64,
    longitude: f64,
    incident_type: &'static str,
    severity: &'static str,
    timestamp: &'static str,
}

// Roster spread across central Addis Ababa.
const UNITS: &[SeedUnit] = &[
    SeedUnit { callsign: "ALPHA-1", unit_type: "police", latitude: 9.0054, longitude: 38.7636 },
    SeedUnit { callsign: "ALPHA-2", unit_type: "police", latitude: 9.0300, longitude: 38.7500 },
    SeedUnit { callsign: "ENGINE-1", unit_type: "fire", latitude: 9.0333, longitude: 38.7500 },
    SeedUnit { callsign: "MEDIC-1", unit_type: "medical", latitude: 9.0100, longitude: 38.7610 },
    SeedUnit { callsign: "TRAFFIC-1", unit_type: "traffic", latitude: 9.0107, longitude: 38.7613 },
];

struct ReportTemplate {
    title: &'static str,
    description: &'static str,
    latitude: f64,
    longitude: f64,
    incident_type: &'static str,
    severity: &'static str,
}

const REPORTS: &[ReportTemplate] = &[
    ReportTemplate {
        title: "Car Accident at Bole",
        description: "Two vehicle collision, blocking traffic.",
        latitude: 9.005401,
        longitude: 38.763611,
        incident_type: "accident",
        severity: "high",
    },
    ReportTemplate {
        title: "Fire in Piassa",
        description: "Small shop fire, smoke visible.",
        latitude: 9.030000,
        longitude: 38.750000,
        incident_type: "fire",
        severity: "critical",
    },
    ReportTemplate {
        title: "Flooding near Meskel Square",
        description: "Heavy rain caused drainage overflow.",
        latitude: 9.010000,
        longitude: 38.760000,
        incident_type: "hazard",
        severity: "medium",
    },
];

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(line) => println!("{}", line),
        Err(e) => {
            eprintln!("seed-data: serialization failed: {}", e);
            process::exit(2);
        }
    }
}

fn emit_units() {
    for unit in UNITS {
        print_json(unit);
    }
}

fn emit_reports(count: usize) {
    for i in 0..count {
        let template = &REPORTS[i % REPORTS.len()];
        let cycle = i / REPORTS.len();
        // Nudge repeats off the original spot so they do not all read as
        // near-duplicates of each other.
        let offset = cycle as f64 * 0.01;
        let title = if cycle == 0 {
            template.title.to_string()
        } else {
            format!("{} #{}", template.title, cycle + 1)
        };
        print_json(&SeedReport {
            title,
            description: template.description,
            latitude: template.latitude + offset,
            longitude: template.longitude + offset,
            incident_type: template.incident_type,
            severity: template.severity,
            timestamp: "2025-01-15T08:30:00Z",
        });
    }
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let command = args.get(1).map(|s| s.as_str());

    match command {
        Some("units") => emit_units(),
        Some("reports") => {
            let count = match args.get(2) {
                Some(raw) => raw.parse().unwrap_or_else(|_| {
                    eprintln!("seed-data: count must be a non-negative integer");
                    process::exit(2);
                }),
                None => REPORTS.len(),
            };
            emit_reports(count);
        }
        _ => {
            eprintln!("Usage: seed-data units");
            eprintln!("       seed-data reports [count]");
            process::exit(2);
        }
    }
}
