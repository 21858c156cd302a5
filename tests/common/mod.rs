#![allow(dead_code)]

use assert_cmd::cargo_bin;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::process::Command;

pub const TODAY: &str = "2025-06-10";

/// The binary pointed at `data_dir`, with today pinned to [`TODAY`].
pub fn agenda(data_dir: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin!("agenda"));
    cmd.env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(data_dir)
        .arg("--today")
        .arg(TODAY);
    cmd
}

pub fn book(data_dir: &Path, name: &str, date: &str, time: &str) -> Command {
    let mut cmd = agenda(data_dir);
    cmd.args([
        "book",
        "--name",
        name,
        "--email",
        &format!("{}@example.com", name.to_lowercase()),
        "--phone",
        "11999990000",
        "--date",
        date,
        "--time",
        time,
        "--service",
        "corte",
    ]);
    cmd
}

pub fn write_key(data_dir: &Path, key: &str, raw: &str) {
    fs::create_dir_all(data_dir).unwrap();
    fs::write(data_dir.join(format!("{key}.json")), raw).unwrap();
}

pub fn read_key(data_dir: &Path, key: &str) -> Option<String> {
    fs::read_to_string(data_dir.join(format!("{key}.json"))).ok()
}

pub fn stored_appointments(data_dir: &Path) -> Vec<Value> {
    read_key(data_dir, "appointments")
        .map(|raw| serde_json::from_str(&raw).unwrap())
        .unwrap_or_default()
}

pub fn appointment_json(id: &str, name: &str, date: &str, time: &str) -> Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase()),
        "phone": "11999990000",
        "date": date,
        "time": time,
        "service": "manicure",
        "createdAt": "2025-06-01T10:00:00.000Z"
    })
}
