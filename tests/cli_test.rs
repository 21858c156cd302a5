mod common;

use assert_cmd::prelude::*;
use common::{TODAY, agenda, appointment_json, book, read_key, stored_appointments, write_key};
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_book_then_conflict() {
    let dir = tempdir().unwrap();

    book(dir.path(), "Ana", "2025-06-10", "09:00")
        .assert()
        .success()
        .stdout(predicate::str::contains("Date:     10/06/2025"))
        .stderr(predicate::str::contains(
            "[success] Appointment booked for 10/06/2025 at 09:00",
        ));

    book(dir.path(), "Bia", "2025-06-10", "09:00")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "[error] 2025-06-10 at 09:00 is already booked by Ana",
        ));

    let stored = stored_appointments(dir.path());
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0]["name"], "Ana");
    assert_eq!(stored[0]["service"], "corte");
    assert!(stored[0].get("notes").is_none());
}

#[test]
fn test_book_rejects_bad_input() {
    let dir = tempdir().unwrap();

    book(dir.path(), "Ana", "2025-06-09", "09:00")
        .assert()
        .failure()
        .stderr(predicate::str::contains("dates before 2025-06-10 are closed"));

    book(dir.path(), "Ana", "2025-06-11", "12:00")
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"12:00\" is not a bookable time slot"));

    book(dir.path(), "Ana", "11/06/2025", "09:00")
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected YYYY-MM-DD"));

    book(dir.path(), "  ", "2025-06-11", "09:00")
        .assert()
        .failure()
        .stderr(predicate::str::contains("name is required"));

    assert!(stored_appointments(dir.path()).is_empty());
}

#[test]
fn test_slots_show_occupant() {
    let dir = tempdir().unwrap();
    book(dir.path(), "Ana", "2025-06-11", "08:30").assert().success();

    agenda(dir.path())
        .args(["slots", "--date", "2025-06-11"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Slots for 11/06/2025"))
        .stdout(predicate::str::contains("08:00  available"))
        .stdout(predicate::str::contains("08:30  taken by Ana"));

    let id = stored_appointments(dir.path())[0]["id"].as_str().unwrap().to_string();
    agenda(dir.path())
        .args(["slots", "--date", "2025-06-11", "--exclude", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("08:30  available"));
}

#[test]
fn test_slots_reject_malformed_date() {
    let dir = tempdir().unwrap();
    for bad in ["garbage", "11/06/2025", "2025-6-11"] {
        agenda(dir.path())
            .args(["slots", "--date", bad])
            .assert()
            .failure()
            .code(1)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("expected YYYY-MM-DD"));
    }
}

#[test]
fn test_list_quick_today() {
    let dir = tempdir().unwrap();
    let records = serde_json::json!([
        appointment_json("y", "Yara", "2025-06-09", "09:00"),
        appointment_json("t", "Tina", "2025-06-10", "09:00"),
        appointment_json("m", "Mara", "2025-06-11", "09:00"),
    ]);
    write_key(dir.path(), "appointments", &records.to_string());

    agenda(dir.path())
        .args(["list", "--quick", "today"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tina"))
        .stdout(predicate::str::contains("Yara").not())
        .stdout(predicate::str::contains("Mara").not());

    // Pending by default: today and later.
    agenda(dir.path())
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Tina"))
        .stdout(predicate::str::contains("Mara"))
        .stdout(predicate::str::contains("Yara").not());

    agenda(dir.path())
        .args(["list", "--search", "YARA"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Yara"));
}

#[test]
fn test_quick_and_manual_filters_are_exclusive() {
    let dir = tempdir().unwrap();
    agenda(dir.path())
        .args(["list", "--quick", "all", "--date", TODAY])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_show_edit_delete() {
    let dir = tempdir().unwrap();
    book(dir.path(), "Ana", "2025-06-12", "10:00").assert().success();
    book(dir.path(), "Bia", "2025-06-12", "10:30").assert().success();
    let stored = stored_appointments(dir.path());
    let ana = stored[0]["id"].as_str().unwrap().to_string();
    let created_at = stored[0]["createdAt"].clone();

    // Moving onto Bia's slot is a conflict.
    agenda(dir.path())
        .args(["edit", &ana, "--time", "10:30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already booked by Bia"));

    // Keeping the own slot is not.
    agenda(dir.path())
        .args(["edit", &ana, "--notes", "bring photo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Notes:    bring photo"))
        .stderr(predicate::str::contains("[success] Appointment updated"));

    let stored = stored_appointments(dir.path());
    assert_eq!(stored[0]["id"], ana.as_str());
    assert_eq!(stored[0]["createdAt"], created_at);
    assert_eq!(stored[0]["time"], "10:00");

    agenda(dir.path())
        .args(["show", &ana])
        .assert()
        .success()
        .stdout(predicate::str::contains("Service:  Corte de Cabelo"));

    agenda(dir.path())
        .args(["delete", &ana])
        .assert()
        .success()
        .stderr(predicate::str::contains("[success] Appointment deleted"));

    agenda(dir.path())
        .args(["show", &ana])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    agenda(dir.path())
        .args(["delete", &ana])
        .assert()
        .success()
        .stderr(predicate::str::contains("[info] No appointment with id"));

    assert_eq!(stored_appointments(dir.path()).len(), 1);
}

#[test]
fn test_stats() {
    let dir = tempdir().unwrap();
    let records = serde_json::json!([
        appointment_json("a", "Ana", "2025-06-09", "09:00"),
        appointment_json("b", "Bia", "2025-06-10", "09:00"),
        appointment_json("c", "Caio", "2025-06-20", "09:00"),
    ]);
    write_key(dir.path(), "appointments", &records.to_string());

    agenda(dir.path())
        .arg("stats")
        .assert()
        .success()
        .stdout("Total: 3\nToday: 1\nUpcoming: 1\n");
}

#[test]
fn test_export_writes_sorted_rows() {
    let dir = tempdir().unwrap();
    let records = serde_json::json!([
        appointment_json("b", "Bia", "2025-06-12", "09:00"),
        appointment_json("a", "Ana \"Nina\"", "2025-06-11", "14:00"),
    ]);
    write_key(dir.path(), "appointments", &records.to_string());
    let out = dir.path().join("export.csv");

    agenda(dir.path())
        .args(["export", "--out"])
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("Exported 2 appointment(s)"));

    let csv = std::fs::read_to_string(&out).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines[0],
        "Nome,Email,Telefone,Data,Horário,Serviço,Observações,Data de Criação"
    );
    assert!(lines[1].starts_with(r#""Ana ""Nina""","#));
    assert!(lines[1].contains(",2025-06-11,14:00,\"Manicure\",\"\",2025-06-01T10:00:00.000Z"));
    assert!(lines[2].starts_with("\"Bia\""));
    assert_eq!(lines.len(), 3);
}

#[test]
fn test_export_default_filename() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data");

    agenda(&data)
        .current_dir(dir.path())
        .arg("export")
        .assert()
        .success();

    let csv = std::fs::read_to_string(dir.path().join("agendamentos_2025-06-10.csv")).unwrap();
    assert_eq!(csv.lines().count(), 1);
}

#[test]
fn test_admin_accounts() {
    let dir = tempdir().unwrap();

    agenda(dir.path())
        .args(["admin", "list"])
        .assert()
        .success()
        .stdout("admin (you)\n");
    assert_eq!(
        read_key(dir.path(), "admins").as_deref(),
        Some(r#"[{"username":"admin","password":"admin123"}]"#)
    );

    agenda(dir.path())
        .args(["admin", "add", "maria", "--password", "a", "--confirm", "b"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("passwords do not match"));

    agenda(dir.path())
        .args(["admin", "add", "maria", "--password", "secret"])
        .assert()
        .success();

    agenda(dir.path())
        .args(["admin", "add", "maria", "--password", "other"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("user maria already exists"));

    let before = read_key(dir.path(), "admins");
    agenda(dir.path())
        .args(["admin", "remove", "admin"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("you cannot remove your own user"));
    assert_eq!(read_key(dir.path(), "admins"), before);

    agenda(dir.path())
        .args(["admin", "remove", "maria"])
        .assert()
        .success();

    agenda(dir.path())
        .args(["admin", "list"])
        .assert()
        .success()
        .stdout("admin (you)\n");
}

#[test]
fn test_login_switches_session_user() {
    let dir = tempdir().unwrap();
    agenda(dir.path())
        .args(["admin", "add", "maria", "--password", "secret"])
        .assert()
        .success();

    agenda(dir.path())
        .args(["login", "maria", "--password", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid username or password"));

    agenda(dir.path())
        .args(["login", "maria", "--password", "secret"])
        .assert()
        .success();
    assert_eq!(read_key(dir.path(), "currentUser").as_deref(), Some("maria"));
    assert_eq!(
        read_key(dir.path(), "adminAuthenticated").as_deref(),
        Some("true")
    );

    // maria is now the session user and may remove admin.
    agenda(dir.path())
        .args(["admin", "remove", "admin"])
        .assert()
        .success();
    agenda(dir.path())
        .args(["login", "admin", "--password", "admin123"])
        .assert()
        .failure();

    agenda(dir.path()).arg("logout").assert().success();
    assert_eq!(read_key(dir.path(), "adminAuthenticated"), None);
    assert_eq!(read_key(dir.path(), "currentUser").as_deref(), Some("maria"));
}
