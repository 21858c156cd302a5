use agenda::application::accounts::AdminAccountManager;
use agenda::application::engine::BookingEngine;
use agenda::domain::appointment::AppointmentFields;
use agenda::domain::ports::{KeyValueStore, KeyValueStoreBox, KeyValueStoreFactory};
use agenda::infrastructure::clock::FixedClock;
use agenda::infrastructure::in_memory::InMemoryStore;
use agenda::infrastructure::json_file::JsonFileStore;
use chrono::NaiveDate;
use std::thread;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 10).unwrap()
}

fn booking(name: &str, time: &str) -> AppointmentFields {
    AppointmentFields {
        name: name.into(),
        email: "client@example.com".into(),
        phone: "11999990000".into(),
        date: "2025-06-10".into(),
        time: time.into(),
        service: "massagem".into(),
        notes: None,
    }
}

fn factory(store: impl KeyValueStore + Clone + 'static) -> KeyValueStoreFactory {
    Box::new(move || Box::new(store.clone()) as KeyValueStoreBox)
}

#[test]
fn test_stores_as_trait_objects_across_threads() {
    let stores = factory(InMemoryStore::new());
    let engine_store = stores();
    let accounts_store = stores();

    let engine_handle = thread::spawn(move || {
        let (mut engine, _) =
            BookingEngine::open(engine_store, Box::new(FixedClock::on(today()))).unwrap();
        engine.create(booking("Ana", "08:00")).unwrap();
    });
    let accounts_handle = thread::spawn(move || {
        let (mut accounts, _) = AdminAccountManager::open(accounts_store).unwrap();
        accounts.add("maria", "secret").unwrap();
    });
    engine_handle.join().unwrap();
    accounts_handle.join().unwrap();

    let (engine, _) = BookingEngine::open(stores(), Box::new(FixedClock::on(today()))).unwrap();
    assert!(engine.is_slot_booked("2025-06-10", "08:00", None));
    let (accounts, _) = AdminAccountManager::open(stores()).unwrap();
    assert!(accounts.verify("maria", "secret"));
}

#[test]
fn test_last_writer_wins_between_engines() {
    let dir = tempfile::tempdir().unwrap();
    let stores = factory(JsonFileStore::open(dir.path()).unwrap());
    let clock = || Box::new(FixedClock::on(today()));

    let (mut public, _) = BookingEngine::open(stores(), clock()).unwrap();
    let (mut admin, _) = BookingEngine::open(stores(), clock()).unwrap();

    public.create(booking("Ana", "09:00")).unwrap();
    // The admin snapshot predates Ana, so its write drops her.
    admin.create(booking("Bia", "09:30")).unwrap();

    let (fresh, _) = BookingEngine::open(stores(), clock()).unwrap();
    let names: Vec<&str> = fresh.appointments().iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["Bia"]);
}
