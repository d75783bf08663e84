use chrono::{Days, NaiveDate};
use rentstore::api::RentalApi;
use rentstore::collab::{JsonSubscriptions, SubscriptionTier};
use rentstore::config::StoreConfig;
use rentstore::error::{LifecycleError, PruneError, StoreError};
use rentstore::lifecycle::{self, RentalStatus};
use rentstore::model::{CatalogEntry, Table};
use rentstore::scoring::flag_unpopular;
use rentstore::stats::{compute_aggregates, compute_store_averages};
use rentstore::store::fs_backend::FsBackend;
use rentstore::store::{FileStore, RecordStore};
use std::fs;
use tempfile::TempDir;

fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn setup(catalog: &str) -> (TempDir, FileStore) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("Game_Info.txt"), catalog).unwrap();
    let store = RecordStore::with_backend(FsBackend::new(dir.path().to_path_buf()));
    (dir, store)
}

fn subscriptions(dir: &TempDir) -> JsonSubscriptions {
    let subs = JsonSubscriptions::new(dir.path().join("subscriptions.json"), Default::default());
    subs.set("alice", SubscriptionTier::Standard).unwrap();
    subs.set("bob", SubscriptionTier::Basic).unwrap();
    subs
}

const CATALOG: &str = "GameID,Platform,Genre,Title,Condition,PurchaseDate\n\
g1,PS4,Racing,Gran Turismo,Good,2023-11-01\n\
g2,PC,RPG,Dragon Age,Worn,2023-11-01\n";

#[test]
fn rent_and_return_survive_reopening_the_store() {
    let (dir, store) = setup(CATALOG);
    let subs = subscriptions(&dir);

    lifecycle::rent(&store, &subs, "g1", "alice", day("2024-01-01")).unwrap();

    let reopened = RecordStore::with_backend(FsBackend::new(dir.path().to_path_buf()));
    assert_eq!(
        lifecycle::status(&reopened, "g1").unwrap(),
        RentalStatus::Rented
    );

    lifecycle::return_copy(&reopened, "g1", day("2024-01-05")).unwrap();
    assert_eq!(
        fs::read_to_string(dir.path().join("Rental.txt")).unwrap(),
        "g1,2024-01-01,2024-01-05,alice\n"
    );
    assert_eq!(
        lifecycle::status(&store, "g1").unwrap(),
        RentalStatus::Available
    );
}

#[test]
fn second_rent_of_same_copy_fails() {
    let (dir, store) = setup(CATALOG);
    let subs = subscriptions(&dir);

    lifecycle::rent(&store, &subs, "g1", "alice", day("2024-01-01")).unwrap();
    let err = lifecycle::rent(&store, &subs, "g1", "bob", day("2024-01-02")).unwrap_err();
    assert!(matches!(err, LifecycleError::AlreadyRented(id) if id == "g1"));
    assert_eq!(store.ledger().unwrap().len(), 1);
}

#[test]
fn double_return_fails_not_rented() {
    let (dir, store) = setup(CATALOG);
    let subs = subscriptions(&dir);

    lifecycle::rent(&store, &subs, "g2", "bob", day("2024-01-01")).unwrap();
    lifecycle::return_copy(&store, "g2", day("2024-01-02")).unwrap();
    assert!(matches!(
        lifecycle::return_copy(&store, "g2", day("2024-01-03")),
        Err(LifecycleError::NotRented(_))
    ));
}

#[test]
fn basic_tier_holds_one_copy() {
    let (dir, store) = setup(CATALOG);
    let subs = subscriptions(&dir);

    lifecycle::rent(&store, &subs, "g1", "bob", day("2024-01-01")).unwrap();
    assert!(matches!(
        lifecycle::rent(&store, &subs, "g2", "bob", day("2024-01-01")),
        Err(LifecycleError::LimitExceeded { limit: 1, .. })
    ));
}

#[test]
fn prune_after_return_removes_both_tables() {
    let (dir, store) = setup(CATALOG);
    let subs = subscriptions(&dir);

    lifecycle::rent(&store, &subs, "g1", "alice", day("2024-01-01")).unwrap();
    assert!(matches!(
        rentstore::commands::prune::prune(&store, "g1", true),
        Err(PruneError::CurrentlyRented(_))
    ));

    lifecycle::return_copy(&store, "g1", day("2024-01-04")).unwrap();
    rentstore::commands::prune::prune(&store, "g1", true).unwrap();

    assert!(matches!(
        store.lookup_by_key("g1"),
        Err(StoreError::NotFound(_))
    ));
    let catalog = fs::read_to_string(dir.path().join("Game_Info.txt")).unwrap();
    assert!(catalog.starts_with("GameID,"));
    assert!(catalog.contains("g2,PC,RPG"));
}

#[test]
fn hand_edited_ledger_without_trailing_newline_still_appends() {
    let (dir, store) = setup(CATALOG);
    fs::write(dir.path().join("Rental.txt"), "g2,2024-01-01,2024-01-02,bob").unwrap();
    let subs = subscriptions(&dir);

    lifecycle::rent(&store, &subs, "g1", "alice", day("2024-02-01")).unwrap();
    assert_eq!(store.ledger().unwrap().len(), 2);
}

#[test]
fn malformed_row_is_reported_with_its_line() {
    let (_dir, store) = setup("g1,PS4,Racing,Gran Turismo,Good,yesterday\n");
    match store.read_table::<CatalogEntry>() {
        Err(StoreError::Malformed { table, line, .. }) => {
            assert_eq!(table, Table::Catalog);
            assert_eq!(line, 1);
        }
        other => panic!("expected malformed error, got {:?}", other),
    }
}

#[test]
fn stale_rarely_rented_copy_is_flagged_from_disk() {
    let today = day("2024-06-01");
    let catalog = format!(
        "g1,PS4,Racing,Gran Turismo,Good,{}\ng2,PC,RPG,Dragon Age,Good,{}\n",
        today - Days::new(40),
        today - Days::new(40)
    );
    let (dir, store) = setup(&catalog);
    let returned = today - Days::new(40);
    let mut ledger = format!("g1,{},{},alice\n", returned, returned);
    for offset in [18u64, 16, 14, 12, 10, 8, 6, 4, 2] {
        let d = today - Days::new(offset);
        ledger.push_str(&format!("g2,{},{},bob\n", d, d));
    }
    fs::write(dir.path().join("Rental.txt"), ledger).unwrap();

    let feedback = rentstore::collab::JsonFeedback::new(dir.path().join("feedback.json"));
    let aggregates = compute_aggregates(&store, &feedback).unwrap();
    let averages = compute_store_averages(&aggregates).unwrap();
    assert_eq!(averages.times_rented, 5.0);
    assert!(averages.rating().is_err());

    let flagged = flag_unpopular(&aggregates, &averages, today);
    assert_eq!(flagged.keys().collect::<Vec<_>>(), vec!["g1"]);
    assert_eq!(flagged["g1"].signals.recency, 2);
    assert_eq!(flagged["g1"].signals.frequency, 1);
}

#[test]
fn api_honours_configured_file_names() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("rentstore.toml"),
        "catalog_file = \"games.csv\"\nledger_file = \"rentals.csv\"\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("games.csv"),
        "g1,PS4,Racing,Gran Turismo,Good,2023-11-01\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("subscriptions.json"),
        r#"{ "alice": { "tier": "premium" } }"#,
    )
    .unwrap();

    let config = StoreConfig::load(dir.path()).unwrap();
    let api = RentalApi::open(dir.path(), &config);
    let result = api.rent("g1", "alice", day("2024-03-01")).unwrap();
    assert!(!result.has_errors(), "{:?}", result.messages);

    assert!(dir.path().join("rentals.csv").exists());
    assert!(!dir.path().join("Rental.txt").exists());
}
