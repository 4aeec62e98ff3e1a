//! Tests that run against a live PostgreSQL instance. Ignored by default;
//! point `CAREBOOK_TEST_DATABASE_URL` (or `DATABASE_URL`) at a scratch
//! database and run:
//!
//!   cargo test -p carebook-db-postgres -- --ignored

use rust_decimal::Decimal;
use time::OffsetDateTime;

use carebook_db_postgres::pool::PgPoolOptions;
use carebook_db_postgres::{
    AppointmentStorage, DoctorStorage, HospitalStorage, NewUser, PgPool, SlotStorage,
    StorageError, UserStorage, migrations,
};

async fn connect() -> PgPool {
    let url = std::env::var("CAREBOOK_TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("CAREBOOK_TEST_DATABASE_URL must point at a scratch database");

    let pool = PgPoolOptions::new()
        .max_connections(4)
        .connect(&url)
        .await
        .expect("connect to test database");

    migrations::run(&pool).await.expect("apply migrations");
    pool
}

/// Per-run suffix so repeated runs do not trip unique constraints.
fn nonce() -> i128 {
    OffsetDateTime::now_utc().unix_timestamp_nanos()
}

fn sample_user(tag: &str, n: i128) -> NewUser {
    NewUser {
        username: format!("{tag}_{n}"),
        email: format!("{tag}_{n}@example.com"),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdHNhbHQxMjM$dGVzdGhhc2h0ZXN0aGFzaA"
            .to_string(),
        first_name: "Test".to_string(),
        last_name: "User".to_string(),
        date_of_birth: None,
        gender: None,
        profile_photo: None,
    }
}

#[tokio::test]
#[ignore = "needs a live Postgres"]
async fn test_duplicate_signup_is_conflict() {
    let pool = connect().await;
    let storage = UserStorage::new(&pool);
    let n = nonce();

    let first = sample_user("dup", n);
    storage.create(&first).await.expect("first signup");

    let mut same_username = first.clone();
    same_username.email = format!("dup_other_{n}@example.com");
    let err = storage.create(&same_username).await.unwrap_err();
    assert!(
        matches!(err, StorageError::Conflict { ref message } if message == "Username already taken.")
    );

    let mut same_email = first.clone();
    same_email.username = format!("dup_other_{n}");
    let err = storage.create(&same_email).await.unwrap_err();
    assert!(
        matches!(err, StorageError::Conflict { ref message } if message == "Email already registered.")
    );
}

#[tokio::test]
#[ignore = "needs a live Postgres"]
async fn test_booking_missing_slot_is_not_found() {
    let pool = connect().await;
    let n = nonce();

    let patient = UserStorage::new(&pool)
        .create(&sample_user("missing_slot", n))
        .await
        .unwrap();

    let err = AppointmentStorage::new(&pool)
        .book(i64::MAX - 1, patient.id)
        .await
        .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
#[ignore = "needs a live Postgres"]
async fn test_slot_can_be_booked_exactly_once() {
    let pool = connect().await;
    let n = nonce();

    let doctor_user = UserStorage::new(&pool)
        .create(&sample_user("book_doc", n))
        .await
        .unwrap();
    let patient = UserStorage::new(&pool)
        .create(&sample_user("book_pat", n))
        .await
        .unwrap();
    let hospital = HospitalStorage::new(&pool)
        .create("General Hospital", "1 Main St", None)
        .await
        .unwrap();
    let doctor = DoctorStorage::new(&pool)
        .create(doctor_user.id, &format!("LIC{n}"), 5, "MBBS", hospital.id)
        .await
        .unwrap();
    let slot = SlotStorage::new(&pool)
        .create(doctor.id, OffsetDateTime::now_utc(), Decimal::new(15050, 2))
        .await
        .unwrap();

    let storage = AppointmentStorage::new(&pool);

    let booked = storage.book(slot.id, patient.id).await.unwrap();
    assert_eq!(booked.slot_id, slot.id);
    assert_eq!(booked.user_id, patient.id);

    let err = storage.book(slot.id, patient.id).await.unwrap_err();
    assert!(err.is_conflict());

    let appointments = storage.list_by_user(patient.id).await.unwrap();
    let for_slot = appointments
        .iter()
        .filter(|a| a.slot_id == slot.id)
        .count();
    assert_eq!(for_slot, 1);
}
