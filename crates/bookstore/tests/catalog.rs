//! Database-backed tests for the catalog operations.
//!
//! These run only when `DATABASE_URL` is set (a `.env` file is honoured).
//! Each test works inside its own schema, which is dropped and recreated on
//! entry, so tests can run in parallel against one database.

use bookstore::{Book, BookFilter, BookInput, StoreError, sql};
use std::time::Duration;

async fn try_connect(schema: &str) -> Option<tokio_postgres::Client> {
    dotenvy::dotenv().ok();
    let database_url = std::env::var("DATABASE_URL").ok()?;
    let (client, connection) = tokio_postgres::connect(&database_url, tokio_postgres::NoTls)
        .await
        .expect("Failed to connect to DATABASE_URL with NoTls");
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("tokio-postgres connection error: {e}");
        }
    });

    let setup = format!(
        "DROP SCHEMA IF EXISTS {schema} CASCADE; CREATE SCHEMA {schema}; \
         SET search_path TO {schema};"
    );
    client
        .batch_execute(&setup)
        .await
        .expect("create test schema");
    client
        .batch_execute(include_str!("../sql/schema.sql"))
        .await
        .expect("create books table");
    Some(client)
}

fn book(title: &str, category: &str, year: i32) -> BookInput {
    BookInput {
        title: title.into(),
        author: "Test Author".into(),
        isbn: format!("isbn-{title}"),
        year,
        price: 19.99,
        category: category.into(),
        cover_image: "/covers/test.jpg".into(),
        rating: 4.0,
        reviews_count: 10,
        language: "English".into(),
        publisher: "Test House".into(),
        description: "A book used in tests".into(),
        ..BookInput::default()
    }
}

fn ids(books: &[Book]) -> Vec<i32> {
    books.iter().map(|b| b.id).collect()
}

#[tokio::test]
async fn insert_then_read_round_trips_required_fields() {
    let Some(client) = try_connect("bookstore_test_round_trip").await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    let mut input = book("Round Trip", "Fiction", 2021);
    input.is_new = true;
    input.discount = 15;
    let created = input.clone().insert(&client).await.unwrap();
    assert!(created.id > 0);
    assert_eq!(created.created_at, created.updated_at);

    let fetched = Book::fetch_by_id(&client, created.id).await.unwrap();
    assert_eq!(fetched.title, input.title);
    assert_eq!(fetched.author, input.author);
    assert_eq!(fetched.isbn, input.isbn);
    assert_eq!(fetched.year, input.year);
    assert_eq!(fetched.price, input.price);
    assert_eq!(fetched.category, input.category);
    assert_eq!(fetched.discount, 15);
    assert_eq!(fetched.cover_image, input.cover_image);
    assert_eq!(fetched.rating, input.rating);
    assert_eq!(fetched.reviews_count, input.reviews_count);
    assert!(fetched.is_new);
    assert_eq!(fetched.language, input.language);
    assert_eq!(fetched.publisher, input.publisher);
    assert_eq!(fetched.description, input.description);
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn nullable_columns_map_to_optional_fields() {
    let Some(client) = try_connect("bookstore_test_nullable").await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    let without = book("No Extras", "Fiction", 2020)
        .insert(&client)
        .await
        .unwrap();

    let mut extras = book("With Extras", "Fiction", 2020);
    extras.original_price = Some(24.75);
    extras.pages = Some(412);
    let with = extras.insert(&client).await.unwrap();

    let without = Book::fetch_by_id(&client, without.id).await.unwrap();
    assert_eq!(without.original_price, None);
    assert_eq!(without.pages, None);

    let with = Book::fetch_by_id(&client, with.id).await.unwrap();
    assert_eq!(with.original_price, Some(24.75));
    assert_eq!(with.pages, Some(412));

    // Rows written outside the service map the same way.
    client
        .batch_execute(
            "INSERT INTO books (title, author, isbn, year, price, original_price, pages) \
             VALUES ('Raw', 'Someone', 'raw-1', 1990, 5.0, NULL, 88)",
        )
        .await
        .unwrap();
    let filter = BookFilter::parse(Some("1990"), None).unwrap();
    let raw = Book::fetch_filtered(&client, &filter).await.unwrap();
    assert_eq!(raw.len(), 1);
    assert_eq!(raw[0].original_price, None);
    assert_eq!(raw[0].pages, Some(88));
}

#[tokio::test]
async fn update_then_read_returns_new_values_and_later_timestamp() {
    let Some(client) = try_connect("bookstore_test_update").await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    let created = book("Before", "Fiction", 2020)
        .insert(&client)
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(20)).await;

    let mut replacement = book("After", "Poetry", 2022);
    replacement.original_price = Some(30.0);
    let updated = replacement
        .clone()
        .update_by_id(&client, created.id)
        .await
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.title, "After");
    assert_eq!(updated.created_at, created.created_at);

    let fetched = Book::fetch_by_id(&client, created.id).await.unwrap();
    assert_eq!(fetched.title, "After");
    assert_eq!(fetched.category, "Poetry");
    assert_eq!(fetched.year, 2022);
    assert_eq!(fetched.original_price, Some(30.0));
    assert!(fetched.updated_at > created.updated_at);
    assert_eq!(fetched.updated_at, updated.updated_at);
}

#[tokio::test]
async fn update_of_missing_id_is_not_found() {
    let Some(client) = try_connect("bookstore_test_update_missing").await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    let err = book("Ghost", "Fiction", 2020)
        .update_by_id(&client, 4242)
        .await
        .unwrap_err();
    assert!(err.is_not_found(), "{err:?}");
}

#[tokio::test]
async fn delete_then_read_is_not_found() {
    let Some(client) = try_connect("bookstore_test_delete").await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    let created = book("Doomed", "Fiction", 2020)
        .insert(&client)
        .await
        .unwrap();
    Book::delete_by_id(&client, created.id).await.unwrap();

    let err = Book::fetch_by_id(&client, created.id).await.unwrap_err();
    assert!(err.is_not_found());

    let err = Book::delete_by_id(&client, created.id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn category_and_year_filter_returns_only_matches_in_id_order() {
    let Some(client) = try_connect("bookstore_test_filter").await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    let first = book("Match One", "Fiction", 2020)
        .insert(&client)
        .await
        .unwrap();
    book("Wrong Year", "Fiction", 2019)
        .insert(&client)
        .await
        .unwrap();
    book("Wrong Category", "Science", 2020)
        .insert(&client)
        .await
        .unwrap();
    let second = book("Match Two", "Literary fiction", 2020)
        .insert(&client)
        .await
        .unwrap();

    let filter = BookFilter::parse(Some("2020"), Some("fiction")).unwrap();
    let books = Book::fetch_filtered(&client, &filter).await.unwrap();
    assert_eq!(ids(&books), vec![first.id, second.id]);

    let all = Book::fetch_filtered(&client, &BookFilter::default())
        .await
        .unwrap();
    assert_eq!(all.len(), 4);
    assert!(all.windows(2).all(|w| w[0].id < w[1].id));
}

#[tokio::test]
async fn catalog_views() {
    let Some(client) = try_connect("bookstore_test_views").await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    let mut low = book("Rust in Action", "Programming", 2021);
    low.rating = 3.5;
    low.discount = 5;
    let low = low.insert(&client).await.unwrap();

    let mut high = book("Zero to Production", "Programming", 2022);
    high.author = "Luca Palmieri".into();
    high.rating = 4.9;
    high.discount = 25;
    let high = high.insert(&client).await.unwrap();

    let mut plain = book("Plain", "", 2000);
    plain.rating = 4.0;
    let plain = plain.insert(&client).await.unwrap();

    let found = Book::search(&client, "PALMIERI").await.unwrap();
    assert_eq!(ids(&found), vec![high.id]);

    let found = Book::search(&client, "rust").await.unwrap();
    assert_eq!(ids(&found), vec![low.id]);

    let err = Book::search(&client, "  ").await.unwrap_err();
    assert!(err.is_invalid_input());

    let featured = Book::featured(&client).await.unwrap();
    assert_eq!(ids(&featured), vec![high.id, plain.id, low.id]);

    let discounted = Book::discounted(&client).await.unwrap();
    assert_eq!(ids(&discounted), vec![high.id, low.id]);

    let newest = Book::newest(&client, 2).await.unwrap();
    assert_eq!(newest.len(), 2);

    let categories = Book::categories(&client).await.unwrap();
    assert_eq!(categories, vec!["Programming".to_string()]);
}

#[tokio::test]
async fn mismatched_projection_is_a_decode_error() {
    let Some(client) = try_connect("bookstore_test_projection").await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    book("Anything", "Fiction", 2020)
        .insert(&client)
        .await
        .unwrap();
    let err = sql("SELECT id, title FROM books")
        .fetch_all_as::<Book>(&client)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Decode { .. }), "{err:?}");
}

#[tokio::test]
async fn storage_errors_carry_the_server_message() {
    let Some(client) = try_connect("bookstore_test_missing_table").await else {
        eprintln!("DATABASE_URL not set; skipping");
        return;
    };

    client.batch_execute("DROP TABLE books").await.unwrap();

    let err = Book::fetch_filtered(&client, &BookFilter::default())
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Read(_)), "{err:?}");
    let message = err.to_string();
    assert!(
        message.contains(r#"relation "books" does not exist"#),
        "{message}"
    );

    let err = book("Nowhere", "Fiction", 2020)
        .insert(&client)
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Write(_)), "{err:?}");
    assert!(err.to_string().contains("books"), "{err}");
}
