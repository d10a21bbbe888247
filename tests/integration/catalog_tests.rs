//! Database-backed catalog tests
//!
//! Run against a scratch Postgres database:
//! `DATABASE_URL=postgres://... cargo test --test catalog_tests -- --ignored`

use std::collections::HashMap;

use chrono::{Duration, Local};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use locallibrary_server::{
    admin::ModelKind,
    config::AppConfig,
    error::AppError,
    models::{
        author::AuthorInput,
        book::BookInput,
        book_instance::{BookInstanceInput, BookInstanceQuery},
        genre::GenreInput,
        language::LanguageInput,
        user::CreateUser,
        LoanStatus,
    },
    repository::Page,
    AppState,
};

async fn state() -> AppState {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");
    AppState::new(AppConfig::default(), pool)
}

/// ISBN unique per test run
fn isbn() -> String {
    Uuid::new_v4().simple().to_string()[..13].to_string()
}

async fn genre(state: &AppState, name: &str) -> i32 {
    state
        .services
        .catalog
        .create_genre(&GenreInput {
            name: name.to_string(),
        })
        .await
        .expect("Failed to create genre")
        .id
}

fn book_input(isbn: &str, genre_ids: Vec<i32>) -> BookInput {
    BookInput {
        title: "A Wizard of Earthsea".to_string(),
        author_id: None,
        summary: "Ged learns the true names of things.".to_string(),
        isbn: isbn.to_string(),
        genre_ids,
        language_id: None,
    }
}

fn copy_input(book_id: i32) -> BookInstanceInput {
    BookInstanceInput {
        book_id: Some(book_id),
        imprint: "1968".to_string(),
        due_back: None,
        borrower_id: None,
        status: None,
    }
}

#[tokio::test]
#[ignore]
async fn test_isbn_is_unique() {
    let state = state().await;
    let fantasy = genre(&state, "Fantasy").await;
    let isbn = isbn();

    state
        .services
        .catalog
        .create_book(book_input(&isbn, vec![fantasy]))
        .await
        .unwrap();

    match state
        .services
        .catalog
        .create_book(book_input(&isbn, vec![fantasy]))
        .await
    {
        Err(AppError::Fields(fields)) => {
            assert_eq!(fields["isbn"], vec!["Book with this ISBN already exists.".to_string()]);
        }
        other => panic!("expected isbn field error, got {:?}", other.map(|b| b.book.id)),
    }
}

#[tokio::test]
#[ignore]
async fn test_display_genre_keeps_selection_order() {
    let state = state().await;
    let ids = vec![
        genre(&state, "Epic").await,
        genre(&state, "Adventure").await,
        genre(&state, "Classic").await,
        genre(&state, "Children").await,
    ];
    let book = state
        .services
        .catalog
        .create_book(book_input(&isbn(), ids))
        .await
        .unwrap();
    assert_eq!(book.genres.len(), 4);
    assert_eq!(book.display_genre, "Epic, Adventure, Classic");
}

#[tokio::test]
#[ignore]
async fn test_delete_book_with_copies_is_restricted() {
    let state = state().await;
    let poetry = genre(&state, "Poetry").await;
    let book = state
        .services
        .catalog
        .create_book(book_input(&isbn(), vec![poetry]))
        .await
        .unwrap();
    let copy = state
        .services
        .circulation
        .create(&copy_input(book.book.id))
        .await
        .unwrap();

    let result = state.services.catalog.delete_book(book.book.id).await;
    assert!(matches!(result, Err(AppError::Restricted(_))));
    assert!(state.services.catalog.get_book(book.book.id).await.is_ok());

    state.services.circulation.delete(copy.id).await.unwrap();
    state.services.catalog.delete_book(book.book.id).await.unwrap();
    assert!(matches!(
        state.services.catalog.get_book(book.book.id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
#[ignore]
async fn test_delete_author_clears_books() {
    let state = state().await;
    let author = state
        .services
        .catalog
        .create_author(AuthorInput {
            first_name: Some("Ursula".to_string()),
            surname: Some("Le Guin".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    let drama = genre(&state, "Drama").await;
    let book = state
        .services
        .catalog
        .create_author_book(author.id, book_input(&isbn(), vec![drama]))
        .await
        .unwrap();
    assert_eq!(book.book.author_id, Some(author.id));

    state.services.catalog.delete_author(author.id).await.unwrap();
    let book = state.services.catalog.get_book(book.book.id).await.unwrap();
    assert_eq!(book.book.author_id, None);
    assert!(book.author.is_none());
}

#[tokio::test]
#[ignore]
async fn test_delete_language_clears_books() {
    let state = state().await;
    let language = state
        .services
        .catalog
        .create_language(&LanguageInput {
            name: "Tswana".to_string(),
        })
        .await
        .unwrap();
    let fiction = genre(&state, "Fiction").await;
    let mut input = book_input(&isbn(), vec![fiction]);
    input.language_id = Some(language.id);
    let book = state.services.catalog.create_book(input).await.unwrap();

    state
        .services
        .catalog
        .delete_language(language.id)
        .await
        .unwrap();
    let book = state.services.catalog.get_book(book.book.id).await.unwrap();
    assert_eq!(book.book.language_id, None);
}

#[tokio::test]
#[ignore]
async fn test_copy_defaults_and_borrower_cleared() {
    let state = state().await;
    let sf = genre(&state, "Science Fiction").await;
    let book = state
        .services
        .catalog
        .create_book(book_input(&isbn(), vec![sf]))
        .await
        .unwrap();

    let borrower = state
        .services
        .users
        .create(&CreateUser {
            username: format!("reader-{}", Uuid::new_v4().simple()),
            password: Some("reader".to_string()),
            first_name: None,
            last_name: None,
            email: None,
            is_staff: false,
            is_superuser: false,
            permissions: Vec::new(),
        })
        .await
        .unwrap();

    let mut input = copy_input(book.book.id);
    input.borrower_id = Some(borrower.id);
    input.status = Some(LoanStatus::OnLoan);
    input.due_back = Some(Local::now().date_naive() - Duration::days(1));
    let copy = state.services.circulation.create(&input).await.unwrap();
    assert!(copy.is_overdue());
    assert_eq!(copy.borrower_username.as_deref(), Some(borrower.username.as_str()));

    let plain = state
        .services
        .circulation
        .create(&copy_input(book.book.id))
        .await
        .unwrap();
    assert_eq!(plain.status, LoanStatus::Maintenance);

    state.services.users.delete(borrower.id).await.unwrap();
    let copy = state.services.circulation.get(copy.id).await.unwrap();
    assert_eq!(copy.borrower_id, None);
    assert_eq!(copy.status, LoanStatus::OnLoan);
}

#[tokio::test]
#[ignore]
async fn test_mark_returned() {
    let state = state().await;
    let sf = genre(&state, "Space Opera").await;
    let book = state
        .services
        .catalog
        .create_book(book_input(&isbn(), vec![sf]))
        .await
        .unwrap();
    let mut input = copy_input(book.book.id);
    input.status = Some(LoanStatus::OnLoan);
    input.due_back = Some(Local::now().date_naive() + Duration::days(14));
    let copy = state.services.circulation.create(&input).await.unwrap();

    let returned = state.services.circulation.mark_returned(copy.id).await.unwrap();
    assert_eq!(returned.status, LoanStatus::Available);
    assert_eq!(returned.due_back, None);
    assert_eq!(returned.borrower_id, None);

    let query = BookInstanceQuery {
        book_id: Some(book.book.id),
        status: Some(LoanStatus::Available),
        ..Default::default()
    };
    let (copies, total) = state
        .services
        .circulation
        .list(&query, Page::all())
        .await
        .unwrap();
    assert_eq!(total, 1);
    assert_eq!(copies[0].id, copy.id);
}

#[tokio::test]
#[ignore]
async fn test_admin_views_render_stored_records() {
    let state = state().await;
    let horror = genre(&state, "Horror").await;
    let book = state
        .services
        .catalog
        .create_book(book_input(&isbn(), vec![horror]))
        .await
        .unwrap();
    let mut input = copy_input(book.book.id);
    input.status = Some(LoanStatus::Reserved);
    state.services.circulation.create(&input).await.unwrap();

    let change = state
        .services
        .admin
        .change_view(ModelKind::Book, &book.book.id.to_string())
        .await
        .unwrap();
    assert_eq!(change.inlines.len(), 1);
    assert_eq!(change.inlines[0].rows.len(), 1);

    let params = HashMap::from([
        ("status".to_string(), "r".to_string()),
        ("due_back".to_string(), "no_date".to_string()),
    ]);
    let list = state
        .services
        .admin
        .list_view(ModelKind::BookInstance, &params)
        .await
        .unwrap();
    assert!(list.total >= 1);
    assert!(list.rows.iter().all(|row| row.cells[1] == "Reserved"));
    assert!(list.rows.iter().all(|row| row.cells[3] == "-"));
}
