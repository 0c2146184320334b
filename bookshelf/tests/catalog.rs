//! Catalog behaviour against a fresh in-memory store per test.

use std::sync::Arc;

use bookshelf::{memory::InMemoryStore, prelude::*};

fn catalog() -> Catalog<InMemoryStore> {
    Catalog::new(InMemoryStore::new())
}

fn book(title: &str, author: &str, year: i64, price: i64, genres: &[Genre]) -> NewBook {
    NewBook {
        title: title.to_string(),
        author: author.to_string(),
        year,
        price,
        genres: genres.to_vec(),
    }
}

async fn seeded() -> Catalog<InMemoryStore> {
    let catalog = catalog();
    for new_book in [
        book("Dune", "Frank Herbert", 1965, 20, &[Genre::SciFi, Genre::Novel]),
        book("akira", "Katsuhiro Otomo", 1982, 35, &[Genre::Manga, Genre::SciFi]),
        book("Clean Code", "Robert Martin", 2008, 40, &[Genre::Professional]),
        book("Émile", "Rousseau", 1940, 12, &[Genre::History]),
        book("Blank", "Nobody", 2001, 5, &[]),
    ] {
        catalog.create(new_book).await.unwrap();
    }
    catalog
}

fn titles(books: &[Book]) -> Vec<&str> {
    books.iter().map(|book| book.title.as_str()).collect()
}

#[tokio::test]
async fn create_assigns_sequential_ids() {
    let catalog = catalog();

    let first = catalog.create(book("Dune", "Herbert", 1965, 20, &[Genre::SciFi])).await.unwrap();
    let second = catalog.create(book("Emma", "Austen", 1990, 8, &[])).await.unwrap();

    assert_eq!(first, BookId::new(1));
    assert_eq!(second, BookId::new(2));

    let stored = catalog.get(first).await.unwrap();
    assert_eq!(stored.title, "Dune");
    assert_eq!(stored.genres, vec![Genre::SciFi]);
}

#[tokio::test]
async fn duplicate_titles_are_rejected_whatever_the_other_fields() {
    let catalog = catalog();
    catalog.create(book("Dune", "Herbert", 1965, 20, &[])).await.unwrap();

    let result = catalog.create(book("DUNE", "Someone Else", 3000, -1, &[Genre::Manga])).await;

    assert!(matches!(result, Err(CatalogError::DuplicateTitle(_))));
    assert_eq!(catalog.count(&BookCriteria::default()).await.unwrap(), 1);
}

#[tokio::test]
async fn rejected_creations_store_nothing() {
    let catalog = catalog();

    let too_old = catalog.create(book("Old", "A", 1939, 10, &[])).await;
    let free = catalog.create(book("Free", "A", 2000, 0, &[])).await;

    assert!(matches!(too_old, Err(CatalogError::YearOutOfRange(1939))));
    assert!(matches!(free, Err(CatalogError::NonPositivePrice(0))));
    assert_eq!(catalog.backend().len().await.unwrap(), 0);

    // Rejections do not consume ids
    let id = catalog.create(book("Kept", "A", 2000, 1, &[])).await.unwrap();
    assert_eq!(id, BookId::new(1));
}

#[tokio::test]
async fn update_price_returns_previous_price() {
    let catalog = catalog();
    let id = catalog.create(book("Dune", "Herbert", 1965, 20, &[])).await.unwrap();

    assert_eq!(catalog.update_price(id, 25).await.unwrap(), 20);
    assert_eq!(catalog.update_price(id, 30).await.unwrap(), 25);
    assert_eq!(catalog.get(id).await.unwrap().price, 30);
}

#[tokio::test]
async fn update_price_checks_existence_before_price() {
    let catalog = catalog();
    let id = catalog.create(book("Dune", "Herbert", 1965, 20, &[])).await.unwrap();

    let missing = catalog.update_price(BookId::new(99), -3).await;
    let negative = catalog.update_price(id, -3).await;

    assert!(matches!(missing, Err(CatalogError::NotFound(_))));
    assert!(matches!(negative, Err(CatalogError::NonPositivePrice(-3))));
    assert_eq!(catalog.get(id).await.unwrap().price, 20);
}

#[tokio::test]
async fn delete_removes_one_record_and_retires_the_id() {
    let catalog = catalog();
    let first = catalog.create(book("A", "X", 2000, 1, &[])).await.unwrap();
    catalog.create(book("B", "X", 2000, 1, &[])).await.unwrap();

    assert_eq!(catalog.delete(first).await.unwrap(), 1);
    assert!(matches!(catalog.delete(first).await, Err(CatalogError::NotFound(_))));
    assert!(matches!(catalog.get(first).await, Err(CatalogError::NotFound(_))));

    let next = catalog.create(book("C", "X", 2000, 1, &[])).await.unwrap();
    assert_eq!(next, BookId::new(3));
}

#[tokio::test]
async fn deleted_titles_can_be_reused() {
    let catalog = catalog();
    let id = catalog.create(book("Dune", "Herbert", 1965, 20, &[])).await.unwrap();
    catalog.delete(id).await.unwrap();

    assert!(catalog.create(book("dune", "Herbert", 1965, 20, &[])).await.is_ok());
}

#[tokio::test]
async fn listing_is_sorted_by_base_collation() {
    let catalog = seeded().await;

    let books = catalog.list(&BookCriteria::default()).await.unwrap();

    assert_eq!(titles(&books), vec!["akira", "Blank", "Clean Code", "Dune", "Émile"]);
}

#[tokio::test]
async fn criteria_combine_with_and() {
    let catalog = seeded().await;

    let criteria = BookCriteria {
        genres: Some(vec![Genre::SciFi]),
        price_at_least: Some(25),
        ..BookCriteria::default()
    };

    assert_eq!(titles(&catalog.list(&criteria).await.unwrap()), vec!["akira"]);
    assert_eq!(catalog.count(&criteria).await.unwrap(), 1);
}

#[tokio::test]
async fn author_filter_ignores_case() {
    let catalog = seeded().await;

    let criteria = BookCriteria {
        author: Some("frank herbert".to_string()),
        ..BookCriteria::default()
    };

    assert_eq!(titles(&catalog.list(&criteria).await.unwrap()), vec!["Dune"]);
}

#[tokio::test]
async fn bounds_are_inclusive() {
    let catalog = seeded().await;

    let criteria = BookCriteria {
        year_at_least: Some(1940),
        year_at_most: Some(1965),
        price_at_most: Some(20),
        ..BookCriteria::default()
    };

    assert_eq!(titles(&catalog.list(&criteria).await.unwrap()), vec!["Dune", "Émile"]);
}

#[tokio::test]
async fn genre_filter_matches_any_listed_genre() {
    let catalog = seeded().await;

    let criteria = BookCriteria::try_from(CriteriaParams {
        genres: Some("HISTORY,PROFESSIONAL".to_string()),
        ..CriteriaParams::default()
    })
    .unwrap();

    assert_eq!(titles(&catalog.list(&criteria).await.unwrap()), vec!["Clean Code", "Émile"]);
}

#[tokio::test]
async fn concurrent_creates_with_the_same_title_keep_one() {
    let catalog = Arc::new(catalog());

    let handles = (0..8)
        .map(|n| {
            let catalog = catalog.clone();
            tokio::spawn(async move {
                catalog.create(book("Dune", &format!("Author {n}"), 1965, 20, &[])).await
            })
        })
        .collect::<Vec<_>>();

    let mut created = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            created += 1;
        }
    }

    assert_eq!(created, 1);
    assert_eq!(catalog.count(&BookCriteria::default()).await.unwrap(), 1);
}

#[tokio::test]
async fn large_price_bounds_are_exact() {
    let catalog = catalog();
    catalog.create(book("Ledger", "Anon", 2000, 9_007_199_254_740_992, &[])).await.unwrap();

    let above = BookCriteria {
        price_at_least: Some(9_007_199_254_740_993),
        ..BookCriteria::default()
    };
    let at = BookCriteria {
        price_at_least: Some(9_007_199_254_740_992),
        ..BookCriteria::default()
    };

    assert_eq!(catalog.count(&above).await.unwrap(), 0);
    assert_eq!(catalog.count(&at).await.unwrap(), 1);
}
