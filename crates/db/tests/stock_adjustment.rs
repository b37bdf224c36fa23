//! Integration tests for the atomic stock adjustment:
//! - Boundary behaviour (adjust to exactly zero, one past zero)
//! - Rejected adjustments leave the row untouched
//! - Sequences of mixed deltas
//! - No lost updates under concurrent increments

use rust_decimal::Decimal;
use sqlx::PgPool;
use stockpile_core::error::CoreError;
use stockpile_db::models::product::{CreateProduct, StockAdjustment};
use stockpile_db::repositories::ProductRepo;

async fn seed_product(pool: &PgPool, quantity: i64) -> i64 {
    ProductRepo::create(
        pool,
        &CreateProduct {
            name: "Hex bolt".to_string(),
            description: None,
            category_id: None,
            quantity,
            price: Decimal::new(35, 2),
            supplier_info: None,
        },
    )
    .await
    .expect("create product")
    .id
}

#[sqlx::test(migrations = "./migrations")]
async fn adjust_down_to_exactly_zero_succeeds(pool: PgPool) {
    let id = seed_product(&pool, 7).await;

    let outcome = ProductRepo::adjust_stock(&pool, id, -7).await.unwrap();
    let StockAdjustment::Adjusted(product) = outcome else {
        panic!("expected adjustment to commit, got {outcome:?}");
    };
    assert_eq!(product.quantity, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn adjust_below_zero_is_rejected_and_leaves_row_unchanged(pool: PgPool) {
    let id = seed_product(&pool, 7).await;
    let before = ProductRepo::find_by_id(&pool, id).await.unwrap().unwrap();

    let outcome = ProductRepo::adjust_stock(&pool, id, -8).await.unwrap();
    let StockAdjustment::Rejected(err) = outcome else {
        panic!("expected rejection, got {outcome:?}");
    };
    assert!(matches!(
        err,
        CoreError::InsufficientStock {
            available: 7,
            requested: -8
        }
    ));

    // Nothing was written, not even the last_updated stamp.
    let after = ProductRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(after.quantity, 7);
    assert_eq!(after.last_updated, before.last_updated);
}

#[sqlx::test(migrations = "./migrations")]
async fn adjusting_missing_product_reports_not_found(pool: PgPool) {
    let outcome = ProductRepo::adjust_stock(&pool, 999_999, 1).await.unwrap();
    assert!(matches!(outcome, StockAdjustment::NotFound));
}

#[sqlx::test(migrations = "./migrations")]
async fn successful_adjustment_restamps_last_updated(pool: PgPool) {
    let id = seed_product(&pool, 3).await;
    let before = ProductRepo::find_by_id(&pool, id).await.unwrap().unwrap();

    let outcome = ProductRepo::adjust_stock(&pool, id, 2).await.unwrap();
    let StockAdjustment::Adjusted(product) = outcome else {
        panic!("expected adjustment to commit, got {outcome:?}");
    };
    assert_eq!(product.quantity, 5);
    assert!(product.last_updated >= before.last_updated);
    assert_eq!(product.date_added, before.date_added);
}

#[sqlx::test(migrations = "./migrations")]
async fn final_quantity_is_sum_of_accepted_deltas(pool: PgPool) {
    let id = seed_product(&pool, 10).await;

    // (delta, accepted)
    let script: &[(i64, bool)] = &[
        (5, true),    // 15
        (-12, true),  // 3
        (-4, false),  // rejected, still 3
        (1, true),    // 4
        (-4, true),   // 0
        (-1, false),  // rejected, still 0
        (2, true),    // 2
    ];

    for &(delta, accepted) in script {
        let outcome = ProductRepo::adjust_stock(&pool, id, delta).await.unwrap();
        match outcome {
            StockAdjustment::Adjusted(_) => assert!(accepted, "delta {delta} should be rejected"),
            StockAdjustment::Rejected(_) => assert!(!accepted, "delta {delta} should commit"),
            StockAdjustment::NotFound => panic!("product vanished"),
        }
    }

    let product = ProductRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(product.quantity, 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn concurrent_increments_are_not_lost(pool: PgPool) {
    const N: usize = 20;
    let id = seed_product(&pool, 0).await;

    let mut handles = Vec::with_capacity(N);
    for _ in 0..N {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            ProductRepo::adjust_stock(&pool, id, 1).await
        }));
    }

    for handle in handles {
        let outcome = handle.await.expect("task panicked").unwrap();
        assert!(matches!(outcome, StockAdjustment::Adjusted(_)));
    }

    let product = ProductRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(product.quantity, N as i64);
}

#[sqlx::test(migrations = "./migrations")]
async fn concurrent_decrements_never_drive_quantity_negative(pool: PgPool) {
    const N: usize = 10;
    // Only 4 units available for 10 concurrent single-unit takes.
    let id = seed_product(&pool, 4).await;

    let mut handles = Vec::with_capacity(N);
    for _ in 0..N {
        let pool = pool.clone();
        handles.push(tokio::spawn(async move {
            ProductRepo::adjust_stock(&pool, id, -1).await
        }));
    }

    let mut accepted = 0;
    for handle in handles {
        match handle.await.expect("task panicked").unwrap() {
            StockAdjustment::Adjusted(p) => {
                accepted += 1;
                assert!(p.quantity >= 0);
            }
            StockAdjustment::Rejected(CoreError::InsufficientStock { .. }) => {}
            other => panic!("unexpected outcome {other:?}"),
        }
    }

    assert_eq!(accepted, 4);
    let product = ProductRepo::find_by_id(&pool, id).await.unwrap().unwrap();
    assert_eq!(product.quantity, 0);
}
