//! Order store invariants: transactional placement, stock reservation,
//! lookup, status updates and cascading deletes

mod common;

use apteka_server::db::orders::{self, NewOrder};
use apteka_server::db::{RepoError, products};
use common::{insert_product, insert_user, product_stock, table_count, test_pool};
use shared::models::{OrderItemInput, OrderStatus, PaymentInfo};

fn new_order(user_id: i64, items: Vec<OrderItemInput>) -> NewOrder {
    let items_price: f64 = items.iter().map(|i| i.quantity as f64 * i.price).sum();
    NewOrder {
        user_id,
        items,
        payment_info: PaymentInfo::pending("card"),
        items_price,
        tax_price: 0.0,
        shipping_price: 0.0,
        total_price: items_price,
    }
}

#[tokio::test]
async fn create_order_decrements_stock_and_persists_items() {
    let pool = test_pool().await;
    let user_id = insert_user(&pool, "+79990000001", "hash", false).await;
    let product_id = insert_product(&pool, "Aspirin", 100.0, 5).await;

    let order = orders::create(
        &pool,
        &new_order(
            user_id,
            vec![OrderItemInput {
                product_id,
                quantity: 2,
                price: 100.0,
            }],
        ),
    )
    .await
    .unwrap();

    assert!(order.id > 0);
    assert_eq!(order.order_status, OrderStatus::Processing);
    assert_eq!(order.order_items.len(), 1);
    assert_eq!(order.order_items[0].order_id, order.id);
    assert_eq!(order.order_items[0].quantity, 2);
    assert_eq!(order.total_price, 200.0);

    // Stock 5 minus ordered quantity 2
    assert_eq!(product_stock(&pool, product_id).await, 3);

    let fetched = orders::find_by_id(&pool, order.id).await.unwrap().unwrap();
    assert_eq!(fetched.order_items.len(), 1);
    assert_eq!(fetched.payment_info.method, "card");
    assert_eq!(fetched.payment_info.status, "pending");
    assert_eq!(fetched.order_status, OrderStatus::Processing);
}

#[tokio::test]
async fn create_order_multiple_items_decrements_each_product() {
    let pool = test_pool().await;
    let user_id = insert_user(&pool, "+79990000002", "hash", false).await;
    let first = insert_product(&pool, "Aspirin", 100.0, 10).await;
    let second = insert_product(&pool, "Paracetamol", 50.0, 7).await;

    let order = orders::create(
        &pool,
        &new_order(
            user_id,
            vec![
                OrderItemInput {
                    product_id: first,
                    quantity: 3,
                    price: 100.0,
                },
                OrderItemInput {
                    product_id: second,
                    quantity: 4,
                    price: 50.0,
                },
            ],
        ),
    )
    .await
    .unwrap();

    assert_eq!(order.order_items.len(), 2);
    assert_eq!(product_stock(&pool, first).await, 7);
    assert_eq!(product_stock(&pool, second).await, 3);
}

#[tokio::test]
async fn insufficient_stock_rolls_back_everything() {
    let pool = test_pool().await;
    let user_id = insert_user(&pool, "+79990000003", "hash", false).await;
    let plenty = insert_product(&pool, "Aspirin", 100.0, 10).await;
    let scarce = insert_product(&pool, "Paracetamol", 50.0, 1).await;

    let err = orders::create(
        &pool,
        &new_order(
            user_id,
            vec![
                OrderItemInput {
                    product_id: plenty,
                    quantity: 2,
                    price: 100.0,
                },
                OrderItemInput {
                    product_id: scarce,
                    quantity: 2,
                    price: 50.0,
                },
            ],
        ),
    )
    .await
    .unwrap_err();

    assert!(matches!(
        err,
        RepoError::InsufficientStock {
            requested: 2,
            available: 1,
            ..
        }
    ));

    // Full rollback: the first item's decrement is undone, nothing persisted
    assert_eq!(product_stock(&pool, plenty).await, 10);
    assert_eq!(product_stock(&pool, scarce).await, 1);
    assert_eq!(table_count(&pool, "orders").await, 0);
    assert_eq!(table_count(&pool, "order_items").await, 0);
}

#[tokio::test]
async fn missing_product_aborts_placement() {
    let pool = test_pool().await;
    let user_id = insert_user(&pool, "+79990000004", "hash", false).await;

    let err = orders::create(
        &pool,
        &new_order(
            user_id,
            vec![OrderItemInput {
                product_id: 12345,
                quantity: 1,
                price: 10.0,
            }],
        ),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, RepoError::NotFound(_)));
    assert_eq!(table_count(&pool, "orders").await, 0);
}

#[tokio::test]
async fn reserve_stock_returns_new_value() {
    let pool = test_pool().await;
    let product_id = insert_product(&pool, "Aspirin", 100.0, 5).await;

    let mut tx = pool.begin().await.unwrap();
    let remaining = products::reserve_stock(&mut tx, product_id, 2).await.unwrap();
    tx.commit().await.unwrap();

    assert_eq!(remaining, 3);
    assert_eq!(product_stock(&pool, product_id).await, 3);
}

#[tokio::test]
async fn find_by_id_missing_returns_none() {
    let pool = test_pool().await;
    assert!(orders::find_by_id(&pool, 999).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_removes_header_and_items() {
    let pool = test_pool().await;
    let user_id = insert_user(&pool, "+79990000005", "hash", false).await;
    let product_id = insert_product(&pool, "Aspirin", 100.0, 5).await;

    let order = orders::create(
        &pool,
        &new_order(
            user_id,
            vec![OrderItemInput {
                product_id,
                quantity: 1,
                price: 100.0,
            }],
        ),
    )
    .await
    .unwrap();

    orders::delete(&pool, order.id).await.unwrap();

    assert!(orders::find_by_id(&pool, order.id).await.unwrap().is_none());
    // No orphaned line items
    assert_eq!(table_count(&pool, "order_items").await, 0);
}

#[tokio::test]
async fn delete_missing_order_is_not_found() {
    let pool = test_pool().await;
    let err = orders::delete(&pool, 999).await.unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[tokio::test]
async fn update_status_leaves_other_orders_untouched() {
    let pool = test_pool().await;
    let user_id = insert_user(&pool, "+79990000006", "hash", false).await;
    let product_id = insert_product(&pool, "Aspirin", 100.0, 10).await;

    let items = |qty| {
        vec![OrderItemInput {
            product_id,
            quantity: qty,
            price: 100.0,
        }]
    };
    let first = orders::create(&pool, &new_order(user_id, items(1))).await.unwrap();
    let second = orders::create(&pool, &new_order(user_id, items(1))).await.unwrap();

    orders::update_status(&pool, first.id, OrderStatus::Shipped)
        .await
        .unwrap();

    let first = orders::find_by_id(&pool, first.id).await.unwrap().unwrap();
    let second = orders::find_by_id(&pool, second.id).await.unwrap().unwrap();
    assert_eq!(first.order_status, OrderStatus::Shipped);
    assert_eq!(second.order_status, OrderStatus::Processing);
}

#[tokio::test]
async fn update_status_missing_order_is_not_found() {
    let pool = test_pool().await;
    let err = orders::update_status(&pool, 999, OrderStatus::Shipped)
        .await
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound(_)));
}

#[tokio::test]
async fn find_by_user_returns_own_orders_newest_first() {
    let pool = test_pool().await;
    let alice = insert_user(&pool, "+79990000007", "hash", false).await;
    let bob = insert_user(&pool, "+79990000008", "hash", false).await;
    let product_id = insert_product(&pool, "Aspirin", 100.0, 10).await;

    let items = || {
        vec![OrderItemInput {
            product_id,
            quantity: 1,
            price: 100.0,
        }]
    };
    let older = orders::create(&pool, &new_order(alice, items())).await.unwrap();
    let newer = orders::create(&pool, &new_order(alice, items())).await.unwrap();
    orders::create(&pool, &new_order(bob, items())).await.unwrap();

    let mine = orders::find_by_user(&pool, alice).await.unwrap();
    assert_eq!(mine.len(), 2);
    assert_eq!(mine[0].id, newer.id);
    assert_eq!(mine[1].id, older.id);
    assert!(mine.iter().all(|o| o.user_id == alice));
    assert!(mine.iter().all(|o| o.order_items.len() == 1));

    // Administrative listing spans all users, newest first
    let all = orders::find_all(&pool).await.unwrap();
    assert_eq!(all.len(), 3);
    assert!(all.windows(2).all(|w| w[0].id > w[1].id));
}

#[tokio::test]
async fn find_all_with_user_attaches_phone() {
    let pool = test_pool().await;
    let user_id = insert_user(&pool, "+79990000009", "hash", false).await;
    let product_id = insert_product(&pool, "Aspirin", 100.0, 10).await;

    orders::create(
        &pool,
        &new_order(
            user_id,
            vec![OrderItemInput {
                product_id,
                quantity: 1,
                price: 100.0,
            }],
        ),
    )
    .await
    .unwrap();

    let all = orders::find_all_with_user(&pool).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].1, "+79990000009");
    assert_eq!(all[0].0.order_items.len(), 1);
}

#[tokio::test]
async fn stats_sum_revenue() {
    let pool = test_pool().await;
    let user_id = insert_user(&pool, "+79990000010", "hash", false).await;
    let product_id = insert_product(&pool, "Aspirin", 100.0, 10).await;

    let items = |qty| {
        vec![OrderItemInput {
            product_id,
            quantity: qty,
            price: 100.0,
        }]
    };
    orders::create(&pool, &new_order(user_id, items(1))).await.unwrap();
    orders::create(&pool, &new_order(user_id, items(2))).await.unwrap();

    let (count, revenue) = orders::stats(&pool).await.unwrap();
    assert_eq!(count, 2);
    assert_eq!(revenue, 300.0);
}
