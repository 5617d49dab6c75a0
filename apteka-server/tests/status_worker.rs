//! Status worker behavior: due jobs advance orders one step; stale jobs
//! for deleted or terminal orders drain harmlessly

mod common;

use apteka_server::db::orders::{self, NewOrder};
use apteka_server::db::status_jobs;
use apteka_server::workers::StatusWorker;
use common::{insert_product, insert_user, test_pool};
use shared::models::{OrderItemInput, OrderStatus, PaymentInfo};
use shared::util::now_millis;

async fn place_order(pool: &sqlx::SqlitePool) -> i64 {
    let user_id = insert_user(pool, "+79991112233", "hash", false).await;
    let product_id = insert_product(pool, "Aspirin", 100.0, 10).await;
    let order = orders::create(
        pool,
        &NewOrder {
            user_id,
            items: vec![OrderItemInput {
                product_id,
                quantity: 1,
                price: 100.0,
            }],
            payment_info: PaymentInfo::pending("card"),
            items_price: 100.0,
            tax_price: 0.0,
            shipping_price: 0.0,
            total_price: 100.0,
        },
    )
    .await
    .unwrap();
    order.id
}

#[tokio::test]
async fn due_job_advances_processing_to_shipped() {
    let pool = test_pool().await;
    let order_id = place_order(&pool).await;

    status_jobs::schedule(&pool, order_id, now_millis() - 1000)
        .await
        .unwrap();

    StatusWorker::new(pool.clone()).process_due_jobs().await;

    let order = orders::find_by_id(&pool, order_id).await.unwrap().unwrap();
    assert_eq!(order.order_status, OrderStatus::Shipped);
    assert_eq!(status_jobs::pending_count(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn due_job_advances_shipped_to_delivered() {
    let pool = test_pool().await;
    let order_id = place_order(&pool).await;
    orders::update_status(&pool, order_id, OrderStatus::Shipped)
        .await
        .unwrap();

    status_jobs::schedule(&pool, order_id, now_millis() - 1000)
        .await
        .unwrap();

    StatusWorker::new(pool.clone()).process_due_jobs().await;

    let order = orders::find_by_id(&pool, order_id).await.unwrap().unwrap();
    assert_eq!(order.order_status, OrderStatus::Delivered);
}

#[tokio::test]
async fn job_fires_once_only() {
    let pool = test_pool().await;
    let order_id = place_order(&pool).await;

    status_jobs::schedule(&pool, order_id, now_millis() - 1000)
        .await
        .unwrap();

    let worker = StatusWorker::new(pool.clone());
    worker.process_due_jobs().await;
    // A second poll finds no job; the order stays at Shipped
    worker.process_due_jobs().await;

    let order = orders::find_by_id(&pool, order_id).await.unwrap().unwrap();
    assert_eq!(order.order_status, OrderStatus::Shipped);
}

#[tokio::test]
async fn undue_job_is_left_pending() {
    let pool = test_pool().await;
    let order_id = place_order(&pool).await;

    status_jobs::schedule(&pool, order_id, now_millis() + 60_000)
        .await
        .unwrap();

    StatusWorker::new(pool.clone()).process_due_jobs().await;

    let order = orders::find_by_id(&pool, order_id).await.unwrap().unwrap();
    assert_eq!(order.order_status, OrderStatus::Processing);
    assert_eq!(status_jobs::pending_count(&pool).await.unwrap(), 1);
}

#[tokio::test]
async fn job_for_deleted_order_drains_harmlessly() {
    let pool = test_pool().await;
    let order_id = place_order(&pool).await;

    status_jobs::schedule(&pool, order_id, now_millis() - 1000)
        .await
        .unwrap();
    orders::delete(&pool, order_id).await.unwrap();

    // Logged, not surfaced; the stale job is drained
    StatusWorker::new(pool.clone()).process_due_jobs().await;
    assert_eq!(status_jobs::pending_count(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn terminal_order_is_not_advanced() {
    let pool = test_pool().await;
    let order_id = place_order(&pool).await;
    orders::update_status(&pool, order_id, OrderStatus::Cancelled)
        .await
        .unwrap();

    status_jobs::schedule(&pool, order_id, now_millis() - 1000)
        .await
        .unwrap();

    StatusWorker::new(pool.clone()).process_due_jobs().await;

    let order = orders::find_by_id(&pool, order_id).await.unwrap().unwrap();
    assert_eq!(order.order_status, OrderStatus::Cancelled);
    assert_eq!(status_jobs::pending_count(&pool).await.unwrap(), 0);
}

#[tokio::test]
async fn manual_update_before_due_changes_the_advance_base() {
    let pool = test_pool().await;
    let order_id = place_order(&pool).await;

    status_jobs::schedule(&pool, order_id, now_millis() - 1000)
        .await
        .unwrap();

    // Admin ships the order before the job fires; the one-shot advance
    // then moves it a single step further
    orders::update_status(&pool, order_id, OrderStatus::Shipped)
        .await
        .unwrap();

    StatusWorker::new(pool.clone()).process_due_jobs().await;

    let order = orders::find_by_id(&pool, order_id).await.unwrap().unwrap();
    assert_eq!(order.order_status, OrderStatus::Delivered);
}
