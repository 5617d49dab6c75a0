//! Order store
//!
//! Order placement is all-or-nothing: stock reservation, the header
//! insert and every line item insert run on one transaction. A failure
//! at any step leaves no partial order visible to readers.

use shared::models::{Order, OrderItem, OrderItemInput, OrderStatus, PaymentInfo};
use shared::util::now_millis;
use sqlx::SqlitePool;
use std::str::FromStr;

use super::{RepoError, RepoResult, products};

const ORDER_COLUMNS: &str = "id, user_id, payment_info, items_price, tax_price, \
     shipping_price, total_price, order_status, created_at";

/// Validated order data ready for insertion
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: i64,
    pub items: Vec<OrderItemInput>,
    pub payment_info: PaymentInfo,
    pub items_price: f64,
    pub tax_price: f64,
    pub shipping_price: f64,
    pub total_price: f64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
struct OrderRow {
    id: i64,
    user_id: i64,
    payment_info: String,
    items_price: f64,
    tax_price: f64,
    shipping_price: f64,
    total_price: f64,
    order_status: String,
    created_at: i64,
}

impl OrderRow {
    fn into_order(self, order_items: Vec<OrderItem>) -> RepoResult<Order> {
        let payment_info: PaymentInfo = serde_json::from_str(&self.payment_info)
            .map_err(|e| RepoError::Database(format!("Corrupt payment_info JSON: {e}")))?;
        let order_status = OrderStatus::from_str(&self.order_status)
            .map_err(|e| RepoError::Database(e.to_string()))?;

        Ok(Order {
            id: self.id,
            user_id: self.user_id,
            payment_info,
            items_price: self.items_price,
            tax_price: self.tax_price,
            shipping_price: self.shipping_price,
            total_price: self.total_price,
            order_status,
            created_at: self.created_at,
            order_items,
        })
    }
}

async fn items_for_order(pool: &SqlitePool, order_id: i64) -> RepoResult<Vec<OrderItem>> {
    let items = sqlx::query_as::<_, OrderItem>(
        "SELECT id, order_id, product_id, quantity, price FROM order_items WHERE order_id = ?",
    )
    .bind(order_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Create an order: reserve stock for every line item, insert the header,
/// insert the items, all on one transaction rolled back at any failure.
pub async fn create(pool: &SqlitePool, data: &NewOrder) -> RepoResult<Order> {
    let now = now_millis();
    let payment_json = serde_json::to_string(&data.payment_info)
        .map_err(|e| RepoError::Database(format!("Failed to encode payment_info: {e}")))?;

    let mut tx = pool.begin().await?;

    for item in &data.items {
        products::reserve_stock(&mut tx, item.product_id, item.quantity).await?;
    }

    let (order_id,): (i64,) = sqlx::query_as(
        r#"
        INSERT INTO orders (
            user_id, payment_info, items_price, tax_price,
            shipping_price, total_price, order_status, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(data.user_id)
    .bind(&payment_json)
    .bind(data.items_price)
    .bind(data.tax_price)
    .bind(data.shipping_price)
    .bind(data.total_price)
    .bind(OrderStatus::Processing.as_str())
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    let mut order_items = Vec::with_capacity(data.items.len());
    for item in &data.items {
        let (item_id,): (i64,) = sqlx::query_as(
            "INSERT INTO order_items (order_id, product_id, quantity, price) VALUES (?, ?, ?, ?) RETURNING id",
        )
        .bind(order_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.price)
        .fetch_one(&mut *tx)
        .await?;

        order_items.push(OrderItem {
            id: item_id,
            order_id,
            product_id: item.product_id,
            quantity: item.quantity,
            price: item.price,
        });
    }

    tx.commit().await?;

    Ok(Order {
        id: order_id,
        user_id: data.user_id,
        payment_info: data.payment_info.clone(),
        items_price: data.items_price,
        tax_price: data.tax_price,
        shipping_price: data.shipping_price,
        total_price: data.total_price,
        order_status: OrderStatus::Processing,
        created_at: now,
        order_items,
    })
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Order>> {
    let row = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let items = items_for_order(pool, row.id).await?;
    Ok(Some(row.into_order(items)?))
}

pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Order>> {
    let rows = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = ? ORDER BY created_at DESC, id DESC"
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    let mut orders = Vec::with_capacity(rows.len());
    for row in rows {
        let items = items_for_order(pool, row.id).await?;
        orders.push(row.into_order(items)?);
    }
    Ok(orders)
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Order>> {
    let rows = sqlx::query_as::<_, OrderRow>(&format!(
        "SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC, id DESC"
    ))
    .fetch_all(pool)
    .await?;

    let mut orders = Vec::with_capacity(rows.len());
    for row in rows {
        let items = items_for_order(pool, row.id).await?;
        orders.push(row.into_order(items)?);
    }
    Ok(orders)
}

/// Administrative listing: every order with the owner's phone attached
pub async fn find_all_with_user(pool: &SqlitePool) -> RepoResult<Vec<(Order, String)>> {
    #[derive(sqlx::FromRow)]
    struct RowWithPhone {
        #[sqlx(flatten)]
        order: OrderRow,
        user_phone: String,
    }

    let rows = sqlx::query_as::<_, RowWithPhone>(&format!(
        r#"
        SELECT {columns}, u.phone AS user_phone
        FROM orders o
        JOIN users u ON o.user_id = u.id
        ORDER BY o.created_at DESC, o.id DESC
        "#,
        columns = "o.id, o.user_id, o.payment_info, o.items_price, o.tax_price, \
                   o.shipping_price, o.total_price, o.order_status, o.created_at"
    ))
    .fetch_all(pool)
    .await?;

    let mut orders = Vec::with_capacity(rows.len());
    for row in rows {
        let items = items_for_order(pool, row.order.id).await?;
        orders.push((row.order.into_order(items)?, row.user_phone));
    }
    Ok(orders)
}

/// Set the status field. Only the closed [`OrderStatus`] enum gets in;
/// raw strings are parsed and rejected at the API boundary.
pub async fn update_status(pool: &SqlitePool, id: i64, status: OrderStatus) -> RepoResult<()> {
    let rows = sqlx::query("UPDATE orders SET order_status = ? WHERE id = ?")
        .bind(status.as_str())
        .bind(id)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    Ok(())
}

/// Remove line items then the header, atomically
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM order_items WHERE order_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let rows = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }

    tx.commit().await?;
    Ok(())
}

/// Order count and gross revenue for the admin dashboard
pub async fn stats(pool: &SqlitePool) -> RepoResult<(i64, f64)> {
    let row: (i64, f64) =
        sqlx::query_as("SELECT COUNT(*), COALESCE(SUM(total_price), 0) FROM orders")
            .fetch_one(pool)
            .await?;
    Ok(row)
}
