use log::{debug, trace};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::{
    db::traits::{OrderQueryFilter, StorageError},
    db_types::{NewOrder, Order, OrderDetails, OrderDetailsRow, OrderId, OrderStatusType},
};

const ORDER_DETAILS_QUERY: &str = r#"
    SELECT
        o.id, o.amount, o.status, o.created_at, o.updated_at,
        g.id AS gig_id, g.title AS gig_title, g.price AS gig_price, g.category AS gig_category,
        g.status AS gig_status, g.images AS gig_images,
        c.id AS client_id, c.name AS client_name, c.email AS client_email,
        f.id AS freelancer_id, f.name AS freelancer_name, f.email AS freelancer_email
    FROM orders o
        JOIN gigs g ON g.id = o.gig_id
        JOIN users c ON c.id = o.client_id
        JOIN users f ON f.id = o.freelancer_id
"#;

/// Inserts a new order into the database using the given connection. This is not atomic. You can embed this call
/// inside a transaction if you need to ensure atomicity, and pass `&mut *tx` as the connection argument.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, StorageError> {
    let id = sqlx::query("INSERT INTO orders (gig_id, client_id, freelancer_id, amount) VALUES (?, ?, ?, ?)")
        .bind(order.gig_id)
        .bind(order.client_id)
        .bind(order.freelancer_id)
        .bind(order.amount)
        .execute(&mut *conn)
        .await?
        .last_insert_rowid();
    debug!("🗃️ Order #{id} for gig {} saved. Amount: {}", order.gig_id, order.amount);
    fetch_order(OrderId(id), conn)
        .await?
        .ok_or_else(|| StorageError::QueryError(format!("Order #{id} vanished straight after it was inserted")))
}

pub async fn fetch_order(id: OrderId, conn: &mut SqliteConnection) -> Result<Option<Order>, StorageError> {
    let order = sqlx::query_as(
        r#"
            SELECT id, gig_id, client_id, freelancer_id, amount, status, created_at, updated_at
            FROM orders WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;
    Ok(order)
}

pub async fn fetch_order_details(id: OrderId, conn: &mut SqliteConnection) -> Result<Option<OrderDetails>, StorageError> {
    let mut builder = QueryBuilder::<Sqlite>::new(ORDER_DETAILS_QUERY);
    builder.push(" WHERE o.id = ").push_bind(id);
    let row: Option<OrderDetailsRow> = builder.build_query_as().fetch_optional(conn).await?;
    Ok(row.map(OrderDetails::from))
}

/// Fetches orders according to criteria specified in the `OrderQueryFilter`
///
/// Resulting orders are ordered newest first.
pub async fn search_orders(
    query: OrderQueryFilter,
    conn: &mut SqliteConnection,
) -> Result<Vec<OrderDetails>, StorageError> {
    let mut builder = QueryBuilder::<Sqlite>::new(ORDER_DETAILS_QUERY);
    if !query.is_empty() {
        builder.push(" WHERE ");
    }
    let mut where_clause = builder.separated(" AND ");
    if let Some(user) = query.participant {
        where_clause.push("(o.client_id = ");
        where_clause.push_bind_unseparated(user);
        where_clause.push_unseparated(" OR o.freelancer_id = ");
        where_clause.push_bind_unseparated(user);
        where_clause.push_unseparated(")");
    }
    if let Some(user) = query.freelancer_id {
        where_clause.push("o.freelancer_id = ");
        where_clause.push_bind_unseparated(user);
    }
    builder.push(" ORDER BY o.created_at DESC, o.id DESC");

    trace!("🗃️ Executing query: {}", builder.sql());
    let rows: Vec<OrderDetailsRow> = builder.build_query_as().fetch_all(conn).await?;
    trace!("🗃️ Result of search_orders: {}", rows.len());
    Ok(rows.into_iter().map(OrderDetails::from).collect())
}

/// Sets the status of the order to `status`, but only if it is currently `expected`. Returns `false` if no row
/// matched, i.e. the order does not exist or its status has changed since it was last read.
pub(crate) async fn compare_and_set_status(
    id: OrderId,
    expected: OrderStatusType,
    status: OrderStatusType,
    conn: &mut SqliteConnection,
) -> Result<bool, StorageError> {
    let result =
        sqlx::query("UPDATE orders SET status = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ? AND status = ?")
            .bind(status)
            .bind(id)
            .bind(expected)
            .execute(conn)
            .await?;
    let updated = result.rows_affected() > 0;
    if updated {
        debug!("🗃️ Order {id} moved from {expected} to {status}");
    } else {
        debug!("🗃️ Order {id} was not in status {expected}. Status update to {status} skipped.");
    }
    Ok(updated)
}
