//! Keyset predicate and ordering shared by every paginated SQL scan.

use sea_query::{Cond, Expr, IntoColumnRef, Order, SelectStatement};

use crate::pagination::Cursor;

/// Restrict `stmt` to rows strictly after `after` in
/// `(created_at DESC, id ASC)` order and cap it at `fetch_limit` rows.
///
/// The `id > cursor.id` comparison and the `id ASC` ordering must agree;
/// both are set here and nowhere else.
pub(crate) fn apply<C>(
    stmt: &mut SelectStatement,
    created_at: C,
    id: C,
    after: Option<&Cursor>,
    fetch_limit: usize,
) where
    C: IntoColumnRef + Copy,
{
    if let Some(cursor) = after {
        let ts = cursor.created_at_micros();
        stmt.cond_where(
            Cond::any().add(Expr::col(created_at).lt(ts)).add(
                Cond::all()
                    .add(Expr::col(created_at).eq(ts))
                    .add(Expr::col(id).gt(cursor.id.to_string())),
            ),
        );
    }
    stmt.order_by(created_at, Order::Desc)
        .order_by(id, Order::Asc)
        .limit(fetch_limit as u64);
}
