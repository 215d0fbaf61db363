//! Summary figures shown on the landing page.

use serde::Serialize;

use crate::backend::{BackendError, BackendResult, Transport};
use crate::resource::{Clients, Products, Resource, Sales};
use crate::services::resource::{EntityService, ListParams};

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DashboardKpis {
    pub products: usize,
    pub out_of_stock: usize,
    pub clients: usize,
    pub sales: usize,
    pub revenue: f64,
    /// Set when at least one figure could not be loaded and shows zero.
    pub degraded: bool,
}

/// Unwraps one widget's data, substituting the default on failure.
///
/// Unauthorized is never swallowed.
fn or_fallback<V: Default>(
    widget: &str,
    result: BackendResult<V>,
    degraded: &mut bool,
) -> BackendResult<V> {
    match result {
        Ok(value) => Ok(value),
        Err(err) if err.is_unauthorized() => Err(err),
        Err(err) => {
            log::warn!("Dashboard widget '{widget}' unavailable, showing zero: {err}");
            *degraded = true;
            Ok(V::default())
        }
    }
}

/// Loads the KPI cards. Widgets load concurrently and fail independently.
pub async fn load_dashboard<T>(transport: &T) -> BackendResult<DashboardKpis>
where
    T: Transport + ?Sized,
{
    let products = EntityService::<Products, _>::new(transport);
    let clients = EntityService::<Clients, _>::new(transport);
    let sales = EntityService::<Sales, _>::new(transport);

    let (product_list, client_list, sale_list) = futures::join!(
        products.list(ListParams::default()),
        clients.list(ListParams::default()),
        sales.list(ListParams::default()),
    );

    let mut degraded = false;
    let product_list = or_fallback(Products::LABEL, product_list, &mut degraded)?;
    let client_list = or_fallback(Clients::LABEL, client_list, &mut degraded)?;
    let sale_list = or_fallback(Sales::LABEL, sale_list, &mut degraded)?;

    Ok(DashboardKpis {
        products: product_list.len(),
        out_of_stock: product_list.iter().filter(|p| !p.in_stock()).count(),
        clients: client_list.len(),
        sales: sale_list.len(),
        revenue: sale_list.iter().map(|s| s.total).sum(),
        degraded,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::backend::mock::MockTransport;

    #[actix_web::test]
    async fn failed_widgets_fall_back_to_zero() {
        let mut transport = MockTransport::new();
        transport.expect_send().times(3).returning(|req| match req.path.as_str() {
            "/products" => Ok(json!({"data": [
                {"id": 1, "description": "Whisky", "price": 10.0, "stock": 10},
                {"id": 2, "description": "Gorro", "price": 2.0, "stock": 0}
            ]})),
            "/sales" => Ok(json!([
                {"id": 1, "date": "2024-05-01T10:00:00Z", "details": [], "total": 12.5}
            ])),
            _ => Err(BackendError::from_response(500, "boom")),
        });

        let kpis = load_dashboard(&transport).await.unwrap();
        assert_eq!(kpis.products, 2);
        assert_eq!(kpis.out_of_stock, 1);
        assert_eq!(kpis.clients, 0);
        assert_eq!(kpis.sales, 1);
        assert_eq!(kpis.revenue, 12.5);
        assert!(kpis.degraded);
    }

    #[actix_web::test]
    async fn unauthorized_is_not_masked() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(3)
            .returning(|_| Err(BackendError::from_response(401, "")));

        let result = load_dashboard(&transport).await;
        assert!(matches!(result, Err(BackendError::Unauthorized(_))));
    }
}
