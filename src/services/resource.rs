//! Per-resource REST wrapper.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::backend::{ApiRequest, BackendError, BackendResult, Method, Transport};
use crate::domain::product::{Product, ProductPatch};
use crate::domain::types::{ProductId, ZoneId};
use crate::domain::zone::{Zone, ZonePatch};
use crate::dto::api::{ApiResponse, Confirmation, unwrap_envelope};
use crate::resource::{Patchable, Products, Resource, Zones};

/// Extra query parameters forwarded on list calls.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListParams {
    pairs: Vec<(String, String)>,
}

impl ListParams {
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.pairs.push((key.into(), value.into()));
        self
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.pairs
    }
}

/// CRUD calls for resource `R` over transport `T`.
///
/// Every method issues exactly one request. Responses may be wrapped in the
/// `{ data, message? }` envelope or bare; errors carry the backend payload.
pub struct EntityService<R, T> {
    transport: T,
    _resource: PhantomData<fn() -> R>,
}

fn decode<U: DeserializeOwned>(body: Value) -> BackendResult<ApiResponse<U>> {
    unwrap_envelope(body).map_err(|err| BackendError::Decode(err.to_string()))
}

impl<R, T> EntityService<R, T>
where
    R: Resource,
    T: Transport,
{
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            _resource: PhantomData,
        }
    }

    fn collection_path() -> String {
        format!("/{}", R::PATH)
    }

    fn item_path(id: &R::Id) -> String {
        format!("/{}/{}", R::PATH, urlencoding::encode(&id.to_string()))
    }

    async fn send_item(&self, request: ApiRequest) -> BackendResult<R::Item> {
        let body = self.transport.send(request).await?;
        decode::<R::Item>(body).map(|response| response.data)
    }

    pub async fn list(&self, params: ListParams) -> BackendResult<Vec<R::Item>> {
        let request = ApiRequest::get(Self::collection_path()).with_query(params.into_pairs());
        let body = self.transport.send(request).await?;
        decode::<Vec<R::Item>>(body).map(|response| response.data)
    }

    pub async fn get_one(&self, id: &R::Id) -> BackendResult<R::Item> {
        self.send_item(ApiRequest::get(Self::item_path(id))).await
    }

    pub async fn create(&self, payload: &R::Create) -> BackendResult<R::Item> {
        let request = ApiRequest::new(Method::Post, Self::collection_path()).with_json(payload)?;
        self.send_item(request).await
    }

    /// Replaces the record (`PUT`).
    pub async fn update(&self, id: &R::Id, payload: &R::Update) -> BackendResult<R::Item> {
        let request = ApiRequest::new(Method::Put, Self::item_path(id)).with_json(payload)?;
        self.send_item(request).await
    }

    pub async fn delete(&self, id: &R::Id) -> BackendResult<Confirmation> {
        let body = self
            .transport
            .send(ApiRequest::delete(Self::item_path(id)))
            .await?;
        Ok(Confirmation::from_body(&body))
    }
}

impl<R, T> EntityService<R, T>
where
    R: Patchable,
    T: Transport,
{
    /// Partially updates the record (`PATCH`).
    pub async fn patch(&self, id: &R::Id, payload: &R::Patch) -> BackendResult<R::Item> {
        let request = ApiRequest::new(Method::Patch, Self::item_path(id)).with_json(payload)?;
        self.send_item(request).await
    }
}

impl<T: Transport> EntityService<Products, T> {
    /// Sets the stock count without replacing the rest of the product.
    pub async fn adjust_stock(
        &self,
        id: &ProductId,
        patch: &ProductPatch,
    ) -> BackendResult<Product> {
        self.patch(id, patch).await
    }
}

impl<T: Transport> EntityService<Zones, T> {
    /// Flags the zone as headquarters; the backend clears the previous one.
    pub async fn promote_headquarters(&self, id: &ZoneId) -> BackendResult<Zone> {
        self.patch(id, &ZonePatch::promote()).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::backend::mock::MockTransport;
    use crate::domain::product::NewProduct;
    use crate::domain::types::Dni;
    use crate::resource::Clients;

    #[actix_web::test]
    async fn list_accepts_envelope_and_bare_arrays() {
        let mut transport = MockTransport::new();
        let mut calls = 0;
        transport
            .expect_send()
            .withf(|req| req.method == Method::Get && req.path == "/products")
            .times(2)
            .returning(move |_| {
                calls += 1;
                let row = json!({"id": 1, "description": "Whisky", "price": 10.0, "stock": 3});
                if calls == 1 {
                    Ok(json!({"data": [row], "message": "ok"}))
                } else {
                    Ok(json!([row]))
                }
            });

        let service = EntityService::<Products, _>::new(transport);
        assert_eq!(service.list(ListParams::default()).await.unwrap().len(), 1);
        assert_eq!(service.list(ListParams::default()).await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn create_posts_camel_case_payload() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                req.method == Method::Post
                    && req.path == "/products"
                    && req.body.as_ref().and_then(|b| b.get("isIllegal")) == Some(&json!(true))
            })
            .times(1)
            .returning(|_| {
                Ok(json!({"data": {"id": 9, "description": "Rifle", "price": 1.5, "stock": 0, "isIllegal": true}}))
            });

        let service = EntityService::<Products, _>::new(transport);
        let created = service
            .create(&NewProduct {
                description: "Rifle".into(),
                detail: None,
                price: 1.5,
                stock: 0,
                is_illegal: true,
            })
            .await
            .unwrap();
        assert_eq!(created.id, ProductId::new(9).unwrap());
    }

    #[actix_web::test]
    async fn delete_reads_optional_confirmation() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| req.method == Method::Delete && req.path == "/clients/30123456")
            .times(1)
            .returning(|_| Ok(Value::Null));

        let service = EntityService::<Clients, _>::new(transport);
        let dni = Dni::new("30.123.456").unwrap();
        assert_eq!(service.delete(&dni).await.unwrap(), Confirmation::default());
    }

    #[actix_web::test]
    async fn promote_patches_only_the_headquarters_flag() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                req.method == Method::Patch
                    && req.path == "/zones/4"
                    && req.body == Some(json!({"isHeadquarters": true}))
            })
            .times(1)
            .returning(|_| Ok(json!({"id": 4, "name": "Norte", "isHeadquarters": true})));

        let service = EntityService::<Zones, _>::new(transport);
        let zone = service
            .promote_headquarters(&ZoneId::new(4).unwrap())
            .await
            .unwrap();
        assert!(zone.is_headquarters);
    }

    #[actix_web::test]
    async fn stock_adjustment_is_a_partial_update() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .withf(|req| {
                req.method == Method::Patch
                    && req.path == "/products/2"
                    && req.body == Some(json!({"stock": 15}))
            })
            .times(1)
            .returning(|_| {
                Ok(json!({"data": {"id": 2, "description": "Gorro", "price": 5.0, "stock": 15}}))
            });

        let service = EntityService::<Products, _>::new(transport);
        let patch = ProductPatch {
            stock: Some(15),
            price: None,
        };
        let product = service
            .adjust_stock(&ProductId::new(2).unwrap(), &patch)
            .await
            .unwrap();
        assert_eq!(product.stock, 15);
    }

    #[actix_web::test]
    async fn backend_errors_propagate_untouched() {
        let mut transport = MockTransport::new();
        transport
            .expect_send()
            .times(1)
            .returning(|_| Err(BackendError::from_response(404, r#"{"message":"gone"}"#)));

        let service = EntityService::<Products, _>::new(transport);
        let err = service
            .get_one(&ProductId::new(5).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::NotFound(_)));
        assert_eq!(err.message(), Some("gone"));
    }
}
