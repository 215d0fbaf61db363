//! Mock transport for isolating services and screens in tests.

use async_trait::async_trait;
use mockall::mock;
use serde_json::Value;

use crate::backend::{ApiRequest, BackendResult, Transport};

mock! {
    pub Transport {}

    #[async_trait]
    impl Transport for Transport {
        async fn send(&self, request: ApiRequest) -> BackendResult<Value>;
    }
}
