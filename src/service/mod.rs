//! Business rules over the state store: request validation, set/delta
//! dispatch, and the cached current message.

use serde_json::Value;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::store::{StateStore, StoreError};

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced to the API layer.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Malformed or missing request fields.
    #[error("{0}")]
    InvalidArgument(String),

    /// The backing store failed.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// A validated counter update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterUpdate {
    /// Overwrite with an absolute value.
    Set(i64),
    /// Add a (possibly negative) delta.
    Delta(i64),
}

impl CounterUpdate {
    /// Parse a request body of the form `{"value": n}` or `{"delta": n}`.
    ///
    /// `value` wins when both keys are present.
    pub fn from_body(body: &Value) -> ServiceResult<Self> {
        let Some(object) = body.as_object() else {
            return Err(ServiceError::InvalidArgument("Invalid JSON body".into()));
        };

        if let Some(raw) = object.get("value") {
            let value = coerce_i64(raw).ok_or_else(|| {
                ServiceError::InvalidArgument("'value' must be an integer".into())
            })?;
            return Ok(Self::Set(value));
        }

        if let Some(raw) = object.get("delta") {
            let delta = coerce_i64(raw).ok_or_else(|| {
                ServiceError::InvalidArgument("'delta' must be an integer".into())
            })?;
            return Ok(Self::Delta(delta));
        }

        Err(ServiceError::InvalidArgument(
            "Provide either 'value' or 'delta'".into(),
        ))
    }
}

/// Extract the `message` field from a request body.
pub fn message_from_body(body: &Value) -> ServiceResult<&str> {
    body.as_object()
        .and_then(|object| object.get("message"))
        .and_then(Value::as_str)
        .ok_or_else(|| {
            ServiceError::InvalidArgument(
                r#"Invalid payload. Expected JSON body like {"message": "Hi there"}."#.into(),
            )
        })
}

/// Accept JSON integers and strings that parse as i64.
fn coerce_i64(raw: &Value) -> Option<i64> {
    match raw {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// In-process facade over the state store.
///
/// Holds the only mutable shared state besides the counter row: a cached
/// copy of the current message for fast reads.
pub struct ValueService {
    store: StateStore,
    current_message: RwLock<String>,
}

impl ValueService {
    /// Build the service, populating the message cache from storage.
    pub async fn new(store: StateStore) -> ServiceResult<Self> {
        let current = store.latest_message().await?;
        Ok(Self {
            store,
            current_message: RwLock::new(current),
        })
    }

    /// Current counter value, straight from storage.
    pub async fn counter_value(&self) -> ServiceResult<i64> {
        Ok(self.store.counter_value().await?)
    }

    /// Apply a set or delta update and return the new value.
    #[instrument(skip(self))]
    pub async fn update_counter(&self, update: CounterUpdate) -> ServiceResult<i64> {
        match update {
            CounterUpdate::Set(value) => {
                self.store.set_counter(value).await?;
                Ok(value)
            }
            CounterUpdate::Delta(delta) => Ok(self.store.add_to_counter(delta).await?),
        }
    }

    /// Cached current message. Never touches storage on the read path.
    pub async fn current_message(&self) -> String {
        self.current_message.read().await.clone()
    }

    /// Persist a new message, then publish it to the cache.
    ///
    /// Ordering invariant: the cache is only written after the insert
    /// succeeds, so readers never observe a message that failed to persist.
    /// Concurrent updates race last-writer-wins on the cache, which is fine
    /// for single-latest-value semantics.
    #[instrument(skip(self, content))]
    pub async fn update_message(&self, content: &str) -> ServiceResult<()> {
        let id = self.store.append_message(content).await?;
        debug!(id, "stored message");
        *self.current_message.write().await = content.to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::store::DEFAULT_GREETING;
    use serde_json::json;
    use sqlx::SqlitePool;

    async fn setup_service() -> (ValueService, SqlitePool) {
        let pool = db::open_in_memory().await.unwrap();
        let store = StateStore::new(pool.clone());
        store.initialize().await.unwrap();
        (ValueService::new(store).await.unwrap(), pool)
    }

    #[test]
    fn test_counter_update_parsing() {
        assert_eq!(
            CounterUpdate::from_body(&json!({"value": 5})).unwrap(),
            CounterUpdate::Set(5)
        );
        assert_eq!(
            CounterUpdate::from_body(&json!({"delta": -3})).unwrap(),
            CounterUpdate::Delta(-3)
        );
        // Numeric strings coerce, matching the original int() behavior.
        assert_eq!(
            CounterUpdate::from_body(&json!({"value": "17"})).unwrap(),
            CounterUpdate::Set(17)
        );
        // "value" wins when both keys are present.
        assert_eq!(
            CounterUpdate::from_body(&json!({"value": 1, "delta": 2})).unwrap(),
            CounterUpdate::Set(1)
        );
    }

    #[test]
    fn test_counter_update_rejects_bad_bodies() {
        for body in [
            json!({}),
            json!([1, 2]),
            json!("nope"),
            json!({"value": "abc"}),
            json!({"value": 1.5}),
            json!({"delta": null}),
            json!({"delta": true}),
        ] {
            let err = CounterUpdate::from_body(&body).unwrap_err();
            assert!(matches!(err, ServiceError::InvalidArgument(_)), "{body}");
        }
    }

    #[test]
    fn test_message_from_body() {
        assert_eq!(
            message_from_body(&json!({"message": "hi"})).unwrap(),
            "hi"
        );

        for body in [json!({}), json!({"message": 5}), json!("hi"), json!(null)] {
            let err = message_from_body(&body).unwrap_err();
            assert!(matches!(err, ServiceError::InvalidArgument(_)), "{body}");
        }
    }

    #[tokio::test]
    async fn test_cache_populated_at_startup() {
        let (service, _pool) = setup_service().await;
        assert_eq!(service.current_message().await, DEFAULT_GREETING);
    }

    #[tokio::test]
    async fn test_update_message_refreshes_cache() {
        let (service, _pool) = setup_service().await;

        service.update_message("fresh").await.unwrap();
        assert_eq!(service.current_message().await, "fresh");
    }

    #[tokio::test]
    async fn test_failed_persist_leaves_cache_untouched() {
        let (service, pool) = setup_service().await;

        // Kill the pool so the insert fails.
        pool.close().await;

        let result = service.update_message("lost").await;
        assert!(matches!(result, Err(ServiceError::Storage(_))));

        // Durability before visibility: the cache still holds the last
        // successfully persisted message.
        assert_eq!(service.current_message().await, DEFAULT_GREETING);
    }

    #[tokio::test]
    async fn test_counter_set_and_delta() {
        let (service, _pool) = setup_service().await;

        assert_eq!(
            service.update_counter(CounterUpdate::Set(5)).await.unwrap(),
            5
        );
        assert_eq!(
            service
                .update_counter(CounterUpdate::Delta(-3))
                .await
                .unwrap(),
            2
        );
        assert_eq!(service.counter_value().await.unwrap(), 2);
    }
}
