//! Entity services for Agate.
//!
//! An [`EntityService`] sits between the HTTP handlers and a
//! [`RecordStore`](agate_store::RecordStore). It rejects bad input before
//! any store access, routes merge and replace updates through the
//! partial-update merger, and wraps store failures with the entity and
//! operation they happened in.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use agate_service::EntityService;
//! use agate_store::InMemoryRecordStore;
//! use agate_types::{Client, ClientDraft};
//!
//! # tokio_test_block(async {
//! let clients = EntityService::<Client>::new(Arc::new(InMemoryRecordStore::new()));
//! let id = clients
//!     .create(ClientDraft { name: "Acme".into(), ..Default::default() })
//!     .await
//!     .unwrap();
//! assert_eq!(clients.get(id).await.unwrap().name, "Acme");
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f)
//! # }
//! ```

pub mod error;
pub mod service;
pub mod validate;

// Re-exports for convenience.
pub use error::{Operation, ServiceError, ServiceResult};
pub use service::EntityService;
pub use validate::Validate;
