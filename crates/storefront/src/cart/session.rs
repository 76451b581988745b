//! Session-backed cart storage.
//!
//! The production [`CartStorage`] implementation: the serialized cart record
//! lives under a single key in the tower-sessions session, which is itself
//! persisted in `PostgreSQL`. Concurrent requests of one session each hold
//! an independent in-memory copy and the last writer wins; there is no
//! merge or conflict detection for a client-only cart.

use tower_sessions::Session;

use azahar_core::CartRecord;

use crate::models::session::keys;

use super::{CartStorage, StorageError};

/// Cart storage over the request's session.
#[derive(Debug, Clone)]
pub struct SessionCartStorage {
    session: Session,
}

impl SessionCartStorage {
    /// Wrap a request session.
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl CartStorage for SessionCartStorage {
    async fn load(&self) -> Result<Option<CartRecord>, StorageError> {
        self.session
            .get::<CartRecord>(keys::CART)
            .await
            .map_err(|err| StorageError(err.to_string()))
    }

    async fn save(&self, record: &CartRecord) -> Result<(), StorageError> {
        self.session
            .insert(keys::CART, record)
            .await
            .map_err(|err| StorageError(err.to_string()))
    }
}
