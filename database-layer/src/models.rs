// Shared record fields
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// Creation/update/soft-delete bookkeeping, composed into every stored record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditFields {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl AuditFields {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    /// Bump `updated_at` after a mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

impl Default for AuditFields {
    fn default() -> Self {
        Self::new()
    }
}
