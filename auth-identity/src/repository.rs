use crate::{models::*, error::*};
use async_trait::async_trait;

/// Persistence boundary for user records.
///
/// Implementations must make `insert_user_if_absent` atomic on the username:
/// concurrent callers with the same username all observe one stored row.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert the user unless the username is taken; returns the stored row either way.
    async fn insert_user_if_absent(&self, user: NewUser) -> Result<User>;
    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn find_user_by_name(&self, username: &str) -> Result<Option<User>>;
    /// Returns the users that exist; missing names are simply absent from the result.
    async fn find_users_by_names(&self, usernames: &[String]) -> Result<Vec<User>>;
    async fn count_users(&self) -> Result<u64>;
}
