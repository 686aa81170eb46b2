// users.list endpoint
//
// Cursor-paginated. The caller drives the cursor; this layer fetches a
// single page so a rate-limited request can be retried verbatim.

use tracing::debug;

use crate::error::Error;
use crate::slack::client::SlackClient;
use crate::slack::models::UsersPage;

impl SlackClient {
    /// Fetch one page of workspace members.
    ///
    /// `GET users.list?limit={limit}&presence={presence}[&cursor={cursor}]`
    pub async fn list_users(
        &self,
        cursor: Option<&str>,
        limit: u32,
        presence: bool,
    ) -> Result<UsersPage, Error> {
        let mut params = vec![
            ("limit", limit.to_string()),
            ("presence", presence.to_string()),
        ];
        if let Some(cursor) = cursor {
            params.push(("cursor", cursor.to_owned()));
        }
        debug!(?cursor, limit, presence, "listing users");
        self.get("users.list", &params).await
    }
}
