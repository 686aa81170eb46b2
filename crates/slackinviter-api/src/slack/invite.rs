// users.admin.invite endpoint
//
// Undocumented legacy method. It must be posted to the workspace's own
// subdomain and reads the token from the form body, not the header.

use secrecy::ExposeSecret;
use tracing::debug;

use crate::error::Error;
use crate::slack::client::SlackClient;
use crate::slack::models::{Envelope, InviteForm};

impl SlackClient {
    /// Send an email invitation to join the workspace at `domain`.
    ///
    /// `POST https://{domain}.slack.com/api/users.admin.invite`
    pub async fn invite(
        &self,
        domain: &str,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> Result<(), Error> {
        let url = self.invite_url(domain)?;
        debug!(domain, "inviting member");

        let form = InviteForm {
            token: self.token().expose_secret(),
            email,
            first_name,
            last_name,
            set_active: true,
            attempts: 1,
        };
        let _: Envelope = self.post_form("users.admin.invite", url, &form).await?;
        Ok(())
    }
}
