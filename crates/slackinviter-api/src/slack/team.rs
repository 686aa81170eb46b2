// team.info endpoint

use tracing::debug;

use crate::error::Error;
use crate::slack::client::SlackClient;
use crate::slack::models::{TeamInfo, TeamInfoResponse};

impl SlackClient {
    /// Workspace name, domain, and icon set.
    ///
    /// `GET team.info`
    pub async fn team_info(&self) -> Result<TeamInfo, Error> {
        debug!("fetching team info");
        let resp: TeamInfoResponse = self.get("team.info", &[]).await?;
        Ok(resp.team)
    }
}
