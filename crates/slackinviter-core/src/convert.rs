// ── API client adapters ──
//
// Bridges the concrete `slackinviter-api` clients onto the core seams.
// Inherent client methods share names with the trait methods, so calls
// below go through the type path explicitly.

use std::net::IpAddr;

use async_trait::async_trait;
use slackinviter_api::slack::models::SlackUser;
use slackinviter_api::{RecaptchaClient, SessionClient, SlackClient};

use crate::admission::{CaptchaVerifier, Inviter};
use crate::directory::{MemberDirectory, MemberPage};
use crate::error::CoreError;
use crate::model::{Member, Presence, WorkspaceInfo};
use crate::session::{SessionVerifier, Visitor};

impl From<SlackUser> for Member {
    fn from(user: SlackUser) -> Self {
        Self {
            presence: Presence::from_provider(user.presence.as_deref()),
            id: user.id,
            is_bot: user.is_bot,
            deleted: user.deleted,
        }
    }
}

#[async_trait]
impl MemberDirectory for SlackClient {
    async fn list_members(
        &self,
        cursor: Option<&str>,
        limit: u32,
        include_presence: bool,
    ) -> Result<MemberPage, CoreError> {
        let page = self.list_users(cursor, limit, include_presence).await?;
        let next_cursor = page.next_cursor().map(str::to_owned);
        Ok(MemberPage {
            members: page.members.into_iter().map(Member::from).collect(),
            next_cursor,
        })
    }

    async fn workspace_info(&self) -> Result<WorkspaceInfo, CoreError> {
        let team = self.team_info().await?;
        Ok(WorkspaceInfo {
            name: team.name,
            domain: team.domain,
            icons: team.icon,
        })
    }
}

#[async_trait]
impl Inviter for SlackClient {
    async fn invite(&self, domain: &str, first_name: &str, last_name: &str, email: &str) -> Result<(), CoreError> {
        SlackClient::invite(self, domain, first_name, last_name, email)
            .await
            .map_err(CoreError::from)
    }
}

#[async_trait]
impl CaptchaVerifier for RecaptchaClient {
    async fn verify(&self, token: &str, remote_ip: IpAddr) -> Result<bool, CoreError> {
        RecaptchaClient::verify(self, token, Some(remote_ip))
            .await
            .map_err(|e| CoreError::Captcha { message: e.to_string() })
    }
}

#[async_trait]
impl SessionVerifier for SessionClient {
    async fn visitor(&self, cookies: &str) -> Result<Option<Visitor>, CoreError> {
        let session = self
            .whoami(cookies)
            .await
            .map_err(|e| CoreError::Session { message: e.to_string() })?;

        Ok(session.filter(|s| s.active).map(|s| Visitor {
            email: s.email().map(str::to_owned),
            name: s.name().map(str::to_owned),
        }))
    }
}
