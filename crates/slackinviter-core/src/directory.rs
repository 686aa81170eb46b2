// ── Member directory seam ──
//
// The sync loop only ever talks to a `MemberDirectory`. The Slack client
// implements it in `convert`; tests substitute scripted fakes.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::model::{Member, WorkspaceInfo};

/// One page of directory entries plus the continuation token.
#[derive(Debug, Clone, Default)]
pub struct MemberPage {
    pub members: Vec<Member>,
    /// `None` (or empty) once the final page has been served.
    pub next_cursor: Option<String>,
}

#[async_trait]
pub trait MemberDirectory: Send + Sync {
    async fn list_members(
        &self,
        cursor: Option<&str>,
        limit: u32,
        include_presence: bool,
    ) -> Result<MemberPage, CoreError>;

    async fn workspace_info(&self) -> Result<WorkspaceInfo, CoreError>;
}

// ── Paginator ───────────────────────────────────────────────────────

/// Cursor-driven walk over a [`MemberDirectory`].
///
/// The cursor only advances after a page is fetched successfully, so a
/// caller that gets an error back (rate limit included) can call
/// [`next_page`](Self::next_page) again and receive the same page.
pub struct Paginator<'a, D: ?Sized> {
    directory: &'a D,
    page_size: u32,
    include_presence: bool,
    cursor: Option<String>,
    done: bool,
    pages: usize,
}

impl<'a, D: MemberDirectory + ?Sized> Paginator<'a, D> {
    pub fn new(directory: &'a D, page_size: u32, include_presence: bool) -> Self {
        Self {
            directory,
            page_size,
            include_presence,
            cursor: None,
            done: false,
            pages: 0,
        }
    }

    /// Fetch the next page, or `Ok(None)` once the walk is complete.
    pub async fn next_page(&mut self) -> Result<Option<Vec<Member>>, CoreError> {
        if self.done {
            return Ok(None);
        }

        let page = self
            .directory
            .list_members(self.cursor.as_deref(), self.page_size, self.include_presence)
            .await?;

        self.pages += 1;
        self.cursor = page.next_cursor.filter(|c| !c.is_empty());
        self.done = self.cursor.is_none();

        Ok(Some(page.members))
    }

    /// Token for the page the next call will request.
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}
