//! Read-access policy for scrapbooks and posts.
//!
//! Pure decision logic over ownership, status, and sharing grants. The
//! database is consulted *before* calling in here (the caller resolves
//! whether the requester holds a scrapbook-level grant); the policy itself
//! never performs I/O, which keeps it trivially unit-testable.
//!
//! A scrapbook-level grant is sufficient for every post inside that
//! scrapbook. The share workflow also writes per-post grant rows, but the
//! policy intentionally does not require them: grants and posts would
//! otherwise drift apart for posts added after the share.

use crate::status::Status;
use crate::types::DbId;

/// The identity attached to an inbound request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requester {
    Anonymous,
    User(DbId),
}

impl Requester {
    pub fn user_id(self) -> Option<DbId> {
        match self {
            Requester::Anonymous => None,
            Requester::User(id) => Some(id),
        }
    }
}

/// May `requester` read a scrapbook?
///
/// Allowed when the scrapbook is public, the requester is its author, or
/// the requester holds a scrapbook-level grant.
pub fn can_view_scrapbook(
    requester: Requester,
    author_id: DbId,
    status: Status,
    has_grant: bool,
) -> bool {
    if status.is_public() {
        return true;
    }
    match requester {
        Requester::Anonymous => false,
        Requester::User(user_id) => user_id == author_id || has_grant,
    }
}

/// May `requester` read a post?
///
/// Allowed when the post is public, the requester authored it, or the
/// requester holds a grant on the post's parent scrapbook
/// (`has_scrapbook_grant`).
pub fn can_view_post(
    requester: Requester,
    post_author_id: DbId,
    post_status: Status,
    has_scrapbook_grant: bool,
) -> bool {
    if post_status.is_public() {
        return true;
    }
    match requester {
        Requester::Anonymous => false,
        Requester::User(user_id) => user_id == post_author_id || has_scrapbook_grant,
    }
}

/// May `requester` add a post to a scrapbook?
///
/// The scrapbook author always may; so may anyone the scrapbook has been
/// shared with. Public visibility alone does not confer write access.
pub fn can_add_post(requester: Requester, scrapbook_author_id: DbId, has_grant: bool) -> bool {
    match requester {
        Requester::Anonymous => false,
        Requester::User(user_id) => user_id == scrapbook_author_id || has_grant,
    }
}

/// May `requester` update or delete an entity? Author only.
pub fn can_modify(requester: Requester, author_id: DbId) -> bool {
    requester == Requester::User(author_id)
}
