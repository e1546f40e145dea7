//! Visibility status shared by scrapbooks and posts.
//!
//! Stored as SMALLINT; the discriminants are part of the wire format and
//! the database schema, so they must never be renumbered.

/// Status ID type matching SMALLINT in the database.
pub type StatusId = i16;

/// Visibility status of a scrapbook or post.
///
/// Scrapbooks default to [`Status::Private`], posts to [`Status::Draft`].
#[repr(i16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Draft = 0,
    Private = 1,
    Public = 2,
}

impl Status {
    /// Return the database status ID.
    pub fn id(self) -> StatusId {
        self as StatusId
    }

    /// Parse a raw status ID, rejecting unknown values.
    pub fn from_id(id: StatusId) -> Option<Status> {
        match id {
            0 => Some(Status::Draft),
            1 => Some(Status::Private),
            2 => Some(Status::Public),
            _ => None,
        }
    }

    pub fn is_public(self) -> bool {
        self == Status::Public
    }
}

impl From<Status> for StatusId {
    fn from(value: Status) -> Self {
        value as StatusId
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_ids_match_schema() {
        assert_eq!(Status::Draft.id(), 0);
        assert_eq!(Status::Private.id(), 1);
        assert_eq!(Status::Public.id(), 2);
    }

    #[test]
    fn from_id_round_trips() {
        for status in [Status::Draft, Status::Private, Status::Public] {
            assert_eq!(Status::from_id(status.id()), Some(status));
        }
    }

    #[test]
    fn from_id_rejects_unknown() {
        assert_eq!(Status::from_id(3), None);
        assert_eq!(Status::from_id(-1), None);
    }
}
