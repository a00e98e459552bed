//! File access rules.
//!
//! A caller may see a file when they own it, when it was shared with them,
//! or when they present a share token issued for that file. Edit rights
//! follow ownership or the matching grant's `can_edit`.

use sqlx::SqlitePool;

use super::file::{DriveFile, FileRepository};
use super::share::ShareRepository;
use crate::Result;

/// How the caller reached the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessVia {
    Owner,
    /// Grant addressed to the caller.
    DirectShare,
    /// Share token supplied with the request.
    ShareLink,
}

/// A file the caller may at least view.
#[derive(Debug, Clone)]
pub struct Access {
    pub file: DriveFile,
    pub via: AccessVia,
    pub can_edit: bool,
}

/// Decide whether `requester` (or a holder of `share_token`) may access a file.
///
/// Returns None when no rule applies, including when the file does not
/// exist, so callers cannot tell the two apart. A direct grant and a token
/// grant are both consulted; edit is allowed if either permits it.
pub async fn resolve_access(
    pool: &SqlitePool,
    file_id: i64,
    requester: Option<i64>,
    share_token: Option<&str>,
) -> Result<Option<Access>> {
    let Some(file) = FileRepository::new(pool).get_by_id(file_id).await? else {
        return Ok(None);
    };

    if requester == Some(file.user_id) {
        return Ok(Some(Access {
            file,
            via: AccessVia::Owner,
            can_edit: true,
        }));
    }

    let shares = ShareRepository::new(pool);

    let direct = match requester {
        Some(user_id) => shares.get_for_recipient(file_id, user_id).await?,
        None => None,
    };
    let link = match share_token.filter(|t| !t.is_empty()) {
        Some(token) => shares.get_by_file_and_token(file_id, token).await?,
        None => None,
    };

    let access = match (direct, link) {
        (Some(d), l) => {
            let can_edit = d.can_edit || l.map(|l| l.can_edit).unwrap_or(false);
            Some(Access {
                file,
                via: AccessVia::DirectShare,
                can_edit,
            })
        }
        (None, Some(l)) => Some(Access {
            file,
            via: AccessVia::ShareLink,
            can_edit: l.can_edit,
        }),
        (None, None) => None,
    };

    Ok(access)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewUser, UserRepository};
    use crate::drive::{share_file, NewFile};
    use crate::Database;

    async fn setup() -> (Database, i64, i64, i64, i64) {
        let db = Database::open_in_memory().await.unwrap();
        let users = UserRepository::new(db.pool());
        let alice = users
            .create(&NewUser::new("alice", "a@example.com", "hash"))
            .await
            .unwrap()
            .id;
        let bob = users
            .create(&NewUser::new("bob", "b@example.com", "hash"))
            .await
            .unwrap()
            .id;
        let carol = users
            .create(&NewUser::new("carol", "c@example.com", "hash"))
            .await
            .unwrap()
            .id;
        let file = FileRepository::new(db.pool())
            .create(&NewFile::new(alice, "plan.txt", "p.txt", 4))
            .await
            .unwrap()
            .id;
        (db, alice, bob, carol, file)
    }

    #[tokio::test]
    async fn test_owner_has_full_access() {
        let (db, alice, _, _, file) = setup().await;
        let access = resolve_access(db.pool(), file, Some(alice), None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(access.via, AccessVia::Owner);
        assert!(access.can_edit);
    }

    #[tokio::test]
    async fn test_stranger_and_missing_file_look_the_same() {
        let (db, _, bob, _, file) = setup().await;
        assert!(resolve_access(db.pool(), file, Some(bob), None)
            .await
            .unwrap()
            .is_none());
        assert!(resolve_access(db.pool(), 9999, Some(bob), None)
            .await
            .unwrap()
            .is_none());
        assert!(resolve_access(db.pool(), file, None, None)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_direct_share() {
        let (db, alice, bob, carol, file) = setup().await;
        share_file(db.pool(), file, alice, Some("bob"), false)
            .await
            .unwrap();

        let access = resolve_access(db.pool(), file, Some(bob), None)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(access.via, AccessVia::DirectShare);
        assert!(!access.can_edit);

        assert!(resolve_access(db.pool(), file, Some(carol), None)
            .await
            .unwrap()
            .is_none());

        share_file(db.pool(), file, alice, Some("bob"), true)
            .await
            .unwrap();
        let access = resolve_access(db.pool(), file, Some(bob), None)
            .await
            .unwrap()
            .unwrap();
        assert!(access.can_edit);
    }

    #[tokio::test]
    async fn test_share_link_allows_anonymous_view() {
        let (db, alice, _, carol, file) = setup().await;
        let grant = share_file(db.pool(), file, alice, None, true)
            .await
            .unwrap()
            .grant;

        let anon = resolve_access(db.pool(), file, None, Some(&grant.share_token))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(anon.via, AccessVia::ShareLink);
        assert!(anon.can_edit);

        let signed_in = resolve_access(db.pool(), file, Some(carol), Some(&grant.share_token))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(signed_in.via, AccessVia::ShareLink);

        assert!(resolve_access(db.pool(), file, None, Some("bogus"))
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_token_is_bound_to_its_file() {
        let (db, alice, _, _, file) = setup().await;
        let other = FileRepository::new(db.pool())
            .create(&NewFile::new(alice, "other.txt", "o.txt", 1))
            .await
            .unwrap()
            .id;
        let grant = share_file(db.pool(), file, alice, None, false)
            .await
            .unwrap()
            .grant;

        assert!(resolve_access(db.pool(), other, None, Some(&grant.share_token))
            .await
            .unwrap()
            .is_none());
    }
}
