//! Plain table state shared by the in-memory backend

use account_core::entities::{AccountFilter, AccountInfo, AccountQuery, RefreshSession, User};
use account_core::error::DomainError;
use account_core::traits::RepoResult;
use uuid::Uuid;

/// One write recorded by a unit of work, replayed on commit
#[derive(Debug, Clone)]
pub(crate) enum Op {
    AddUser(User),
    UpdateUser(User),
    AddSession(RefreshSession),
    RemoveSession(Uuid),
    RemoveSessionsForUser(Uuid),
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Tables {
    users: Vec<User>,
    sessions: Vec<RefreshSession>,
}

impl Tables {
    /// Apply one write, enforcing the same unique constraints as the schema
    pub(crate) fn apply(&mut self, op: &Op) -> RepoResult<u64> {
        match op {
            Op::AddUser(user) => {
                if self.users.iter().any(|u| u.username == user.username) {
                    return Err(DomainError::UsernameExists(user.username.clone()));
                }
                self.users.push(user.clone());
                Ok(1)
            }
            Op::UpdateUser(user) => {
                if self
                    .users
                    .iter()
                    .any(|u| u.id != user.id && u.username == user.username)
                {
                    return Err(DomainError::UsernameExists(user.username.clone()));
                }
                let slot = self
                    .users
                    .iter_mut()
                    .find(|u| u.id == user.id)
                    .ok_or(DomainError::UserNotFound(user.id))?;
                *slot = user.clone();
                Ok(1)
            }
            Op::AddSession(session) => {
                if !self.users.iter().any(|u| u.id == session.user_id) {
                    return Err(DomainError::DatabaseError(format!(
                        "Session owner {} does not exist",
                        session.user_id
                    )));
                }
                if self
                    .sessions
                    .iter()
                    .any(|s| s.refresh_token == session.refresh_token)
                {
                    return Err(DomainError::InternalError(
                        "Refresh token already stored".to_string(),
                    ));
                }
                self.sessions.push(session.clone());
                Ok(1)
            }
            Op::RemoveSession(id) => Ok(self.remove_sessions(|s| s.id == *id)),
            Op::RemoveSessionsForUser(user_id) => {
                Ok(self.remove_sessions(|s| s.user_id == *user_id))
            }
        }
    }

    fn remove_sessions(&mut self, pred: impl Fn(&RefreshSession) -> bool) -> u64 {
        let before = self.sessions.len();
        self.sessions.retain(|s| !pred(s));
        (before - self.sessions.len()) as u64
    }

    pub(crate) fn user_by_id(&self, id: Uuid) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub(crate) fn user_by_username(&self, username: &str) -> Option<&User> {
        self.users.iter().find(|u| u.username == username)
    }

    pub(crate) fn latest_session_for(&self, user_id: Uuid) -> Option<&RefreshSession> {
        self.sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .max_by_key(|s| s.created_at)
    }

    pub(crate) fn session_by_token(&self, token: &str) -> Option<&RefreshSession> {
        self.sessions.iter().find(|s| s.refresh_token == token)
    }

    /// Matching accounts in creation order
    fn matching<'a>(&'a self, filter: &'a AccountFilter) -> impl Iterator<Item = &'a User> {
        let mut users: Vec<&User> = self.users.iter().filter(|u| filter.matches(u)).collect();
        users.sort_by_key(|u| (u.created_at, u.id));
        users.into_iter()
    }

    pub(crate) fn read_many(&self, query: &AccountQuery) -> Vec<AccountInfo> {
        let offset = usize::try_from(query.offset).unwrap_or(0);
        let limit = usize::try_from(query.limit).unwrap_or(0);
        self.matching(&query.filter)
            .skip(offset)
            .take(limit)
            .map(AccountInfo::from)
            .collect()
    }

    pub(crate) fn read_one(&self, filter: &AccountFilter) -> Option<AccountInfo> {
        self.matching(filter).next().map(AccountInfo::from)
    }
}
