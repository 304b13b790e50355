//! Refresh session entity <-> model mapper

use account_core::entities::RefreshSession;

use crate::models::RefreshSessionModel;

impl From<RefreshSessionModel> for RefreshSession {
    fn from(model: RefreshSessionModel) -> Self {
        RefreshSession {
            id: model.id,
            user_id: model.user_id,
            refresh_token: model.refresh_token,
            expires_at: model.expires_at,
            created_at: model.created_at,
        }
    }
}
