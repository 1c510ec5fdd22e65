//! Authorization gate: identity resolution and responsible-user checks.
//!
//! Every authenticated operation resolves the acting user first and
//! stops there if the name is unknown. Responsibility checks fail
//! closed: a lookup error is propagated, never read as "responsible".

use tenderhub_core::error::{TenderHubError, TenderHubResult};
use tenderhub_core::models::user::User;
use tenderhub_core::repository::{OrganizationRepository, UserRepository};
use tracing::{debug, warn};
use uuid::Uuid;

/// Resolve a username, turning "no rows" into `UserNotFound`.
pub(crate) async fn resolve_username<U: UserRepository>(
    users: &U,
    username: &str,
) -> TenderHubResult<User> {
    match users.get_by_username(username).await {
        Ok(user) => Ok(user),
        Err(TenderHubError::NotFound { .. }) => {
            debug!(username, "Unknown user");
            Err(TenderHubError::UserNotFound {
                username: username.to_string(),
            })
        }
        Err(e) => Err(e),
    }
}

pub struct AuthorizationGate<U: UserRepository, O: OrganizationRepository> {
    users: U,
    organizations: O,
}

impl<U: UserRepository, O: OrganizationRepository> AuthorizationGate<U, O> {
    pub fn new(users: U, organizations: O) -> Self {
        Self {
            users,
            organizations,
        }
    }

    pub async fn resolve_user(&self, username: &str) -> TenderHubResult<User> {
        resolve_username(&self.users, username).await
    }

    /// Resolve a user by id, for requests that name the author directly.
    pub async fn resolve_user_id(&self, user_id: Uuid) -> TenderHubResult<User> {
        match self.users.get_by_id(user_id).await {
            Ok(user) => Ok(user),
            Err(TenderHubError::NotFound { .. }) => Err(TenderHubError::UserNotFound {
                username: user_id.to_string(),
            }),
            Err(e) => Err(e),
        }
    }

    pub async fn is_responsible(&self, organization_id: Uuid, user_id: Uuid) -> TenderHubResult<bool> {
        self.organizations
            .is_responsible(organization_id, user_id)
            .await
    }

    /// Fails with `NotResponsible` unless the user acts for the
    /// organization.
    pub async fn require_responsible(
        &self,
        organization_id: Uuid,
        user: &User,
    ) -> TenderHubResult<()> {
        if self.is_responsible(organization_id, user.id).await? {
            return Ok(());
        }
        warn!(
            %organization_id,
            username = %user.username,
            "Denied: user is not responsible for organization"
        );
        Err(TenderHubError::NotResponsible { organization_id })
    }

    /// The organization the user acts for; `NoOrganization` when none.
    pub async fn organization_of(&self, user: &User) -> TenderHubResult<Uuid> {
        match self.organizations.organization_of(user.id).await {
            Ok(id) => Ok(id),
            Err(TenderHubError::NotFound { .. }) => {
                warn!(username = %user.username, "Denied: user has no organization");
                Err(TenderHubError::NoOrganization {
                    user: user.username.clone(),
                })
            }
            Err(e) => Err(e),
        }
    }

    pub async fn responsible_count(&self, organization_id: Uuid) -> TenderHubResult<u64> {
        self.organizations.responsible_count(organization_id).await
    }
}
