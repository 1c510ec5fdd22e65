//! Identity administration: users, organizations, and responsibility.
//!
//! These operations seed the system and carry no authorization of
//! their own.

use tenderhub_core::error::TenderHubResult;
use tenderhub_core::models::organization::CreateOrganization;
use tenderhub_core::models::user::CreateUser;
use tenderhub_core::repository::{OrganizationRepository, UserRepository};
use tracing::info;
use uuid::Uuid;

use crate::error::LogUnknown;
use crate::requests::{CreateOrganizationRequest, CreateUserRequest, require};
use crate::views::{OrganizationView, UserView};

pub struct IdentityService<U: UserRepository, O: OrganizationRepository> {
    users: U,
    organizations: O,
}

impl<U: UserRepository, O: OrganizationRepository> IdentityService<U, O> {
    pub fn new(users: U, organizations: O) -> Self {
        Self {
            users,
            organizations,
        }
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> TenderHubResult<UserView> {
        let result: TenderHubResult<UserView> = async {
            require("username", &request.username)?;
            let user = self
                .users
                .create(CreateUser {
                    username: request.username,
                    first_name: request.first_name,
                    last_name: request.last_name,
                })
                .await?;
            info!(user_id = %user.id, username = %user.username, "User created");
            Ok(user.into())
        }
        .await;
        result.log_unknown("create_user")
    }

    pub async fn create_organization(
        &self,
        request: CreateOrganizationRequest,
    ) -> TenderHubResult<OrganizationView> {
        let result: TenderHubResult<OrganizationView> = async {
            require("name", &request.name)?;
            let organization = self
                .organizations
                .create(CreateOrganization {
                    name: request.name,
                    description: request.description,
                })
                .await?;
            info!(organization_id = %organization.id, "Organization created");
            Ok(organization.into())
        }
        .await;
        result.log_unknown("create_organization")
    }

    pub async fn add_responsible(&self, organization_id: Uuid, user_id: Uuid) -> TenderHubResult<()> {
        self.organizations
            .add_responsible(organization_id, user_id)
            .await
            .log_unknown("add_responsible")?;
        info!(%organization_id, %user_id, "Responsible user registered");
        Ok(())
    }
}
