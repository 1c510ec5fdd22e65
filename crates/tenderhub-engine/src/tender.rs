//! Tender service: creation, listings, versioned edits, rollback, and
//! status changes.

use tenderhub_core::error::TenderHubResult;
use tenderhub_core::models::tender::{
    CreateTender, Tender, TenderFilter, TenderPatch, TenderSnapshot, TenderStatus,
};
use tenderhub_core::models::user::User;
use tenderhub_core::repository::{OrganizationRepository, TenderRepository, UserRepository};
use tenderhub_core::status::StringEnum;
use tracing::info;
use uuid::Uuid;

use crate::config::EngineConfig;
use crate::error::LogUnknown;
use crate::gate::AuthorizationGate;
use crate::requests::{
    CreateTenderRequest, EditTenderRequest, ListMineRequest, ListTendersRequest, require, supplied,
};
use crate::versioning;
use crate::views::TenderView;

pub struct TenderService<U: UserRepository, O: OrganizationRepository, T: TenderRepository> {
    gate: AuthorizationGate<U, O>,
    tenders: T,
    config: EngineConfig,
}

impl<U, O, T> TenderService<U, O, T>
where
    U: UserRepository,
    O: OrganizationRepository,
    T: TenderRepository,
{
    pub fn new(gate: AuthorizationGate<U, O>, tenders: T, config: EngineConfig) -> Self {
        Self {
            gate,
            tenders,
            config,
        }
    }

    /// Resolve the user and the tender, and require the user to act for
    /// the tender's organization.
    async fn authorize(&self, tender_id: Uuid, username: &str) -> TenderHubResult<(User, Tender)> {
        let user = self.gate.resolve_user(username).await?;
        let tender = self.tenders.get_by_id(tender_id).await?;
        self.gate
            .require_responsible(tender.organization_id, &user)
            .await?;
        Ok((user, tender))
    }

    pub async fn create_tender(&self, request: CreateTenderRequest) -> TenderHubResult<TenderView> {
        let result: TenderHubResult<TenderView> = async {
            require("name", &request.name)?;
            require("serviceType", &request.service_type)?;
            require("status", &request.status)?;
            let status = TenderStatus::parse(&request.status)?;

            let user = self.gate.resolve_user(&request.creator_username).await?;
            self.gate
                .require_responsible(request.organization_id, &user)
                .await?;

            let tender = self
                .tenders
                .create(CreateTender {
                    organization_id: request.organization_id,
                    creator_id: user.id,
                    status,
                    service_type: request.service_type,
                    name: request.name,
                    description: request.description,
                })
                .await?;

            info!(
                tender_id = %tender.id,
                organization_id = %tender.organization_id,
                creator = %user.username,
                "Tender created"
            );
            Ok(tender.into())
        }
        .await;
        result.log_unknown("create_tender")
    }

    /// Published tenders, optionally narrowed to some service types.
    /// Needs no identity.
    pub async fn list_published(
        &self,
        request: ListTendersRequest,
    ) -> TenderHubResult<Vec<TenderView>> {
        let pagination = self.config.page(request.limit, request.offset);
        let filter = TenderFilter {
            service_types: request.service_types,
        };
        self.tenders
            .list_published(filter, pagination)
            .await
            .map(|tenders| tenders.into_iter().map(TenderView::from).collect::<Vec<_>>())
            .log_unknown("list_published_tenders")
    }

    pub async fn list_mine(&self, request: ListMineRequest) -> TenderHubResult<Vec<TenderView>> {
        let result: TenderHubResult<Vec<TenderView>> = async {
            let user = self.gate.resolve_user(&request.username).await?;
            let pagination = self.config.page(request.limit, request.offset);
            let tenders = self.tenders.list_by_creator(user.id, pagination).await?;
            Ok(tenders.into_iter().map(TenderView::from).collect::<Vec<_>>())
        }
        .await;
        result.log_unknown("list_my_tenders")
    }

    /// A published tender's status is public to any known user; other
    /// statuses only to the organization's responsible users.
    pub async fn get_status(&self, tender_id: Uuid, username: &str) -> TenderHubResult<TenderStatus> {
        let result: TenderHubResult<TenderStatus> = async {
            let user = self.gate.resolve_user(username).await?;
            let tender = self.tenders.get_by_id(tender_id).await?;
            if tender.status != TenderStatus::Published {
                self.gate
                    .require_responsible(tender.organization_id, &user)
                    .await?;
            }
            Ok(tender.status)
        }
        .await;
        result.log_unknown("get_tender_status")
    }

    /// The status value is checked before any lookup.
    pub async fn change_status(
        &self,
        tender_id: Uuid,
        status: &str,
        username: &str,
    ) -> TenderHubResult<TenderView> {
        let result: TenderHubResult<TenderView> = async {
            let status = TenderStatus::parse(status)?;
            let (user, tender) = self.authorize(tender_id, username).await?;

            let updated = self.tenders.set_status(tender.id, status).await?;
            info!(
                %tender_id,
                from = tender.status.as_str(),
                to = status.as_str(),
                by = %user.username,
                "Tender status changed"
            );
            Ok(updated.into())
        }
        .await;
        result.log_unknown("change_tender_status")
    }

    pub async fn edit(&self, request: EditTenderRequest) -> TenderHubResult<TenderView> {
        let result: TenderHubResult<TenderView> = async {
            let (_, tender) = self.authorize(request.tender_id, &request.username).await?;
            let patch = TenderPatch {
                name: supplied(request.name),
                description: supplied(request.description),
                service_type: supplied(request.service_type),
            };
            let edited = versioning::edit(&self.tenders, &tender, patch).await?;
            Ok(edited.into())
        }
        .await;
        result.log_unknown("edit_tender")
    }

    pub async fn rollback(
        &self,
        tender_id: Uuid,
        version: u32,
        username: &str,
    ) -> TenderHubResult<TenderView> {
        let result: TenderHubResult<TenderView> = async {
            let (_, tender) = self.authorize(tender_id, username).await?;
            let restored = versioning::roll_back(&self.tenders, &tender, version).await?;
            Ok(restored.into())
        }
        .await;
        result.log_unknown("rollback_tender")
    }

    pub async fn history(
        &self,
        tender_id: Uuid,
        version: u32,
        username: &str,
    ) -> TenderHubResult<TenderSnapshot> {
        let result: TenderHubResult<TenderSnapshot> = async {
            let (_, tender) = self.authorize(tender_id, username).await?;
            self.tenders.get_history(tender.id, version).await
        }
        .await;
        result.log_unknown("get_tender_history")
    }
}
