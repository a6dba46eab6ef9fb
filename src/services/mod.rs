//! Business logic services

pub mod catalog;
pub mod loans;
pub mod members;

use crate::{config::LoansConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    pub members: members::MembersService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, loans_config: LoansConfig) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            members: members::MembersService::new(repository.clone(), loans_config.display_offset()),
            loans: loans::LoansService::new(repository.clone(), loans_config),
            repository,
        }
    }

    /// Check that the database answers
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        self.repository.ping().await
    }
}
