//! Business logic services

pub mod catalog;
pub mod events;
pub mod favorites;
pub mod loans;
pub mod users;

use crate::{
    config::{AuthConfig, LendingConfig},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub repository: Repository,
    pub users: users::UsersService,
    pub catalog: catalog::CatalogService,
    pub loans: loans::LoansService,
    pub favorites: favorites::FavoritesService,
    pub events: events::LendingEvents,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig, lending_config: LendingConfig) -> Self {
        let events = events::LendingEvents::new();

        Self {
            users: users::UsersService::new(repository.clone(), auth_config),
            catalog: catalog::CatalogService::new(repository.clone(), events.clone()),
            loans: loans::LoansService::new(
                repository.clone(),
                events.clone(),
                lending_config.default_loan_days,
            ),
            favorites: favorites::FavoritesService::new(repository.clone(), events.clone()),
            events,
            repository,
        }
    }
}
