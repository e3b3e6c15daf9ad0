use crate::db::Store;
use crate::services::{
    CatalogService, ReviewLedger, SessionService, StatisticsService, SystemService,
};

/// Every component built over one shared store handle.
#[derive(Clone, Debug)]
pub struct AppState {
    store: Store,
    sessions: SessionService,
    reviews: ReviewLedger,
    statistics: StatisticsService,
    system: SystemService,
    catalog: CatalogService,
}

impl AppState {
    pub fn new(store: Store) -> Self {
        Self {
            sessions: SessionService::new(store.clone()),
            reviews: ReviewLedger::new(store.clone()),
            statistics: StatisticsService::new(store.clone()),
            system: SystemService::new(store.clone()),
            catalog: CatalogService::new(store.clone()),
            store,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn sessions(&self) -> &SessionService {
        &self.sessions
    }

    pub fn reviews(&self) -> &ReviewLedger {
        &self.reviews
    }

    pub fn statistics(&self) -> &StatisticsService {
        &self.statistics
    }

    pub fn system(&self) -> &SystemService {
        &self.system
    }

    pub fn catalog(&self) -> &CatalogService {
        &self.catalog
    }
}
