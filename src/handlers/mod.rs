pub mod admin;
pub mod common;
pub mod feeds;
pub mod logs;
pub mod snapshot;
pub mod stock;
pub mod transfers;
pub mod trucks;

use crate::events::EventSender;
use crate::services::{
    AuditLog, CatalogService, DirectTransferService, TruckMovementService, WarehouseLedger,
};
use crate::store::DocumentStore;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub ledger: Arc<WarehouseLedger>,
    pub catalog: Arc<CatalogService>,
    pub movements: Arc<TruckMovementService>,
    pub transfers: Arc<DirectTransferService>,
    pub audit: Arc<AuditLog>,
}

impl AppServices {
    /// Wires every service over one document store and event channel.
    pub fn new(store: Arc<dyn DocumentStore>, event_sender: EventSender) -> Self {
        let ledger = WarehouseLedger::new(store.clone(), event_sender.clone());
        let audit = AuditLog::new(store.clone());
        let catalog = CatalogService::new(store.clone(), ledger.clone(), event_sender.clone());
        let movements = TruckMovementService::new(
            store.clone(),
            ledger.clone(),
            audit.clone(),
            event_sender.clone(),
        );
        let transfers = DirectTransferService::new(store, audit.clone(), event_sender);

        Self {
            ledger: Arc::new(ledger),
            catalog: Arc::new(catalog),
            movements: Arc::new(movements),
            transfers: Arc::new(transfers),
            audit: Arc::new(audit),
        }
    }
}
