use crate::clients::{CustomerClient, KitchenClient, OwnerClient};
use crate::config::Config;
use crate::framework::{LedgerActor, LedgerClient};
use crate::model::Catalog;
use crate::store::{FileStore, MemoryStore, SnapshotStore};
use std::sync::Arc;
use tracing::{error, info};

/// The main runtime orchestrator for the restaurant ordering system.
///
/// `OrderSystem` is responsible for:
/// - **Store Selection**: A [`FileStore`] when `ledger_dir` is configured, a
///   [`MemoryStore`] otherwise
/// - **Lifecycle Management**: Starting and stopping ledger sessions
/// - **Client Wiring**: Handing each role a client bound to the primary session
///
/// # Example
///
/// ```ignore
/// let mut system = OrderSystem::new(Config::from_env()?);
///
/// system.customer_client.add_item(MenuItemId(1));
/// let order = system.customer_client.place_order().await?;
/// system.kitchen_client.advance(order.id).await?;
/// let totals = system.owner_client.totals().await?;
///
/// system.shutdown().await?;
/// ```
pub struct OrderSystem {
    /// Customer view of the primary session
    pub customer_client: CustomerClient,

    /// Kitchen view of the primary session
    pub kitchen_client: KitchenClient,

    /// Owner view of the primary session
    pub owner_client: OwnerClient,

    config: Config,
    catalog: Arc<Catalog>,
    store: Arc<dyn SnapshotStore>,

    /// Task handles for all running sessions (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl OrderSystem {
    /// Creates the store described by `config` and starts the primary session.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn new(config: Config) -> Self {
        let store: Arc<dyn SnapshotStore> = match &config.ledger_dir {
            Some(dir) => Arc::new(FileStore::new(dir)),
            None => Arc::new(MemoryStore::new()),
        };
        Self::with_store(store, config)
    }

    /// Starts the primary session on an existing store, serving the demo menu.
    pub fn with_store(store: Arc<dyn SnapshotStore>, config: Config) -> Self {
        Self::with_catalog(store, config, Catalog::demo())
    }

    pub fn with_catalog(store: Arc<dyn SnapshotStore>, config: Config, catalog: Catalog) -> Self {
        let catalog = Arc::new(catalog);
        let (actor, client) = LedgerActor::new(&config, Arc::clone(&catalog));
        let handle = tokio::spawn(actor.run(Arc::clone(&store)));
        info!(key = %config.storage_key, persistent = config.ledger_dir.is_some(), "Order system started");

        Self {
            customer_client: CustomerClient::new(client.clone()),
            kitchen_client: KitchenClient::new(client.clone()),
            owner_client: OwnerClient::new(client),
            config,
            catalog,
            store,
            handles: vec![handle],
        }
    }

    /// Starts another session on the same store, like a second browser tab.
    ///
    /// Every client derived from the returned one must be dropped before
    /// [`shutdown`](OrderSystem::shutdown) can complete.
    pub fn open_session(&mut self) -> LedgerClient {
        let (actor, client) = LedgerActor::new(&self.config, Arc::clone(&self.catalog));
        self.handles.push(tokio::spawn(actor.run(Arc::clone(&self.store))));
        info!(sessions = self.handles.len(), "Session opened");
        client
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> Arc<dyn SnapshotStore> {
        Arc::clone(&self.store)
    }

    /// Gracefully shuts down every session.
    ///
    /// Dropping the role clients closes the primary session's channel; each
    /// actor then drains its queue and exits.
    ///
    /// # Returns
    ///
    /// - `Ok(())` if all sessions shut down cleanly
    /// - `Err(String)` if any session task failed or panicked
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        drop(self.customer_client);
        drop(self.kitchen_client);
        drop(self.owner_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Session task failed: {:?}", e);
                return Err(format!("Session task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
