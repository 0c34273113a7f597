//! Shared state handed to every endpoint.

use std::sync::Arc;

use chrono::Duration;

use crate::accounts::AccountManager;
use crate::auth::SessionGuard;
use crate::config::ServerConfig;
use crate::crypto::{CredentialStore, CryptoError, TokenSigner};
use crate::leaderboard::LeaderboardService;
use crate::live::LiveSessionRegistry;
use crate::rpg::RpgProgressService;
use crate::storage::GameStore;

pub struct AppState {
    pub config: ServerConfig,
    pub accounts: AccountManager,
    pub guard: SessionGuard,
    pub leaderboard: LeaderboardService,
    pub live: LiveSessionRegistry,
    pub rpg: RpgProgressService,
}

impl AppState {
    /// Wires every service onto the given store.
    pub fn new(config: ServerConfig, store: Arc<dyn GameStore>) -> Result<Self, CryptoError> {
        let accounts = AccountManager::new(store.clone(), CredentialStore::new()?);
        let ttl = Duration::try_days(config.token_ttl_days)
            .ok_or_else(|| CryptoError::Encode("token_ttl_days out of range".to_string()))?;
        let signer = TokenSigner::new(&config.secret_key, ttl);

        Ok(Self {
            guard: SessionGuard::new(signer, accounts.clone()),
            accounts,
            leaderboard: LeaderboardService::new(store.clone()),
            live: LiveSessionRegistry::new(store.clone()),
            rpg: RpgProgressService::new(store),
            config,
        })
    }
}
