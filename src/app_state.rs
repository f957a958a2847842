// =============================================================================
// Central Application State
// =============================================================================
//
// Shared by every HTTP handler via `Arc<AppState>`. The runtime config sits
// behind a parking_lot RwLock; batches clone a snapshot of it and never hold
// the lock across an await.
// =============================================================================

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::market_data::BarProvider;
use crate::orchestrator::BatchOrchestrator;
use crate::runtime_config::RuntimeConfig;
use crate::types::ScoringProfile;

pub struct AppState {
    pub runtime_config: RwLock<RuntimeConfig>,
    pub provider: Arc<dyn BarProvider>,
    /// Where config updates are persisted. `None` keeps them in memory only.
    pub config_path: Option<PathBuf>,
    /// Incremented on every config update.
    config_version: AtomicU64,
    batches_served: AtomicU64,
}

impl AppState {
    pub fn new(config: RuntimeConfig, provider: Arc<dyn BarProvider>, config_path: Option<PathBuf>) -> Self {
        Self {
            runtime_config: RwLock::new(config),
            provider,
            config_path,
            config_version: AtomicU64::new(0),
            batches_served: AtomicU64::new(0),
        }
    }

    pub fn config_snapshot(&self) -> RuntimeConfig {
        self.runtime_config.read().clone()
    }

    /// Orchestrator for one batch, bound to the current config snapshot.
    /// `profile` overrides the configured scoring profile.
    pub fn orchestrator(&self, profile: Option<ScoringProfile>) -> BatchOrchestrator {
        let config = self.runtime_config.read();
        let profile = profile.unwrap_or(config.scoring_profile);
        self.batches_served.fetch_add(1, Ordering::Relaxed);
        BatchOrchestrator::from_config(Arc::clone(&self.provider), &config, profile)
    }

    pub fn replace_config(&self, config: RuntimeConfig) {
        *self.runtime_config.write() = config;
        self.config_version.fetch_add(1, Ordering::SeqCst);
    }

    pub fn config_version(&self) -> u64 {
        self.config_version.load(Ordering::SeqCst)
    }

    pub fn batches_served(&self) -> u64 {
        self.batches_served.load(Ordering::Relaxed)
    }
}
