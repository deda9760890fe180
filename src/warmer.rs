//! Cache Warmer Module
//!
//! Proactive warm-population at lifecycle points, so the read path that
//! immediately follows (the post-login dashboard, the fresh project view)
//! observes a warm cache instead of a cold-miss storm.
//!
//! Each `warm_*` method spawns a detached task and returns its handle; the
//! triggering operation never waits on warming, and a loader failure is
//! logged and swallowed, never surfaced.

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::UnifiedCache;
use crate::keys::{self, ttl_for, Entity};

// == Cache Warmer ==
/// Warm-population over a shared cache instance.
///
/// Loaders are collaborator-supplied factories (database reads) producing
/// the payload for one hot key each.
pub struct CacheWarmer {
    cache: Arc<UnifiedCache>,
}

impl CacheWarmer {
    // == Constructor ==
    pub fn new(cache: Arc<UnifiedCache>) -> Self {
        Self { cache }
    }

    // == User Login ==
    /// Preloads the keys a freshly logged-in user is about to read: the
    /// flattened permission set and the project-id list.
    ///
    /// Returns the handle of the detached warm task.
    pub fn warm_user_login<P, PFut, L, LFut>(
        &self,
        user_id: &str,
        load_permissions: P,
        load_projects: L,
    ) -> JoinHandle<()>
    where
        P: FnOnce() -> PFut + Send + 'static,
        PFut: Future<Output = anyhow::Result<Value>> + Send,
        L: FnOnce() -> LFut + Send + 'static,
        LFut: Future<Output = anyhow::Result<Value>> + Send,
    {
        let cache = self.cache.clone();
        let user_id = user_id.to_string();

        tokio::spawn(async move {
            warm_one(
                &cache,
                &keys::user_permissions(&user_id),
                ttl_for(Entity::UserPermissions),
                load_permissions,
            )
            .await;
            warm_one(
                &cache,
                &keys::user_projects(&user_id),
                ttl_for(Entity::UserProjects),
                load_projects,
            )
            .await;
            debug!(user_id = %user_id, "login warm complete");
        })
    }

    // == Project Creation ==
    /// Preloads a just-created project's phase and member lists.
    ///
    /// Returns the handle of the detached warm task.
    pub fn warm_project_created<P, PFut, M, MFut>(
        &self,
        project_id: &str,
        load_phases: P,
        load_members: M,
    ) -> JoinHandle<()>
    where
        P: FnOnce() -> PFut + Send + 'static,
        PFut: Future<Output = anyhow::Result<Value>> + Send,
        M: FnOnce() -> MFut + Send + 'static,
        MFut: Future<Output = anyhow::Result<Value>> + Send,
    {
        let cache = self.cache.clone();
        let project_id = project_id.to_string();

        tokio::spawn(async move {
            warm_one(
                &cache,
                &keys::project_phases(&project_id),
                ttl_for(Entity::ProjectPhases),
                load_phases,
            )
            .await;
            warm_one(
                &cache,
                &keys::project_members(&project_id),
                ttl_for(Entity::ProjectMembers),
                load_members,
            )
            .await;
            debug!(project_id = %project_id, "project warm complete");
        })
    }
}

// == Warm One Key ==
/// Runs one `get_or_set` for a hot key, logging and swallowing any loader
/// failure.
async fn warm_one<F, Fut>(cache: &UnifiedCache, key: &str, ttl_seconds: u64, loader: F)
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = anyhow::Result<Value>>,
{
    if let Err(e) = cache.get_or_set(key, ttl_seconds, loader).await {
        warn!(key = %key, error = %e, "cache warm failed");
    }
}
