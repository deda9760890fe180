//! Invalidation Module
//!
//! Per-mutation purge functions: each removes an entity's own cache
//! entries plus every entry statically known to derive from it.
//!
//! Every function here is idempotent (safe to call repeatedly or for an
//! entity that was never cached), non-throwing (tier failures are already
//! contained below this layer), and best-effort: where the full derived
//! key set cannot be enumerated, the miss is logged as an accepted
//! eventual-consistency gap and the TTL bounds the staleness.
//!
//! Callers on a request path typically `tokio::spawn` these so the
//! triggering write never waits on fan-out.

use std::sync::Arc;

use tracing::{debug, info};

use crate::cache::UnifiedCache;
use crate::keys;

// == Invalidation Engine ==
/// Fan-out invalidation over a shared cache instance.
pub struct InvalidationEngine {
    cache: Arc<UnifiedCache>,
}

impl InvalidationEngine {
    // == Constructor ==
    pub fn new(cache: Arc<UnifiedCache>) -> Self {
        Self { cache }
    }

    // == Organization ==
    /// Purges an organization and all of its derived entries
    /// (members, subscription summary).
    pub async fn invalidate_organization(&self, org_id: &str) {
        self.cache.del(&keys::organization(org_id)).await;
        self.cache.del(&keys::organization_members(org_id)).await;
        self.cache.del(&keys::organization_subscription(org_id)).await;
        // Sweep any remaining org-scoped sub-resources in the local tier
        self.cache.invalidate(&keys::organization(org_id)).await;
        debug!(org_id = %org_id, "organization caches invalidated");
    }

    // == User ==
    /// Purges a user's record and every per-user derived entry
    /// (permissions, project list, notification feed).
    pub async fn invalidate_user(&self, user_id: &str) {
        self.cache.del(&keys::user(user_id)).await;
        self.cache.del(&keys::user_permissions(user_id)).await;
        self.cache.del(&keys::user_projects(user_id)).await;
        self.cache.del(&keys::user_notifications(user_id)).await;
        self.cache.invalidate(&keys::user(user_id)).await;
        debug!(user_id = %user_id, "user caches invalidated");
    }

    // == Project ==
    /// Purges a project and its sub-resources, plus the project-id lists
    /// of the members that embed it.
    ///
    /// `member_ids` is whatever membership the caller has at hand; members
    /// it does not name keep a stale project list until its TTL lapses.
    pub async fn invalidate_project(&self, project_id: &str, member_ids: &[String]) {
        self.cache.del(&keys::project(project_id)).await;
        self.cache.del(&keys::project_phases(project_id)).await;
        self.cache.del(&keys::project_members(project_id)).await;
        self.cache.invalidate(&keys::project(project_id)).await;

        for member_id in member_ids {
            self.cache.del(&keys::user_projects(member_id)).await;
        }
        debug!(
            project_id = %project_id,
            members = member_ids.len(),
            "project caches invalidated"
        );
    }

    // == Role ==
    /// Purges a role and the permission caches of every user holding it.
    ///
    /// Holders not named in `holder_ids` keep their flattened permission
    /// set until its TTL lapses.
    pub async fn invalidate_role(&self, role_id: &str, holder_ids: &[String]) {
        self.cache.del(&keys::role(role_id)).await;
        self.cache.del(&keys::role_permissions(role_id)).await;

        for holder_id in holder_ids {
            self.cache.del(&keys::user_permissions(holder_id)).await;
        }
        debug!(
            role_id = %role_id,
            holders = holder_ids.len(),
            "role caches invalidated"
        );
    }

    // == Subscription ==
    /// Purges a subscription and its package list, plus the owning
    /// organization's subscription summary when the caller knows it.
    pub async fn invalidate_subscription(&self, subscription_id: &str, org_id: Option<&str>) {
        self.cache.del(&keys::subscription(subscription_id)).await;
        self.cache.del(&keys::subscription_packages(subscription_id)).await;

        if let Some(org_id) = org_id {
            self.cache.del(&keys::organization_subscription(org_id)).await;
        }
        debug!(subscription_id = %subscription_id, "subscription caches invalidated");
    }

    // == Package ==
    /// Purges a package and every subscription-level cache referencing it.
    ///
    /// When the caller can enumerate the referencing subscriptions, only
    /// those are purged. With an empty list the reverse mapping is
    /// unknown, so the whole subscription keyspace is swept: a prefix
    /// purge locally and a pattern scan remotely. The remote scan walks
    /// the entire keyspace and is the one deliberately expensive fan-out
    /// in this module.
    pub async fn invalidate_package(&self, package_id: &str, subscription_ids: &[String]) {
        self.cache.del(&keys::package(package_id)).await;

        if subscription_ids.is_empty() {
            let local = self.cache.invalidate(keys::all_subscriptions_prefix()).await;
            let remote = self
                .cache
                .remote()
                .del_pattern(keys::all_subscriptions_pattern())
                .await;
            info!(
                package_id = %package_id,
                local, remote,
                "package fan-out swept all subscription caches"
            );
        } else {
            for subscription_id in subscription_ids {
                self.cache.del(&keys::subscription(subscription_id)).await;
                self.cache
                    .del(&keys::subscription_packages(subscription_id))
                    .await;
            }
            debug!(
                package_id = %package_id,
                subscriptions = subscription_ids.len(),
                "package caches invalidated"
            );
        }
    }

    // == Notification ==
    /// Purges a user's notification feed after a notification mutation.
    pub async fn invalidate_notifications(&self, user_id: &str) {
        self.cache.del(&keys::user_notifications(user_id)).await;
        debug!(user_id = %user_id, "notification feed invalidated");
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{LocalCache, RemoteCache};

    fn engine() -> (Arc<UnifiedCache>, InvalidationEngine) {
        let cache = UnifiedCache::new(LocalCache::new(100), RemoteCache::null(), 300);
        (cache.clone(), InvalidationEngine::new(cache))
    }

    #[tokio::test]
    async fn test_invalidate_user_purges_derived_keys() {
        let (cache, engine) = engine();

        cache.set(&keys::user("42"), &"u", 300).await;
        cache.set(&keys::user_permissions("42"), &"p", 300).await;
        cache.set(&keys::user_projects("42"), &"pr", 300).await;
        cache.set(&keys::user("43"), &"other", 300).await;

        engine.invalidate_user("42").await;

        assert_eq!(cache.get::<String>(&keys::user("42")).await, None);
        assert_eq!(cache.get::<String>(&keys::user_permissions("42")).await, None);
        assert_eq!(cache.get::<String>(&keys::user_projects("42")).await, None);
        assert!(cache.get::<String>(&keys::user("43")).await.is_some());
    }

    #[tokio::test]
    async fn test_invalidate_user_is_idempotent() {
        let (_, engine) = engine();

        // Never cached, called twice: must not fail or panic
        engine.invalidate_user("42").await;
        engine.invalidate_user("42").await;
    }

    #[tokio::test]
    async fn test_invalidate_project_purges_member_lists() {
        let (cache, engine) = engine();

        cache.set(&keys::project("9"), &"p", 300).await;
        cache.set(&keys::project_phases("9"), &"ph", 300).await;
        cache.set(&keys::user_projects("1"), &"list", 300).await;
        cache.set(&keys::user_projects("2"), &"list", 300).await;
        cache.set(&keys::user_projects("3"), &"list", 300).await;

        engine
            .invalidate_project("9", &["1".to_string(), "2".to_string()])
            .await;

        assert_eq!(cache.get::<String>(&keys::project("9")).await, None);
        assert_eq!(cache.get::<String>(&keys::project_phases("9")).await, None);
        assert_eq!(cache.get::<String>(&keys::user_projects("1")).await, None);
        assert_eq!(cache.get::<String>(&keys::user_projects("2")).await, None);
        // Unenumerated member keeps its list until TTL; accepted gap
        assert!(cache.get::<String>(&keys::user_projects("3")).await.is_some());
    }

    #[tokio::test]
    async fn test_invalidate_role_purges_holder_permissions() {
        let (cache, engine) = engine();

        cache.set(&keys::role("3"), &"r", 300).await;
        cache.set(&keys::role_permissions("3"), &"rp", 300).await;
        cache.set(&keys::user_permissions("1"), &"p1", 300).await;
        cache.set(&keys::user_permissions("2"), &"p2", 300).await;

        engine.invalidate_role("3", &["1".to_string()]).await;

        assert_eq!(cache.get::<String>(&keys::role("3")).await, None);
        assert_eq!(cache.get::<String>(&keys::role_permissions("3")).await, None);
        assert_eq!(cache.get::<String>(&keys::user_permissions("1")).await, None);
        assert!(cache.get::<String>(&keys::user_permissions("2")).await.is_some());
    }

    #[tokio::test]
    async fn test_invalidate_package_with_known_subscriptions() {
        let (cache, engine) = engine();

        cache.set(&keys::package("11"), &"pkg", 300).await;
        cache.set(&keys::subscription("5"), &"s", 300).await;
        cache.set(&keys::subscription_packages("5"), &"sp", 300).await;
        cache.set(&keys::subscription("6"), &"other", 300).await;

        engine.invalidate_package("11", &["5".to_string()]).await;

        assert_eq!(cache.get::<String>(&keys::package("11")).await, None);
        assert_eq!(cache.get::<String>(&keys::subscription("5")).await, None);
        assert_eq!(cache.get::<String>(&keys::subscription_packages("5")).await, None);
        assert!(cache.get::<String>(&keys::subscription("6")).await.is_some());
    }

    #[tokio::test]
    async fn test_invalidate_package_unknown_subscriptions_sweeps_all() {
        let (cache, engine) = engine();

        cache.set(&keys::package("11"), &"pkg", 300).await;
        cache.set(&keys::subscription("5"), &"s", 300).await;
        cache.set(&keys::subscription("6"), &"s", 300).await;
        cache.set(&keys::user("1"), &"u", 300).await;

        engine.invalidate_package("11", &[]).await;

        assert_eq!(cache.get::<String>(&keys::subscription("5")).await, None);
        assert_eq!(cache.get::<String>(&keys::subscription("6")).await, None);
        // Unrelated entries survive the sweep
        assert!(cache.get::<String>(&keys::user("1")).await.is_some());
    }

    #[tokio::test]
    async fn test_invalidate_subscription_with_org() {
        let (cache, engine) = engine();

        cache.set(&keys::subscription("5"), &"s", 300).await;
        cache.set(&keys::organization_subscription("7"), &"os", 300).await;

        engine.invalidate_subscription("5", Some("7")).await;

        assert_eq!(cache.get::<String>(&keys::subscription("5")).await, None);
        assert_eq!(
            cache.get::<String>(&keys::organization_subscription("7")).await,
            None
        );
    }

    #[tokio::test]
    async fn test_invalidate_notifications() {
        let (cache, engine) = engine();

        cache.set(&keys::user_notifications("42"), &"feed", 300).await;

        engine.invalidate_notifications("42").await;

        assert_eq!(cache.get::<String>(&keys::user_notifications("42")).await, None);
    }
}
