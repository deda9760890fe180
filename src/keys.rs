//! Key Registry Module
//!
//! Canonical cache key construction and the TTL policy table.
//!
//! Keys are colon-delimited hierarchical strings (`entity:id[:subresource]`)
//! and are produced only here; callers never hand-build keys. Sub-resource
//! keys share their entity's prefix so a single prefix invalidation purges
//! an entity's entire derived set.
//!
//! TTLs are chosen per entity type, not per call, so staleness behavior is
//! a deliberate, documented tradeoff rather than call-site discretion.

// == Volatility Tiers ==
/// Seconds for highly volatile data
pub const TTL_SHORT: u64 = 30;
/// Seconds for moderately volatile data
pub const TTL_MEDIUM: u64 = 300;
/// Seconds for slowly changing data
pub const TTL_LONG: u64 = 3600;
/// Seconds for near-static data
pub const TTL_VERY_LONG: u64 = 86400;

// == Entity Kinds ==
/// Cacheable entity types with an assigned volatility class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Organization,
    User,
    UserPermissions,
    UserProjects,
    Project,
    ProjectPhases,
    ProjectMembers,
    Role,
    Subscription,
    SubscriptionPackages,
    Package,
    NotificationFeed,
}

// == TTL Policy ==
/// Returns the TTL in seconds for an entity type.
///
/// The assignment per entity:
/// - Organizations, roles and packages change through rare administrative
///   action: LONG, with packages VERY_LONG (catalog data, invalidated
///   explicitly on edit).
/// - User records and project structure change during normal work: MEDIUM.
/// - Permission sets are read on nearly every request and are purged
///   eagerly on role changes, so they can ride LONG.
/// - Membership lists churn with team edits: MEDIUM.
/// - Notification feeds must feel live: a bespoke 60s, twice SHORT, since
///   feeds also get purged on every new notification anyway.
pub fn ttl_for(entity: Entity) -> u64 {
    match entity {
        Entity::Organization => TTL_LONG,
        Entity::User => TTL_MEDIUM,
        Entity::UserPermissions => TTL_LONG,
        Entity::UserProjects => TTL_MEDIUM,
        Entity::Project => TTL_MEDIUM,
        Entity::ProjectPhases => TTL_MEDIUM,
        Entity::ProjectMembers => TTL_MEDIUM,
        Entity::Role => TTL_LONG,
        Entity::Subscription => TTL_LONG,
        Entity::SubscriptionPackages => TTL_LONG,
        Entity::Package => TTL_VERY_LONG,
        Entity::NotificationFeed => 60,
    }
}

// == Key Builders ==
/// `org:<id>`
pub fn organization(org_id: &str) -> String {
    format!("org:{}", org_id)
}

/// `org:<id>:members`
pub fn organization_members(org_id: &str) -> String {
    format!("org:{}:members", org_id)
}

/// `org:<id>:subscription` - the organization's active subscription summary
pub fn organization_subscription(org_id: &str) -> String {
    format!("org:{}:subscription", org_id)
}

/// `user:<id>`
pub fn user(user_id: &str) -> String {
    format!("user:{}", user_id)
}

/// `user:<id>:permissions` - flattened permission set across roles
pub fn user_permissions(user_id: &str) -> String {
    format!("user:{}:permissions", user_id)
}

/// `user:<id>:projects` - the user's project-id list
pub fn user_projects(user_id: &str) -> String {
    format!("user:{}:projects", user_id)
}

/// `user:<id>:notifications` - the user's notification feed
pub fn user_notifications(user_id: &str) -> String {
    format!("user:{}:notifications", user_id)
}

/// `project:<id>`
pub fn project(project_id: &str) -> String {
    format!("project:{}", project_id)
}

/// `project:<id>:phases`
pub fn project_phases(project_id: &str) -> String {
    format!("project:{}:phases", project_id)
}

/// `project:<id>:members`
pub fn project_members(project_id: &str) -> String {
    format!("project:{}:members", project_id)
}

/// `role:<id>`
pub fn role(role_id: &str) -> String {
    format!("role:{}", role_id)
}

/// `role:<id>:permissions`
pub fn role_permissions(role_id: &str) -> String {
    format!("role:{}:permissions", role_id)
}

/// `subscription:<id>`
pub fn subscription(subscription_id: &str) -> String {
    format!("subscription:{}", subscription_id)
}

/// `subscription:<id>:packages` - packages bundled into the subscription
pub fn subscription_packages(subscription_id: &str) -> String {
    format!("subscription:{}:packages", subscription_id)
}

/// `package:<id>`
pub fn package(package_id: &str) -> String {
    format!("package:{}", package_id)
}

/// Glob pattern matching every subscription-level key; remote fan-out only.
pub fn all_subscriptions_pattern() -> &'static str {
    "subscription:*"
}

/// Prefix covering every subscription-level key in the local tier.
pub fn all_subscriptions_prefix() -> &'static str {
    "subscription:"
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_shapes() {
        assert_eq!(organization("7"), "org:7");
        assert_eq!(organization_members("7"), "org:7:members");
        assert_eq!(organization_subscription("7"), "org:7:subscription");
        assert_eq!(user("42"), "user:42");
        assert_eq!(user_permissions("42"), "user:42:permissions");
        assert_eq!(user_projects("42"), "user:42:projects");
        assert_eq!(user_notifications("42"), "user:42:notifications");
        assert_eq!(project("9"), "project:9");
        assert_eq!(project_phases("9"), "project:9:phases");
        assert_eq!(project_members("9"), "project:9:members");
        assert_eq!(role("3"), "role:3");
        assert_eq!(role_permissions("3"), "role:3:permissions");
        assert_eq!(subscription("5"), "subscription:5");
        assert_eq!(subscription_packages("5"), "subscription:5:packages");
        assert_eq!(package("11"), "package:11");
    }

    #[test]
    fn test_subresources_share_entity_prefix() {
        // Prefix invalidation of the entity key must cover its sub-resources
        assert!(project_phases("42").starts_with(&project("42")));
        assert!(project_members("42").starts_with(&project("42")));
        assert!(user_permissions("1").starts_with(&user("1")));
        assert!(subscription_packages("5").starts_with(&subscription("5")));
    }

    #[test]
    fn test_sibling_ids_do_not_collide_as_prefixes() {
        assert!(!project("43").starts_with(&project("42")));
    }

    #[test]
    fn test_ttl_policy_table() {
        assert_eq!(ttl_for(Entity::Organization), TTL_LONG);
        assert_eq!(ttl_for(Entity::User), TTL_MEDIUM);
        assert_eq!(ttl_for(Entity::UserPermissions), TTL_LONG);
        assert_eq!(ttl_for(Entity::Package), TTL_VERY_LONG);
        // Bespoke override for notification feeds
        assert_eq!(ttl_for(Entity::NotificationFeed), 60);
    }

    #[test]
    fn test_volatility_tiers_ordered() {
        assert!(TTL_SHORT < TTL_MEDIUM);
        assert!(TTL_MEDIUM < TTL_LONG);
        assert!(TTL_LONG < TTL_VERY_LONG);
    }
}
