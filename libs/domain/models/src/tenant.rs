// [libs/domain/models/src/tenant.rs]
use serde::{Deserialize, Serialize};

/// A bank or lender the core pulls loan data for. Tenants are provisioned
/// out of band (see `sync-seed`) and never created by the sync pipeline
/// itself. Immutable across the lifetime of one sync (spec.md §3).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: i64,
    /// Stable slug, stored lower-case; the `tenant_id` of spec.md §3 is this
    /// value upper-cased on demand via [`Tenant::wire_id`].
    pub slug: String,
    pub display_name: String,
    pub base_url: String,
    /// Optional bearer token sent as `Authorization: Bearer <token>` on
    /// every upstream call. `None` means the upstream endpoint requires no
    /// auth of its own (distinct from the inbound `api_key_hash`, which
    /// authenticates operators calling *into* this system).
    pub upstream_bearer: Option<String>,
    /// SHA-256 hex digest of the tenant's inbound API key. The plaintext
    /// key is shown once at provisioning time and never persisted
    /// (spec.md §3 invariant: "api_token_hash is never the raw token").
    pub api_key_hash: String,
    pub is_active: bool,
}

impl Tenant {
    pub fn is_usable(&self) -> bool {
        self.is_active && !self.base_url.is_empty()
    }

    /// The upper-case `tenant_id` form injected into rows and compared
    /// against upstream `tenant` query parameters.
    pub fn wire_id(&self) -> String {
        self.slug.to_ascii_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_id_is_uppercased_slug() {
        let tenant = Tenant {
            id: 1,
            slug: "acme".into(),
            display_name: "Acme Bank".into(),
            base_url: "https://acme.example".into(),
            upstream_bearer: None,
            api_key_hash: "deadbeef".into(),
            is_active: true,
        };
        assert_eq!(tenant.wire_id(), "ACME");
    }
}
