// [apps/orchestrator/src/auth.rs]
use sha2::{Digest, Sha256};
use sync_domain_models::Tenant;
use sync_infra_metadata::TenantRepository;

use crate::errors::ApiError;

/// Hex-encoded SHA-256 of `key`, the same digest stored as
/// `tenants.api_key_hash`.
pub fn hash_api_key(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    hex::encode(digest)
}

/// Resolves the calling tenant from a raw `X-API-Key` value (spec.md §6:
/// "Authentication resolves the tenant via constant-time comparison of
/// SHA-256(hex) of the presented key against `api_token_hash` of an active
/// Tenant row"). The caller never names which tenant it is — only the key
/// says, and an inactive tenant's key is rejected the same as an unknown one.
pub async fn authenticate(tenants: &TenantRepository, provided_key: &str) -> Result<Tenant, ApiError> {
    let provided_hash = hash_api_key(provided_key);
    tenants
        .find_by_api_key_hash(&provided_hash)
        .await?
        .filter(Tenant::is_usable)
        .ok_or(ApiError::Unauthorized)
}

/// Compares a caller-supplied key against one already-known tenant's stored
/// hash in constant time. Exposed for callers that have already resolved a
/// tenant by some other means (e.g. the CLI seed tool verifying a freshly
/// minted key).
pub fn verify_api_key(tenant: &Tenant, provided_key: &str) -> Result<(), ApiError> {
    use subtle::ConstantTimeEq;
    let provided_hash = hash_api_key(provided_key);
    let matches: bool = provided_hash
        .as_bytes()
        .ct_eq(tenant.api_key_hash.as_bytes())
        .into();
    if matches && tenant.is_usable() {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant(hash: &str, active: bool) -> Tenant {
        Tenant {
            id: 1,
            slug: "acme".into(),
            display_name: "Acme Bank".into(),
            base_url: "https://acme.example".into(),
            upstream_bearer: None,
            api_key_hash: hash.into(),
            is_active: active,
        }
    }

    #[test]
    fn accepts_the_correct_key() {
        let hash = hash_api_key("secret-key");
        assert!(verify_api_key(&tenant(&hash, true), "secret-key").is_ok());
    }

    #[test]
    fn rejects_a_wrong_key() {
        let hash = hash_api_key("secret-key");
        assert!(verify_api_key(&tenant(&hash, true), "wrong-key").is_err());
    }

    #[test]
    fn rejects_an_inactive_tenant_even_with_the_right_key() {
        let hash = hash_api_key("secret-key");
        assert!(verify_api_key(&tenant(&hash, false), "secret-key").is_err());
    }
}
