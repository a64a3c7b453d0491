// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::Tenant;

/// Key holding the JSON array of registered tenants.
pub const TENANTS_KEY: &str = "salons";
/// Key holding the JSON object of the identity the host should sign in as.
pub const CURRENT_SESSION_KEY: &str = "currentUser";

/// Durable string-to-string storage, shaped like browser local storage.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

/// Typed access to the tenant collection and the current session record.
pub trait TenantStore {
    /// Absent or undecodable data yields an empty collection.
    fn load_tenants(&self) -> Result<Vec<Tenant>>;
    /// Replaces the whole stored collection.
    fn save_tenants(&mut self, tenants: &[Tenant]) -> Result<()>;
    fn set_current_session(&mut self, tenant: &Tenant) -> Result<()>;
    fn current_session(&self) -> Result<Option<Tenant>>;
    fn clear_current_session(&mut self) -> Result<()>;
}

impl<K: KeyValueStore + ?Sized> TenantStore for K {
    fn load_tenants(&self) -> Result<Vec<Tenant>> {
        let Some(raw) = self.get_item(TENANTS_KEY)? else {
            debug!(key = TENANTS_KEY, "no stored tenants");
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<Tenant>>(&raw) {
            Ok(tenants) => {
                debug!(key = TENANTS_KEY, count = tenants.len(), "loaded tenants");
                Ok(tenants)
            }
            Err(error) => {
                warn!(
                    key = TENANTS_KEY,
                    %error,
                    "stored tenant list is not valid JSON; treating it as empty"
                );
                Ok(Vec::new())
            }
        }
    }

    fn save_tenants(&mut self, tenants: &[Tenant]) -> Result<()> {
        let encoded = serde_json::to_string(tenants).context("encode tenant list")?;
        self.set_item(TENANTS_KEY, &encoded)
            .with_context(|| format!("write tenant list under `{TENANTS_KEY}`"))?;
        debug!(key = TENANTS_KEY, count = tenants.len(), "saved tenants");
        Ok(())
    }

    fn set_current_session(&mut self, tenant: &Tenant) -> Result<()> {
        let encoded = serde_json::to_string(tenant).context("encode session record")?;
        self.set_item(CURRENT_SESSION_KEY, &encoded)
            .with_context(|| format!("write session record under `{CURRENT_SESSION_KEY}`"))
    }

    fn current_session(&self) -> Result<Option<Tenant>> {
        let Some(raw) = self.get_item(CURRENT_SESSION_KEY)? else {
            return Ok(None);
        };
        let tenant = serde_json::from_str(&raw).with_context(|| {
            format!(
                "session record under `{CURRENT_SESSION_KEY}` is not a tenant object; run `salonadmin --logout` to clear it"
            )
        })?;
        Ok(Some(tenant))
    }

    fn clear_current_session(&mut self) -> Result<()> {
        self.remove_item(CURRENT_SESSION_KEY)
            .with_context(|| format!("remove session record under `{CURRENT_SESSION_KEY}`"))
    }
}
