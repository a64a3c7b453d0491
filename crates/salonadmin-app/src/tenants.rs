// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use tracing::info;

use crate::{Tenant, TenantStore};

/// Flat monthly price per tenant used for the revenue estimate.
pub const TENANT_UNIT_PRICE: u64 = 1499;
pub const UPTIME_BADGE: &str = "99.9%";
pub const GROWTH_BADGE: &str = "+12%";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardMetrics {
    pub tenant_count: usize,
    pub revenue_estimate: u64,
    pub uptime: &'static str,
    pub growth: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    Empty,
    AlreadyLoaded,
}

/// In-memory tenant collection plus the search text typed by the admin.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TenantList {
    tenants: Vec<Tenant>,
    search: String,
    loaded: bool,
}

impl TenantList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list and performs its one load from `store`.
    pub fn mount<S: TenantStore + ?Sized>(store: &S) -> Result<Self> {
        let mut list = Self::new();
        list.load(store)?;
        Ok(list)
    }

    /// Reads the stored collection the first time it is called; later calls
    /// do not touch the store.
    pub fn load<S: TenantStore + ?Sized>(&mut self, store: &S) -> Result<LoadOutcome> {
        if self.loaded {
            return Ok(LoadOutcome::AlreadyLoaded);
        }

        let stored = store.load_tenants()?;
        self.loaded = true;
        if stored.is_empty() {
            return Ok(LoadOutcome::Empty);
        }

        info!(count = stored.len(), "tenant list mounted");
        let count = stored.len();
        self.tenants = stored;
        Ok(LoadOutcome::Loaded(count))
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn tenants(&self) -> &[Tenant] {
        &self.tenants
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    pub fn push_search_char(&mut self, ch: char) {
        self.search.push(ch);
    }

    pub fn pop_search_char(&mut self) -> Option<char> {
        self.search.pop()
    }

    pub fn filtered_view(&self) -> Vec<&Tenant> {
        let needle = self.search.to_lowercase();
        self.tenants
            .iter()
            .filter(|tenant| tenant.matches_lowercase(&needle))
            .collect()
    }

    pub fn find(&self, email: &str) -> Option<&Tenant> {
        self.tenants.iter().find(|tenant| tenant.email == email)
    }

    pub fn revenue_estimate(&self) -> u64 {
        self.tenants.len() as u64 * TENANT_UNIT_PRICE
    }

    pub fn metrics(&self) -> DashboardMetrics {
        DashboardMetrics {
            tenant_count: self.tenants.len(),
            revenue_estimate: self.revenue_estimate(),
            uptime: UPTIME_BADGE,
            growth: GROWTH_BADGE,
        }
    }

    pub(crate) fn replace_tenants(&mut self, tenants: Vec<Tenant>) {
        self.tenants = tenants;
    }
}
