// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use tracing::info;

use crate::{Tenant, TenantList, TenantStore};

/// Asks the admin to approve an action. Returning `false` aborts it.
pub trait ConfirmGate {
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// Receives the identity written by an impersonation so the host can restart
/// its session from the stored record.
pub trait SessionListener {
    fn on_session_change(&mut self, tenant: &Tenant);
}

/// A gate whose answer was collected before the action ran, e.g. from a modal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetAnswer(pub bool);

impl ConfirmGate for PresetAnswer {
    fn confirm(&mut self, _prompt: &str) -> bool {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Declined,
    Deleted { removed: usize, remaining: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImpersonateOutcome {
    Declined,
    SessionWritten,
}

pub fn delete_prompt(email: &str) -> String {
    format!("Delete salon account {email}? This cannot be undone.")
}

pub fn impersonate_prompt(tenant: &Tenant) -> String {
    format!("Log in as {}?", tenant.identity_label())
}

impl TenantList {
    /// Removes every tenant whose email equals `email` once the gate approves.
    ///
    /// The store is written before memory changes, so a failed write leaves
    /// the list as it was.
    pub fn delete_tenant<S, G>(
        &mut self,
        store: &mut S,
        gate: &mut G,
        email: &str,
    ) -> Result<DeleteOutcome>
    where
        S: TenantStore + ?Sized,
        G: ConfirmGate + ?Sized,
    {
        if !gate.confirm(&delete_prompt(email)) {
            return Ok(DeleteOutcome::Declined);
        }

        let remaining: Vec<Tenant> = self
            .tenants()
            .iter()
            .filter(|tenant| tenant.email != email)
            .cloned()
            .collect();
        let removed = self.tenants().len() - remaining.len();

        store.save_tenants(&remaining)?;
        let remaining_count = remaining.len();
        self.replace_tenants(remaining);

        info!(email, removed, remaining = remaining_count, "tenant deleted");
        Ok(DeleteOutcome::Deleted {
            removed,
            remaining: remaining_count,
        })
    }

    /// Writes `tenant` as the current session once the gate approves, then
    /// notifies `listener` exactly once.
    pub fn impersonate<S, G, L>(
        &self,
        store: &mut S,
        gate: &mut G,
        listener: &mut L,
        tenant: &Tenant,
    ) -> Result<ImpersonateOutcome>
    where
        S: TenantStore + ?Sized,
        G: ConfirmGate + ?Sized,
        L: SessionListener + ?Sized,
    {
        if !gate.confirm(&impersonate_prompt(tenant)) {
            return Ok(ImpersonateOutcome::Declined);
        }

        store.set_current_session(tenant)?;
        info!(email = %tenant.email, "impersonation session written");
        listener.on_session_change(tenant);
        Ok(ImpersonateOutcome::SessionWritten)
    }
}
