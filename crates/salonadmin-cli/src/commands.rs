// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! One-shot commands that run against the store without opening the dashboard.

use anyhow::{Context, Result, bail};
use salonadmin_app::{
    ConfirmGate, DeleteOutcome, ImpersonateOutcome, SessionListener, Tenant, TenantList,
    TenantStore,
};
use std::io::{BufRead, Write};
use tracing::warn;

/// Asks on a terminal-style line reader; anything but `y`/`yes` declines.
pub struct PromptGate<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptGate<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl<R: BufRead, W: Write> ConfirmGate for PromptGate<R, W> {
    fn confirm(&mut self, prompt: &str) -> bool {
        if let Err(error) = write!(self.output, "{prompt} [y/N] ").and_then(|()| self.output.flush())
        {
            warn!(%error, "write confirmation prompt");
            return false;
        }

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(error) => {
                warn!(%error, "read confirmation answer");
                false
            }
        }
    }
}

/// Host side of an impersonation: remembers that the session key changed.
#[derive(Debug, Default)]
struct SessionReload {
    changed: bool,
}

impl SessionListener for SessionReload {
    fn on_session_change(&mut self, _tenant: &Tenant) {
        self.changed = true;
    }
}

pub fn list<S, W>(store: &S, search: Option<&str>, out: &mut W) -> Result<()>
where
    S: TenantStore + ?Sized,
    W: Write,
{
    let mut tenants = TenantList::mount(store)?;
    if let Some(search) = search {
        tenants.set_search(search);
    }

    let view = tenants.filtered_view();
    if view.is_empty() {
        if tenants.tenants().is_empty() {
            writeln!(out, "no tenants registered")?;
        } else {
            writeln!(out, "no tenants match {:?}", tenants.search())?;
        }
    }
    for tenant in view {
        writeln!(
            out,
            "{}\t{}\t{}",
            tenant.email,
            tenant.display_name(),
            tenant.joined_display()
        )?;
    }
    writeln!(out, "{}", salonadmin_tui::metrics_line(&tenants.metrics()))?;
    Ok(())
}

pub fn delete<S, G, W>(store: &mut S, gate: &mut G, email: &str, out: &mut W) -> Result<()>
where
    S: TenantStore + ?Sized,
    G: ConfirmGate + ?Sized,
    W: Write,
{
    let mut tenants = TenantList::mount(&*store)?;
    let outcome = tenants
        .delete_tenant(store, gate, email)
        .with_context(|| format!("delete tenant {email}"))?;

    match outcome {
        DeleteOutcome::Declined => writeln!(out, "cancelled; nothing deleted")?,
        DeleteOutcome::Deleted { removed: 0, .. } => {
            writeln!(out, "no tenant with email {email}; nothing removed")?;
        }
        DeleteOutcome::Deleted { removed, remaining } => {
            writeln!(out, "deleted {email} ({removed} removed, {remaining} remaining)")?;
        }
    }
    Ok(())
}

pub fn impersonate<S, G, W>(store: &mut S, gate: &mut G, email: &str, out: &mut W) -> Result<()>
where
    S: TenantStore + ?Sized,
    G: ConfirmGate + ?Sized,
    W: Write,
{
    let tenants = TenantList::mount(&*store)?;
    let Some(tenant) = tenants.find(email).cloned() else {
        bail!("no tenant with email {email}; run `salonadmin --list` to see registered tenants");
    };

    let mut reload = SessionReload::default();
    let outcome = tenants
        .impersonate(store, gate, &mut reload, &tenant)
        .with_context(|| format!("impersonate {email}"))?;

    match outcome {
        ImpersonateOutcome::Declined => writeln!(out, "cancelled; session unchanged")?,
        ImpersonateOutcome::SessionWritten => {
            if reload.changed {
                report_session(&*store, out)?;
            }
        }
    }
    Ok(())
}

pub fn whoami<S, W>(store: &S, out: &mut W) -> Result<()>
where
    S: TenantStore + ?Sized,
    W: Write,
{
    match store.current_session()? {
        Some(tenant) => writeln!(out, "{} <{}>", tenant.identity_label(), tenant.email)?,
        None => writeln!(out, "no active session")?,
    }
    Ok(())
}

pub fn logout<S, W>(store: &mut S, out: &mut W) -> Result<()>
where
    S: TenantStore + ?Sized,
    W: Write,
{
    store.clear_current_session()?;
    writeln!(out, "signed out")?;
    Ok(())
}

/// Re-reads the session key and prints the identity now active.
pub fn report_session<S, W>(store: &S, out: &mut W) -> Result<()>
where
    S: TenantStore + ?Sized,
    W: Write,
{
    match store.current_session()? {
        Some(tenant) => writeln!(
            out,
            "now signed in as {} <{}>",
            tenant.identity_label(),
            tenant.email
        )?,
        None => writeln!(out, "no active session")?,
    }
    Ok(())
}
