// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use crate::{Tenant, delete_prompt, impersonate_prompt};

/// An action waiting on the admin's answer in the confirmation modal.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingAction {
    Delete { email: String },
    Impersonate { tenant: Tenant },
}

impl PendingAction {
    pub fn prompt(&self) -> String {
        match self {
            Self::Delete { email } => delete_prompt(email),
            Self::Impersonate { tenant } => impersonate_prompt(tenant),
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Delete { .. } => "delete",
            Self::Impersonate { .. } => "impersonate",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppMode {
    Browse,
    Search,
    Confirm(PendingAction),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub mode: AppMode,
    pub status_line: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: AppMode::Browse,
            status_line: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    FocusSearch,
    BlurSearch,
    RequestConfirm(PendingAction),
    /// Leaves the modal and hands back the action that was pending.
    ResolveConfirm,
    SetStatus(String),
    ClearStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    ModeChanged(AppMode),
    ConfirmResolved(PendingAction),
    StatusUpdated(String),
    StatusCleared,
}

impl AppState {
    pub fn dispatch(&mut self, command: AppCommand) -> Vec<AppEvent> {
        match command {
            AppCommand::FocusSearch => {
                self.mode = AppMode::Search;
                vec![AppEvent::ModeChanged(self.mode.clone()), self.set_status("search")]
            }
            AppCommand::BlurSearch => {
                if self.mode != AppMode::Search {
                    return Vec::new();
                }
                self.mode = AppMode::Browse;
                vec![AppEvent::ModeChanged(self.mode.clone())]
            }
            AppCommand::RequestConfirm(action) => {
                self.mode = AppMode::Confirm(action);
                vec![AppEvent::ModeChanged(self.mode.clone())]
            }
            AppCommand::ResolveConfirm => {
                if !matches!(self.mode, AppMode::Confirm(_)) {
                    return Vec::new();
                }
                let AppMode::Confirm(action) =
                    std::mem::replace(&mut self.mode, AppMode::Browse)
                else {
                    return Vec::new();
                };
                vec![
                    AppEvent::ModeChanged(AppMode::Browse),
                    AppEvent::ConfirmResolved(action),
                ]
            }
            AppCommand::SetStatus(message) => vec![self.set_status(&message)],
            AppCommand::ClearStatus => {
                self.status_line = None;
                vec![AppEvent::StatusCleared]
            }
        }
    }

    pub fn pending_action(&self) -> Option<&PendingAction> {
        match &self.mode {
            AppMode::Confirm(action) => Some(action),
            _ => None,
        }
    }

    fn set_status(&mut self, message: &str) -> AppEvent {
        self.status_line = Some(message.to_owned());
        AppEvent::StatusUpdated(message.to_owned())
    }
}
