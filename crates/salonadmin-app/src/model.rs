// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};

pub const UNKNOWN_SALON: &str = "Unknown Salon";
pub const MISSING_DATE: &str = "N/A";

/// A registered salon account.
///
/// Only `email`, `salonName` and `joinedAt` are interpreted. Every other field
/// in the stored object lands in `extra` and is written back untouched, so a
/// registration flow can add fields without this crate knowing about them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tenant {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salon_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub joined_at: Option<JoinedAt>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Tenant {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            salon_name: None,
            joined_at: None,
            extra: Map::new(),
        }
    }

    pub fn with_salon_name(mut self, name: impl Into<String>) -> Self {
        self.salon_name = Some(name.into());
        self
    }

    pub fn with_joined_at(mut self, joined_at: JoinedAt) -> Self {
        self.joined_at = Some(joined_at);
        self
    }

    /// Salon name, treating an empty string as absent.
    pub fn salon_name(&self) -> Option<&str> {
        self.salon_name.as_deref().filter(|name| !name.is_empty())
    }

    pub fn display_name(&self) -> &str {
        self.salon_name().unwrap_or(UNKNOWN_SALON)
    }

    /// Name used when asking to act as this tenant.
    pub fn identity_label(&self) -> &str {
        self.salon_name().unwrap_or(&self.email)
    }

    pub fn joined_display(&self) -> String {
        self.joined_at
            .as_ref()
            .map(JoinedAt::display)
            .unwrap_or_else(|| MISSING_DATE.to_owned())
    }

    /// Case-insensitive substring match on email or salon name.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        if self.email.to_lowercase().contains(needle) {
            return true;
        }
        self.salon_name()
            .is_some_and(|name| name.to_lowercase().contains(needle))
    }
}

/// Join timestamp as stored: either text (usually RFC 3339) or epoch millis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JoinedAt {
    Millis(Number),
    Text(String),
}

impl JoinedAt {
    pub fn from_datetime(value: OffsetDateTime) -> Option<Self> {
        value.format(&Rfc3339).ok().map(Self::Text)
    }

    pub fn from_millis(millis: i64) -> Self {
        Self::Millis(Number::from(millis))
    }

    pub fn date(&self) -> Option<Date> {
        match self {
            Self::Millis(number) => {
                let millis = number
                    .as_i64()
                    .or_else(|| number.as_f64().map(|value| value as i64))?;
                OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000)
                    .ok()
                    .map(OffsetDateTime::date)
            }
            Self::Text(raw) => {
                let trimmed = raw.trim();
                if let Ok(parsed) = OffsetDateTime::parse(trimmed, &Rfc3339) {
                    return Some(parsed.date());
                }
                let prefix = trimmed.get(..10)?;
                Date::parse(prefix, format_description!("[year]-[month]-[day]")).ok()
            }
        }
    }

    pub fn display(&self) -> String {
        if let Some(formatted) = self
            .date()
            .and_then(|date| date.format(format_description!("[year]-[month]-[day]")).ok())
        {
            return formatted;
        }
        match self {
            Self::Millis(number) => number.to_string(),
            Self::Text(raw) if raw.trim().is_empty() => MISSING_DATE.to_owned(),
            Self::Text(raw) => raw.clone(),
        }
    }
}
