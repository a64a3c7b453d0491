// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use salonadmin_app::{
    ConfirmGate, JoinedAt, KeyValueStore, SessionListener, TENANTS_KEY, Tenant,
};
use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};
use std::path::PathBuf;
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

const SALON_ADJECTIVES: [&str; 14] = [
    "Velvet", "Golden", "Silver", "Urban", "Rose", "Crystal", "Luxe", "Bloom", "Ivory", "Copper",
    "Serene", "Radiant", "Amber", "Willow",
];

const SALON_NOUNS: [&str; 12] = [
    "Shears", "Mane", "Glow", "Locks", "Curl", "Comb", "Polish", "Blossom", "Strand", "Lather",
    "Mirror", "Braid",
];

const SALON_SUFFIXES: [&str; 6] = ["Studio", "Salon", "Lounge", "Spa", "Bar", "House"];

const OWNER_FIRST_NAMES: [&str; 16] = [
    "Aisha", "Bruno", "Chloe", "Dev", "Elena", "Farah", "Gio", "Hana", "Isla", "Jonas", "Kira",
    "Leo", "Maya", "Nico", "Omar", "Priya",
];

const MAIL_DOMAINS: [&str; 5] = [
    "salonmail.example",
    "beautyhub.example",
    "styleco.example",
    "mane.example",
    "glowup.example",
];

const PLANS: [&str; 3] = ["starter", "growth", "pro"];

const REFERENCE_NOW: OffsetDateTime = datetime!(2026-01-01 0:00 UTC);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreWrite {
    Set { key: String, value: String },
    Remove { key: String },
}

/// In-memory stand-in for the durable key-value store.
///
/// Every mutation is recorded so tests can assert that declined actions never
/// wrote anything.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: BTreeMap<String, String>,
    writes: Vec<StoreWrite>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_item(mut self, key: &str, value: &str) -> Self {
        self.items.insert(key.to_owned(), value.to_owned());
        self
    }

    pub fn with_tenants(tenants: &[Tenant]) -> Result<Self> {
        let encoded = serde_json::to_string(tenants).context("encode seed tenants")?;
        Ok(Self::new().with_item(TENANTS_KEY, &encoded))
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    pub fn raw_json(&self, key: &str) -> Result<Option<Value>> {
        self.raw(key)
            .map(|raw| serde_json::from_str(raw).with_context(|| format!("decode `{key}`")))
            .transpose()
    }

    pub fn writes(&self) -> &[StoreWrite] {
        &self.writes
    }

    pub fn write_count(&self) -> usize {
        self.writes.len()
    }

    pub fn set_fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            bail!("storage quota exceeded writing `{key}`");
        }
        self.items.insert(key.to_owned(), value.to_owned());
        self.writes.push(StoreWrite::Set {
            key: key.to_owned(),
            value: value.to_owned(),
        });
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        if self.fail_writes {
            bail!("storage unavailable removing `{key}`");
        }
        self.items.remove(key);
        self.writes.push(StoreWrite::Remove {
            key: key.to_owned(),
        });
        Ok(())
    }
}

/// Confirmation gate that replays scripted answers and remembers each prompt.
#[derive(Debug, Clone, Default)]
pub struct ScriptedGate {
    answers: VecDeque<bool>,
    fallback: bool,
    prompts: Vec<String>,
}

impl ScriptedGate {
    pub fn accepting() -> Self {
        Self {
            fallback: true,
            ..Self::default()
        }
    }

    pub fn declining() -> Self {
        Self::default()
    }

    pub fn with_answers(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }
}

impl ConfirmGate for ScriptedGate {
    fn confirm(&mut self, prompt: &str) -> bool {
        self.prompts.push(prompt.to_owned());
        self.answers.pop_front().unwrap_or(self.fallback)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RecordingListener {
    pub changes: Vec<Tenant>,
}

impl SessionListener for RecordingListener {
    fn on_session_change(&mut self, tenant: &Tenant) {
        self.changes.push(tenant.clone());
    }
}

#[derive(Debug, Clone)]
struct DeterministicRng {
    state: u64,
}

impl DeterministicRng {
    fn new(seed: u64) -> Self {
        let mut state = seed ^ 0x9E37_79B9_7F4A_7C15;
        if state == 0 {
            state = 0xA409_3822_299F_31D0;
        }
        Self { state }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);

        let mut x = self.state;
        x ^= x >> 13;
        x ^= x << 7;
        x ^= x >> 17;
        x
    }

    fn int_n(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % (n as u64)) as usize
    }
}

/// Seeded generator of plausible salon tenants for demos and tests.
#[derive(Debug, Clone)]
pub struct TenantFaker {
    rng: DeterministicRng,
    issued: usize,
}

impl TenantFaker {
    pub fn new(seed: u64) -> Self {
        let normalized = if seed == 0 { 1 } else { seed };
        Self {
            rng: DeterministicRng::new(normalized),
            issued: 0,
        }
    }

    pub fn tenant(&mut self) -> Tenant {
        self.issued += 1;
        let owner = self.pick(&OWNER_FIRST_NAMES).to_ascii_lowercase();
        let domain = self.pick(&MAIL_DOMAINS);
        // The counter keeps emails unique within one faker.
        let email = format!("{owner}{}@{domain}", self.issued);

        let mut tenant = Tenant::new(email);
        // Roughly one in eight registrations never set a salon name.
        if self.rng.int_n(8) != 0 {
            tenant.salon_name = Some(self.salon_name());
        }

        let days_ago = self.rng.int_n(540) as i64;
        let joined = REFERENCE_NOW - Duration::days(days_ago);
        tenant.joined_at = if self.rng.int_n(4) == 0 {
            Some(JoinedAt::from_millis(
                (joined.unix_timestamp_nanos() / 1_000_000) as i64,
            ))
        } else {
            JoinedAt::from_datetime(joined)
        };

        tenant
            .extra
            .insert("plan".to_owned(), Value::from(self.pick(&PLANS)));
        tenant.extra.insert(
            "phone".to_owned(),
            Value::from(format!(
                "+1-555-{:03}-{:04}",
                self.rng.int_n(1000),
                self.rng.int_n(10_000)
            )),
        );
        tenant
    }

    pub fn tenants(&mut self, count: usize) -> Vec<Tenant> {
        (0..count).map(|_| self.tenant()).collect()
    }

    pub fn salon_name(&mut self) -> String {
        format!(
            "{} {} {}",
            self.pick(&SALON_ADJECTIVES),
            self.pick(&SALON_NOUNS),
            self.pick(&SALON_SUFFIXES),
        )
    }

    fn pick<'a>(&mut self, items: &'a [&'a str]) -> &'a str {
        items[self.rng.int_n(items.len())]
    }
}

pub fn temp_db_path() -> Result<(tempfile::TempDir, PathBuf)> {
    let dir = tempfile::tempdir().context("create temp dir")?;
    let db_path = dir.path().join("salonadmin.db");
    Ok((dir, db_path))
}

/// The two tenants used throughout the filter and action examples.
pub fn alpha_beta() -> Vec<Tenant> {
    vec![
        Tenant::new("a@x.com").with_salon_name("Alpha"),
        Tenant::new("b@y.com").with_salon_name("Beta"),
    ]
}
