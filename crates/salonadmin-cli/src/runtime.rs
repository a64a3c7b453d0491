// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use salonadmin_app::TenantStore;
use salonadmin_db::Store;
use tracing::info;

pub struct DbRuntime<'a> {
    store: &'a mut Store,
}

impl<'a> DbRuntime<'a> {
    pub fn new(store: &'a mut Store) -> Self {
        Self { store }
    }
}

impl salonadmin_tui::AppRuntime for DbRuntime<'_> {
    type Store = Store;

    fn store(&self) -> &Store {
        self.store
    }

    fn store_mut(&mut self) -> &mut Store {
        self.store
    }

    fn logout(&mut self) -> Result<()> {
        self.store.clear_current_session()?;
        info!("super-admin logged out");
        Ok(())
    }
}
