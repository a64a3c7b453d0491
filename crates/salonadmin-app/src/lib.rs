// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod actions;
pub mod model;
pub mod state;
pub mod store;
pub mod tenants;

pub use actions::*;
pub use model::*;
pub use state::*;
pub use store::*;
pub use tenants::*;
