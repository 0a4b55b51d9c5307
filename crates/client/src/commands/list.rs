// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use parley_core::StateStore;

use crate::bootstrap::valid_questions;
use crate::config::Config;
use crate::display::{format_counts, format_view};
use crate::error::Result;

use super::api_client;

/// Fetch the listing once and print it in display order.
pub async fn run(config: &Config, counts: bool) -> Result<()> {
    let records = api_client(config).list_questions().await?;

    let mut store = StateStore::new();
    store.merge_snapshot(valid_questions(records));

    println!("{}", format_view(&store.snapshot()));
    if counts {
        println!();
        println!("{}", format_counts(&store.counts()));
    }
    Ok(())
}
