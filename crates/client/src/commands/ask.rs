// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::config::Config;
use crate::error::Result;

use super::{api_client, moderate::print_result};

/// Submit a question.
pub async fn run(config: &Config, text: &str) -> Result<()> {
    let record = api_client(config).submit_question(text).await?;
    print_result("Submitted", record)
}
