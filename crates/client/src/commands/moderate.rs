// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Responder actions. Each requires a token and prints the server's copy
//! of the question afterwards.

use parley_core::protocol::QuestionRecord;
use parley_core::QuestionId;

use crate::config::Config;
use crate::display::format_question;
use crate::error::Result;

use super::api_client;

pub async fn answer(config: &Config, id: QuestionId, content: &str) -> Result<()> {
    let record = api_client(config).add_answer(id, content).await?;
    print_result("Answered", record)
}

pub async fn resolve(config: &Config, id: QuestionId) -> Result<()> {
    let record = api_client(config).mark_answered(id).await?;
    print_result("Resolved", record)
}

pub async fn escalate(config: &Config, id: QuestionId) -> Result<()> {
    let record = api_client(config).escalate(id).await?;
    print_result("Escalated", record)
}

pub(super) fn print_result(verb: &str, record: QuestionRecord) -> Result<()> {
    let question = record.into_question()?;
    println!("{} question {}", verb, question.id());
    println!();
    for line in format_question(&question) {
        println!("{}", line);
    }
    Ok(())
}
