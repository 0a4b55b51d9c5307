// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `parley watch`: bootstrap a session and reprint on every change.
//!
//! The session is driven on this task. A second task renders from the
//! session's view and status channels, and ends when the session is
//! dropped.

use tokio::sync::watch;
use tracing::{debug, info};

use crate::config::Config;
use crate::connection::ConnectionStatus;
use crate::display::{format_connection, format_question, format_view};
use crate::error::{BootstrapError, Result};
use crate::session::{Session, View};

pub async fn run(config: &Config, details: bool) -> Result<()> {
    let mut session = Session::new(config);

    let close = session.close_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupted, closing session");
            close.cancel();
        }
    });

    let renderer = tokio::spawn(render(
        session.subscribe_view(),
        session.subscribe_status(),
        details,
    ));

    match session.bootstrap().await {
        Ok(report) => debug!(
            "seeded {} questions, replayed {} events",
            report.seeded, report.replayed
        ),
        Err(BootstrapError::Cancelled) => return Ok(()),
        Err(BootstrapError::Fetch(e)) if e.is_unavailable() => eprintln!(
            "warning: could not load existing questions: {}\n  hint: is the server running at {}?",
            e, config.api_url
        ),
        Err(e) => eprintln!("warning: {}", e),
    }

    let result = session.run().await;
    let stats = session.dispatch_stats();
    info!(
        "stream ended: {} events decoded, {} frames discarded",
        stats.decoded,
        stats.discarded()
    );
    drop(session);
    if let Err(e) = renderer.await {
        debug!("renderer task failed: {}", e);
    }
    result
}

async fn render(
    mut view: watch::Receiver<View>,
    mut status: watch::Receiver<ConnectionStatus>,
    details: bool,
) {
    loop {
        tokio::select! {
            changed = view.changed() => {
                if changed.is_err() {
                    break;
                }
                let questions = view.borrow_and_update().clone();
                print_view(&questions, details);
            }
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = status.borrow_and_update().clone();
                println!("{}", format_connection(&current));
            }
        }
    }
}

fn print_view(questions: &View, details: bool) {
    println!();
    if details && !questions.is_empty() {
        for question in questions.iter() {
            for line in format_question(question) {
                println!("{}", line);
            }
            println!();
        }
    } else {
        println!("{}", format_view(questions));
    }
}
