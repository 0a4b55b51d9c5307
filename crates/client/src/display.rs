// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use parley_core::{Question, Status, StatusCounts};

use crate::connection::ConnectionStatus;

/// Maximum line width for wrapped text content (excluding indent).
const WRAP_WIDTH: usize = 96;

/// Short status label shown in list lines.
pub fn status_label(status: Status) -> &'static str {
    match status {
        Status::Pending => "pending",
        Status::Escalated => "escalated",
        Status::Answered => "answered",
    }
}

/// Wrap text at word boundaries if it's a single line.
///
/// - If content contains newlines: return as-is (preserve user formatting)
/// - If content is single line >width: wrap at word boundaries
/// - If content is single line <=width: return as-is
pub fn wrap_text(content: &str, width: usize) -> String {
    if content.contains('\n') || content.chars().count() <= width {
        return content.to_string();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in content.split_whitespace() {
        if current.is_empty() {
            current = word.to_string();
        } else if current.chars().count() + 1 + word.chars().count() <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines.join("\n")
}

/// Format a single question line for list output.
pub fn format_question_line(question: &Question) -> String {
    let answers = match question.answers().len() {
        0 => String::new(),
        1 => " [1 answer]".to_string(),
        n => format!(" [{} answers]", n),
    };
    format!(
        "- ({}) {}: {}{}",
        status_label(question.status()),
        question.id(),
        question.text(),
        answers
    )
}

/// Format a question with its answers.
///
/// Output format:
/// ```text
/// [escalated] 12
///   Asked: 2024-01-10 10:30
///   How do I reset my password?
///
///   Answers:
///     Use the link on the login page.
/// ```
pub fn format_question(question: &Question) -> Vec<String> {
    let mut lines = vec![
        format!("[{}] {}", status_label(question.status()), question.id()),
        format!("  Asked: {}", question.created_at().format("%Y-%m-%d %H:%M")),
    ];
    for line in wrap_text(question.text(), WRAP_WIDTH).lines() {
        lines.push(format!("  {}", line));
    }
    if !question.answers().is_empty() {
        lines.push(String::new());
        lines.push("  Answers:".to_string());
        for answer in question.answers() {
            for line in wrap_text(answer.content(), WRAP_WIDTH).lines() {
                lines.push(format!("    {}", line));
            }
        }
    }
    lines
}

/// Format an ordered view, one line per question.
pub fn format_view(questions: &[Question]) -> String {
    if questions.is_empty() {
        return "No questions yet.".to_string();
    }
    questions
        .iter()
        .map(format_question_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Dashboard figures, e.g. `3 questions (1 escalated, 1 pending, 1 answered)`.
pub fn format_counts(counts: &StatusCounts) -> String {
    let noun = if counts.total() == 1 {
        "question"
    } else {
        "questions"
    };
    format!(
        "{} {} ({} escalated, {} pending, {} answered)",
        counts.total(),
        noun,
        counts.escalated,
        counts.pending,
        counts.answered
    )
}

/// Connection indicator line.
pub fn format_connection(status: &ConnectionStatus) -> String {
    match &status.last_error {
        Some(err) if !status.is_open() => format!("[{}] {}", status.status_string(), err),
        _ => format!("[{}]", status.status_string()),
    }
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
