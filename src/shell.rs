//! Front-end glue shared by the CLI and the HTTP server: page copy, example
//! questions and the blank-query guard that runs before the core is called.

use crate::answer::{generate, Answer};
use crate::dataset::Tables;
use crate::intent::Intent;
use crate::interpreter::interpret;
use serde::{Deserialize, Serialize};
use tracing::info;

pub const TITLE: &str = "Indian Agriculture and Rainfall Q&A";
pub const CAPTION: &str =
    "Ask questions like 'Average rainfall in Maharashtra' or 'Top crops in Punjab'.";
pub const EMPTY_QUERY_WARNING: &str = "Please enter a question.";

pub const EXAMPLE_QUESTIONS: [&str; 6] = [
    "Average rainfall in Kerala",
    "Highest rainfall in Tamil Nadu",
    "Top crops in Madhya Pradesh",
    "Trend of rainfall and crop production in Maharashtra",
    "Average crop production in Punjab",
    "Rainfall trend in Karnataka",
];

/// How the front end should style a reply. Every answered question is a
/// success, including "no data" and "not available" answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    pub status: Status,
    pub answer: Answer,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<Intent>,
}

/// Run one question through interpret + generate, or warn on blank input.
pub fn ask(query: &str, tables: &Tables) -> Reply {
    if query.trim().is_empty() {
        return Reply {
            status: Status::Warning,
            answer: Answer {
                text: EMPTY_QUERY_WARNING.to_string(),
                chart: None,
            },
            intent: None,
        };
    }

    let intent = interpret(query);
    let answer = generate(&intent, tables);
    info!(
        "Answered [{} / {}]: {}",
        intent.effective_dataset(),
        intent.action,
        answer.text
    );

    Reply {
        status: Status::Success,
        answer,
        intent: Some(intent),
    }
}
