pub mod answer;
pub mod config;
pub mod dataset;
pub mod error;
pub mod intent;
pub mod interpreter;
pub mod shell;
pub mod web;

pub use answer::{generate, Answer, TrendChart};
pub use dataset::{Dataset, Tables};
pub use intent::{Action, Filters, Intent};
pub use interpreter::interpret;
