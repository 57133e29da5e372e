//! # Terminal Presenter
//!
//! Renders the debug prompt as an interactive menu on the terminal. When stdin is not a
//! terminal there is nothing to present on, so the prompt is dropped and the run ends without
//! a result.
use crate::formatter::{FormattedString, LogView};
use dialoguer::Select;
use futures_util::future::BoxFuture;
use standin_core::relay::{Choice, Presenter, Prompt};
use std::io::IsTerminal;

pub struct TerminalPresenter;

impl Presenter for TerminalPresenter {
    fn present(&self, prompt: Prompt) -> BoxFuture<'_, Option<Choice>> {
        Box::pin(async move {
            if !std::io::stdin().is_terminal() {
                return None;
            }
            // dialoguer blocks on stdin.
            tokio::task::spawn_blocking(move || select(&prompt))
                .await
                .ok()
                .flatten()
        })
    }

    fn show_log(&self, log: String) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            eprintln!("{}", FormattedString::from(LogView(log)));
        })
    }
}

fn select(prompt: &Prompt) -> Option<Choice> {
    eprintln!("{}", FormattedString::from(prompt));

    let labels: Vec<&str> = prompt.options.iter().map(|o| o.label.as_str()).collect();
    let selection = Select::new()
        .with_prompt("How would you like to proceed?")
        .default(0)
        .items(&labels)
        .interact_opt();

    match selection {
        Ok(Some(index)) => prompt.options.get(index).map(|o| o.choice),
        Ok(None) => Some(Choice::Cancel),
        Err(err) => {
            tracing::warn!(error = %err, "could not read the debug prompt answer");
            None
        }
    }
}
