//! # Prompt Relay
//!
//! In [`crate::DebugMode::Option`] the policy engine needs a human decision. It never renders
//! anything itself: it emits a [`Prompt`] value to a [`Presenter`] and applies the [`Choice`]
//! reported back.
//!
//! A presenter that has no surface to show the prompt on returns `None`. The run then ends
//! silently, without invoking any callback.
//!
//! ## Channel presenter
//!
//! [`ChannelPresenter`] turns prompts into [`RelayMessage`]s on a `tokio` channel, so the
//! rendering side can live in another task (a UI loop, a test, ...) and answer through
//! [`PromptRequest::respond`].
//!
//! ```rust
//! use standin_core::relay::{self, Choice, Presenter, Prompt, RelayMessage};
//!
//! # async fn run() {
//! let (presenter, mut messages) = relay::channel(1);
//!
//! tokio::spawn(async move {
//!     while let Some(RelayMessage::Prompt(request)) = messages.recv().await {
//!         request.respond(Choice::SampleSuccess);
//!     }
//! });
//!
//! let choice = presenter.present(Prompt::new("network request error", false)).await;
//! assert_eq!(choice, Some(Choice::SampleSuccess));
//! # }
//! ```
use futures_util::future::BoxFuture;
use tokio::sync::{mpsc, oneshot};

/// One of the fixed actions offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Choice {
    /// Continue with the success sample.
    SampleSuccess,
    /// Continue with the failure sample. Only offered when one is configured.
    SampleFailure,
    /// Open the log of the failed exchange.
    ViewLog,
    /// Decline debugging and follow the normal failure flow.
    Cancel,
}

/// A menu entry: what the user reads and what it does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptOption {
    pub label: String,
    pub choice: Choice,
}

/// The "present choice" request emitted by the policy engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub title: String,
    pub message: String,
    /// Details of the failed exchange, shown when the user picks [`Choice::ViewLog`].
    pub log: String,
    pub options: Vec<PromptOption>,
}

impl Prompt {
    /// Builds the standard debug prompt. The failure-sample entry is only offered when
    /// `with_failure_sample` is set.
    pub fn new(log: impl Into<String>, with_failure_sample: bool) -> Self {
        let mut options = Vec::with_capacity(4);
        if with_failure_sample {
            options.push(option("Run with sample data 1", Choice::SampleSuccess));
            options.push(option("Run with sample data 2", Choice::SampleFailure));
        } else {
            options.push(option("Run with sample data", Choice::SampleSuccess));
        }
        options.push(option("View log", Choice::ViewLog));
        options.push(option("Cancel", Choice::Cancel));

        Self {
            title: "An error occurred".to_string(),
            message: "Debug mode is on.\nPick an option below to ignore the error and keep running."
                .to_string(),
            log: log.into(),
            options,
        }
    }

    /// Whether `choice` is one of the entries of this prompt.
    pub fn offers(&self, choice: Choice) -> bool {
        self.options.iter().any(|o| o.choice == choice)
    }
}

fn option(label: &str, choice: Choice) -> PromptOption {
    PromptOption {
        label: label.to_string(),
        choice,
    }
}

/// Renders prompts and reports the user's choice.
pub trait Presenter: Send + Sync {
    /// Shows `prompt` and resolves with the picked entry, or `None` when there is nothing
    /// to show it on.
    fn present(&self, prompt: Prompt) -> BoxFuture<'_, Option<Choice>>;

    /// Shows the log of a failed exchange.
    fn show_log(&self, log: String) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            tracing::info!(%log, "debug log");
        })
    }
}

/// Messages produced by a [`ChannelPresenter`].
#[derive(Debug)]
pub enum RelayMessage {
    Prompt(PromptRequest),
    ShowLog(String),
}

/// A prompt waiting for an answer.
#[derive(Debug)]
pub struct PromptRequest {
    pub prompt: Prompt,
    reply: oneshot::Sender<Choice>,
}

impl PromptRequest {
    /// Reports the user's choice. Returns `false` if the run stopped waiting for it.
    pub fn respond(self, choice: Choice) -> bool {
        self.reply.send(choice).is_ok()
    }
}

/// A [`Presenter`] that forwards everything over a channel.
///
/// A closed channel or a request dropped without an answer both count as "no surface".
#[derive(Debug, Clone)]
pub struct ChannelPresenter {
    sender: mpsc::Sender<RelayMessage>,
}

/// Creates a [`ChannelPresenter`] and the receiving end of its messages.
pub fn channel(buffer: usize) -> (ChannelPresenter, mpsc::Receiver<RelayMessage>) {
    let (sender, receiver) = mpsc::channel(buffer);
    (ChannelPresenter { sender }, receiver)
}

impl Presenter for ChannelPresenter {
    fn present(&self, prompt: Prompt) -> BoxFuture<'_, Option<Choice>> {
        Box::pin(async move {
            let (reply, answer) = oneshot::channel();
            self.sender
                .send(RelayMessage::Prompt(PromptRequest { prompt, reply }))
                .await
                .ok()?;
            answer.await.ok()
        })
    }

    fn show_log(&self, log: String) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            if self.sender.send(RelayMessage::ShowLog(log)).await.is_err() {
                tracing::warn!("log view requested but the relay channel is closed");
            }
        })
    }
}
