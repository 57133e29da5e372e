//! # Standin
//!
//! This module implements the wrapper that issues an API call and decides which value reaches
//! the caller's callbacks.
//!
//! A [`Standin`] is configured once through a [`StandinBuilder`] and is immutable afterwards.
//! Each [`Standin::run`] goes through the same steps:
//!
//! 1. Resolve the effective [`DebugMode`] from the [`DebugSwitch`] and the instance override.
//! 2. Unless the mode is `Always`, send the request through the [`Transport`] and wait for its
//!    single outcome. A transport error counts as "no response".
//! 3. Run the response handler, if any, on the response.
//! 4. Apply [`policy::evaluate`] and invoke exactly one callback, or relay the decision to a
//!    [`Presenter`] in `Option` mode.
//!
//! `run` never returns an error: every failure is delivered to the failure callback. The
//! returned [`Resolution`] only reports which path was taken.
//!
//! ## Example
//!
//! ```rust,no_run
//! use standin_core::{ApiRequest, DebugMode, DebugSwitch, EnvelopeKeys, Standin};
//! use standin_core::transport::HttpTransport;
//!
//! # async fn run() {
//! let switch = DebugSwitch::new(DebugMode::Auto);
//! let keys = EnvelopeKeys::default();
//!
//! let standin = Standin::builder(
//!     || serde_json::json!({ "name": "sample user" }),
//!     |user| println!("user: {user}"),
//! )
//! .switch(switch)
//! .handler(move |response| response.unwrap_payload(&keys))
//! .on_failure(|err| eprintln!("failed: {err}"))
//! .build();
//!
//! let transport = HttpTransport::new("http://localhost:8080");
//! standin.run(&transport, &ApiRequest::get("/users/1")).await;
//! # }
//! ```
use crate::policy::{self, Verdict};
use crate::relay::{Choice, Presenter, Prompt};
use crate::transport::{ApiRequest, Progress, ProgressFn, Transport};
use crate::{ApiError, DebugMode, DebugSwitch, RawResponse};
use std::fmt::{self, Debug, Display};
use std::sync::Arc;
use std::time::Instant;

type SampleFn<T> = Arc<dyn Fn() -> T + Send + Sync>;
type HandlerFn<T, E> = Arc<dyn Fn(&RawResponse) -> Result<T, E> + Send + Sync>;
type CallbackFn<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Which path a run ended on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The handler produced a value and the success callback received it.
    Handled,
    /// The success callback received a freshly produced sample.
    Substituted,
    /// The failure callback was invoked.
    Failed,
    /// The user opened the log. No callback was invoked.
    LogViewed,
    /// A prompt was needed but there was no surface to show it on. No callback was invoked.
    Unpresented,
}

/// An API call wrapper that can stand in sample data for the real result.
pub struct Standin<T, E = ApiError> {
    switch: DebugSwitch,
    mode: Option<DebugMode>,
    success_sample: SampleFn<T>,
    failure_sample: Option<SampleFn<E>>,
    handler: Option<HandlerFn<T, E>>,
    on_success: CallbackFn<T>,
    on_failure: CallbackFn<E>,
    presenter: Option<Arc<dyn Presenter>>,
    progress: Option<Arc<ProgressFn>>,
    timing: bool,
}

impl<T, E> Standin<T, E>
where
    E: From<ApiError> + Display,
{
    /// Starts configuring a wrapper from its two required parts: the success sample producer
    /// and the success callback.
    pub fn builder(
        sample: impl Fn() -> T + Send + Sync + 'static,
        on_success: impl Fn(T) + Send + Sync + 'static,
    ) -> StandinBuilder<T, E> {
        StandinBuilder::new(sample, on_success)
    }

    /// The mode a run started now would use.
    pub fn effective_mode(&self) -> DebugMode {
        self.switch.resolve(self.mode)
    }

    /// Issues `request` through `transport` and delivers the result according to the
    /// effective debug mode.
    pub async fn run<Tr>(&self, transport: &Tr, request: &ApiRequest) -> Resolution
    where
        Tr: Transport + ?Sized,
    {
        let mode = self.effective_mode();
        tracing::debug!(%mode, method = %request.method, path = %request.path, "running request");

        if mode == DebugMode::Always {
            tracing::info!(path = %request.path, "always mode, request skipped");
            return self.substitute();
        }

        let response = self.exchange(transport, request).await;
        let exchange = match (&self.handler, &response) {
            (Some(handler), Some(response)) => Some(handler(response)),
            _ => None,
        };
        let handled = exchange.is_some();

        match policy::evaluate(mode, exchange) {
            Verdict::Deliver(value) => {
                (self.on_success)(value);
                Resolution::Handled
            }
            Verdict::Substitute => self.substitute(),
            Verdict::Fail(err) => self.fail(err),
            Verdict::Relay { on_cancel } => {
                let log = match (&response, handled) {
                    (Some(response), true) => format!(
                        "server error\n\npath    : {}\nerror   : {}\nresponse: {}",
                        request.path,
                        on_cancel,
                        response.text()
                    ),
                    _ => "network request error".to_string(),
                };
                self.relay(log, on_cancel).await
            }
        }
    }

    async fn exchange<Tr>(&self, transport: &Tr, request: &ApiRequest) -> Option<RawResponse>
    where
        Tr: Transport + ?Sized,
    {
        let started = Instant::now();
        if self.timing {
            tracing::info!(path = %request.path, "request begin");
        }

        let result = transport.send(request, self.progress.as_deref()).await;

        if self.timing {
            tracing::info!(
                path = %request.path,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "request end"
            );
        }

        match result {
            Ok(response) => Some(response),
            Err(err) => {
                tracing::warn!(error = %err, path = %request.path, "no response captured");
                None
            }
        }
    }

    async fn relay(&self, log: String, on_cancel: E) -> Resolution {
        let Some(presenter) = &self.presenter else {
            tracing::warn!("option mode needs a presenter but none is configured");
            return Resolution::Unpresented;
        };

        let prompt = Prompt::new(log.clone(), self.failure_sample.is_some());
        match presenter.present(prompt).await {
            None => {
                tracing::warn!("no surface to present the debug prompt on");
                Resolution::Unpresented
            }
            Some(Choice::ViewLog) => {
                presenter.show_log(log).await;
                Resolution::LogViewed
            }
            Some(Choice::Cancel) => self.fail(on_cancel),
            Some(Choice::SampleSuccess) => self.substitute(),
            Some(Choice::SampleFailure) => match &self.failure_sample {
                Some(sample) => self.fail(sample()),
                None => {
                    tracing::warn!("failure sample chosen but none is configured");
                    Resolution::Unpresented
                }
            },
        }
    }

    fn substitute(&self) -> Resolution {
        tracing::info!("substituting success sample");
        (self.on_success)((self.success_sample)());
        Resolution::Substituted
    }

    fn fail(&self, err: E) -> Resolution {
        tracing::debug!(error = %err, "delivering failure");
        (self.on_failure)(err);
        Resolution::Failed
    }
}

impl<T, E> Debug for Standin<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Standin")
            .field("switch", &self.switch)
            .field("mode", &self.mode)
            .field("has_failure_sample", &self.failure_sample.is_some())
            .field("has_handler", &self.handler.is_some())
            .field("has_presenter", &self.presenter.is_some())
            .field("timing", &self.timing)
            .finish_non_exhaustive()
    }
}

/// Builder for an immutable [`Standin`].
pub struct StandinBuilder<T, E = ApiError> {
    switch: DebugSwitch,
    mode: Option<DebugMode>,
    success_sample: SampleFn<T>,
    failure_sample: Option<SampleFn<E>>,
    handler: Option<HandlerFn<T, E>>,
    on_success: CallbackFn<T>,
    on_failure: CallbackFn<E>,
    presenter: Option<Arc<dyn Presenter>>,
    progress: Option<Arc<ProgressFn>>,
    timing: bool,
}

impl<T, E> StandinBuilder<T, E> {
    pub fn new(
        sample: impl Fn() -> T + Send + Sync + 'static,
        on_success: impl Fn(T) + Send + Sync + 'static,
    ) -> Self {
        Self {
            switch: DebugSwitch::default(),
            mode: None,
            success_sample: Arc::new(sample),
            failure_sample: None,
            handler: None,
            on_success: Arc::new(on_success),
            on_failure: Arc::new(|_: E| {}),
            presenter: None,
            progress: None,
            timing: false,
        }
    }

    /// The shared switch holding the process-level mode. Defaults to a locked `Shutdown` switch.
    pub fn switch(mut self, switch: DebugSwitch) -> Self {
        self.switch = switch;
        self
    }

    /// Overrides the switch's mode for this instance. Ignored while the switch is locked.
    pub fn mode(mut self, mode: DebugMode) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Producer of the error offered as the second sample in `Option` mode.
    pub fn failure_sample(mut self, sample: impl Fn() -> E + Send + Sync + 'static) -> Self {
        self.failure_sample = Some(Arc::new(sample));
        self
    }

    /// Turns a raw response into a value. Without one every response is unusable.
    pub fn handler(
        mut self,
        handler: impl Fn(&RawResponse) -> Result<T, E> + Send + Sync + 'static,
    ) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    pub fn on_failure(mut self, on_failure: impl Fn(E) + Send + Sync + 'static) -> Self {
        self.on_failure = Arc::new(on_failure);
        self
    }

    pub fn presenter(mut self, presenter: impl Presenter + 'static) -> Self {
        self.presenter = Some(Arc::new(presenter));
        self
    }

    /// Receives download progress of the response body.
    pub fn progress(mut self, progress: impl Fn(Progress) + Send + Sync + 'static) -> Self {
        self.progress = Some(Arc::new(progress));
        self
    }

    /// Logs when the request starts and ends, with the elapsed time.
    pub fn timing(mut self, enabled: bool) -> Self {
        self.timing = enabled;
        self
    }

    pub fn build(self) -> Standin<T, E> {
        Standin {
            switch: self.switch,
            mode: self.mode,
            success_sample: self.success_sample,
            failure_sample: self.failure_sample,
            handler: self.handler,
            on_success: self.on_success,
            on_failure: self.on_failure,
            presenter: self.presenter,
            progress: self.progress,
            timing: self.timing,
        }
    }
}
