use futures_util::future::BoxFuture;
use standin_core::relay::{self, Choice, Presenter, Prompt, RelayMessage};
use standin_core::transport::{ProgressFn, TransportError};
use standin_core::{
    ApiError, ApiRequest, DebugMode, DebugSwitch, EnvelopeKeys, JsonAccess, RawResponse,
    Resolution, Standin, StandinBuilder, Transport,
};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::Receiver;

struct StubTransport(Option<serde_json::Value>);

impl Transport for StubTransport {
    fn send<'a>(
        &'a self,
        _request: &'a ApiRequest,
        _progress: Option<&'a ProgressFn>,
    ) -> BoxFuture<'a, Result<RawResponse, TransportError>> {
        let result = match &self.0 {
            Some(body) => Ok(RawResponse::new(http::StatusCode::OK, body.to_string())),
            None => Err(TransportError::Other("timed out".into())),
        };
        Box::pin(async move { result })
    }
}

#[derive(Default, Clone)]
struct Recorder {
    successes: Arc<Mutex<Vec<i64>>>,
    failures: Arc<Mutex<Vec<ApiError>>>,
}

impl Recorder {
    fn successes(&self) -> Vec<i64> {
        self.successes.lock().unwrap().clone()
    }

    fn failures(&self) -> Vec<ApiError> {
        self.failures.lock().unwrap().clone()
    }
}

fn builder(recorder: &Recorder) -> StandinBuilder<i64, ApiError> {
    let successes = recorder.successes.clone();
    let failures = recorder.failures.clone();

    Standin::builder(|| -1, move |value| successes.lock().unwrap().push(value))
        .switch(DebugSwitch::new(DebugMode::Option))
        .on_failure(move |err| failures.lock().unwrap().push(err))
        .handler(|response| {
            response
                .unwrap_payload(&EnvelopeKeys::default())?
                .to_int()
        })
}

fn unauthorized() -> ApiError {
    ApiError::Client {
        code: "401".to_string(),
        msg: "sample unauthorized".to_string(),
    }
}

fn server_error_body() -> serde_json::Value {
    serde_json::json!({"code": 500, "data": null, "msg": "boom"})
}

/// Answers every prompt with `choice` and returns what the relay received once the
/// presenter side is dropped.
async fn answer_with(
    mut messages: Receiver<RelayMessage>,
    choice: Choice,
) -> (Vec<Prompt>, Vec<String>) {
    let mut prompts = Vec::new();
    let mut logs = Vec::new();
    while let Some(message) = messages.recv().await {
        match message {
            RelayMessage::Prompt(request) => {
                prompts.push(request.prompt.clone());
                request.respond(choice);
            }
            RelayMessage::ShowLog(log) => logs.push(log),
        }
    }
    (prompts, logs)
}

#[tokio::test]
async fn test_option_handler_success_needs_no_prompt() {
    let recorder = Recorder::default();
    let (presenter, messages) = relay::channel(1);
    let responder = tokio::spawn(answer_with(messages, Choice::Cancel));
    let standin = builder(&recorder).presenter(presenter).build();

    let body = serde_json::json!({"code": 200, "data": 5, "msg": "ok"});
    let resolution = standin
        .run(&StubTransport(Some(body)), &ApiRequest::get("/n"))
        .await;
    drop(standin);

    let (prompts, _) = responder.await.unwrap();
    assert_eq!(resolution, Resolution::Handled);
    assert!(prompts.is_empty());
    assert_eq!(recorder.successes(), vec![5]);
}

#[tokio::test]
async fn test_option_sample_choice_substitutes() {
    let recorder = Recorder::default();
    let (presenter, messages) = relay::channel(1);
    let responder = tokio::spawn(answer_with(messages, Choice::SampleSuccess));
    let standin = builder(&recorder).presenter(presenter).build();

    let resolution = standin
        .run(&StubTransport(None), &ApiRequest::get("/n"))
        .await;
    drop(standin);

    let (prompts, _) = responder.await.unwrap();
    assert_eq!(resolution, Resolution::Substituted);
    assert_eq!(prompts.len(), 1);
    assert_eq!(prompts[0].log, "network request error");
    assert!(!prompts[0].offers(Choice::SampleFailure));
    assert_eq!(recorder.successes(), vec![-1]);
    assert!(recorder.failures().is_empty());
}

#[tokio::test]
async fn test_option_cancel_without_response_falls_back_to_network_error() {
    let recorder = Recorder::default();
    let (presenter, messages) = relay::channel(1);
    let responder = tokio::spawn(answer_with(messages, Choice::Cancel));
    let standin = builder(&recorder).presenter(presenter).build();

    let resolution = standin
        .run(&StubTransport(None), &ApiRequest::get("/n"))
        .await;
    drop(standin);
    responder.await.unwrap();

    assert_eq!(resolution, Resolution::Failed);
    assert_eq!(recorder.failures(), vec![ApiError::Network]);
}

#[tokio::test]
async fn test_option_cancel_after_handler_failure_delivers_real_error() {
    let recorder = Recorder::default();
    let (presenter, messages) = relay::channel(1);
    let responder = tokio::spawn(answer_with(messages, Choice::Cancel));
    let standin = builder(&recorder).presenter(presenter).build();

    let resolution = standin
        .run(
            &StubTransport(Some(server_error_body())),
            &ApiRequest::get("/orders"),
        )
        .await;
    drop(standin);

    let (prompts, _) = responder.await.unwrap();
    assert_eq!(resolution, Resolution::Failed);
    assert!(prompts[0].log.starts_with("server error"));
    assert!(prompts[0].log.contains("/orders"));
    assert!(prompts[0].log.contains("boom"));
    assert_eq!(
        recorder.failures(),
        vec![ApiError::Client {
            code: "500".to_string(),
            msg: "boom".to_string()
        }]
    );
}

#[tokio::test]
async fn test_option_failure_sample_choice() {
    let recorder = Recorder::default();
    let (presenter, messages) = relay::channel(1);
    let responder = tokio::spawn(answer_with(messages, Choice::SampleFailure));
    let standin = builder(&recorder)
        .failure_sample(unauthorized)
        .presenter(presenter)
        .build();

    let resolution = standin
        .run(&StubTransport(None), &ApiRequest::get("/n"))
        .await;
    drop(standin);

    let (prompts, _) = responder.await.unwrap();
    assert_eq!(resolution, Resolution::Failed);
    assert!(prompts[0].offers(Choice::SampleFailure));
    assert_eq!(prompts[0].options.len(), 4);
    assert_eq!(recorder.failures(), vec![unauthorized()]);
    assert!(recorder.successes().is_empty());
}

#[tokio::test]
async fn test_option_failure_sample_not_offered_is_ignored() {
    let recorder = Recorder::default();
    let (presenter, messages) = relay::channel(1);
    let responder = tokio::spawn(answer_with(messages, Choice::SampleFailure));
    let standin = builder(&recorder).presenter(presenter).build();

    let resolution = standin
        .run(&StubTransport(None), &ApiRequest::get("/n"))
        .await;
    drop(standin);
    responder.await.unwrap();

    assert_eq!(resolution, Resolution::Unpresented);
    assert!(recorder.failures().is_empty());
    assert!(recorder.successes().is_empty());
}

#[tokio::test]
async fn test_option_view_log() {
    let recorder = Recorder::default();
    let (presenter, messages) = relay::channel(1);
    let responder = tokio::spawn(answer_with(messages, Choice::ViewLog));
    let standin = builder(&recorder).presenter(presenter).build();

    let resolution = standin
        .run(
            &StubTransport(Some(server_error_body())),
            &ApiRequest::get("/n"),
        )
        .await;
    drop(standin);

    let (prompts, logs) = responder.await.unwrap();
    assert_eq!(resolution, Resolution::LogViewed);
    assert_eq!(logs, vec![prompts[0].log.clone()]);
    assert!(recorder.failures().is_empty());
    assert!(recorder.successes().is_empty());
}

#[tokio::test]
async fn test_option_without_surface_does_nothing() {
    let recorder = Recorder::default();

    // No presenter at all.
    let standin = builder(&recorder).build();
    let resolution = standin
        .run(&StubTransport(None), &ApiRequest::get("/n"))
        .await;
    assert_eq!(resolution, Resolution::Unpresented);

    // A presenter whose consumer is gone.
    let (presenter, messages) = relay::channel(1);
    drop(messages);
    let standin = builder(&recorder).presenter(presenter).build();
    let resolution = standin
        .run(&StubTransport(None), &ApiRequest::get("/n"))
        .await;
    assert_eq!(resolution, Resolution::Unpresented);

    assert!(recorder.failures().is_empty());
    assert!(recorder.successes().is_empty());
}

#[tokio::test]
async fn test_custom_presenter() {
    struct Scripted(Mutex<Vec<Choice>>);

    impl Presenter for Scripted {
        fn present(&self, _prompt: Prompt) -> BoxFuture<'_, Option<Choice>> {
            let next = self.0.lock().unwrap().pop();
            Box::pin(async move { next })
        }
    }

    let recorder = Recorder::default();
    let standin = builder(&recorder)
        .presenter(Scripted(Mutex::new(vec![Choice::Cancel, Choice::SampleSuccess])))
        .build();

    standin
        .run(&StubTransport(None), &ApiRequest::get("/n"))
        .await;
    standin
        .run(&StubTransport(None), &ApiRequest::get("/n"))
        .await;
    let last = standin
        .run(&StubTransport(None), &ApiRequest::get("/n"))
        .await;

    assert_eq!(recorder.successes(), vec![-1]);
    assert_eq!(recorder.failures(), vec![ApiError::Network]);
    assert_eq!(last, Resolution::Unpresented);
}
