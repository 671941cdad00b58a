use super::*;
use crate::llm::types::{LlmError, Role};
use crate::services::conversation::GREETING;
use crate::store::test_helpers::{FlakyStore, ScriptedAgent};
use std::sync::Mutex as StdMutex;

// =========================================================================
// MockCompletion
// =========================================================================

enum Script {
    Reply(&'static str),
    Status(u16),
    WaitForCancel,
}

struct MockCompletion {
    script: Script,
    calls: StdMutex<Vec<(String, Vec<Message>)>>,
}

impl MockCompletion {
    fn new(script: Script) -> Arc<Self> {
        Arc::new(Self { script, calls: StdMutex::new(Vec::new()) })
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl ChatCompletion for MockCompletion {
    async fn complete(
        &self,
        system: &str,
        messages: &[Message],
        mut cancel: watch::Receiver<bool>,
    ) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((system.to_string(), messages.to_vec()));
        match self.script {
            Script::Reply(text) => Ok(text.to_string()),
            Script::Status(status) => Err(LlmError::ApiResponse { status, message: "boom".into() }),
            Script::WaitForCancel => {
                crate::llm::azure::cancelled(&mut cancel).await;
                Err(LlmError::Cancelled)
            }
        }
    }
}

fn idle() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    std::mem::forget(tx);
    rx
}

fn dispatcher(
    completion: Option<Arc<MockCompletion>>,
    store: Arc<FlakyStore>,
    agent: Arc<ScriptedAgent>,
    policy: FallbackPolicy,
) -> ChatDispatcher {
    ChatDispatcher::new(completion.map(|c| c as Arc<dyn ChatCompletion>), store, agent, policy)
}

// =========================================================================
// policy
// =========================================================================

#[test]
fn policy_parses_known_values() {
    assert_eq!("missing_config_only".parse::<FallbackPolicy>().unwrap(), FallbackPolicy::MissingConfigOnly);
    assert_eq!(" ANY_FAILURE ".parse::<FallbackPolicy>().unwrap(), FallbackPolicy::AnyFailure);
    assert!(matches!("sometimes".parse::<FallbackPolicy>(), Err(ChatError::InvalidPolicy(_))));
    assert_eq!(FallbackPolicy::default(), FallbackPolicy::MissingConfigOnly);
}

#[test]
fn system_prompt_carries_persona_and_digest() {
    let prompt = build_system_prompt(&ContextDigest::default());
    assert!(prompt.starts_with("You are a helpful AI assistant for StoreAI"));
    assert!(prompt.ends_with("Database Context:\nNo specific database context available for this query."));
}

// =========================================================================
// send
// =========================================================================

#[tokio::test]
async fn configured_success_appends_reply() {
    let completion = MockCompletion::new(Script::Reply("Reorder bread now."));
    let chat = dispatcher(
        Some(completion.clone()),
        Arc::new(FlakyStore::new()),
        Arc::new(ScriptedAgent::replying("unused")),
        FallbackPolicy::default(),
    );
    let conv = Mutex::new(Conversation::new());

    let report = chat.send(&conv, "What's my inventory status?", idle()).await.unwrap();
    assert_eq!(report.outcome, TurnOutcome::Succeeded);
    assert_eq!(report.reply.content, "Reorder bread now.");
    assert!(report.notice.is_none());

    let (system, history) = completion.calls.lock().unwrap()[0].clone();
    assert!(system.contains("Total items: 5"));
    assert!(system.contains("Low/Critical stock items: 2"));
    assert_eq!(history.len(), 2);
    assert_eq!(history[0], Message::new(Role::Assistant, GREETING));
    assert_eq!(history[1], Message::new(Role::User, "What's my inventory status?"));

    let conv = conv.lock().await;
    assert_eq!(conv.messages().len(), 3);
    assert!(!conv.is_loading());
}

#[tokio::test]
async fn blank_input_is_a_no_op() {
    let completion = MockCompletion::new(Script::Reply("x"));
    let agent = Arc::new(ScriptedAgent::replying("x"));
    let chat = dispatcher(Some(completion.clone()), Arc::new(FlakyStore::new()), agent.clone(), FallbackPolicy::default());
    let conv = Mutex::new(Conversation::new());

    let err = chat.send(&conv, "   ", idle()).await.unwrap_err();
    assert!(matches!(err, ChatError::EmptyMessage));
    assert_eq!(conv.lock().await.messages().len(), 1);
    assert!(!conv.lock().await.is_loading());
    assert_eq!(completion.call_count(), 0);
    assert_eq!(agent.call_count(), 0);
}

#[tokio::test]
async fn completion_error_fails_turn_with_apology() {
    let agent = Arc::new(ScriptedAgent::replying("should not be used"));
    let chat = dispatcher(
        Some(MockCompletion::new(Script::Status(500))),
        Arc::new(FlakyStore::new()),
        agent.clone(),
        FallbackPolicy::MissingConfigOnly,
    );
    let conv = Mutex::new(Conversation::new());

    let report = chat.send(&conv, "pricing?", idle()).await.unwrap();
    assert_eq!(report.outcome, TurnOutcome::Failed);
    assert_eq!(report.notice.as_deref(), Some(FAILURE_NOTICE));
    assert_eq!(report.reply.content, APOLOGY_REPLY);
    assert_eq!(agent.call_count(), 0);

    let conv = conv.lock().await;
    assert_eq!(conv.messages().len(), 3);
    assert_eq!(conv.messages().iter().filter(|m| m.content == APOLOGY_REPLY).count(), 1);
    assert!(!conv.is_loading());
}

#[tokio::test]
async fn any_failure_policy_falls_through_to_agent() {
    let agent = Arc::new(ScriptedAgent::replying("Agent says hi."));
    let chat = dispatcher(
        Some(MockCompletion::new(Script::Status(503))),
        Arc::new(FlakyStore::new()),
        agent.clone(),
        FallbackPolicy::AnyFailure,
    );
    let conv = Mutex::new(Conversation::new());

    let report = chat.send(&conv, "hello", idle()).await.unwrap();
    assert_eq!(report.outcome, TurnOutcome::Degraded);
    assert_eq!(report.reply.content, "Agent says hi.");
    assert!(report.notice.is_none());
    assert_eq!(agent.call_count(), 1);
}

#[tokio::test]
async fn missing_config_uses_agent_with_full_history() {
    let agent = Arc::new(ScriptedAgent::replying("From the agent."));
    let store = Arc::new(FlakyStore::new());
    let chat = dispatcher(None, store.clone(), agent.clone(), FallbackPolicy::default());
    let conv = Mutex::new(Conversation::new());

    let report = chat.send(&conv, "stock levels?", idle()).await.unwrap();
    assert_eq!(report.outcome, TurnOutcome::Degraded);
    assert_eq!(report.reply.content, "From the agent.");

    let seen = agent.seen.lock().unwrap();
    assert_eq!(seen[0].len(), 2);
    assert_eq!(seen[0][1].content, "stock levels?");
    assert!(store.call_log().is_empty());
}

#[tokio::test]
async fn agent_failure_replies_with_raw_digest() {
    let chat = dispatcher(
        None,
        Arc::new(FlakyStore::new()),
        Arc::new(ScriptedAgent::failing()),
        FallbackPolicy::default(),
    );
    let conv = Mutex::new(Conversation::new());

    let report = chat.send(&conv, "What's my inventory status?", idle()).await.unwrap();
    assert_eq!(report.outcome, TurnOutcome::Degraded);
    assert!(report.notice.is_none());

    let store = FlakyStore::new();
    let digest = context::assemble(&store, "What's my inventory status?").await;
    assert_eq!(report.reply.content, degraded_reply("What's my inventory status?", &digest));
    assert!(report.reply.content.starts_with("I understand you're asking about: \"What's my inventory status?\""));
    assert!(report.reply.content.ends_with("Note: Full AI responses require Azure OpenAI configuration."));
    assert!(!conv.lock().await.is_loading());
}

#[tokio::test]
async fn concurrent_send_is_rejected_while_loading() {
    let completion = MockCompletion::new(Script::Reply("x"));
    let agent = Arc::new(ScriptedAgent::replying("x"));
    let store = Arc::new(FlakyStore::new());
    let chat = dispatcher(Some(completion.clone()), store.clone(), agent.clone(), FallbackPolicy::default());
    let conv = Mutex::new(Conversation::new());
    conv.lock().await.begin_turn("first").unwrap();

    let err = chat.send(&conv, "second", idle()).await.unwrap_err();
    assert!(matches!(err, ChatError::TurnInFlight));
    assert_eq!(conv.lock().await.messages().len(), 2);
    assert_eq!(completion.call_count(), 0);
    assert_eq!(agent.call_count(), 0);
    assert!(store.call_log().is_empty());
}

#[tokio::test]
async fn any_failure_with_failing_agent_reuses_prompt_digest() {
    let store = Arc::new(FlakyStore::new());
    let chat = dispatcher(
        Some(MockCompletion::new(Script::Status(500))),
        store.clone(),
        Arc::new(ScriptedAgent::failing()),
        FallbackPolicy::AnyFailure,
    );
    let conv = Mutex::new(Conversation::new());

    let report = chat.send(&conv, "What's my inventory status?", idle()).await.unwrap();
    assert_eq!(report.outcome, TurnOutcome::Degraded);
    assert!(report.reply.content.contains("Total items: 5"));
    assert!(report.reply.content.ends_with("Note: Full AI responses require Azure OpenAI configuration."));
    assert_eq!(store.call_log(), vec!["inventory"]);
    assert!(!conv.lock().await.is_loading());
}

#[tokio::test]
async fn cancelled_completion_skips_agent_under_any_failure() {
    let agent = Arc::new(ScriptedAgent::replying("too late"));
    let chat = Arc::new(dispatcher(
        Some(MockCompletion::new(Script::WaitForCancel)),
        Arc::new(FlakyStore::new()),
        agent.clone(),
        FallbackPolicy::AnyFailure,
    ));
    let conv = Arc::new(Mutex::new(Conversation::new()));
    let (tx, rx) = watch::channel(false);

    let task = {
        let chat = chat.clone();
        let conv = conv.clone();
        tokio::spawn(async move { chat.send(&conv, "hello", rx).await })
    };
    tx.send(true).unwrap();

    let report = task.await.unwrap().unwrap();
    assert_eq!(report.outcome, TurnOutcome::Failed);
    assert_eq!(report.reply.content, APOLOGY_REPLY);
    assert_eq!(agent.call_count(), 0);
}

#[tokio::test]
async fn cancelled_completion_ends_turn() {
    let chat = Arc::new(dispatcher(
        Some(MockCompletion::new(Script::WaitForCancel)),
        Arc::new(FlakyStore::new()),
        Arc::new(ScriptedAgent::replying("x")),
        FallbackPolicy::MissingConfigOnly,
    ));
    let conv = Arc::new(Mutex::new(Conversation::new()));
    let (tx, rx) = watch::channel(false);

    let task = {
        let chat = chat.clone();
        let conv = conv.clone();
        tokio::spawn(async move { chat.send(&conv, "hello", rx).await })
    };
    tx.send(true).unwrap();

    let report = task.await.unwrap().unwrap();
    assert_eq!(report.outcome, TurnOutcome::Failed);
    assert!(!conv.lock().await.is_loading());
}
