//! Integration tests for the plan-normalization pipeline.
//!
//! All provider traffic goes through recording stubs, so these tests
//! exercise dispatch, parsing tiers, and error classification without
//! network access.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use waypoint_core::models::Message;
use waypoint_core::params::GeneratePlan;
use waypoint_core::providers::{ChatClient, ChatReply, Transport};
use waypoint_core::{Plan, PlannerBuilder, Result, WaypointError};

/// Records every POST and replies with a canned body.
struct StubTransport {
    reply: String,
    calls: Mutex<Vec<RecordedPost>>,
}

#[derive(Debug, Clone)]
struct RecordedPost {
    url: String,
    body: serde_json::Value,
    headers: Vec<(String, String)>,
}

impl StubTransport {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<RecordedPost> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for StubTransport {
    async fn post(
        &self,
        url: &str,
        body: &serde_json::Value,
        headers: &[(String, String)],
    ) -> Result<String> {
        self.calls.lock().unwrap().push(RecordedPost {
            url: url.to_string(),
            body: body.clone(),
            headers: headers.to_vec(),
        });
        Ok(self.reply.clone())
    }
}

/// Records every chat send and replies with a canned reply.
struct StubChat {
    reply: ChatReply,
    calls: Mutex<Vec<RecordedSend>>,
}

#[derive(Debug, Clone)]
struct RecordedSend {
    model: String,
    message_count: usize,
    stream: bool,
}

impl StubChat {
    fn replying(reply: ChatReply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn with_message(content: &str) -> Arc<Self> {
        Self::replying(ChatReply::Message {
            content: content.to_string(),
        })
    }

    fn calls(&self) -> Vec<RecordedSend> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatClient for StubChat {
    async fn send(&self, model: &str, messages: &[Message], stream: bool) -> Result<ChatReply> {
        self.calls.lock().unwrap().push(RecordedSend {
            model: model.to_string(),
            message_count: messages.len(),
            stream,
        });
        Ok(self.reply.clone())
    }
}

fn planner_with(transport: Arc<StubTransport>, chat: Arc<StubChat>) -> waypoint_core::Planner {
    PlannerBuilder::new()
        .with_termux(true)
        .with_transport(transport)
        .with_chat_client(chat)
        .build()
        .unwrap()
}

fn heuristic_params(description: &str) -> GeneratePlan {
    GeneratePlan {
        description: description.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn heuristic_plan_mirrors_sentence_segments() {
    let transport = StubTransport::replying("");
    let chat = StubChat::with_message("");
    let planner = planner_with(Arc::clone(&transport), Arc::clone(&chat));

    let plan = planner
        .generate_plan(&heuristic_params(
            "create api endpoint. add tests. update docs.",
        ))
        .await
        .unwrap();

    assert_eq!(plan.summary, "Create api endpoint");
    assert_eq!(plan.steps.len(), 3);
    assert_eq!(plan.steps[1].title, "Add tests");
    assert!(plan
        .environment_note
        .starts_with("Environment: Detected Termux"));
    // No provider was configured, so nothing left the process.
    assert!(transport.calls().is_empty());
    assert!(chat.calls().is_empty());
}

#[tokio::test]
async fn empty_description_yields_empty_plan() {
    let planner = planner_with(StubTransport::replying(""), StubChat::with_message(""));

    let plan = planner
        .generate_plan(&heuristic_params("   \n  "))
        .await
        .unwrap();

    assert!(plan.is_empty());
    assert!(plan.summary.is_empty());
    assert!(!plan.environment_note.is_empty());
}

#[tokio::test]
async fn max_steps_truncates_heuristic_output() {
    let planner = planner_with(StubTransport::replying(""), StubChat::with_message(""));

    let params = GeneratePlan {
        description: "one. two. three. four.".to_string(),
        max_steps: Some(2),
        ..Default::default()
    };
    let plan = planner.generate_plan(&params).await.unwrap();
    assert_eq!(plan.steps.len(), 2);
    assert_eq!(plan.steps[1].title, "Two");
}

#[tokio::test]
async fn ollama_strict_json_reply_becomes_structured_plan() {
    let reply = r#"{
        "task_summary": "Install dependencies",
        "steps": [
            {"title": "Update package lists", "command": "pkg update -y",
             "notes": "Ensure repositories are reachable"},
            {"title": "Install git", "command": "pkg install -y git"}
        ],
        "environment": "Termux detected"
    }"#;
    let transport = StubTransport::replying("");
    let chat = StubChat::with_message(reply);
    let planner = planner_with(Arc::clone(&transport), Arc::clone(&chat));

    let params = GeneratePlan {
        description: "install deps".to_string(),
        provider: Some("ollama".to_string()),
        model: Some("gemma3".to_string()),
        ..Default::default()
    };
    let plan = planner.generate_plan(&params).await.unwrap();

    assert_eq!(plan.summary, "Install dependencies");
    assert_eq!(plan.steps.len(), 2);
    assert_eq!(plan.steps[0].command.as_deref(), Some("pkg update -y"));
    assert_eq!(plan.environment_note, "Environment: Termux detected");

    let sends = chat.calls();
    assert_eq!(sends.len(), 1);
    assert_eq!(sends[0].model, "gemma3");
    assert!(!sends[0].stream);
    // System prompt plus the single user message.
    assert_eq!(sends[0].message_count, 2);
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn ollama_model_alias_implies_the_provider() {
    let chat = StubChat::with_message("1. gather tools\n2. run build");
    let planner = planner_with(StubTransport::replying(""), Arc::clone(&chat));

    let params = GeneratePlan {
        description: "build the project".to_string(),
        ollama_model: Some("llama3".to_string()),
        ..Default::default()
    };
    let plan = planner.generate_plan(&params).await.unwrap();

    // Non-JSON text falls through to listing-line parsing.
    assert_eq!(plan.steps.len(), 2);
    assert_eq!(plan.steps[0].title, "Gather tools");
    assert_eq!(plan.steps[1].title, "Run build");
    assert_eq!(plan.summary, "Build the project");
    assert_eq!(chat.calls()[0].model, "llama3");
}

#[tokio::test]
async fn unparsable_reply_falls_back_to_heuristic() {
    let chat = StubChat::with_message("   \n  \n");
    let planner = planner_with(StubTransport::replying(""), Arc::clone(&chat));

    let params = GeneratePlan {
        description: "update packages. reboot shell.".to_string(),
        provider: Some("ollama".to_string()),
        model: Some("gemma3".to_string()),
        ..Default::default()
    };
    let plan = planner.generate_plan(&params).await.unwrap();
    assert_eq!(plan.steps.len(), 2);
    assert_eq!(plan.steps[0].title, "Update packages");
}

#[tokio::test]
async fn streamed_chunks_are_concatenated_before_parsing() {
    let chunks = ChatReply::Chunks(vec![
        "{\"task_summary\": \"Chunked\",".to_string(),
        " \"steps\": [{\"title\": \"only step\"}]}".to_string(),
    ]);
    let chat = StubChat::replying(chunks);
    let planner = planner_with(StubTransport::replying(""), Arc::clone(&chat));

    let params = GeneratePlan {
        description: "stream it".to_string(),
        provider: Some("ollama".to_string()),
        model: Some("gemma3".to_string()),
        stream: true,
        ..Default::default()
    };
    let plan = planner.generate_plan(&params).await.unwrap();
    assert_eq!(plan.summary, "Chunked");
    assert_eq!(plan.steps[0].title, "Only step");
    assert!(chat.calls()[0].stream);
}

#[tokio::test]
async fn ollama_without_model_is_a_configuration_error() {
    let chat = StubChat::with_message("unused");
    let planner = planner_with(StubTransport::replying(""), Arc::clone(&chat));

    let params = GeneratePlan {
        description: "anything".to_string(),
        provider: Some("ollama".to_string()),
        ..Default::default()
    };
    let result = planner.generate_plan(&params).await;
    assert!(matches!(result, Err(WaypointError::Configuration { .. })));
    assert!(chat.calls().is_empty());
}

#[tokio::test]
async fn missing_api_key_fails_before_any_transport_call() {
    let transport = StubTransport::replying("unused");
    let planner = planner_with(Arc::clone(&transport), StubChat::with_message(""));

    let params = GeneratePlan {
        description: "anything".to_string(),
        provider: Some("openrouter".to_string()),
        model: Some("some/model".to_string()),
        ..Default::default()
    };
    let result = planner.generate_plan(&params).await;
    assert!(matches!(result, Err(WaypointError::Configuration { .. })));
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn openrouter_sends_bearer_auth_to_the_chat_completions_url() {
    let reply = r#"{"choices": [{"message": {"content": "1. first\n2. second"}}]}"#;
    let transport = StubTransport::replying(reply);
    let planner = planner_with(Arc::clone(&transport), StubChat::with_message(""));

    let mut options = BTreeMap::new();
    options.insert("api_key".to_string(), "sk-test".to_string());
    let params = GeneratePlan {
        description: "do the thing".to_string(),
        provider: Some("openrouter".to_string()),
        model: Some("qwen/qwen-2.5".to_string()),
        options,
        ..Default::default()
    };
    let plan = planner.generate_plan(&params).await.unwrap();
    assert_eq!(plan.steps.len(), 2);

    let posts = transport.calls();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].url, "https://openrouter.ai/api/v1/chat/completions");
    assert_eq!(posts[0].body["model"], "qwen/qwen-2.5");
    assert_eq!(
        posts[0].headers,
        vec![("Authorization".to_string(), "Bearer sk-test".to_string())]
    );
}

#[tokio::test]
async fn gemini_puts_the_key_in_the_url_and_defaults_the_model() {
    let reply = r#"{"candidates": [{"content": {"parts": [{"text": "single step plan"}]}}]}"#;
    let transport = StubTransport::replying(reply);
    let planner = planner_with(Arc::clone(&transport), StubChat::with_message(""));

    let mut options = BTreeMap::new();
    options.insert("api_key".to_string(), "g-key".to_string());
    let params = GeneratePlan {
        description: "plan something".to_string(),
        provider: Some("gemini".to_string()),
        options,
        ..Default::default()
    };
    let plan = planner.generate_plan(&params).await.unwrap();
    assert_eq!(plan.steps.len(), 1);

    let posts = transport.calls();
    assert_eq!(
        posts[0].url,
        "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent?key=g-key"
    );
    assert!(posts[0].headers.is_empty());
}

#[tokio::test]
async fn cohere_sends_the_version_header_and_chat_payload() {
    let reply = r#"{"text": "- check battery\n- charge device"}"#;
    let transport = StubTransport::replying(reply);
    let planner = planner_with(Arc::clone(&transport), StubChat::with_message(""));

    let mut options = BTreeMap::new();
    options.insert("api_key".to_string(), "co-key".to_string());
    let params = GeneratePlan {
        description: "battery check".to_string(),
        provider: Some("cohere".to_string()),
        model: Some("command-r".to_string()),
        options,
        ..Default::default()
    };
    let plan = planner.generate_plan(&params).await.unwrap();
    assert_eq!(plan.steps.len(), 2);

    let posts = transport.calls();
    assert_eq!(posts[0].url, "https://api.cohere.com/v1/chat");
    assert_eq!(posts[0].body["model"], "command-r");
    assert!(posts[0].body["message"].is_string());
    assert!(posts[0]
        .headers
        .contains(&("Cohere-Version".to_string(), "2024-10-22".to_string())));
}

#[tokio::test]
async fn unknown_provider_is_unavailable_not_a_panic() {
    let transport = StubTransport::replying("unused");
    let planner = planner_with(Arc::clone(&transport), StubChat::with_message(""));

    let params = GeneratePlan {
        description: "anything".to_string(),
        provider: Some("delphi".to_string()),
        ..Default::default()
    };
    let result = planner.generate_plan(&params).await;
    match result {
        Err(WaypointError::ProviderUnavailable { message }) => {
            assert!(message.contains("delphi"));
        }
        other => panic!("expected provider-unavailable, got {other:?}"),
    }
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn serialized_plans_parse_back_unchanged() {
    let planner = planner_with(StubTransport::replying(""), StubChat::with_message(""));

    let original = planner
        .generate_plan(&heuristic_params("install dependencies. run the suite."))
        .await
        .unwrap();

    // A plan serialized with the public schema is valid strict-JSON
    // provider output.
    let as_json = serde_json::json!({
        "task_summary": original.summary,
        "steps": original.steps,
        "environment": original.environment_note,
    })
    .to_string();

    let replay = StubChat::with_message(&as_json);
    let planner = planner_with(StubTransport::replying(""), replay);
    let params = GeneratePlan {
        description: "install dependencies. run the suite.".to_string(),
        provider: Some("ollama".to_string()),
        model: Some("gemma3".to_string()),
        ..Default::default()
    };
    let round_tripped: Plan = planner.generate_plan(&params).await.unwrap();

    assert_eq!(round_tripped.summary, original.summary);
    assert_eq!(round_tripped.steps, original.steps);
    assert_eq!(round_tripped.environment_note, original.environment_note);
}
