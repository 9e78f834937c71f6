mod support;

use std::sync::Arc;

use assist_pipeline::command::builtin::COMMENT_INSTRUCTION;
use assist_pipeline::{
    delegate, AssistantSession, ChunkStream, CodeSelection, Command, CommandContext,
    CommandError, CommandHandler, CommandRegistry, EditCommand, WorkspaceInfo,
};
use chat_model::{ChatModel, ChatModelError, MessageContent, MessagePart};
use chat_model_mock::MockChatModel;
use futures_util::{stream, StreamExt};
use pretty_assertions::assert_eq;

use support::FakeHost;

fn context(model: Arc<dyn ChatModel>, input: &str) -> CommandContext {
    CommandContext::new(model, Arc::new(FakeHost::with_root()), input)
}

fn selection() -> WorkspaceInfo {
    WorkspaceInfo {
        selection: Some(CodeSelection {
            filepath: Some("src/lib.rs".to_string()),
            text: "fn add(a: i32, b: i32) -> i32 { a + b }".to_string(),
        }),
    }
}

async fn drain(stream: ChunkStream) -> Vec<Result<String, CommandError>> {
    stream.collect().await
}

#[tokio::test]
async fn unknown_command_fails_without_producing_a_stream() {
    let registry = CommandRegistry::with_builtins().expect("builtins register");
    let ctx = context(Arc::new(MockChatModel::default()), "");

    let error = registry
        .execute("does-not-exist", ctx)
        .err()
        .expect("unknown command should fail");

    assert_eq!(
        error,
        CommandError::UnknownCommand {
            name: "does-not-exist".to_string()
        }
    );
}

#[test]
fn registering_a_builtin_name_twice_is_rejected() {
    let mut registry = CommandRegistry::with_builtins().expect("builtins register");

    let error = registry
        .register(EditCommand::command())
        .expect_err("duplicate should fail");

    assert_eq!(
        error,
        CommandError::DuplicateName {
            name: "edit".to_string()
        }
    );
    assert_eq!(registry.commands().len(), 3);
}

#[tokio::test]
async fn execute_passes_chunks_through_unchanged() {
    let mut registry = CommandRegistry::new();
    registry
        .register(Command::new("scripted", "fixed output", |_ctx: CommandContext| -> ChunkStream {
            stream::iter(["a", "b", "c"].map(|chunk| Ok(chunk.to_string()))).boxed()
        }))
        .expect("register");

    let stream = registry
        .execute("scripted", context(Arc::new(MockChatModel::default()), ""))
        .expect("known command");

    assert_eq!(
        drain(stream).await,
        vec![Ok("a".to_string()), Ok("b".to_string()), Ok("c".to_string())]
    );
}

#[tokio::test]
async fn delegating_handler_reemits_inner_chunks_and_failure() {
    let inner = |ctx: CommandContext| -> ChunkStream {
        stream::iter(vec![
            Ok(format!("input={}", ctx.input)),
            Ok("second".to_string()),
            Err(CommandError::StreamInterrupted(ChatModelError::new("boom"))),
        ])
        .boxed()
    };
    let outer = move |ctx: CommandContext| -> ChunkStream { delegate(&inner, &ctx, "rewritten") };

    let ctx = context(Arc::new(MockChatModel::default()), "original");
    let chunks = drain(outer.run(ctx.clone())).await;

    assert_eq!(
        chunks,
        vec![
            Ok("input=rewritten".to_string()),
            Ok("second".to_string()),
            Err(CommandError::StreamInterrupted(ChatModelError::new("boom"))),
        ]
    );
    assert_eq!(ctx.input, "original");
}

#[tokio::test]
async fn comment_output_equals_edit_output_with_the_fixed_instruction() {
    let model = Arc::new(MockChatModel::new(vec!["// adds\nfn add() {}".to_string()]));
    let registry = CommandRegistry::with_builtins().expect("builtins register");

    let comment_ctx = context(model.clone(), "ignored").with_workspace(selection());
    let comment = drain(registry.execute("comment", comment_ctx).expect("comment")).await;

    let edit_ctx = context(model.clone(), COMMENT_INSTRUCTION).with_workspace(selection());
    let edit = drain(registry.execute("edit", edit_ctx).expect("edit")).await;

    assert_eq!(comment, edit);
    assert_eq!(
        comment,
        vec![Ok("// ".to_string()), Ok("adds\n".to_string()), Ok("fn ".to_string()), Ok("add() ".to_string()), Ok("{}".to_string())]
    );

    let requests = model.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0], requests[1]);
}

#[tokio::test]
async fn edit_without_selection_fails_before_calling_the_model() {
    let model = Arc::new(MockChatModel::default());
    let registry = CommandRegistry::with_builtins().expect("builtins register");

    let chunks = drain(
        registry
            .execute("edit", context(model.clone(), "make it faster"))
            .expect("edit"),
    )
    .await;

    assert_eq!(chunks, vec![Err(CommandError::NothingSelected)]);
    assert!(model.requests().is_empty());
}

#[tokio::test]
async fn edit_reaches_the_model_only_once_polled() {
    let model = Arc::new(MockChatModel::new(vec!["fn sum() {}".to_string()]));
    let registry = CommandRegistry::with_builtins().expect("builtins register");

    let stream = registry
        .execute("edit", context(model.clone(), "rename").with_workspace(selection()))
        .expect("edit is registered");
    assert!(model.requests().is_empty());

    let chunks = drain(stream).await;

    assert!(chunks.iter().all(Result::is_ok));
    assert_eq!(model.requests().len(), 1);
}

#[tokio::test]
async fn model_failure_mid_stream_keeps_earlier_chunks() {
    let model = Arc::new(
        MockChatModel::new(vec!["one two three".to_string()]).with_failure_after(2, "connection reset"),
    );
    let registry = CommandRegistry::with_builtins().expect("builtins register");

    let chunks = drain(
        registry
            .execute("edit", context(model, "").with_workspace(selection()))
            .expect("edit"),
    )
    .await;

    assert_eq!(
        chunks,
        vec![
            Ok("one ".to_string()),
            Ok("two ".to_string()),
            Err(CommandError::StreamInterrupted(ChatModelError::new("connection reset"))),
        ]
    );
}

#[tokio::test]
async fn image_parts_never_reach_the_consumer() {
    let model = Arc::new(MockChatModel::with_contents(vec![MessageContent::Parts(vec![
        MessagePart::Text {
            text: "before".to_string(),
        },
        MessagePart::ImageUrl {
            url: "data:image/png;base64,AAAA".to_string(),
        },
        MessagePart::Text {
            text: "after".to_string(),
        },
    ])]));
    let registry = CommandRegistry::with_builtins().expect("builtins register");

    let chunks = drain(
        registry
            .execute("edit", context(model, "").with_workspace(selection()))
            .expect("edit"),
    )
    .await;

    assert_eq!(chunks, vec![Ok("before\nafter".to_string())]);
}

#[tokio::test]
async fn onboard_sends_one_user_message_built_from_the_workspace() {
    let host = Arc::new(FakeHost::with_root());
    host.add_file("/work/README.md", "# Demo project");
    host.add_file("/work/Cargo.toml", "[package]\nname = \"demo\"");
    host.add_file("/work/src/main.rs", "fn main() {}");
    let model = Arc::new(MockChatModel::new(vec!["overview".to_string()]));

    let session = AssistantSession::new(model.clone(), host).expect("session");
    let chunks = drain(session.run("onboard", "").expect("onboard")).await;

    assert_eq!(chunks, vec![Ok("overview".to_string())]);
    let requests = model.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].len(), 1);
    let MessageContent::Text(prompt) = &requests[0][0].content else {
        panic!("onboarding prompt should be plain text");
    };
    assert!(prompt.contains("README for README.md:\n# Demo project\n\n"));
    assert!(prompt.contains("Cargo.toml for Cargo.toml:\n[package]\nname = \"demo\"\n\n"));
    assert!(prompt.contains("\nFolder: src\n"));
    assert!(!prompt.contains("fn main() {}"));
}

#[tokio::test]
async fn onboard_without_workspace_root_fails() {
    let model = Arc::new(MockChatModel::default());
    let session = AssistantSession::new(model.clone(), Arc::new(FakeHost::new())).expect("session");

    let chunks = drain(session.run("onboard", "").expect("onboard")).await;

    assert_eq!(chunks, vec![Err(CommandError::NoWorkspace)]);
    assert!(model.requests().is_empty());
}
