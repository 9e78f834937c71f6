use std::io;
use std::path::Path;
use std::sync::Arc;

use assist_pipeline::logging::init_logging;
use assist_pipeline::{AssistantSession, EnvConfig, WorkspaceInfo};
use assistant_cli::cli::{apply_all, describe_blocks, parse_args, selection_from_file, stream_to};
use assistant_cli::host::LocalHost;
use assistant_cli::providers;

const SELECTION_ENV_VAR: &str = "ASSIST_SELECTION_FILE";

#[tokio::main(flavor = "current_thread")]
async fn main() -> io::Result<()> {
    let config = EnvConfig::from_env();
    init_logging(config.log_filter.as_deref());

    let args = parse_args(std::env::args().skip(1)).map_err(io::Error::other)?;

    let workspace_root = match &config.workspace {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };
    let (host, mut events) = LocalHost::new(&workspace_root).map_err(io::Error::other)?;
    let mut host = host.with_run_timeout(config.run_timeout);
    if let Some(current_file) = &config.current_file {
        host = host.with_current_file(current_file);
    }
    let host = Arc::new(host);

    let model = providers::provider_for_id(&config.provider).map_err(io::Error::other)?;
    let mut session = AssistantSession::new(model, host.clone())
        .map_err(io::Error::other)?
        .with_capabilities(config.host_capabilities());

    if let Some(path) = std::env::var_os(SELECTION_ENV_VAR).filter(|value| !value.is_empty()) {
        let selection = selection_from_file(Path::new(&path), host.workspace_root())
            .map_err(io::Error::other)?;
        session.set_workspace(WorkspaceInfo {
            selection: Some(selection),
        });
    }

    let stream = session
        .run(&args.invocation.name, &args.invocation.input)
        .map_err(io::Error::other)?;
    let mut stdout = io::stdout();
    let response = stream_to(&mut stdout, stream)
        .await
        .map_err(io::Error::other)?;

    let handles = session
        .controller()
        .mount_response(&response)
        .map_err(io::Error::other)?;
    if !handles.is_empty() {
        println!("\n\ncode blocks:\n{}", describe_blocks(&handles));
    }

    if args.apply {
        for line in apply_all(&session, &handles, &mut events) {
            println!("{line}");
        }
        for run in host.command_runs() {
            println!("\n$ {}\n{}", run.command, run.output);
        }
    }

    session.shutdown();
    Ok(())
}
