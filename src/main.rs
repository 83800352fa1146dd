use std::fs::File;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use candidate_chat::api::{ApiError, ChatBackend, HttpChatClient};
use candidate_chat::core::config::{self, CliOverrides, ResolvedConfig};
use candidate_chat::core::message::{Message, MessageMetadata};
use candidate_chat::core::state::App;
use candidate_chat::tui;
use clap::{Parser, Subcommand};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

#[derive(Parser)]
#[command(
    name = "candidate-chat",
    about = "Chat with the Candidate RAG assistant from the terminal"
)]
struct Args {
    /// Backend base URL (overrides config file and CANDIDATE_CHAT_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Send one message and print the reply
    Ask {
        message: String,
        /// Continue an existing conversation
        #[arg(long)]
        conversation_id: Option<String>,
    },
    /// Clear one conversation, or all of them when no id is given
    Clear {
        #[arg(long)]
        conversation_id: Option<String>,
    },
    /// Check that the backend is up
    Health,
}

#[tokio::main]
async fn main() -> std::io::Result<ExitCode> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // The TUI owns stdout, so logs go to a file in the current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("candidate-chat.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let config = load_resolved_config(&args);
    log::info!(
        "candidate-chat starting (api_url={}, timeout={}s)",
        config.api_url,
        config.request_timeout_secs
    );
    if let Some(path) = config::config_path() {
        log::debug!("Config path: {}", path.display());
    }

    let client = HttpChatClient::new(
        &config.api_url,
        Duration::from_secs(config.request_timeout_secs),
    )
    .map_err(std::io::Error::other)?;
    let backend: Arc<dyn ChatBackend> = Arc::new(client);

    match args.command {
        None => {
            tui::run(App::from_config(backend, &config))?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Command::Ask {
            message,
            conversation_id,
        }) => Ok(report(ask(backend.as_ref(), &message, conversation_id).await)),
        Some(Command::Clear { conversation_id }) => {
            let result = backend
                .clear_conversation(conversation_id.as_deref())
                .await
                .map(|reply| {
                    println!("{}", reply.message);
                });
            Ok(report(result))
        }
        Some(Command::Health) => {
            let result = backend.check_health().await.map(|health| {
                println!("{}: {}", backend.location(), health.status);
            });
            Ok(report(result))
        }
    }
}

fn load_resolved_config(args: &Args) -> ResolvedConfig {
    let file_config = config::load_config().unwrap_or_else(|e| {
        log::warn!("Ignoring unreadable config: {}", e);
        Default::default()
    });
    let cli = CliOverrides {
        api_url: args.api_url.clone(),
        request_timeout_secs: args.timeout,
    };
    config::resolve(&file_config, &cli)
}

async fn ask(
    backend: &dyn ChatBackend,
    message: &str,
    conversation_id: Option<String>,
) -> Result<(), ApiError> {
    let is_followup = conversation_id.is_some();
    let reply = backend
        .send_message(message, conversation_id.as_deref())
        .await?;

    let metadata = MessageMetadata::from_response(reply.meta.as_ref(), is_followup);
    let shown = Message::bot(reply.response).with_metadata(metadata);

    println!("{}", shown.content);
    let footer: Vec<String> = [shown.metadata_summary(), shown.missing_information_note()]
        .into_iter()
        .flatten()
        .collect();
    if !footer.is_empty() {
        println!();
        println!("{}", footer.join("\n"));
    }
    if let Some(id) = reply.conversation_id.or(conversation_id) {
        println!("conversation_id: {id}");
    }
    Ok(())
}

fn report(result: Result<(), ApiError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::warn!("Command failed: {}", e);
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
