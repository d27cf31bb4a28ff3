//! Chatline - terminal chat client entry point.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use chatline_client::application::{ChatSession, SessionError};
use chatline_client::infrastructure::config::ClientConfig;
use chatline_client::infrastructure::websocket::TungsteniteConnector;
use chatline_client::ports::outbound::{ChatAction, Store};
use chatline_client::state::ChatStore;
use chatline_client::ui::{self, Command};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv_from_repo_root();

    // Logs go to stderr so they don't interleave with the chat transcript.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chatline_client=info,chatline_shared=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!("Starting Chatline");

    let config = ClientConfig::from_env()?;
    tracing::info!(
        host = config.page.host(),
        secure = config.page.is_secure(),
        "Chat page configured"
    );
    let connector = Arc::new(TungsteniteConnector::new(config.backoff));
    let session = ChatSession::new(config.page.clone(), connector, config.sequencing);
    let store = ChatStore::new();

    let offset = config.utc_offset;
    store.subscribe(move |action, state| {
        for line in ui::render_update(action, state, offset) {
            println!("{line}");
        }
    });

    // With a user already in state, the open handshake logs in and catches up.
    if let Some(user) = &config.user {
        store.dispatch(ChatAction::LoginRequested { user: user.clone() });
    }

    session.connect();
    session.listen(Arc::new(store.clone()))?;
    tracing::info!(url = %session.url(), sequencing = ?session.sequencing(), "Listening");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => break,
        };
        let Some(line) = line else {
            break;
        };

        let command = match ui::parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{e}");
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Rooms => {
                for line in ui::room_list(&store.state()) {
                    println!("{line}");
                }
            }
            command => {
                if let Err(e) = run_command(&command, &store, &session) {
                    eprintln!("{e}");
                }
            }
        }
    }

    session.disconnect();
    tracing::info!("Chatline stopped");
    Ok(())
}

fn run_command(command: &Command, store: &ChatStore, session: &ChatSession) -> anyhow::Result<()> {
    let Some(thunk) = ui::thunk_for(command, &store.state())? else {
        return Ok(());
    };
    match thunk(store, session) {
        Err(e) if e.is_transient() => {
            Err(anyhow::anyhow!("not connected right now, try again shortly"))
        }
        Err(SessionError::NotConnected) => Err(anyhow::anyhow!("session is not connected")),
        result => Ok(result?),
    }
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
