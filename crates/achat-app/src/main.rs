mod cli;
mod clipboard;
mod repl;
mod terminal;

use std::io;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use achat_common::{AchatError, Catalog, NotificationBridge};
use achat_config::AchatConfig;
use achat_session::{ChatSession, Connector, Identity, SessionConfig, WsConnector};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::mpsc;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

use crate::repl::Flow;
use crate::terminal::{TerminalToaster, TerminalView};

const DEFAULT_LOG_FILTER: &str = "achat=info";

type FilterHandle = reload::Handle<EnvFilter, Registry>;

/// Pick the startup log directive. The flag is `true` when neither
/// `RUST_LOG` nor `--log-level` was given, meaning the config file's level
/// should replace the default once the config is loaded.
fn initial_directive(env: Option<&str>, cli: Option<&str>) -> (String, bool) {
    match (env.filter(|v| !v.trim().is_empty()), cli) {
        (Some(env), _) => (env.to_string(), false),
        (None, Some(cli)) => (cli.to_string(), false),
        (None, None) => (DEFAULT_LOG_FILTER.to_string(), true),
    }
}

/// Install logging before anything else runs, so the config loader's
/// warnings reach stderr.
fn init_logging(cli_level: Option<&str>) -> Option<FilterHandle> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (directive, from_config) = initial_directive(env.as_deref(), cli_level);
    let filter =
        EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let (filter, handle) = reload::Layer::new(filter);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();
    from_config.then_some(handle)
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::parse();
    let config_filter = init_logging(args.log_level.as_deref());

    tracing::info!("achat v{} starting", env!("CARGO_PKG_VERSION"));

    if let Some(ref path) = args.config {
        tracing::info!("using config override: {}", path.display());
    }
    let mut config = match achat_config::load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("config load failed: {e}");
            eprintln!("achat: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Some(endpoint) = args.endpoint {
        config.endpoint.url = endpoint;
    }
    if let Some(locale) = args.locale {
        config.notifications.locale = locale;
    }
    if let Err(e) = achat_config::validation::validate(&config) {
        tracing::error!("invalid command line override: {e}");
        eprintln!("achat: {e}");
        return ExitCode::FAILURE;
    }

    if let Some(handle) = config_filter {
        if let Err(e) = handle.reload(EnvFilter::new(&config.logging.level)) {
            tracing::warn!("failed to apply configured log level: {e}");
        }
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            eprintln!("achat: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AchatConfig) -> Result<(), AchatError> {
    let catalog = Catalog::built_in(&config.notifications.locale)
        .with_overrides(&config.notifications.strings);
    let notifier = NotificationBridge::new(Box::new(TerminalToaster::stderr()), Arc::new(catalog));

    let timeout = Duration::from_secs(config.endpoint.connect_timeout_secs.into());
    let (connector, mut events) = WsConnector::new(timeout);

    let session_config = SessionConfig {
        endpoint: config.endpoint.url.clone(),
        identity: Identity {
            user_uuid: config.identity.user_uuid,
            from: config.identity.from,
            pid: config.identity.pid,
        },
        max_messages: config.transcript.max_messages as usize,
    };
    let mut session = ChatSession::new(session_config, connector, notifier);

    let mut view = TerminalView::new(io::stdout());
    view.banner(&config.endpoint.url)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let result = event_loop(&mut session, &mut view, &mut lines, &mut events).await;

    // Always close the link, even when the loop bailed out.
    let _ = view.end_line();
    session.disconnect();
    tracing::info!("shutdown complete");
    result
}

async fn event_loop<C, R, W>(
    session: &mut ChatSession<C>,
    view: &mut TerminalView<W>,
    lines: &mut Lines<R>,
    events: &mut mpsc::Receiver<achat_session::LinkEvent>,
) -> Result<(), AchatError>
where
    C: Connector,
    R: AsyncBufRead + Unpin,
    W: io::Write,
{
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        tracing::debug!("stdin closed");
                        return Ok(());
                    }
                    Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                        tracing::warn!("skipping unreadable input line: {e}");
                        view.hint("input was not valid UTF-8, ignored")?;
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                };
                if repl::dispatch(session, view, &line)? == Flow::Quit {
                    return Ok(());
                }
            }
            Some(event) = events.recv() => {
                let update = session.handle_event(event);
                view.update(&update)?;
            }
        }
    }
}
