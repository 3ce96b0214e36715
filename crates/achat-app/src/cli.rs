use std::path::PathBuf;

use clap::Parser;

/// achat: stream answers from a chat server in your terminal.
#[derive(Parser, Debug)]
#[command(name = "achat", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// WebSocket endpoint override (ws:// or wss://).
    #[arg(short = 'e', long)]
    pub endpoint: Option<String>,

    /// Toast language override (en, zh-CN).
    #[arg(long)]
    pub locale: Option<String>,

    /// Log filter override, e.g. `achat=debug`.
    #[arg(long)]
    pub log_level: Option<String>,
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides() {
        let args = Args::parse_from([
            "achat",
            "--endpoint",
            "ws://127.0.0.1:9000/ds-ws",
            "--locale",
            "en",
            "--config",
            "/tmp/achat.toml",
        ]);
        assert_eq!(args.endpoint.as_deref(), Some("ws://127.0.0.1:9000/ds-ws"));
        assert_eq!(args.locale.as_deref(), Some("en"));
        assert_eq!(args.config, Some(PathBuf::from("/tmp/achat.toml")));
        assert!(args.log_level.is_none());
    }

    #[test]
    fn no_flags_is_valid() {
        let args = Args::parse_from(["achat"]);
        assert!(args.endpoint.is_none());
        assert!(args.config.is_none());
    }
}
