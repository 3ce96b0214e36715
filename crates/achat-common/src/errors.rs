use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("clipboard error: {0}")]
    ClipboardError(String),
}

/// Errors raised by the chat session state machine and its transport.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("prompt is empty")]
    EmptyPrompt,

    #[error("a reply is still streaming")]
    Busy,

    #[error("no reply is streaming")]
    NotBusy,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("protocol error: {0}")]
    Protocol(String),
}

#[derive(Debug, thiserror::Error)]
pub enum AchatError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("endpoint.url is empty".into());
        assert_eq!(
            err.to_string(),
            "config validation error: endpoint.url is empty"
        );
    }

    #[test]
    fn session_error_display() {
        assert_eq!(SessionError::EmptyPrompt.to_string(), "prompt is empty");
        assert_eq!(SessionError::Busy.to_string(), "a reply is still streaming");

        let err = SessionError::Transport("connection refused".into());
        assert_eq!(err.to_string(), "transport error: connection refused");

        let err = SessionError::Protocol("missing cmd".into());
        assert_eq!(err.to_string(), "protocol error: missing cmd");
    }

    #[test]
    fn achat_error_from_session() {
        let err: AchatError = SessionError::Busy.into();
        assert!(matches!(err, AchatError::Session(SessionError::Busy)));
        assert_eq!(err.to_string(), "a reply is still streaming");
    }

    #[test]
    fn achat_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: AchatError = config_err.into();
        assert!(matches!(err, AchatError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn achat_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdin closed");
        let err: AchatError = io_err.into();
        assert!(matches!(err, AchatError::Io(_)));
        assert!(err.to_string().contains("stdin closed"));
    }

    #[test]
    fn platform_error_display() {
        let err = PlatformError::ClipboardError("no display".into());
        assert_eq!(err.to_string(), "clipboard error: no display");
    }
}
