pub mod errors;
pub mod i18n;
pub mod notifications;

pub use errors::{AchatError, ConfigError, PlatformError, SessionError};
pub use i18n::{Catalog, Translate};
pub use notifications::{NoticeKind, NotificationBridge, Toast, ToastLevel, Toaster};

pub type Result<T> = std::result::Result<T, AchatError>;
