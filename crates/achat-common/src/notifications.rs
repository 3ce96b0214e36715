use std::sync::Arc;

use tracing::debug;

use crate::i18n::Translate;

/// Severity of a toast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Success,
    Error,
}

/// A transient user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub text: String,
}

impl Toast {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Success,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Error,
            text: text.into(),
        }
    }
}

/// Presentation sink for toasts. Implemented by each front end.
pub trait Toaster: Send {
    fn show(&mut self, toast: Toast);
}

/// The fixed set of localized notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Cleared,
    Copied,
    Reset,
    Deleted,
    NetworkError,
}

impl NoticeKind {
    /// Translation key for this notice.
    pub fn key(self) -> &'static str {
        match self {
            Self::Cleared => "notification.cleared",
            Self::Copied => "notification.copied",
            Self::Reset => "notification.reset",
            Self::Deleted => "notification.deleted",
            Self::NetworkError => "notification.network-error",
        }
    }
}

/// Maps session and UI events onto toast calls.
pub struct NotificationBridge {
    toaster: Box<dyn Toaster>,
    translator: Arc<dyn Translate>,
}

impl NotificationBridge {
    pub fn new(toaster: Box<dyn Toaster>, translator: Arc<dyn Translate>) -> Self {
        Self {
            toaster,
            translator,
        }
    }

    /// Show an error toast with the literal message.
    pub fn notify_error(&mut self, message: &str) {
        debug!(message = %message, "error toast");
        self.toaster.show(Toast::error(message));
    }

    /// Show a success toast with the localized text for `kind`.
    pub fn notify_success(&mut self, kind: NoticeKind) {
        let text = self.translator.translate(kind.key());
        debug!(kind = ?kind, "success toast");
        self.toaster.show(Toast::success(text));
    }

    /// The generic failure shown for any transport or server error.
    pub fn notify_network_error(&mut self) {
        let text = self.translator.translate(NoticeKind::NetworkError.key());
        self.notify_error(&text);
    }
}

impl std::fmt::Debug for NotificationBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationBridge").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::i18n::Catalog;

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<Toast>>>);

    impl Toaster for Recorder {
        fn show(&mut self, toast: Toast) {
            self.0.lock().unwrap().push(toast);
        }
    }

    fn bridge(locale: &str) -> (NotificationBridge, Recorder) {
        let recorder = Recorder::default();
        let bridge = NotificationBridge::new(
            Box::new(recorder.clone()),
            Arc::new(Catalog::built_in(locale)),
        );
        (bridge, recorder)
    }

    #[test]
    fn error_toast_uses_literal_message() {
        let (mut bridge, recorder) = bridge("en");
        bridge.notify_error("socket closed");
        let shown = recorder.0.lock().unwrap();
        assert_eq!(shown.as_slice(), &[Toast::error("socket closed")]);
    }

    #[test]
    fn success_toast_is_translated() {
        let (mut bridge, recorder) = bridge("zh-CN");
        bridge.notify_success(NoticeKind::Cleared);
        bridge.notify_success(NoticeKind::Deleted);
        let shown = recorder.0.lock().unwrap();
        assert_eq!(
            shown.as_slice(),
            &[Toast::success("已清空"), Toast::success("已删除")]
        );
    }

    #[test]
    fn network_error_is_an_error_toast() {
        let (mut bridge, recorder) = bridge("en");
        bridge.notify_network_error();
        let shown = recorder.0.lock().unwrap();
        assert_eq!(shown.len(), 1);
        assert_eq!(shown[0].level, ToastLevel::Error);
        assert_eq!(shown[0].text, "Network error, please try again");
    }

    #[test]
    fn notice_keys_are_distinct() {
        let kinds = [
            NoticeKind::Cleared,
            NoticeKind::Copied,
            NoticeKind::Reset,
            NoticeKind::Deleted,
            NoticeKind::NetworkError,
        ];
        let mut keys: Vec<_> = kinds.iter().map(|k| k.key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), kinds.len());
    }
}
