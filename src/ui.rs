//! Toasts and timed navigation.
//!
//! Handlers never talk to the page directly. They push effects through the
//! [`Notifier`] and [`Navigator`] seams, and the collected [`PageEffects`] are
//! rendered into the template context afterwards.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Navigation {
    pub target: String,
    pub delay_ms: u64,
}

impl Navigation {
    pub fn new(target: impl Into<String>, delay_ms: u64) -> Self {
        Self {
            target: target.into(),
            delay_ms,
        }
    }

    /// Delay in seconds, as used by a `refresh` meta tag.
    pub fn delay_secs(&self) -> f64 {
        self.delay_ms as f64 / 1000.0
    }
}

pub trait Notifier {
    fn toast(&mut self, kind: ToastKind, message: &str);
}

pub trait Navigator {
    fn navigate(&mut self, navigation: Navigation);
}

#[derive(Debug, Default)]
pub struct PageEffects {
    toast_ms: u64,
    pub toasts: Vec<Toast>,
    pub navigation: Option<Navigation>,
}

impl PageEffects {
    pub fn new(toast_ms: u64) -> Self {
        Self {
            toast_ms,
            ..Self::default()
        }
    }

    pub fn insert_into(&self, context: &mut tera::Context) {
        context.insert("toasts", &self.toasts);
        if let Some(navigation) = &self.navigation {
            context.insert("redirect_to", &navigation.target);
            context.insert("redirect_secs", &navigation.delay_secs());
        }
    }
}

impl Notifier for PageEffects {
    fn toast(&mut self, kind: ToastKind, message: &str) {
        self.toasts.push(Toast {
            message: message.to_string(),
            kind,
            timeout_ms: self.toast_ms,
        });
    }
}

impl Navigator for PageEffects {
    fn navigate(&mut self, navigation: Navigation) {
        self.navigation = Some(navigation);
    }
}
