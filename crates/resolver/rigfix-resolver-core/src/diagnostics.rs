//! Reported, non-fatal inconsistencies.
//!
//! Every report is forwarded to the `log` facade; when recording is enabled it is also
//! kept so hosts and tests can inspect what happened during a session.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticsCfg {
    pub enabled: bool,
}

impl Default for DiagnosticsCfg {
    fn default() -> Self {
        DiagnosticsCfg { enabled: true }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    ParameterTypeMismatch,
    ReentrantSession,
    MissingRoot,
    UnresolvedSyncedOverride,
    MissingOverrideBase,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub kind: DiagnosticKind,
    pub message: String,
}

#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    cfg: DiagnosticsCfg,
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new(cfg: DiagnosticsCfg) -> Self {
        Self {
            cfg,
            items: Vec::new(),
        }
    }

    pub fn report(&mut self, severity: Severity, kind: DiagnosticKind, message: impl Into<String>) {
        let message = message.into();
        match severity {
            Severity::Info => log::info!("{kind:?}: {message}"),
            Severity::Warn => log::warn!("{kind:?}: {message}"),
            Severity::Error => log::error!("{kind:?}: {message}"),
        }
        if self.cfg.enabled {
            self.items.push(Diagnostic {
                severity,
                kind,
                message,
            });
        }
    }

    pub fn warn(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.report(Severity::Warn, kind, message);
    }

    pub fn error(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.report(Severity::Error, kind, message);
    }

    pub fn items(&self) -> &[Diagnostic] {
        &self.items
    }

    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.items.iter().any(|d| d.kind == kind)
    }

    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.items)
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_sink_only_logs() {
        let mut diag = Diagnostics::new(DiagnosticsCfg { enabled: false });
        diag.warn(DiagnosticKind::MissingRoot, "no root");
        assert!(diag.items().is_empty());

        let mut diag = Diagnostics::default();
        diag.error(DiagnosticKind::ParameterTypeMismatch, "Speed");
        assert!(diag.has(DiagnosticKind::ParameterTypeMismatch));
        assert_eq!(diag.take().len(), 1);
        assert!(diag.items().is_empty());
    }
}
