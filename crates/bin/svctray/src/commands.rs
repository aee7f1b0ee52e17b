//! Subcommand implementations.
//!
//! Each command returns a report that prints as text or serializes to JSON;
//! `main` decides which.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use svctray_adapter_ts::{DirectoryTranslationSource, TsError, parse_document, to_string, write_file};
use svctray_adapter_virtual::VirtualService;
use svctray_app::event_bus::InProcessStatusBus;
use svctray_app::services::status_service::StatusService;
use svctray_app::services::translator::{RenderedAction, RenderedNotice, Translator};
use svctray_domain::catalog::AuditReport;
use svctray_domain::error::HelperError;
use svctray_domain::locale::Locale;
use svctray_domain::quick_config::{GeneralConfig, NoticeOrigin};
use svctray_domain::service_state::{Observation, ServiceAction, ServiceState};

const BUS_CAPACITY: usize = 64;

fn locale_name(locale: Option<&Locale>) -> String {
    locale.map_or_else(|| "source".to_string(), ToString::to_string)
}

#[derive(Debug, Serialize)]
pub struct LabelRow {
    pub state: ServiceState,
    pub label: String,
}

#[derive(Debug, Serialize)]
pub struct LocaleLabels {
    pub locale: String,
    pub labels: Vec<LabelRow>,
}

/// Output of `labels`.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct LabelsReport(pub Vec<LocaleLabels>);

fn current_labels(translator: &Translator) -> LocaleLabels {
    LocaleLabels {
        locale: locale_name(translator.current()),
        labels: ServiceState::ALL
            .into_iter()
            .map(|state| LabelRow {
                state,
                label: translator.state_label(state),
            })
            .collect(),
    }
}

/// Labels in the selected locale, or in every loaded locale with `all`.
pub fn labels(translator: &mut Translator, preferred: &[Locale], all: bool) -> LabelsReport {
    if !all {
        translator.select(preferred);
        return LabelsReport(vec![current_labels(translator)]);
    }
    let locales: Vec<Locale> = translator.locales().cloned().collect();
    LabelsReport(
        locales
            .into_iter()
            .map(|locale| {
                translator.select(std::slice::from_ref(&locale));
                current_labels(translator)
            })
            .collect(),
    )
}

impl fmt::Display for LabelsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for listing in &self.0 {
            writeln!(f, "{}", listing.locale)?;
            for row in &listing.labels {
                writeln!(f, "  {:<12} {}", row.state.to_string(), row.label)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct ActionReport {
    pub label: String,
    pub enabled: bool,
}

impl From<RenderedAction> for ActionReport {
    fn from(action: RenderedAction) -> Self {
        Self {
            label: action.label,
            enabled: action.enabled,
        }
    }
}

/// Output of `render`.
#[derive(Debug, Serialize)]
pub struct RenderReport {
    pub locale: String,
    pub state: ServiceState,
    pub title: String,
    pub toggle: ActionReport,
    pub restart: ActionReport,
    pub confirm: ActionReport,
    pub cancel: ActionReport,
}

pub fn render(translator: &mut Translator, preferred: &[Locale], state: ServiceState) -> RenderReport {
    translator.select(preferred);
    let menu = translator.status_menu(state);
    let buttons = translator.quick_config_buttons(state);
    RenderReport {
        locale: locale_name(translator.current()),
        state,
        title: menu.title,
        toggle: menu.toggle.into(),
        restart: menu.restart.into(),
        confirm: buttons.confirm.into(),
        cancel: buttons.cancel.into(),
    }
}

fn enabled_mark(action: &ActionReport) -> &'static str {
    if action.enabled { "" } else { " (disabled)" }
}

impl fmt::Display for RenderReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}] {}", self.locale, self.state)?;
        writeln!(f, "status menu:   {}", self.title)?;
        writeln!(f, "  {}{}", self.toggle.label, enabled_mark(&self.toggle))?;
        writeln!(f, "  {}{}", self.restart.label, enabled_mark(&self.restart))?;
        writeln!(
            f,
            "quick config:  [{}{}] [{}]",
            self.confirm.label,
            enabled_mark(&self.confirm),
            self.cancel.label
        )
    }
}

/// Output of `audit`.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct AuditOutput(pub AuditReport);

impl fmt::Display for AuditOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for findings in &self.0.locales {
            if findings.is_clean() {
                writeln!(f, "{}: ok", findings.locale)?;
                continue;
            }
            writeln!(f, "{}:", findings.locale)?;
            for key in &findings.missing {
                writeln!(f, "  missing       {key}")?;
            }
            for key in &findings.untranslated {
                writeln!(f, "  untranslated  {key}")?;
            }
            for mismatch in &findings.placeholder_mismatches {
                writeln!(
                    f,
                    "  placeholders  {} expected {:?} found {:?}",
                    mismatch.key, mismatch.expected, mismatch.found
                )?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct NormalizedFile {
    pub path: PathBuf,
    pub changed: bool,
    /// Content the canonical layout cannot hold. Such a file is never
    /// rewritten.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unsupported: Vec<String>,
}

impl NormalizedFile {
    fn is_lossy(&self) -> bool {
        !self.unsupported.is_empty()
    }
}

/// Output of `normalize`.
#[derive(Debug, Serialize)]
pub struct NormalizeReport {
    pub written: bool,
    pub files: Vec<NormalizedFile>,
}

impl NormalizeReport {
    /// Files not in the canonical layout, lossy ones included.
    #[must_use]
    pub fn changed(&self) -> usize {
        self.files.iter().filter(|file| file.changed).count()
    }

    /// Files left alone because rewriting them would drop content.
    #[must_use]
    pub fn lossy(&self) -> usize {
        self.files.iter().filter(|file| file.is_lossy()).count()
    }
}

/// Rewrite each file whose content differs from the canonical layout.
///
/// A file holding anything the table model does not keep is reported and
/// left untouched.
///
/// # Errors
///
/// Fails on the first file that cannot be read, parsed or written.
pub async fn normalize(
    source: &DirectoryTranslationSource,
    check: bool,
) -> Result<NormalizeReport, TsError> {
    let mut files = Vec::new();
    for path in source.files().await? {
        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|err| TsError::Io {
                path: path.clone(),
                source: err,
            })?;
        let document = parse_document(&content).map_err(|err| TsError::File {
            path: path.clone(),
            source: Box::new(err),
        })?;
        let changed = to_string(&document.table) != content;
        if document.is_lossless() {
            if changed && !check {
                write_file(&path, &document.table).await?;
                tracing::info!(file = %path.display(), "translation file normalized");
            }
        } else {
            tracing::warn!(
                file = %path.display(),
                unsupported = ?document.skipped,
                "translation file left as is"
            );
        }
        files.push(NormalizedFile {
            path,
            changed,
            unsupported: document.skipped,
        });
    }
    Ok(NormalizeReport {
        written: !check,
        files,
    })
}

impl fmt::Display for NormalizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for file in &self.files {
            if file.is_lossy() {
                writeln!(
                    f,
                    "{:<13} {} (unsupported: {})",
                    "skipped",
                    file.path.display(),
                    file.unsupported.join(", ")
                )?;
                continue;
            }
            let status = match (file.changed, self.written) {
                (false, _) => "unchanged",
                (true, true) => "rewritten",
                (true, false) => "would change",
            };
            writeln!(f, "{:<13} {}", status, file.path.display())?;
        }
        Ok(())
    }
}

/// One simulated user or system action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulatedStep {
    Refresh,
    Toggle,
    ChangeConfig,
    Restart,
}

impl SimulatedStep {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Refresh => "refresh",
            Self::Toggle => "toggle",
            Self::ChangeConfig => "change_config",
            Self::Restart => "restart",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StepReport {
    pub step: SimulatedStep,
    pub state: ServiceState,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<NoticeReport>,
}

#[derive(Debug, Serialize)]
pub struct NoticeReport {
    pub title: String,
    pub body: String,
}

impl From<RenderedNotice> for NoticeReport {
    fn from(notice: RenderedNotice) -> Self {
        Self {
            title: notice.title,
            body: notice.body,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransitionReport {
    pub from: String,
    pub to: String,
}

/// Output of `simulate`.
#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub locale: String,
    pub steps: Vec<StepReport>,
    pub transitions: Vec<TransitionReport>,
}

/// Describe an error with its cause chain.
fn describe(err: &HelperError) -> String {
    let mut text = err.to_string();
    let mut cause = std::error::Error::source(err);
    while let Some(inner) = cause {
        text.push_str(": ");
        text.push_str(&inner.to_string());
        cause = inner.source();
    }
    text
}

/// Settings for a simulation run.
#[derive(Debug, Clone, Default)]
pub struct Scenario {
    pub config: GeneralConfig,
    pub fail: Option<ServiceAction>,
    pub needs_upgrade: bool,
}

const STEPS: [SimulatedStep; 6] = [
    SimulatedStep::Refresh,
    SimulatedStep::Toggle,
    SimulatedStep::ChangeConfig,
    SimulatedStep::Refresh,
    SimulatedStep::Restart,
    SimulatedStep::Toggle,
];

/// Drive a virtual service through a fixed sequence of steps, rendering the
/// status menu title after each one.
pub async fn simulate(
    translator: &mut Translator,
    preferred: &[Locale],
    scenario: &Scenario,
) -> SimulationReport {
    translator.select(preferred);
    let translator = &*translator;

    let virtual_service = Arc::new(VirtualService::new(Observation {
        migrated: !scenario.needs_upgrade,
        running: false,
        in_sync: true,
    }));
    if let Some(action) = scenario.fail {
        virtual_service.fail_next(action);
    }
    let bus = Arc::new(InProcessStatusBus::new(BUS_CAPACITY));
    let mut events = bus.subscribe();
    let service = StatusService::new(Arc::clone(&virtual_service), Arc::clone(&bus));

    let mut steps = Vec::with_capacity(STEPS.len());
    for step in STEPS {
        let result = match step {
            SimulatedStep::Refresh => service.refresh().await,
            SimulatedStep::Toggle => service.toggle(&scenario.config).await,
            SimulatedStep::ChangeConfig => {
                virtual_service.change_config();
                Ok(service.current())
            }
            SimulatedStep::Restart => service.restart().await,
        };
        let (error, notice) = match &result {
            Ok(_) => (None, None),
            Err(HelperError::Validation(invalid)) => (
                None,
                Some(NoticeReport::from(
                    translator.validation_notice(*invalid, NoticeOrigin::StatusMenu),
                )),
            ),
            Err(err) => (Some(describe(err)), None),
        };
        let state = service.current();
        steps.push(StepReport {
            step,
            state,
            title: translator.status_menu(state).title,
            error,
            notice,
        });
    }

    let mut transitions = Vec::new();
    while let Ok(event) = events.try_recv() {
        transitions.push(TransitionReport {
            from: translator.state_label(event.from),
            to: translator.state_label(event.to),
        });
    }

    SimulationReport {
        locale: locale_name(translator.current()),
        steps,
        transitions,
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[{}]", self.locale)?;
        for step in &self.steps {
            write!(f, "{:<14} {}", step.step.as_str(), step.title)?;
            if let Some(error) = &step.error {
                write!(f, "  error: {error}")?;
            }
            if let Some(notice) = &step.notice {
                write!(f, "  {}: {}", notice.title, notice.body)?;
            }
            writeln!(f)?;
        }
        for transition in &self.transitions {
            writeln!(f, "  {} -> {}", transition.from, transition.to)?;
        }
        Ok(())
    }
}
