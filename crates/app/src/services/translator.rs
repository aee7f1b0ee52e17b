//! Translator — picks the display locale and renders translated text.
//!
//! Lookups fail closed: when no table is selected, or a message is missing
//! or unfinished, the source string is shown instead.

use std::collections::BTreeMap;

use svctray_domain::catalog::{AuditReport, TranslationTable, audit};
use svctray_domain::error::HelperError;
use svctray_domain::locale::Locale;
use svctray_domain::message::LocalizedString;
use svctray_domain::quick_config::{FieldHints, Notice, NoticeOrigin, ServerRole, ValidationError};
use svctray_domain::service_state::ServiceState;
use svctray_domain::view::{ActionView, DialogButtonsView, StatusMenuView};

use crate::ports::TranslationSource;

/// An action rendered for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedAction {
    pub label: String,
    pub enabled: bool,
}

/// The status submenu rendered for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMenu {
    pub title: String,
    pub toggle: RenderedAction,
    pub restart: RenderedAction,
}

/// The Quick Config dialog buttons rendered for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedButtons {
    pub confirm: RenderedAction,
    pub cancel: RenderedAction,
}

/// A notice rendered for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNotice {
    pub title: String,
    pub body: String,
}

/// Role-dependent field hints rendered for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedHints {
    pub server_url_enabled: bool,
    pub port_enabled: bool,
    pub server_url_placeholder: String,
    pub token_placeholder: String,
}

/// Holds every loaded table and the currently selected locale.
#[derive(Debug, Default)]
pub struct Translator {
    tables: BTreeMap<Locale, TranslationTable>,
    current: Option<Locale>,
}

impl Translator {
    /// Index `tables` by language. A later table for the same locale
    /// replaces an earlier one. No locale is selected yet.
    #[must_use]
    pub fn new(tables: Vec<TranslationTable>) -> Self {
        let mut indexed = BTreeMap::new();
        for table in tables {
            if let Some(previous) = indexed.insert(table.language.clone(), table) {
                tracing::warn!(locale = %previous.language, "duplicate translation table replaced");
            }
        }
        Self {
            tables: indexed,
            current: None,
        }
    }

    /// Load every table from `source`.
    ///
    /// # Errors
    ///
    /// Propagates the source's error.
    pub async fn load<S: TranslationSource>(source: &S) -> Result<Self, HelperError> {
        let tables = source.load_all().await?;
        tracing::debug!(count = tables.len(), "translation tables loaded");
        Ok(Self::new(tables))
    }

    /// Loaded locales, sorted.
    pub fn locales(&self) -> impl Iterator<Item = &Locale> {
        self.tables.keys()
    }

    #[must_use]
    pub fn current(&self) -> Option<&Locale> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn table(&self, locale: &Locale) -> Option<&TranslationTable> {
        self.tables.get(locale)
    }

    /// First loaded locale matching `preferred`, trying each preference for
    /// an exact match before falling back to its language alone.
    #[must_use]
    pub fn resolve(&self, preferred: &[Locale]) -> Option<&Locale> {
        preferred.iter().find_map(|wanted| {
            self.tables
                .get_key_value(wanted)
                .map(|(locale, _)| locale)
                .or_else(|| {
                    self.tables
                        .keys()
                        .find(|locale| locale.language() == wanted.language())
                })
        })
    }

    /// Switch to the best match for `preferred`.
    ///
    /// Returns `true` when the current locale changed and displayed text must
    /// be re-rendered. Without any match the selection is kept.
    pub fn select(&mut self, preferred: &[Locale]) -> bool {
        let Some(found) = self.resolve(preferred).cloned() else {
            tracing::debug!(?preferred, "no translation table matches preferred locales");
            return false;
        };
        if self.current.as_ref() == Some(&found) {
            return false;
        }
        tracing::info!(locale = %found, "display locale selected");
        self.current = Some(found);
        true
    }

    fn current_table(&self) -> Option<&TranslationTable> {
        self.current.as_ref().and_then(|locale| self.tables.get(locale))
    }

    /// Translation of `source` in `context`, or `source` itself.
    #[must_use]
    pub fn translate<'a>(&'a self, context: &str, source: &'a str) -> &'a str {
        match self.current_table() {
            Some(table) => table.translate(context, source),
            None => source,
        }
    }

    /// Translate and substitute parameters.
    #[must_use]
    pub fn render(&self, text: &LocalizedString) -> String {
        let translated = self
            .current_table()
            .and_then(|table| table.lookup(&text.context, &text.source));
        if translated.is_none() {
            tracing::trace!(context = %text.context, source = %text.source, "using source text");
        }
        text.render_with(translated)
    }

    /// Display label of `state`.
    #[must_use]
    pub fn state_label(&self, state: ServiceState) -> String {
        self.render(&state.label())
    }

    fn action(&self, view: &ActionView) -> RenderedAction {
        RenderedAction {
            label: self.render(&view.label),
            enabled: view.enabled,
        }
    }

    #[must_use]
    pub fn status_menu(&self, state: ServiceState) -> RenderedMenu {
        let view = StatusMenuView::for_state(state, self.state_label(state));
        RenderedMenu {
            title: self.render(&view.title),
            toggle: self.action(&view.toggle),
            restart: self.action(&view.restart),
        }
    }

    #[must_use]
    pub fn quick_config_buttons(&self, state: ServiceState) -> RenderedButtons {
        let view = DialogButtonsView::for_state(state);
        RenderedButtons {
            confirm: self.action(&view.confirm),
            cancel: self.action(&view.cancel),
        }
    }

    #[must_use]
    pub fn field_hints(&self, role: ServerRole) -> RenderedHints {
        let hints = FieldHints::for_role(role);
        RenderedHints {
            server_url_enabled: hints.server_url_enabled,
            port_enabled: hints.port_enabled,
            server_url_placeholder: hints
                .server_url_placeholder
                .map(|p| self.render(&p))
                .unwrap_or_default(),
            token_placeholder: self.render(&hints.token_placeholder),
        }
    }

    #[must_use]
    pub fn notice(&self, notice: &Notice) -> RenderedNotice {
        RenderedNotice {
            title: self.render(&notice.title),
            body: self.render(&notice.body),
        }
    }

    /// Notice for a failed config check, with the error itself translated.
    #[must_use]
    pub fn validation_notice(&self, error: ValidationError, origin: NoticeOrigin) -> RenderedNotice {
        let message = self.render(&error.message());
        self.notice(&ValidationError::notice(origin, message))
    }

    /// Cross-check every loaded table.
    #[must_use]
    pub fn audit(&self) -> AuditReport {
        let tables: Vec<TranslationTable> = self.tables.values().cloned().collect();
        audit(&tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use svctray_domain::catalog::{Context, Message, Translation};

    fn locale(tag: &str) -> Locale {
        Locale::parse(tag).unwrap()
    }

    fn msg(source: &str, text: &str) -> Message {
        Message::new(source, Translation::finished(text))
    }

    fn zh_table() -> TranslationTable {
        TranslationTable::new(locale("zh_CN"))
            .with_context(
                Context::new("AbstractService")
                    .with_message(msg("Running", "运行中"))
                    .with_message(msg("Stopped", "停止")),
            )
            .with_context(
                Context::new("Status")
                    .with_message(msg("Status ({status})", "状态（{status}）"))
                    .with_message(msg("Start", "启动"))
                    .with_message(msg("Stop", "停止"))
                    .with_message(msg("Restart", "重新启动")),
            )
            .with_context(
                Context::new("GPUStackConfig")
                    .with_message(msg("Configuration Error", "配置异常"))
                    .with_message(msg("{error}", "{error}"))
                    .with_message(msg("Token is required when running as Worker", "缺少Token配置")),
            )
            .with_context(
                Context::new("QuickConfig")
                    .with_message(msg("Restart", "重启"))
                    .with_message(msg("Cancel", "取消")),
            )
            .with_context(
                Context::new("GeneralConfigPage")
                    .with_message(msg("Required", "必填"))
                    .with_message(msg("Optional", "可选")),
            )
    }

    fn en_table() -> TranslationTable {
        TranslationTable::new(locale("en_US")).with_context(
            Context::new("AbstractService").with_message(msg("Running", "Running")),
        )
    }

    fn translator() -> Translator {
        Translator::new(vec![en_table(), zh_table()])
    }

    #[test]
    fn should_fall_back_to_source_when_nothing_selected() {
        let t = translator();
        assert!(t.current().is_none());
        assert_eq!(t.state_label(ServiceState::Running), "Running");
    }

    #[test]
    fn should_select_exact_locale() {
        let mut t = translator();
        assert!(t.select(&[locale("fr_FR"), locale("zh_CN")]));
        assert_eq!(t.current(), Some(&locale("zh_CN")));
        assert_eq!(t.state_label(ServiceState::Running), "运行中");
    }

    #[test]
    fn should_select_by_language_when_region_differs() {
        let mut t = translator();
        assert!(t.select(&[locale("zh_TW")]));
        assert_eq!(t.current(), Some(&locale("zh_CN")));
    }

    #[test]
    fn should_prefer_earlier_preference() {
        let mut t = translator();
        t.select(&[locale("en_GB"), locale("zh_CN")]);
        assert_eq!(t.current(), Some(&locale("en_US")));
    }

    #[test]
    fn should_report_no_change_when_reselecting() {
        let mut t = translator();
        assert!(t.select(&[locale("zh_CN")]));
        assert!(!t.select(&[locale("zh")]));
    }

    #[test]
    fn should_keep_selection_when_nothing_matches() {
        let mut t = translator();
        t.select(&[locale("zh_CN")]);
        assert!(!t.select(&[locale("fr_FR")]));
        assert_eq!(t.current(), Some(&locale("zh_CN")));
    }

    #[test]
    fn should_fall_back_for_missing_message() {
        let mut t = translator();
        t.select(&[locale("en_US")]);
        assert_eq!(t.state_label(ServiceState::ToUpgrade), "To Upgrade");
        assert_eq!(t.translate("Status", "Stop"), "Stop");
    }

    #[test]
    fn should_render_status_menu_in_chinese() {
        let mut t = translator();
        t.select(&[locale("zh_CN")]);
        let menu = t.status_menu(ServiceState::Running);
        assert_eq!(menu.title, "状态（运行中）");
        assert_eq!(menu.toggle.label, "停止");
        assert_eq!(menu.restart.label, "重新启动");
        assert!(menu.restart.enabled);
    }

    #[test]
    fn should_render_status_menu_in_source_language() {
        let t = translator();
        let menu = t.status_menu(ServiceState::Stopped);
        assert_eq!(menu.title, "Status (Stopped)");
        assert_eq!(menu.toggle.label, "Start");
        assert!(!menu.restart.enabled);
    }

    #[test]
    fn should_render_quick_config_buttons_per_context() {
        let mut t = translator();
        t.select(&[locale("zh_CN")]);
        let buttons = t.quick_config_buttons(ServiceState::Running);
        assert_eq!(buttons.confirm.label, "重启");
        assert_eq!(buttons.cancel.label, "取消");
        // "Start" is untranslated in the QuickConfig context of this table.
        assert_eq!(t.quick_config_buttons(ServiceState::Stopped).confirm.label, "Start");
    }

    #[test]
    fn should_render_validation_notice() {
        let mut t = translator();
        t.select(&[locale("zh_CN")]);
        let notice = t.validation_notice(ValidationError::TokenRequired, NoticeOrigin::StatusMenu);
        assert_eq!(notice.title, "配置异常");
        assert_eq!(notice.body, "缺少Token配置");
    }

    #[test]
    fn should_render_field_hints() {
        let mut t = translator();
        t.select(&[locale("zh_CN")]);
        let worker = t.field_hints(ServerRole::Worker);
        assert_eq!(worker.token_placeholder, "必填");
        assert_eq!(worker.server_url_placeholder, "必填");
        let server = t.field_hints(ServerRole::ServerOnly);
        assert_eq!(server.token_placeholder, "可选");
        assert_eq!(server.server_url_placeholder, "");
    }

    #[test]
    fn should_audit_loaded_tables() {
        let report = translator().audit();
        assert!(!report.is_clean());
        let en = report.for_locale(&locale("en_US")).unwrap();
        assert!(en.missing.iter().any(|k| k.source == "Stopped"));
    }

    struct StaticSource(Vec<TranslationTable>);

    impl TranslationSource for StaticSource {
        fn load_all(
            &self,
        ) -> impl Future<Output = Result<Vec<TranslationTable>, HelperError>> + Send {
            let tables = self.0.clone();
            async { Ok(tables) }
        }
    }

    #[tokio::test]
    async fn should_load_tables_from_source() {
        let t = Translator::load(&StaticSource(vec![zh_table(), en_table()]))
            .await
            .unwrap();
        let locales: Vec<&str> = t.locales().map(Locale::as_str).collect();
        assert_eq!(locales, vec!["en_US", "zh_CN"]);
    }
}
