//! Cross-locale completeness checks for translation tables.

use std::collections::BTreeSet;

use serde::Serialize;

use super::{TranslationStatus, TranslationTable};
use crate::locale::Locale;
use crate::message::MessageKey;
use crate::template::placeholders;

/// Findings for every audited table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    pub locales: Vec<LocaleFindings>,
}

/// Problems found in one locale's table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocaleFindings {
    pub locale: Locale,
    /// Keys some other table has but this one lacks.
    pub missing: Vec<MessageKey>,
    /// Keys present here without a usable translation.
    pub untranslated: Vec<MessageKey>,
    pub placeholder_mismatches: Vec<PlaceholderMismatch>,
}

/// A translation whose `{placeholders}` differ from its source's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceholderMismatch {
    pub key: MessageKey,
    pub expected: Vec<String>,
    pub found: Vec<String>,
}

impl LocaleFindings {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty()
            && self.untranslated.is_empty()
            && self.placeholder_mismatches.is_empty()
    }
}

impl AuditReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.locales.iter().all(LocaleFindings::is_clean)
    }

    #[must_use]
    pub fn for_locale(&self, locale: &Locale) -> Option<&LocaleFindings> {
        self.locales.iter().find(|f| &f.locale == locale)
    }
}

fn is_live(status: TranslationStatus) -> bool {
    !matches!(
        status,
        TranslationStatus::Vanished | TranslationStatus::Obsolete
    )
}

fn live_keys(table: &TranslationTable) -> BTreeSet<MessageKey> {
    table
        .contexts
        .iter()
        .flat_map(|ctx| {
            ctx.messages
                .iter()
                .filter(|msg| is_live(msg.translation.status))
                .map(move |msg| msg.key(&ctx.name))
        })
        .collect()
}

fn sorted_placeholders(text: &str) -> Vec<String> {
    let mut names: Vec<String> = placeholders(text).into_iter().map(str::to_string).collect();
    names.sort();
    names
}

/// Check `tables` against each other.
///
/// Vanished and obsolete messages are ignored: they are kept in the file for
/// history only and never shown.
#[must_use]
pub fn audit(tables: &[TranslationTable]) -> AuditReport {
    let per_table: Vec<BTreeSet<MessageKey>> = tables.iter().map(live_keys).collect();
    let union: BTreeSet<&MessageKey> = per_table.iter().flatten().collect();

    let locales = tables
        .iter()
        .zip(&per_table)
        .map(|(table, own)| {
            let missing = union
                .iter()
                .filter(|key| !own.contains(**key))
                .map(|key| (*key).clone())
                .collect();

            let mut untranslated = Vec::new();
            let mut placeholder_mismatches = Vec::new();
            for ctx in &table.contexts {
                for msg in ctx.messages.iter().filter(|m| is_live(m.translation.status)) {
                    let key = msg.key(&ctx.name);
                    let Some(text) = msg.translation.usable() else {
                        untranslated.push(key);
                        continue;
                    };
                    let expected = sorted_placeholders(&msg.source);
                    let found = sorted_placeholders(text);
                    if expected != found {
                        placeholder_mismatches.push(PlaceholderMismatch {
                            key,
                            expected,
                            found,
                        });
                    }
                }
            }

            LocaleFindings {
                locale: table.language.clone(),
                missing,
                untranslated,
                placeholder_mismatches,
            }
        })
        .collect();

    AuditReport { locales }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Context, Message, Translation};

    fn table(locale: &str, ctx: Context) -> TranslationTable {
        TranslationTable::new(Locale::parse(locale).unwrap()).with_context(ctx)
    }

    #[test]
    fn should_report_clean_when_tables_match() {
        let en = table(
            "en_US",
            Context::new("Status").with_message(Message::new("Stop", Translation::finished("Stop"))),
        );
        let zh = table(
            "zh_CN",
            Context::new("Status").with_message(Message::new("Stop", Translation::finished("停止"))),
        );
        let report = audit(&[en, zh]);
        assert!(report.is_clean());
        assert_eq!(report.locales.len(), 2);
    }

    #[test]
    fn should_report_key_missing_from_other_locale() {
        let en = table(
            "en_US",
            Context::new("Status")
                .with_message(Message::new("Stop", Translation::finished("Stop")))
                .with_message(Message::new("Start", Translation::finished("Start"))),
        );
        let zh = table(
            "zh_CN",
            Context::new("Status").with_message(Message::new("Stop", Translation::finished("停止"))),
        );
        let report = audit(&[en, zh]);
        assert!(!report.is_clean());
        let zh_findings = report.for_locale(&Locale::parse("zh_CN").unwrap()).unwrap();
        assert_eq!(zh_findings.missing, vec![MessageKey::new("Status", "Start")]);
        let en_findings = report.for_locale(&Locale::parse("en_US").unwrap()).unwrap();
        assert!(en_findings.is_clean());
    }

    #[test]
    fn should_tell_apart_messages_by_comment() {
        let en = table(
            "en_US",
            Context::new("MainMenu")
                .with_message(Message::new("Open", Translation::finished("Open")))
                .with_message(
                    Message::new("Open", Translation::finished("Open")).with_comment("file"),
                ),
        );
        let zh = table(
            "zh_CN",
            Context::new("MainMenu").with_message(Message::new("Open", Translation::finished("打开"))),
        );
        let report = audit(&[en, zh]);
        let zh_findings = report.for_locale(&Locale::parse("zh_CN").unwrap()).unwrap();
        assert_eq!(
            zh_findings.missing,
            vec![MessageKey::new("MainMenu", "Open").with_comment("file")]
        );
    }

    #[test]
    fn should_report_unfinished_translation() {
        let zh = table(
            "zh_CN",
            Context::new("Status").with_message(Message::new("Stop", Translation::unfinished())),
        );
        let report = audit(&[zh]);
        assert_eq!(
            report.locales[0].untranslated,
            vec![MessageKey::new("Status", "Stop")]
        );
    }

    #[test]
    fn should_report_placeholder_mismatch() {
        let zh = table(
            "zh_CN",
            Context::new("Status").with_message(Message::new(
                "Status ({status})",
                Translation::finished("状态（{state}）"),
            )),
        );
        let report = audit(&[zh]);
        let mismatch = &report.locales[0].placeholder_mismatches[0];
        assert_eq!(mismatch.expected, vec!["status".to_string()]);
        assert_eq!(mismatch.found, vec!["state".to_string()]);
    }

    #[test]
    fn should_ignore_vanished_messages() {
        let mut vanished = Message::new("Old", Translation::finished("旧"));
        vanished.translation.status = TranslationStatus::Vanished;
        let en = table("en_US", Context::new("Status"));
        let zh = table("zh_CN", Context::new("Status").with_message(vanished));
        assert!(audit(&[en, zh]).is_clean());
    }
}
