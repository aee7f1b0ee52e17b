//! End-to-end tests over the shipped translation tables.
//!
//! Each test loads the real `translations/` directory through the `.ts`
//! adapter and exercises the application services on top of it.

use std::path::PathBuf;
use std::sync::Arc;

use svctray_adapter_ts::{DirectoryTranslationSource, parse, to_string};
use svctray_adapter_virtual::VirtualService;
use svctray_app::event_bus::InProcessStatusBus;
use svctray_app::services::status_service::StatusService;
use svctray_app::services::translator::Translator;
use svctray_domain::locale::Locale;
use svctray_domain::quick_config::{GeneralConfig, NoticeOrigin, ServerRole, ValidationError};
use svctray_domain::service_state::ServiceState;

fn translations_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../../translations")
}

fn locale(tag: &str) -> Locale {
    Locale::parse(tag).unwrap()
}

async fn translator(preferred: &str) -> Translator {
    let mut translator = Translator::load(&DirectoryTranslationSource::new(translations_dir()))
        .await
        .expect("fixtures should load");
    assert!(translator.select(&[locale(preferred)]));
    translator
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_load_both_shipped_locales() {
    let translator = translator("en_US").await;
    let locales: Vec<&str> = translator.locales().map(Locale::as_str).collect();
    assert_eq!(locales, vec!["en_US", "zh_CN"]);
}

#[tokio::test]
async fn should_ship_complete_tables() {
    let report = translator("en_US").await.audit();
    assert!(report.is_clean(), "{report:?}");
}

#[tokio::test]
async fn should_round_trip_every_shipped_file() {
    for path in DirectoryTranslationSource::new(translations_dir())
        .files()
        .await
        .unwrap()
    {
        let content = std::fs::read_to_string(&path).unwrap();
        let table = parse(&content).unwrap();
        assert_eq!(to_string(&table), content, "{}", path.display());
        assert!(table.triples().eq(parse(&to_string(&table)).unwrap().triples()));
    }
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_label_every_state_in_every_locale() {
    for tag in ["en_US", "zh_CN"] {
        let translator = translator(tag).await;
        for state in ServiceState::ALL {
            assert!(!translator.state_label(state).is_empty(), "{tag} {state}");
        }
    }
}

#[tokio::test]
async fn should_label_states_in_chinese() {
    let translator = translator("zh_CN").await;
    assert_eq!(translator.state_label(ServiceState::Running), "运行中");
    assert_eq!(translator.state_label(ServiceState::ToUpgrade), "待升级");
    assert_eq!(translator.state_label(ServiceState::Unknown), "未知");
}

#[tokio::test]
async fn should_render_status_title() {
    let en = translator("en_US").await;
    assert_eq!(en.status_menu(ServiceState::Running).title, "Status (Running)");

    let zh = translator("zh-CN").await;
    assert_eq!(zh.status_menu(ServiceState::Running).title, "状态（运行中）");
}

#[tokio::test]
async fn should_match_locale_by_language() {
    let translator = translator("zh_TW").await;
    assert_eq!(translator.current(), Some(&locale("zh_CN")));
}

#[tokio::test]
async fn should_translate_validation_notice() {
    let zh = translator("zh_CN").await;
    let notice = zh.validation_notice(ValidationError::TokenRequired, NoticeOrigin::StatusMenu);
    assert_eq!(notice.body, "缺少Token配置");
    assert_ne!(notice.title, "Configuration Error");

    let en = translator("en_US").await;
    let notice = en.validation_notice(ValidationError::ServerUrlRequired, NoticeOrigin::Dialog);
    assert_eq!(notice.title, "Validation failed");
    assert_eq!(notice.body, "Server URL is required when running as Worker");
}

// ---------------------------------------------------------------------------
// Service lifecycle
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_follow_service_through_lifecycle() {
    let zh = translator("zh_CN").await;
    let virtual_service = Arc::new(VirtualService::default());
    let bus = Arc::new(InProcessStatusBus::new(16));
    let mut events = bus.subscribe();
    let service = StatusService::new(Arc::clone(&virtual_service), Arc::clone(&bus));

    assert_eq!(service.refresh().await.unwrap(), ServiceState::Stopped);
    let config = GeneralConfig::default();
    assert_eq!(service.toggle(&config).await.unwrap(), ServiceState::Running);

    virtual_service.change_config();
    assert_eq!(service.refresh().await.unwrap(), ServiceState::ToRestart);
    assert_eq!(zh.status_menu(service.current()).title, "状态（待重启）");

    assert_eq!(service.apply_quick_config(&config).await.unwrap(), ServiceState::Running);

    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event.to);
    }
    assert_eq!(
        seen,
        vec![
            ServiceState::Stopped,
            ServiceState::Starting,
            ServiceState::Running,
            ServiceState::ToRestart,
            ServiceState::Restarting,
            ServiceState::Running,
        ]
    );
}

#[tokio::test]
async fn should_refuse_incomplete_worker_config() {
    let service = StatusService::new(VirtualService::default(), InProcessStatusBus::new(16));
    service.refresh().await.unwrap();
    let config = GeneralConfig {
        role: ServerRole::Worker,
        server_url: Some("http://10.0.0.1".to_string()),
        ..GeneralConfig::default()
    };
    assert!(service.start(&config).await.is_err());
    assert_eq!(service.current(), ServiceState::Stopped);
}
