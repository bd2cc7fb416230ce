//! Notification and license list views against the nullable backend.

use licverify_console::{LicenseListView, NotificationListView};
use licverify_nullables::{BackendCall, Failure, NullBackend};
use licverify_types::{LicenseRecord, Notification, NotificationStatus, RequestId};

fn notification(id: &str, created_at: &str) -> Notification {
    Notification {
        id: RequestId::from(id),
        message: format!("Verification requested ({id})"),
        status: NotificationStatus::Pending,
        created_at: created_at.parse().unwrap(),
        last_name: "Doe".into(),
        license_type: "B".into(),
    }
}

fn license(id: &str, name: &str) -> LicenseRecord {
    LicenseRecord {
        id: id.into(),
        name: name.into(),
        last_name: "Doe".into(),
        license_type: "Drivers".into(),
        birthdate: "1990-05-17T00:00:00.000Z".into(),
    }
}

fn seeded_backend() -> NullBackend {
    let backend = NullBackend::new();
    backend.set_notifications(vec![
        notification("older", "2024-01-01T08:00:00Z"),
        notification("newest", "2024-06-01T08:00:00Z"),
        notification("middle", "2024-03-01T08:00:00Z"),
    ]);
    backend
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[tokio::test]
async fn notifications_load_newest_first() {
    let backend = seeded_backend();
    let view = NotificationListView::new();
    view.load(&backend).await;

    let notifications = view.notifications();
    let ids: Vec<_> = notifications.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, ["newest", "middle", "older"]);
    assert!(!view.is_loading());
    assert_eq!(backend.calls(), vec![BackendCall::Notifications]);
}

#[tokio::test]
async fn render_numbers_cards_downwards() {
    let backend = seeded_backend();
    let view = NotificationListView::new();
    view.load(&backend).await;

    let text = view.render();
    let first = text.find("#3 - Id: newest").unwrap();
    let last = text.find("#1 - Id: older").unwrap();
    assert!(first < last);
    assert!(text.contains("licverify approve newest"));
}

#[tokio::test]
async fn failed_reload_clears_stale_notifications() {
    let backend = seeded_backend();
    let view = NotificationListView::new();
    view.load(&backend).await;
    assert_eq!(view.notifications().len(), 3);

    backend.fail_notifications(Failure::Network);
    view.load(&backend).await;
    assert!(view.notifications().is_empty());
    assert!(view.error().unwrap().starts_with("Failed to load notifications"));
    assert!(view.render().contains("Failed to load notifications"));
}

#[tokio::test]
async fn render_shows_loading_while_fetch_is_held() {
    let backend = seeded_backend();
    let gate = backend.gate_loads();
    let view = NotificationListView::new();

    tokio::join!(view.load(&backend), async {
        assert!(view.is_loading());
        assert!(view.render().contains("Loading Notifications..."));
        gate.notify_one();
    });

    assert!(!view.is_loading());
    assert!(!view.render().contains("Loading Notifications..."));
    assert_eq!(view.notifications().len(), 3);
}

#[tokio::test]
async fn mark_read_removes_only_on_success() {
    let backend = seeded_backend();
    let view = NotificationListView::new();
    view.load(&backend).await;

    view.mark_read(&backend, &RequestId::from("middle"))
        .await
        .unwrap();
    assert_eq!(view.notifications().len(), 2);
    assert!(view.open(&RequestId::from("middle")).is_none());

    backend.fail_mark_read(Failure::Server(500, None));
    assert!(view
        .mark_read(&backend, &RequestId::from("newest"))
        .await
        .is_err());
    assert_eq!(view.notifications().len(), 2);
}

#[tokio::test]
async fn open_hands_over_loaded_record() {
    let backend = seeded_backend();
    let view = NotificationListView::new();
    view.load(&backend).await;
    backend.reset_calls();

    let opened = view.open(&RequestId::from("older")).unwrap();
    assert_eq!(opened.last_name, "Doe");
    assert!(backend.calls().is_empty());
}

// ---------------------------------------------------------------------------
// Licenses
// ---------------------------------------------------------------------------

#[tokio::test]
async fn licenses_render_cards() {
    let backend = NullBackend::new();
    backend.set_licenses(vec![license("l1", "Jane"), license("l2", "John")]);
    let view = LicenseListView::new();
    view.load(&backend).await;

    assert_eq!(view.licenses().len(), 2);
    let text = view.render();
    assert!(text.contains("Driver's Licenses"));
    assert!(text.contains("Drivers License"));
    assert!(text.contains("First Name: Jane"));
    assert!(text.contains("Birthdate: 1990-05-17\n"));
}

#[tokio::test]
async fn license_failure_shows_error_and_clears() {
    let backend = NullBackend::new();
    backend.set_licenses(vec![license("l1", "Jane")]);
    let view = LicenseListView::new();
    view.load(&backend).await;

    backend.fail_licenses(Failure::Server(500, Some("database offline".into())));
    view.load(&backend).await;
    assert!(view.licenses().is_empty());
    assert_eq!(
        view.error().as_deref(),
        Some("Failed to load licenses: database offline")
    );
    assert!(view.render().contains("database offline"));
}

#[tokio::test]
async fn license_render_shows_loading_while_fetch_is_held() {
    let backend = NullBackend::new();
    backend.set_licenses(vec![license("l1", "Jane")]);
    let gate = backend.gate_loads();
    let view = LicenseListView::new();

    tokio::join!(view.load(&backend), async {
        assert!(view.is_loading());
        assert_eq!(view.render(), "Licenses\nLoading...\n");
        gate.notify_one();
    });

    assert!(!view.is_loading());
    assert!(view.render().contains("First Name: Jane"));
}

#[tokio::test]
async fn empty_license_list_says_so() {
    let backend = NullBackend::new();
    let view = LicenseListView::new();
    view.load(&backend).await;
    assert!(view.render().contains("No licenses found."));
}
