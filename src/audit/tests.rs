//! Tests for the audit logger

use super::*;
use crate::auth::types::{Grant, Restrictions};
use async_trait::async_trait;
use parking_lot::Mutex;

/// Backend collecting delivered ids
struct RecordingBackend {
    delivered: Mutex<Vec<Uuid>>,
}

impl RecordingBackend {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            delivered: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl AuditBackend for RecordingBackend {
    async fn write(&self, event: &AuditEvent) -> Result<()> {
        self.delivered.lock().push(event.id);
        Ok(())
    }
}

/// Backend that always fails
struct FailingBackend;

#[async_trait]
impl AuditBackend for FailingBackend {
    async fn write(&self, _event: &AuditEvent) -> Result<()> {
        Err(AuthzError::audit_write("backend down"))
    }
}

fn logger() -> AuditLogger {
    AuditLogger::new(&AuditConfig::default(), RecordingBackend::new())
}

fn auditor_session() -> UserPermissions {
    UserPermissions {
        user_id: "aud-1".to_string(),
        roles: ["auditor".to_string()].into_iter().collect(),
        grants: vec![Grant::unconditional(Permission::new("audit", "view"))],
        restrictions: Restrictions::default(),
    }
}

fn employee_session(user_id: &str) -> UserPermissions {
    UserPermissions {
        user_id: user_id.to_string(),
        roles: ["employee".to_string()].into_iter().collect(),
        grants: Vec::new(),
        restrictions: Restrictions::default(),
    }
}

fn view_record(action: &str) -> AuditRecord {
    AuditRecord::new(AuditEventType::ResourceView, action, "viewed a record")
}

#[tokio::test]
async fn test_every_log_event_appends_exactly_one() {
    let logger = logger();
    let session = employee_session("emp-1");

    logger.log_event(Some(&session), view_record("view_a"), &RequestMeta::empty());
    assert_eq!(logger.recorded_events(), 1);

    // Failure-path events are recorded just the same
    logger.log_event(
        Some(&session),
        AuditRecord::new(
            AuditEventType::UnauthorizedAccess,
            "delete_employee",
            "denied",
        )
        .failed("insufficient permissions"),
        &RequestMeta::empty(),
    );
    assert_eq!(logger.recorded_events(), 2);
}

#[tokio::test]
async fn test_event_carries_caller_and_classification() {
    let logger = logger();
    let session = employee_session("emp-1");
    let meta = RequestMeta::empty()
        .with_ip("10.0.0.9")
        .with_user_agent("hrweb/2.1")
        .with_session("sess-42");

    let event = logger.log_event(
        Some(&session),
        AuditRecord::new(AuditEventType::DataExport, "export_payroll", "csv export")
            .with_resource("report", "rep-1"),
        &meta,
    );

    assert_eq!(event.user_id, "emp-1");
    assert_eq!(event.user_roles, vec!["employee".to_string()]);
    assert_eq!(event.security_level, SecurityLevel::Confidential);
    assert_eq!(event.ip_address.as_deref(), Some("10.0.0.9"));
    assert_eq!(event.user_agent.as_deref(), Some("hrweb/2.1"));
    assert_eq!(event.session_id.as_deref(), Some("sess-42"));
    assert_eq!(event.resource_type.as_deref(), Some("report"));
    assert!(event.success);
}

#[tokio::test]
async fn test_anonymous_attempts_are_attributed() {
    let logger = logger();

    let event = logger.log_event(
        None,
        AuditRecord::new(AuditEventType::UnauthorizedAccess, "view_vendor", "denied")
            .failed("no session"),
        &RequestMeta::empty(),
    );

    assert_eq!(event.user_id, "anonymous");
    assert!(event.user_roles.is_empty());
    assert!(!event.success);
    assert_eq!(logger.recorded_events(), 1);
}

#[tokio::test]
async fn test_logging_is_never_gated_but_reading_is() {
    let logger = logger();
    // A session without audit:view can still produce events...
    let session = employee_session("emp-1");
    logger.log_event(Some(&session), view_record("view_a"), &RequestMeta::empty());

    // ...but cannot read the trail back
    let err = logger
        .get_audit_events(Some(&session), &AuditQuery::all())
        .unwrap_err();
    assert!(matches!(err, AuthzError::PermissionDenied(_)));

    // No session at all is denied too
    let err = logger.get_audit_events(None, &AuditQuery::all()).unwrap_err();
    assert!(matches!(err, AuthzError::PermissionDenied(_)));

    // An auditor can
    let events = logger
        .get_audit_events(Some(&auditor_session()), &AuditQuery::all())
        .unwrap();
    assert_eq!(events.len(), 1);
}

#[tokio::test]
async fn test_empty_query_returns_all_newest_first() {
    let logger = logger();
    let session = employee_session("emp-1");

    let first = logger.log_event(Some(&session), view_record("one"), &RequestMeta::empty());
    let second = logger.log_event(Some(&session), view_record("two"), &RequestMeta::empty());
    let third = logger.log_event(Some(&session), view_record("three"), &RequestMeta::empty());

    let events = logger
        .get_audit_events(Some(&auditor_session()), &AuditQuery::all())
        .unwrap();

    assert_eq!(events.len(), 3);
    assert_eq!(events[0].id, third.id);
    assert_eq!(events[1].id, second.id);
    assert_eq!(events[2].id, first.id);
}

#[tokio::test]
async fn test_filters_are_conjunctive() {
    let logger = logger();
    let alice = employee_session("emp-alice");
    let bob = employee_session("emp-bob");

    logger.log_event(Some(&alice), view_record("view"), &RequestMeta::empty());
    logger.log_event(
        Some(&alice),
        AuditRecord::new(AuditEventType::ResourceDeletion, "delete", "removed"),
        &RequestMeta::empty(),
    );
    logger.log_event(
        Some(&bob),
        AuditRecord::new(AuditEventType::ResourceDeletion, "delete", "removed"),
        &RequestMeta::empty(),
    );

    let query = AuditQuery::all()
        .with_event_type(AuditEventType::ResourceDeletion)
        .with_user("emp-alice");
    let events = logger
        .get_audit_events(Some(&auditor_session()), &query)
        .unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].user_id, "emp-alice");
    assert_eq!(events[0].event_type, AuditEventType::ResourceDeletion);
}

#[tokio::test]
async fn test_resource_and_date_filters() {
    let logger = logger();
    let session = employee_session("emp-1");

    let event = logger.log_event(
        Some(&session),
        view_record("view").with_resource("vendor", "ven-1"),
        &RequestMeta::empty(),
    );
    logger.log_event(
        Some(&session),
        view_record("view").with_resource("vendor", "ven-2"),
        &RequestMeta::empty(),
    );

    let by_resource = AuditQuery::all()
        .with_resource_type("vendor")
        .with_resource_id("ven-1");
    let events = logger
        .get_audit_events(Some(&auditor_session()), &by_resource)
        .unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, event.id);

    // A window entirely in the past matches nothing
    let past = AuditQuery::all().until(event.timestamp - chrono::Duration::hours(1));
    let events = logger
        .get_audit_events(Some(&auditor_session()), &past)
        .unwrap();
    assert!(events.is_empty());

    // A window covering now matches both
    let window = AuditQuery::all()
        .since(event.timestamp - chrono::Duration::hours(1))
        .until(event.timestamp + chrono::Duration::hours(1));
    let events = logger
        .get_audit_events(Some(&auditor_session()), &window)
        .unwrap();
    assert_eq!(events.len(), 2);
}

#[tokio::test]
async fn test_backend_failure_never_reaches_the_caller() {
    let logger = AuditLogger::new(
        &AuditConfig {
            buffer_size: 8,
            delivery_max_attempts: 2,
            delivery_backoff_ms: 1,
        },
        Arc::new(FailingBackend),
    );
    let session = employee_session("emp-1");

    // log_event neither blocks nor errors while the backend is down
    let event = logger.log_event(Some(&session), view_record("view"), &RequestMeta::empty());
    assert_eq!(event.user_id, "emp-1");
    assert_eq!(logger.recorded_events(), 1);

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(logger.writer().failed_deliveries(), 1);

    // The local trail still serves reads
    let events = logger
        .get_audit_events(Some(&auditor_session()), &AuditQuery::all())
        .unwrap();
    assert_eq!(events.len(), 1);
}
