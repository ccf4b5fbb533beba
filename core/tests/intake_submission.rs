mod common;

use common::RecordingGateway;
use time::macros::datetime;
use time::Duration;

use hse_core::incident::intake::{
    IntakeForm, Notice, PersonGroup, SubmitOutcome, MAX_FILE_SIZE,
};
use hse_core::incident::model::{AttachmentMeta, IncidentKind, WeatherCondition};

fn filled_form() -> IntakeForm {
    let mut form = IntakeForm::new();
    form.incident_date = "2024-03-01".to_string();
    form.incident_time = "10:45".to_string();
    form.location = "Berth 4".to_string();
    form.weather_condition = WeatherCondition::Clear;
    form.htpl_shift_in_charge = "S. Pillai".to_string();
    form.incident_reported_by = "Gate office".to_string();
    form.report_prepared_by = "R. Nair".to_string();
    form.incident_title = "Dropped container".to_string();
    form.incident_summary = "Container slipped from spreader during lift.".to_string();
    form
}

fn image(name: &str) -> AttachmentMeta {
    AttachmentMeta {
        original_name: name.to_string(),
        size: 2048,
        mime_type: "image/jpeg".to_string(),
    }
}

#[test]
fn successful_submission_resets_form_and_arms_hold() {
    let gateway = RecordingGateway::new();
    let mut form = filled_form();
    form.toggle_type(IncidentKind::Injury);
    form.set_count(IncidentKind::Injury, "2");
    form.resize_person_group(PersonGroup::HtplEmployees, 2);
    form.person_group_mut(PersonGroup::HtplEmployees)[0].name = "K. Das".to_string();
    form.attach_files(vec![image("scene.jpg")]);

    let now = datetime!(2024-03-01 11:00:00 UTC);
    let outcome = form.submit(&gateway, now).unwrap();
    assert_eq!(outcome, SubmitOutcome::Accepted);
    assert_eq!(gateway.calls(), ["POST /api/incidents"]);

    let sent = &gateway.intake_payloads.borrow()[0];
    assert_eq!(sent["status"], "active");
    assert_eq!(sent["type_injury"], true);
    assert_eq!(sent["count_injury"], 2);
    assert_eq!(sent["injured_htpl_employees"][0]["name"], "K. Das");
    assert_eq!(sent["uploaded_files"][0]["original_name"], "scene.jpg");
    assert_eq!(sent["uploaded_files"][0]["type"], "image/jpeg");

    assert!(form.incident_title.is_empty());
    assert!(form.files().is_empty());
    assert_eq!(form.live_previews(), 0);
    assert!(matches!(form.notice(), Some(Notice::Success { .. })));

    // The hold keeps a double click from double posting.
    let again = form.submit(&gateway, now + Duration::seconds(1)).unwrap();
    assert_eq!(again, SubmitOutcome::Throttled);
    assert_eq!(gateway.calls().len(), 1);

    form.tick(now + Duration::seconds(4));
    assert!(form.notice().is_none());
}

#[test]
fn validation_failure_never_reaches_the_wire() {
    let gateway = RecordingGateway::new();
    let mut form = IntakeForm::new();
    let now = datetime!(2024-03-01 11:00:00 UTC);
    let err = form.submit(&gateway, now).unwrap_err();
    assert!(err.to_string().contains("incident_date"));
    assert!(gateway.calls().is_empty());
}

#[test]
fn collaborator_failure_keeps_input_and_shows_notice() {
    let gateway = RecordingGateway::new();
    gateway.fail_create.set(true);
    let mut form = filled_form();
    form.attach_files(vec![image("scene.jpg")]);

    let now = datetime!(2024-03-01 11:00:00 UTC);
    let outcome = form.submit(&gateway, now).unwrap();
    assert_eq!(outcome, SubmitOutcome::Failed);
    assert_eq!(form.incident_title, "Dropped container");
    assert_eq!(form.files().len(), 1);
    assert_eq!(form.live_previews(), 1);
    match form.notice() {
        Some(Notice::Failure(message)) => {
            assert_eq!(message, "Failed to submit incident report. Please try again.");
        }
        other => panic!("expected failure notice, got {other:?}"),
    }

    // The form stays armed for an immediate retry.
    gateway.fail_create.set(false);
    let retry = form.submit(&gateway, now + Duration::seconds(1)).unwrap();
    assert_eq!(retry, SubmitOutcome::Accepted);
}

#[test]
fn submission_without_files_sends_one_request_with_empty_list() {
    let gateway = RecordingGateway::new();
    let mut form = filled_form();
    let now = datetime!(2024-03-01 11:00:00 UTC);
    assert_eq!(form.submit(&gateway, now).unwrap(), SubmitOutcome::Accepted);
    assert_eq!(gateway.calls(), ["POST /api/incidents"]);
    let sent = &gateway.intake_payloads.borrow()[0];
    assert_eq!(sent["uploaded_files"], serde_json::json!([]));
}

#[test]
fn oversized_attachment_is_rejected_before_submission() {
    let mut form = filled_form();
    form.attach_files(vec![AttachmentMeta {
        original_name: "cctv-export.mp4".to_string(),
        size: MAX_FILE_SIZE + 1,
        mime_type: "video/mp4".to_string(),
    }]);
    assert!(form.files().is_empty());
    assert_eq!(
        form.upload_errors(),
        ["File \"cctv-export.mp4\" exceeds 4MB limit"]
    );
}
