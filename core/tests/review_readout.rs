mod common;

use common::RecordingGateway;
use serde_json::json;
use time::macros::datetime;

use hse_core::incident::detail::{ButtonStyle, DetailView, SaveOutcome};
use hse_core::rca::review::{ReviewView, Section};

fn seeded_gateway() -> RecordingGateway {
    let gateway = RecordingGateway::new();
    gateway.seed_incident(json!({
        "IncidentID": "INC-42",
        "IncidentDate": "2024-05-11",
        "IncidentTime": "09:30",
        "IncidentTitle": "Crane hook slip",
        "IncidentSummary": "Hook slipped during routine lift.",
        "Status": "In Progress",
        "InjuredHTPLEmployees": "[{\"name\":\"M. Sen\",\"department\":\"Cranes\"}]",
        "InjuredVisitors": "][ not json",
        "UploadedFiles": [{"original_name": "hook.jpg", "size": 88, "type": "image/jpeg"}],
        "Chronology": "[{\"dateTime\":\"2024-05-11 09:30\",\"activity\":\"Lift started\"}]",
        "ManCauses": "[\"Carelessness or negligence by operator\"]",
        "WhyAnalysis": "[{\"why\":\"Why-01\",\"description\":\"Latch worn\"}]",
        "Actions": [
            {
                "Action": "Replace latch",
                "Status": "Open",
                "DocReff": "WO-118",
                "TargetDate": "2024-06-01",
                "ResponsibleId": 7,
                "AttachmentsAssign": "[{\"originalName\":\"latch.jpg\",\"size\":42,\"mimetype\":\"image/jpeg\"}]"
            }
        ]
    }));
    gateway
}

#[test]
fn readout_decodes_every_nested_column_defensively() {
    let gateway = seeded_gateway();
    let view = ReviewView::load(&gateway, "INC-42").unwrap();

    assert!(gateway
        .calls()
        .contains(&"GET /api/incident/assign-user/details?incidentId=INC-42".to_string()));
    let record = &view.record;
    assert_eq!(record.incident_title, "Crane hook slip");
    assert_eq!(record.injured_htpl_employees[0].department, "Cranes");
    assert!(record.injured_visitors.is_empty());
    assert_eq!(record.uploaded_files[0].original_name, "hook.jpg");
    assert_eq!(record.chronology[0].activity, "Lift started");
    assert_eq!(record.why_analysis[0].description, "Latch worn");
    assert_eq!(record.actions[0].doc_ref, "WO-118");
    assert_eq!(record.actions[0].attachments[0].original_name, "latch.jpg");
}

#[test]
fn panels_start_open_and_collapse_independently() {
    let gateway = seeded_gateway();
    let mut view = ReviewView::load(&gateway, "INC-42").unwrap();

    for section in Section::ALL {
        assert!(view.is_open(section));
    }
    view.toggle(Section::Injured);
    view.toggle(Section::Actions);
    assert!(!view.is_open(Section::Injured));
    assert!(!view.is_open(Section::Actions));
    assert!(view.is_open(Section::General));
}

#[test]
fn progress_and_communication_logs_are_local_and_ordered() {
    let gateway = seeded_gateway();
    let mut view = ReviewView::load(&gateway, "INC-42").unwrap();
    let calls_after_load = gateway.calls().len();
    let now = datetime!(2024-05-12 14:05:00 UTC);

    assert!(view.add_update(now, "Walked the site", "no obstructions", "In Progress"));
    assert!(view.add_communication(now, "Safety Manager", "Investigator", "Prioritize", "email"));
    assert!(!view.add_update(now, "  ", "", "Open"));
    assert!(!view.add_communication(now, "Safety Manager", "Investigator", "", "email"));

    assert_eq!(view.updates().len(), 1);
    assert_eq!(view.updates()[0].id, 1);
    assert_eq!(view.updates()[0].time, "02:05 PM");
    assert_eq!(view.communication().len(), 1);
    // Logs never touch the collaborator.
    assert_eq!(gateway.calls().len(), calls_after_load);
}

#[test]
fn detail_edit_round_trips_through_full_replacement() {
    let gateway = seeded_gateway();
    let mut detail = DetailView::load(&gateway, "INC-42").unwrap();
    assert_eq!(detail.record.incident_title, "Crane hook slip");
    assert_eq!(detail.record.injured_htpl_employees[0].name, "M. Sen");

    detail.record.incident_title = "Crane hook slip (revised)".to_string();
    assert_eq!(detail.save(&gateway), SaveOutcome::Saved);
    assert!(gateway.calls().contains(&"PUT /api/incident/INC-42".to_string()));

    let reloaded = DetailView::load(&gateway, "INC-42").unwrap();
    assert_eq!(reloaded.record.incident_title, "Crane hook slip (revised)");
    assert_eq!(reloaded.record.injured_htpl_employees[0].name, "M. Sen");
}

#[test]
fn rca_entry_button_style_follows_the_stored_role() {
    assert_eq!(
        hse_core::incident::detail::rca_button_style("Assign"),
        ButtonStyle::Primary
    );
    assert_eq!(
        hse_core::incident::detail::rca_button_style("assign"),
        ButtonStyle::Alert
    );
}
