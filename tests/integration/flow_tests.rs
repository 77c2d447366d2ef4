//! End-to-end interaction tests: every path through the flow, driven
//! through the public controller API against the mock service.

use statusflow::config::FlowConfig;
use statusflow::{Event, FlowController, Profile, ServiceError, StateId, Status, Validity};

use super::mock_service::{into_update, make_flow, MockService, Recorder};

// ── Check outcomes ────────────────────────────────────────────

#[test]
fn current_profile_ends_up_to_date() {
    let (mut flow, service, recorder) = make_flow();
    service.reply_profile(Validity::Current);

    flow.check();
    assert_eq!(flow.settle(), 1);

    assert_eq!(recorder.events(), vec![Event::Check, Event::UpToDate]);
    assert_eq!(flow.state(), StateId::Final);
    assert_eq!(service.fetch_calls(), 1);
    assert!(service.submitted().is_empty());
}

#[test]
fn outdated_profile_prompts() {
    let (mut flow, service, recorder) = make_flow();
    service.reply_fetch(Ok(Profile::new(Status::Positive, Validity::Outdated)));

    flow.check();
    flow.settle();

    assert_eq!(recorder.events(), vec![Event::Check, Event::Prompt]);
    assert_eq!(flow.state(), StateId::Prompt);
}

#[test]
fn fetch_error_fails() {
    let (mut flow, service, recorder) = make_flow();
    service.reply_fetch(Err(ServiceError::Unreachable));

    flow.check();
    flow.settle();

    assert_eq!(recorder.events(), vec![Event::Check, Event::Failed]);
    assert_eq!(flow.state(), StateId::Final);
}

// ── Prompt ────────────────────────────────────────────────────

#[test]
fn cancel_at_prompt_postpones() {
    let (mut flow, service, recorder) = make_flow();
    service.reply_profile(Validity::Outdated);
    flow.check();
    flow.settle();
    recorder.take();

    flow.cancel();

    assert_eq!(recorder.events(), vec![Event::Postponed]);
    assert_eq!(flow.state(), StateId::Final);
    assert!(!flow.is_busy());
}

#[test]
fn update_at_prompt_enters_update() {
    let (mut flow, service, recorder) = make_flow();
    service.reply_profile(Validity::Outdated);
    flow.check();
    flow.settle();
    recorder.take();

    flow.update();

    assert_eq!(recorder.events(), vec![Event::Update]);
    assert_eq!(flow.state(), StateId::Update);
}

#[test]
fn save_at_prompt_is_ignored() {
    let (mut flow, service, recorder) = make_flow();
    service.reply_profile(Validity::Outdated);
    flow.check();
    flow.settle();
    recorder.take();

    flow.save(Status::Negative);
    flow.check();

    assert!(recorder.events().is_empty());
    assert_eq!(flow.state(), StateId::Prompt);
    assert!(service.submitted().is_empty());
    assert_eq!(service.fetch_calls(), 1);
}

// ── Update / Save ─────────────────────────────────────────────

#[test]
fn save_submits_once_and_reports_updated() {
    let (mut flow, service, recorder) = make_flow();
    into_update(&mut flow, &service, &recorder);
    service.reply_submit(Ok(true));

    flow.save(Status::Negative);
    assert_eq!(flow.state(), StateId::Save);
    assert_eq!(recorder.events(), vec![Event::Save]);
    flow.settle();

    assert_eq!(service.submitted(), vec![Status::Negative]);
    assert_eq!(recorder.events(), vec![Event::Save, Event::Updated]);
    assert_eq!(flow.state(), StateId::Final);
}

#[test]
fn declined_submission_fails() {
    let (mut flow, service, recorder) = make_flow();
    into_update(&mut flow, &service, &recorder);
    service.reply_submit(Ok(false));

    flow.save(Status::Positive);
    flow.settle();

    assert_eq!(service.submitted(), vec![Status::Positive]);
    assert_eq!(recorder.events(), vec![Event::Save, Event::Failed]);
}

#[test]
fn submit_error_fails() {
    let (mut flow, service, recorder) = make_flow();
    into_update(&mut flow, &service, &recorder);
    service.reply_submit(Err(ServiceError::Backend("503".into())));

    flow.save(Status::Negative);
    flow.settle();

    assert_eq!(recorder.events(), vec![Event::Save, Event::Failed]);
    assert_eq!(flow.state(), StateId::Final);
}

#[test]
fn cancel_in_update_cancels() {
    let (mut flow, service, recorder) = make_flow();
    into_update(&mut flow, &service, &recorder);

    flow.cancel();

    assert_eq!(recorder.events(), vec![Event::Cancelled]);
    assert!(service.submitted().is_empty());
}

#[test]
fn second_save_while_saving_is_ignored() {
    let (mut flow, service, recorder) = make_flow();
    into_update(&mut flow, &service, &recorder);
    let gate = service.gate_submit();

    flow.save(Status::Negative);
    flow.save(Status::Positive);
    flow.cancel();
    flow.poll();
    assert_eq!(flow.state(), StateId::Save);

    gate.signal(Ok(true));
    flow.settle();

    assert_eq!(service.submitted(), vec![Status::Negative]);
    assert_eq!(recorder.events(), vec![Event::Save, Event::Updated]);
}

// ── Checking ──────────────────────────────────────────────────

#[test]
fn operations_while_checking_are_ignored() {
    let (mut flow, service, recorder) = make_flow();
    let gate = service.gate_fetch();

    flow.check();
    flow.check();
    flow.update();
    flow.cancel();
    flow.save(Status::Positive);
    assert_eq!(flow.state(), StateId::Check);
    assert_eq!(recorder.events(), vec![Event::Check]);

    gate.signal(Ok(Profile::new(Status::Negative, Validity::Current)));
    flow.settle();

    assert_eq!(service.fetch_calls(), 1);
    assert_eq!(recorder.events(), vec![Event::Check, Event::UpToDate]);
}

#[test]
fn poll_picks_up_a_late_fetch() {
    let (mut flow, service, recorder) = make_flow();
    let gate = service.gate_fetch();

    flow.check();
    assert_eq!(flow.poll(), 0);
    assert!(flow.is_busy());
    assert_eq!(flow.state(), StateId::Check);

    gate.signal(Ok(Profile::new(Status::Negative, Validity::Outdated)));
    assert_eq!(flow.poll(), 1);

    assert!(!flow.is_busy());
    assert_eq!(recorder.events(), vec![Event::Check, Event::Prompt]);
}

#[test]
fn flow_can_run_again_after_finishing() {
    let (mut flow, service, recorder) = make_flow();
    service.reply_profile(Validity::Current);
    service.reply_profile(Validity::Outdated);

    flow.check();
    flow.settle();
    flow.check();
    flow.settle();

    assert_eq!(
        recorder.events(),
        vec![Event::Check, Event::UpToDate, Event::Check, Event::Prompt]
    );
    assert_eq!(service.fetch_calls(), 2);
}

#[test]
fn every_interaction_ends_with_one_terminal_event() {
    let (mut flow, service, recorder) = make_flow();
    into_update(&mut flow, &service, &recorder);
    service.reply_submit(Ok(true));
    flow.save(Status::Positive);
    flow.settle();

    let events = recorder.events();
    let terminal: Vec<_> = events.iter().filter(|e| e.is_terminal()).collect();
    assert_eq!(terminal, vec![&Event::Updated]);
    assert_eq!(events.last(), Some(&Event::Updated));
}

// ── Configuration ─────────────────────────────────────────────

#[test]
fn silent_check_skips_check_event() {
    let service = MockService::new();
    let config = FlowConfig {
        announce_check: false,
        ..FlowConfig::default()
    };
    let mut flow = FlowController::with_config(service.clone(), config);
    let recorder = Recorder::default();
    flow.set_sink(recorder.clone());
    service.reply_profile(Validity::Current);

    flow.check();
    flow.settle();

    assert_eq!(recorder.events(), vec![Event::UpToDate]);
    assert!(!flow.config().announce_check);
}
