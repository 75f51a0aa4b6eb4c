//! Integration tests for the enqueued-job matcher
//!
//! Every test starts from the same queue: one worker job, two application
//! jobs (a plain argument and a resource) and two mail deliveries (with and
//! without a resource).

use acton_job_matchers::jobs::{JobAdapter, JOB_WRAPPER_CLASS, MAIL_DELIVERY_JOB};
use acton_job_matchers::prelude::*;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::Value;

#[derive(Worker)]
struct HardWorker;

#[derive(ApplicationJob)]
#[job(queue = "mailers")]
struct ResourceJob;

#[derive(Mailer)]
struct TestActionMailer;

struct TestResource;

impl GlobalIdentifiable for TestResource {
    const MODEL_NAME: &'static str = "TestResource";

    fn global_key(&self) -> String {
        "1".to_string()
    }
}

struct Scenario {
    queue: FakeQueue,
    clock: FrozenClock,
    worker_args: Value,
}

impl Scenario {
    fn new() -> anyhow::Result<Self> {
        acton_job_matchers::observability::init_for_tests();

        let clock = FrozenClock::at(Utc.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap());
        let queue = FakeQueue::new().with_clock(clock.clone());
        let worker_args = json!([
            "string",
            1,
            true,
            { "key": "value", "bar": "foo", "nested": [{ "hash": true }] }
        ]);

        queue.perform_async::<HardWorker>(&worker_args)?;

        let adapter = JobAdapter::new(&queue);
        adapter.perform_later::<ResourceJob>(vec!["someResource".into()]);
        adapter.perform_later::<ResourceJob>(vec![JobArgument::resource(&TestResource)]);
        adapter.deliver_later::<TestActionMailer>("testmail", vec![]);
        adapter.deliver_later::<TestActionMailer>("testmail", vec![JobArgument::resource(&TestResource)]);

        Ok(Self {
            queue,
            clock,
            worker_args,
        })
    }

    fn worker_args_with(&self, extra: &str) -> Vec<Value> {
        let mut args = self.worker_args.as_array().cloned().unwrap_or_default();
        args.push(json!(extra));
        args
    }

    fn tomorrow(&self) -> DateTime<Utc> {
        self.clock.now() + Duration::days(1)
    }

    fn argument_subject(&self) -> HaveEnqueuedJob {
        have_enqueued_job(self.worker_args.as_array().cloned().unwrap_or_default())
    }

    fn matcher_subject() -> HaveEnqueuedJob {
        have_enqueued_job![a_string(), an_integer(), true, a_hash()]
    }
}

fn resource_gid() -> String {
    TestResource.to_global_id("acton").uri()
}

// Expected usage

#[test]
fn test_matches_worker_arguments() -> anyhow::Result<()> {
    let scenario = Scenario::new()?;
    expect(scenario.queue.worker::<HardWorker>()).to(scenario.argument_subject());
    Ok(())
}

#[test]
fn test_matches_on_global_worker_queue() -> anyhow::Result<()> {
    let scenario = Scenario::new()?;
    expect(scenario.queue.all_workers()).to(scenario.argument_subject());
    Ok(())
}

#[test]
fn test_matches_enqueued_application_job() -> anyhow::Result<()> {
    let scenario = Scenario::new()?;
    expect(scenario.queue.all_workers()).to(have_enqueued_job!["someResource"]);
    expect(scenario.queue.application_job::<ResourceJob>()).to(have_enqueued_job!["someResource"]);
    Ok(())
}

#[test]
fn test_matches_application_job_by_global_id() -> anyhow::Result<()> {
    let scenario = Scenario::new()?;
    expect(scenario.queue.all_workers())
        .to(have_enqueued_job![json!({ "_aj_globalid": resource_gid() })]);
    Ok(())
}

#[test]
fn test_matches_mailer_job() -> anyhow::Result<()> {
    let scenario = Scenario::new()?;
    expect(scenario.queue.all_workers())
        .to(have_enqueued_job!["TestActionMailer", "testmail", "deliver_now"]);
    Ok(())
}

#[test]
fn test_matches_mailer_job_with_resource() -> anyhow::Result<()> {
    let scenario = Scenario::new()?;
    expect(scenario.queue.all_workers()).to(have_enqueued_job![
        "TestActionMailer",
        "testmail",
        "deliver_now",
        json!({ "_aj_globalid": resource_gid() })
    ]);
    Ok(())
}

#[test]
fn test_application_jobs_are_wrapped() -> anyhow::Result<()> {
    let scenario = Scenario::new()?;
    let wrapped = scenario.queue.jobs_for(JOB_WRAPPER_CLASS);
    assert_eq!(wrapped.len(), 4);
    assert!(wrapped.iter().all(|job| job.queue() == "mailers"));
    assert_eq!(
        wrapped
            .iter()
            .filter(|job| job.wrapped() == Some(MAIL_DELIVERY_JOB))
            .count(),
        2
    );
    Ok(())
}

#[test]
fn test_matches_scheduled_job_with_perform_in() -> anyhow::Result<()> {
    let scenario = Scenario::new()?;
    let args = scenario.worker_args_with("in");
    scenario
        .queue
        .perform_in::<HardWorker>(Duration::minutes(3), &args)?;

    expect(scenario.queue.worker::<HardWorker>())
        .to(have_enqueued_job(args).in_interval(Duration::minutes(3)));
    Ok(())
}

#[test]
fn test_matches_scheduled_job_with_perform_at() -> anyhow::Result<()> {
    let scenario = Scenario::new()?;
    let args = scenario.worker_args_with("at");
    scenario
        .queue
        .perform_at::<HardWorker>(scenario.tomorrow(), &args)?;

    expect(scenario.queue.worker::<HardWorker>()).to(have_enqueued_job(args).at(scenario.tomorrow()));
    Ok(())
}

// Messages

#[test]
fn test_description() -> anyhow::Result<()> {
    let scenario = Scenario::new()?;
    let mut subject = scenario.argument_subject();
    assert!(subject.matches(&scenario.queue.worker::<HardWorker>()));

    let hash = scenario.worker_args[3].to_string();
    assert_eq!(
        subject.description(),
        format!("have an enqueued HardWorker job with arguments [\"string\", 1, true, {hash}]")
    );
    Ok(())
}

#[test]
fn test_failure_message() -> anyhow::Result<()> {
    let scenario = Scenario::new()?;
    let mut subject = scenario.argument_subject();
    subject.matches(&scenario.queue.worker::<HardWorker>());

    let hash = scenario.worker_args[3].to_string();
    assert_eq!(
        subject.failure_message(),
        format!(
            "expected to have an enqueued HardWorker job with arguments [\"string\", 1, true, {hash}]\n\nfound: [[\"string\", 1, true, {hash}]]"
        )
    );
    Ok(())
}

#[test]
fn test_failure_message_when_negated() -> anyhow::Result<()> {
    let scenario = Scenario::new()?;
    let mut subject = scenario.argument_subject();
    subject.matches(&scenario.queue.worker::<HardWorker>());

    let hash = scenario.worker_args[3].to_string();
    assert_eq!(
        subject.failure_message_when_negated(),
        format!("expected to not have an enqueued HardWorker job with arguments [\"string\", 1, true, {hash}]")
    );
    Ok(())
}

#[test]
fn test_failure_message_on_global_queue_shows_unwrapped_arguments() -> anyhow::Result<()> {
    let scenario = Scenario::new()?;
    let mut subject = have_enqueued_job!["missing"];
    assert!(!subject.matches(&scenario.queue.all_workers()));

    let message = subject.failure_message();
    assert!(message.starts_with("expected to have an enqueued worker job with arguments [\"missing\"]"));
    assert!(message.contains("[\"someResource\"]"));
    assert!(message.contains("[\"TestActionMailer\", \"testmail\", \"deliver_now\"]"));
    Ok(())
}

// matches

#[test]
fn test_matches_returns_true_for_arguments() -> anyhow::Result<()> {
    let scenario = Scenario::new()?;
    assert!(scenario.argument_subject().matches(&scenario.queue.worker::<HardWorker>()));
    Ok(())
}

#[test]
fn test_matches_returns_true_for_matchers() -> anyhow::Result<()> {
    let scenario = Scenario::new()?;
    assert!(Scenario::matcher_subject().matches(&scenario.queue.worker::<HardWorker>()));
    Ok(())
}

#[test]
fn test_matchers_with_perform_at() -> anyhow::Result<()> {
    let scenario = Scenario::new()?;
    scenario
        .queue
        .perform_at::<HardWorker>(scenario.tomorrow(), &scenario.worker_args)?;

    assert!(Scenario::matcher_subject()
        .at(scenario.tomorrow())
        .matches(&scenario.queue.worker::<HardWorker>()));
    Ok(())
}

#[test]
fn test_matchers_with_perform_in() -> anyhow::Result<()> {
    let scenario = Scenario::new()?;
    scenario
        .queue
        .perform_in::<HardWorker>(Duration::minutes(3), &scenario.worker_args)?;

    assert!(Scenario::matcher_subject()
        .in_interval(Duration::minutes(3))
        .matches(&scenario.queue.worker::<HardWorker>()));
    Ok(())
}

#[test]
fn test_scheduled_matchers_ignore_immediate_jobs() -> anyhow::Result<()> {
    let scenario = Scenario::new()?;
    assert!(!Scenario::matcher_subject()
        .at(scenario.tomorrow())
        .matches(&scenario.queue.worker::<HardWorker>()));
    Ok(())
}

#[test]
fn test_no_match_after_clear_all() -> anyhow::Result<()> {
    let scenario = Scenario::new()?;
    scenario.queue.clear_all();
    let snapshot = scenario.queue.worker::<HardWorker>();

    assert!(!scenario.argument_subject().matches(&snapshot));
    assert!(!Scenario::matcher_subject().matches(&snapshot));
    assert!(!Scenario::matcher_subject().at(scenario.tomorrow()).matches(&snapshot));
    expect(scenario.queue.all_workers()).not_to(have_enqueued_job!["someResource"]);
    Ok(())
}

#[test]
fn test_clear_worker_keeps_other_jobs() -> anyhow::Result<()> {
    let scenario = Scenario::new()?;
    assert_eq!(scenario.queue.clear::<HardWorker>(), 1);

    expect(scenario.queue.worker::<HardWorker>()).not_to(scenario.argument_subject());
    expect(scenario.queue.all_workers()).to(have_enqueued_job!["someResource"]);
    Ok(())
}

// Constraints

#[test]
fn test_queue_and_count_constraints() -> anyhow::Result<()> {
    let scenario = Scenario::new()?;
    let all = scenario.queue.all_workers();

    expect(all.clone()).to(have_enqueued_job!["someResource"].on_queue("mailers").once());
    expect(all.clone()).not_to(have_enqueued_job!["someResource"].on_queue("default"));
    expect(all.clone()).to(have_enqueued_job![anything()].exactly(2));
    expect(all).to(have_enqueued_job![a_string(), a_string(), a_string()].once());
    Ok(())
}

#[test]
fn test_predicate_arguments() -> anyhow::Result<()> {
    let scenario = Scenario::new()?;
    let positive = satisfying("a positive integer", |v| v.as_i64().is_some_and(|n| n > 0));

    expect(scenario.queue.worker::<HardWorker>()).to(have_enqueued_job![
        a_string(),
        positive,
        a_boolean(),
        hash_including([("key", "value")])
    ]);
    Ok(())
}

#[test]
#[should_panic(expected = "expected to have an enqueued HardWorker job with arguments [\"nope\"]")]
fn test_failed_expectation_panics_with_failure_message() {
    let scenario = Scenario::new().unwrap();
    expect(scenario.queue.worker::<HardWorker>()).to(have_enqueued_job!["nope"]);
}
