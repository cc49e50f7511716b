mod common;

// std
use std::time::Duration;
// self
use common::{ScriptedTransport, config_body, scripted_agent};
use telemetry_agent::cycles::{
	ConfigPoll, CycleState, MAX_RETRY_DELAY_MS, MIN_RETRY_DELAY_MS,
};

fn assert_in_retry_window(delay: Duration) {
	let millis = delay.as_millis() as u64;

	assert!(
		(MIN_RETRY_DELAY_MS..=MAX_RETRY_DELAY_MS).contains(&millis),
		"Retry delay {millis} ms must stay inside the jitter window.",
	);
}

#[tokio::test]
async fn loop_recovers_after_two_failures_and_starts_measurement_once() {
	let transport = ScriptedTransport::new([
		ScriptedTransport::network_failure(),
		ScriptedTransport::ok(200, "{\"authorized\":false,\"message\":\"device not registered\"}"),
		ScriptedTransport::ok(200, &config_body(60, 600, 300)),
		ScriptedTransport::ok(200, &config_body(60, 600, 300)),
	]);
	let (agent, _store) = scripted_agent(transport);

	assert_eq!(CycleState::initial(), CycleState::AwaitingConfig);

	let first = agent.refresh_config_once().await;

	assert!(matches!(first, ConfigPoll::Unreachable { .. }));
	assert_eq!(first.state(), CycleState::RetryBackoff);
	assert_in_retry_window(first.next_delay());
	assert!(agent.slot.is_empty());

	let second = agent.refresh_config_once().await;

	assert!(matches!(second, ConfigPoll::Rejected { .. }));
	assert_eq!(second.state(), CycleState::RetryBackoff);
	assert!(agent.slot.is_empty());

	let third = agent.refresh_config_once().await;

	assert!(matches!(third, ConfigPoll::Refreshed { first: true, .. }));
	assert_eq!(third.state(), CycleState::ConfigActive);
	assert!(!agent.slot.is_empty());

	let fourth = agent.refresh_config_once().await;

	assert!(
		matches!(fourth, ConfigPoll::Refreshed { first: false, .. }),
		"The measurement cycle must start exactly once, not once per success.",
	);
}

#[tokio::test]
async fn denial_clears_a_previously_stored_snapshot() {
	let transport = ScriptedTransport::new([
		ScriptedTransport::ok(200, &config_body(60, 600, 300)),
		ScriptedTransport::ok(200, "{\"authorized\":false,\"message\":\"key rotated\"}"),
	]);
	let (agent, _store) = scripted_agent(transport);

	agent.refresh_config_once().await;

	assert!(!agent.slot.is_empty());

	let denied = agent.refresh_config_once().await;

	assert!(matches!(denied, ConfigPoll::Rejected { .. }));
	assert!(agent.slot.is_empty(), "A denial must clear the cached snapshot.");
}

#[tokio::test]
async fn refresh_interval_follows_the_server_directive() {
	let transport =
		ScriptedTransport::new([ScriptedTransport::ok(200, &config_body(60, 600, 300))]);
	let (agent, _store) = scripted_agent(transport);
	let poll = agent.refresh_config_once().await;

	assert_eq!(poll.next_delay(), Duration::from_secs(300));

	let config = agent.slot.snapshot().expect("Snapshot should be stored after a refresh.");

	assert_eq!(config.measurement_period, Duration::from_secs(60));
	assert_eq!(config.upload_period, Duration::from_secs(600));
	assert_eq!(config.signed_token.key_name.as_ref(), "device-policy");
}

#[tokio::test]
async fn malformed_bodies_take_the_retry_path() {
	let transport = ScriptedTransport::new([
		ScriptedTransport::ok(200, &config_body(60, 600, 300)),
		ScriptedTransport::ok(500, "<html>internal error</html>"),
	]);
	let (agent, _store) = scripted_agent(transport);

	agent.refresh_config_once().await;

	let poll = agent.refresh_config_once().await;

	assert!(matches!(poll, ConfigPoll::Rejected { .. }));
	assert_in_retry_window(poll.next_delay());
	assert!(agent.slot.is_empty(), "A malformed response must clear the cached snapshot.");
}
