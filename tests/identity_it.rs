mod common;

// std
use std::io;
// crates.io
use httpmock::prelude::*;
use serde_json::json;
// self
use common::*;
use cx1_client::{
	error::{Error, TransportError},
	http::HttpMethod,
};

const GROUPS_PATH: &str = "/auth/admin/realms/acme/groups";

#[tokio::test]
async fn groups_list_decodes_and_skips_records_without_id() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(GROUPS_PATH)
				.query_param("briefRepresentation", "true")
				.header("authorization", BEARER);
			then.status(200).json_body(json!([
				{ "id": "g1", "name": "Team A" },
				{ "id": "g2", "name": "Team B" },
				{ "name": "noId" },
			]));
		})
		.await;
	let groups = mock_client(&server).get_groups().await.expect("Group listing should succeed.");

	assert_eq!(groups.len(), 2);
	assert_eq!(groups[0].id, "g1");
	assert_eq!(groups[0].name, "Team A");
	assert_eq!(groups[1].id, "g2");
	assert_eq!(groups[1].name, "Team B");

	mock.assert_async().await;
}

#[tokio::test]
async fn group_lookup_prefers_exact_name() {
	let http = RecordingHttpClient::new();

	http.respond(
		200,
		json!([
			{ "id": "g9", "name": "Team Alpha" },
			{ "id": "g1", "name": "Team A" },
		])
		.to_string(),
	);

	let group = recording_client(&http)
		.get_group_by_name("Team A")
		.await
		.expect("Exact match should be found.");

	assert_eq!(group.id, "g1");
	assert_eq!(group.name, "Team A");
	assert_eq!(http.calls(), 1);
	assert!(
		http.requests()[0]
			.url
			.as_str()
			.ends_with("/groups?briefRepresentation=true&search=Team+A")
	);
}

#[tokio::test]
async fn group_lookup_without_exact_match_is_not_found() {
	let http = RecordingHttpClient::new();

	http.respond(200, json!([{ "id": "g9", "name": "Team Alpha" }]).to_string());

	let err = recording_client(&http)
		.get_group_by_name("Team")
		.await
		.expect_err("Partial matches must not count.");

	assert!(matches!(err.root(), Error::NotFound { kind: "group", name } if name == "Team"));
	assert_eq!(err.call_context(), Some(("get_group_by_name", "Team")));
	assert_eq!(
		http.requests()[0].url.as_str(),
		"https://cx1.example.com/auth/admin/realms/acme/groups?briefRepresentation=true&search=Team"
	);
}

#[tokio::test]
async fn create_group_posts_name_then_resolves_it() {
	let server = MockServer::start_async().await;
	let create = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(GROUPS_PATH)
				.header("content-type", "application/json")
				.header("authorization", BEARER)
				.json_body(json!({ "name": "platform" }));
			then.status(201);
		})
		.await;
	let lookup = server
		.mock_async(|when, then| {
			when.method(GET).path(GROUPS_PATH).query_param("search", "platform");
			then.status(200).json_body(json!([{ "id": "g3", "name": "platform" }]));
		})
		.await;
	let group =
		mock_client(&server).create_group("platform").await.expect("Group creation should succeed.");

	assert_eq!(group.id, "g3");

	create.assert_async().await;
	lookup.assert_async().await;
}

#[tokio::test]
async fn create_group_propagates_transport_failures() {
	let http = RecordingHttpClient::new();

	http.fail(TransportError::network(
		HttpMethod::Post,
		"https://cx1.example.com/auth/admin/realms/acme/groups",
		io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"),
	));

	let err = recording_client(&http)
		.create_group("platform")
		.await
		.expect_err("A failed create call must surface.");

	assert!(matches!(err.root(), Error::Transport(TransportError::Network { .. })));
	assert_eq!(http.calls(), 1, "No lookup may follow a failed create call.");
}

#[tokio::test]
async fn users_list_skips_malformed_entries() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/auth/admin/realms/acme/users")
				.query_param("briefRepresentation", "true");
			then.status(200).json_body(json!([
				{ "id": "u1", "username": "alice", "firstName": "Alice", "lastName": "Doe" },
				{ "username": "ghost" },
				{ "id": "u2", "username": "service-account-ci" },
			]));
		})
		.await;
	let users = mock_client(&server).get_users().await.expect("User listing should succeed.");

	assert_eq!(users.len(), 2);
	assert_eq!(users[0].username, "alice");
	assert_eq!(users[0].last_name.as_deref(), Some("Doe"));
	assert_eq!(users[1].first_name, None);

	mock.assert_async().await;
}
