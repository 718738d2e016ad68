//! Demonstrates authenticating with an API key, uploading a source archive, and starting an
//! incremental scan against a mocked Checkmarx One tenant.

// std
use std::{env, fs};
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
// self
use cx1_client::{
	api::ReqwestCx1Client,
	auth::Grant,
	config::ClientConfig,
	http::ReqwestHttpClient,
	model::{ScanConfiguration, TenantId},
	reqwest::Client,
	url::Url,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let upload_url = server.url("/storage/archive.zip?signature=demo");
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/auth/realms/acme/protocol/openid-connect/token");
			then.status(200).json_body(json!({ "access_token": "demo-access" }));
		})
		.await;
	let project_mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/projects").query_param("name", "payments");
			then.status(200).json_body(json!({
				"totalCount": 1,
				"projects": [{ "id": "p-1", "name": "payments", "mainBranch": "main" }],
			}));
		})
		.await;
	let presign_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/uploads");
			then.status(200).json_body(json!({ "url": upload_url }));
		})
		.await;
	let put_mock = server
		.mock_async(|when, then| {
			when.method(PUT).path("/storage/archive.zip");
			then.status(200);
		})
		.await;
	let scan_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/scans");
			then.status(201).json_body(json!({ "id": "s-1", "status": "Queued" }));
		})
		.await;
	let base = Url::parse(&server.base_url())?;
	let config = ClientConfig::builder(TenantId::new("acme")?)
		.api_url(base.clone())
		.iam_url(base)
		.build()?;
	let http_client = ReqwestHttpClient::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let client =
		ReqwestCx1Client::authenticate(http_client, config, &Grant::api_key("demo-api-key")).await?;
	let project = client.get_project_by_name("payments").await?;
	let archive = env::temp_dir().join("cx1-client-demo.zip");

	fs::write(&archive, b"PK\x03\x04demo")?;

	let uploaded = client.upload_file(&archive).await?;

	fs::remove_file(&archive)?;

	let scan = client
		.scan_project_zip(
			&project.id,
			uploaded.as_str(),
			project.main_branch.as_deref().unwrap_or("main"),
			&[ScanConfiguration::sast_incremental(true)],
		)
		.await?;

	println!("Connected as {client}.");
	println!("Scan {} of project {} is {}.", scan.id, project.name, scan.status);

	token_mock.assert_async().await;
	project_mock.assert_async().await;
	presign_mock.assert_async().await;
	put_mock.assert_async().await;
	scan_mock.assert_async().await;

	Ok(())
}
