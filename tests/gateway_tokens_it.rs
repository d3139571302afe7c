// self
use bearer_gateway::{
	_preludet::*,
	auth::{RefreshUpdate, TokenSecret},
};

const BASE_URL: &str = "http://localhost:4000/api";

#[tokio::test]
async fn access_only_rotation_keeps_the_stored_refresh_token() {
	let (gateway, _store) = build_reqwest_test_gateway(BASE_URL);

	gateway
		.set_auth_token(
			Some(TokenSecret::new("tok1")),
			RefreshUpdate::Set(TokenSecret::new("refOld")),
		)
		.await
		.expect("Seeding the credential pair should succeed.");
	gateway
		.set_auth_token(Some(TokenSecret::new("tokX")), RefreshUpdate::Keep)
		.await
		.expect("Access-only rotation should succeed.");

	let access = gateway
		.get_access_token()
		.await
		.expect("Reading the access slot should succeed.")
		.expect("Access credential should be present after rotation.");
	let refresh = gateway
		.get_refresh_token()
		.await
		.expect("Reading the refresh slot should succeed.")
		.expect("Refresh credential should survive access-only rotation.");

	assert_eq!(access.expose(), "tokX");
	assert_eq!(refresh.expose(), "refOld");
}

#[tokio::test]
async fn an_explicit_empty_refresh_value_removes_the_stored_token() {
	let (gateway, _store) = build_reqwest_test_gateway(BASE_URL);

	gateway
		.set_auth_token(
			Some(TokenSecret::new("tok1")),
			RefreshUpdate::Set(TokenSecret::new("refOld")),
		)
		.await
		.expect("Seeding the credential pair should succeed.");
	gateway
		.set_auth_token(Some(TokenSecret::new("tokX")), RefreshUpdate::Set(TokenSecret::new("")))
		.await
		.expect("Writing an empty refresh value should succeed.");

	let refresh =
		gateway.get_refresh_token().await.expect("Reading the refresh slot should succeed.");

	assert!(refresh.is_none());

	gateway
		.set_auth_token(Some(TokenSecret::new("tokY")), RefreshUpdate::Clear)
		.await
		.expect("Clearing the refresh slot should succeed.");

	let refresh =
		gateway.get_refresh_token().await.expect("Reading the refresh slot should succeed.");

	assert!(refresh.is_none());
}

#[tokio::test]
async fn an_empty_access_value_removes_the_stored_token() {
	let (gateway, _store) = build_reqwest_test_gateway(BASE_URL);

	gateway
		.set_auth_token(Some(TokenSecret::new("tok1")), RefreshUpdate::Keep)
		.await
		.expect("Seeding the access credential should succeed.");
	gateway
		.set_auth_token(None, RefreshUpdate::Keep)
		.await
		.expect("Removing the access credential should succeed.");

	let access = gateway.get_access_token().await.expect("Reading the access slot should succeed.");

	assert!(access.is_none());
}

#[tokio::test]
async fn clearing_an_empty_store_is_idempotent() {
	let (gateway, _store) = build_reqwest_test_gateway(BASE_URL);

	gateway.clear_auth_tokens().await.expect("Clearing an empty store should succeed.");
	gateway.clear_auth_tokens().await.expect("Clearing twice should also succeed.");

	let access = gateway.get_access_token().await.expect("Reading the access slot should succeed.");
	let refresh =
		gateway.get_refresh_token().await.expect("Reading the refresh slot should succeed.");

	assert!(access.is_none());
	assert!(refresh.is_none());
}

#[tokio::test]
async fn token_reads_start_out_empty() {
	let (gateway, _store) = build_reqwest_test_gateway(BASE_URL);

	let access = gateway.get_access_token().await.expect("Reading the access slot should succeed.");
	let refresh =
		gateway.get_refresh_token().await.expect("Reading the refresh slot should succeed.");

	assert!(access.is_none());
	assert!(refresh.is_none());
}
