//! Stateless HTTP request builder and response parser for the loyalty API.
//!
//! # Design
//! `ApiClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`.
//! Both are generic over [`Resource`], so clients (`/clients`) and loyalty
//! programs (`/lp`) share one code path.

use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::resource::Resource;

/// Synchronous, stateless client for the loyalty API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list<R: Resource>(&self) -> HttpRequest {
        bodyless(HttpMethod::Get, self.collection_url::<R>())
    }

    pub fn build_get<R: Resource>(&self, id: i64) -> HttpRequest {
        bodyless(HttpMethod::Get, self.item_url::<R>(id))
    }

    pub fn build_create<R: Resource>(&self, input: &R) -> Result<HttpRequest, ApiError> {
        with_json_body(HttpMethod::Post, self.collection_url::<R>(), input)
    }

    pub fn build_patch<R: Resource>(&self, id: i64, patch: &R::Patch) -> Result<HttpRequest, ApiError> {
        with_json_body(HttpMethod::Patch, self.item_url::<R>(id), patch)
    }

    pub fn build_delete<R: Resource>(&self, id: i64) -> HttpRequest {
        bodyless(HttpMethod::Delete, self.item_url::<R>(id))
    }

    pub fn parse_list<R: Resource>(&self, response: HttpResponse) -> Result<Vec<R>, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(ApiError::Deserialization)
    }

    /// Parse the single entity returned by `GET {collection}/{id}` or
    /// `POST {collection}`.
    pub fn parse_entity<R: Resource>(&self, response: HttpResponse) -> Result<R, ApiError> {
        check_status(&response)?;
        serde_json::from_str(&response.body).map_err(ApiError::Deserialization)
    }

    /// Patch and delete only report whether the server accepted the change;
    /// the response body is ignored.
    pub fn parse_acknowledgement(&self, response: &HttpResponse) -> bool {
        response.is_success()
    }

    fn collection_url<R: Resource>(&self) -> String {
        format!("{}{}", self.base_url, R::COLLECTION)
    }

    fn item_url<R: Resource>(&self, id: i64) -> String {
        format!("{}{}/{id}", self.base_url, R::COLLECTION)
    }
}

fn bodyless(method: HttpMethod, path: String) -> HttpRequest {
    HttpRequest {
        method,
        path,
        headers: Vec::new(),
        body: None,
    }
}

fn with_json_body<T: Serialize>(method: HttpMethod, path: String, payload: &T) -> Result<HttpRequest, ApiError> {
    let body = serde_json::to_string(payload).map_err(ApiError::Serialization)?;
    Ok(HttpRequest {
        method,
        path,
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(body),
    })
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Client, ClientPatch, LoyaltyProgram, LoyaltyProgramPatch, LoyaltyProgramRef};

    fn client() -> ApiClient {
        ApiClient::new("http://localhost:8080")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    fn new_program() -> LoyaltyProgram {
        LoyaltyProgram {
            id: None,
            level: 1,
            discount_amount: 5,
            validity_period: 30,
            description: "Starter".to_string(),
        }
    }

    #[test]
    fn build_list_targets_each_collection() {
        let req = client().build_list::<Client>();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:8080/clients");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());

        let req = client().build_list::<LoyaltyProgram>();
        assert_eq!(req.path, "http://localhost:8080/lp");
    }

    #[test]
    fn build_get_appends_id() {
        let req = client().build_get::<LoyaltyProgram>(3);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:8080/lp/3");
    }

    #[test]
    fn build_create_sends_json_without_id() {
        let req = client().build_create(&new_program()).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8080/lp");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert!(body.get("id_loyalty_program").is_none());
        assert_eq!(body["description"], "Starter");
    }

    #[test]
    fn build_patch_sends_only_changed_fields() {
        let patch = ClientPatch {
            email: Some("new@b.com".to_string()),
            ..ClientPatch::default()
        };
        let req = client().build_patch::<Client>(42, &patch).unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.path, "http://localhost:8080/clients/42");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"email": "new@b.com"}));
    }

    #[test]
    fn build_patch_embeds_program_reference() {
        let patch = ClientPatch {
            loyalty_program: Some(LoyaltyProgramRef::Id(9)),
            ..ClientPatch::default()
        };
        let req = client().build_patch::<Client>(1, &patch).unwrap();
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, serde_json::json!({"loyalty_program": 9}));
    }

    #[test]
    fn build_patch_does_not_validate_values() {
        let patch = LoyaltyProgramPatch {
            discount_amount: Some(250),
            ..LoyaltyProgramPatch::default()
        };
        let req = client().build_patch::<LoyaltyProgram>(5, &patch).unwrap();
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["discount_amount"], 250);
    }

    #[test]
    fn build_delete_has_no_body() {
        let req = client().build_delete::<Client>(42);
        assert_eq!(req.method, HttpMethod::Delete);
        assert_eq!(req.path, "http://localhost:8080/clients/42");
        assert!(req.body.is_none());
    }

    #[test]
    fn parse_list_success() {
        let programs: Vec<LoyaltyProgram> = client()
            .parse_list(response(
                200,
                r#"[{"id_loyalty_program":1,"loyalty_level":1,"discount_amount":5,"validity_period":30,"description":"Starter"}]"#,
            ))
            .unwrap();
        assert_eq!(programs.len(), 1);
        assert_eq!(programs[0].id, Some(1));
    }

    #[test]
    fn parse_list_server_error() {
        let err = client()
            .parse_list::<Client>(response(500, "internal error"))
            .unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn parse_list_bad_json() {
        let err = client()
            .parse_list::<Client>(response(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn parse_entity_accepts_200_and_201() {
        let body = r#"{"id_loyalty_program":4,"loyalty_level":1,"discount_amount":5,"validity_period":30,"description":"Starter"}"#;
        let created: LoyaltyProgram = client().parse_entity(response(201, body)).unwrap();
        assert_eq!(created.id, Some(4));
        let fetched: LoyaltyProgram = client().parse_entity(response(200, body)).unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn parse_entity_not_found() {
        let err = client()
            .parse_entity::<Client>(response(404, ""))
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_acknowledgement_follows_status_class() {
        assert!(client().parse_acknowledgement(&response(200, "")));
        assert!(client().parse_acknowledgement(&response(204, "")));
        assert!(!client().parse_acknowledgement(&response(404, "")));
        assert!(!client().parse_acknowledgement(&response(500, "oops")));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = ApiClient::new("http://localhost:8080/");
        let req = client.build_list::<Client>();
        assert_eq!(req.path, "http://localhost:8080/clients");
    }
}
