//! Client for the external DNS/email-routing provider.
//!
//! Four zone-scoped operations: create/delete CNAME record, create/delete
//! email-forwarding rule. Every response uses the provider's
//! `{success, errors, result}` envelope; a non-success envelope or a
//! transport failure both surface as [`ProviderError`] with the provider's
//! error detail. No retries anywhere: a failed call aborts the enclosing
//! workflow step (the reset flow handles per-record continuation itself).

use serde::Deserialize;
use serde_json::json;
use thiserror::Error;

/// Request timeout for provider calls.
const REQUEST_TIMEOUT_SECS: u64 = 30;
/// TTL for created CNAME records.
const CNAME_TTL_SECS: u32 = 3600;

#[derive(Debug, Error)]
#[error("{detail}")]
pub struct ProviderError {
    pub detail: String,
}

impl ProviderError {
    fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    errors: serde_json::Value,
    result: Option<T>,
}

/// Created DNS record as returned by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct DnsRecord {
    pub id: String,
    #[serde(default)]
    pub content: Option<String>,
}

/// Created email-forwarding rule as returned by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailRule {
    pub id: String,
}

#[derive(Debug, Clone)]
pub struct ProviderClient {
    http: reqwest::Client,
    base_url: String,
    zone_id: String,
    api_token: String,
}

impl ProviderClient {
    pub fn new(base_url: &str, zone_id: &str, api_token: &str) -> Result<Self, ProviderError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("subdomain-portal/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::new(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            zone_id: zone_id.to_string(),
            api_token: api_token.to_string(),
        })
    }

    fn zone_url(&self, path: &str) -> String {
        format!("{}/zones/{}{}", self.base_url, self.zone_id, path)
    }

    async fn send<T: serde::de::DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, ProviderError> {
        let resp = req
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| ProviderError::new(e.to_string()))?;

        let body: Envelope<T> = resp
            .json()
            .await
            .map_err(|e| ProviderError::new(format!("Unparseable provider response: {}", e)))?;

        if !body.success {
            let detail = if body.errors.is_null() {
                "provider reported failure without detail".to_string()
            } else {
                body.errors.to_string()
            };
            return Err(ProviderError::new(detail));
        }

        body.result
            .ok_or_else(|| ProviderError::new("provider response missing result"))
    }

    /// Create a proxied CNAME record `<label>.<root>` pointing at `target`.
    pub async fn create_cname(
        &self,
        label: &str,
        root_domain: &str,
        target: &str,
    ) -> Result<DnsRecord, ProviderError> {
        let req = self.http.post(self.zone_url("/dns_records")).json(&json!({
            "type": "CNAME",
            "name": format!("{}.{}", label, root_domain),
            "content": target,
            "ttl": CNAME_TTL_SECS,
            "proxied": true,
        }));
        self.send(req).await
    }

    pub async fn delete_dns_record(&self, record_id: &str) -> Result<(), ProviderError> {
        let req = self
            .http
            .delete(self.zone_url(&format!("/dns_records/{}", record_id)));
        // Deletion result payload is just the record id; ignore it.
        self.send::<serde_json::Value>(req).await.map(|_| ())
    }

    /// Create a forwarding rule routing mail for `to` to `destination`.
    /// The provider requires the forward action value to be a list even for
    /// a single destination.
    pub async fn create_email_rule(
        &self,
        to: &str,
        destination: &str,
        rule_name: &str,
    ) -> Result<EmailRule, ProviderError> {
        let req = self
            .http
            .post(self.zone_url("/email/routing/rules"))
            .json(&json!({
                "enabled": true,
                "name": rule_name,
                "matchers": [{ "type": "literal", "field": "to", "value": to }],
                "actions": [{ "type": "forward", "value": [destination] }],
            }));
        self.send(req).await
    }

    pub async fn delete_email_rule(&self, rule_id: &str) -> Result<(), ProviderError> {
        let req = self
            .http
            .delete(self.zone_url(&format!("/email/routing/rules/{}", rule_id)));
        self.send::<serde_json::Value>(req).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base: &str) -> ProviderClient {
        ProviderClient::new(base, "zone123", "token-abc").expect("client")
    }

    #[tokio::test]
    async fn test_create_cname_sends_fqdn_and_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/zones/zone123/dns_records"))
            .and(header("authorization", "Bearer token-abc"))
            .and(body_partial_json(json!({
                "type": "CNAME",
                "name": "mysite.campus.example",
                "content": "app.example.com",
                "proxied": true,
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "errors": [],
                "result": { "id": "rec-1", "content": "app.example.com" },
            })))
            .expect(1)
            .mount(&server)
            .await;

        let record = client(&server.uri())
            .create_cname("mysite", "campus.example", "app.example.com")
            .await
            .expect("create should succeed");
        assert_eq!(record.id, "rec-1");
        assert_eq!(record.content.as_deref(), Some("app.example.com"));
    }

    #[tokio::test]
    async fn test_error_envelope_carries_provider_detail() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/zones/zone123/dns_records"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": false,
                "errors": [{ "code": 81053, "message": "record already exists" }],
                "result": null,
            })))
            .mount(&server)
            .await;

        let err = client(&server.uri())
            .create_cname("dup", "campus.example", "app.example.com")
            .await
            .unwrap_err();
        assert!(err.detail.contains("record already exists"));
    }

    #[tokio::test]
    async fn test_email_rule_wraps_destination_in_list() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/zones/zone123/email/routing/rules"))
            .and(body_partial_json(json!({
                "enabled": true,
                "matchers": [{ "type": "literal", "field": "to", "value": "me@sub.campus.example" }],
                "actions": [{ "type": "forward", "value": ["dest@example.com"] }],
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "errors": [],
                "result": { "id": "rule-1" },
            })))
            .expect(1)
            .mount(&server)
            .await;

        let rule = client(&server.uri())
            .create_email_rule("me@sub.campus.example", "dest@example.com", "route-x")
            .await
            .expect("rule created");
        assert_eq!(rule.id, "rule-1");
    }

    #[tokio::test]
    async fn test_delete_operations_hit_id_scoped_paths() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/zones/zone123/dns_records/rec-9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true, "errors": [], "result": { "id": "rec-9" },
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/zones/zone123/email/routing/rules/rule-9"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true, "errors": [], "result": { "id": "rule-9" },
            })))
            .expect(1)
            .mount(&server)
            .await;

        let c = client(&server.uri());
        c.delete_dns_record("rec-9").await.expect("dns delete");
        c.delete_email_rule("rule-9").await.expect("rule delete");
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces_as_provider_error() {
        // Nothing listening on this port.
        let err = client("http://127.0.0.1:9")
            .delete_dns_record("rec-1")
            .await
            .unwrap_err();
        assert!(!err.detail.is_empty());
    }
}
