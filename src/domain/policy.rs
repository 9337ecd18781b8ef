// src/domain/policy.rs
//
// Client and redirect-URI matching heuristics, kept as named policy
// functions so the flow state machines never inspect strings themselves.
// The matching is deliberately permissive to accommodate browser-based
// callers that cannot reliably echo a client_id; tightening the trust model
// means replacing these functions, not the flows.
use url::Url;

/// Label recorded for authorization requests that carry no client_id.
pub const ANONYMOUS_CLIENT: &str = "claude-web-client";

/// Substring marking a presented client_id as a trusted-partner client.
pub const PARTNER_CLIENT_MARKER: &str = "claude";

#[derive(Clone, Debug)]
pub struct ApprovalPolicy {
    client_id: String,
    trusted_redirects: Vec<String>,
}

impl ApprovalPolicy {
    pub fn new(client_id: impl Into<String>, trusted_redirects: Vec<String>) -> Self {
        Self {
            client_id: client_id.into(),
            trusted_redirects,
        }
    }

    pub fn configured_client_id(&self) -> &str {
        &self.client_id
    }

    /// First decision of the authorization flow: requests whose redirect_uri
    /// carries a trusted marker, or whose client_id equals the configured
    /// one, skip the consent form.
    pub fn auto_approves(&self, client_id: Option<&str>, redirect_uri: &str) -> bool {
        let trusted_redirect = self
            .trusted_redirects
            .iter()
            .any(|marker| redirect_uri.contains(marker.as_str()));

        trusted_redirect || client_id == Some(self.client_id.as_str())
    }

    /// Client check at code redemption: exact match, the configured client
    /// id, a code issued to an anonymous caller, or a partner-marked id.
    pub fn client_matches(&self, presented: Option<&str>, stored: &str) -> bool {
        presented == Some(stored)
            || presented == Some(self.client_id.as_str())
            || stored == ANONYMOUS_CLIENT
            || presented.is_some_and(|id| id.contains(PARTNER_CLIENT_MARKER))
    }
}

/// Redirect-URI equivalence at code redemption: exact match, prefix match in
/// either direction, or same origin (scheme + host + port).
pub fn redirect_matches(presented: &str, stored: &str) -> bool {
    if presented == stored || presented.starts_with(stored) || stored.starts_with(presented) {
        return true;
    }

    match (Url::parse(presented), Url::parse(stored)) {
        (Ok(a), Ok(b)) => a.origin() == b.origin(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> ApprovalPolicy {
        ApprovalPolicy::new(
            "render_mcp_client",
            vec!["claude.ai".into(), "localhost".into()],
        )
    }

    #[test]
    fn trusted_redirect_marker_auto_approves() {
        let p = policy();
        assert!(p.auto_approves(None, "https://claude.ai/oauth/callback"));
        assert!(p.auto_approves(Some("whoever"), "http://localhost:3000/cb"));
        assert!(!p.auto_approves(Some("whoever"), "https://evil.example/cb"));
    }

    #[test]
    fn configured_client_id_auto_approves() {
        let p = policy();
        assert!(p.auto_approves(Some("render_mcp_client"), "https://evil.example/cb"));
    }

    #[test]
    fn client_match_matrix() {
        let p = policy();
        assert!(p.client_matches(Some("abc"), "abc"));
        assert!(p.client_matches(Some("render_mcp_client"), "other"));
        assert!(p.client_matches(None, ANONYMOUS_CLIENT));
        assert!(p.client_matches(Some("claude-desktop"), "other"));
        assert!(!p.client_matches(Some("mallory"), "other"));
        assert!(!p.client_matches(None, "other"));
    }

    #[test]
    fn redirect_match_matrix() {
        let stored = "https://claude.ai/oauth/callback";
        assert!(redirect_matches(stored, stored));
        assert!(redirect_matches("https://claude.ai/oauth/callback?x=1", stored));
        assert!(redirect_matches("https://claude.ai/oauth", stored));
        // Same origin, unrelated path.
        assert!(redirect_matches("https://claude.ai/other", stored));
        assert!(!redirect_matches("https://evil.example/oauth/callback", stored));
        assert!(!redirect_matches("not a url", stored));
    }
}
