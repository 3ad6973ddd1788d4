use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cached identity of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct UserIdentity {
    pub id: String,
    pub email: String,
    pub full_name: String,
    pub role: String,
}

/// Tokens plus cached identity, persisted through a `TokenStore`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user: UserIdentity,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_token", &"[REDACTED]")
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Deserialize)]
struct Claims {
    exp: Option<i64>,
}

impl Session {
    /// Expiry read from the access token's JWT `exp` claim.
    ///
    /// Opaque tokens (or JWTs without `exp`) have no known expiry.
    pub fn access_token_expiry(&self) -> Option<DateTime<Utc>> {
        let payload = self.access_token.split('.').nth(1)?;
        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
        let claims: Claims = serde_json::from_slice(&bytes).ok()?;

        DateTime::from_timestamp(claims.exp?, 0)
    }

    pub fn access_token_expired(&self, now: DateTime<Utc>) -> bool {
        self.access_token_expiry()
            .is_some_and(|expiry| expiry <= now)
    }

    pub fn with_tokens(&self, access_token: String, refresh_token: Option<String>) -> Self {
        Self {
            access_token,
            refresh_token: refresh_token.or_else(|| self.refresh_token.clone()),
            user: self.user.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn jwt_with_exp(exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"1","exp":{exp}}}"#));
        format!("{header}.{payload}.signature")
    }

    fn session(access_token: String) -> Session {
        Session {
            access_token,
            refresh_token: Some("refresh".to_owned()),
            user: UserIdentity::default(),
        }
    }

    #[test]
    fn reads_expiry_from_jwt_payload() {
        let session = session(jwt_with_exp(1_714_557_600));

        assert_eq!(
            session.access_token_expiry(),
            Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap())
        );
        assert!(session.access_token_expired(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()));
        assert!(!session.access_token_expired(Utc.with_ymd_and_hms(2024, 4, 1, 0, 0, 0).unwrap()));
    }

    #[test]
    fn opaque_tokens_never_expire_client_side() {
        let session = session("opaque-token".to_owned());

        assert_eq!(session.access_token_expiry(), None);
        assert!(!session.access_token_expired(Utc::now()));
    }

    #[test]
    fn debug_output_hides_tokens() {
        let session = session("secret-access".to_owned());

        let rendered = format!("{session:?}");

        assert!(!rendered.contains("secret-access"));
        assert!(!rendered.contains("\"refresh\""));
    }

    #[test]
    fn with_tokens_keeps_refresh_token_when_not_rotated() {
        let rotated = session("old".to_owned()).with_tokens("new".to_owned(), None);

        assert_eq!(rotated.access_token, "new");
        assert_eq!(rotated.refresh_token.as_deref(), Some("refresh"));
    }
}
