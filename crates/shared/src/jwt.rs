//! JWT token utilities using RS256.
//!
//! Access tokens carry the identity a request is evaluated against: the user,
//! the tenant the user belongs to, their email and role. Refresh tokens carry
//! the same claims but are only accepted by the refresh endpoint.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Error type for JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingError(String),

    #[error("Failed to decode token: {0}")]
    DecodingError(String),

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// JWT token claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Tenant the user belongs to
    pub tenant_id: String,
    pub email: String,
    /// Role name, e.g. `tenant_admin`
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// JWT ID
    pub jti: String,
    pub token_type: TokenType,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid, JwtError> {
        Uuid::parse_str(&self.sub).map_err(|_| JwtError::InvalidToken)
    }

    pub fn tenant_id(&self) -> Result<Uuid, JwtError> {
        Uuid::parse_str(&self.tenant_id).map_err(|_| JwtError::InvalidToken)
    }
}

/// Type of JWT token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// Identity a token pair is issued for.
#[derive(Debug, Clone)]
pub struct TokenSubject<'a> {
    pub user_id: Uuid,
    pub tenant_id: Uuid,
    pub email: &'a str,
    pub role: &'a str,
}

/// A freshly issued access/refresh pair.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

/// Keys and lifetimes for token generation and validation.
#[derive(Clone)]
pub struct JwtConfig {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    pub access_token_expiry_secs: i64,
    pub refresh_token_expiry_secs: i64,
    /// Clock skew tolerance in seconds.
    pub leeway_secs: u64,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("access_token_expiry_secs", &self.access_token_expiry_secs)
            .field("refresh_token_expiry_secs", &self.refresh_token_expiry_secs)
            .field("leeway_secs", &self.leeway_secs)
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .finish()
    }
}

/// Default leeway in seconds for clock skew tolerance
pub const DEFAULT_LEEWAY_SECS: u64 = 30;

impl JwtConfig {
    /// Creates a config from an RSA key pair in PEM format.
    pub fn new(
        private_key_pem: &str,
        public_key_pem: &str,
        access_token_expiry_secs: i64,
        refresh_token_expiry_secs: i64,
        leeway_secs: u64,
    ) -> Result<Self, JwtError> {
        let private_key = normalize_pem(private_key_pem);
        let public_key = normalize_pem(public_key_pem);

        let encoding_key = EncodingKey::from_rsa_pem(private_key.as_bytes())
            .map_err(|e| JwtError::InvalidKey(format!("Invalid private key: {}", e)))?;

        let decoding_key = DecodingKey::from_rsa_pem(public_key.as_bytes())
            .map_err(|e| JwtError::InvalidKey(format!("Invalid public key: {}", e)))?;

        Ok(Self {
            encoding_key,
            decoding_key,
            access_token_expiry_secs,
            refresh_token_expiry_secs,
            leeway_secs,
        })
    }

    /// HS256 config for unit tests only.
    #[cfg(test)]
    pub fn new_for_testing(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_token_expiry_secs: 900,
            refresh_token_expiry_secs: 604800,
            leeway_secs: 0,
        }
    }

    /// Issues an access and a refresh token for the subject.
    pub fn issue_pair(&self, subject: &TokenSubject<'_>) -> Result<TokenPair, JwtError> {
        let access_token =
            self.generate_token(subject, TokenType::Access, self.access_token_expiry_secs)?;
        let refresh_token =
            self.generate_token(subject, TokenType::Refresh, self.refresh_token_expiry_secs)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.access_token_expiry_secs,
        })
    }

    fn generate_token(
        &self,
        subject: &TokenSubject<'_>,
        token_type: TokenType,
        expiry_secs: i64,
    ) -> Result<String, JwtError> {
        let now = Utc::now();

        let claims = Claims {
            sub: subject.user_id.to_string(),
            tenant_id: subject.tenant_id.to_string(),
            email: subject.email.to_string(),
            role: subject.role.to_string(),
            exp: (now + Duration::seconds(expiry_secs)).timestamp(),
            iat: now.timestamp(),
            jti: Uuid::new_v4().to_string(),
            token_type,
        };

        encode(&Header::new(self.algorithm()), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Validates signature and expiry and returns the claims.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm());
        validation.validate_exp = true;
        validation.leeway = self.leeway_secs;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::TokenExpired,
                jsonwebtoken::errors::ErrorKind::InvalidToken
                | jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidToken,
                _ => JwtError::DecodingError(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }

    pub fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate_typed(token, TokenType::Access)
    }

    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate_typed(token, TokenType::Refresh)
    }

    fn validate_typed(&self, token: &str, expected: TokenType) -> Result<Claims, JwtError> {
        let claims = self.validate_token(token)?;
        if claims.token_type != expected {
            return Err(JwtError::InvalidToken);
        }
        Ok(claims)
    }

    // Unit tests sign with a shared secret; real deployments use RSA keys.
    fn algorithm(&self) -> Algorithm {
        #[cfg(test)]
        {
            Algorithm::HS256
        }
        #[cfg(not(test))]
        {
            Algorithm::RS256
        }
    }
}

/// Converts escaped `\n` sequences (common in env files) into real newlines.
fn normalize_pem(key: &str) -> String {
    key.trim_matches('"').trim_matches('\'').replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtConfig {
        JwtConfig::new_for_testing("test_secret_key_for_jwt_testing_12345")
    }

    fn subject<'a>(user_id: Uuid, tenant_id: Uuid) -> TokenSubject<'a> {
        TokenSubject {
            user_id,
            tenant_id,
            email: "a@acme.com",
            role: "tenant_admin",
        }
    }

    #[test]
    fn test_access_token_carries_tenant_and_role() {
        let config = config();
        let user_id = Uuid::new_v4();
        let tenant_id = Uuid::new_v4();

        let pair = config.issue_pair(&subject(user_id, tenant_id)).unwrap();
        let claims = config.validate_access_token(&pair.access_token).unwrap();

        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.tenant_id().unwrap(), tenant_id);
        assert_eq!(claims.email, "a@acme.com");
        assert_eq!(claims.role, "tenant_admin");
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(pair.expires_in, 900);
    }

    #[test]
    fn test_token_types_are_not_interchangeable() {
        let config = config();
        let pair = config
            .issue_pair(&subject(Uuid::new_v4(), Uuid::new_v4()))
            .unwrap();

        assert!(matches!(
            config.validate_refresh_token(&pair.access_token),
            Err(JwtError::InvalidToken)
        ));
        assert!(matches!(
            config.validate_access_token(&pair.refresh_token),
            Err(JwtError::InvalidToken)
        ));
        assert!(config.validate_refresh_token(&pair.refresh_token).is_ok());
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let mut config = config();
        config.access_token_expiry_secs = -120;

        let pair = config
            .issue_pair(&subject(Uuid::new_v4(), Uuid::new_v4()))
            .unwrap();

        assert!(matches!(
            config.validate_access_token(&pair.access_token),
            Err(JwtError::TokenExpired)
        ));
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let issuer = JwtConfig::new_for_testing("issuer-secret-issuer-secret");
        let verifier = JwtConfig::new_for_testing("another-secret-another-secret");

        let pair = issuer
            .issue_pair(&subject(Uuid::new_v4(), Uuid::new_v4()))
            .unwrap();

        assert!(verifier.validate_access_token(&pair.access_token).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        assert!(config().validate_access_token("not.a.jwt").is_err());
    }

    #[test]
    fn test_invalid_pem_is_reported() {
        let result = JwtConfig::new("not a key", "not a key", 60, 60, DEFAULT_LEEWAY_SECS);
        assert!(matches!(result, Err(JwtError::InvalidKey(_))));
    }

    #[test]
    fn test_normalize_pem_unescapes_newlines() {
        let raw = "\"-----BEGIN KEY-----\\nabc\\n-----END KEY-----\"";
        assert_eq!(
            normalize_pem(raw),
            "-----BEGIN KEY-----\nabc\n-----END KEY-----"
        );
    }

    #[test]
    fn test_debug_redacts_keys() {
        let debug = format!("{:?}", config());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("test_secret_key"));
    }
}
