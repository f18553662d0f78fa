//! Token claims and route-level authorization.
//!
//! Token verification is delegated to `jsonwebtoken`; this module only maps
//! verified claims to an access decision. The decision is a pure function of
//! (method, path, claims); no session state is kept between requests.

use axum::http::Method;
use serde::{Deserialize, Serialize};

/// Verified claims extracted from a bearer JWT
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject, used as the audit principal
    pub sub: String,
    /// Role names, without the authority prefix
    pub roles: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

impl TokenClaims {
    /// Build claims for a subject, stamping issue and expiration times
    pub fn new(sub: impl Into<String>, roles: Vec<String>, ttl_hours: u64) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            sub: sub.into(),
            roles,
            exp: now + (ttl_hours as i64 * 3600),
            iat: now,
        }
    }

    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse and verify a JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    /// Authorities granted by these claims
    pub fn authorities(&self) -> Vec<String> {
        role_authorities(&self.roles)
    }
}

/// Map role claims to authority strings by prefixing `ROLE_`
pub fn role_authorities(roles: &[String]) -> Vec<String> {
    roles.iter().map(|role| format!("ROLE_{}", role)).collect()
}

/// Access requirement attached to a route rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No authentication required
    Public,
    /// Caller must hold the given authority
    RequireAuthority(&'static str),
}

/// Outcome of an access check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Unauthenticated,
    Forbidden { required_authority: &'static str },
}

/// A single route rule: method (None = any), Ant-style path pattern, access
#[derive(Debug, Clone)]
pub struct RouteRule {
    pub method: Option<Method>,
    pub pattern: &'static str,
    pub access: Access,
}

/// Ordered route policy, evaluated first-match
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rules: Vec<RouteRule>,
}

impl AccessPolicy {
    /// The catalog policy: reads and operational endpoints are public,
    /// everything else requires the employee role.
    pub fn catalog() -> Self {
        Self {
            rules: vec![
                RouteRule {
                    method: None,
                    pattern: "/actuator/**",
                    access: Access::Public,
                },
                RouteRule {
                    method: Some(Method::GET),
                    pattern: "/",
                    access: Access::Public,
                },
                RouteRule {
                    method: Some(Method::GET),
                    pattern: "/books/**",
                    access: Access::Public,
                },
                RouteRule {
                    method: None,
                    pattern: "/**",
                    access: Access::RequireAuthority("ROLE_employee"),
                },
            ],
        }
    }

    /// Decide access for a request. Pure: depends only on the route and the
    /// claims passed in.
    pub fn decide(
        &self,
        method: &Method,
        path: &str,
        claims: Option<&TokenClaims>,
    ) -> AccessDecision {
        for rule in &self.rules {
            let method_matches = rule.method.as_ref().map_or(true, |m| m == method);
            if method_matches && path_matches(rule.pattern, path) {
                return match rule.access {
                    Access::Public => AccessDecision::Allow,
                    Access::RequireAuthority(authority) => match claims {
                        None => AccessDecision::Unauthenticated,
                        Some(claims) if claims.authorities().iter().any(|a| a == authority) => {
                            AccessDecision::Allow
                        }
                        Some(_) => AccessDecision::Forbidden {
                            required_authority: authority,
                        },
                    },
                };
            }
        }
        // No rule matched: deny
        match claims {
            None => AccessDecision::Unauthenticated,
            Some(_) => AccessDecision::Forbidden {
                required_authority: "ROLE_employee",
            },
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::catalog()
    }
}

/// Ant-style pattern match: a trailing `/**` matches the prefix itself and
/// any subpath, anything else is an exact match.
fn path_matches(pattern: &str, path: &str) -> bool {
    if pattern == "/**" {
        return true;
    }
    if let Some(prefix) = pattern.strip_suffix("/**") {
        return path == prefix || path.starts_with(&format!("{}/", prefix));
    }
    pattern == path
}
