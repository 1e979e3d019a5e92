//! Identity carried by the access token

use crate::error::{CoreError, CoreResult};
use jsonwebtoken::{DecodingKey, Validation, decode, decode_header};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Role granted by the backend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Guest,
    HotelManager,
    Other(String),
}

impl Role {
    /// Parse a single role name such as `HOTEL_MANAGER`
    pub fn parse(raw: &str) -> Option<Self> {
        let name = raw.trim().trim_start_matches("ROLE_");
        match name {
            "" => None,
            "GUEST" => Some(Self::Guest),
            "HOTEL_MANAGER" => Some(Self::HotelManager),
            other => Some(Self::Other(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Guest => "GUEST",
            Self::HotelManager => "HOTEL_MANAGER",
            Self::Other(name) => name,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `roles` claim arrives either as a list or as a stringified list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
enum RolesClaim {
    List(Vec<String>),
    Text(String),
    #[default]
    Missing,
}

impl RolesClaim {
    fn primary(&self) -> Option<Role> {
        match self {
            Self::List(roles) => roles.first().and_then(|role| Role::parse(role)),
            Self::Text(text) => {
                let stripped: String = text.chars().filter(|c| *c != '[' && *c != ']').collect();
                // "[GUEST, HOTEL_MANAGER]" keeps the first entry
                stripped.split(',').next().and_then(Role::parse)
            }
            Self::Missing => None,
        }
    }
}

fn roles_claim<'de, D>(deserializer: D) -> Result<RolesClaim, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<RolesClaim>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Deserialize)]
struct AccessClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, deserialize_with = "roles_claim")]
    roles: RolesClaim,
    #[serde(default)]
    iat: Option<i64>,
    #[serde(default)]
    exp: Option<i64>,
}

/// Decoded current user, persisted under the `user` storage key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Subject claim, the backend's user id
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub role: Option<Role>,
    pub issued_at: Option<i64>,
    pub expires_at: Option<i64>,
}

impl SessionUser {
    pub fn is_manager(&self) -> bool {
        self.role == Some(Role::HotelManager)
    }

    /// Whether the token this identity came from has expired at `now` (unix seconds)
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|exp| now >= exp)
    }

    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or(&self.sub)
    }
}

/// Read the claims of an access token without checking its signature.
///
/// The backend verifies every request; the client only needs the identity
/// to pick a landing page and show who is logged in.
pub fn decode_access_token(token: &str) -> CoreResult<SessionUser> {
    let header = decode_header(token).map_err(|e| CoreError::invalid_token(e.to_string()))?;

    let mut validation = Validation::new(header.alg);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims = HashSet::new();

    let data = decode::<AccessClaims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|e| CoreError::invalid_token(e.to_string()))?;
    let claims = data.claims;

    Ok(SessionUser {
        role: claims.roles.primary(),
        sub: claims.sub,
        email: claims.email,
        name: claims.name,
        issued_at: claims.iat,
        expires_at: claims.exp,
    })
}
