use subtle::ConstantTimeEq;

/// Constant-time string comparison to prevent timing attacks
/// Use this for comparing API keys and other sensitive values
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Why an admin request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// The server has no admin key, so the admin API is closed
    NotConfigured,
    /// No `Authorization: Bearer ...` header was sent
    MissingToken,
    /// A token was sent but does not match
    InvalidToken,
}

impl AuthFailure {
    pub fn message(&self) -> &'static str {
        match self {
            AuthFailure::NotConfigured => "Admin API is disabled: ADMIN_API_KEY is not configured",
            AuthFailure::MissingToken => "Missing Authorization header. Expected: Bearer <key>",
            AuthFailure::InvalidToken => "Invalid admin API key",
        }
    }
}

/// Check an `Authorization` header value against the configured admin key.
pub fn verify_admin_key(configured: Option<&str>, header: Option<&str>) -> Result<(), AuthFailure> {
    let expected = configured.ok_or(AuthFailure::NotConfigured)?;
    let token = header
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthFailure::MissingToken)?;

    if constant_time_compare(token, expected) {
        Ok(())
    } else {
        Err(AuthFailure::InvalidToken)
    }
}
