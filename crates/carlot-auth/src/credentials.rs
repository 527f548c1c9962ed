/// Credentials presented with a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
    Bearer(String),
    Anonymous,
}

impl Credentials {
    /// Parse an `Authorization` header value.
    ///
    /// Only the `Bearer <token>` form yields a credential. A missing header,
    /// another scheme, or an empty token are all treated as anonymous.
    pub fn from_authorization(header: Option<&str>) -> Self {
        header
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| Self::Bearer(token.to_string()))
            .unwrap_or(Self::Anonymous)
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }

    /// Render as an `Authorization` header value.
    pub fn to_header_value(&self) -> Option<String> {
        match self {
            Self::Bearer(token) => Some(format!("Bearer {token}")),
            Self::Anonymous => None,
        }
    }
}
