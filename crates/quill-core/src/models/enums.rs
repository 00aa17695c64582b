use serde::{Deserialize, Serialize};

/// Account tier. Staff and superuser flags plus the post permissions are
/// derived from this on every save path.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Moderator,
    #[default]
    NonAdmin,
}

#[derive(Debug)]
pub struct EnumParseError {
    enum_name: &'static str,
    value: String,
}

impl EnumParseError {
    fn new(enum_name: &'static str, value: impl Into<String>) -> Self {
        Self {
            enum_name,
            value: value.into(),
        }
    }
}

impl std::fmt::Display for EnumParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid {} value: {}", self.enum_name, self.value)
    }
}

impl std::error::Error for EnumParseError {}

impl Role {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Moderator => "MODERATOR",
            Self::NonAdmin => "NON_ADMIN",
        }
    }

    /// Admin and Moderator accounts may enter the administrative interface.
    #[must_use]
    pub const fn is_staff_role(&self) -> bool {
        matches!(self, Self::Admin | Self::Moderator)
    }
}

impl std::str::FromStr for Role {
    type Err = EnumParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "ADMIN" => Ok(Self::Admin),
            "MODERATOR" => Ok(Self::Moderator),
            "NON_ADMIN" => Ok(Self::NonAdmin),
            _ => Err(EnumParseError::new("role", value)),
        }
    }
}
