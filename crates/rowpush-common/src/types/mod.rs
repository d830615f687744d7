//! Common types used across rowpush

use serde::{Deserialize, Serialize};

/// Default connection target for [`ServerVariant::Default`]
pub const DEFAULT_SERVER_URL: &str = "postgres://localhost:5432";

/// Default connection target for [`ServerVariant::Express`]
pub const EXPRESS_SERVER_URL: &str = "postgres://localhost:5433";

/// Which database server instance rows are read from.
///
/// A workstation usually runs either the full server or a lightweight
/// "express" instance next to it; each maps to a different connection target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ServerVariant {
    #[default]
    Default,
    Express,
}

impl ServerVariant {
    /// All variants, in the order they are probed by connection checks
    pub const ALL: [ServerVariant; 2] = [ServerVariant::Default, ServerVariant::Express];

    /// Built-in connection target (without a database path)
    pub fn default_base_url(self) -> &'static str {
        match self {
            ServerVariant::Default => DEFAULT_SERVER_URL,
            ServerVariant::Express => EXPRESS_SERVER_URL,
        }
    }
}

impl std::str::FromStr for ServerVariant {
    type Err = crate::SyncError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "default" | "localhost" => Ok(ServerVariant::Default),
            "express" | "sqlexpress" => Ok(ServerVariant::Express),
            other => Err(crate::SyncError::invalid_configuration(format!(
                "unknown server variant '{}', expected 'default' or 'express'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ServerVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerVariant::Default => write!(f, "default"),
            ServerVariant::Express => write!(f, "express"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_server_variant_from_str() {
        assert_eq!("default".parse::<ServerVariant>().unwrap(), ServerVariant::Default);
        assert_eq!("EXPRESS".parse::<ServerVariant>().unwrap(), ServerVariant::Express);
        assert_eq!(" sqlexpress\n".parse::<ServerVariant>().unwrap(), ServerVariant::Express);
        assert!("cluster".parse::<ServerVariant>().is_err());
    }

    #[test]
    fn test_server_variant_display_roundtrips() {
        for variant in ServerVariant::ALL {
            assert_eq!(variant.to_string().parse::<ServerVariant>().unwrap(), variant);
        }
    }

    #[test]
    fn test_variants_have_distinct_targets() {
        assert_ne!(
            ServerVariant::Default.default_base_url(),
            ServerVariant::Express.default_base_url()
        );
    }
}
