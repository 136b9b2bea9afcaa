use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are opaque strings (e.g. "forecast.read"). The wildcard `"*"`
/// lets a policy grant everything without enumerating capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    /// Create forecast runs.
    pub const FORECAST_GENERATE: Permission = Permission::from_static("forecast.generate");
    /// Rename, delete and reset stored projects.
    pub const FORECAST_MANAGE: Permission = Permission::from_static("forecast.manage");
    /// List and read projects, read the latest run.
    pub const FORECAST_READ: Permission = Permission::from_static("forecast.read");
    /// Record sales into the reference ledger.
    pub const SALES_WRITE: Permission = Permission::from_static("sales.write");
    pub const WILDCARD: Permission = Permission::from_static("*");

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == "*"
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
