//! `jawara-auth`: authorization boundary consumed by the forecasting core.
//!
//! Decoupled from HTTP and storage. The core only sees the [`RoleGate`]
//! predicates; role names and permission strings stay in this crate.

pub mod authorize;
pub mod claims;
pub mod jwt;
pub mod permissions;
pub mod principal;
pub mod roles;

pub use authorize::{authorize, standard_role_permissions, AuthzError, PermissionRoleGate, RoleGate};
pub use claims::{validate_claims, JwtClaims, TokenValidationError};
pub use jwt::{Hs256JwtValidator, JwtValidator};
pub use permissions::Permission;
pub use principal::{Principal, PrincipalId};
pub use roles::Role;
