// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Establishes *who* is making a request. Authorization decisions are left to
//! resolvers.
//!
//! ## Auth Flow
//!
//! 1. Client sends `Authorization: <JWT>` (the whole header value is the token)
//! 2. The gate verifies the token signature and expiry
//! 3. The token's `username` claim is resolved to a stored user ID
//! 4. `{id, username}` is attached to the request as a [`RequestContext`]
//! 5. Resolvers read it with [`for_context`]
//!
//! ## Policy
//!
//! - Missing header → anonymous request
//! - Invalid token → `403 Forbidden`, request stops
//! - Valid token for an unknown (or unreachable) user → anonymous request
//!
//! ## Security
//!
//! - Passwords are stored as bcrypt hashes with a fixed cost
//! - The password secret never leaves [`users`] and [`password`]
//! - Clock skew tolerance is 60 seconds

pub mod claims;
pub mod context;
pub mod error;
pub mod extractor;
pub mod middleware;
pub mod password;
pub mod token;
pub mod users;

pub use claims::{CurrentUser, TokenClaims};
pub use context::{for_context, RequestContext};
pub use error::AuthError;
pub use middleware::auth_gate;
pub use token::{JwtVerifier, TokenVerifier};
pub use users::{UserError, UserRepository, USERNAME_FIELD, USER_COLLECTION};
