// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request-scoped authentication outcome.
//!
//! The auth gate builds exactly one [`RequestContext`] per request and stores
//! it in the request extensions. There is no way to change it afterwards.

use super::CurrentUser;

/// Identity resolved for the current request, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    current_user: Option<CurrentUser>,
}

impl RequestContext {
    /// Context for a request without a resolved identity.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Context for a request whose token resolved to `user`.
    pub fn authenticated(user: CurrentUser) -> Self {
        Self {
            current_user: Some(user),
        }
    }

    pub fn current_user(&self) -> Option<&CurrentUser> {
        self.current_user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }
}

/// Read the authenticated user from a request context.
///
/// Returns `None` for anonymous requests; never fails.
pub fn for_context(ctx: &RequestContext) -> Option<&CurrentUser> {
    ctx.current_user()
}
