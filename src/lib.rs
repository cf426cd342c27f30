// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Contact Server - GraphQL API with bearer-token authentication
//!
//! Every GraphQL request passes through an auth gate that verifies the token
//! in the `Authorization` header, resolves its subject to a stored user and
//! hands `{id, username}` to resolvers through a request context.
//!
//! ## Modules
//!
//! - `api` - HTTP routes and GraphQL schema (Axum, async-graphql)
//! - `auth` - Token verification, password hashing, user lookup, auth gate
//! - `storage` - Document store (redb or in-memory)

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod state;
pub mod storage;
