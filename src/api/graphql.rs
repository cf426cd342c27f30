// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! GraphQL schema and HTTP handlers.
//!
//! The request context resolved by the auth gate is attached to every
//! GraphQL request via `.data()`. Resolvers read it with [`current_user`].
//!
//! Requests arrive either as a JSON POST body or as GET query parameters
//! (`query`, `operationName`, `variables`, `extensions`). Both accept Apollo
//! automatic persisted queries, so a client may send only the query hash
//! once the full text has been seen.

use async_graphql::{
    extensions::apollo_persisted_queries::{ApolloPersistedQueries, LruCacheStorage},
    http::{parse_query_string, GraphiQLSource},
    Context, EmptySubscription, ErrorExtensions, InputObject, Object, Schema, SimpleObject, ID,
};
use axum::{
    extract::{RawQuery, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};

use crate::auth::{for_context, CurrentUser, RequestContext, UserRepository};
use crate::error::ApiError;
use crate::state::AppState;

/// Path the GraphQL endpoint is mounted on.
pub const GRAPHQL_PATH: &str = "/query";

const MAX_QUERY_DEPTH: usize = 16;

/// Number of persisted query texts kept by hash.
const PERSISTED_QUERY_CACHE_SIZE: usize = 100;

pub type ContactSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Authenticated identity as seen by GraphQL clients.
#[derive(Debug, Clone, PartialEq, Eq, SimpleObject)]
#[graphql(name = "User")]
pub struct UserObject {
    pub id: ID,
    pub username: String,
}

impl From<&CurrentUser> for UserObject {
    fn from(user: &CurrentUser) -> Self {
        Self {
            id: ID(user.id.clone()),
            username: user.username.clone(),
        }
    }
}

#[derive(Debug, InputObject)]
pub struct NewUser {
    pub username: String,
    pub password: String,
}

/// Identity attached to the current GraphQL request, if any.
pub fn current_user<'a>(ctx: &'a Context<'_>) -> Option<&'a CurrentUser> {
    ctx.data_opt::<RequestContext>().and_then(for_context)
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// The authenticated user, or null for anonymous requests.
    async fn me(&self, ctx: &Context<'_>) -> Option<UserObject> {
        current_user(ctx).map(UserObject::from)
    }
}

pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Register a new account and return its ID.
    async fn create_user(&self, ctx: &Context<'_>, input: NewUser) -> async_graphql::Result<ID> {
        if input.username.trim().is_empty() || input.password.is_empty() {
            return Err(ApiError::bad_request("username and password are required").extend());
        }
        let users = ctx.data::<UserRepository>()?;
        let id = users
            .create_user(&input.username, &input.password)
            .await
            .map_err(|e| ApiError::from(e).extend())?;
        Ok(ID(id))
    }

    /// Check a username/password pair without issuing anything.
    async fn check_credentials(
        &self,
        ctx: &Context<'_>,
        username: String,
        password: String,
    ) -> async_graphql::Result<bool> {
        let users = ctx.data::<UserRepository>()?;
        users
            .authenticate(&username, &password)
            .await
            .map_err(|e| ApiError::from(e).extend())
    }
}

pub fn build_schema(users: UserRepository) -> ContactSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(users)
        .extension(ApolloPersistedQueries::new(LruCacheStorage::new(
            PERSISTED_QUERY_CACHE_SIZE,
        )))
        .limit_depth(MAX_QUERY_DEPTH)
        .finish()
}

async fn execute(
    state: &AppState,
    ctx: RequestContext,
    request: async_graphql::Request,
) -> async_graphql::Response {
    tracing::debug!(
        authenticated = ctx.is_authenticated(),
        operation = request.operation_name.as_deref().unwrap_or_default(),
        "executing graphql request"
    );
    state.schema.execute(request.data(ctx)).await
}

/// Execute a GraphQL request with the caller's request context.
pub async fn graphql_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
    Json(request): Json<async_graphql::Request>,
) -> Json<async_graphql::Response> {
    Json(execute(&state, ctx, request).await)
}

/// Execute a GraphQL request carried in the URL query string.
pub async fn graphql_get_handler(
    State(state): State<AppState>,
    ctx: RequestContext,
    RawQuery(query): RawQuery,
) -> Response {
    match parse_query_string(query.as_deref().unwrap_or_default()) {
        Ok(request) => Json(execute(&state, ctx, request).await).into_response(),
        Err(e) => (StatusCode::BAD_REQUEST, e.to_string()).into_response(),
    }
}

/// GraphiQL page for manual exploration.
pub async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish())
}
