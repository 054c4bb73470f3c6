//! Users, including the authenticated one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::common::{is_default, AvatarUrls};
use crate::collection::{Collection, Resource};
use crate::context::Context;
use crate::error::Result;
use crate::query::{ListOptions, Query, QueryOptions, QueryPairs};
use crate::response::Response;
use crate::time::Timestamp;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    #[serde(skip_serializing_if = "is_default")]
    pub id: u64,
    #[serde(skip_serializing_if = "is_default")]
    pub avatar_urls: AvatarUrls,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub capabilities: BTreeMap<String, serde_json::Value>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub email: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra_capabilities: BTreeMap<String, serde_json::Value>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub link: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub locale: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub nickname: String,
    /// Write-only.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub registered_date: Option<Timestamp>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub slug: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub url: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub username: String,
}

impl Resource for User {}

pub type Users = Collection<User>;

impl Collection<User> {
    /// The user the client authenticates as.
    pub async fn me<'q>(&self, ctx: &Context, query: impl Into<Query<'q>>) -> Result<(User, Response)> {
        self.client().get(ctx, &self.item_path("me"), query.into()).await
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserListOptions {
    pub roles: Vec<String>,
    pub slug: Vec<String>,
    /// `authors` limits the result to users who can author posts.
    pub who: String,
    pub list: ListOptions,
}

impl QueryOptions for UserListOptions {
    fn encode(&self, pairs: &mut QueryPairs) {
        pairs
            .texts("roles", &self.roles)
            .texts("slug", &self.slug)
            .text("who", &self.who);
        self.list.encode(pairs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::Client;
    use crate::query::DeleteParams;
    use crate::testing::FakeTransport;

    fn setup() -> (FakeTransport, Client) {
        let transport = FakeTransport::new();
        let client = Client::builder("https://example.com/")
            .transport(transport.clone())
            .basic_auth("admin", "secret")
            .build()
            .unwrap();
        (transport, client)
    }

    #[tokio::test]
    async fn me_targets_users_me() {
        let (transport, client) = setup();
        transport.respond(200, &[], r#"{"id":1,"name":"admin","avatar_urls":{"24":"https://example.com/a.png"}}"#);

        let (me, _) = client.users().me(&Context::background(), Query::None).await.unwrap();
        assert_eq!(me.name, "admin");
        assert_eq!(me.avatar_urls.size_24, "https://example.com/a.png");
        assert_eq!(transport.requests()[0].url.path(), "/wp-json/wp/v2/users/me");
    }

    #[tokio::test]
    async fn forced_user_delete_carries_reassign() {
        let (transport, client) = setup();
        transport.respond(200, &[], r#"{"deleted":true,"previous":{"id":9,"username":"gone"}}"#);

        let params = DeleteParams {
            force: true,
            reassign: 1,
        };
        let (user, _) = client.users().delete(&Context::background(), 9, &params).await.unwrap();
        assert_eq!(user.username, "gone");
        assert_eq!(transport.requests()[0].url.query(), Some("force=true&reassign=1"));
    }
}
