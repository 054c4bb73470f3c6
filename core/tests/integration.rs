//! End-to-end tests against the live mock server.
//!
//! # Design
//! Each test starts the mock server on a random port and talks to it through
//! the default reqwest transport, so request building, the method override,
//! multipart encoding and response decoding are checked over real HTTP.

use mock_server::{PASSWORD, TOKEN, USERNAME};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use wp_core::resources::{MediaUploadOptions, Post, PostListOptions, RenderedString, Settings};
use wp_core::{discover, Client, Context, DeleteParams, Error, ListOptions, Query, ReqwestTransport};

async fn start() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));
    format!("http://{addr}/")
}

fn admin(base: &str) -> Client {
    Client::builder(base).basic_auth(USERNAME, PASSWORD).build().unwrap()
}

fn api_status(err: &Error) -> (u16, String) {
    let api = err.api().unwrap_or_else(|| panic!("expected an api error, got {err:?}"));
    (api.status(), api.code().to_string())
}

#[tokio::test]
async fn discovery_finds_the_base_url() {
    let base = start().await;
    let ctx = Context::background();
    let transport = ReqwestTransport::new(None, false).unwrap();

    let found = discover(&ctx, &transport, &base).await.unwrap();
    assert_eq!(found.base_url.as_str(), base);
    assert_eq!(found.api_root.as_str(), format!("{base}wp-json/"));

    let client = Client::new(found.base_url.as_str()).unwrap();
    let (info, response) = client.root_info(&ctx).await.unwrap();
    assert_eq!(response.status, 200);
    assert!(info.namespaces.iter().any(|ns| ns == "wp/v2"));
    assert_eq!(info.location().unwrap().local_minus_utc(), 0);
}

#[tokio::test]
async fn post_lifecycle() {
    let base = start().await;
    let client = admin(&base);
    let posts = client.posts();
    let ctx = Context::background();

    // create
    let draft = Post {
        title: RenderedString::raw("Integration"),
        content: RenderedString::raw("Body"),
        status: "publish".to_string(),
        ..Post::default()
    };
    let (created, response) = posts.create(&ctx, &draft).await.unwrap();
    assert_eq!(response.status, 201);
    assert_eq!(created.title.raw, "Integration");
    assert!(created.date.is_some());
    assert_eq!(created.modified_gmt.unwrap().as_datetime().offset().local_minus_utc(), 0);
    let id = created.id;

    // list one per page: the seeded post and ours
    let options = PostListOptions {
        list: ListOptions {
            per_page: 1,
            ..ListOptions::default()
        },
        ..PostListOptions::default()
    };
    let (listed, response) = posts.list(&ctx, &options).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, id);
    assert_eq!(response.total_records(), 2);
    assert_eq!(response.total_pages(), 2);
    assert_eq!(response.next_page(), 2);

    // populate an id-only entity
    let (fetched, _) = posts.entity(id).populate(&ctx, Query::None).await.unwrap();
    assert_eq!(fetched.content.rendered, "<p>Body</p>\n");

    // partial update leaves other fields alone
    let change = Post {
        content: RenderedString::raw("Edited"),
        ..Post::default()
    };
    let (updated, _) = posts.update(&ctx, id, &change).await.unwrap();
    assert_eq!(updated.title.raw, "Integration");
    assert_eq!(updated.content.raw, "Edited");

    // the update left a revision behind
    let revisions = updated.revisions().unwrap();
    let (history, _) = revisions.list(&ctx, Query::None).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].parent, id);
    assert_eq!(history[0].content.raw, "Body");
    let (removed, _) = revisions.delete(&ctx, history[0].id).await.unwrap();
    assert_eq!(removed.id, history[0].id);

    // trash, then trash again
    let (trashed, _) = posts.delete(&ctx, id, &DeleteParams::default()).await.unwrap();
    assert_eq!(trashed.status, "trash");
    let err = posts.delete(&ctx, id, &DeleteParams::default()).await.unwrap_err();
    assert_eq!(api_status(&err), (410, "rest_already_trashed".to_string()));

    // forced delete hands back the previous entity
    let (previous, _) = posts.delete(&ctx, id, &DeleteParams::force()).await.unwrap();
    assert_eq!(previous.id, id);
    assert_eq!(previous.status, "trash");

    let err = posts.get(&ctx, id, Query::None).await.unwrap_err();
    assert_eq!(api_status(&err), (404, "rest_post_invalid_id".to_string()));
    assert_eq!(err.response().unwrap().status, 404);
}

#[tokio::test]
async fn writes_need_credentials() {
    let base = start().await;
    let ctx = Context::background();
    let post = Post {
        title: RenderedString::raw("Anonymous"),
        ..Post::default()
    };

    let err = Client::new(&base).unwrap().posts().create(&ctx, &post).await.unwrap_err();
    assert_eq!(api_status(&err), (401, "rest_forbidden".to_string()));

    let bearer = Client::builder(&base).bearer_token(TOKEN).build().unwrap();
    let (created, _) = bearer.posts().create(&ctx, &post).await.unwrap();
    assert_eq!(created.status, "draft");
}

#[tokio::test]
async fn paging_past_the_end_is_an_api_error() {
    let base = start().await;
    let options = PostListOptions {
        list: ListOptions {
            page: 9,
            ..ListOptions::default()
        },
        ..PostListOptions::default()
    };

    let err = admin(&base)
        .posts()
        .list(&Context::background(), &options)
        .await
        .unwrap_err();
    assert_eq!(api_status(&err), (400, "rest_post_invalid_page_number".to_string()));
    assert!(err.response().unwrap().url.as_str().contains("page=9"));
}

#[tokio::test]
async fn upload_media() {
    let base = start().await;
    let file = MediaUploadOptions {
        filename: "cat.png".to_string(),
        content_type: "image/png".to_string(),
        data: b"PNGDATA".to_vec(),
    };

    let (media, response) = admin(&base).media().upload(&Context::background(), &file).await.unwrap();
    assert_eq!(response.status, 201);
    assert_eq!(media.media_type, "image");
    assert_eq!(media.mime_type, "image/png");
    assert_eq!(media.title.raw, "cat");
    assert!(media.source_url.ends_with("/cat.png"));
}

#[tokio::test]
async fn current_user_and_settings() {
    let base = start().await;
    let client = admin(&base);
    let ctx = Context::background();

    let (me, _) = client.users().me(&ctx, Query::None).await.unwrap();
    assert_eq!(me.slug, "admin");
    assert_eq!(me.avatar_urls.size_24, "http://localhost/avatar-24.png");

    let change = Settings {
        title: "Renamed".to_string(),
        ..Settings::default()
    };
    let (settings, _) = client.settings().update(&ctx, &change).await.unwrap();
    assert_eq!(settings.title, "Renamed");
    assert_eq!(settings.posts_per_page, 10);

    let (again, _) = client.settings().get(&ctx).await.unwrap();
    assert_eq!(again, settings);
}

#[tokio::test]
async fn statuses_catalog() {
    let base = start().await;
    let client = Client::new(&base).unwrap();
    let ctx = Context::background();

    let (statuses, _) = client.statuses().list(&ctx, Query::None).await.unwrap();
    assert!(statuses.contains_key("publish"));
    assert!(statuses["private"].private);

    let (draft, _) = client.statuses().get(&ctx, "draft", Query::None).await.unwrap();
    assert_eq!(draft.name, "Draft");
}

#[tokio::test]
async fn cancelled_context_stops_the_request() {
    let base = start().await;
    let token = CancellationToken::new();
    token.cancel();

    let err = admin(&base)
        .posts()
        .list(&Context::with_token(token), Query::None)
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Cancelled));
}
