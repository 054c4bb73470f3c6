//! In-memory emulation of the WordPress REST API subset the client exercises.
//!
//! Posts and pages share one store and one set of handlers. Writes need
//! `Authorization` with [`USERNAME`]/[`PASSWORD`] (Basic) or [`TOKEN`]
//! (Bearer). `POST` to an item honours `X-HTTP-Method-Override`.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    body::Bytes,
    extract::{Multipart, Path, Query, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};

pub const USERNAME: &str = "admin";
pub const PASSWORD: &str = "secret";
pub const TOKEN: &str = "mock-token";

/// `Basic base64(admin:secret)`.
const BASIC_CREDENTIALS: &str = "Basic YWRtaW46c2VjcmV0";
const METHOD_OVERRIDE: &str = "x-http-method-override";
const NAIVE: &str = "%Y-%m-%dT%H:%M:%S";
const MAX_PER_PAGE: u64 = 100;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rendered {
    #[serde(default)]
    pub raw: String,
    #[serde(default)]
    pub rendered: String,
}

/// A post or a page.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,
    pub date: String,
    pub date_gmt: String,
    pub modified: String,
    /// Zoned on purpose: sites mix both layouts.
    pub modified_gmt: String,
    pub slug: String,
    pub status: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub link: String,
    pub author: u64,
    pub title: Rendered,
    pub content: Rendered,
    pub excerpt: Rendered,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<u64>,
    #[serde(default)]
    pub parent: u64,
    #[serde(default)]
    pub menu_order: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Revision {
    pub id: u64,
    pub parent: u64,
    pub author: u64,
    pub date: String,
    pub date_gmt: String,
    pub modified: String,
    pub modified_gmt: String,
    pub slug: String,
    pub title: Rendered,
    pub content: Rendered,
    pub excerpt: Rendered,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Media {
    pub id: u64,
    pub date: String,
    pub slug: String,
    pub status: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: Rendered,
    pub author: u64,
    pub media_type: String,
    pub mime_type: String,
    pub source_url: String,
    pub media_details: Value,
}

/// Text fields accept a plain string or `{"raw": ...}`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum TextInput {
    Plain(String),
    Object {
        #[serde(default)]
        raw: String,
    },
}

impl TextInput {
    fn into_raw(self) -> String {
        match self {
            TextInput::Plain(raw) | TextInput::Object { raw } => raw,
        }
    }
}

/// Writable fields of a post or page. Missing fields keep their value.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ItemInput {
    pub title: Option<TextInput>,
    pub content: Option<TextInput>,
    pub excerpt: Option<TextInput>,
    pub status: Option<String>,
    pub slug: Option<String>,
    pub author: Option<u64>,
    pub categories: Option<Vec<u64>>,
    pub tags: Option<Vec<u64>>,
    pub parent: Option<u64>,
    pub menu_order: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub status: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteQuery {
    pub force: Option<String>,
}

impl DeleteQuery {
    fn forced(&self) -> bool {
        matches!(self.force.as_deref(), Some("true" | "1"))
    }
}

#[derive(Debug)]
pub struct Site {
    items: BTreeMap<u64, Item>,
    revisions: BTreeMap<u64, Revision>,
    media: BTreeMap<u64, Media>,
    settings: Map<String, Value>,
    next_id: u64,
}

impl Site {
    /// A fresh install: one published post and one published page.
    pub fn seeded() -> Self {
        let mut site = Self {
            items: BTreeMap::new(),
            revisions: BTreeMap::new(),
            media: BTreeMap::new(),
            settings: default_settings(),
            next_id: 1,
        };
        let post = site.new_item("post", publish("Hello world!", "Welcome to WordPress."));
        site.items.insert(post.id, post);
        let page = site.new_item("page", publish("Sample Page", "This is an example page."));
        site.items.insert(page.id, page);
        site
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn new_item(&mut self, kind: &str, input: ItemInput) -> Item {
        let id = self.allocate_id();
        let now = now();
        let mut item = Item {
            id,
            date: now.clone(),
            date_gmt: now.clone(),
            modified: now.clone(),
            modified_gmt: format!("{now}+00:00"),
            slug: String::new(),
            status: "draft".to_string(),
            kind: kind.to_string(),
            link: format!("http://localhost/?p={id}"),
            author: 1,
            title: Rendered::default(),
            content: Rendered::default(),
            excerpt: Rendered::default(),
            categories: Vec::new(),
            tags: Vec::new(),
            parent: 0,
            menu_order: 0,
        };
        apply(&mut item, input);
        if item.slug.is_empty() {
            item.slug = slugify(&item.title.raw, id);
        }
        item
    }
}

fn publish(title: &str, content: &str) -> ItemInput {
    ItemInput {
        title: Some(TextInput::Plain(title.to_string())),
        content: Some(TextInput::Plain(content.to_string())),
        status: Some("publish".to_string()),
        ..ItemInput::default()
    }
}

fn default_settings() -> Map<String, Value> {
    let Value::Object(settings) = json!({
        "title": "Mock Site",
        "description": "Just another WordPress site",
        "url": "http://localhost",
        "email": "admin@example.com",
        "timezone": "",
        "date_format": "F j, Y",
        "time_format": "g:i a",
        "start_of_week": 1,
        "language": "en_US",
        "use_smilies": true,
        "default_category": 1,
        "default_post_format": "0",
        "posts_per_page": 10,
        "default_ping_status": "open",
        "default_comment_status": "open"
    }) else {
        return Map::new();
    };
    settings
}

pub type Db = Arc<RwLock<Site>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Site::seeded()));
    Router::new()
        .route("/", get(home))
        .route("/wp-json", get(root_info))
        .route("/wp-json/", get(root_info))
        .route("/wp-json/wp/v2/media", get(list_media).post(upload_media))
        .route("/wp-json/wp/v2/media/{id}", get(get_media))
        .route("/wp-json/wp/v2/users/me", get(me))
        .route("/wp-json/wp/v2/settings", get(get_settings).post(write_settings).put(write_settings))
        .route("/wp-json/wp/v2/statuses", get(list_statuses))
        .route("/wp-json/wp/v2/statuses/{slug}", get(get_status))
        .route("/wp-json/wp/v2/{collection}", get(list_items).post(create_item))
        .route(
            "/wp-json/wp/v2/{collection}/{id}",
            get(get_item).post(write_item).put(write_item).delete(write_item),
        )
        .route("/wp-json/wp/v2/{collection}/{id}/revisions", get(list_revisions))
        .route(
            "/wp-json/wp/v2/{collection}/{id}/revisions/{revision}",
            get(get_revision).post(write_revision).delete(write_revision),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "mock wordpress listening");
    }
    axum::serve(listener, app()).await
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error body in the API's `{code, message, data}` shape.
#[derive(Debug)]
pub struct WpError {
    status: StatusCode,
    code: &'static str,
    message: String,
    params: Option<Value>,
}

impl WpError {
    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            params: None,
        }
    }

    fn invalid_param(name: &str, reason: &str) -> Self {
        Self {
            params: Some(json!({ name: reason })),
            ..Self::new(
                StatusCode::BAD_REQUEST,
                "rest_invalid_param",
                format!("Invalid parameter(s): {name}"),
            )
        }
    }

    fn not_found(kind: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, "rest_post_invalid_id", format!("Invalid {kind} ID."))
    }

    fn no_route() -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "rest_no_route",
            "No route was found matching the URL and request method.",
        )
    }
}

impl IntoResponse for WpError {
    fn into_response(self) -> Response {
        let mut data = json!({ "status": self.status.as_u16() });
        if let Some(params) = self.params {
            data["params"] = params;
        }
        let body = json!({ "code": self.code, "message": self.message, "data": data });
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn now() -> String {
    Utc::now().naive_utc().format(NAIVE).to_string()
}

fn slugify(title: &str, id: u64) -> String {
    let slug: String = title
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        id.to_string()
    } else {
        slug
    }
}

fn render(raw: String, paragraph: bool) -> Rendered {
    let rendered = if paragraph && !raw.is_empty() {
        format!("<p>{raw}</p>\n")
    } else {
        raw.clone()
    };
    Rendered { raw, rendered }
}

fn apply(item: &mut Item, input: ItemInput) {
    if let Some(title) = input.title {
        item.title = render(title.into_raw(), false);
    }
    if let Some(content) = input.content {
        item.content = render(content.into_raw(), true);
    }
    if let Some(excerpt) = input.excerpt {
        item.excerpt = render(excerpt.into_raw(), true);
    }
    if let Some(status) = input.status {
        item.status = status;
    }
    if let Some(slug) = input.slug {
        item.slug = slug;
    }
    if let Some(author) = input.author {
        item.author = author;
    }
    if let Some(categories) = input.categories {
        item.categories = categories;
    }
    if let Some(tags) = input.tags {
        item.tags = tags;
    }
    if let Some(parent) = input.parent {
        item.parent = parent;
    }
    if let Some(menu_order) = input.menu_order {
        item.menu_order = menu_order;
    }
}

fn kind_of(collection: &str) -> Result<&'static str, WpError> {
    match collection {
        "posts" => Ok("post"),
        "pages" => Ok("page"),
        _ => Err(WpError::no_route()),
    }
}

fn authorize(headers: &HeaderMap) -> Result<(), WpError> {
    let credentials = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if credentials == BASIC_CREDENTIALS || credentials.strip_prefix("Bearer ") == Some(TOKEN) {
        return Ok(());
    }
    debug!(credentials_present = !credentials.is_empty(), "rejected request");
    Err(WpError::new(
        StatusCode::UNAUTHORIZED,
        "rest_forbidden",
        "Sorry, you are not allowed to do that.",
    ))
}

/// The verb a request stands for, honouring the override header on `POST`.
fn effective_method(method: &Method, headers: &HeaderMap) -> String {
    if *method == Method::POST {
        if let Some(name) = headers.get(METHOD_OVERRIDE).and_then(|v| v.to_str().ok()) {
            return name.to_ascii_uppercase();
        }
    }
    method.as_str().to_string()
}

fn paginate<T: Clone>(all: Vec<T>, query: &ListQuery) -> Result<([(&'static str, String); 2], Vec<T>), WpError> {
    let per_page = query.per_page.unwrap_or(10);
    if per_page == 0 || per_page > MAX_PER_PAGE {
        return Err(WpError::invalid_param(
            "per_page",
            "per_page must be between 1 (inclusive) and 100 (inclusive)",
        ));
    }
    let page = query.page.unwrap_or(1).max(1);
    let total = all.len() as u64;
    let pages = total.div_ceil(per_page);
    if page > 1 && page > pages {
        return Err(WpError::new(
            StatusCode::BAD_REQUEST,
            "rest_post_invalid_page_number",
            "The page number requested is larger than the number of pages available.",
        ));
    }

    let start = ((page - 1) * per_page) as usize;
    let slice = all.into_iter().skip(start).take(per_page as usize).collect();
    Ok(([("X-WP-Total", total.to_string()), ("X-WP-TotalPages", pages.to_string())], slice))
}

// ---------------------------------------------------------------------------
// Root and discovery
// ---------------------------------------------------------------------------

async fn home(headers: HeaderMap) -> impl IntoResponse {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    let link = format!("<http://{host}/wp-json/>; rel=\"https://api.w.org/\"");
    ([(header::LINK, link)], "<html><body>Mock Site</body></html>")
}

async fn root_info(headers: HeaderMap) -> Json<Value> {
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    Json(json!({
        "name": "Mock Site",
        "description": "Just another WordPress site",
        "url": format!("http://{host}"),
        "home": format!("http://{host}"),
        "gmt_offset": "0",
        "timezone_string": "",
        "namespaces": ["oembed/1.0", "wp/v2"],
        "authentication": {},
        "permalink_structure": "/%postname%/"
    }))
}

// ---------------------------------------------------------------------------
// Posts and pages
// ---------------------------------------------------------------------------

async fn list_items(
    State(db): State<Db>,
    Path(collection): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, WpError> {
    let kind = kind_of(&collection)?;
    let status = query.status.clone().unwrap_or_else(|| "publish".to_string());
    let search = query.search.clone().unwrap_or_default().to_lowercase();

    let site = db.read().await;
    let matching: Vec<Item> = site
        .items
        .values()
        .rev()
        .filter(|item| item.kind == kind && (status == "any" || item.status == status))
        .filter(|item| search.is_empty() || item.title.raw.to_lowercase().contains(&search))
        .cloned()
        .collect();
    let (headers, page) = paginate(matching, &query)?;
    Ok((headers, Json(page)))
}

async fn create_item(
    State(db): State<Db>,
    Path(collection): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, WpError> {
    let kind = kind_of(&collection)?;
    authorize(&headers)?;
    let input = parse_input(&body)?;

    let mut site = db.write().await;
    let item = site.new_item(kind, input);
    site.items.insert(item.id, item.clone());
    info!(id = item.id, kind, "created");
    Ok((StatusCode::CREATED, Json(item)))
}

async fn get_item(
    State(db): State<Db>,
    Path((collection, id)): Path<(String, u64)>,
) -> Result<Json<Item>, WpError> {
    let kind = kind_of(&collection)?;
    let site = db.read().await;
    site.items
        .get(&id)
        .filter(|item| item.kind == kind)
        .cloned()
        .map(Json)
        .ok_or_else(|| WpError::not_found(kind))
}

async fn write_item(
    State(db): State<Db>,
    Path((collection, id)): Path<(String, u64)>,
    Query(params): Query<DeleteQuery>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, WpError> {
    let kind = kind_of(&collection)?;
    authorize(&headers)?;
    let verb = effective_method(&method, &headers);

    let mut site = db.write().await;
    let site = &mut *site;
    let current = site
        .items
        .get(&id)
        .filter(|item| item.kind == kind)
        .cloned()
        .ok_or_else(|| WpError::not_found(kind))?;

    match verb.as_str() {
        "DELETE" if params.forced() => {
            site.items.remove(&id);
            site.revisions.retain(|_, revision| revision.parent != id);
            info!(id, kind, "deleted");
            Ok(Json(json!({ "deleted": true, "previous": current })))
        }
        "DELETE" => {
            if current.status == "trash" {
                return Err(WpError::new(
                    StatusCode::GONE,
                    "rest_already_trashed",
                    format!("The {kind} has already been deleted."),
                ));
            }
            let item = site.items.get_mut(&id).ok_or_else(|| WpError::not_found(kind))?;
            item.status = "trash".to_string();
            info!(id, kind, "trashed");
            Ok(Json(json!(item)))
        }
        "POST" | "PUT" | "PATCH" => {
            let input = parse_input(&body)?;
            let revision_id = site.allocate_id();
            let revision = Revision {
                id: revision_id,
                parent: id,
                author: current.author,
                date: current.modified.clone(),
                date_gmt: current.modified.clone(),
                modified: current.modified.clone(),
                modified_gmt: current.modified.clone(),
                slug: format!("{id}-revision-v1"),
                title: current.title.clone(),
                content: current.content.clone(),
                excerpt: current.excerpt.clone(),
            };
            site.revisions.insert(revision_id, revision);

            let item = site.items.get_mut(&id).ok_or_else(|| WpError::not_found(kind))?;
            apply(item, input);
            let now = now();
            item.modified = now.clone();
            item.modified_gmt = format!("{now}+00:00");
            info!(id, kind, "updated");
            Ok(Json(json!(item)))
        }
        _ => Err(WpError::no_route()),
    }
}

fn parse_input(body: &[u8]) -> Result<ItemInput, WpError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(ItemInput::default());
    }
    serde_json::from_slice(body).map_err(|err| {
        WpError::new(
            StatusCode::BAD_REQUEST,
            "rest_invalid_json",
            format!("Invalid JSON body passed: {err}"),
        )
    })
}

// ---------------------------------------------------------------------------
// Revisions
// ---------------------------------------------------------------------------

async fn list_revisions(
    State(db): State<Db>,
    Path((collection, id)): Path<(String, u64)>,
    headers: HeaderMap,
) -> Result<Json<Vec<Revision>>, WpError> {
    let kind = kind_of(&collection)?;
    authorize(&headers)?;
    let site = db.read().await;
    if !site.items.get(&id).is_some_and(|item| item.kind == kind) {
        return Err(WpError::not_found(kind));
    }
    let revisions = site
        .revisions
        .values()
        .rev()
        .filter(|revision| revision.parent == id)
        .cloned()
        .collect();
    Ok(Json(revisions))
}

async fn get_revision(
    State(db): State<Db>,
    Path((collection, id, revision)): Path<(String, u64, u64)>,
    headers: HeaderMap,
) -> Result<Json<Revision>, WpError> {
    kind_of(&collection)?;
    authorize(&headers)?;
    let site = db.read().await;
    site.revisions
        .get(&revision)
        .filter(|r| r.parent == id)
        .cloned()
        .map(Json)
        .ok_or_else(|| WpError::new(StatusCode::NOT_FOUND, "rest_post_invalid_id", "Invalid revision ID."))
}

async fn write_revision(
    State(db): State<Db>,
    Path((collection, id, revision)): Path<(String, u64, u64)>,
    Query(params): Query<DeleteQuery>,
    method: Method,
    headers: HeaderMap,
) -> Result<Json<Value>, WpError> {
    kind_of(&collection)?;
    authorize(&headers)?;
    if effective_method(&method, &headers) != "DELETE" {
        return Err(WpError::no_route());
    }
    if !params.forced() {
        return Err(WpError::new(
            StatusCode::NOT_IMPLEMENTED,
            "rest_trash_not_supported",
            "Revisions do not support trashing. Set 'force' to true to delete.",
        ));
    }

    let mut site = db.write().await;
    match site.revisions.get(&revision) {
        Some(r) if r.parent == id => {}
        _ => {
            return Err(WpError::new(
                StatusCode::NOT_FOUND,
                "rest_post_invalid_id",
                "Invalid revision ID.",
            ))
        }
    }
    let previous = site.revisions.remove(&revision);
    Ok(Json(json!({ "deleted": true, "previous": previous })))
}

// ---------------------------------------------------------------------------
// Media
// ---------------------------------------------------------------------------

async fn list_media(State(db): State<Db>, Query(query): Query<ListQuery>) -> Result<impl IntoResponse, WpError> {
    let site = db.read().await;
    let all: Vec<Media> = site.media.values().rev().cloned().collect();
    let (headers, page) = paginate(all, &query)?;
    Ok((headers, Json(page)))
}

async fn get_media(State(db): State<Db>, Path(id): Path<u64>) -> Result<Json<Media>, WpError> {
    let site = db.read().await;
    site.media
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| WpError::not_found("media"))
}

async fn upload_media(
    State(db): State<Db>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, WpError> {
    authorize(&headers)?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| WpError::new(StatusCode::BAD_REQUEST, "rest_upload_unknown_error", err.body_text()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or("application/octet-stream").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|err| WpError::new(StatusCode::BAD_REQUEST, "rest_upload_unknown_error", err.body_text()))?;
        upload = Some((filename, content_type, data));
    }
    let Some((filename, content_type, data)) = upload.filter(|(name, _, data)| !name.is_empty() && !data.is_empty())
    else {
        return Err(WpError::new(StatusCode::BAD_REQUEST, "rest_upload_no_data", "No data supplied."));
    };

    let mut site = db.write().await;
    let id = site.allocate_id();
    let stem = filename.rsplit_once('.').map_or(filename.as_str(), |(stem, _)| stem);
    let media_type = if content_type.starts_with("image/") { "image" } else { "file" };
    let media = Media {
        id,
        date: now(),
        slug: slugify(stem, id),
        status: "inherit".to_string(),
        kind: "attachment".to_string(),
        title: render(stem.to_string(), false),
        author: 1,
        media_type: media_type.to_string(),
        mime_type: content_type,
        source_url: format!("http://localhost/wp-content/uploads/{filename}"),
        media_details: json!({ "filesize": data.len(), "sizes": {} }),
    };
    site.media.insert(id, media.clone());
    info!(id, %filename, "uploaded");
    Ok((StatusCode::CREATED, Json(media)))
}

// ---------------------------------------------------------------------------
// Users, settings, statuses
// ---------------------------------------------------------------------------

async fn me(headers: HeaderMap) -> Result<Json<Value>, WpError> {
    authorize(&headers).map_err(|_| {
        WpError::new(
            StatusCode::UNAUTHORIZED,
            "rest_not_logged_in",
            "You are not currently logged in.",
        )
    })?;
    Ok(Json(json!({
        "id": 1,
        "name": USERNAME,
        "slug": USERNAME,
        "link": "http://localhost/author/admin/",
        "avatar_urls": { "24": "http://localhost/avatar-24.png", "48": "http://localhost/avatar-48.png" },
        "roles": ["administrator"]
    })))
}

async fn get_settings(State(db): State<Db>, headers: HeaderMap) -> Result<Json<Map<String, Value>>, WpError> {
    authorize(&headers)?;
    Ok(Json(db.read().await.settings.clone()))
}

async fn write_settings(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(changes): Json<Map<String, Value>>,
) -> Result<Json<Map<String, Value>>, WpError> {
    authorize(&headers)?;
    let mut site = db.write().await;
    for (key, value) in changes {
        if site.settings.contains_key(&key) {
            site.settings.insert(key, value);
        }
    }
    Ok(Json(site.settings.clone()))
}

fn statuses() -> Value {
    json!({
        "publish": { "name": "Published", "public": true, "queryable": true, "show_in_list": true, "slug": "publish" },
        "future": { "name": "Scheduled", "public": false, "queryable": false, "show_in_list": true, "slug": "future" },
        "draft": { "name": "Draft", "public": false, "queryable": false, "show_in_list": true, "slug": "draft" },
        "pending": { "name": "Pending", "public": false, "queryable": false, "show_in_list": true, "slug": "pending" },
        "private": { "name": "Private", "private": true, "queryable": false, "show_in_list": true, "slug": "private" }
    })
}

async fn list_statuses() -> Json<Value> {
    Json(statuses())
}

async fn get_status(Path(slug): Path<String>) -> Result<Json<Value>, WpError> {
    statuses()
        .get(&slug)
        .cloned()
        .map(Json)
        .ok_or_else(|| WpError::new(StatusCode::NOT_FOUND, "rest_status_invalid", "Invalid status."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_input_accepts_both_shapes() {
        let plain: ItemInput = serde_json::from_str(r#"{"title":"Hi"}"#).unwrap();
        let object: ItemInput = serde_json::from_str(r#"{"title":{"raw":"Hi"}}"#).unwrap();
        assert_eq!(plain.title.unwrap().into_raw(), "Hi");
        assert_eq!(object.title.unwrap().into_raw(), "Hi");
    }

    #[test]
    fn slugs_are_lowercase_and_hyphenated() {
        assert_eq!(slugify("Hello, World!", 3), "hello-world");
        assert_eq!(slugify("!!!", 3), "3");
    }

    #[test]
    fn override_header_only_applies_to_post() {
        let mut headers = HeaderMap::new();
        headers.insert(METHOD_OVERRIDE, "delete".parse().unwrap());
        assert_eq!(effective_method(&Method::POST, &headers), "DELETE");
        assert_eq!(effective_method(&Method::GET, &headers), "GET");
    }

    #[test]
    fn paginate_reports_totals() {
        let query = ListQuery {
            page: Some(2),
            per_page: Some(2),
            ..ListQuery::default()
        };
        let ([(_, total), (_, pages)], items) = paginate(vec![1, 2, 3], &query).unwrap();
        assert_eq!((total.as_str(), pages.as_str()), ("3", "2"));
        assert_eq!(items, vec![3]);
    }

    #[test]
    fn seeded_site_has_post_and_page() {
        let site = Site::seeded();
        let kinds: Vec<_> = site.items.values().map(|item| item.kind.as_str()).collect();
        assert_eq!(kinds, ["post", "page"]);
        assert!(site.items.values().all(|item| item.status == "publish"));
    }
}
