//! Endpoint options and their query-string encoding.
//!
//! # Design
//! Options are plain structs that write their non-zero fields into a
//! [`QueryPairs`]. Empty strings, zero numbers, `false` flags, empty lists and
//! `None` timestamps are skipped, so `Default::default()` encodes to nothing.
//! List-valued fields always use the bracketed form `key[]=1&key[]=2`.

use chrono::{DateTime, SecondsFormat, Utc};
use url::form_urlencoded;

/// Query-string encoder that skips zero values.
pub struct QueryPairs {
    serializer: form_urlencoded::Serializer<'static, String>,
    empty: bool,
}

impl QueryPairs {
    pub fn new() -> Self {
        Self {
            serializer: form_urlencoded::Serializer::new(String::new()),
            empty: true,
        }
    }

    fn push(&mut self, key: &str, value: &str) -> &mut Self {
        self.serializer.append_pair(key, value);
        self.empty = false;
        self
    }

    pub fn text(&mut self, key: &str, value: &str) -> &mut Self {
        if !value.is_empty() {
            self.push(key, value);
        }
        self
    }

    pub fn number(&mut self, key: &str, value: u64) -> &mut Self {
        if value != 0 {
            self.push(key, &value.to_string());
        }
        self
    }

    pub fn flag(&mut self, key: &str, value: bool) -> &mut Self {
        if value {
            self.push(key, "true");
        }
        self
    }

    pub fn list(&mut self, key: &str, values: &[u64]) -> &mut Self {
        let bracketed = format!("{key}[]");
        for value in values {
            self.push(&bracketed, &value.to_string());
        }
        self
    }

    pub fn texts(&mut self, key: &str, values: &[String]) -> &mut Self {
        let bracketed = format!("{key}[]");
        for value in values.iter().filter(|v| !v.is_empty()) {
            self.push(&bracketed, value);
        }
        self
    }

    pub fn time(&mut self, key: &str, value: Option<&DateTime<Utc>>) -> &mut Self {
        if let Some(value) = value {
            self.push(key, &value.to_rfc3339_opts(SecondsFormat::Secs, true));
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    pub fn finish(mut self) -> String {
        self.serializer.finish()
    }
}

impl Default for QueryPairs {
    fn default() -> Self {
        Self::new()
    }
}

/// A structured set of query parameters.
pub trait QueryOptions: Send + Sync {
    fn encode(&self, pairs: &mut QueryPairs);

    fn to_query_string(&self) -> String {
        let mut pairs = QueryPairs::new();
        self.encode(&mut pairs);
        pairs.finish()
    }
}

/// Query attached to a request: nothing, a pre-encoded string, or options.
#[derive(Clone, Copy, Default)]
pub enum Query<'a> {
    #[default]
    None,
    Raw(&'a str),
    Options(&'a dyn QueryOptions),
}

impl<'a> Query<'a> {
    pub fn raw(query: &'a str) -> Self {
        Query::Raw(query)
    }

    pub fn options(options: &'a dyn QueryOptions) -> Self {
        Query::Options(options)
    }

    /// The encoded query string, `None` when there is nothing to attach.
    pub fn encode(&self) -> Option<String> {
        match self {
            Query::None => None,
            Query::Raw(raw) => Some(raw.trim_start_matches('?').to_string()),
            Query::Options(options) => {
                let mut pairs = QueryPairs::new();
                options.encode(&mut pairs);
                if pairs.is_empty() {
                    None
                } else {
                    Some(pairs.finish())
                }
            }
        }
    }
}

impl<'a, T: QueryOptions> From<&'a T> for Query<'a> {
    fn from(options: &'a T) -> Self {
        Query::Options(options)
    }
}

impl<'a, T: QueryOptions> From<Option<&'a T>> for Query<'a> {
    fn from(options: Option<&'a T>) -> Self {
        options.map_or(Query::None, |options| Query::Options(options))
    }
}

/// Options shared by every paginated collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Scope of the request: `view`, `embed` or `edit`.
    pub context: String,
    pub exclude: Vec<u64>,
    pub include: Vec<u64>,
    pub offset: u64,
    pub order: String,
    pub orderby: String,
    pub page: u64,
    pub per_page: u64,
    pub search: String,
}

impl QueryOptions for ListOptions {
    fn encode(&self, pairs: &mut QueryPairs) {
        pairs
            .text("context", &self.context)
            .list("exclude", &self.exclude)
            .list("include", &self.include)
            .number("offset", self.offset)
            .text("order", &self.order)
            .text("orderby", &self.orderby)
            .number("page", self.page)
            .number("per_page", self.per_page)
            .text("search", &self.search);
    }
}

/// Parameters accepted by single-item reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetParams {
    pub context: String,
    /// Password for a password-protected item. Redacted from errors and logs.
    pub password: String,
}

impl QueryOptions for GetParams {
    fn encode(&self, pairs: &mut QueryPairs) {
        pairs.text("context", &self.context).text("password", &self.password);
    }
}

/// Parameters accepted by deletes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteParams {
    /// Bypass the trash. The server then answers with a delete envelope.
    pub force: bool,
    /// User id that receives the deleted user's content.
    pub reassign: u64,
}

impl DeleteParams {
    pub fn force() -> Self {
        Self {
            force: true,
            ..Self::default()
        }
    }
}

impl QueryOptions for DeleteParams {
    fn encode(&self, pairs: &mut QueryPairs) {
        pairs.flag("force", self.force).number("reassign", self.reassign);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn default_options_encode_to_nothing() {
        assert_eq!(Query::from(&ListOptions::default()).encode(), None);
        assert_eq!(Query::from(None::<&ListOptions>).encode(), None);
        assert_eq!(Query::None.encode(), None);
    }

    #[test]
    fn non_zero_fields_are_encoded_in_order() {
        let options = ListOptions {
            include: vec![3, 4],
            page: 2,
            per_page: 10,
            search: "hello world".to_string(),
            ..ListOptions::default()
        };
        assert_eq!(
            Query::from(&options).encode().unwrap(),
            "include%5B%5D=3&include%5B%5D=4&page=2&per_page=10&search=hello+world"
        );
    }

    #[test]
    fn raw_query_passes_through() {
        assert_eq!(Query::raw("force=true").encode().unwrap(), "force=true");
        assert_eq!(Query::raw("?context=edit").encode().unwrap(), "context=edit");
    }

    #[test]
    fn times_are_rfc3339_utc() {
        let mut pairs = QueryPairs::new();
        let after = Utc.with_ymd_and_hms(2017, 9, 24, 13, 28, 6).unwrap();
        pairs.time("after", Some(&after)).time("before", None);
        assert_eq!(pairs.finish(), "after=2017-09-24T13%3A28%3A06Z");
    }

    #[test]
    fn delete_params_force() {
        assert_eq!(DeleteParams::force().to_query_string(), "force=true");
        assert_eq!(DeleteParams::default().to_query_string(), "");
    }
}
