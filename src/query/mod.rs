//! Shared list/filter/sort/pagination state for list pages.
//!
//! A list page is a [`ListView`] over some [`ListSource`]; the
//! [`FilterSchema`] says which filters exist, how they are typed, and how
//! the backend expects page windows and sort order to be spelled.

pub mod error;
pub mod types;

pub use error::QueryError;
pub use types::*;

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::api::QueryParams;
use crate::error::ClientError;

/// One window of a server-side list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
}

#[async_trait]
pub trait ListSource: Send + Sync {
    type Item: Send;

    async fn fetch(&self, params: QueryParams) -> Result<Page<Self::Item>, ClientError>;
}

/// Query state owned by one list page. Never persisted.
#[derive(Debug, Clone)]
pub struct ListQuery {
    schema: &'static FilterSchema,
    filters: BTreeMap<String, FilterValue>,
    page: u32,
    page_size: u32,
    sort: Option<SortState>,
}

impl ListQuery {
    pub fn new(schema: &'static FilterSchema) -> Self {
        Self {
            schema,
            filters: BTreeMap::new(),
            page: 1,
            page_size: schema.default_page_size.max(1),
            sort: schema.default_sort.map(|(field, direction)| SortState {
                field: field.to_string(),
                direction,
            }),
        }
    }

    pub fn schema(&self) -> &'static FilterSchema {
        self.schema
    }

    pub fn filters(&self) -> &BTreeMap<String, FilterValue> {
        &self.filters
    }

    pub fn filter(&self, field: &str) -> Option<&FilterValue> {
        self.filters.get(field)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    pub fn skip(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    /// Merge one filter (or remove it with `None`) and go back to page 1.
    pub fn set_filter(&mut self, field: &str, value: Option<FilterValue>) -> Result<(), QueryError> {
        let kind = self
            .schema
            .kind_of(field)
            .ok_or_else(|| QueryError::UnknownField(field.to_string()))?;

        match value {
            Some(value) if value.kind() != kind => {
                return Err(QueryError::InvalidValue {
                    field: field.to_string(),
                    value: value.to_string(),
                    expected: match kind {
                        FieldKind::Text => "text",
                        FieldKind::Bool => "a boolean",
                        FieldKind::Integer => "an integer",
                        FieldKind::DateTime => "a datetime",
                    },
                });
            }
            Some(value) => {
                self.filters.insert(field.to_string(), value);
            }
            None => {
                self.filters.remove(field);
            }
        }

        self.page = 1;
        Ok(())
    }

    /// Parse `raw` per the schema, then [`set_filter`](Self::set_filter).
    pub fn set_filter_str(&mut self, field: &str, raw: &str) -> Result<(), QueryError> {
        let kind = self
            .schema
            .kind_of(field)
            .ok_or_else(|| QueryError::UnknownField(field.to_string()))?;
        let value = FilterValue::parse(field, kind, raw)?;
        self.set_filter(field, value)
    }

    pub fn reset_filters(&mut self) {
        self.filters.clear();
        self.page = 1;
    }

    pub fn set_page(&mut self, page: u32) -> Result<(), QueryError> {
        if page == 0 {
            return Err(QueryError::InvalidPage(page));
        }
        self.page = page;
        Ok(())
    }

    pub fn set_page_size(&mut self, page_size: u32) -> Result<(), QueryError> {
        if page_size == 0 {
            return Err(QueryError::InvalidPageSize(page_size));
        }
        self.page_size = page_size;
        self.page = 1;
        Ok(())
    }

    /// Same field flips direction; a new field starts descending. Back to page 1.
    pub fn toggle_sort(&mut self, field: &str) -> Result<(), QueryError> {
        if !self.schema.is_sortable(field) {
            return Err(QueryError::UnsortableField(field.to_string()));
        }

        self.sort = Some(match self.sort.take() {
            Some(current) if current.field == field => SortState {
                field: current.field,
                direction: current.direction.flipped(),
            },
            _ => SortState {
                field: field.to_string(),
                direction: SortDirection::Desc,
            },
        });
        self.page = 1;
        Ok(())
    }

    /// Sort by `field` in an explicit direction. Back to page 1.
    pub fn set_sort(&mut self, field: &str, direction: SortDirection) -> Result<(), QueryError> {
        if !self.schema.is_sortable(field) {
            return Err(QueryError::UnsortableField(field.to_string()));
        }
        self.sort = Some(SortState {
            field: field.to_string(),
            direction,
        });
        self.page = 1;
        Ok(())
    }

    pub fn params(&self) -> QueryParams {
        let mut params = QueryParams::new();

        match self.schema.pagination {
            Pagination::Offset => {
                params.push("skip", self.skip()).push("limit", self.page_size);
            }
            Pagination::PageNumber => {
                params.push("page", self.page).push("page_size", self.page_size);
            }
        }

        for (field, value) in &self.filters {
            params.push(field, value);
        }

        if let Some(sort) = &self.sort {
            params
                .push(self.schema.sort_field_param, &sort.field)
                .push(self.schema.sort_direction_param, sort.direction.as_str());
        }

        params
    }
}

/// A list page: query state plus the last successfully fetched window.
pub struct ListView<S: ListSource> {
    source: S,
    query: ListQuery,
    items: Vec<S::Item>,
    total: u64,
    loaded: bool,
}

impl<S: ListSource> ListView<S> {
    pub fn new(source: S, schema: &'static FilterSchema) -> Self {
        Self {
            source,
            query: ListQuery::new(schema),
            items: Vec::new(),
            total: 0,
            loaded: false,
        }
    }

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    /// Direct access for batching several changes before one refresh.
    pub fn query_mut(&mut self) -> &mut ListQuery {
        &mut self.query
    }

    pub fn items(&self) -> &[S::Item] {
        &self.items
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(u64::from(self.query.page_size()))
    }

    /// e.g. `显示 1 至 10 条，共 42 条`
    pub fn summary(&self) -> String {
        if self.total == 0 {
            return "共 0 条".to_string();
        }
        let from = (self.query.skip() + 1).min(self.total);
        let to = (self.query.skip() + u64::from(self.query.page_size())).min(self.total);
        format!("显示 {} 至 {} 条，共 {} 条", from, to, self.total)
    }

    /// Fetch the current window. On failure the previous items stay in place
    /// and the query state is not rolled back.
    pub async fn refresh(&mut self) -> Result<(), ClientError> {
        match self.source.fetch(self.query.params()).await {
            Ok(page) => {
                self.items = page.items;
                self.total = page.total;
                self.loaded = true;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to load list: {}", e);
                Err(e)
            }
        }
    }

    pub async fn apply_filter(&mut self, field: &str, raw: &str) -> Result<(), ClientError> {
        self.query.set_filter_str(field, raw)?;
        self.refresh().await
    }

    pub async fn reset_filters(&mut self) -> Result<(), ClientError> {
        self.query.reset_filters();
        self.refresh().await
    }

    /// Returns `false` without fetching when `page` is outside the known range.
    pub async fn change_page(&mut self, page: u32) -> Result<bool, ClientError> {
        if page == 0 || (self.loaded && u64::from(page) > self.total_pages()) {
            return Ok(false);
        }
        self.query.set_page(page)?;
        self.refresh().await?;
        Ok(true)
    }

    pub async fn change_sort(&mut self, field: &str) -> Result<(), ClientError> {
        self.query.toggle_sort(field)?;
        self.refresh().await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    static SCHEMA: FilterSchema = FilterSchema {
        fields: &[
            ("search", FieldKind::Text),
            ("is_admin", FieldKind::Bool),
            ("min_likes", FieldKind::Integer),
        ],
        sortable: &["created_at", "username"],
        pagination: Pagination::Offset,
        sort_field_param: "order_by",
        sort_direction_param: "order_direction",
        default_page_size: 10,
        default_sort: Some(("created_at", SortDirection::Desc)),
    };

    #[derive(Clone, Default)]
    struct Recorder {
        calls: Arc<Mutex<Vec<QueryParams>>>,
        fail: Arc<Mutex<bool>>,
        total: u64,
    }

    impl Recorder {
        fn calls(&self) -> Vec<QueryParams> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ListSource for Recorder {
        type Item = u64;

        async fn fetch(&self, params: QueryParams) -> Result<Page<u64>, ClientError> {
            self.calls.lock().unwrap().push(params.clone());
            if *self.fail.lock().unwrap() {
                return Err(ClientError::http(500, "boom", None));
            }
            let skip: u64 = params.get("skip").unwrap_or("0").parse().unwrap();
            let limit: u64 = params.get("limit").unwrap_or("10").parse().unwrap();
            let items = (skip..(skip + limit).min(self.total)).collect();
            Ok(Page { items, total: self.total })
        }
    }

    fn view(total: u64) -> (ListView<Recorder>, Recorder) {
        let recorder = Recorder { total, ..Default::default() };
        (ListView::new(recorder.clone(), &SCHEMA), recorder)
    }

    #[tokio::test]
    async fn filter_change_resets_to_first_page_with_one_fetch() {
        let (mut list, recorder) = view(35);
        list.refresh().await.unwrap();
        assert!(list.change_page(3).await.unwrap());
        assert_eq!(recorder.calls().last().unwrap().get("skip"), Some("20"));

        list.apply_filter("is_admin", "true").await.unwrap();

        let calls = recorder.calls();
        assert_eq!(calls.len(), 3);
        assert_eq!(list.query().page(), 1);
        assert_eq!(calls[2].get("skip"), Some("0"));
        assert_eq!(calls[2].get("is_admin"), Some("true"));
    }

    #[tokio::test]
    async fn sort_toggles_then_switches() {
        let (mut list, recorder) = view(5);
        list.change_sort("created_at").await.unwrap();
        assert_eq!(recorder.calls()[0].get("order_direction"), Some("asc"));
        assert_eq!(recorder.calls()[0].get("order_by"), Some("created_at"));

        list.change_sort("created_at").await.unwrap();
        assert_eq!(list.query().sort().unwrap().direction, SortDirection::Desc);

        list.change_sort("username").await.unwrap();
        let sort = list.query().sort().unwrap();
        assert_eq!(sort.field, "username");
        assert_eq!(sort.direction, SortDirection::Desc);
        assert!(list.change_sort("password").await.is_err());
        assert_eq!(recorder.calls().len(), 3);
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_rows() {
        let (mut list, recorder) = view(3);
        list.refresh().await.unwrap();
        assert_eq!(list.items(), &[0, 1, 2]);

        *recorder.fail.lock().unwrap() = true;
        assert!(list.apply_filter("search", "mei").await.is_err());
        assert_eq!(list.items(), &[0, 1, 2]);
        assert_eq!(list.query().filter("search"), Some(&FilterValue::Text("mei".to_string())));
    }

    #[tokio::test]
    async fn out_of_range_pages_are_ignored() {
        let (mut list, recorder) = view(25);
        list.refresh().await.unwrap();
        assert_eq!(list.total_pages(), 3);
        assert!(!list.change_page(4).await.unwrap());
        assert!(!list.change_page(0).await.unwrap());
        assert_eq!(recorder.calls().len(), 1);
        assert_eq!(list.summary(), "显示 1 至 10 条，共 25 条");
        list.change_page(3).await.unwrap();
        assert_eq!(list.summary(), "显示 21 至 25 条，共 25 条");
    }

    #[test]
    fn explicit_sort_direction_resets_page() {
        let mut query = ListQuery::new(&SCHEMA);
        query.set_page(4).unwrap();

        query.set_sort("username", SortDirection::Asc).unwrap();
        assert_eq!(query.page(), 1);
        let params = query.params();
        assert_eq!(params.get("order_by"), Some("username"));
        assert_eq!(params.get("order_direction"), Some("asc"));

        query.set_sort("username", SortDirection::Asc).unwrap();
        assert_eq!(query.sort().unwrap().direction, SortDirection::Asc);
        assert!(matches!(
            query.set_sort("password", SortDirection::Desc),
            Err(QueryError::UnsortableField(_))
        ));
    }

    #[test]
    fn params_follow_schema() {
        let mut query = ListQuery::new(&SCHEMA);
        query.set_filter_str("search", "mei").unwrap();
        query.set_filter_str("is_admin", "").unwrap();
        assert!(matches!(
            query.set_filter_str("nope", "1"),
            Err(QueryError::UnknownField(_))
        ));
        assert!(query.set_filter("min_likes", Some(FilterValue::Text("x".into()))).is_err());

        let params = query.params();
        assert_eq!(params.get("skip"), Some("0"));
        assert_eq!(params.get("limit"), Some("10"));
        assert_eq!(params.get("search"), Some("mei"));
        assert_eq!(params.get("is_admin"), None);
        assert_eq!(params.get("order_by"), Some("created_at"));
        assert_eq!(params.get("order_direction"), Some("desc"));
    }
}
