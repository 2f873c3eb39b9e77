use std::collections::HashMap;

use async_trait::async_trait;

use crate::api::{ApiClient, NoteSection, QueryParams};
use crate::error::ClientError;
use crate::models::{AuthorDetails, KeywordGroupItem, NoteBasicDetails, NoteListItem, NoteRecord};
use crate::query::{FieldKind, FilterSchema, ListSource, ListView, Page, Pagination};

pub static NOTES_SCHEMA: FilterSchema = FilterSchema {
    fields: &[
        ("note_id", FieldKind::Text),
        ("title", FieldKind::Text),
        ("content", FieldKind::Text),
        ("min_likes", FieldKind::Integer),
        ("max_likes", FieldKind::Integer),
        ("min_comments", FieldKind::Integer),
        ("max_comments", FieldKind::Integer),
        ("min_shares", FieldKind::Integer),
        ("max_shares", FieldKind::Integer),
        ("author_id", FieldKind::Text),
        ("author_name", FieldKind::Text),
        ("start_create_time", FieldKind::DateTime),
        ("end_create_time", FieldKind::DateTime),
        ("start_update_time", FieldKind::DateTime),
        ("end_update_time", FieldKind::DateTime),
    ],
    sortable: &[
        "note_create_time",
        "note_last_update_time",
        "note_liked_count",
        "comment_count",
        "share_count",
        "collected_count",
    ],
    pagination: Pagination::PageNumber,
    sort_field_param: "sort_by",
    sort_direction_param: "sort_order",
    default_page_size: 20,
    default_sort: None,
};

pub struct NotesSource {
    client: ApiClient,
}

#[async_trait]
impl ListSource for NotesSource {
    type Item = NoteListItem;

    async fn fetch(&self, params: QueryParams) -> Result<Page<NoteListItem>, ClientError> {
        let notes = self.client.list_notes(params).await?;
        Ok(Page {
            items: notes.items,
            total: notes.total,
        })
    }
}

pub type NotesView = ListView<NotesSource>;

pub fn notes_list(client: ApiClient) -> NotesView {
    ListView::new(NotesSource { client }, &NOTES_SCHEMA)
}

/// One note. Basic details load up front; every other section is fetched
/// the first time it is asked for and kept afterwards.
pub struct NoteDetailView {
    client: ApiClient,
    basic: NoteBasicDetails,
    author: Option<AuthorDetails>,
    keyword_groups: Option<Vec<KeywordGroupItem>>,
    records: HashMap<NoteSection, Vec<NoteRecord>>,
}

impl NoteDetailView {
    pub async fn open(client: ApiClient, note_id: &str) -> Result<Self, ClientError> {
        let basic = match client.note_basic(note_id).await {
            Ok(basic) => basic,
            Err(e) if e.is_unauthorized() => return Err(e),
            Err(e) => {
                tracing::warn!("Note {} unavailable: {}", note_id, e);
                return Err(ClientError::NotFound(format!("note {}", note_id)));
            }
        };

        Ok(Self {
            client,
            basic,
            author: None,
            keyword_groups: None,
            records: HashMap::new(),
        })
    }

    pub fn note_id(&self) -> &str {
        &self.basic.note_id
    }

    pub fn basic(&self) -> &NoteBasicDetails {
        &self.basic
    }

    pub fn is_loaded(&self, section: NoteSection) -> bool {
        match section {
            NoteSection::Basic => true,
            NoteSection::Author => self.author.is_some(),
            NoteSection::KeywordGroups => self.keyword_groups.is_some(),
            other => self.records.contains_key(&other),
        }
    }

    pub async fn author(&mut self) -> Result<&AuthorDetails, ClientError> {
        if self.author.is_none() {
            let author = self.client.note_author(&self.basic.note_id).await?;
            self.author = Some(author);
        }
        self.author
            .as_ref()
            .ok_or_else(|| ClientError::NotFound("author".to_string()))
    }

    pub async fn keyword_groups(&mut self) -> Result<&[KeywordGroupItem], ClientError> {
        if self.keyword_groups.is_none() {
            let groups = self.client.note_keyword_groups(&self.basic.note_id).await?;
            self.keyword_groups = Some(groups);
        }
        Ok(self.keyword_groups.as_deref().unwrap_or_default())
    }

    /// Comments, LLM diagnoses, tag comparisons or comment analyses.
    pub async fn records(&mut self, section: NoteSection) -> Result<&[NoteRecord], ClientError> {
        if matches!(
            section,
            NoteSection::Basic | NoteSection::Author | NoteSection::KeywordGroups
        ) {
            return Err(ClientError::InvalidRequest(format!(
                "{} is not a record section",
                section.slug()
            )));
        }

        if !self.records.contains_key(&section) {
            let rows = self.client.note_records(&self.basic.note_id, section).await?;
            self.records.insert(section, rows);
        }
        Ok(self.records.get(&section).map(Vec::as_slice).unwrap_or_default())
    }
}
