use super::{ApiClient, QueryParams, RequestOptions};
use crate::error::ClientError;
use crate::models::{AuthorDetails, KeywordGroupItem, NoteBasicDetails, NoteRecord, PaginatedNotes};

/// Per-note resources under `/api/v1/xhs/notes/{id}/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoteSection {
    Basic,
    Author,
    KeywordGroups,
    Comments,
    LlmDiagnoses,
    TagComparisons,
    CommentAnalyses,
}

impl NoteSection {
    pub fn slug(&self) -> &'static str {
        match self {
            NoteSection::Basic => "basic",
            NoteSection::Author => "author",
            NoteSection::KeywordGroups => "keyword-groups",
            NoteSection::Comments => "comments",
            NoteSection::LlmDiagnoses => "llm-diagnoses",
            NoteSection::TagComparisons => "tag-comparisons",
            NoteSection::CommentAnalyses => "comment-analyses",
        }
    }
}

fn note_path(note_id: &str, section: NoteSection) -> Result<String, ClientError> {
    let id = note_id.trim();
    if id.is_empty() || id.chars().any(|c| matches!(c, '/' | '?' | '#' | '%') || c.is_whitespace()) {
        return Err(ClientError::InvalidRequest(format!("invalid note id '{}'", note_id)));
    }
    Ok(format!("/api/v1/xhs/notes/{}/{}", id, section.slug()))
}

impl ApiClient {
    pub async fn list_notes(&self, params: QueryParams) -> Result<PaginatedNotes, ClientError> {
        let options = RequestOptions::get().query(params);
        self.request_guarded("/api/v1/xhs/notes/", options).await
    }

    pub async fn note_basic(&self, note_id: &str) -> Result<NoteBasicDetails, ClientError> {
        let path = note_path(note_id, NoteSection::Basic)?;
        self.request_guarded(&path, RequestOptions::get()).await
    }

    pub async fn note_author(&self, note_id: &str) -> Result<AuthorDetails, ClientError> {
        let path = note_path(note_id, NoteSection::Author)?;
        self.request_guarded(&path, RequestOptions::get()).await
    }

    pub async fn note_keyword_groups(&self, note_id: &str) -> Result<Vec<KeywordGroupItem>, ClientError> {
        let path = note_path(note_id, NoteSection::KeywordGroups)?;
        self.request_guarded(&path, RequestOptions::get()).await
    }

    /// Comments, LLM diagnoses, tag comparisons and comment analyses.
    pub async fn note_records(
        &self,
        note_id: &str,
        section: NoteSection,
    ) -> Result<Vec<NoteRecord>, ClientError> {
        let path = note_path(note_id, section)?;
        self.request_guarded(&path, RequestOptions::get()).await
    }
}
