use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One row of the notes listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteListItem {
    pub note_id: String,
    #[serde(default)]
    pub note_url: String,
    pub note_cover_url_default: Option<String>,
    pub note_display_title: Option<String>,
    #[serde(default)]
    pub note_liked_count: i64,
    #[serde(default)]
    pub comment_count: i64,
    #[serde(default)]
    pub share_count: i64,
    #[serde(default)]
    pub collected_count: i64,
    #[serde(default)]
    pub author_id: String,
    pub author_nick_name: Option<String>,
    pub author_avatar: Option<String>,
    pub note_create_time: Option<String>,
    pub note_last_update_time: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedNotes {
    pub items: Vec<NoteListItem>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteImage {
    pub url: String,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteBasicDetails {
    pub note_id: String,
    pub note_url: Option<String>,
    pub note_display_title: Option<String>,
    pub note_cover_url_default: Option<String>,
    pub note_liked_count: Option<i64>,
    pub comment_count: Option<i64>,
    pub share_count: Option<i64>,
    pub collected_count: Option<i64>,
    pub note_desc: Option<String>,
    pub note_create_time: Option<String>,
    pub note_last_update_time: Option<String>,
    #[serde(default)]
    pub note_image_list: Option<Vec<NoteImage>>,
    #[serde(default)]
    pub note_tags: Option<Vec<String>>,
    pub video_h264_url: Option<String>,
    // The backend spells these "auther_*".
    #[serde(rename = "auther_user_id")]
    pub author_user_id: Option<String>,
    #[serde(rename = "auther_nick_name")]
    pub author_nick_name: Option<String>,
    #[serde(rename = "auther_avatar")]
    pub author_avatar: Option<String>,
    #[serde(rename = "auther_home_page_url")]
    pub author_home_page_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorDetails {
    pub user_id: String,
    pub nick_name: Option<String>,
    pub avatar: Option<String>,
    pub desc: Option<String>,
    pub ip_location: Option<String>,
    pub fans: Option<String>,
    pub follows: Option<String>,
    pub gender: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordGroup {
    pub group_id: i64,
    pub group_name: String,
    pub keywords: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordGroupItem {
    pub retrieved_at: Option<String>,
    pub keyword_group: KeywordGroup,
}

/// Comments, diagnoses, tag comparisons and comment analyses have no fixed
/// shape on the backend, so they travel as raw JSON records.
pub type NoteRecord = Value;
