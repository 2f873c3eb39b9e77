use clap::{Subcommand, ValueEnum};
use serde_json::json;

use super::{apply_sort, client_failure, require, Order};
use crate::api::NoteSection;
use crate::cli::utils::*;
use crate::cli::Console;
use crate::error::ClientError;
use crate::messages;
use crate::models::{format_timestamp, NoteListItem};
use crate::routes::Route;
use crate::views::notes::{notes_list, NoteDetailView};

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SectionArg {
    Author,
    KeywordGroups,
    Comments,
    LlmDiagnoses,
    TagComparisons,
    CommentAnalyses,
}

impl From<SectionArg> for NoteSection {
    fn from(arg: SectionArg) -> Self {
        match arg {
            SectionArg::Author => NoteSection::Author,
            SectionArg::KeywordGroups => NoteSection::KeywordGroups,
            SectionArg::Comments => NoteSection::Comments,
            SectionArg::LlmDiagnoses => NoteSection::LlmDiagnoses,
            SectionArg::TagComparisons => NoteSection::TagComparisons,
            SectionArg::CommentAnalyses => NoteSection::CommentAnalyses,
        }
    }
}

#[derive(Subcommand)]
pub enum NotesCommands {
    #[command(about = "List notes")]
    List {
        #[arg(
            long = "filter",
            value_name = "FIELD=VALUE",
            help = "Filter, repeatable (e.g. title=咖啡, min_likes=100, start_create_time=2024-01-01T00:00)"
        )]
        filters: Vec<String>,
        #[arg(long, help = "Sort field, e.g. note_liked_count")]
        sort: Option<String>,
        #[arg(long, value_enum, requires = "sort", help = "Sort direction (defaults to desc)")]
        order: Option<Order>,
        #[arg(long, default_value_t = 1, help = "Page number")]
        page: u32,
        #[arg(long, help = "Rows per page")]
        page_size: Option<u32>,
    },

    #[command(about = "Show a note and any extra sections")]
    Show {
        #[arg(help = "Note ID")]
        note_id: String,
        #[arg(long = "section", value_enum, help = "Extra section to load, repeatable")]
        sections: Vec<SectionArg>,
    },
}

fn note_row(note: &NoteListItem) -> String {
    format!(
        "{}  {}  ♥{} 💬{} ↗{} ★{}  {}  {}",
        note.note_id,
        or_dash(note.note_display_title.as_deref()),
        note.note_liked_count,
        note.comment_count,
        note.share_count,
        note.collected_count,
        or_dash(note.author_nick_name.as_deref()),
        or_dash(note.note_create_time.as_deref().map(format_timestamp).as_deref()),
    )
}

fn split_filter(raw: &str) -> anyhow::Result<(&str, &str)> {
    raw.split_once('=')
        .map(|(field, value)| (field.trim(), value.trim()))
        .ok_or_else(|| anyhow::anyhow!("filter '{}' must look like FIELD=VALUE", raw))
}

pub async fn handle(cmd: NotesCommands, console: &Console) -> anyhow::Result<()> {
    let output = &console.output;
    let client = console.client();

    match cmd {
        NotesCommands::List { filters, sort, order, page, page_size } => {
            require(console, Route::Notes).await?;
            let mut view = notes_list(client.clone());

            let query = view.query_mut();
            for raw in &filters {
                let (field, value) = split_filter(raw)?;
                query.set_filter_str(field, value)?;
            }
            if let Some(size) = page_size {
                query.set_page_size(size)?;
            }
            apply_sort(query, sort.as_deref(), order)?;
            query.set_page(page)?;

            view.refresh().await.map_err(|e| client_failure(console, e))?;

            if view.items().is_empty() {
                return output_empty_collection(output, "items", "No notes found");
            }
            let rows: Vec<String> = view.items().iter().map(note_row).collect();
            output_rows(output, "items", json!(view.items()), &rows, Some(&view.summary()))
        }
        NotesCommands::Show { note_id, sections } => {
            require(console, Route::NoteDetail { note_id: note_id.clone() }).await?;

            let mut detail = match NoteDetailView::open(client.clone(), &note_id).await {
                Ok(detail) => detail,
                Err(e @ ClientError::NotFound(_)) => {
                    output_error(output, messages::NOTE_NOT_FOUND, Some(e.error_code()))?;
                    return Err(e.into());
                }
                Err(e) => return Err(client_failure(console, e)),
            };

            let basic = detail.basic().clone();
            let mut data = json!({ "basic": basic });
            let mut lines = vec![
                ("Note", basic.note_id.clone()),
                ("Title", or_dash(basic.note_display_title.as_deref())),
                ("Author", or_dash(basic.author_nick_name.as_deref())),
                ("Likes", basic.note_liked_count.unwrap_or_default().to_string()),
                ("Comments", basic.comment_count.unwrap_or_default().to_string()),
                ("Tags", basic.note_tags.clone().unwrap_or_default().join(", ")),
                ("Description", or_dash(basic.note_desc.as_deref())),
            ];

            for arg in sections {
                let section = NoteSection::from(arg);
                let value = match section {
                    NoteSection::Author => json!(detail.author().await.map_err(|e| client_failure(console, e))?),
                    NoteSection::KeywordGroups => {
                        json!(detail.keyword_groups().await.map_err(|e| client_failure(console, e))?)
                    }
                    other => json!(detail.records(other).await.map_err(|e| client_failure(console, e))?),
                };
                let count = value.as_array().map_or(1, Vec::len);
                lines.push((section.slug(), format!("{} record(s)", count)));
                data[section.slug()] = value;
            }

            output_record(output, "note", data, &lines)
        }
    }
}
