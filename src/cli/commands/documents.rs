use clap::Subcommand;
use serde_json::json;
use std::path::{Path, PathBuf};

use crate::cli::utils::{confirm, output_collection, output_success};
use crate::cli::Context;
use crate::editor::{Attachment, DocumentForm};
use crate::error::AdminError;
use crate::guard::Route;
use crate::models::{Branch, Document, Semester};

#[derive(Subcommand)]
pub enum DocumentsCommands {
    #[command(about = "List all documents")]
    List,

    #[command(about = "Search documents by name")]
    Search {
        #[arg(help = "Search text; blank lists everything")]
        query: String,
    },

    #[command(about = "List documents of one semester")]
    Filter {
        #[arg(help = "Semester 1-8, or 0 for all")]
        semester: u8,
    },

    #[command(about = "Upload a new document")]
    Add {
        #[arg(long, help = "Document name")]
        name: String,
        #[arg(long, help = "Semester 1-8")]
        semester: Semester,
        #[arg(long, default_value = "All", help = "Branch: All, CSE, EE, EEE, CE, ME")]
        branch: Branch,
        #[arg(long, help = "PDF file, at most 5MB")]
        file: Option<PathBuf>,
        #[arg(long, help = "Thumbnail image")]
        image: Option<PathBuf>,
    },

    #[command(about = "Edit a document; unset options keep their current value")]
    Edit {
        #[arg(help = "Document id")]
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        semester: Option<Semester>,
        #[arg(long)]
        branch: Option<Branch>,
        #[arg(long, help = "Replacement PDF file")]
        file: Option<PathBuf>,
        #[arg(long, help = "Replacement thumbnail")]
        image: Option<PathBuf>,
    },

    #[command(about = "Delete a document")]
    Delete {
        #[arg(help = "Document id")]
        id: String,
        #[arg(long, short, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

fn row(doc: &Document) -> String {
    format!(
        "{:<26} {:<32} sem {} {:<4} {}",
        doc.id,
        doc.name,
        doc.semester,
        doc.branch,
        doc.size.as_ref().map(|s| s.to_string()).unwrap_or_default()
    )
}

fn attachment(path: &Path) -> anyhow::Result<Attachment> {
    Attachment::from_path(path).map_err(|e| anyhow::anyhow!("Cannot read {}: {}", path.display(), e))
}

pub async fn handle(cmd: DocumentsCommands, ctx: &Context) -> anyhow::Result<()> {
    ctx.require_route(Route::Documents).await?;
    let documents = &ctx.admin.documents;

    match cmd {
        DocumentsCommands::List => {
            documents.load().await.map_err(|e| ctx.fail(e))?;
            output_collection(&ctx.format, "documents", &documents.documents(), "No documents found", row)
        }
        DocumentsCommands::Search { query } => {
            documents.search_now(&query).await.map_err(|e| ctx.fail(e))?;
            output_collection(&ctx.format, "documents", &documents.documents(), "No documents found", row)
        }
        DocumentsCommands::Filter { semester } => {
            let semester = match semester {
                0 => None,
                n => Some(Semester::new(n).map_err(AdminError::from)?),
            };
            documents.filter(semester).await.map_err(|e| ctx.fail(e))?;
            output_collection(&ctx.format, "documents", &documents.documents(), "No documents found", row)
        }
        DocumentsCommands::Add {
            name,
            semester,
            branch,
            file,
            image,
        } => {
            let mut form = DocumentForm::new(name, semester, branch);
            form.file = file.as_deref().map(attachment).transpose()?;
            form.image = image.as_deref().map(attachment).transpose()?;

            let created = documents.create(&form).await.map_err(|e| ctx.fail(e))?;
            output_success(
                &ctx.format,
                &ctx.success_message("Document added"),
                Some(json!({ "document": created })),
            )
        }
        DocumentsCommands::Edit {
            id,
            name,
            semester,
            branch,
            file,
            image,
        } => {
            documents.load().await.map_err(|e| ctx.fail(e))?;
            let mut edit = documents.edit_form(&id).map_err(|e| ctx.fail(e))?;
            if let Some(name) = name {
                edit = edit.name(name);
            }
            if let Some(semester) = semester {
                edit = edit.semester(semester);
            }
            if let Some(branch) = branch {
                edit = edit.branch(branch);
            }
            edit.file = file.as_deref().map(attachment).transpose()?;
            edit.image = image.as_deref().map(attachment).transpose()?;

            let updated = documents.update(&id, &edit).await.map_err(|e| ctx.fail(e))?;
            output_success(
                &ctx.format,
                &ctx.success_message("Document updated"),
                Some(json!({ "document": updated })),
            )
        }
        DocumentsCommands::Delete { id, yes } => {
            documents.load().await.map_err(|e| ctx.fail(e))?;
            let pending = documents.request_delete(&id).map_err(|e| ctx.fail(e))?;
            if !yes && !confirm(&pending.prompt())? {
                return output_success(&ctx.format, "Delete cancelled", Some(json!({ "deleted": false })));
            }
            documents.confirm_delete(pending).await.map_err(|e| ctx.fail(e))?;
            output_success(
                &ctx.format,
                &ctx.success_message("Document deleted"),
                Some(json!({ "id": id, "deleted": true })),
            )
        }
    }
}
