use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Method;

use super::{ApiClient, DocumentsApi};
use crate::editor::{Attachment, DocumentEdit, DocumentForm};
use crate::error::ApiError;
use crate::models::{Ack, Document, Semester};

fn file_part(attachment: &Attachment) -> Result<Part, ApiError> {
    Ok(Part::bytes(attachment.bytes.clone())
        .file_name(attachment.file_name.clone())
        .mime_str(&attachment.mime)?)
}

fn attach(mut form: Form, file: Option<&Attachment>, image: Option<&Attachment>) -> Result<Form, ApiError> {
    if let Some(file) = file {
        form = form.part("file", file_part(file)?);
    }
    if let Some(image) = image {
        form = form.part("image", file_part(image)?);
    }
    Ok(form)
}

fn upload_form(doc: &DocumentForm) -> Result<Form, ApiError> {
    let form = Form::new()
        .text("name", doc.name.clone())
        .text("semester", doc.semester.to_string())
        .text("branch", doc.branch.as_str().to_string());
    attach(form, doc.file.as_ref(), doc.image.as_ref())
}

fn edit_form(edit: &DocumentEdit) -> Result<Form, ApiError> {
    let mut form = Form::new();
    if let Some(name) = &edit.name {
        form = form.text("name", name.clone());
    }
    if let Some(semester) = edit.semester {
        form = form.text("semester", semester.to_string());
    }
    if let Some(branch) = &edit.branch {
        form = form.text("branch", branch.clone());
    }
    attach(form, edit.file.as_ref(), edit.image.as_ref())
}

#[async_trait]
impl DocumentsApi for ApiClient {
    async fn all_documents(&self) -> Result<Vec<Document>, ApiError> {
        self.send_json(Method::GET, &["documents", "alldocuments"], |r| r).await
    }

    async fn upload_document(&self, form: &DocumentForm) -> Result<Document, ApiError> {
        let multipart = upload_form(form)?;
        self.send_json(Method::POST, &["documents", "upload"], |r| r.multipart(multipart))
            .await
    }

    async fn edit_document(&self, id: &str, edit: &DocumentEdit) -> Result<Document, ApiError> {
        let multipart = edit_form(edit)?;
        self.send_json(Method::PATCH, &["documents", "edit", id], |r| {
            r.multipart(multipart)
        })
        .await
    }

    async fn delete_document(&self, id: &str) -> Result<Ack, ApiError> {
        self.send_ack(Method::DELETE, &["documents", "delete", id], |r| r)
            .await
    }

    async fn search_documents(&self, query: &str) -> Result<Vec<Document>, ApiError> {
        self.send_json(Method::GET, &["documents", "search"], |r| r.query(&[("q", query)]))
            .await
    }

    async fn documents_by_semester(&self, semester: Semester) -> Result<Vec<Document>, ApiError> {
        let semester = semester.to_string();
        self.send_json(Method::GET, &["documents", semester.as_str()], |r| r)
            .await
    }
}
