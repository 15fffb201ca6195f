//! Entity editors: the forms that collect constrained input before a
//! controller submits it.
//!
//! Validation here is format and size checking only. The backend remains the
//! authority and its rejection message is shown verbatim.

use serde::Serialize;
use std::path::Path;
use thiserror::Error;

use crate::models::{Branch, Document, Semester};

/// Upper bound for an uploaded document file
pub const MAX_DOCUMENT_BYTES: usize = 5 * 1024 * 1024;

pub const PDF_MIME: &str = "application/pdf";

/// Client-side rejection, raised before any request is sent
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please select a PDF document only (got {0})")]
    NotPdf(String),

    #[error("File size should be less than 5MB ({0} bytes)")]
    FileTooLarge(usize),

    #[error("Please select a valid image file (got {0})")]
    NotImage(String),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Semester must be between 1 and 8 (got {0})")]
    InvalidSemester(String),

    #[error("Unknown branch: {0}")]
    InvalidBranch(String),

    #[error("Rating must be between 1 and 5 (got {0})")]
    InvalidRating(u8),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Verification code must be exactly 6 digits")]
    InvalidCode,

    #[error("Nothing to update")]
    EmptyEdit,
}

/// A file picked for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Read a file from disk, guessing its MIME type from the extension
    pub fn from_path(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path)?;
        let mime = mime_guess::from_path(path).first_or_octet_stream();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        Ok(Self::new(file_name, mime.essence_str(), bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Document field: PDF, at most [`MAX_DOCUMENT_BYTES`]
pub fn check_document_file(file: &Attachment) -> Result<(), ValidationError> {
    if file.mime != PDF_MIME {
        return Err(ValidationError::NotPdf(file.mime.clone()));
    }
    if file.len() > MAX_DOCUMENT_BYTES {
        return Err(ValidationError::FileTooLarge(file.len()));
    }
    Ok(())
}

/// Thumbnail field: any `image/*` type
pub fn check_image(image: &Attachment) -> Result<(), ValidationError> {
    if image.mime.starts_with("image/") {
        Ok(())
    } else {
        Err(ValidationError::NotImage(image.mime.clone()))
    }
}

/// Add-document form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentForm {
    pub name: String,
    pub semester: Semester,
    pub branch: Branch,
    pub file: Option<Attachment>,
    pub image: Option<Attachment>,
}

impl DocumentForm {
    pub fn new(name: impl Into<String>, semester: Semester, branch: Branch) -> Self {
        Self {
            name: name.into(),
            semester,
            branch,
            file: None,
            image: None,
        }
    }

    /// Attach the document file; rejected files are not kept
    pub fn with_file(mut self, file: Attachment) -> Result<Self, ValidationError> {
        check_document_file(&file)?;
        self.file = Some(file);
        Ok(self)
    }

    pub fn with_image(mut self, image: Attachment) -> Result<Self, ValidationError> {
        check_image(&image)?;
        self.image = Some(image);
        Ok(self)
    }

    /// Full pre-submit check; fields may have been set directly
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("Document name"));
        }
        if let Some(file) = &self.file {
            check_document_file(file)?;
        }
        if let Some(image) = &self.image {
            check_image(image)?;
        }
        Ok(())
    }
}

/// Edit-document form. Unset fields are left as they are on the server.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentEdit {
    pub name: Option<String>,
    pub semester: Option<Semester>,
    pub branch: Option<String>,
    pub file: Option<Attachment>,
    pub image: Option<Attachment>,
}

impl DocumentEdit {
    /// Pre-filled from the cached entry, the way the edit dialog opens
    pub fn from_document(doc: &Document) -> Self {
        Self {
            name: Some(doc.name.clone()),
            semester: Some(doc.semester),
            branch: Some(doc.branch.clone()),
            file: None,
            image: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn semester(mut self, semester: Semester) -> Self {
        self.semester = Some(semester);
        self
    }

    pub fn branch(mut self, branch: Branch) -> Self {
        self.branch = Some(branch.as_str().to_string());
        self
    }

    pub fn with_file(mut self, file: Attachment) -> Result<Self, ValidationError> {
        check_document_file(&file)?;
        self.file = Some(file);
        Ok(self)
    }

    pub fn with_image(mut self, image: Attachment) -> Result<Self, ValidationError> {
        check_image(&image)?;
        self.image = Some(image);
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_none()
            && self.semester.is_none()
            && self.branch.is_none()
            && self.file.is_none()
            && self.image.is_none()
        {
            return Err(ValidationError::EmptyEdit);
        }
        if matches!(&self.name, Some(name) if name.trim().is_empty()) {
            return Err(ValidationError::MissingField("Document name"));
        }
        if let Some(file) = &self.file {
            check_document_file(file)?;
        }
        if let Some(image) = &self.image {
            check_image(image)?;
        }
        Ok(())
    }
}

/// Body of `POST /auth/login`
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Result<Self, ValidationError> {
        let email = email.into();
        let password = password.into();
        if email.trim().is_empty() {
            return Err(ValidationError::MissingField("Email"));
        }
        if password.is_empty() {
            return Err(ValidationError::MissingField("Password"));
        }
        Ok(Self { email, password })
    }
}

/// Body of `POST /auth/codeverify`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationCode {
    code: String,
}

impl VerificationCode {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let code = input.trim();
        if code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self { code: code.to_string() })
        } else {
            Err(ValidationError::InvalidCode)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.code
    }
}

/// Body of `PATCH /auth/resetpassword`
#[derive(Debug, Clone, Serialize)]
pub struct PasswordReset {
    password: String,
    cpassword: String,
}

impl PasswordReset {
    pub fn new(password: impl Into<String>, confirm: impl Into<String>) -> Result<Self, ValidationError> {
        let password = password.into();
        let cpassword = confirm.into();
        if password.is_empty() {
            return Err(ValidationError::MissingField("New password"));
        }
        if password != cpassword {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(Self { password, cpassword })
    }
}
