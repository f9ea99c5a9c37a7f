use mime::Mime;

/// Multipart field that carries the resume.
pub const RESUME_FIELD: &str = "resume";
pub const MAX_RESUME_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    "image/jpeg",
    "image/jpg",
    "image/png",
];

const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "doc", "docx", "jpg", "jpeg", "png"];

/// Headroom for the text fields and multipart framing around the file.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Limits applied to uploaded files.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub field: &'static str,
    pub max_file_bytes: usize,
    pub max_files: usize,
    allowed_types: &'static [&'static str],
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            field: RESUME_FIELD,
            max_file_bytes: MAX_RESUME_BYTES,
            max_files: 1,
            allowed_types: ALLOWED_TYPES,
        }
    }
}

impl UploadPolicy {
    pub fn allows(&self, content_type: &Mime) -> bool {
        self.allowed_types
            .iter()
            .any(|allowed| content_type.essence_str().eq_ignore_ascii_case(allowed))
    }

    /// Extensions advertised alongside the allowed types.
    pub fn allowed_extensions(&self) -> &'static [&'static str] {
        ALLOWED_EXTENSIONS
    }

    /// Cap for the whole request body; the file limit itself is enforced while reading.
    pub fn request_body_limit(&self) -> usize {
        self.max_file_bytes * self.max_files + FORM_OVERHEAD_BYTES
    }

    /// Human-readable file size limit, e.g. `5MB`.
    pub fn max_file_size_label(&self) -> String {
        format!("{}MB", self.max_file_bytes / (1024 * 1024))
    }
}

/// Extension used when the original file name does not provide a usable one.
pub fn canonical_extension(essence: &str) -> Option<&'static str> {
    match essence.to_ascii_lowercase().as_str() {
        "application/pdf" => Some("pdf"),
        "application/msword" => Some("doc"),
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document" => Some("docx"),
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        _ => None,
    }
}

/// Whether `extension` is an allowed spelling for the content type `essence`.
pub fn extension_matches(essence: &str, extension: &str) -> bool {
    let extension = extension.to_ascii_lowercase();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return false;
    }
    match canonical_extension(essence) {
        Some("jpg") => extension == "jpg" || extension == "jpeg",
        Some(canonical) => extension == canonical,
        None => false,
    }
}
