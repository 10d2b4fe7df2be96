use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use upkdiff_common::DEFAULT_PREVIEW_CHARS;

/// Extensions handed to a model loader rather than a text or image view
pub const MODEL_EXTENSIONS: &[&str] = &["fbx", "obj", "dae", "blend", "gltf", "glb"];

const TRUNCATION_MARKER: &str = "\n...\n(content truncated)";

/// Preview-classification result handed to rendering collaborators
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Preview {
    /// Inline data URL, ready for an image element
    Image { data_url: String },
    /// Raw bytes plus lower-cased extension for a model loader
    Model { data: Vec<u8>, extension: String },
    Text { content: String },
    /// One-line descriptor for content with no textual rendering
    Binary { summary: String },
    Error { message: String },
}

impl Preview {
    pub fn kind(&self) -> &'static str {
        match self {
            Preview::Image { .. } => "image",
            Preview::Model { .. } => "model",
            Preview::Text { .. } => "text",
            Preview::Binary { .. } => "binary",
            Preview::Error { .. } => "error",
        }
    }
}

pub fn is_image_mime(mime_type: &str) -> bool {
    mime_type.starts_with("image/")
}

pub fn is_text_mime(mime_type: &str) -> bool {
    mime_type.starts_with("text/")
        || mime_type == "application/json"
        || mime_type == "application/xml"
}

pub fn is_model_file(extension: &str) -> bool {
    MODEL_EXTENSIONS.contains(&extension.to_lowercase().as_str())
}

/// Classify raw asset bytes for preview. Pure and total; rendering is a
/// collaborator concern. Model detection runs before the text check so
/// `obj` and `dae` reach the model loader despite their text MIME types.
pub fn preview(data: &[u8], mime_type: &str, extension: &str, max_chars: usize) -> Preview {
    if is_image_mime(mime_type) {
        return Preview::Image {
            data_url: format!("data:{};base64,{}", mime_type, BASE64.encode(data)),
        };
    }

    if is_model_file(extension) {
        return Preview::Model {
            data: data.to_vec(),
            extension: extension.to_lowercase(),
        };
    }

    if is_text_mime(mime_type) {
        return match std::str::from_utf8(data) {
            Ok(text) => Preview::Text {
                content: truncate_chars(text, max_chars),
            },
            Err(_) => Preview::Error {
                message: "failed to decode text content".to_string(),
            },
        };
    }

    Preview::Binary {
        summary: format!("Binary file ({:.2} KB)", data.len() as f64 / 1024.0),
    }
}

/// `preview` with the default character budget
pub fn preview_with_defaults(data: &[u8], mime_type: &str, extension: &str) -> Preview {
    preview(data, mime_type, extension, DEFAULT_PREVIEW_CHARS)
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => {
            let mut out = text[..cut].to_string();
            out.push_str(TRUNCATION_MARKER);
            out
        }
        None => text.to_string(),
    }
}
