use bytes::Bytes;

/// A file received from an admin form
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl Upload {
    /// MIME type from the form part, else guessed from the file name.
    pub fn mime_type(&self) -> String {
        self.content_type
            .clone()
            .filter(|ct| !ct.is_empty() && ct != "application/octet-stream")
            .or_else(|| {
                mime_guess::from_path(&self.file_name)
                    .first()
                    .map(|m| m.to_string())
            })
            .unwrap_or_else(|| "application/octet-stream".to_string())
    }
}

/// Storage key for an upload: `<unix-millis>-<file name>`.
///
/// Only the last component of the client's file name is kept and anything
/// outside `[A-Za-z0-9._-]` becomes `-`, so the key is one URL-safe segment.
/// Two uploads of the same name within one millisecond collide.
pub fn object_key(file_name: &str, millis: i64) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let mut sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();

    if sanitized.trim_matches('.').is_empty() {
        sanitized = "file".to_string();
    }

    format!("{millis}-{sanitized}")
}

/// The object key a public URL points at: its last path segment.
pub fn key_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    path.rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_keeps_plain_names() {
        assert_eq!(object_key("shot.png", 1700000000000), "1700000000000-shot.png");
    }

    #[test]
    fn test_object_key_strips_directories_and_odd_chars() {
        assert_eq!(object_key("../../etc/passwd", 1), "1-passwd");
        assert_eq!(object_key("C:\\Users\\me\\My Shot (1).png", 2), "2-My-Shot--1-.png");
        assert_eq!(object_key("", 3), "3-file");
        assert_eq!(object_key("..", 4), "4-file");
    }

    #[test]
    fn test_key_from_url() {
        assert_eq!(
            key_from_url("https://x.supabase.co/storage/v1/object/public/project-images/17-a.png")
                .as_deref(),
            Some("17-a.png")
        );
        assert_eq!(
            key_from_url("http://localhost:8080/media/17-a.png?v=2").as_deref(),
            Some("17-a.png")
        );
        assert_eq!(key_from_url("https://cdn.example.com/"), None);
        assert_eq!(key_from_url(""), None);
    }

    #[test]
    fn test_mime_type_fallbacks() {
        let mut upload = Upload {
            file_name: "a.png".to_string(),
            content_type: Some("application/octet-stream".to_string()),
            data: Bytes::new(),
        };
        assert_eq!(upload.mime_type(), "image/png");

        upload.content_type = Some("image/webp".to_string());
        assert_eq!(upload.mime_type(), "image/webp");

        upload.file_name = "blob".to_string();
        upload.content_type = None;
        assert_eq!(upload.mime_type(), "application/octet-stream");
    }
}
