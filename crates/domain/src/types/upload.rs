//! File uploads

/// An image read into memory, ready to be sent as a multipart part
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self { file_name: file_name.into(), bytes }
    }

    /// Last path segment of `file_name`, or `image.jpg` when there is none.
    #[must_use]
    pub fn base_name(&self) -> &str {
        self.file_name.rsplit('/').next().filter(|name| !name.is_empty()).unwrap_or("image.jpg")
    }

    /// `image/<extension>`, falling back to `image/jpeg`.
    #[must_use]
    pub fn mime_type(&self) -> String {
        let name = self.base_name();
        match name.rsplit_once('.') {
            Some((_, ext))
                if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') =>
            {
                format!("image/{ext}")
            }
            _ => "image/jpeg".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mime_type_follows_extension() {
        assert_eq!(ImageUpload::new("/tmp/carrots.png", vec![]).mime_type(), "image/png");
        assert_eq!(ImageUpload::new("photo", vec![]).mime_type(), "image/jpeg");
    }

    #[test]
    fn base_name_defaults_when_path_ends_in_slash() {
        assert_eq!(ImageUpload::new("dir/", vec![]).base_name(), "image.jpg");
        assert_eq!(ImageUpload::new("a/b/c.webp", vec![]).base_name(), "c.webp");
    }
}
