use uuid::Uuid;

pub const OBJECT_URL_PREFIX: &str = "blob:";

/// Mints a process-local url for generated content such as texture thumbnails.
pub fn create_object_url() -> String {
    format!("{OBJECT_URL_PREFIX}{}", Uuid::new_v4())
}

pub fn is_object_url(url: &str) -> bool {
    url.starts_with(OBJECT_URL_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minted_urls_are_object_urls_and_unique() {
        let a = create_object_url();
        let b = create_object_url();
        assert!(is_object_url(&a));
        assert_ne!(a, b);
    }

    #[test]
    fn plain_paths_are_not_object_urls() {
        assert!(!is_object_url("poster.webp"));
        assert!(!is_object_url("https://example.com/blob:x"));
    }
}
