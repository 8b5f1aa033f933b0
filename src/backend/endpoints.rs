/// URL builder for a single server base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(base: &str) -> Self {
        Self {
            base: base.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Join `path` (leading slash optional) onto the base.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    pub fn stream_url(&self, id: Option<&str>) -> String {
        self.url(&format!("stream/{}", id.unwrap_or("-")))
    }

    pub fn cover_url(&self, id: Option<&str>) -> String {
        self.url(&format!("metadata/track/{}/cover", id.unwrap_or("-")))
    }
}
