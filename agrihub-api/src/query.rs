/// Query filter for list endpoints (`?type=...&isActive=...`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub kind: Option<String>,
    pub is_active: Option<bool>,
    pub extra: Vec<(String, String)>,
}

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filters on the `type` parameter.
    #[must_use]
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Filters on the `isActive` parameter.
    #[must_use]
    pub fn active(mut self, is_active: bool) -> Self {
        self.is_active = Some(is_active);
        self
    }

    /// Adds any other query parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.kind.is_none() && self.is_active.is_none() && self.extra.is_empty()
    }

    pub fn to_query(&self) -> Vec<(String, String)> {
        let mut query = Vec::with_capacity(2 + self.extra.len());
        if let Some(kind) = &self.kind {
            query.push(("type".to_string(), kind.clone()));
        }
        if let Some(active) = self.is_active {
            query.push(("isActive".to_string(), active.to_string()));
        }
        query.extend(self.extra.iter().cloned());
        query
    }
}
