//! Help center query models.
//!
//! Help center list endpoints take optional paging and sideload
//! parameters, each appended independently in a fixed order.

use std::fmt;

/// The sideload value requesting sections and categories inline.
pub const SIDELOAD_INCLUDE: &str = "sections,categories";

/// Returns true unless the caller passed the literal string `"false"`.
///
/// Sideloading is on by default so that older callers, which never send
/// the flag, keep getting sections and categories.
pub fn sideload_enabled(flag: Option<&str>) -> bool {
    flag != Some("false")
}

/// Paging and sideload parameters for a help center request.
///
/// `page` and `per_page` render in the order they were added; the
/// sideload `include` always comes last.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelpCenterQuery {
    paging: Vec<(&'static str, u32)>,
    include: bool,
}

impl HelpCenterQuery {
    /// Creates an empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `page`. Zero is ignored.
    pub fn with_page(self, page: Option<u32>) -> Self {
        self.with_positive("page", page)
    }

    /// Adds `per_page`. Zero is ignored.
    pub fn with_per_page(self, per_page: Option<u32>) -> Self {
        self.with_positive("per_page", per_page)
    }

    /// Requests `include=sections,categories` when enabled.
    pub fn with_sideload(mut self, enabled: bool) -> Self {
        self.include = enabled;
        self
    }

    fn with_positive(mut self, name: &'static str, value: Option<u32>) -> Self {
        if let Some(value) = value.filter(|v| *v > 0) {
            self.paging.push((name, value));
        }
        self
    }

    /// Returns true if no parameters were added.
    pub fn is_empty(&self) -> bool {
        self.paging.is_empty() && !self.include
    }

    /// Renders the query string without a leading `?`.
    pub fn to_query_string(&self) -> String {
        let mut parts: Vec<String> = self
            .paging
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();
        if self.include {
            parts.push(format!("include={}", SIDELOAD_INCLUDE));
        }
        parts.join("&")
    }
}

/// Direction of an article vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vote {
    /// Helpful.
    Up,
    /// Not helpful.
    Down,
}

impl Vote {
    /// Parses a vote value. Anything other than `up` or `down` is rejected.
    pub fn parse(value: &str) -> Option<Vote> {
        match value {
            "up" => Some(Vote::Up),
            "down" => Some(Vote::Down),
            _ => None,
        }
    }

    /// Path segment for the vote endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            Vote::Up => "up",
            Vote::Down => "down",
        }
    }
}

impl fmt::Display for Vote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
