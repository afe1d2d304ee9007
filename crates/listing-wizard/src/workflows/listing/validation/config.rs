use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE_MIN_CHARS: usize = 10;
pub const DEFAULT_REVIEW_DESCRIPTION_MIN_CHARS: usize = 50;
pub const DEFAULT_MAX_IMAGES: usize = 10;

/// Thresholds applied by the wizard steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationConfig {
    pub title_min_chars: usize,
    /// Applied at the review step only; the basic-details step just requires a description.
    pub review_description_min_chars: usize,
    pub max_images: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            title_min_chars: DEFAULT_TITLE_MIN_CHARS,
            review_description_min_chars: DEFAULT_REVIEW_DESCRIPTION_MIN_CHARS,
            max_images: DEFAULT_MAX_IMAGES,
        }
    }
}
