use serde::{Deserialize, Serialize};

/// A slide as listed by the slide endpoints.
///
/// The thumbnail is a base64 PNG payload that is passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideModel {
    pub id: String,
    #[serde(default)]
    pub thumbnail: String,
}
