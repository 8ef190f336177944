//! Photo attachments.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A captured image. The bytes are opaque: drover only stores and counts them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub id: Uuid,
    pub image: Vec<u8>,
    pub captured_at: Timestamp,
}

impl Photo {
    /// Wraps freshly captured image data.
    pub fn capture(image: Vec<u8>) -> Self {
        Self {
            id: Uuid::new_v4(),
            image,
            captured_at: Timestamp::now(),
        }
    }

    pub fn size_bytes(&self) -> usize {
        self.image.len()
    }
}
