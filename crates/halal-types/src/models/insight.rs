//! Daily verse/hadith card.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyInsight {
    pub arabic: String,
    pub translation: String,
    #[serde(default)]
    pub source: String,
}

impl Default for DailyInsight {
    fn default() -> Self {
        Self {
            arabic: "إِنَّ مَعَ الْعُسْرِ يُسْرًا".to_string(),
            translation: "Indeed, with hardship comes ease.".to_string(),
            source: "Qur'an 94:6".to_string(),
        }
    }
}
