//! Notification payloads

use serde::{Deserialize, Serialize};

/// Device push token, tagged with the platform it was issued for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushTokenRegistration {
    pub token: String,
    pub platform: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferences {
    pub order_updates: bool,
    pub new_products: bool,
    pub promotions: bool,
    pub farm_news: bool,
    pub email_notifications: bool,
    pub push_notifications: bool,
}
