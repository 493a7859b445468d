use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::linking::build_deep_link;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Platform {
    Phone,
    Sms,
    Instagram,
    Whatsapp,
    Telegram,
    Linkedin,
    Tiktok,
    Email,
}

impl Platform {
    pub const ALL: [Platform; 8] = [
        Self::Phone,
        Self::Sms,
        Self::Instagram,
        Self::Whatsapp,
        Self::Telegram,
        Self::Linkedin,
        Self::Tiktok,
        Self::Email,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Phone => "PHONE",
            Self::Sms => "SMS",
            Self::Instagram => "INSTAGRAM",
            Self::Whatsapp => "WHATSAPP",
            Self::Telegram => "TELEGRAM",
            Self::Linkedin => "LINKEDIN",
            Self::Tiktok => "TIKTOK",
            Self::Email => "EMAIL",
        }
    }

    /// Case-insensitive; None for tags we don't know
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "PHONE" | "TEL" => Some(Self::Phone),
            "SMS" | "TEXT" => Some(Self::Sms),
            "INSTAGRAM" => Some(Self::Instagram),
            "WHATSAPP" => Some(Self::Whatsapp),
            "TELEGRAM" => Some(Self::Telegram),
            "LINKEDIN" => Some(Self::Linkedin),
            "TIKTOK" => Some(Self::Tiktok),
            "EMAIL" => Some(Self::Email),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMethod {
    pub id: Uuid,
    pub person_id: Uuid,
    pub platform: Platform,
    pub value: String,
    /// Derived from platform and value; see `refresh_deep_link`
    pub deep_link: String,
}

impl ContactMethod {
    pub fn new(person_id: Uuid, platform: Platform, value: String) -> Self {
        let deep_link = build_deep_link(platform, &value);
        Self {
            id: Uuid::new_v4(),
            person_id,
            platform,
            value,
            deep_link,
        }
    }

    /// Recompute `deep_link`. Call after changing platform or value.
    pub fn refresh_deep_link(&mut self) {
        self.deep_link = build_deep_link(self.platform, &self.value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_computes_deep_link() {
        let method = ContactMethod::new(Uuid::new_v4(), Platform::Phone, "555-1234".to_string());
        assert_eq!(method.deep_link, "tel:555-1234");
    }

    #[test]
    fn test_refresh_deep_link() {
        let mut method =
            ContactMethod::new(Uuid::new_v4(), Platform::Email, "a@example.com".to_string());
        method.platform = Platform::Telegram;
        method.value = "ada".to_string();
        method.deep_link = "bogus".to_string();
        method.refresh_deep_link();
        assert_eq!(method.deep_link, "https://t.me/ada");
    }

    #[test]
    fn test_platform_tags_round_trip() {
        for platform in Platform::ALL {
            assert_eq!(Platform::parse(platform.as_str()), Some(platform));
        }
        assert_eq!(Platform::parse("whatsapp"), Some(Platform::Whatsapp));
        assert_eq!(Platform::parse("FAX"), None);
    }
}
