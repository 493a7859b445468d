use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How actively a person is kept in touch with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    #[default]
    Green,
    Yellow,
    Archive,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "GREEN",
            Self::Yellow => "YELLOW",
            Self::Archive => "ARCHIVE",
        }
    }

    /// Strict parse used when decoding stored rows
    pub fn from_tag(s: &str) -> Option<Self> {
        match s {
            "GREEN" => Some(Self::Green),
            "YELLOW" => Some(Self::Yellow),
            "ARCHIVE" => Some(Self::Archive),
            _ => None,
        }
    }

    /// Sort position when listing people: Green first, Archive last
    pub fn rank(&self) -> u8 {
        match self {
            Self::Green => 0,
            Self::Yellow => 1,
            Self::Archive => 2,
        }
    }

    /// Lenient parse for user input; anything unknown is Green
    pub fn parse(s: &str) -> Self {
        Self::from_tag(&s.trim().to_uppercase()).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: Uuid,
    pub name: Option<String>,
    pub primary_city_id: Option<Uuid>,
    /// Secondary cities, in the order the user added them
    pub additional_city_ids: Vec<Uuid>,
    pub tier: Tier,
    pub notes: Option<String>,
    pub last_contacted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Person {
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(n) if !n.trim().is_empty() => n,
            _ => "(No Name)",
        }
    }

    /// A whitespace-only name counts as no name
    pub fn has_name(&self) -> bool {
        self.name.as_deref().map_or(false, |n| !n.trim().is_empty())
    }

    /// Case-insensitive substring match on the name. An empty query matches everyone.
    pub fn name_matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.name
            .as_deref()
            .unwrap_or_default()
            .to_lowercase()
            .contains(&query)
    }

    /// True if the person lives in or visits the city
    pub fn is_in_city(&self, city_id: Uuid) -> bool {
        self.primary_city_id == Some(city_id) || self.additional_city_ids.contains(&city_id)
    }

    /// Drop every reference to `city_id`. Returns true if anything changed.
    pub fn clear_city(&mut self, city_id: Uuid) -> bool {
        let mut changed = false;
        if self.primary_city_id == Some(city_id) {
            self.primary_city_id = None;
            changed = true;
        }
        let before = self.additional_city_ids.len();
        self.additional_city_ids.retain(|id| *id != city_id);
        changed || self.additional_city_ids.len() != before
    }

    /// Which inbox fields are missing for this person
    pub fn missing_info(&self) -> MissingInfo {
        MissingInfo {
            name: !self.has_name(),
            city: self.primary_city_id.is_none(),
        }
    }
}

/// Sparse input for creating a person. Unset fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewPerson {
    pub name: Option<String>,
    pub primary_city_id: Option<Uuid>,
    pub additional_city_ids: Option<Vec<Uuid>>,
    pub tier: Option<Tier>,
    pub notes: Option<String>,
    pub last_contacted_at: Option<DateTime<Utc>>,
}

impl NewPerson {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn in_city(mut self, city_id: Uuid) -> Self {
        self.primary_city_id = Some(city_id);
        self
    }

    /// Resolve defaults into a complete record with a fresh id and creation time
    pub fn build(self) -> Person {
        Person {
            id: Uuid::new_v4(),
            name: self.name,
            primary_city_id: self.primary_city_id,
            additional_city_ids: self.additional_city_ids.unwrap_or_default(),
            tier: self.tier.unwrap_or_default(),
            notes: self.notes,
            last_contacted_at: self.last_contacted_at,
            created_at: Utc::now(),
        }
    }
}

/// Reasons a person shows up in the inbox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MissingInfo {
    pub name: bool,
    pub city: bool,
}

impl MissingInfo {
    pub fn any(&self) -> bool {
        self.name || self.city
    }

    pub fn label(&self) -> String {
        let mut parts = Vec::new();
        if self.name {
            parts.push("missing name");
        }
        if self.city {
            parts.push("missing city");
        }
        parts.join(" & ")
    }
}
