use serde::{Deserialize, Serialize};

/// Stand-in for a blank location name
pub const FALLBACK_LOCATION: &str = "the target location";

/// A fixed forecast location
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl Profile {
    /// Wind check: Heathrow approach paths
    pub fn heathrow() -> Self {
        Self {
            location: "London Heathrow".into(),
            latitude: 51.47,
            longitude: -0.4543,
        }
    }

    /// Rain check: school run
    pub fn twickenham() -> Self {
        Self {
            location: "Twickenham".into(),
            latitude: 51.449,
            longitude: -0.337,
        }
    }

    /// Location name for prompts, never blank
    pub fn display_name(&self) -> &str {
        let name = self.location.trim();
        if name.is_empty() {
            FALLBACK_LOCATION
        } else {
            name
        }
    }
}

/// The two scheduled jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileKind {
    Wind,
    Rain,
}

impl ProfileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileKind::Wind => "wind",
            ProfileKind::Rain => "rain",
        }
    }

    pub fn profile(&self) -> Profile {
        match self {
            ProfileKind::Wind => Profile::heathrow(),
            ProfileKind::Rain => Profile::twickenham(),
        }
    }

    pub fn default_days(&self) -> u8 {
        match self {
            ProfileKind::Wind => 15,
            ProfileKind::Rain => 7,
        }
    }

    /// Daily trigger time, UTC
    pub fn default_schedule(&self) -> Schedule {
        match self {
            ProfileKind::Wind => Schedule::new(10, 0),
            ProfileKind::Rain => Schedule::new(7, 30),
        }
    }
}

impl std::fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Time of day a job fires, in UTC
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub hour: u32,
    pub minute: u32,
}

impl Schedule {
    pub fn new(hour: u32, minute: u32) -> Self {
        Self { hour, minute }
    }

    pub fn is_valid(&self) -> bool {
        self.hour <= 23 && self.minute <= 59
    }
}

impl std::fmt::Display for Schedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02} UTC", self.hour, self.minute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_location_falls_back() {
        let mut profile = Profile::heathrow();
        assert_eq!(profile.display_name(), "London Heathrow");
        profile.location = "   ".into();
        assert_eq!(profile.display_name(), FALLBACK_LOCATION);
    }

    #[test]
    fn kinds_map_to_fixed_profiles() {
        assert_eq!(ProfileKind::Wind.profile().location, "London Heathrow");
        assert_eq!(ProfileKind::Rain.profile().location, "Twickenham");
    }

    #[test]
    fn default_schedules() {
        assert_eq!(ProfileKind::Wind.default_schedule().to_string(), "10:00 UTC");
        assert_eq!(ProfileKind::Rain.default_schedule().to_string(), "07:30 UTC");
        assert_eq!(ProfileKind::Wind.default_days(), 15);
        assert_eq!(ProfileKind::Rain.default_days(), 7);
        assert!(!Schedule::new(24, 0).is_valid());
        assert!(!Schedule::new(0, 60).is_valid());
        assert!(Schedule::new(23, 59).is_valid());
    }
}
