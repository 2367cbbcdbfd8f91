use serde::{Deserialize, Serialize};

/// Self-reported cooking experience, stored as lowercase text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl SkillLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            SkillLevel::Beginner => "beginner",
            SkillLevel::Intermediate => "intermediate",
            SkillLevel::Advanced => "advanced",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub full_name: Option<String>,
    #[serde(default)]
    pub dietary_preferences: Vec<String>,
    #[serde(default)]
    pub allergies: Vec<String>,
    pub cooking_skill_level: SkillLevel,
    pub household_size: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skill_level_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&SkillLevel::Intermediate).unwrap(),
            "\"intermediate\""
        );
    }

    #[test]
    fn unknown_skill_level_is_rejected() {
        let body = r#"{"cooking_skill_level":"wizard","household_size":2}"#;
        assert!(serde_json::from_str::<UpdateProfileRequest>(body).is_err());
    }

    #[test]
    fn preferences_default_to_empty() {
        let body = r#"{"cooking_skill_level":"beginner","household_size":1}"#;
        let req: UpdateProfileRequest = serde_json::from_str(body).unwrap();
        assert!(req.dietary_preferences.is_empty());
        assert!(req.allergies.is_empty());
    }
}
