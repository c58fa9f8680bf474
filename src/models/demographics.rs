//! Demographic context
//!
//! Gender and sport discipline used to pick thresholds and lookup factors.

use rmcp::schemars;
use serde::{Deserialize, Serialize};

/// Biological sex used by the reference thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" | "masculino" | "hombre" => Some(Gender::Male),
            "female" | "f" | "femenino" | "mujer" => Some(Gender::Female),
            _ => None,
        }
    }
}

/// Sport discipline of the athlete
///
/// Unknown sports resolve to `Other`, which carries the default factors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Sport {
    Futbol,
    Baloncesto,
    Voleibol,
    Natacion,
    Atletismo,
    Tenis,
    Gimnasia,
    Ciclismo,
    ArtesMarciales,
    #[default]
    Other,
}

impl Sport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sport::Futbol => "futbol",
            Sport::Baloncesto => "baloncesto",
            Sport::Voleibol => "voleibol",
            Sport::Natacion => "natacion",
            Sport::Atletismo => "atletismo",
            Sport::Tenis => "tenis",
            Sport::Gimnasia => "gimnasia",
            Sport::Ciclismo => "ciclismo",
            Sport::ArtesMarciales => "artes_marciales",
            Sport::Other => "other",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().replace([' ', '-'], "_").as_str() {
            "futbol" | "fútbol" | "soccer" | "football" => Sport::Futbol,
            "baloncesto" | "basquetbol" | "básquetbol" | "basketball" => Sport::Baloncesto,
            "voleibol" | "volleyball" => Sport::Voleibol,
            "natacion" | "natación" | "swimming" => Sport::Natacion,
            "atletismo" | "athletics" | "track" => Sport::Atletismo,
            "tenis" | "tennis" => Sport::Tenis,
            "gimnasia" | "gymnastics" => Sport::Gimnasia,
            "ciclismo" | "cycling" => Sport::Ciclismo,
            "artes_marciales" | "martial_arts" | "judo" | "taekwondo" | "karate" => {
                Sport::ArtesMarciales
            }
            _ => Sport::Other,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Sport::Futbol => "Fútbol",
            Sport::Baloncesto => "Baloncesto",
            Sport::Voleibol => "Voleibol",
            Sport::Natacion => "Natación",
            Sport::Atletismo => "Atletismo",
            Sport::Tenis => "Tenis",
            Sport::Gimnasia => "Gimnasia",
            Sport::Ciclismo => "Ciclismo",
            Sport::ArtesMarciales => "Artes marciales",
            Sport::Other => "Otro",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_from_str() {
        assert_eq!(Gender::from_str("male"), Some(Gender::Male));
        assert_eq!(Gender::from_str("Femenino"), Some(Gender::Female));
        assert_eq!(Gender::from_str("x"), None);
    }

    #[test]
    fn test_sport_from_str() {
        assert_eq!(Sport::from_str("futbol"), Sport::Futbol);
        assert_eq!(Sport::from_str("Fútbol"), Sport::Futbol);
        assert_eq!(Sport::from_str("martial-arts"), Sport::ArtesMarciales);
        assert_eq!(Sport::from_str("curling"), Sport::Other);
    }

    #[test]
    fn test_sport_round_trips_through_db_string() {
        for sport in [Sport::Natacion, Sport::ArtesMarciales, Sport::Other] {
            assert_eq!(Sport::from_str(sport.as_str()), sport);
        }
    }
}
