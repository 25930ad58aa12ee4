use serde::{Deserialize, Serialize};
use std::fmt;

use super::character_id::extract_id;

/// A character as served by the remote catalog.
///
/// Every field defaults when absent so that overlay blobs written by older
/// versions keep loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct CharacterRecord {
    pub name: String,
    pub height: String,
    pub mass: String,
    pub hair_color: String,
    pub skin_color: String,
    pub eye_color: String,
    pub birth_year: String,
    pub gender: String,
    pub homeworld: String,
    pub films: Vec<String>,
    pub species: Vec<String>,
    pub vehicles: Vec<String>,
    pub starships: Vec<String>,
    pub created: String,
    pub edited: String,
    pub url: String,
}

impl CharacterRecord {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_field(mut self, field: CharacterField, value: impl Into<String>) -> Self {
        field.set(&mut self, value);
        self
    }

    /// Catalog id derived from `url`, or `None` when the url is unidentifiable.
    pub fn id(&self) -> Option<String> {
        let id = extract_id(&self.url);
        if id.is_empty() {
            None
        } else {
            Some(id)
        }
    }
}

impl AsRef<CharacterRecord> for CharacterRecord {
    fn as_ref(&self) -> &CharacterRecord {
        self
    }
}

impl fmt::Display for CharacterRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", "=".repeat(self.name.chars().count()))?;

        for field in CharacterField::ALL.iter().skip(1) {
            writeln!(f, "{:<12} {}", format!("{}:", field.label()), field.get(self))?;
        }

        if !self.homeworld.is_empty() {
            writeln!(f, "\nHomeworld: {}", self.homeworld)?;
        }

        let counts = [
            ("films", self.films.len()),
            ("species", self.species.len()),
            ("vehicles", self.vehicles.len()),
            ("starships", self.starships.len()),
        ];
        let counts: Vec<String> = counts
            .iter()
            .filter(|(_, n)| *n > 0)
            .map(|(label, n)| format!("{} {}", n, label))
            .collect();
        if !counts.is_empty() {
            writeln!(f, "Appears in: {}", counts.join(", "))?;
        }

        if !self.url.is_empty() {
            write!(f, "\nSource: {}", self.url)?;
        }

        Ok(())
    }
}

/// A character saved locally. Only the overlay store produces these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct LocalCharacterRecord {
    #[serde(flatten)]
    pub character: CharacterRecord,
    #[serde(rename = "isEdited", default)]
    pub is_edited: bool,
}

impl LocalCharacterRecord {
    pub fn edited(character: CharacterRecord) -> Self {
        Self {
            character,
            is_edited: true,
        }
    }
}

impl AsRef<CharacterRecord> for LocalCharacterRecord {
    fn as_ref(&self) -> &CharacterRecord {
        &self.character
    }
}

impl From<LocalCharacterRecord> for CharacterRecord {
    fn from(local: LocalCharacterRecord) -> Self {
        local.character
    }
}

/// The free-text attributes a user may edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterField {
    Name,
    BirthYear,
    Gender,
    Height,
    Mass,
    HairColor,
    SkinColor,
    EyeColor,
}

impl CharacterField {
    pub const ALL: [CharacterField; 8] = [
        CharacterField::Name,
        CharacterField::BirthYear,
        CharacterField::Gender,
        CharacterField::Height,
        CharacterField::Mass,
        CharacterField::HairColor,
        CharacterField::SkinColor,
        CharacterField::EyeColor,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CharacterField::Name => "Name",
            CharacterField::BirthYear => "Birth Year",
            CharacterField::Gender => "Gender",
            CharacterField::Height => "Height (cm)",
            CharacterField::Mass => "Mass (kg)",
            CharacterField::HairColor => "Hair Color",
            CharacterField::SkinColor => "Skin Color",
            CharacterField::EyeColor => "Eye Color",
        }
    }

    pub fn get<'a>(&self, record: &'a CharacterRecord) -> &'a str {
        match self {
            CharacterField::Name => &record.name,
            CharacterField::BirthYear => &record.birth_year,
            CharacterField::Gender => &record.gender,
            CharacterField::Height => &record.height,
            CharacterField::Mass => &record.mass,
            CharacterField::HairColor => &record.hair_color,
            CharacterField::SkinColor => &record.skin_color,
            CharacterField::EyeColor => &record.eye_color,
        }
    }

    pub fn set(&self, record: &mut CharacterRecord, value: impl Into<String>) {
        let slot = match self {
            CharacterField::Name => &mut record.name,
            CharacterField::BirthYear => &mut record.birth_year,
            CharacterField::Gender => &mut record.gender,
            CharacterField::Height => &mut record.height,
            CharacterField::Mass => &mut record.mass,
            CharacterField::HairColor => &mut record.hair_color,
            CharacterField::SkinColor => &mut record.skin_color,
            CharacterField::EyeColor => &mut record.eye_color,
        };
        *slot = value.into();
    }
}

#[cfg(test)]
pub(crate) fn luke() -> CharacterRecord {
    CharacterRecord {
        name: "Luke Skywalker".to_string(),
        height: "172".to_string(),
        mass: "77".to_string(),
        hair_color: "blond".to_string(),
        skin_color: "fair".to_string(),
        eye_color: "blue".to_string(),
        birth_year: "19BBY".to_string(),
        gender: "male".to_string(),
        homeworld: "https://swapi.py4e.com/api/planets/1/".to_string(),
        films: Vec::new(),
        species: Vec::new(),
        vehicles: Vec::new(),
        starships: Vec::new(),
        created: "2014-12-09T13:50:51.644000Z".to_string(),
        edited: "2014-12-20T21:17:56.891000Z".to_string(),
        url: "https://swapi.py4e.com/api/people/1/".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_swapi_payload() {
        let json = r#"{
            "name": "Luke Skywalker",
            "height": "172",
            "mass": "77",
            "hair_color": "blond",
            "skin_color": "fair",
            "eye_color": "blue",
            "birth_year": "19BBY",
            "gender": "male",
            "homeworld": "https://swapi.py4e.com/api/planets/1/",
            "films": ["https://swapi.py4e.com/api/films/1/"],
            "species": [],
            "vehicles": [],
            "starships": [],
            "created": "2014-12-09T13:50:51.644000Z",
            "edited": "2014-12-20T21:17:56.891000Z",
            "url": "https://swapi.py4e.com/api/people/1/"
        }"#;

        let record: CharacterRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.name, "Luke Skywalker");
        assert_eq!(record.films.len(), 1);
        assert_eq!(record.id(), Some("1".to_string()));
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let record: CharacterRecord = serde_json::from_str(r#"{"name": "Leia"}"#).unwrap();
        assert_eq!(record.name, "Leia");
        assert_eq!(record.mass, "");
        assert!(record.films.is_empty());
        assert_eq!(record.id(), None);
    }

    #[test]
    fn test_local_record_serializes_flat_with_camel_case_flag() {
        let local = LocalCharacterRecord::edited(luke());
        let value = serde_json::to_value(&local).unwrap();

        assert_eq!(value["name"], "Luke Skywalker");
        assert_eq!(value["isEdited"], true);
        assert!(value.get("character").is_none());
    }

    #[test]
    fn test_local_record_without_flag_defaults_to_unedited() {
        let local: LocalCharacterRecord =
            serde_json::from_str(r#"{"name": "Han Solo", "url": "https://x/api/people/14/"}"#)
                .unwrap();
        assert!(!local.is_edited);
        assert_eq!(local.character.id(), Some("14".to_string()));
    }

    #[test]
    fn test_field_get_and_set() {
        let mut record = luke();
        CharacterField::EyeColor.set(&mut record, "green");
        assert_eq!(CharacterField::EyeColor.get(&record), "green");
        assert_eq!(record.eye_color, "green");

        let record = record.with_field(CharacterField::Name, "Red Five");
        assert_eq!(record.name, "Red Five");
    }

    #[test]
    fn test_display_lists_editable_fields() {
        let text = luke().to_string();
        assert!(text.starts_with("Luke Skywalker\n"));
        assert!(text.contains("Birth Year:"));
        assert!(text.contains("19BBY"));
        assert!(text.contains("Source: https://swapi.py4e.com/api/people/1/"));
    }
}
