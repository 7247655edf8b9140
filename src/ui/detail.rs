/// Detail screen
///
/// Shows the placeholder profile and whatever payload the card handed over.
/// The payload's shape is never inspected.

use iced::widget::{column, container, scrollable, text};
use iced::{Border, Color, Element, Length};
use iced_aw::Wrap;
use serde_json::Value;

use crate::Message;

/// A pet on the profile
#[derive(Debug, Clone, PartialEq)]
pub struct Pet {
    pub kind: String,
    pub name: String,
    pub breed: String,
}

/// Hard-coded profile content
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub name: String,
    pub age: u32,
    pub location: String,
    pub bio: String,
    pub pets: Vec<Pet>,
}

impl Profile {
    pub fn placeholder() -> Self {
        let pet = |kind: &str, name: &str, breed: &str| Pet {
            kind: kind.to_string(),
            name: name.to_string(),
            breed: breed.to_string(),
        };

        Self {
            name: "Alice".to_string(),
            age: 30,
            location: "Wonderland".to_string(),
            bio: "Loves exploring new places and spending time with my furry \
                  (and not so furry) friends."
                .to_string(),
            pets: vec![
                pet("Cat", "Cheshire", "Unknown"),
                pet("Rabbit", "White Rabbit", "Flemish Giant"),
            ],
        }
    }
}

/// Text shown for the handed-over payload
pub fn payload_text(payload: Option<&Value>) -> String {
    match payload {
        None | Some(Value::Null) => "No card selected".to_string(),
        Some(value) => serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string()),
    }
}

fn pet_view(pet: &Pet) -> Element<'_, Message> {
    container(column![
        text(format!("Type: {}", pet.kind)),
        text(format!("Name: {}", pet.name)),
        text(format!("Breed: {}", pet.breed)),
    ])
    .padding(10)
    .style(|_theme| container::Style {
        background: Some(Color::from_rgb8(0x33, 0x33, 0x33).into()),
        border: Border {
            radius: 5.0.into(),
            ..Border::default()
        },
        ..container::Style::default()
    })
    .into()
}

/// Build the detail screen
pub fn view<'a>(profile: &'a Profile, payload: Option<&'a Value>) -> Element<'a, Message> {
    let pets = Wrap::with_elements(profile.pets.iter().map(pet_view).collect())
        .spacing(10.0)
        .line_spacing(10.0);

    let content = column![
        text(format!("{}'s Profile", profile.name)).size(32),
        text(format!("Age: {}", profile.age)),
        text(format!("Location: {}", profile.location)),
        text(&profile.bio),
        text("Pets:").size(22),
        pets,
        text("Card:").size(22),
        text(payload_text(payload)).size(14),
    ]
    .spacing(10);

    container(scrollable(content))
        .padding(20)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_placeholder_profile() {
        let profile = Profile::placeholder();
        assert_eq!(profile.name, "Alice");
        assert_eq!(profile.pets.len(), 2);
        assert_eq!(profile.pets[1].breed, "Flemish Giant");
    }

    #[test]
    fn test_payload_text() {
        assert_eq!(payload_text(None), "No card selected");
        assert_eq!(payload_text(Some(&Value::Null)), "No card selected");
        assert_eq!(payload_text(Some(&json!("wuwa_05"))), "\"wuwa_05\"");
        assert!(payload_text(Some(&json!({ "name": "Alice" }))).contains("\"name\": \"Alice\""));
    }
}
