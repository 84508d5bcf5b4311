//! Card records as hosts hand them to the renderer.
//!
//! The taxonomy is closed: every card is a Pokémon, Trainer or Energy card, and Pokémon
//! cards are further split by era. The renderer only pattern-matches on it to pull out
//! the images and text it draws.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Elemental type of a Pokémon, attack cost or energy card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PokemonType {
    Colorless,
    Darkness,
    Dragon,
    /// Only printed in the XY and Sun & Moon eras
    Fairy,
    Fighting,
    Fire,
    Grass,
    Lightning,
    Metal,
    Psychic,
    Water,
}

impl PokemonType {
    /// Lowercase name, as used in asset keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            PokemonType::Colorless => "colorless",
            PokemonType::Darkness => "darkness",
            PokemonType::Dragon => "dragon",
            PokemonType::Fairy => "fairy",
            PokemonType::Fighting => "fighting",
            PokemonType::Fire => "fire",
            PokemonType::Grass => "grass",
            PokemonType::Lightning => "lightning",
            PokemonType::Metal => "metal",
            PokemonType::Psychic => "psychic",
            PokemonType::Water => "water",
        }
    }
}

impl Display for PokemonType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attack {
    pub name: String,
    #[serde(default)]
    pub cost: Vec<PokemonType>,
    #[serde(default)]
    pub damage: Option<u32>,
    /// Printed after the damage, e.g. `+` or `x`
    #[serde(default)]
    pub damage_sign: Option<String>,
    #[serde(default)]
    pub effect_text: Option<String>,
}

impl Attack {
    /// Damage as printed on the card, e.g. `30+`.
    pub fn damage_label(&self) -> Option<String> {
        self.damage
            .map(|d| format!("{}{}", d, self.damage_sign.as_deref().unwrap_or("")))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    pub text: String,
}

/// Era-specific flags of a Pokémon card.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "series")]
pub enum PokemonEra {
    #[serde(rename = "Sun & Moon", rename_all = "camelCase")]
    SunMoon {
        #[serde(default)]
        gx: bool,
        #[serde(default, rename = "tagteamgx")]
        tag_team_gx: bool,
        #[serde(default)]
        prism_star: bool,
        #[serde(default)]
        ultra_beast: bool,
    },
    #[serde(rename = "Sword & Shield")]
    SwordShield,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PokemonCard {
    #[serde(flatten)]
    pub era: PokemonEra,
    pub pokemon_type: PokemonType,
    pub hp: u32,
    #[serde(default)]
    pub weakness: String,
    #[serde(default)]
    pub resistance: String,
    #[serde(default, rename = "retreatcost")]
    pub retreat_cost: u32,
    #[serde(default)]
    pub ability: Option<Ability>,
    #[serde(default)]
    pub attacks: Vec<Attack>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrainerType {
    Item,
    Tool,
    Stadium,
    Supporter,
}

impl Display for TrainerType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TrainerType::Item => write!(f, "Item"),
            TrainerType::Tool => write!(f, "Tool"),
            TrainerType::Stadium => write!(f, "Stadium"),
            TrainerType::Supporter => write!(f, "Supporter"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainerCard {
    pub trainer_type: TrainerType,
    pub effect: String,
    #[serde(default)]
    pub prism_star: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnergyCard {
    pub energy_type: PokemonType,
    #[serde(default)]
    pub effect: String,
    #[serde(default)]
    pub prism_star: bool,
}

/// The variant part of a card, discriminated by `cardType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cardType", rename_all = "lowercase")]
pub enum CardKind {
    Pokemon(PokemonCard),
    Trainer(TrainerCard),
    Energy(EnergyCard),
}

/// A complete card record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub name: String,
    /// Locator of the portrait artwork, handed as-is to the image loader
    pub image: String,
    #[serde(flatten)]
    pub kind: CardKind,
}

impl Card {
    /// Parses a card from its JSON form.
    pub fn from_json(json: &str) -> Result<Card, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sun_moon_pokemon() {
        let json = r#"{
            "name": "Pikachu",
            "image": "art/pikachu.png",
            "cardType": "pokemon",
            "series": "Sun & Moon",
            "gx": true,
            "tagteamgx": false,
            "prismStar": false,
            "ultraBeast": false,
            "pokemonType": "lightning",
            "hp": 70,
            "weakness": "fighting",
            "resistance": "metal",
            "retreatcost": 1,
            "attacks": [
                { "name": "Thunder Shock", "cost": ["lightning"], "damage": 20, "damageSign": "+" }
            ]
        }"#;

        let card = Card::from_json(json).unwrap();
        assert_eq!(card.name, "Pikachu");
        let CardKind::Pokemon(p) = &card.kind else {
            panic!("expected a pokemon card, got {:?}", card.kind);
        };
        assert_eq!(p.hp, 70);
        assert_eq!(p.retreat_cost, 1);
        assert_eq!(p.pokemon_type, PokemonType::Lightning);
        assert!(matches!(p.era, PokemonEra::SunMoon { gx: true, tag_team_gx: false, .. }));
        assert_eq!(p.attacks[0].damage_label().as_deref(), Some("20+"));
    }

    #[test]
    fn parses_trainer_and_energy() {
        let trainer = Card::from_json(
            r#"{"name":"Potion","image":"art/potion.png","cardType":"trainer","trainerType":"Item","effect":"Heal 30 damage from 1 of your Pokemon."}"#,
        )
        .unwrap();
        assert!(matches!(
            trainer.kind,
            CardKind::Trainer(TrainerCard { trainer_type: TrainerType::Item, prism_star: false, .. })
        ));

        let energy = Card::from_json(
            r#"{"name":"Fire Energy","image":"art/fire.png","cardType":"energy","energyType":"fire"}"#,
        )
        .unwrap();
        assert!(matches!(
            energy.kind,
            CardKind::Energy(EnergyCard { energy_type: PokemonType::Fire, .. })
        ));
    }

    #[test]
    fn rejects_unknown_card_type() {
        assert!(Card::from_json(r#"{"name":"x","image":"y","cardType":"stadium"}"#).is_err());
    }
}
