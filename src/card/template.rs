//! Default card template.
//!
//! Maps each card variant onto a [`CardScene`] in native card coordinates (747 x 1038).
//! Wrapped blocks are anchored at the baseline of their last line, so every slot below
//! names the bottom of the area its text may grow upwards into.

use crate::card::model::{Card, CardKind, EnergyCard, PokemonCard, PokemonEra, TrainerCard};
use crate::card::scene::{CardScene, FontSpec, ImageRef, TextBlockSpec};
use crate::geometry::BoundingConstraint;

const TITLE_FONT: &str = "FuturaStd";
const BODY_FONT: &str = "FuturaStd";

const MARGIN_X: f32 = 60.0;
const TEXT_WIDTH: f32 = 627.0;

const ART_X: f32 = 58.0;
const ART_Y: f32 = 118.0;
const ART_BOUNDS: BoundingConstraint = BoundingConstraint {
    max_width: 631.0,
    max_height: 430.0,
};

const ICON_X: f32 = 640.0;
const ICON_Y: f32 = 38.0;
const ICON_BOUNDS: BoundingConstraint = BoundingConstraint {
    max_width: 60.0,
    max_height: 60.0,
};

/// Height reserved for each attack or ability below the artwork.
const SLOT_HEIGHT: f32 = 120.0;
const FIRST_SLOT_TOP: f32 = 570.0;

/// Asset key of the icon for an elemental type.
pub fn type_icon_key(name: &str) -> String {
    format!("icons/{name}.png")
}

fn title(text: impl Into<String>, y: f32) -> TextBlockSpec {
    TextBlockSpec::new(text, MARGIN_X, y, 420.0, FontSpec::new(TITLE_FONT, 48.0))
        .with_fill("black")
        .with_stroke("white", 1.0)
}

fn body(text: impl Into<String>, x: f32, y: f32, max_width: f32, size: f32) -> TextBlockSpec {
    TextBlockSpec::new(text, x, y, max_width, FontSpec::new(BODY_FONT, size))
}

impl Card {
    /// Builds the scene for this card using the default template.
    pub fn scene(&self) -> CardScene {
        let mut scene = CardScene::new();
        scene.push_image(ImageRef::bounded(self.image.clone(), ART_X, ART_Y, ART_BOUNDS));

        match &self.kind {
            CardKind::Pokemon(p) => pokemon_scene(&mut scene, &self.name, p),
            CardKind::Trainer(t) => trainer_scene(&mut scene, &self.name, t),
            CardKind::Energy(e) => energy_scene(&mut scene, &self.name, e),
        }

        scene
    }
}

fn pokemon_scene(scene: &mut CardScene, name: &str, card: &PokemonCard) {
    scene.push_image(ImageRef::bounded(
        type_icon_key(card.pokemon_type.as_str()),
        ICON_X,
        ICON_Y,
        ICON_BOUNDS,
    ));

    let mut display_name = name.to_string();
    if let PokemonEra::SunMoon {
        gx,
        tag_team_gx,
        prism_star,
        ultra_beast,
    } = &card.era
    {
        if *tag_team_gx {
            scene.push_text(body("TAG TEAM", MARGIN_X, 40.0, 200.0, 22.0).with_fill("#1d4fa3"));
        }
        if *ultra_beast {
            scene.push_text(body("Ultra Beast", 300.0, 40.0, 200.0, 22.0).with_fill("#7a1fa2"));
        }
        if *gx || *tag_team_gx {
            display_name.push_str("-GX");
        }
        if *prism_star {
            display_name.push_str(" (Prism Star)");
        }
    }

    scene.push_text(title(display_name, 90.0));
    scene.push_text(
        body(format!("HP {}", card.hp), 480.0, 90.0, 150.0, 40.0)
            .with_fill("#c8102e")
            .with_stroke("white", 1.0),
    );

    let mut slot_top = FIRST_SLOT_TOP;
    if let Some(ability) = &card.ability {
        scene.push_text(body(format!("Ability: {}", ability.name), MARGIN_X, slot_top + 36.0, TEXT_WIDTH, 32.0).with_fill("#b3261e"));
        scene.push_text(body(ability.text.clone(), MARGIN_X, slot_top + SLOT_HEIGHT - 8.0, TEXT_WIDTH, 24.0).wrapped());
        slot_top += SLOT_HEIGHT;
    }

    for attack in &card.attacks {
        let cost: Vec<&str> = attack.cost.iter().map(|t| t.as_str()).collect();
        let header = if cost.is_empty() {
            attack.name.clone()
        } else {
            format!("[{}] {}", cost.join(" "), attack.name)
        };
        scene.push_text(body(header, MARGIN_X, slot_top + 36.0, 480.0, 32.0));
        if let Some(damage) = attack.damage_label() {
            scene.push_text(body(damage, 580.0, slot_top + 36.0, 107.0, 36.0));
        }
        if let Some(effect) = &attack.effect_text {
            scene.push_text(body(effect.clone(), MARGIN_X, slot_top + SLOT_HEIGHT - 8.0, TEXT_WIDTH, 24.0).wrapped());
        }
        slot_top += SLOT_HEIGHT;
    }

    let footer = format!(
        "weakness {}   resistance {}   retreat {}",
        dash_if_empty(&card.weakness),
        dash_if_empty(&card.resistance),
        card.retreat_cost
    );
    scene.push_text(body(footer, MARGIN_X, 960.0, TEXT_WIDTH, 24.0));
}

fn trainer_scene(scene: &mut CardScene, name: &str, card: &TrainerCard) {
    scene.push_text(body(format!("Trainer - {}", card.trainer_type), MARGIN_X, 56.0, 400.0, 28.0));

    let mut display_name = name.to_string();
    if card.prism_star {
        display_name.push_str(" (Prism Star)");
    }
    scene.push_text(title(display_name, 104.0));
    scene.push_text(body(card.effect.clone(), MARGIN_X, 900.0, TEXT_WIDTH, 30.0).wrapped());
}

fn energy_scene(scene: &mut CardScene, name: &str, card: &EnergyCard) {
    scene.push_image(ImageRef::bounded(
        type_icon_key(card.energy_type.as_str()),
        ICON_X,
        ICON_Y,
        ICON_BOUNDS,
    ));

    let mut display_name = name.to_string();
    if card.prism_star {
        display_name.push_str(" (Prism Star)");
    }
    scene.push_text(title(display_name, 90.0));
    if !card.effect.is_empty() {
        scene.push_text(body(card.effect.clone(), MARGIN_X, 900.0, TEXT_WIDTH, 30.0).wrapped());
    }
}

fn dash_if_empty(s: &str) -> &str {
    if s.is_empty() {
        "-"
    } else {
        s
    }
}
