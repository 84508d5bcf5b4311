//! Card records and the scenes drawn from them.

pub mod model;
pub mod scene;
pub mod template;

pub use model::{Ability, Attack, Card, CardKind, EnergyCard, PokemonCard, PokemonEra, PokemonType, TrainerCard, TrainerType};
pub use scene::{CardScene, FontSpec, ImageRef, StrokeSpec, TextBlockSpec};
