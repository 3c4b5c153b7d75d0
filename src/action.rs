use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::sprite::SpriteData;
use crate::state::{PokemonDetail, SpeciesInfo, StageSummary};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    Init,

    NamesDidLoad(Vec<String>),
    NamesDidError(String),

    SearchStart,
    SearchInput(char),
    SearchBackspace,
    SearchCancel,
    SearchSubmit,

    /// Top-level entry into the fetch flow; the search submit, random pick
    /// and list selections all funnel through here.
    Fetch(String),

    PokemonDidLoad { generation: u64, detail: PokemonDetail },
    PokemonDidError { generation: u64, error: String },
    SpeciesDidLoad { generation: u64, species: SpeciesInfo },
    SpeciesDidError { generation: u64, error: String },
    EvolutionDidLoad { generation: u64, stages: Vec<String> },
    EvolutionDidError { generation: u64, error: String },

    SummaryDidLoad(StageSummary),
    SummaryDidError { name: String, error: String },

    SpriteDidLoad { url: String, sprite: SpriteData },
    SpriteDidError { url: String, error: String },

    ShinyToggle,
    FavoriteToggle,
    FavoritesDidSave,
    FavoritesDidError(String),

    EvolutionSelect(usize),
    FavoriteSelect(usize),

    FocusNext,
    FocusPrev,

    UiTerminalResize(u16, u16),
    Tick,
    Quit,
}
