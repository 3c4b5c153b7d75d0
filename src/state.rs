//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::sprite::SpriteData;
use std::collections::HashMap;

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
}

/// A single species/form record as rendered on the card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonDetail {
    pub id: u16,
    pub name: String,
    pub types: Vec<String>,
    pub stats: Vec<PokemonStat>,
    pub abilities: Vec<PokemonAbility>,
    /// Decimeters, displayed divided by ten.
    pub height: u16,
    /// Hectograms, displayed divided by ten.
    pub weight: u16,
    pub sprite_front_default: Option<String>,
    pub sprite_front_shiny: Option<String>,
}

impl PokemonDetail {
    /// Sprite URL for the requested display mode, falling back to the
    /// default sprite when no shiny art exists.
    pub fn sprite_url(&self, shiny: bool) -> Option<&str> {
        if shiny {
            self.sprite_front_shiny
                .as_deref()
                .or(self.sprite_front_default.as_deref())
        } else {
            self.sprite_front_default.as_deref()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonStat {
    pub name: String,
    pub value: u16,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PokemonAbility {
    pub name: String,
    pub is_hidden: bool,
}

/// Species metadata backing the description panel and the evolution chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpeciesInfo {
    pub name: String,
    pub description: String,
    pub evolution_chain_url: Option<String>,
}

/// Thumbnail data for evolution and favorites list entries.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StageSummary {
    pub name: String,
    pub id: u16,
    pub sprite_front_default: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum FocusArea {
    Card,
    Evolution,
    Favorites,
}

#[derive(Clone, Debug, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    pub focus: FocusArea,
    pub search: SearchState,

    /// Known names from the list endpoint; feeds random pick and the
    /// debounced lookup while typing.
    pub names: Vec<String>,
    pub names_limit: usize,

    /// Request generation for the top-level fetch flow. Completion actions
    /// echo the generation they were issued under; stale ones are dropped.
    pub generation: u64,

    /// The single current entity: Empty -> Loading -> Loaded/Failed.
    /// Loading and Failed both suppress the card.
    pub pokemon: DataResource<PokemonDetail>,
    pub description: Option<String>,
    pub shiny: bool,

    /// Linearized evolution stage names, root first.
    pub evolution: Vec<String>,
    pub evolution_selected: usize,

    /// Favorited names, insertion order, no duplicates.
    pub favorites: Vec<String>,
    pub favorites_selected: usize,

    /// Thumbnail cache shared by the evolution and favorites lists.
    pub summaries: HashMap<String, StageSummary>,
    /// Decoded sprites keyed by source URL.
    pub sprites: HashMap<String, SpriteData>,

    pub names_loading: bool,
    pub evolution_loading: bool,
    pub sprite_loading: bool,
    pub message: Option<String>,
    pub tick: u64,
}

impl AppState {
    pub fn new(favorites: Vec<String>, names_limit: usize) -> Self {
        Self {
            terminal_size: (80, 24),
            focus: FocusArea::Card,
            search: SearchState::default(),
            names: Vec::new(),
            names_limit,
            generation: 0,
            pokemon: DataResource::Empty,
            description: None,
            shiny: false,
            evolution: Vec::new(),
            evolution_selected: 0,
            favorites,
            favorites_selected: 0,
            summaries: HashMap::new(),
            sprites: HashMap::new(),
            names_loading: false,
            evolution_loading: false,
            sprite_loading: false,
            message: None,
            tick: 0,
        }
    }

    pub fn current_detail(&self) -> Option<&PokemonDetail> {
        self.pokemon.data()
    }

    pub fn current_name(&self) -> Option<String> {
        self.pokemon.data().map(|detail| detail.name.clone())
    }

    pub fn is_favorite(&self, name: &str) -> bool {
        self.favorites.iter().any(|fav| fav == name)
    }

    pub fn is_loading(&self) -> bool {
        self.pokemon.is_loading()
            || self.names_loading
            || self.evolution_loading
            || self.sprite_loading
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            FocusArea::Card => FocusArea::Evolution,
            FocusArea::Evolution => FocusArea::Favorites,
            FocusArea::Favorites => FocusArea::Card,
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            FocusArea::Card => FocusArea::Favorites,
            FocusArea::Evolution => FocusArea::Card,
            FocusArea::Favorites => FocusArea::Evolution,
        };
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Vec::new(), 1000)
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("Current")
                .entry("pokemon", ron_string(&self.current_name()))
                .entry("generation", ron_string(&self.generation))
                .entry("shiny", ron_string(&self.shiny))
                .entry("description", ron_string(&self.description.is_some()))
                .entry("focus", ron_string(&self.focus)),
            DebugSection::new("Lists")
                .entry("names", ron_string(&self.names.len()))
                .entry("evolution", ron_string(&self.evolution))
                .entry("evolution_selected", ron_string(&self.evolution_selected))
                .entry("favorites", ron_string(&self.favorites))
                .entry("favorites_selected", ron_string(&self.favorites_selected))
                .entry("summaries", ron_string(&self.summaries.len())),
            DebugSection::new("Status")
                .entry("search", ron_string(&self.search.query))
                .entry("search_active", ron_string(&self.search.active))
                .entry("names_loading", ron_string(&self.names_loading))
                .entry("evolution_loading", ron_string(&self.evolution_loading))
                .entry("sprite_loading", ron_string(&self.sprite_loading))
                .entry("message", ron_string(&self.message)),
        ]
    }
}
