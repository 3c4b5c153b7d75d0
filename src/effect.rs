//! Effects - side effects declared by the reducer

#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadNames { limit: usize },
    /// Immediate entity fetch (submit, random pick, list selection).
    LoadPokemon { generation: u64, query: String },
    /// Debounced entity fetch fired while typing a known name.
    LookupPokemon { generation: u64, query: String },
    LoadSpecies { generation: u64, id: u16 },
    LoadEvolution { generation: u64, url: String },
    /// One bounded fetch per name; each completes or fails independently.
    LoadSummaries { names: Vec<String> },
    LoadSprite { url: String },
    /// Full rewrite of the persisted favorites list.
    SaveFavorites { names: Vec<String> },
}
