use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{AppState, StageSummary};

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            state.names_loading = true;
            state.message = None;
            let mut effects = vec![Effect::LoadNames {
                limit: state.names_limit,
            }];
            let missing = missing_summaries(state, &state.favorites);
            if !missing.is_empty() {
                effects.push(Effect::LoadSummaries { names: missing });
            }
            DispatchResult::changed_with_many(effects)
        }

        Action::NamesDidLoad(names) => {
            state.names_loading = false;
            state.names = names;
            DispatchResult::changed()
        }

        Action::NamesDidError(error) => {
            state.names_loading = false;
            state.message = Some(format!("Name list error: {error}"));
            DispatchResult::changed()
        }

        Action::SearchStart => {
            state.search.active = true;
            state.search.query.clear();
            DispatchResult::changed()
        }

        Action::SearchInput(ch) => {
            state.search.query.push(ch);
            let query = state.search.query.trim().to_ascii_lowercase();
            if state.names.iter().any(|name| name == &query) {
                state.generation = state.generation.wrapping_add(1);
                return DispatchResult::changed_with(Effect::LookupPokemon {
                    generation: state.generation,
                    query,
                });
            }
            DispatchResult::changed()
        }

        Action::SearchBackspace => {
            state.search.query.pop();
            DispatchResult::changed()
        }

        Action::SearchCancel => {
            if !state.search.active && state.search.query.is_empty() {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            state.search.query.clear();
            DispatchResult::changed()
        }

        Action::SearchSubmit => {
            state.search.active = false;
            let query = state.search.query.clone();
            start_fetch(state, &query)
        }

        Action::Fetch(query) => start_fetch(state, &query),

        Action::PokemonDidLoad { generation, detail } => {
            if generation != state.generation {
                return DispatchResult::unchanged();
            }
            state.description = None;
            state.evolution.clear();
            state.evolution_selected = 0;
            state.evolution_loading = false;
            state.message = None;
            let mut effects = vec![Effect::LoadSpecies {
                generation,
                id: detail.id,
            }];
            if let Some(url) = detail.sprite_url(state.shiny) {
                if !state.sprites.contains_key(url) {
                    state.sprite_loading = true;
                    effects.push(Effect::LoadSprite {
                        url: url.to_string(),
                    });
                }
            }
            state.pokemon = DataResource::Loaded(detail);
            DispatchResult::changed_with_many(effects)
        }

        Action::PokemonDidError { generation, error } => {
            if generation != state.generation {
                return DispatchResult::unchanged();
            }
            state.pokemon = DataResource::Failed(error);
            state.description = None;
            state.evolution.clear();
            state.evolution_selected = 0;
            state.evolution_loading = false;
            DispatchResult::changed()
        }

        Action::SpeciesDidLoad {
            generation,
            species,
        } => {
            if generation != state.generation {
                return DispatchResult::unchanged();
            }
            state.description = Some(species.description);
            match species.evolution_chain_url {
                Some(url) => {
                    state.evolution_loading = true;
                    DispatchResult::changed_with(Effect::LoadEvolution { generation, url })
                }
                None => DispatchResult::changed(),
            }
        }

        Action::SpeciesDidError { generation, error } => {
            if generation != state.generation {
                return DispatchResult::unchanged();
            }
            state.message = Some(format!("Species error: {error}"));
            DispatchResult::changed()
        }

        Action::EvolutionDidLoad { generation, stages } => {
            if generation != state.generation {
                return DispatchResult::unchanged();
            }
            state.evolution_loading = false;
            state.evolution = stages;
            sync_evolution_selection(state);
            let missing = missing_summaries(state, &state.evolution);
            if missing.is_empty() {
                DispatchResult::changed()
            } else {
                DispatchResult::changed_with(Effect::LoadSummaries { names: missing })
            }
        }

        Action::EvolutionDidError { generation, error } => {
            if generation != state.generation {
                return DispatchResult::unchanged();
            }
            state.evolution_loading = false;
            state.message = Some(format!("Evolution error: {error}"));
            DispatchResult::changed()
        }

        Action::SummaryDidLoad(summary) => {
            state.summaries.insert(summary.name.clone(), summary);
            DispatchResult::changed()
        }

        Action::SummaryDidError { name, error } => {
            // A failed stage is dropped from the chain display; a failed
            // favorite keeps its entry, only the id stays unknown.
            if let Some(pos) = state.evolution.iter().position(|stage| stage == &name) {
                state.evolution.remove(pos);
                state.evolution_selected = state
                    .evolution_selected
                    .min(state.evolution.len().saturating_sub(1));
            }
            state.message = Some(format!("{name} entry error: {error}"));
            DispatchResult::changed()
        }

        Action::SpriteDidLoad { url, sprite } => {
            state.sprites.insert(url, sprite);
            state.sprite_loading = false;
            DispatchResult::changed()
        }

        Action::SpriteDidError { url: _, error } => {
            state.sprite_loading = false;
            state.message = Some(format!("Sprite error: {error}"));
            DispatchResult::changed()
        }

        Action::ShinyToggle => {
            state.shiny = !state.shiny;
            let url = state
                .current_detail()
                .and_then(|detail| detail.sprite_url(state.shiny))
                .map(str::to_string);
            if let Some(url) = url {
                if !state.sprites.contains_key(&url) {
                    state.sprite_loading = true;
                    return DispatchResult::changed_with(Effect::LoadSprite { url });
                }
            }
            DispatchResult::changed()
        }

        Action::FavoriteToggle => {
            let Some(detail) = state.current_detail() else {
                return DispatchResult::unchanged();
            };
            let name = detail.name.clone();
            let summary = StageSummary {
                name: name.clone(),
                id: detail.id,
                sprite_front_default: detail.sprite_front_default.clone(),
            };
            if let Some(pos) = state.favorites.iter().position(|fav| fav == &name) {
                state.favorites.remove(pos);
            } else {
                state.favorites.push(name.clone());
                // Summary comes straight from the loaded card.
                state.summaries.entry(name).or_insert(summary);
            }
            state.favorites_selected = state
                .favorites_selected
                .min(state.favorites.len().saturating_sub(1));
            DispatchResult::changed_with(Effect::SaveFavorites {
                names: state.favorites.clone(),
            })
        }

        Action::FavoritesDidSave => DispatchResult::unchanged(),

        Action::FavoritesDidError(error) => {
            state.message = Some(format!("Favorites error: {error}"));
            DispatchResult::changed()
        }

        Action::EvolutionSelect(index) => {
            let Some(name) = state.evolution.get(index).cloned() else {
                return DispatchResult::unchanged();
            };
            let same_selection = index == state.evolution_selected
                && state.current_name().as_deref() == Some(name.as_str());
            if same_selection {
                return DispatchResult::unchanged();
            }
            state.evolution_selected = index;
            start_fetch(state, &name)
        }

        Action::FavoriteSelect(index) => {
            let Some(name) = state.favorites.get(index).cloned() else {
                return DispatchResult::unchanged();
            };
            let same_selection = index == state.favorites_selected
                && state.current_name().as_deref() == Some(name.as_str());
            if same_selection {
                return DispatchResult::unchanged();
            }
            state.favorites_selected = index;
            start_fetch(state, &name)
        }

        Action::FocusNext => {
            if state.search.active {
                return DispatchResult::unchanged();
            }
            state.focus_next();
            DispatchResult::changed()
        }

        Action::FocusPrev => {
            if state.search.active {
                return DispatchResult::unchanged();
            }
            state.focus_prev();
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size != (width, height) {
                state.terminal_size = (width, height);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Tick => {
            if state.is_loading() {
                state.tick = state.tick.wrapping_add(1);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Shared entry for submit, random pick and list selections. Each call gets
/// a fresh generation; older in-flight responses become stale.
fn start_fetch(state: &mut AppState, query: &str) -> DispatchResult<Effect> {
    let query = query.trim().to_ascii_lowercase();
    if query.is_empty() {
        state.message = Some("Enter a Pokemon name or ID.".to_string());
        return DispatchResult::changed();
    }
    state.generation = state.generation.wrapping_add(1);
    state.pokemon = DataResource::Loading;
    state.message = None;
    DispatchResult::changed_with(Effect::LoadPokemon {
        generation: state.generation,
        query,
    })
}

fn missing_summaries(state: &AppState, names: &[String]) -> Vec<String> {
    names
        .iter()
        .filter(|name| !state.summaries.contains_key(*name))
        .cloned()
        .collect()
}

fn sync_evolution_selection(state: &mut AppState) {
    let Some(name) = state.current_name() else {
        return;
    };
    if let Some(index) = state.evolution.iter().position(|stage| stage == &name) {
        state.evolution_selected = index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{PokemonDetail, SpeciesInfo};

    fn detail(name: &str, id: u16) -> PokemonDetail {
        PokemonDetail {
            id,
            name: name.to_string(),
            types: vec!["electric".to_string()],
            stats: Vec::new(),
            abilities: Vec::new(),
            height: 4,
            weight: 60,
            sprite_front_default: Some(format!("https://sprites/{id}.png")),
            sprite_front_shiny: Some(format!("https://sprites/shiny/{id}.png")),
        }
    }

    fn loaded(state: &mut AppState, name: &str, id: u16) {
        let result = reducer(state, Action::Fetch(name.to_string()));
        assert!(result.changed);
        let generation = state.generation;
        reducer(
            state,
            Action::PokemonDidLoad {
                generation,
                detail: detail(name, id),
            },
        );
    }

    #[test]
    fn fetch_sets_loading_and_bumps_generation() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::Fetch("Pikachu".to_string()));

        assert!(result.changed);
        assert!(state.pokemon.is_loading());
        assert_eq!(state.generation, 1);
        assert_eq!(
            result.effects,
            vec![Effect::LoadPokemon {
                generation: 1,
                query: "pikachu".to_string(),
            }]
        );
    }

    #[test]
    fn empty_query_prompts_without_fetching() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::Fetch("  ".to_string()));

        assert!(result.changed);
        assert!(result.effects.is_empty());
        assert!(state.pokemon.is_empty());
        assert!(state.message.is_some());
    }

    #[test]
    fn stale_generation_is_discarded() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Fetch("pikachu".to_string()));
        reducer(&mut state, Action::Fetch("raichu".to_string()));
        assert_eq!(state.generation, 2);

        // The first request resolves late; it must not clobber the second.
        let result = reducer(
            &mut state,
            Action::PokemonDidLoad {
                generation: 1,
                detail: detail("pikachu", 25),
            },
        );
        assert!(!result.changed);
        assert!(state.pokemon.is_loading());

        let result = reducer(
            &mut state,
            Action::PokemonDidLoad {
                generation: 2,
                detail: detail("raichu", 26),
            },
        );
        assert!(result.changed);
        assert_eq!(state.current_name().as_deref(), Some("raichu"));
    }

    #[test]
    fn not_found_suppresses_card_and_dependent_sections() {
        let mut state = AppState::default();
        loaded(&mut state, "pikachu", 25);
        state.evolution = vec!["pichu".to_string(), "pikachu".to_string()];
        state.description = Some("A mouse.".to_string());

        reducer(&mut state, Action::Fetch("missingno".to_string()));
        let generation = state.generation;
        let result = reducer(
            &mut state,
            Action::PokemonDidError {
                generation,
                error: "Pokemon not found: missingno".to_string(),
            },
        );

        assert!(result.changed);
        assert!(matches!(state.pokemon, DataResource::Failed(_)));
        assert!(state.description.is_none());
        assert!(state.evolution.is_empty());
    }

    #[test]
    fn load_fans_out_species_and_sprite() {
        let mut state = AppState::default();
        reducer(&mut state, Action::Fetch("pikachu".to_string()));
        let result = reducer(
            &mut state,
            Action::PokemonDidLoad {
                generation: 1,
                detail: detail("pikachu", 25),
            },
        );

        assert!(matches!(
            result.effects[0],
            Effect::LoadSpecies {
                generation: 1,
                id: 25
            }
        ));
        assert!(matches!(result.effects[1], Effect::LoadSprite { .. }));
        assert!(state.sprite_loading);
    }

    #[test]
    fn species_load_triggers_evolution_fetch() {
        let mut state = AppState::default();
        loaded(&mut state, "pikachu", 25);
        let generation = state.generation;

        let result = reducer(
            &mut state,
            Action::SpeciesDidLoad {
                generation,
                species: SpeciesInfo {
                    name: "pikachu".to_string(),
                    description: "A mouse.".to_string(),
                    evolution_chain_url: Some("https://chains/10".to_string()),
                },
            },
        );

        assert_eq!(state.description.as_deref(), Some("A mouse."));
        assert!(state.evolution_loading);
        assert_eq!(
            result.effects,
            vec![Effect::LoadEvolution {
                generation,
                url: "https://chains/10".to_string(),
            }]
        );
    }

    #[test]
    fn evolution_load_requests_missing_summaries_and_syncs_selection() {
        let mut state = AppState::default();
        loaded(&mut state, "pikachu", 25);
        let generation = state.generation;

        let result = reducer(
            &mut state,
            Action::EvolutionDidLoad {
                generation,
                stages: vec![
                    "pichu".to_string(),
                    "pikachu".to_string(),
                    "raichu".to_string(),
                ],
            },
        );

        assert_eq!(state.evolution_selected, 1);
        assert_eq!(
            result.effects,
            vec![Effect::LoadSummaries {
                names: vec![
                    "pichu".to_string(),
                    "pikachu".to_string(),
                    "raichu".to_string(),
                ],
            }]
        );
    }

    #[test]
    fn favorite_toggle_pair_is_idempotent() {
        let mut state = AppState::default();
        loaded(&mut state, "pikachu", 25);

        let result = reducer(&mut state, Action::FavoriteToggle);
        assert_eq!(state.favorites, vec!["pikachu".to_string()]);
        assert_eq!(
            result.effects,
            vec![Effect::SaveFavorites {
                names: vec!["pikachu".to_string()],
            }]
        );

        let result = reducer(&mut state, Action::FavoriteToggle);
        assert!(state.favorites.is_empty());
        assert_eq!(
            result.effects,
            vec![Effect::SaveFavorites { names: Vec::new() }]
        );
    }

    #[test]
    fn favorites_never_duplicate() {
        let mut state = AppState::default();
        loaded(&mut state, "pikachu", 25);
        for _ in 0..5 {
            reducer(&mut state, Action::FavoriteToggle);
        }
        assert_eq!(state.favorites, vec!["pikachu".to_string()]);

        loaded(&mut state, "eevee", 133);
        reducer(&mut state, Action::FavoriteToggle);
        assert_eq!(
            state.favorites,
            vec!["pikachu".to_string(), "eevee".to_string()]
        );
    }

    #[test]
    fn favorite_toggle_without_current_entity_is_ignored() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::FavoriteToggle);
        assert!(!result.changed);
        assert!(state.favorites.is_empty());
    }

    #[test]
    fn shiny_toggle_fetches_uncached_sprite() {
        let mut state = AppState::default();
        loaded(&mut state, "pikachu", 25);
        state.sprite_loading = false;

        let result = reducer(&mut state, Action::ShinyToggle);
        assert!(state.shiny);
        assert_eq!(
            result.effects,
            vec![Effect::LoadSprite {
                url: "https://sprites/shiny/25.png".to_string(),
            }]
        );

        // Toggling back hits the default URL which is already pending from
        // the initial load, so once cached no new fetch is issued.
        state
            .sprites
            .insert("https://sprites/25.png".to_string(), crate::sprite::SpriteData {
                width: 1,
                height: 1,
                rgba: vec![0, 0, 0, 255],
            });
        let result = reducer(&mut state, Action::ShinyToggle);
        assert!(!state.shiny);
        assert!(result.effects.is_empty());
    }

    #[test]
    fn evolution_select_reenters_fetch_flow() {
        let mut state = AppState::default();
        loaded(&mut state, "pikachu", 25);
        state.evolution = vec![
            "pichu".to_string(),
            "pikachu".to_string(),
            "raichu".to_string(),
        ];
        state.evolution_selected = 1;
        let before = state.generation;

        let result = reducer(&mut state, Action::EvolutionSelect(2));
        assert_eq!(state.evolution_selected, 2);
        assert_eq!(state.generation, before + 1);
        assert_eq!(
            result.effects,
            vec![Effect::LoadPokemon {
                generation: before + 1,
                query: "raichu".to_string(),
            }]
        );

        // Re-selecting the already-current stage is a no-op.
        loaded(&mut state, "raichu", 26);
        let result = reducer(&mut state, Action::EvolutionSelect(2));
        assert!(!result.changed);
    }

    #[test]
    fn failed_summary_drops_evolution_stage_but_keeps_favorite() {
        let mut state = AppState::default();
        state.evolution = vec!["pichu".to_string(), "pikachu".to_string()];
        state.favorites = vec!["pichu".to_string()];

        reducer(
            &mut state,
            Action::SummaryDidError {
                name: "pichu".to_string(),
                error: "timeout".to_string(),
            },
        );

        assert_eq!(state.evolution, vec!["pikachu".to_string()]);
        assert_eq!(state.favorites, vec!["pichu".to_string()]);
        assert!(state.message.is_some());
    }

    #[test]
    fn typing_a_known_name_dispatches_debounced_lookup() {
        let mut state = AppState::default();
        state.names = vec!["mew".to_string()];
        reducer(&mut state, Action::SearchStart);
        reducer(&mut state, Action::SearchInput('m'));
        reducer(&mut state, Action::SearchInput('e'));
        let result = reducer(&mut state, Action::SearchInput('w'));

        assert_eq!(
            result.effects,
            vec![Effect::LookupPokemon {
                generation: 1,
                query: "mew".to_string(),
            }]
        );
    }

    #[test]
    fn tick_only_renders_while_loading() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::Tick);
        assert!(!result.changed);

        reducer(&mut state, Action::Fetch("pikachu".to_string()));
        let result = reducer(&mut state, Action::Tick);
        assert!(result.changed);
        assert_eq!(state.tick, 1);
    }
}
