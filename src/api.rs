//! PokeAPI client

use std::sync::OnceLock;

use serde::Deserialize;
use tokio::sync::Semaphore;

use crate::state::{PokemonAbility, PokemonDetail, PokemonStat, SpeciesInfo, StageSummary};

const API_BASE: &str = "https://pokeapi.co/api/v2";
const SUMMARY_CONCURRENCY: usize = 8;
pub const NO_DESCRIPTION: &str = "No description available.";

#[derive(Debug)]
pub enum ApiError {
    /// The remote source answered with a non-success status for an entity.
    NotFound(String),
    Request(reqwest::Error),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::NotFound(query) => write!(f, "Pokemon not found: {query}"),
            ApiError::Request(e) => write!(f, "Request failed: {e}"),
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u16,
    name: String,
    height: u16,
    weight: u16,
    types: Vec<PokemonTypeSlot>,
    stats: Vec<PokemonStatSlot>,
    abilities: Vec<PokemonAbilitySlot>,
    sprites: serde_json::Value,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u16,
    stat: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonAbilitySlot {
    ability: NamedResource,
    is_hidden: bool,
}

#[derive(Clone, Debug, Deserialize)]
struct SpeciesResponse {
    name: String,
    flavor_text_entries: Vec<FlavorTextEntry>,
    evolution_chain: Option<ApiResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct ApiResource {
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct FlavorTextEntry {
    flavor_text: String,
    language: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct EvolutionChainResponse {
    chain: ChainLink,
}

#[derive(Clone, Debug, Deserialize)]
struct ChainLink {
    species: NamedResource,
    evolves_to: Vec<ChainLink>,
}

pub async fn fetch_names(limit: usize) -> Result<Vec<String>, ApiError> {
    let url = format!("{API_BASE}/pokemon?limit={limit}");
    let response: ListResponse = fetch_json(&url).await?;
    Ok(response
        .results
        .into_iter()
        .map(|entry| entry.name)
        .collect())
}

pub async fn fetch_pokemon(query: &str) -> Result<PokemonDetail, ApiError> {
    let query = query.trim().to_ascii_lowercase();
    let url = format!("{API_BASE}/pokemon/{query}");
    let response = http_client()
        .get(&url)
        .send()
        .await
        .map_err(ApiError::Request)?;
    if !response.status().is_success() {
        return Err(ApiError::NotFound(query));
    }
    let response: PokemonResponse = response.json().await.map_err(ApiError::Request)?;

    let types = response
        .types
        .into_iter()
        .map(|slot| slot.type_info.name)
        .collect();
    let stats = response
        .stats
        .into_iter()
        .map(|slot| PokemonStat {
            name: slot.stat.name,
            value: slot.base_stat,
        })
        .collect();
    let abilities = response
        .abilities
        .into_iter()
        .map(|slot| PokemonAbility {
            name: slot.ability.name,
            is_hidden: slot.is_hidden,
        })
        .collect();

    Ok(PokemonDetail {
        id: response.id,
        name: response.name,
        types,
        stats,
        abilities,
        height: response.height,
        weight: response.weight,
        sprite_front_default: pointer_string(&response.sprites, "/front_default"),
        sprite_front_shiny: pointer_string(&response.sprites, "/front_shiny"),
    })
}

pub async fn fetch_species(id: u16) -> Result<SpeciesInfo, ApiError> {
    let url = format!("{API_BASE}/pokemon-species/{id}");
    let response: SpeciesResponse = fetch_json(&url).await?;
    Ok(SpeciesInfo {
        name: response.name,
        description: english_flavor_text(&response.flavor_text_entries),
        evolution_chain_url: response.evolution_chain.map(|chain| chain.url),
    })
}

/// Fetch a chain tree and linearize it by always following the first
/// listed next stage. Branching evolutions beyond index 0 are ignored.
pub async fn fetch_evolution_stages(url: &str) -> Result<Vec<String>, ApiError> {
    let response: EvolutionChainResponse = fetch_json(url).await?;
    Ok(linearize_first_branch(&response.chain))
}

/// Thumbnail fetch for a single evolution or favorites entry. All summary
/// fetches share one process-wide limiter so long chains and large favorite
/// lists cannot flood the remote API.
pub async fn fetch_stage_summary(name: &str) -> Result<StageSummary, ApiError> {
    // The limiter is never closed, so acquire cannot fail in practice.
    let _permit = summary_limiter().acquire().await.ok();
    let url = format!("{API_BASE}/pokemon/{name}");
    let response: PokemonResponse = fetch_json(&url).await?;
    Ok(StageSummary {
        name: response.name,
        id: response.id,
        sprite_front_default: pointer_string(&response.sprites, "/front_default"),
    })
}

pub async fn fetch_bytes(url: &str) -> Result<Vec<u8>, ApiError> {
    let response = http_client()
        .get(url)
        .send()
        .await
        .map_err(ApiError::Request)?;
    let response = response.error_for_status().map_err(ApiError::Request)?;
    let bytes = response.bytes().await.map_err(ApiError::Request)?;
    Ok(bytes.to_vec())
}

fn english_flavor_text(entries: &[FlavorTextEntry]) -> String {
    entries
        .iter()
        .find(|entry| entry.language.name == "en")
        .map(|entry| sanitize_text(&entry.flavor_text))
        .unwrap_or_else(|| NO_DESCRIPTION.to_string())
}

fn sanitize_text(text: &str) -> String {
    text.replace('\u{000C}', " ").replace('\n', " ")
}

fn linearize_first_branch(chain: &ChainLink) -> Vec<String> {
    let mut stages = Vec::new();
    let mut current = Some(chain);
    while let Some(link) = current {
        stages.push(link.species.name.clone());
        current = link.evolves_to.first();
    }
    stages
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

async fn fetch_json<T: serde::de::DeserializeOwned>(url: &str) -> Result<T, ApiError> {
    let response = http_client()
        .get(url)
        .send()
        .await
        .map_err(ApiError::Request)?;
    let response = response.error_for_status().map_err(ApiError::Request)?;
    response.json().await.map_err(ApiError::Request)
}

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(reqwest::Client::new)
}

fn summary_limiter() -> &'static Semaphore {
    static LIMITER: OnceLock<Semaphore> = OnceLock::new();
    LIMITER.get_or_init(|| Semaphore::new(SUMMARY_CONCURRENCY))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(name: &str, evolves_to: Vec<ChainLink>) -> ChainLink {
        ChainLink {
            species: NamedResource {
                name: name.to_string(),
            },
            evolves_to,
        }
    }

    fn entry(language: &str, text: &str) -> FlavorTextEntry {
        FlavorTextEntry {
            flavor_text: text.to_string(),
            language: NamedResource {
                name: language.to_string(),
            },
        }
    }

    #[test]
    fn linearize_single_stage() {
        let chain = link("ditto", Vec::new());
        assert_eq!(linearize_first_branch(&chain), vec!["ditto"]);
    }

    #[test]
    fn linearize_linear_chain_keeps_order() {
        let chain = link(
            "bulbasaur",
            vec![link("ivysaur", vec![link("venusaur", Vec::new())])],
        );
        assert_eq!(
            linearize_first_branch(&chain),
            vec!["bulbasaur", "ivysaur", "venusaur"]
        );
    }

    #[test]
    fn linearize_branching_chain_takes_first_branch_only() {
        // eevee -> {vaporeon, jolteon, flareon}: only the first branch
        // is surfaced.
        let chain = link(
            "eevee",
            vec![
                link("vaporeon", Vec::new()),
                link("jolteon", Vec::new()),
                link("flareon", Vec::new()),
            ],
        );
        assert_eq!(linearize_first_branch(&chain), vec!["eevee", "vaporeon"]);
    }

    #[test]
    fn flavor_text_picks_first_english_entry() {
        let entries = vec![
            entry("fr", "Quand il est né"),
            entry("en", "When it is\u{000C}born,\nit has seeds."),
            entry("en", "A second entry."),
        ];
        assert_eq!(
            english_flavor_text(&entries),
            "When it is born, it has seeds."
        );
    }

    #[test]
    fn flavor_text_falls_back_without_english_entry() {
        let entries = vec![entry("fr", "Quand il est né"), entry("ja", "タネが")];
        assert_eq!(english_flavor_text(&entries), NO_DESCRIPTION);
    }
}
