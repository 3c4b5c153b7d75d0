use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::Rng;
use ratatui::{backend::CrosstermBackend, Terminal};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventKind,
    HandlerResponse, Keybindings, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokesearch::action::Action;
use pokesearch::effect::Effect;
use pokesearch::persist::{self, FavoritesStore};
use pokesearch::reducer::reducer;
use pokesearch::state::AppState;
use pokesearch::{api, sprite, ui, PokeComponentId, PokeContext};

const TICK_MS: u64 = 120;
const LOOKUP_DEBOUNCE_MS: u64 = 500;

#[derive(Parser, Debug)]
#[command(name = "pokesearch")]
#[command(about = "Pokemon search TUI with favorites and evolution chains")]
struct Args {
    /// How many names to preload for random pick and lookup
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
    limit: u64,

    /// Override the favorites file location
    #[arg(long)]
    favorites_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let Args {
        limit,
        favorites_file,
        debug: debug_args,
    } = Args::parse();

    let debug = DebugSession::new(debug_args);
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let store_path = favorites_file.unwrap_or_else(FavoritesStore::default_path);
    persist::init_store(store_path);

    let state = debug
        .load_state_or_else_async(move || async move {
            let favorites = match persist::store().load().await {
                Ok(favorites) => favorites,
                Err(error) => {
                    eprintln!("Warning: {error}");
                    Vec::new()
                }
            };
            Ok::<AppState, io::Error>(AppState::new(favorites, limit as usize))
        })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions).await;

    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    Ok(())
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(ui::PokeUi::new()));
    let mut bus: EventBus<AppState, Action, PokeComponentId, PokeContext> = EventBus::new();
    let keybindings: Keybindings<PokeContext> = Keybindings::new();

    let ui_card = Rc::clone(&ui);
    bus.register(PokeComponentId::Card, move |event, state| {
        ui_card.borrow_mut().handle_card_event(&event.kind, state)
    });

    let ui_evolution = Rc::clone(&ui);
    bus.register(PokeComponentId::Evolution, move |event, state| {
        ui_evolution
            .borrow_mut()
            .handle_evolution_event(&event.kind, state)
    });

    let ui_favorites = Rc::clone(&ui);
    bus.register(PokeComponentId::Favorites, move |event, state| {
        ui_favorites
            .borrow_mut()
            .handle_favorites_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(PokeComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    bus.register_global(|event, state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        EventKind::Key(key) => match key.code {
            crossterm::event::KeyCode::Char('q') => HandlerResponse::action(Action::Quit),
            crossterm::event::KeyCode::Tab => HandlerResponse::action(Action::FocusNext),
            crossterm::event::KeyCode::BackTab => HandlerResponse::action(Action::FocusPrev),
            crossterm::event::KeyCode::Char('/') if !state.search.active => {
                HandlerResponse::action(Action::SearchStart)
            }
            crossterm::event::KeyCode::Char('r') if !state.search.active => {
                if state.names.is_empty() {
                    return HandlerResponse::ignored();
                }
                let index = rand::rng().random_range(0..state.names.len());
                HandlerResponse::action(Action::Fetch(state.names[index].clone()))
            }
            _ => HandlerResponse::ignored(),
        },
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime
                    .subscriptions()
                    .interval("tick", Duration::from_millis(TICK_MS), || Action::Tick);
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            handle_effect,
        )
        .await
}

fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>) {
    match effect {
        Effect::LoadNames { limit } => {
            ctx.tasks().spawn(TaskKey::new("names"), async move {
                match api::fetch_names(limit).await {
                    Ok(names) => Action::NamesDidLoad(names),
                    Err(error) => Action::NamesDidError(error.to_string()),
                }
            });
        }
        Effect::LoadPokemon { generation, query } => {
            ctx.tasks().spawn(TaskKey::new("search"), async move {
                match api::fetch_pokemon(&query).await {
                    Ok(detail) => Action::PokemonDidLoad { generation, detail },
                    Err(error) => Action::PokemonDidError {
                        generation,
                        error: error.to_string(),
                    },
                }
            });
        }
        Effect::LookupPokemon { generation, query } => {
            ctx.tasks().debounce(
                "lookup",
                Duration::from_millis(LOOKUP_DEBOUNCE_MS),
                async move {
                    match api::fetch_pokemon(&query).await {
                        Ok(detail) => Action::PokemonDidLoad { generation, detail },
                        Err(error) => Action::PokemonDidError {
                            generation,
                            error: error.to_string(),
                        },
                    }
                },
            );
        }
        Effect::LoadSpecies { generation, id } => {
            ctx.tasks().spawn(TaskKey::new("species"), async move {
                match api::fetch_species(id).await {
                    Ok(species) => Action::SpeciesDidLoad {
                        generation,
                        species,
                    },
                    Err(error) => Action::SpeciesDidError {
                        generation,
                        error: error.to_string(),
                    },
                }
            });
        }
        Effect::LoadEvolution { generation, url } => {
            ctx.tasks().spawn(TaskKey::new("evolution"), async move {
                match api::fetch_evolution_stages(&url).await {
                    Ok(stages) => Action::EvolutionDidLoad { generation, stages },
                    Err(error) => Action::EvolutionDidError {
                        generation,
                        error: error.to_string(),
                    },
                }
            });
        }
        Effect::LoadSummaries { names } => {
            // One task per entry; the API layer bounds how many run at once.
            for name in names {
                let key = format!("summary_{name}");
                ctx.tasks().spawn(TaskKey::new(key), async move {
                    match api::fetch_stage_summary(&name).await {
                        Ok(summary) => Action::SummaryDidLoad(summary),
                        Err(error) => Action::SummaryDidError {
                            name,
                            error: error.to_string(),
                        },
                    }
                });
            }
        }
        Effect::LoadSprite { url } => {
            let key = format!("sprite_{url}");
            ctx.tasks().spawn(TaskKey::new(key), async move {
                match api::fetch_bytes(&url).await {
                    Ok(bytes) => match sprite::decode_sprite(&bytes) {
                        Ok(sprite) => Action::SpriteDidLoad { url, sprite },
                        Err(error) => Action::SpriteDidError { url, error },
                    },
                    Err(error) => Action::SpriteDidError {
                        url,
                        error: error.to_string(),
                    },
                }
            });
        }
        Effect::SaveFavorites { names } => {
            ctx.tasks().spawn(TaskKey::new("save_favorites"), async move {
                match persist::store().save(&names).await {
                    Ok(()) => Action::FavoritesDidSave,
                    Err(error) => Action::FavoritesDidError(error),
                }
            });
        }
    }
}
