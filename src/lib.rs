//! Pokemon search TUI
//!
//! This library exposes the application modules for testing.

pub mod action;
pub mod api;
pub mod effect;
pub mod persist;
pub mod reducer;
pub mod sprite;
pub mod state;
pub mod ui;

use crate::state::{AppState, FocusArea};
use tui_dispatch::EventRoutingState;

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum PokeComponentId {
    Card,
    Evolution,
    Favorites,
    Search,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PokeContext {
    Card,
    Evolution,
    Favorites,
    Search,
}

impl EventRoutingState<PokeComponentId, PokeContext> for AppState {
    fn focused(&self) -> Option<PokeComponentId> {
        if self.search.active {
            return Some(PokeComponentId::Search);
        }
        match self.focus {
            FocusArea::Card => Some(PokeComponentId::Card),
            FocusArea::Evolution => Some(PokeComponentId::Evolution),
            FocusArea::Favorites => Some(PokeComponentId::Favorites),
        }
    }

    fn modal(&self) -> Option<PokeComponentId> {
        if self.search.active {
            Some(PokeComponentId::Search)
        } else {
            None
        }
    }

    fn binding_context(&self, id: PokeComponentId) -> PokeContext {
        match id {
            PokeComponentId::Card => PokeContext::Card,
            PokeComponentId::Evolution => PokeContext::Evolution,
            PokeComponentId::Favorites => PokeContext::Favorites,
            PokeComponentId::Search => PokeContext::Search,
        }
    }

    fn default_context(&self) -> PokeContext {
        PokeContext::Card
    }
}
