use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};
use tui_dispatch::{Component, EventContext, EventKind, HandlerResponse, RenderContext};
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, SelectList, SelectListBehavior, SelectListProps, SelectListStyle,
    SelectionStyle, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps, StatusBarSection,
    StatusBarStyle,
};

use crate::action::Action;
use crate::sprite;
use crate::state::{AppState, FocusArea, PokemonDetail, PokemonStat};

const BG_BASE: Color = Color::Rgb(14, 16, 26);
const BG_PANEL: Color = Color::Rgb(24, 28, 44);
const BG_PANEL_ALT: Color = Color::Rgb(32, 38, 58);
const BG_HIGHLIGHT: Color = Color::Rgb(64, 78, 128);
const TEXT_MAIN: Color = Color::Rgb(236, 240, 246);
const TEXT_DIM: Color = Color::Rgb(168, 178, 200);
const ACCENT_RED: Color = Color::Rgb(229, 93, 93);
const ACCENT_GOLD: Color = Color::Rgb(240, 198, 92);

const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];
const STAT_MAX: u16 = 255;
const STAT_BAR_WIDTH: u16 = 20;

pub struct PokeUi {
    evolution_list: SelectList,
    favorites_list: SelectList,
    status_bar: StatusBar,
}

impl PokeUi {
    pub fn new() -> Self {
        Self {
            evolution_list: SelectList::new(),
            favorites_list: SelectList::new(),
            status_bar: StatusBar::new(),
        }
    }

    pub fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<crate::PokeComponentId>,
    ) {
        render_app(
            frame,
            area,
            state,
            render_ctx,
            event_ctx,
            &mut self.evolution_list,
            &mut self.favorites_list,
            &mut self.status_bar,
        );
    }

    pub fn handle_card_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        handle_card_event(event, state)
    }

    pub fn handle_evolution_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        handle_evolution_event(event, state, &mut self.evolution_list)
    }

    pub fn handle_favorites_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        handle_favorites_event(event, state, &mut self.favorites_list)
    }

    pub fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        handle_search_event(event, state)
    }
}

impl Default for PokeUi {
    fn default() -> Self {
        Self::new()
    }
}

pub fn handle_card_event(event: &EventKind, _state: &AppState) -> HandlerResponse<Action> {
    let actions = match event {
        EventKind::Key(key) => match key.code {
            crossterm::event::KeyCode::Char('s') => vec![Action::ShinyToggle],
            crossterm::event::KeyCode::Char('f') => vec![Action::FavoriteToggle],
            _ => vec![],
        },
        _ => vec![],
    };
    handler_response(actions)
}

pub fn handle_evolution_event(
    event: &EventKind,
    state: &AppState,
    evolution_list: &mut SelectList,
) -> HandlerResponse<Action> {
    let items = evolution_items(state);
    if items.is_empty() {
        return HandlerResponse::ignored();
    }
    let props = SelectListProps {
        items: &items,
        count: items.len(),
        selected: state
            .evolution_selected
            .min(items.len().saturating_sub(1)),
        is_focused: true,
        style: side_list_style(),
        behavior: SelectListBehavior {
            show_scrollbar: true,
            wrap_navigation: false,
        },
        on_select: Action::EvolutionSelect,
        render_item: &|item| item.clone(),
    };
    let actions: Vec<_> = evolution_list
        .handle_event(event, props)
        .into_iter()
        .collect();
    handler_response(actions)
}

pub fn handle_favorites_event(
    event: &EventKind,
    state: &AppState,
    favorites_list: &mut SelectList,
) -> HandlerResponse<Action> {
    let items = favorite_items(state);
    if items.is_empty() {
        return HandlerResponse::ignored();
    }
    let props = SelectListProps {
        items: &items,
        count: items.len(),
        selected: state
            .favorites_selected
            .min(items.len().saturating_sub(1)),
        is_focused: true,
        style: side_list_style(),
        behavior: SelectListBehavior {
            show_scrollbar: true,
            wrap_navigation: false,
        },
        on_select: Action::FavoriteSelect,
        render_item: &|item| item.clone(),
    };
    let actions: Vec<_> = favorites_list
        .handle_event(event, props)
        .into_iter()
        .collect();
    handler_response(actions)
}

pub fn handle_search_event(event: &EventKind, _state: &AppState) -> HandlerResponse<Action> {
    let actions = match event {
        EventKind::Key(key) => match key.code {
            crossterm::event::KeyCode::Esc => vec![Action::SearchCancel],
            crossterm::event::KeyCode::Enter => vec![Action::SearchSubmit],
            crossterm::event::KeyCode::Backspace => vec![Action::SearchBackspace],
            crossterm::event::KeyCode::Char(ch) => vec![Action::SearchInput(ch)],
            _ => vec![],
        },
        _ => vec![],
    };
    handler_response(actions)
}

fn handler_response(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn render_app(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    _render_ctx: RenderContext,
    event_ctx: &mut EventContext<crate::PokeComponentId>,
    evolution_list: &mut SelectList,
    favorites_list: &mut SelectList,
    status_bar: &mut StatusBar,
) {
    let base = Block::default().style(Style::default().bg(BG_BASE));
    frame.render_widget(base, area);
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(3),
        ])
        .split(area);

    render_header(frame, layout[0], state, event_ctx);
    render_body(
        frame,
        layout[1],
        state,
        event_ctx,
        evolution_list,
        favorites_list,
    );
    render_footer(frame, layout[2], state, status_bar);
}

fn render_header(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    event_ctx: &mut EventContext<crate::PokeComponentId>,
) {
    if state.search.active {
        event_ctx.set_component_area(crate::PokeComponentId::Search, area);
    }
    let search = if state.search.active {
        format!("/{}_", state.search.query)
    } else if state.search.query.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", state.search.query)
    };
    let mode = if state.shiny { "SHINY" } else { "NORMAL" };
    let header_text = Line::from(vec![
        Span::styled(
            "POKESEARCH",
            Style::default().fg(ACCENT_RED).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  Search: "),
        Span::styled(search, Style::default().fg(ACCENT_GOLD)),
        Span::raw("  |  Sprites: "),
        Span::styled(mode, Style::default().fg(ACCENT_GOLD)),
        Span::raw("  |  Known: "),
        Span::styled(
            state.names.len().to_string(),
            Style::default().fg(TEXT_DIM),
        ),
    ]);

    let block = Block::default()
        .borders(Borders::ALL)
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(Style::default().fg(TEXT_DIM));
    let paragraph = Paragraph::new(header_text)
        .block(block)
        .style(Style::default().fg(TEXT_MAIN));
    frame.render_widget(paragraph, area);
}

fn render_body(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    event_ctx: &mut EventContext<crate::PokeComponentId>,
    evolution_list: &mut SelectList,
    favorites_list: &mut SelectList,
) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(area);

    render_card(frame, layout[0], state, event_ctx);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(layout[1]);
    render_evolution(frame, side[0], state, event_ctx, evolution_list);
    render_favorites(frame, side[1], state, event_ctx, favorites_list);
}

fn render_card(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    event_ctx: &mut EventContext<crate::PokeComponentId>,
) {
    event_ctx.set_component_area(crate::PokeComponentId::Card, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title("POKEMON")
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(focus_border(state, FocusArea::Card));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if state.pokemon.is_loading() {
        let spinner = SPINNER_FRAMES[state.tick as usize % SPINNER_FRAMES.len()];
        frame.render_widget(
            Paragraph::new(format!("{spinner} Loading..."))
                .alignment(Alignment::Center)
                .style(Style::default().fg(TEXT_DIM)),
            inner,
        );
        return;
    }
    if let Some(error) = failed_message(state) {
        frame.render_widget(
            Paragraph::new(error)
                .alignment(Alignment::Center)
                .style(Style::default().fg(ACCENT_RED).add_modifier(Modifier::BOLD))
                .wrap(Wrap { trim: true }),
            inner,
        );
        return;
    }
    let Some(detail) = state.current_detail() else {
        frame.render_widget(
            Paragraph::new("[press / to search, r for a random pick]")
                .alignment(Alignment::Center)
                .style(Style::default().fg(TEXT_DIM)),
            inner,
        );
        return;
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(12), Constraint::Length(5)])
        .split(inner);
    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(42), Constraint::Percentage(58)])
        .split(layout[0]);

    render_sprite(frame, top[0], state, detail);
    frame.render_widget(
        Paragraph::new(profile_text(state, detail)).wrap(Wrap { trim: true }),
        top[1],
    );
    render_description(frame, layout[1], state);
}

fn render_sprite(frame: &mut Frame, area: Rect, state: &AppState, detail: &PokemonDetail) {
    let text = detail
        .sprite_url(state.shiny)
        .and_then(|url| state.sprites.get(url))
        .map(|sprite| sprite::sprite_text(sprite, area.width, area.height));
    match text {
        Some(text) => {
            frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
        }
        None => {
            let content = if state.sprite_loading {
                "[loading sprite]"
            } else {
                "[no sprite]"
            };
            frame.render_widget(
                Paragraph::new(content)
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(TEXT_DIM)),
                area,
            );
        }
    }
}

fn profile_text(state: &AppState, detail: &PokemonDetail) -> Text<'static> {
    let fav = if state.is_favorite(&detail.name) {
        " *"
    } else {
        ""
    };
    let mut title = vec![Span::styled(
        format!("{}  #{:03}{}", detail.name.to_ascii_uppercase(), detail.id, fav),
        Style::default().fg(ACCENT_GOLD).add_modifier(Modifier::BOLD),
    )];
    if state.shiny {
        title.push(Span::styled(
            "  (shiny)",
            Style::default().fg(ACCENT_GOLD),
        ));
    }

    let mut type_spans = vec![Span::raw("Type: ")];
    for (idx, type_name) in detail.types.iter().enumerate() {
        if idx > 0 {
            type_spans.push(Span::raw(" "));
        }
        type_spans.push(Span::styled(
            format!(" {} ", type_name),
            Style::default().fg(Color::Black).bg(type_color(type_name)),
        ));
    }

    let mut lines = vec![
        Line::from(title),
        Line::from(type_spans),
        Line::from(format!(
            "Height: {:.1} m  Weight: {:.1} kg",
            detail.height as f32 / 10.0,
            detail.weight as f32 / 10.0
        )),
        Line::from("Abilities:"),
    ];
    for ability in &detail.abilities {
        let hidden = if ability.is_hidden { " (Hidden)" } else { "" };
        lines.push(Line::from(format!(
            "  {}{}",
            format_name(&ability.name),
            hidden
        )));
    }
    lines.push(Line::from(" "));
    for stat in &detail.stats {
        lines.push(Line::from(render_stat(stat)));
    }
    Text::from(lines)
}

fn render_description(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(Style::default().fg(TEXT_DIM));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let description = state.description.clone().unwrap_or_default();
    frame.render_widget(
        Paragraph::new(description)
            .style(Style::default().fg(TEXT_MAIN))
            .wrap(Wrap { trim: true }),
        inner,
    );
}

fn render_evolution(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    event_ctx: &mut EventContext<crate::PokeComponentId>,
    evolution_list: &mut SelectList,
) {
    event_ctx.set_component_area(crate::PokeComponentId::Evolution, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title("EVOLUTION")
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(focus_border(state, FocusArea::Evolution));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let items = evolution_items(state);
    if items.is_empty() {
        let message = if state.evolution_loading {
            "Loading evolution chain..."
        } else {
            "No evolution data."
        };
        frame.render_widget(
            Paragraph::new(message)
                .style(Style::default().fg(TEXT_DIM))
                .wrap(Wrap { trim: true }),
            inner,
        );
        return;
    }

    let props = SelectListProps {
        items: &items,
        count: items.len(),
        selected: state
            .evolution_selected
            .min(items.len().saturating_sub(1)),
        is_focused: state.focus == FocusArea::Evolution,
        style: side_list_style(),
        behavior: SelectListBehavior {
            show_scrollbar: true,
            wrap_navigation: false,
        },
        on_select: Action::EvolutionSelect,
        render_item: &|item| item.clone(),
    };
    evolution_list.render(frame, inner, props);
}

fn render_favorites(
    frame: &mut Frame,
    area: Rect,
    state: &AppState,
    event_ctx: &mut EventContext<crate::PokeComponentId>,
    favorites_list: &mut SelectList,
) {
    event_ctx.set_component_area(crate::PokeComponentId::Favorites, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("FAVORITES ({})", state.favorites.len()))
        .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
        .border_style(focus_border(state, FocusArea::Favorites));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let items = favorite_items(state);
    if items.is_empty() {
        frame.render_widget(
            Paragraph::new("No favorites yet. Press f on a loaded card.")
                .style(Style::default().fg(TEXT_DIM))
                .wrap(Wrap { trim: true }),
            inner,
        );
        return;
    }

    let props = SelectListProps {
        items: &items,
        count: items.len(),
        selected: state
            .favorites_selected
            .min(items.len().saturating_sub(1)),
        is_focused: state.focus == FocusArea::Favorites,
        style: side_list_style(),
        behavior: SelectListBehavior {
            show_scrollbar: true,
            wrap_navigation: false,
        },
        on_select: Action::FavoriteSelect,
        render_item: &|item| item.clone(),
    };
    favorites_list.render(frame, inner, props);
}

fn render_footer(frame: &mut Frame, area: Rect, state: &AppState, status_bar: &mut StatusBar) {
    let status = state.message.clone().unwrap_or_else(|| {
        if state.names_loading {
            "Loading name list...".to_string()
        } else if state.pokemon.is_loading() {
            "Loading pokemon...".to_string()
        } else if state.evolution_loading {
            "Loading evolution chain...".to_string()
        } else if state.sprite_loading {
            "Loading sprite...".to_string()
        } else {
            "".to_string()
        }
    });
    let (left_hints, center_hints) = status_hints(state);
    let status_span = Span::styled(status.as_str(), Style::default().fg(ACCENT_GOLD));
    let status_items = [StatusBarItem::span(status_span)];

    let style = StatusBarStyle {
        base: BaseStyle {
            border: Some(BorderStyle {
                borders: Borders::ALL,
                style: Style::default().fg(TEXT_DIM),
                focused_style: Some(Style::default().fg(ACCENT_RED)),
            }),
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL),
            fg: Some(TEXT_MAIN),
        },
        text: Style::default().fg(TEXT_DIM),
        hint_key: Style::default().fg(ACCENT_RED).add_modifier(Modifier::BOLD),
        hint_label: Style::default().fg(TEXT_DIM),
        separator: Style::default().fg(TEXT_DIM),
    };

    let props = StatusBarProps {
        left: StatusBarSection::hints(&left_hints).with_separator("  "),
        center: StatusBarSection::hints(&center_hints).with_separator("  "),
        right: StatusBarSection::items(&status_items).with_separator("  "),
        style,
        is_focused: false,
    };
    Component::<Action>::render(status_bar, frame, area, props);
}

fn status_hints(state: &AppState) -> (Vec<StatusBarHint<'static>>, Vec<StatusBarHint<'static>>) {
    if state.search.active {
        let left = vec![
            StatusBarHint::new("Enter", "Search"),
            StatusBarHint::new("Esc", "Cancel"),
            StatusBarHint::new("Bksp", "Delete"),
        ];
        let center = vec![StatusBarHint::new("q", "Quit")];
        return (left, center);
    }

    let left = match state.focus {
        FocusArea::Card => vec![
            StatusBarHint::new("s", "Shiny"),
            StatusBarHint::new("f", "Favorite"),
        ],
        FocusArea::Evolution | FocusArea::Favorites => vec![
            StatusBarHint::new("j/k", "Move"),
            StatusBarHint::new("Enter", "Open"),
        ],
    };
    let center = vec![
        StatusBarHint::new("Tab", "Focus"),
        StatusBarHint::new("/", "Search"),
        StatusBarHint::new("r", "Random"),
        StatusBarHint::new("q", "Quit"),
    ];
    (left, center)
}

fn failed_message(state: &AppState) -> Option<String> {
    match &state.pokemon {
        tui_dispatch::DataResource::Failed(message) => Some(message.clone()),
        _ => None,
    }
}

fn evolution_items(state: &AppState) -> Vec<Line<'static>> {
    state
        .evolution
        .iter()
        .enumerate()
        .map(|(idx, name)| Line::from(entry_label(state, idx, name)))
        .collect()
}

fn favorite_items(state: &AppState) -> Vec<Line<'static>> {
    state
        .favorites
        .iter()
        .enumerate()
        .map(|(idx, name)| Line::from(entry_label(state, idx, name)))
        .collect()
}

fn entry_label(state: &AppState, idx: usize, name: &str) -> String {
    let fav = if state.is_favorite(name) { "*" } else { " " };
    match state.summaries.get(name) {
        Some(summary) => format!("{}{:02} #{:03} {}", fav, idx + 1, summary.id, name),
        None => format!("{}{:02}      {}", fav, idx + 1, name),
    }
}

fn side_list_style() -> SelectListStyle {
    SelectListStyle {
        base: BaseStyle {
            border: None,
            padding: Padding::xy(1, 0),
            bg: Some(BG_PANEL_ALT),
            fg: Some(TEXT_MAIN),
        },
        selection: SelectionStyle {
            style: Some(
                Style::default()
                    .bg(BG_HIGHLIGHT)
                    .fg(TEXT_MAIN)
                    .add_modifier(Modifier::BOLD),
            ),
            marker: None,
            disabled: false,
        },
        ..SelectListStyle::default()
    }
}

fn focus_border(state: &AppState, area: FocusArea) -> Style {
    if state.focus == area {
        Style::default().fg(ACCENT_RED).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT_DIM)
    }
}

fn render_stat(stat: &PokemonStat) -> String {
    let label = shorten_stat(&stat.name);
    let bar_len = ((stat.value.min(STAT_MAX) as usize * STAT_BAR_WIDTH as usize)
        / STAT_MAX as usize)
        .max(1);
    let bar = "#".repeat(bar_len);
    format!("{label:>4} {value:>3} {bar}", value = stat.value)
}

fn shorten_stat(name: &str) -> String {
    match name {
        "hp" => " HP".to_string(),
        "attack" => "ATK".to_string(),
        "defense" => "DEF".to_string(),
        "special-attack" => "SAT".to_string(),
        "special-defense" => "SDF".to_string(),
        "speed" => "SPD".to_string(),
        _ => name.to_ascii_uppercase(),
    }
}

fn format_name(name: &str) -> String {
    name.split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => format!("{}{}", first.to_ascii_uppercase(), chars.as_str()),
                None => "".to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn type_color(name: &str) -> Color {
    match name {
        "normal" => Color::Rgb(0xA8, 0xA8, 0x78),
        "fire" => Color::Rgb(0xF0, 0x80, 0x30),
        "water" => Color::Rgb(0x68, 0x90, 0xF0),
        "electric" => Color::Rgb(0xF8, 0xD0, 0x30),
        "grass" => Color::Rgb(0x78, 0xC8, 0x50),
        "ice" => Color::Rgb(0x98, 0xD8, 0xD8),
        "fighting" => Color::Rgb(0xC0, 0x30, 0x28),
        "poison" => Color::Rgb(0xA0, 0x40, 0xA0),
        "ground" => Color::Rgb(0xE0, 0xC0, 0x68),
        "flying" => Color::Rgb(0xA8, 0x90, 0xF0),
        "psychic" => Color::Rgb(0xF8, 0x58, 0x88),
        "bug" => Color::Rgb(0xA8, 0xB8, 0x20),
        "rock" => Color::Rgb(0xB8, 0xA0, 0x38),
        "ghost" => Color::Rgb(0x70, 0x58, 0x98),
        "dragon" => Color::Rgb(0x70, 0x38, 0xF8),
        "dark" => Color::Rgb(0x70, 0x58, 0x48),
        "steel" => Color::Rgb(0xB8, 0xB8, 0xD0),
        "fairy" => Color::Rgb(0xEE, 0x99, 0xAC),
        _ => Color::Rgb(0x90, 0x90, 0x90),
    }
}
