/// Start and settings screens.
///
/// Each menu is updated once per frame and answers with an action value; the
/// game loop decides what that action does.

use crate::entities::MenuInput;

/// Title slide-in speed, in animation progress per second.
const TITLE_ANIMATION_SPEED: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    None,
    Start,
    Settings,
    Quit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsAction {
    None,
    ToggleMotion,
    Back,
}

pub const MAIN_MENU_ITEMS: [&str; 3] = ["Start Game", "Options", "Quit"];
pub const SETTINGS_ITEMS: [&str; 2] = ["Enemy motion", "Back"];

/// Move a highlight through `len` items, wrapping at both ends.
fn step_selection(selected: usize, len: usize, input: &MenuInput) -> usize {
    if input.up {
        (selected + len - 1) % len
    } else if input.down {
        (selected + 1) % len
    } else {
        selected
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MainMenu {
    pub selected: usize,
    /// 0.0 → title off-screen, 1.0 → title centred.
    pub title_progress: f32,
}

impl Default for MainMenu {
    fn default() -> Self {
        Self::new()
    }
}

impl MainMenu {
    pub fn new() -> Self {
        Self {
            selected: 0,
            title_progress: 0.0,
        }
    }

    pub fn update(&mut self, input: &MenuInput, dt: f32) -> MenuAction {
        self.title_progress = (self.title_progress + dt * TITLE_ANIMATION_SPEED).min(1.0);

        if input.back {
            return MenuAction::Quit;
        }
        self.selected = step_selection(self.selected, MAIN_MENU_ITEMS.len(), input);
        if !input.select {
            return MenuAction::None;
        }
        match self.selected {
            0 => MenuAction::Start,
            1 => MenuAction::Settings,
            _ => MenuAction::Quit,
        }
    }
}

/// Linear interpolation used for the title slide-in.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SettingsMenu {
    pub selected: usize,
}

impl SettingsMenu {
    pub fn update(&mut self, input: &MenuInput) -> SettingsAction {
        if input.back {
            return SettingsAction::Back;
        }
        self.selected = step_selection(self.selected, SETTINGS_ITEMS.len(), input);
        match (input.select, self.selected) {
            (false, _) => SettingsAction::None,
            (true, 0) => SettingsAction::ToggleMotion,
            (true, _) => SettingsAction::Back,
        }
    }
}
