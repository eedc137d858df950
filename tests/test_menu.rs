use space_invaders::entities::MenuInput;
use space_invaders::menu::*;

fn press(up: bool, down: bool, select: bool, back: bool) -> MenuInput {
    MenuInput {
        up,
        down,
        select,
        back,
    }
}

#[test]
fn main_menu_selection_wraps() {
    let mut menu = MainMenu::new();
    assert_eq!(menu.update(&press(true, false, false, false), 0.0), MenuAction::None);
    assert_eq!(menu.selected, 2);
    menu.update(&press(false, true, false, false), 0.0);
    assert_eq!(menu.selected, 0);
}

#[test]
fn main_menu_select_maps_items() {
    let mut menu = MainMenu::new();
    assert_eq!(menu.update(&press(false, false, true, false), 0.0), MenuAction::Start);

    menu.selected = 1;
    assert_eq!(menu.update(&press(false, false, true, false), 0.0), MenuAction::Settings);

    menu.selected = 2;
    assert_eq!(menu.update(&press(false, false, true, false), 0.0), MenuAction::Quit);
}

#[test]
fn main_menu_back_quits() {
    let mut menu = MainMenu::new();
    assert_eq!(menu.update(&press(false, true, false, true), 0.0), MenuAction::Quit);
    assert_eq!(menu.selected, 0);
}

#[test]
fn title_slides_in_and_stops() {
    let mut menu = MainMenu::new();
    menu.update(&MenuInput::default(), 1.0);
    assert_eq!(menu.title_progress, 0.5);
    menu.update(&MenuInput::default(), 5.0);
    assert_eq!(menu.title_progress, 1.0);
}

#[test]
fn lerp_interpolates() {
    assert_eq!(lerp(-10.0, 30.0, 0.0), -10.0);
    assert_eq!(lerp(-10.0, 30.0, 0.5), 10.0);
    assert_eq!(lerp(-10.0, 30.0, 1.0), 30.0);
}

#[test]
fn settings_menu_actions() {
    let mut menu = SettingsMenu::default();
    assert_eq!(menu.update(&MenuInput::default()), SettingsAction::None);
    assert_eq!(menu.update(&press(false, false, true, false)), SettingsAction::ToggleMotion);

    assert_eq!(menu.update(&press(false, true, false, false)), SettingsAction::None);
    assert_eq!(menu.selected, 1);
    assert_eq!(menu.update(&press(false, false, true, false)), SettingsAction::Back);

    assert_eq!(menu.update(&press(false, false, false, true)), SettingsAction::Back);
}
