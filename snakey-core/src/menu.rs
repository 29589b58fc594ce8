//! The pet's context menu.
//!
//! Front ends show [`CONTEXT_MENU`] on right click and hand the chosen
//! [`MenuAction`] to [`Pet::handle_menu`](crate::Pet::handle_menu).

use std::path::PathBuf;

/// Top-level context menu entries, in display order.
pub const CONTEXT_MENU: &[MenuEntry] = &[
    MenuEntry::Settings,
    MenuEntry::SurfTheWeb,
    MenuEntry::Quit,
    MenuEntry::TellJoke,
    MenuEntry::Talk,
];

/// An entry of the context menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuEntry {
    /// Opens the settings panel.
    Settings,
    /// Opens a web page.
    SurfTheWeb,
    /// Closes the pet.
    Quit,
    /// Tells a joke.
    TellJoke,
    /// Opens the free-text speech box.
    Talk,
}

impl MenuEntry {
    /// Label shown in the menu.
    pub fn label(self) -> &'static str {
        match self {
            MenuEntry::Settings => "Settings",
            MenuEntry::SurfTheWeb => "Surf the Web!",
            MenuEntry::Quit => "Quit",
            MenuEntry::TellJoke => "Tell me a joke!",
            MenuEntry::Talk => "Talk!",
        }
    }
}

/// Something the user asked the pet to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuAction {
    /// Use this image while idle.
    SelectIdleImage(PathBuf),
    /// Use this image while moving.
    SelectMovingImage(PathBuf),
    /// Reset all settings to the defaults and quit. The front end is
    /// responsible for asking the user to confirm first.
    ClearData,
    /// Open the configured web page.
    SurfWeb,
    /// Close the pet.
    Quit,
    /// Tell a random joke.
    TellJoke,
    /// Say this text.
    Talk(String),
}

impl MenuAction {
    /// The menu entry this action belongs to.
    pub fn entry(&self) -> MenuEntry {
        match self {
            MenuAction::SelectIdleImage(_)
            | MenuAction::SelectMovingImage(_)
            | MenuAction::ClearData => MenuEntry::Settings,
            MenuAction::SurfWeb => MenuEntry::SurfTheWeb,
            MenuAction::Quit => MenuEntry::Quit,
            MenuAction::TellJoke => MenuEntry::TellJoke,
            MenuAction::Talk(_) => MenuEntry::Talk,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_labels_in_order() {
        let labels: Vec<_> = CONTEXT_MENU.iter().map(|e| e.label()).collect();
        assert_eq!(
            labels,
            vec!["Settings", "Surf the Web!", "Quit", "Tell me a joke!", "Talk!"]
        );
    }

    #[test]
    fn test_actions_map_to_entries() {
        assert_eq!(
            MenuAction::SelectIdleImage(PathBuf::from("a.png")).entry(),
            MenuEntry::Settings
        );
        assert_eq!(MenuAction::ClearData.entry(), MenuEntry::Settings);
        assert_eq!(MenuAction::Talk("hi".into()).entry(), MenuEntry::Talk);
        assert_eq!(MenuAction::SurfWeb.entry(), MenuEntry::SurfTheWeb);
    }
}
