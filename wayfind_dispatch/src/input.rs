// Copyright 2025 the Wayfind Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Keyboard input model and the key map.

use smallvec::{SmallVec, smallvec};
use wayfind_navigator::Navigation;

/// A key, independent of the host's input backend.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Key {
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Home.
    Home,
    /// End.
    End,
    /// Enter / Return.
    Enter,
    /// Space bar.
    Space,
    /// Backspace.
    Backspace,
    /// Escape.
    Escape,
    /// Tab.
    Tab,
    /// F2.
    F2,
    /// A printable character.
    Char(char),
}

bitflags::bitflags! {
    /// Modifier keys held during an input event.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Modifiers: u8 {
        /// Shift.
        const SHIFT = 0b0001;
        /// Control.
        const CTRL  = 0b0010;
        /// Alt / Option.
        const ALT   = 0b0100;
    }
}

/// One key press.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InputEvent {
    /// The key.
    pub key: Key,
    /// Held modifiers.
    pub modifiers: Modifiers,
}

impl InputEvent {
    /// A press without modifiers.
    pub const fn key(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::empty(),
        }
    }

    /// The same press with `modifiers` held.
    pub const fn with(self, modifiers: Modifiers) -> Self {
        Self {
            key: self.key,
            modifiers,
        }
    }
}

impl From<Key> for InputEvent {
    fn from(key: Key) -> Self {
        Self::key(key)
    }
}

/// One key map entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Binding {
    /// Key and modifiers that must match exactly.
    pub input: InputEvent,
    /// Intent produced.
    pub navigation: Navigation,
}

/// Maps key presses to navigation intents.
///
/// Arrow left/right and Escape are unbound by default so contexts can use
/// them for value adjustment and closing panels.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KeyMap {
    /// Bindings; the first match wins.
    pub bindings: SmallVec<[Binding; 12]>,
}

impl Default for KeyMap {
    fn default() -> Self {
        let b = |key, navigation| Binding {
            input: InputEvent::key(key),
            navigation,
        };
        Self {
            bindings: smallvec![
                b(Key::Down, Navigation::Next),
                b(Key::Up, Navigation::Prev),
                b(Key::Tab, Navigation::Next),
                Binding {
                    input: InputEvent::key(Key::Tab).with(Modifiers::SHIFT),
                    navigation: Navigation::Prev,
                },
                b(Key::Home, Navigation::First),
                b(Key::End, Navigation::Last),
                b(Key::Enter, Navigation::Select),
                b(Key::Space, Navigation::Select),
                b(Key::Backspace, Navigation::Exit),
                b(Key::F2, Navigation::Alternate),
            ],
        }
    }
}

impl KeyMap {
    /// A key map with no bindings.
    pub fn empty() -> Self {
        Self {
            bindings: SmallVec::new(),
        }
    }

    /// Add a binding after the existing ones.
    pub fn bind(mut self, input: InputEvent, navigation: Navigation) -> Self {
        self.bindings.push(Binding { input, navigation });
        self
    }

    /// Intent bound to `input`, if any.
    pub fn navigation_for(&self, input: &InputEvent) -> Option<Navigation> {
        self.bindings
            .iter()
            .find(|b| b.input == *input)
            .map(|b| b.navigation)
    }
}
