// Key chord -> action table, independent of any input framework.
// Glue code translates its own key events into InputChord and asks the keymap.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, trace};

use super::actions::Action;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    /// A printable key, stored lowercase.
    Char(char),
    Tab,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputChord {
    pub key: Key,
    /// Ctrl, or Cmd on macOS.
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl InputChord {
    pub fn key(key: Key) -> Self {
        Self {
            key: normalize(key),
            ctrl: false,
            shift: false,
            alt: false,
        }
    }

    pub fn ch(c: char) -> Self {
        Self::key(Key::Char(c))
    }

    pub fn ctrl(key: Key) -> Self {
        Self {
            ctrl: true,
            ..Self::key(key)
        }
    }

    pub fn shift(key: Key) -> Self {
        Self {
            shift: true,
            ..Self::key(key)
        }
    }

    pub fn alt(key: Key) -> Self {
        Self {
            alt: true,
            ..Self::key(key)
        }
    }

    fn bare(&self) -> Self {
        Self::key(self.key)
    }

    fn normalized(self) -> Self {
        Self {
            key: normalize(self.key),
            ..self
        }
    }
}

fn normalize(key: Key) -> Key {
    match key {
        Key::Char(c) => Key::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

/// Persisted as a list of chord/action pairs, since JSON map keys must be strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keymap {
    #[serde(with = "binding_list")]
    bindings: HashMap<InputChord, Action>,
}

mod binding_list {
    use super::*;

    #[derive(Serialize, Deserialize)]
    struct Binding {
        chord: InputChord,
        action: Action,
    }

    pub fn serialize<S: Serializer>(
        bindings: &HashMap<InputChord, Action>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let list: Vec<Binding> = bindings
            .iter()
            .map(|(chord, action)| Binding {
                chord: *chord,
                action: *action,
            })
            .collect();
        list.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<HashMap<InputChord, Action>, D::Error> {
        let list = Vec::<Binding>::deserialize(deserializer)?;
        Ok(list
            .into_iter()
            .map(|b| (b.chord.normalized(), b.action))
            .collect())
    }
}

impl Default for Keymap {
    fn default() -> Self {
        let mut map = Self {
            bindings: HashMap::new(),
        };
        let c = Key::Char;

        // Menu accelerators
        map.bind(InputChord::shift(c('n')), Action::New);
        map.bind(InputChord::shift(c('o')), Action::Open);
        map.bind(InputChord::shift(c('p')), Action::ImportProject);
        map.bind(InputChord::shift(c('i')), Action::ImportMatrix);
        map.bind(InputChord::shift(c('e')), Action::ExportProject);
        map.bind(InputChord::shift(c('m')), Action::GenerateMatrix);
        map.bind(InputChord::ch('g'), Action::ChangeGrid);
        map.bind(InputChord::ch('c'), Action::ChangeCellSize);

        // Canvas shortcuts
        map.bind(InputChord::ctrl(c('z')), Action::Undo);
        map.bind(InputChord::ch('+'), Action::ZoomIn);
        map.bind(InputChord::ch('='), Action::ZoomIn);
        map.bind(InputChord::ch('-'), Action::ZoomOut);
        map.bind(InputChord::ch('0'), Action::ResetZoom);
        map.bind(InputChord::ch('w'), Action::ScrollUp);
        map.bind(InputChord::ch('s'), Action::ScrollDown);
        map.bind(InputChord::ch('a'), Action::ScrollLeft);
        map.bind(InputChord::ch('d'), Action::ScrollRight);
        map.bind(InputChord::alt(Key::Tab), Action::ToggleTilesPanel);
        map.bind(InputChord::shift(c('a')), Action::SelectAll);
        map.bind(InputChord::key(Key::Escape), Action::ClearSelection);
        map.bind(InputChord::ch(']'), Action::IncreaseTileArea);
        map.bind(InputChord::ch('['), Action::DecreaseTileArea);
        map
    }
}

impl Keymap {
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Bind a chord, replacing whatever it was bound to. Returns the old action.
    pub fn bind(&mut self, chord: InputChord, action: Action) -> Option<Action> {
        let chord = chord.normalized();
        let previous = self.bindings.insert(chord, action);
        if let Some(old) = previous.filter(|old| *old != action) {
            debug!("Rebound {:?} from {:?} to {:?}", chord, old, action);
        }
        previous
    }

    pub fn unbind(&mut self, chord: InputChord) -> Option<Action> {
        self.bindings.remove(&chord.normalized())
    }

    /// Exact chord first; a shift-only chord falls back to the bare key.
    pub fn lookup(&self, chord: InputChord) -> Option<Action> {
        let chord = chord.normalized();
        let found = self.bindings.get(&chord).copied().or_else(|| {
            (chord.shift && !chord.ctrl && !chord.alt)
                .then(|| self.bindings.get(&chord.bare()).copied())
                .flatten()
        });
        trace!("Key chord {:?} -> {:?}", chord, found);
        found
    }

    /// Every chord bound to `action`.
    pub fn chords_for(&self, action: Action) -> Vec<InputChord> {
        self.bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|(c, _)| *c)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bindings() {
        let keymap = Keymap::default();
        assert_eq!(keymap.lookup(InputChord::ctrl(Key::Char('z'))), Some(Action::Undo));
        assert_eq!(keymap.lookup(InputChord::ch('=')), Some(Action::ZoomIn));
        assert_eq!(keymap.lookup(InputChord::ch('a')), Some(Action::ScrollLeft));
        assert_eq!(keymap.lookup(InputChord::shift(Key::Char('A'))), Some(Action::SelectAll));
        assert_eq!(keymap.lookup(InputChord::alt(Key::Tab)), Some(Action::ToggleTilesPanel));
        assert_eq!(keymap.lookup(InputChord::key(Key::Tab)), None);
        assert_eq!(keymap.lookup(InputChord::ch(']')), Some(Action::IncreaseTileArea));
    }

    #[test]
    fn test_plain_z_is_not_undo() {
        let keymap = Keymap::default();
        assert_eq!(keymap.lookup(InputChord::ch('z')), None);
    }

    #[test]
    fn test_shift_falls_back_to_bare_key() {
        let keymap = Keymap::default();
        assert_eq!(keymap.lookup(InputChord::shift(Key::Char('w'))), Some(Action::ScrollUp));
        assert_eq!(keymap.lookup(InputChord::ctrl(Key::Char('w'))), None);
    }

    #[test]
    fn test_rebind() {
        let mut keymap = Keymap::default();
        let previous = keymap.bind(InputChord::ch('g'), Action::Undo);
        assert_eq!(previous, Some(Action::ChangeGrid));
        assert_eq!(keymap.lookup(InputChord::ch('G')), Some(Action::Undo));
        assert_eq!(keymap.chords_for(Action::Undo).len(), 2);

        keymap.unbind(InputChord::ch('g'));
        assert_eq!(keymap.lookup(InputChord::ch('g')), None);
    }

    #[test]
    fn test_unbind_ignores_case() {
        let mut keymap = Keymap::default();
        let chord = InputChord {
            key: Key::Char('G'),
            ctrl: false,
            shift: false,
            alt: false,
        };
        assert_eq!(keymap.unbind(chord), Some(Action::ChangeGrid));
        assert_eq!(keymap.lookup(InputChord::ch('g')), None);
    }

    #[test]
    fn test_keymap_json_roundtrip() {
        let mut keymap = Keymap::default();
        keymap.bind(InputChord::ctrl(Key::Char('y')), Action::Undo);

        let json = serde_json::to_string(&keymap).unwrap();
        let back: Keymap = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), keymap.len());
        assert_eq!(back.lookup(InputChord::ctrl(Key::Char('y'))), Some(Action::Undo));
        assert_eq!(back.lookup(InputChord::alt(Key::Tab)), Some(Action::ToggleTilesPanel));
    }
}
