#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyboardKey {
    Up,
    Left,
    Right,
    Shift,
}

const KEY_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct KeyStates {
    down: [bool; KEY_COUNT],
}

impl KeyStates {
    pub(crate) fn set(&mut self, key: KeyboardKey, is_down: bool) {
        self.down[key.index()] = is_down;
    }

    pub(crate) fn is_down(&self, key: KeyboardKey) -> bool {
        self.down[key.index()]
    }

    pub(crate) fn release_all(&mut self) {
        self.down = [false; KEY_COUNT];
    }
}

impl KeyboardKey {
    const fn index(self) -> usize {
        match self {
            KeyboardKey::Up => 0,
            KeyboardKey::Left => 1,
            KeyboardKey::Right => 2,
            KeyboardKey::Shift => 3,
        }
    }
}

/// Held-key state polled once per tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    keys: KeyStates,
}

impl InputSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn new(keys: KeyStates) -> Self {
        Self { keys }
    }

    pub fn is_pressed(&self, key: KeyboardKey) -> bool {
        self.keys.is_down(key)
    }

    pub fn with_key_down(mut self, key: KeyboardKey, is_down: bool) -> Self {
        self.keys.set(key, is_down);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_tracked_independently() {
        let snapshot = InputSnapshot::empty()
            .with_key_down(KeyboardKey::Right, true)
            .with_key_down(KeyboardKey::Shift, true);

        assert!(snapshot.is_pressed(KeyboardKey::Right));
        assert!(snapshot.is_pressed(KeyboardKey::Shift));
        assert!(!snapshot.is_pressed(KeyboardKey::Left));
        assert!(!snapshot.is_pressed(KeyboardKey::Up));
    }

    #[test]
    fn release_all_clears_every_key() {
        let mut keys = KeyStates::default();
        keys.set(KeyboardKey::Up, true);
        keys.set(KeyboardKey::Left, true);
        keys.release_all();
        assert_eq!(keys, KeyStates::default());
    }
}
