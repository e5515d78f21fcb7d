use serde::Deserialize;

/// A key press reported by the browser.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeyPress {
    /// Produced character or key name (`KeyboardEvent.key`)
    pub key: String,
    /// Physical key (`KeyboardEvent.code`)
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub shift: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyMatch {
    /// Physical key plus Ctrl, e.g. `KeyF`
    CtrlCode(&'static str),
    /// Produced character, whatever key produced it. Keeps shortcuts like `+`
    /// working across keyboard layouts.
    Character(char),
}

impl KeyMatch {
    pub fn matches(&self, press: &KeyPress) -> bool {
        match self {
            KeyMatch::CtrlCode(code) => press.ctrl && !press.alt && press.code == *code,
            KeyMatch::Character(c) => {
                !press.ctrl && !press.alt && press.key.chars().eq(std::iter::once(*c))
            }
        }
    }
}

/// Maps key presses to view actions.
#[derive(Debug, Clone)]
pub struct Shortcuts<A> {
    bindings: Vec<(KeyMatch, A)>,
}

impl<A: Copy> Shortcuts<A> {
    pub fn new() -> Self {
        Self {
            bindings: Vec::new(),
        }
    }

    pub fn bind(mut self, key: KeyMatch, action: A) -> Self {
        self.bindings.push((key, action));
        self
    }

    pub fn resolve(&self, press: &KeyPress) -> Option<A> {
        self.bindings
            .iter()
            .find(|(key, _)| key.matches(press))
            .map(|(_, action)| *action)
    }
}
