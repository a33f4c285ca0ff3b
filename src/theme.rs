pub const THEME_KEY: &str = "hydra404-theme";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub fn toggle_label(self) -> &'static str {
        match self {
            Self::Light => "Cambiar a tema oscuro",
            Self::Dark => "Cambiar a tema claro",
        }
    }

    pub fn is_light(self) -> bool {
        matches!(self, Self::Light)
    }

    fn from_system(prefers_light: bool) -> Self {
        if prefers_light {
            Self::Light
        } else {
            Self::Dark
        }
    }
}

/// The single persisted flag. Implementations swallow storage failures.
pub trait PreferenceStore {
    fn load(&self) -> Option<Theme>;
    fn save(&mut self, theme: Theme);
}

pub struct ThemeController<S> {
    store: S,
    current: Theme,
}

impl<S: PreferenceStore> ThemeController<S> {
    pub fn new(store: S, system_prefers_light: bool) -> Self {
        let current = store
            .load()
            .unwrap_or_else(|| Theme::from_system(system_prefers_light));
        Self { store, current }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    pub fn toggle(&mut self) -> Theme {
        self.current = self.current.toggled();
        self.store.save(self.current);
        self.current
    }

    /// An explicit choice always wins over the system scheme.
    pub fn on_system_change(&mut self, prefers_light: bool) -> Option<Theme> {
        if self.store.load().is_some() {
            return None;
        }

        self.current = Theme::from_system(prefers_light);
        Some(self.current)
    }
}
