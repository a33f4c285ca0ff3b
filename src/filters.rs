use crate::catalog::{FilterOption, ProjectSummary, CATEGORY_OPTIONS, FOCUS_OPTIONS};

pub const ALL: &str = "all";
pub const EMPTY_RESULT_MESSAGE: &str =
    "No hay proyectos que coincidan con los filtros seleccionados.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilterAxis {
    Category,
    Focus,
}

impl FilterAxis {
    pub fn from_group(name: &str) -> Option<Self> {
        match name {
            "category" => Some(Self::Category),
            "focus" => Some(Self::Focus),
            _ => None,
        }
    }

    /// Chips offered for this axis, `all` first.
    pub fn options(self) -> &'static [FilterOption] {
        match self {
            Self::Category => CATEGORY_OPTIONS,
            Self::Focus => FOCUS_OPTIONS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterSelection {
    pub category: String,
    pub focus: String,
}

impl Default for FilterSelection {
    fn default() -> Self {
        Self {
            category: ALL.to_string(),
            focus: ALL.to_string(),
        }
    }
}

impl FilterSelection {
    pub fn get(&self, axis: FilterAxis) -> &str {
        match axis {
            FilterAxis::Category => &self.category,
            FilterAxis::Focus => &self.focus,
        }
    }

    fn slot(&mut self, axis: FilterAxis) -> &mut String {
        match axis {
            FilterAxis::Category => &mut self.category,
            FilterAxis::Focus => &mut self.focus,
        }
    }

    fn admits(&self, project: &ProjectSummary) -> bool {
        let axis_admits = |value: &str| value == ALL || project.has_filter(value);
        axis_admits(self.category.as_str()) && axis_admits(self.focus.as_str())
    }
}

/// Projects that satisfy every constrained axis, in catalogue order.
pub fn filter_projects<'a>(
    projects: &'a [ProjectSummary],
    selection: &FilterSelection,
) -> Vec<&'a ProjectSummary> {
    projects
        .iter()
        .filter(|project| selection.admits(project))
        .collect()
}

/// Chip selections are staged; the grid changes only on apply or clear.
#[derive(Clone, Debug, PartialEq)]
pub struct FilterEngine<'a> {
    projects: &'a [ProjectSummary],
    staged: FilterSelection,
    visible: Vec<&'a ProjectSummary>,
    generation: u32,
}

impl<'a> FilterEngine<'a> {
    pub fn new(projects: &'a [ProjectSummary]) -> Self {
        Self {
            projects,
            staged: FilterSelection::default(),
            visible: projects.iter().collect(),
            generation: 0,
        }
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.staged
    }

    pub fn visible(&self) -> &[&'a ProjectSummary] {
        &self.visible
    }

    /// Bumped on every full re-render of the result set.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Returns `false` when `value` was already selected on `axis`.
    pub fn select(&mut self, axis: FilterAxis, value: &str) -> bool {
        let slot = self.staged.slot(axis);
        if slot.as_str() == value {
            return false;
        }
        *slot = value.to_string();
        true
    }

    pub fn is_active(&self, axis: FilterAxis, value: &str) -> bool {
        self.staged.get(axis) == value
    }

    pub fn apply(&mut self) -> &[&'a ProjectSummary] {
        self.visible = filter_projects(self.projects, &self.staged);
        self.generation = self.generation.wrapping_add(1);
        &self.visible
    }

    pub fn clear(&mut self) -> &[&'a ProjectSummary] {
        self.staged = FilterSelection::default();
        self.apply()
    }
}
