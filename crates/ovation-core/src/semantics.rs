/// High-level semantic role of an element, similar to ARIA roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    Text,
    Button,
}

/// Numeric value exposed to assistive technology (`aria-valuemin` /
/// `aria-valuemax` / `aria-valuenow`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SemanticsValue {
    pub min: u32,
    pub max: u32,
    pub now: u32,
}

/// Semantics attached to an element, used to build the accessibility tree.
#[derive(Clone, Debug, PartialEq)]
pub struct Semantics {
    pub role: Role,
    /// Human-readable label announced by screen readers.
    pub label: Option<String>,
    /// Toggle state (`aria-pressed`); `None` for non-toggle elements.
    pub pressed: Option<bool>,
    /// Bounded value annotation for counters, sliders, progress.
    pub value: Option<SemanticsValue>,
    pub enabled: bool,
}

impl Semantics {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            label: None,
            pressed: None,
            value: None,
            enabled: true,
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn pressed(mut self, pressed: bool) -> Self {
        self.pressed = Some(pressed);
        self
    }

    pub fn value(mut self, min: u32, max: u32, now: u32) -> Self {
        self.value = Some(SemanticsValue { min, max, now });
        self
    }
}
