//! The two-state focus machine: whole country, or one region.

use serde::{Deserialize, Serialize};

/// Current map focus. Owned by the interaction layer; the core only defines
/// the transition rules.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Selection {
    #[default]
    Country,
    Region(String),
}

impl Selection {
    /// The selected region code, if a single region has focus.
    pub fn region_code(&self) -> Option<&str> {
        match self {
            Selection::Region(code) => Some(code),
            Selection::Country => None,
        }
    }

    /// Apply one observed interaction. Last event wins: a reset activation
    /// returns to `Country` even when a stale click payload from a prior
    /// render is still attached to the event. Triggers the machine does not
    /// know preserve the current state.
    pub fn transition(self, event: &ObservedEvent) -> Selection {
        match event.trigger {
            Trigger::ResetControl => Selection::Country,
            Trigger::MapClick => match &event.click_payload {
                Some(code) => Selection::Region(code.clone()),
                None => self,
            },
            Trigger::Other => self,
        }
    }
}

/// Which control actually fired the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trigger {
    MapClick,
    ResetControl,
    Other,
}

/// One observed interaction. The click payload can outlive the click that
/// produced it (the UI keeps the last clicked point attached to subsequent
/// events), so the payload alone never decides the transition; the trigger
/// does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedEvent {
    pub click_payload: Option<String>,
    pub trigger: Trigger,
}

impl ObservedEvent {
    /// A fresh map click on the region with `code`.
    pub fn region_clicked(code: impl Into<String>) -> Self {
        Self {
            click_payload: Some(code.into()),
            trigger: Trigger::MapClick,
        }
    }

    /// A reset-control activation, possibly with a stale click payload still
    /// attached.
    pub fn reset_activated(stale_click: Option<String>) -> Self {
        Self {
            click_payload: stale_click,
            trigger: Trigger::ResetControl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_then_reset_should_roundtrip_to_country() {
        let state = Selection::Country;
        let state = state.transition(&ObservedEvent::region_clicked("RJ"));
        assert_eq!(state, Selection::Region("RJ".into()));
        assert_eq!(state.region_code(), Some("RJ"));

        let state = state.transition(&ObservedEvent::reset_activated(None));
        assert_eq!(state, Selection::Country);
    }

    #[test]
    fn reset_should_beat_a_stale_click_payload() {
        let state = Selection::Region("SP".into());
        let state = state.transition(&ObservedEvent::reset_activated(Some("RJ".into())));
        assert_eq!(state, Selection::Country);
    }

    #[test]
    fn clicking_another_region_should_switch_focus() {
        let state = Selection::Region("SP".into());
        let state = state.transition(&ObservedEvent::region_clicked("BA"));
        assert_eq!(state, Selection::Region("BA".into()));
    }

    #[test]
    fn unknown_triggers_should_preserve_state() {
        let state = Selection::Region("SP".into());
        let event = ObservedEvent {
            click_payload: Some("RJ".into()),
            trigger: Trigger::Other,
        };
        assert_eq!(state.clone().transition(&event), state);

        let clickless = ObservedEvent {
            click_payload: None,
            trigger: Trigger::MapClick,
        };
        assert_eq!(state.clone().transition(&clickless), state);
    }

    #[test]
    fn initial_state_should_be_country() {
        assert_eq!(Selection::default(), Selection::Country);
    }
}
