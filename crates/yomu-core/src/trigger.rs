use yomu_types::LookupEvent;

pub const SHIFT_KEY: &str = "shift";

/// Whether a lookup should get an AI explanation (shift held)
pub fn is_eligible(event: &LookupEvent) -> bool {
    event
        .modifiers
        .iter()
        .any(|key| key.eq_ignore_ascii_case(SHIFT_KEY))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_lookup_is_eligible() {
        let event = LookupEvent::new("run", "").with_modifier("shift");
        assert!(is_eligible(&event));
    }

    #[test]
    fn key_name_case_is_ignored() {
        let event = LookupEvent::new("run", "").with_modifier("Shift");
        assert!(is_eligible(&event));
    }

    #[test]
    fn other_modifiers_are_not_eligible() {
        let plain = LookupEvent::new("run", "");
        let ctrl = LookupEvent::new("run", "").with_modifier("ctrl");

        assert!(!is_eligible(&plain));
        assert!(!is_eligible(&ctrl));
    }
}
