use tracing::debug;

use crate::models::{MODERATOR_LABEL, Role};
use crate::stages::Segment;

/// Management roster page text in its comparison form
#[derive(Debug, Clone)]
pub struct Roster {
    normalized: String,
}

impl Roster {
    pub fn new(text: &str) -> Self {
        Self {
            normalized: normalize_for_match(text),
        }
    }

    /// Whether a speaker label occurs on the roster, ignoring case and whitespace
    pub fn mentions(&self, label: &str) -> bool {
        self.normalized.contains(&normalize_for_match(label))
    }
}

/// Lower-case and drop all whitespace
pub fn normalize_for_match(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Decides the role of a speaker from their label
pub trait RoleClassifier {
    fn classify(&self, label: &str, roster: &Roster) -> Role;
}

/// Management if the label appears anywhere on the roster, otherwise Question
///
/// Coarse: an analyst whose name is a substring of a roster entry is counted
/// as management.
#[derive(Debug, Clone, Copy, Default)]
pub struct RosterSubstringClassifier;

impl RoleClassifier for RosterSubstringClassifier {
    fn classify(&self, label: &str, roster: &Roster) -> Role {
        if roster.mentions(label) {
            Role::Management
        } else {
            Role::Question
        }
    }
}

/// Assign a role to every segment
///
/// Any label containing "Moderator" is rewritten to exactly "Moderator" with
/// the Moderator role, whatever the classifier said.
pub fn classify_segments<C: RoleClassifier + ?Sized>(
    segments: Vec<Segment>,
    roster: &Roster,
    classifier: &C,
) -> Vec<(Segment, Role)> {
    let classified: Vec<(Segment, Role)> = segments
        .into_iter()
        .map(|mut segment| {
            let mut role = classifier.classify(&segment.speaker, roster);
            if segment.speaker.contains(MODERATOR_LABEL) {
                segment.speaker = MODERATOR_LABEL.to_string();
                role = Role::Moderator;
            }
            (segment, role)
        })
        .collect();

    let management = classified
        .iter()
        .filter(|(_, r)| *r == Role::Management)
        .count();
    let moderator = classified
        .iter()
        .filter(|(_, r)| *r == Role::Moderator)
        .count();
    debug!(
        "Roles: {} management, {} question, {} moderator",
        management,
        classified.len() - management - moderator,
        moderator
    );

    classified
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROSTER: &str = "MANAGEMENT:\n  MR. SASHI JAGDISHAN - MD & CEO\n  Srinivasan Vaidyanathan - CFO\n";

    fn seg(speaker: &str) -> Segment {
        Segment {
            speaker: speaker.to_string(),
            utterance: "text".to_string(),
        }
    }

    #[test]
    fn test_normalize_for_match() {
        assert_eq!(normalize_for_match(" Sashi\tJagdishan\n"), "sashijagdishan");
    }

    #[test]
    fn test_roster_match_ignores_case_and_spacing() {
        let roster = Roster::new(ROSTER);
        let classifier = RosterSubstringClassifier;

        assert_eq!(classifier.classify("Sashi Jagdishan", &roster), Role::Management);
        assert_eq!(
            classifier.classify("SrinivasanVaidyanathan", &roster),
            Role::Management
        );
        assert_eq!(classifier.classify("Mahrukh Adajania", &roster), Role::Question);
    }

    #[test]
    fn test_moderator_overrides_roster() {
        // Roster deliberately lists the moderator to show the override wins
        let roster = Roster::new("Moderator: Ms. Operator\nSashi Jagdishan");
        let classified = classify_segments(
            vec![seg("Moderator"), seg("Call Moderator (Chorus)"), seg("Sashi Jagdishan")],
            &roster,
            &RosterSubstringClassifier,
        );

        assert_eq!(classified[0].0.speaker, "Moderator");
        assert_eq!(classified[0].1, Role::Moderator);
        assert_eq!(classified[1].0.speaker, "Moderator");
        assert_eq!(classified[1].1, Role::Moderator);
        assert_eq!(classified[2].1, Role::Management);
    }

    #[test]
    fn test_custom_classifier_is_used() {
        struct EveryoneAsks;
        impl RoleClassifier for EveryoneAsks {
            fn classify(&self, _label: &str, _roster: &Roster) -> Role {
                Role::Question
            }
        }

        let roster = Roster::new(ROSTER);
        let classified = classify_segments(
            vec![seg("Sashi Jagdishan"), seg("Moderator")],
            &roster,
            &EveryoneAsks,
        );
        assert_eq!(classified[0].1, Role::Question);
        assert_eq!(classified[1].1, Role::Moderator);
    }
}
