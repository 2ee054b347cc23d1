use std::collections::BTreeSet;

/// Substring keyword rule mapping a free-text space type to a default
/// amenity bundle.
#[derive(Debug, Clone)]
pub struct AmenityRule {
    pub keywords: Vec<String>,
    pub bundle: Vec<String>,
}

impl AmenityRule {
    fn new(keywords: &[&str], bundle: &[&str]) -> Self {
        Self {
            keywords: keywords.iter().map(|keyword| keyword.to_string()).collect(),
            bundle: bundle.iter().map(|amenity| amenity.to_string()).collect(),
        }
    }

    fn matches(&self, space_type: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| space_type.contains(keyword.as_str()))
    }
}

/// Ordered rule table inferring default amenities from a venue's space type.
///
/// The first matching rule wins; unmatched space types get no defaults. The
/// table is data, not code, so deployments can swap the policy without
/// touching the ranking engine.
#[derive(Debug, Clone)]
pub struct AmenityDefaults {
    rules: Vec<AmenityRule>,
}

impl AmenityDefaults {
    pub fn new(rules: Vec<AmenityRule>) -> Self {
        Self { rules }
    }

    /// The rule table used when seeding the campus dataset.
    pub fn standard() -> Self {
        Self::new(vec![
            AmenityRule::new(
                &["lecture theatre", "conference"],
                &[
                    "chairs",
                    "desks",
                    "microphones",
                    "projector screen",
                    "lighting",
                    "podium",
                    "air conditioning",
                ],
            ),
            AmenityRule::new(
                &["seminar"],
                &["chairs", "desks", "whiteboard", "air conditioning"],
            ),
            AmenityRule::new(
                &["meeting room"],
                &["chairs", "conference phone", "monitor", "whiteboard"],
            ),
            AmenityRule::new(
                &["hall"],
                &["stage", "sound system", "lighting", "seating area"],
            ),
            AmenityRule::new(&["lab"], &["sinks", "safety signs", "first aid kit"]),
            AmenityRule::new(&["studio"], &["mirrors", "sound system", "ventilation"]),
            AmenityRule::new(&["pool"], &["lifeguard chair", "water filtration system"]),
            AmenityRule::new(
                &["pitch", "sports"],
                &["scoreboard", "first aid kit", "changing rooms"],
            ),
            AmenityRule::new(
                &["courtyard", "outdoor"],
                &["lighting", "security", "seating area"],
            ),
            AmenityRule::new(
                &["foyer", "reception"],
                &["seating area", "power outlets", "decorative plants"],
            ),
        ])
    }

    /// Default bundle for a space type, if any rule matches.
    pub fn bundle_for(&self, space_type: &str) -> Option<&[String]> {
        let space_type = space_type.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&space_type))
            .map(|rule| rule.bundle.as_slice())
    }

    /// Merge the matching bundle into an amenity set.
    pub fn apply(&self, space_type: &str, amenities: &mut BTreeSet<String>) {
        if let Some(bundle) = self.bundle_for(space_type) {
            for amenity in bundle {
                amenities.insert(amenity.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lecture_theatre_gets_presentation_bundle() {
        let defaults = AmenityDefaults::standard();
        let bundle = defaults
            .bundle_for("Lecture Theatre (tiered)")
            .expect("rule matches");
        assert!(bundle.contains(&"podium".to_string()));
        assert!(bundle.contains(&"microphones".to_string()));
    }

    #[test]
    fn first_matching_rule_wins() {
        // "sports hall" hits the hall rule before the sports rule.
        let defaults = AmenityDefaults::standard();
        let bundle = defaults.bundle_for("sports hall").expect("rule matches");
        assert!(bundle.contains(&"stage".to_string()));
        assert!(!bundle.contains(&"scoreboard".to_string()));
    }

    #[test]
    fn unmatched_space_type_has_no_defaults() {
        let defaults = AmenityDefaults::standard();
        assert!(defaults.bundle_for("observatory dome").is_none());
    }

    #[test]
    fn apply_merges_without_clobbering_existing() {
        let defaults = AmenityDefaults::standard();
        let mut amenities: BTreeSet<String> = ["wi-fi".to_string()].into_iter().collect();
        defaults.apply("seminar room", &mut amenities);
        assert!(amenities.contains("wi-fi"));
        assert!(amenities.contains("whiteboard"));
    }
}
