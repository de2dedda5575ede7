//! Consent and privacy banner removal for crawled markdown
//!
//! Lines are checked against an ordered rule table; the first rule that
//! matches decides what happens to the line. Lines matched by no rule go
//! through a small state machine that tracks whether we are inside a banner.
//!
//! This is a heuristic. Body text that mentions "privacy" or "consent" right
//! after a banner is treated as part of the banner, and a content line holding
//! both "Privacy policy" and "Legal Notice" opens a banner. The line that ends
//! a banner is dropped whenever it mentions a category label anywhere, not
//! only when it is a bare label, so "Marketing cookies help us" is lost.
//! Banners that use none of the marker phrases pass through untouched.

use super::collapse_blank_runs;

/// Category labels that appear as bare lines inside consent dialogs
pub const CATEGORY_LABELS: [&str; 3] = ["Essential", "Functional", "Marketing"];

/// Action taken for a line matched by a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Drop the line and start discarding until real content shows up
    EnterBanner,
    /// Drop the line, leave the banner state alone
    Drop,
}

/// One entry of the rule table
#[derive(Debug, Clone, Copy)]
pub struct LineRule {
    pub name: &'static str,
    pub matches: fn(&str) -> bool,
    pub verdict: Verdict,
}

/// Rules in evaluation order
pub const DEFAULT_RULES: &[LineRule] = &[
    LineRule {
        name: "consent-skip-link",
        matches: |l| l.contains("Skip to consent choices"),
        verdict: Verdict::EnterBanner,
    },
    LineRule {
        name: "privacy-preferences",
        matches: |l| l.contains("Privacy preferences"),
        verdict: Verdict::EnterBanner,
    },
    LineRule {
        name: "cookie-notice",
        matches: |l| l.contains("We use cookies and similar technologies"),
        verdict: Verdict::EnterBanner,
    },
    LineRule {
        name: "processing-consent",
        matches: |l| l.contains("The data processing may take place with your consent"),
        verdict: Verdict::EnterBanner,
    },
    LineRule {
        name: "third-country-transfer",
        matches: |l| l.contains("Some services process personal data in unsecure third countries"),
        verdict: Verdict::EnterBanner,
    },
    LineRule {
        name: "age-notice",
        matches: |l| l.contains("You are under 16 years old? Then you cannot consent"),
        verdict: Verdict::EnterBanner,
    },
    LineRule {
        name: "policy-links",
        matches: |l| l.contains("Privacy policy") && l.contains("Legal Notice"),
        verdict: Verdict::EnterBanner,
    },
    LineRule {
        name: "cookie-plugin",
        matches: |l| l.contains("WordPress Cookie Plugin"),
        verdict: Verdict::EnterBanner,
    },
    LineRule {
        name: "consent-buttons",
        matches: |l| l.contains("Accept all") && l.contains("Continue without consent"),
        verdict: Verdict::EnterBanner,
    },
    LineRule {
        name: "category-label",
        matches: |l| CATEGORY_LABELS.contains(&l.trim()),
        verdict: Verdict::EnterBanner,
    },
    LineRule {
        name: "gdpr-citation",
        matches: |l| l.contains("Art. 49 (1) (a) GDPR"),
        verdict: Verdict::Drop,
    },
];

/// Removes consent banners from crawled markdown
#[derive(Debug, Clone)]
pub struct BoilerplateFilter {
    rules: Vec<LineRule>,
}

impl Default for BoilerplateFilter {
    fn default() -> Self {
        Self::new(DEFAULT_RULES.to_vec())
    }
}

impl BoilerplateFilter {
    /// Create a filter with a custom rule table
    pub fn new(rules: Vec<LineRule>) -> Self {
        Self { rules }
    }

    /// First rule matching `line`, if any
    pub fn classify(&self, line: &str) -> Option<&LineRule> {
        self.rules.iter().find(|rule| (rule.matches)(line))
    }

    /// Strip banner line runs, collapse blank runs and trim
    pub fn clean(&self, markdown: &str) -> String {
        let mut kept: Vec<&str> = Vec::new();
        let mut in_banner = false;
        let mut swallow_blank = false;

        for line in markdown.split('\n') {
            if let Some(rule) = self.classify(line) {
                if rule.verdict == Verdict::EnterBanner {
                    in_banner = true;
                    swallow_blank = true;
                }
                continue;
            }

            if in_banner {
                if looks_like_content(line) {
                    in_banner = false;
                    if !mentions_category_label(line) {
                        kept.push(line);
                    }
                }
                continue;
            }

            if swallow_blank && line.trim().is_empty() {
                swallow_blank = false;
                continue;
            }

            kept.push(line);
        }

        collapse_blank_runs(&kept.join("\n")).trim().to_string()
    }
}

/// A heading, or a non-empty line that talks about neither consent nor privacy
fn looks_like_content(line: &str) -> bool {
    line.starts_with('#')
        || (!line.trim().is_empty() && !line.contains("consent") && !line.contains("privacy"))
}

fn mentions_category_label(line: &str) -> bool {
    CATEGORY_LABELS.iter().any(|label| line.contains(label))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule_name(line: &str) -> Option<&'static str> {
        BoilerplateFilter::default().classify(line).map(|r| r.name)
    }

    #[test]
    fn test_banner_followed_by_heading() {
        let input = "We use cookies and similar technologies on our website.\n\
                     \n\
                     Essential\n\
                     Functional\n\
                     Marketing\n\
                     \n\
                     ## Real Content\n\
                     \n\
                     Race formats and divisions.";
        let cleaned = BoilerplateFilter::default().clean(input);

        assert!(cleaned.starts_with("## Real Content"));
        assert!(cleaned.contains("Race formats and divisions."));
        assert!(!cleaned.contains("cookies"));
        for label in CATEGORY_LABELS {
            assert!(!cleaned.lines().any(|l| l.trim() == label));
        }
    }

    #[test]
    fn test_plain_markdown_untouched() {
        let input = "# Title\n\nFirst paragraph.\n\nSecond paragraph.";
        assert_eq!(BoilerplateFilter::default().clean(input), input);
    }

    #[test]
    fn test_gdpr_line_dropped_outside_banner() {
        let input = "Intro\nConsent per Art. 49 (1) (a) GDPR applies.\nOutro";
        assert_eq!(BoilerplateFilter::default().clean(input), "Intro\nOutro");
    }

    #[test]
    fn test_banner_lines_mentioning_consent_are_discarded() {
        let input = "Privacy preferences\n\
                     You can revoke your consent at any time.\n\
                     Read our privacy statement.\n\
                     Train for the race.";
        assert_eq!(BoilerplateFilter::default().clean(input), "Train for the race.");
    }

    #[test]
    fn test_exit_line_with_label_is_dropped() {
        let input = "Skip to consent choices\nMarketing cookies help us\nNext line";
        assert_eq!(BoilerplateFilter::default().clean(input), "Next line");
    }

    #[test]
    fn test_first_blank_after_banner_swallowed() {
        let input = "Before\nWordPress Cookie Plugin by Real Cookie Banner\nAfter\n\nTail";
        assert_eq!(BoilerplateFilter::default().clean(input), "Before\nAfter\nTail");
    }

    #[test]
    fn test_blank_runs_collapsed_and_trimmed() {
        let input = "\n\nA\n\n\n\n\nB\n\n";
        assert_eq!(BoilerplateFilter::default().clean(input), "A\n\nB");
    }

    #[test]
    fn test_rule_order_and_names() {
        assert_eq!(rule_name("Skip to consent choices"), Some("consent-skip-link"));
        assert_eq!(rule_name("  Functional  "), Some("category-label"));
        assert_eq!(rule_name("Functional training"), None);
        assert_eq!(rule_name("Privacy policy | Legal Notice"), Some("policy-links"));
        assert_eq!(rule_name("Privacy policy"), None);
        assert_eq!(rule_name("Accept all / Continue without consent"), Some("consent-buttons"));
        assert_eq!(rule_name("see Art. 49 (1) (a) GDPR"), Some("gdpr-citation"));
    }

    #[test]
    fn test_known_false_positive_is_preserved() {
        // Real content that carries both policy links still opens a banner
        let input = "Our Privacy policy and Legal Notice were updated.\nWelcome back!";
        assert_eq!(BoilerplateFilter::default().clean(input), "Welcome back!");
    }
}
