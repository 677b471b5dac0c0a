//! Compliance entities parsed from a STIG benchmark document.
//!
//! The entity graph mirrors the XCCDF structure: a benchmark holds
//! [`Group`]s, each group holds [`Rule`]s, and each rule owns its
//! remediation and verification components. Everything is built once
//! during a single parsing pass and never mutated afterwards, except for
//! the rule's user-adjustable severity and weight.

/// Severity applied when the document does not supply one.
pub const DEFAULT_SEVERITY: &str = "high";

/// Weight applied when the document does not supply one.
pub const DEFAULT_WEIGHT: &str = "10";

/// A bibliographic reference attached to a rule.
///
/// All five fields are optional; the source document may supply any
/// subset of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reference {
    /// Title of the referenced benchmark or target.
    pub title: Option<String>,
    /// Publishing organisation, e.g. "DISA FSO".
    pub publisher: Option<String>,
    /// Reference type, e.g. "VMS Target".
    pub kind: Option<String>,
    /// Subject of the reference, e.g. the targeted operating system.
    pub subject: Option<String>,
    /// Publisher-assigned identifier.
    pub identifier: Option<String>,
}

/// A cross-reference identifier attached to a rule, e.g. a CCE number.
///
/// A rule has at most one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identifier {
    /// The identification system the content belongs to.
    pub system: Option<String>,
    /// The identifier itself.
    pub content: Option<String>,
}

/// Remediation instructions for a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FixText {
    /// Cross-reference to the corresponding [`Fix`].
    pub fix_ref: Option<String>,
    /// The remediation text.
    pub content: Option<String>,
}

/// The DISA fix identifier for a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fix {
    /// DISA-assigned fix identifier.
    pub fix_id: Option<String>,
}

/// One verification procedure attached to a rule.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Check {
    /// The checking system the procedure belongs to.
    pub system: Option<String>,
    /// Name of the check content document.
    pub name: Option<String>,
    /// Location of the check content document.
    pub href: Option<String>,
    /// Inline check instructions.
    pub content: Option<String>,
}

/// One concrete compliance requirement.
///
/// A rule owns its reference, remediation, and verification components.
/// The severity and weight are stored as free text and may be adjusted
/// after construction; the DISA-provided values are captured as immutable
/// snapshots so they can always be restored. Validation of the text
/// against the severity enumeration is deferred to
/// [`derive_ticket_priority`](super::severity::derive_ticket_priority),
/// which is the only consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// DISA rule identifier, e.g. "SV-25033r1_rule".
    pub id: String,
    /// DISA-defined version string.
    pub version: Option<String>,
    /// Summary title.
    pub title: Option<String>,
    /// Longer description of the requirement.
    pub description: Option<String>,
    /// Bibliographic reference.
    pub reference: Reference,
    /// Optional cross-reference identifier.
    pub identifier: Option<Identifier>,
    /// Remediation instructions.
    pub fix_text: FixText,
    /// Fix identifier.
    pub fix: Fix,
    checks: Vec<Check>,
    severity: String,
    weight: String,
    disa_severity: String,
    disa_weight: String,
}

impl Rule {
    /// Creates a rule from its required components, using the DISA default
    /// severity and weight.
    #[must_use]
    pub fn new(id: String, reference: Reference, fix_text: FixText, fix: Fix) -> Self {
        Self::with_severity(id, reference, fix_text, fix, None, None)
    }

    /// Creates a rule with explicit severity and weight text.
    ///
    /// `None` falls back to the DISA defaults. Whatever values result are
    /// also captured as the immutable snapshots used by
    /// [`reset_severity`](Self::reset_severity) and
    /// [`reset_weight`](Self::reset_weight).
    #[must_use]
    pub fn with_severity(
        id: String,
        reference: Reference,
        fix_text: FixText,
        fix: Fix,
        severity: Option<String>,
        weight: Option<String>,
    ) -> Self {
        let severity = severity.unwrap_or_else(|| DEFAULT_SEVERITY.to_string());
        let weight = weight.unwrap_or_else(|| DEFAULT_WEIGHT.to_string());

        Self {
            id,
            version: None,
            title: None,
            description: None,
            reference,
            identifier: None,
            fix_text,
            fix,
            checks: Vec::new(),
            disa_severity: severity.clone(),
            disa_weight: weight.clone(),
            severity,
            weight,
        }
    }

    /// Appends a verification check. Insertion order is preserved.
    pub fn add_check(&mut self, check: Check) {
        self.checks.push(check);
    }

    /// The verification checks, in insertion order.
    #[must_use]
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// The current severity text.
    #[must_use]
    pub fn severity(&self) -> &str {
        &self.severity
    }

    /// The current weight text.
    #[must_use]
    pub fn weight(&self) -> &str {
        &self.weight
    }

    /// The DISA-provided severity captured at construction.
    #[must_use]
    pub fn disa_severity(&self) -> &str {
        &self.disa_severity
    }

    /// The DISA-provided weight captured at construction.
    #[must_use]
    pub fn disa_weight(&self) -> &str {
        &self.disa_weight
    }

    /// Overwrites the severity.
    ///
    /// The value is not validated here; an out-of-range severity surfaces
    /// when a ticket priority is derived.
    pub fn change_severity(&mut self, severity: String) {
        self.severity = severity;
    }

    /// Restores the severity captured at construction.
    pub fn reset_severity(&mut self) {
        self.severity.clone_from(&self.disa_severity);
    }

    /// Overwrites the weight. Not validated here, like
    /// [`change_severity`](Self::change_severity).
    pub fn change_weight(&mut self, weight: String) {
        self.weight = weight;
    }

    /// Restores the weight captured at construction.
    pub fn reset_weight(&mut self) {
        self.weight.clone_from(&self.disa_weight);
    }
}

/// One compliance checklist item, grouping a title, description, and its
/// constituent rules.
///
/// The entity itself permits any number of rules; the one-rule expectation
/// is enforced downstream at the ticket projection boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    /// DISA group identifier, e.g. "V-1090".
    pub id: String,
    /// Summary of the group's purpose.
    pub title: Option<String>,
    /// Longer description of the group.
    pub description: Option<String>,
    rules: Vec<Rule>,
}

impl Group {
    /// Creates an empty group. Each group owns a fresh rule container.
    #[must_use]
    pub const fn new(id: String, title: Option<String>, description: Option<String>) -> Self {
        Self {
            id,
            title,
            description,
            rules: Vec::new(),
        }
    }

    /// Appends a rule.
    ///
    /// Appends unconditionally: no identity check is performed, so the
    /// same rule may appear twice.
    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    /// The rules, in insertion order.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }
}
