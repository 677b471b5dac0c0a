//! Projection of checklist groups into ticket-creation payloads.
//!
//! One payload per group, built as a pure data value. Transmission is the
//! transport collaborator's concern; nothing here performs I/O.

use non_empty_string::NonEmptyString;
use serde::Serialize;

use crate::domain::{severity, Group};

/// Issue type recorded on every created ticket.
const ISSUE_TYPE_ID: &str = "7";

/// The tracker's sentinel account name meaning "unassigned".
const UNASSIGNED: &str = "-1";

/// A ticket-creation payload for one checklist group.
///
/// Serializes to the exact field shape the ticketing API expects:
///
/// ```json
/// {"fields": {"project": {"id": ".."}, "summary": "..", "issuetype": {"id": ".."},
///  "reporter": {"name": ".."}, "assignee": {"name": ".."}, "priority": {"id": ".."},
///  "labels": [".."], "environment": "", "description": ".."}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TicketPayload {
    fields: Fields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct Fields {
    project: ProjectRef,
    summary: String,
    issuetype: IssueTypeRef,
    reporter: NameRef,
    assignee: NameRef,
    priority: PriorityRef,
    labels: Vec<String>,
    environment: String,
    description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct ProjectRef {
    id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct IssueTypeRef {
    id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct NameRef {
    name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct PriorityRef {
    id: String,
}

impl TicketPayload {
    /// Projects a checklist group into a ticket-creation payload.
    ///
    /// The group must contain exactly one rule; the multi-rule case has no
    /// defined projection and is rejected rather than guessed at. The
    /// project and reporter are taken as [`NonEmptyString`] so that empty
    /// coordinates are unrepresentable at this boundary.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectError::EmptyGroup`] or
    /// [`ProjectError::MultipleRules`] when the group does not hold
    /// exactly one rule, and [`ProjectError::Priority`] when the rule's
    /// severity or weight cannot be evaluated.
    pub fn project(
        group: &Group,
        project: &NonEmptyString,
        reporter: &NonEmptyString,
    ) -> Result<Self, ProjectError> {
        let rule = match group.rules() {
            [rule] => rule,
            [] => {
                return Err(ProjectError::EmptyGroup {
                    group: group.id.clone(),
                });
            }
            rules => {
                return Err(ProjectError::MultipleRules {
                    group: group.id.clone(),
                    count: rules.len(),
                });
            }
        };

        let tier = severity::derive_ticket_priority(rule.severity(), rule.weight())?;

        Ok(Self {
            fields: Fields {
                project: ProjectRef {
                    id: project.as_str().to_string(),
                },
                summary: format!("{} {}", group.id, group.title.as_deref().unwrap_or("")),
                issuetype: IssueTypeRef {
                    id: ISSUE_TYPE_ID.to_string(),
                },
                reporter: NameRef {
                    name: reporter.as_str().to_string(),
                },
                assignee: NameRef {
                    name: UNASSIGNED.to_string(),
                },
                priority: PriorityRef {
                    id: tier.to_string(),
                },
                labels: vec![group.id.clone(), rule.id.clone()],
                environment: String::new(),
                description: format!(
                    "{}\n\n{}",
                    rule.title.as_deref().unwrap_or(""),
                    rule.description.as_deref().unwrap_or("")
                ),
            },
        })
    }

    /// The ticket summary line.
    #[must_use]
    pub fn summary(&self) -> &str {
        &self.fields.summary
    }
}

/// Errors that can occur when projecting a group into a ticket payload.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProjectError {
    /// The group contained no rules.
    #[error("group '{group}' contains no rules")]
    EmptyGroup {
        /// Identifier of the offending group.
        group: String,
    },

    /// The group contained more than the single supported rule.
    #[error("group '{group}' contains {count} rules; exactly one is supported")]
    MultipleRules {
        /// Identifier of the offending group.
        group: String,
        /// Number of rules the group actually holds.
        count: usize,
    },

    /// The rule's severity or weight could not be evaluated.
    #[error(transparent)]
    Priority(#[from] severity::Error),
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::{Fix, FixText, PriorityError, Reference, Rule};

    fn project_key() -> NonEmptyString {
        NonEmptyString::new("10108".to_string()).unwrap()
    }

    fn reporter() -> NonEmptyString {
        NonEmptyString::new("634273".to_string()).unwrap()
    }

    fn credential_caching_group() -> Group {
        let mut rule = Rule::with_severity(
            "SV-25033r1_rule".to_string(),
            Reference::default(),
            FixText::default(),
            Fix::default(),
            Some("low".to_string()),
            Some("10".to_string()),
        );
        rule.title = Some("System halts once an event log has reached its maximum size.".to_string());
        rule.description = Some("A full event log can create a denial of service.".to_string());

        let mut group = Group::new(
            "V-1090".to_string(),
            Some("Caching of logon credentials".to_string()),
            None,
        );
        group.add_rule(rule);
        group
    }

    #[test]
    fn projects_single_rule_group() {
        let group = credential_caching_group();
        let payload = TicketPayload::project(&group, &project_key(), &reporter()).unwrap();

        // severity low ranks 3; 3 * 10 = 30 falls in the top tier.
        let expected = json!({
            "fields": {
                "project": {"id": "10108"},
                "summary": "V-1090 Caching of logon credentials",
                "issuetype": {"id": "7"},
                "reporter": {"name": "634273"},
                "assignee": {"name": "-1"},
                "priority": {"id": "5"},
                "labels": ["V-1090", "SV-25033r1_rule"],
                "environment": "",
                "description": "System halts once an event log has reached its maximum size.\n\nA full event log can create a denial of service.",
            }
        });

        assert_eq!(serde_json::to_value(&payload).unwrap(), expected);
    }

    #[test]
    fn summary_joins_group_id_and_title() {
        let group = credential_caching_group();
        let payload = TicketPayload::project(&group, &project_key(), &reporter()).unwrap();
        assert_eq!(payload.summary(), "V-1090 Caching of logon credentials");
    }

    #[test]
    fn projection_is_deterministic() {
        let group = credential_caching_group();
        let first = TicketPayload::project(&group, &project_key(), &reporter()).unwrap();
        let second = TicketPayload::project(&group, &project_key(), &reporter()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_group_is_rejected() {
        let group = Group::new("V-1090".to_string(), None, None);
        let error = TicketPayload::project(&group, &project_key(), &reporter()).unwrap_err();
        assert_eq!(
            error,
            ProjectError::EmptyGroup {
                group: "V-1090".to_string()
            }
        );
    }

    #[test]
    fn multi_rule_group_is_rejected() {
        let mut group = credential_caching_group();
        let duplicate = group.rules()[0].clone();
        group.add_rule(duplicate);

        let error = TicketPayload::project(&group, &project_key(), &reporter()).unwrap_err();
        assert_eq!(
            error,
            ProjectError::MultipleRules {
                group: "V-1090".to_string(),
                count: 2
            }
        );
    }

    #[test]
    fn out_of_range_severity_surfaces_at_projection_time() {
        // Mutating the severity is always allowed; the projection is where
        // the closed enumeration is enforced.
        let mut rule = credential_caching_group().rules()[0].clone();
        rule.change_severity("catastrophic".to_string());

        let mut group = Group::new("V-1090".to_string(), None, None);
        group.add_rule(rule);

        let error = TicketPayload::project(&group, &project_key(), &reporter()).unwrap_err();
        assert_eq!(
            error,
            ProjectError::Priority(PriorityError::UnknownSeverity("catastrophic".to_string()))
        );
    }

    #[test]
    fn non_numeric_weight_surfaces_at_projection_time() {
        let mut rule = Rule::with_severity(
            "SV-1_rule".to_string(),
            Reference::default(),
            FixText::default(),
            Fix::default(),
            Some("high".to_string()),
            Some("heavy".to_string()),
        );
        rule.title = Some("t".to_string());

        let mut group = Group::new("V-1".to_string(), Some("t".to_string()), None);
        group.add_rule(rule);

        let error = TicketPayload::project(&group, &project_key(), &reporter()).unwrap_err();
        assert_eq!(
            error,
            ProjectError::Priority(PriorityError::InvalidWeight("heavy".to_string()))
        );
    }

    #[test]
    fn absent_titles_leave_their_slots_blank() {
        let mut group = Group::new("V-2".to_string(), None, None);
        group.add_rule(Rule::new(
            "SV-2_rule".to_string(),
            Reference::default(),
            FixText::default(),
            Fix::default(),
        ));

        let payload = TicketPayload::project(&group, &project_key(), &reporter()).unwrap();
        assert_eq!(payload.summary(), "V-2 ");

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["fields"]["description"], "\n\n");
        // Default severity high, weight 10: 1 * 10 = 10 -> tier 1.
        assert_eq!(value["fields"]["priority"]["id"], "1");
    }
}
