//! HTML audit report rendering.
//!
//! Renders every group and rule with the full compliance field set, in
//! document order, for human review. The format is a plain field dump;
//! styling is out of scope.

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::Utc;
use tracing::debug;

use crate::domain::Group;

/// Renders the audit report for the given groups to a writer.
///
/// # Errors
///
/// Returns an error if the writer fails.
pub fn render<W: Write>(groups: &[Group], writer: &mut W) -> io::Result<()> {
    writeln!(writer, "<html><body>")?;

    for group in groups {
        writeln!(writer, "{}<br>", group.id)?;
        writeln!(writer, "{}<br>", group.title.as_deref().unwrap_or(""))?;
        writeln!(writer, "{}<br>", group.description.as_deref().unwrap_or(""))?;

        for rule in group.rules() {
            writeln!(writer, "****Rule****<br>")?;
            writeln!(writer, "ID: {}<br>", rule.id)?;
            writeln!(writer, "DISA Severity: {}<br>", rule.disa_severity())?;
            writeln!(writer, "Rule Severity: {}<br>", rule.severity())?;
            writeln!(writer, "DISA Weight: {}<br>", rule.disa_weight())?;
            writeln!(writer, "Rule Weight: {}<br>", rule.weight())?;
            writeln!(
                writer,
                "Version: {}<br>",
                rule.version.as_deref().unwrap_or("")
            )?;
            writeln!(writer, "Title: {}<br>", rule.title.as_deref().unwrap_or(""))?;
            writeln!(writer, "Description:<br>")?;
            writeln!(
                writer,
                "\t{}<br>",
                rule.description.as_deref().unwrap_or("")
            )?;

            writeln!(writer, "Reference:<br>")?;
            let reference = &rule.reference;
            writeln!(
                writer,
                "\tRef Title:\t{}<br>",
                reference.title.as_deref().unwrap_or("")
            )?;
            writeln!(
                writer,
                "\tRef Publisher:\t{}<br>",
                reference.publisher.as_deref().unwrap_or("")
            )?;
            writeln!(
                writer,
                "\tRef Type:\t{}<br>",
                reference.kind.as_deref().unwrap_or("")
            )?;
            writeln!(
                writer,
                "\tRef Subject:\t{}<br>",
                reference.subject.as_deref().unwrap_or("")
            )?;
            writeln!(
                writer,
                "\tRef Identifier:\t{}<br>",
                reference.identifier.as_deref().unwrap_or("")
            )?;

            let ident = rule
                .identifier
                .as_ref()
                .and_then(|identifier| identifier.content.as_deref())
                .unwrap_or("None");
            writeln!(writer, "Ident: {ident}<br>")?;

            writeln!(writer, "Fixtext:<br>")?;
            writeln!(
                writer,
                "\tFixref: {}<br>",
                rule.fix_text.fix_ref.as_deref().unwrap_or("")
            )?;
            writeln!(
                writer,
                "\tContent: {}<br>",
                rule.fix_text.content.as_deref().unwrap_or("")
            )?;

            writeln!(writer, "Fix:<br>")?;
            writeln!(
                writer,
                "\tID:\t{}<br>",
                rule.fix.fix_id.as_deref().unwrap_or("")
            )?;

            writeln!(writer, "# Rule Checks:\t{}<br>", rule.checks().len())?;
            writeln!(writer, "*****************************<br>")?;
        }
    }

    writeln!(writer, "</body></html>")
}

/// Writes the audit report into the given directory as
/// `results.<timestamp>.html`, returning the path of the written file.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_to_dir(groups: &[Group], dir: &Path) -> io::Result<PathBuf> {
    let path = dir.join(format!("results.{}.html", Utc::now().timestamp()));

    let file = File::create(&path)?;
    let mut writer = BufWriter::new(file);
    render(groups, &mut writer)?;
    writer.flush()?;

    debug!(path = %path.display(), "wrote audit report");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Check, Fix, FixText, Group, Identifier, Reference, Rule};

    fn sample_groups() -> Vec<Group> {
        let mut rule = Rule::with_severity(
            "SV-25033r1_rule".to_string(),
            Reference {
                title: Some("VMS Target Windows 7".to_string()),
                publisher: Some("DISA FSO".to_string()),
                kind: Some("VMS Target".to_string()),
                subject: Some("Windows 7".to_string()),
                identifier: Some("1712".to_string()),
            },
            FixText {
                fix_ref: Some("F-31r1_fix".to_string()),
                content: Some("Relocate equipment.".to_string()),
            },
            Fix {
                fix_id: Some("F-29449r1_fix".to_string()),
            },
            Some("low".to_string()),
            Some("10.0".to_string()),
        );
        rule.version = Some("3.015".to_string());
        rule.title = Some("System halts once an event log is full.".to_string());
        rule.description = Some("Denial of service risk.".to_string());
        rule.identifier = Some(Identifier {
            system: Some("http://cce.mitre.org".to_string()),
            content: Some("CCE-10602-1".to_string()),
        });
        rule.add_check(Check::default());
        rule.add_check(Check::default());

        let mut group = Group::new(
            "V-1090".to_string(),
            Some("Caching of logon credentials".to_string()),
            Some("desc".to_string()),
        );
        group.add_rule(rule);

        vec![group, Group::new("V-1091".to_string(), None, None)]
    }

    fn rendered() -> String {
        let mut buffer = Vec::new();
        render(&sample_groups(), &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn report_is_wrapped_in_html() {
        let html = rendered();
        assert!(html.starts_with("<html><body>"));
        assert!(html.trim_end().ends_with("</body></html>"));
    }

    #[test]
    fn report_contains_every_rule_field() {
        let html = rendered();

        for expected in [
            "V-1090<br>",
            "Caching of logon credentials<br>",
            "ID: SV-25033r1_rule<br>",
            "DISA Severity: low<br>",
            "Rule Severity: low<br>",
            "DISA Weight: 10.0<br>",
            "Rule Weight: 10.0<br>",
            "Version: 3.015<br>",
            "\tRef Title:\tVMS Target Windows 7<br>",
            "\tRef Publisher:\tDISA FSO<br>",
            "\tRef Type:\tVMS Target<br>",
            "\tRef Subject:\tWindows 7<br>",
            "\tRef Identifier:\t1712<br>",
            "Ident: CCE-10602-1<br>",
            "\tFixref: F-31r1_fix<br>",
            "\tContent: Relocate equipment.<br>",
            "\tID:\tF-29449r1_fix<br>",
            "# Rule Checks:\t2<br>",
        ] {
            assert!(html.contains(expected), "missing {expected:?} in {html}");
        }
    }

    #[test]
    fn groups_render_in_order() {
        let html = rendered();
        let first = html.find("V-1090").unwrap();
        let second = html.find("V-1091").unwrap();
        assert!(first < second);
    }

    #[test]
    fn altered_severity_renders_alongside_the_snapshot() {
        let mut groups = sample_groups();
        let mut rule = groups[0].rules()[0].clone();
        rule.change_severity("medium".to_string());

        let mut group = Group::new("V-1090".to_string(), None, None);
        group.add_rule(rule);
        groups[0] = group;

        let mut buffer = Vec::new();
        render(&groups, &mut buffer).unwrap();
        let html = String::from_utf8(buffer).unwrap();

        assert!(html.contains("DISA Severity: low<br>"));
        assert!(html.contains("Rule Severity: medium<br>"));
    }

    #[test]
    fn write_to_dir_stamps_the_filename() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_to_dir(&sample_groups(), dir.path()).unwrap();

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("results."));
        assert!(name.ends_with(".html"));

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("V-1090"));
    }
}
