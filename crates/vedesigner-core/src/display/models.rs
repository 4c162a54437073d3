//! Display implementations for domain models.
//!
//! Output is markdown, rendered by the CLI and returned verbatim over MCP.

use std::fmt;

use super::PlanTimestamp;
use crate::models::{Plan, ProgressSummary, Step, Task, UserSnippet};

fn write_list(f: &mut fmt::Formatter<'_>, heading: &str, items: &[String]) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(f, "## {heading}")?;
    writeln!(f)?;
    for item in items {
        writeln!(f, "- {item}")?;
    }
    writeln!(f)
}

fn yes_no(answer: Option<bool>) -> &'static str {
    match answer {
        Some(true) => "yes",
        Some(false) => "no",
        None => "unanswered",
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = if self.name.trim().is_empty() {
            "(untitled plan)"
        } else {
            self.name.as_str()
        };
        writeln!(f, "# {name}")?;
        writeln!(f)?;

        writeln!(f, "- **ID**: {}", self.id)?;
        if !self.author.is_empty() {
            writeln!(f, "- **Author**: {}", self.author)?;
        }
        if !self.write_access.is_empty() {
            writeln!(f, "- **Co-authors**: {}", self.write_access.join(", "))?;
        }
        if let Some(created) = &self.creation_timestamp {
            writeln!(f, "- **Created**: {}", PlanTimestamp(created))?;
        }
        if let Some(modified) = &self.last_modified {
            writeln!(f, "- **Modified**: {}", PlanTimestamp(modified))?;
        }
        writeln!(f)?;

        let institutions: Vec<String> = self
            .institutions
            .iter()
            .map(|i| match (i.department.trim(), i.country.trim()) {
                ("", "") => i.name.clone(),
                ("", country) => format!("{} ({country})", i.name),
                (department, "") => format!("{}, {department}", i.name),
                (department, country) => format!("{}, {department} ({country})", i.name),
            })
            .collect();
        write_list(f, "Institutions", &institutions)?;

        let lectures: Vec<String> = self
            .lectures
            .iter()
            .map(|l| match l.participants_amount {
                Some(n) => format!("{} ({n} participants)", l.name),
                None => l.name.clone(),
            })
            .collect();
        write_list(f, "Lectures", &lectures)?;

        let audience: Vec<String> = self
            .audience
            .iter()
            .map(|group| match (group.age_min, group.age_max) {
                (Some(min), Some(max)) => format!("{}, aged {min}-{max}", group.name),
                _ => group.name.clone(),
            })
            .collect();
        write_list(f, "Target groups", &audience)?;
        write_list(f, "Languages", &self.languages)?;

        if !self.learning_env.is_empty() || !self.realization.is_empty() {
            writeln!(f, "## Learning environment")?;
            writeln!(f)?;
            if !self.realization.is_empty() {
                writeln!(f, "- **Realization**: {}", self.realization)?;
            }
            writeln!(f, "- **Physical mobility**: {}", yes_no(self.physical_mobility))?;
            for mobility in &self.physical_mobilities {
                writeln!(f, "  - {}", mobility.location)?;
            }
            if !self.learning_env.is_empty() {
                writeln!(f)?;
                writeln!(f, "{}", self.learning_env)?;
            }
            writeln!(f)?;
        }

        if !self.steps.is_empty() {
            writeln!(f, "## Steps")?;
            writeln!(f)?;
            for (index, step) in self.steps.iter().enumerate() {
                write!(f, "### {}. ", index + 1)?;
                step.fmt_step(f)?;
            }
        }

        Ok(())
    }
}

impl Step {
    /// Step body without the leading heading marker, so plan and page views
    /// can choose their own heading level.
    fn fmt_step(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f)?;

        if let Some(id) = &self.id {
            writeln!(f, "- **ID**: {id}")?;
        }
        writeln!(f, "- **Workload**: {} h", self.workload)?;
        match (&self.timestamp_from, &self.timestamp_to) {
            (Some(from), Some(to)) => {
                writeln!(f, "- **Period**: {} to {}", PlanTimestamp(from), PlanTimestamp(to))?
            }
            (Some(from), None) => writeln!(f, "- **From**: {}", PlanTimestamp(from))?,
            (None, Some(to)) => writeln!(f, "- **Until**: {}", PlanTimestamp(to))?,
            (None, None) => {}
        }
        if !self.learning_goal.is_empty() {
            writeln!(f, "- **Learning goal**: {}", self.learning_goal)?;
        }
        writeln!(f)?;

        if !self.learning_activity.is_empty() {
            writeln!(f, "{}", self.learning_activity)?;
            writeln!(f)?;
        }

        if self.has_tasks && !self.tasks.is_empty() {
            writeln!(f, "#### Tasks")?;
            writeln!(f)?;
            for task in &self.tasks {
                writeln!(f, "{task}")?;
            }
            writeln!(f)?;
        }

        Ok(())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "### ")?;
        self.fmt_step(f)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "- {}", self.task_formulation)?;
        if !self.work_mode.is_empty() {
            write!(f, " ({})", self.work_mode)?;
        }
        if !self.tools.is_empty() {
            write!(f, "; tools: {}", self.tools.join(", "))?;
        }
        if !self.materials.is_empty() {
            write!(f, "; materials: {}", self.materials.join(", "))?;
        }
        Ok(())
    }
}

impl fmt::Display for ProgressSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} completed", self.completed, self.total)?;
        if self.in_progress > 0 {
            write!(f, ", {} in progress", self.in_progress)?;
        }
        Ok(())
    }
}

impl fmt::Display for UserSnippet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())?;
        if !self.institution.is_empty() {
            write!(f, " ({})", self.institution)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_plan_overview_sections() {
        let plan: Plan = serde_json::from_value(json!({
            "_id": "p1",
            "name": "Climate VE",
            "author": "alice",
            "institutions": [{"name": "TU Berlin", "country": "DE"}],
            "steps": [{"_id": "s1", "name": "Kickoff", "workload": 4}]
        }))
        .unwrap();

        let output = plan.to_string();
        assert!(output.starts_with("# Climate VE\n"));
        assert!(output.contains("- TU Berlin (DE)"));
        assert!(output.contains("### 1. Kickoff"));
        assert!(output.contains("- **Workload**: 4 h"));
        assert!(!output.contains("## Lectures"));
    }

    #[test]
    fn test_untitled_plan() {
        assert!(Plan::empty("p2").to_string().starts_with("# (untitled plan)"));
    }

    #[test]
    fn test_progress_summary() {
        let summary = ProgressSummary {
            completed: 3,
            in_progress: 1,
            total: 9,
        };
        assert_eq!(summary.to_string(), "3/9 completed, 1 in progress");
    }
}
