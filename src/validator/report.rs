use std::fmt;

#[cfg(feature = "colorized_output")]
use console::style;

const TITLE: &str = "Warehouse Validation Report";
const RULE: &str = "===========================";

/// Validation check result status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed
    Ok,
    /// Check passed with warnings
    Warning(String),
    /// Check failed
    Failed(String),
}

impl CheckStatus {
    /// Whether the check passed cleanly
    pub fn is_ok(&self) -> bool {
        matches!(self, CheckStatus::Ok)
    }

    /// Whether the check produced a warning
    pub fn is_warning(&self) -> bool {
        matches!(self, CheckStatus::Warning(_))
    }

    /// Whether the check failed
    pub fn is_failed(&self) -> bool {
        matches!(self, CheckStatus::Failed(_))
    }

    fn tone(&self) -> Tone {
        match self {
            CheckStatus::Ok => Tone::Good,
            CheckStatus::Warning(_) => Tone::Caution,
            CheckStatus::Failed(_) => Tone::Bad,
        }
    }
}

/// One check run against one warehouse file (or the warehouse itself)
#[derive(Debug, Clone)]
pub struct ValidationCheck {
    /// File the check applies to, or the warehouse directory
    pub subject: String,
    /// What was checked
    pub name: String,
    /// Result status of the check
    pub status: CheckStatus,
}

impl ValidationCheck {
    pub(crate) fn ok(subject: impl Into<String>, name: impl Into<String>) -> Self {
        Self::with_status(subject, name, CheckStatus::Ok)
    }

    pub(crate) fn warning(
        subject: impl Into<String>,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::with_status(subject, name, CheckStatus::Warning(message.into()))
    }

    pub(crate) fn failed(
        subject: impl Into<String>,
        name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::with_status(subject, name, CheckStatus::Failed(message.into()))
    }

    fn with_status(subject: impl Into<String>, name: impl Into<String>, status: CheckStatus) -> Self {
        Self {
            subject: subject.into(),
            name: name.into(),
            status,
        }
    }
}

/// Integrity report for a warehouse directory
#[derive(Debug)]
pub struct ValidationReport {
    /// Warehouse directory that was validated
    pub warehouse: String,
    /// Individual check results, in the order they ran
    pub checks: Vec<ValidationCheck>,
}

impl ValidationReport {
    /// Create an empty report for a warehouse directory
    pub fn new(warehouse: impl Into<String>) -> Self {
        Self {
            warehouse: warehouse.into(),
            checks: Vec::new(),
        }
    }

    /// Add a validation check result to the report
    pub fn add_check(&mut self, check: ValidationCheck) {
        self.checks.push(check);
    }

    /// Checks run against one subject
    pub fn checks_for<'a>(&'a self, subject: &'a str) -> impl Iterator<Item = &'a ValidationCheck> + 'a {
        self.checks.iter().filter(move |c| c.subject == subject)
    }

    /// Distinct subjects, in first-seen order
    pub fn subjects(&self) -> Vec<&str> {
        let mut subjects: Vec<&str> = Vec::new();
        for check in &self.checks {
            if !subjects.contains(&check.subject.as_str()) {
                subjects.push(&check.subject);
            }
        }
        subjects
    }

    /// Check if any validation checks failed
    pub fn has_failures(&self) -> bool {
        self.checks.iter().any(|c| c.status.is_failed())
    }

    /// Check if any validation checks produced warnings
    pub fn has_warnings(&self) -> bool {
        self.checks.iter().any(|c| c.status.is_warning())
    }

    /// Count the number of successful checks
    pub fn success_count(&self) -> usize {
        self.checks.iter().filter(|c| c.status.is_ok()).count()
    }

    /// Count the number of warnings
    pub fn warning_count(&self) -> usize {
        self.checks.iter().filter(|c| c.status.is_warning()).count()
    }

    /// Count the number of failures
    pub fn failure_count(&self) -> usize {
        self.checks.iter().filter(|c| c.status.is_failed()).count()
    }

    /// Format the report with colors (requires console feature)
    pub fn format_colored(&self) -> String {
        #[cfg(feature = "colorized_output")]
        {
            self.render(|tone, text| {
                let styled = style(text);
                match tone {
                    Tone::Plain => styled.bold().to_string(),
                    Tone::Heading => styled.bold().cyan().to_string(),
                    Tone::Good => styled.green().to_string(),
                    Tone::Caution => styled.yellow().to_string(),
                    Tone::Bad => styled.red().to_string(),
                }
            })
        }

        #[cfg(not(feature = "colorized_output"))]
        {
            self.to_string()
        }
    }

    fn render(&self, paint: impl Fn(Tone, &str) -> String) -> String {
        let mut out = String::new();
        out.push_str(&paint(Tone::Heading, TITLE));
        out.push('\n');
        out.push_str(&paint(Tone::Heading, RULE));
        out.push('\n');
        out.push_str(&format!("{}: {}\n", paint(Tone::Plain, "Warehouse"), self.warehouse));

        for subject in self.subjects() {
            out.push('\n');
            out.push_str(&paint(Tone::Plain, subject));
            out.push('\n');
            for check in self.checks_for(subject) {
                let symbol = match check.status {
                    CheckStatus::Ok => "✓",
                    CheckStatus::Warning(_) => "⚠",
                    CheckStatus::Failed(_) => "✗",
                };
                let tone = check.status.tone();
                out.push_str(&format!("  [{}] {}", paint(tone, symbol), check.name));
                match &check.status {
                    CheckStatus::Ok => {}
                    CheckStatus::Warning(msg) => {
                        out.push_str(&format!(" - {}: {}", paint(tone, "WARNING"), msg))
                    }
                    CheckStatus::Failed(msg) => {
                        out.push_str(&format!(" - {}: {}", paint(tone, "FAILED"), msg))
                    }
                }
                out.push('\n');
            }
        }

        out.push('\n');
        out.push_str(&format!(
            "{}: {} files, {} passed, {} warnings, {} failed\n",
            paint(Tone::Plain, "Summary"),
            self.subjects().len(),
            self.success_count(),
            self.warning_count(),
            self.failure_count()
        ));
        let verdict = if self.has_failures() {
            paint(Tone::Bad, "Validation FAILED")
        } else if self.has_warnings() {
            paint(Tone::Caution, "Validation PASSED with warnings")
        } else {
            paint(Tone::Good, "Validation PASSED")
        };
        out.push_str(&verdict);
        out.push('\n');
        out
    }
}

#[derive(Debug, Clone, Copy)]
enum Tone {
    Plain,
    Heading,
    Good,
    Caution,
    Bad,
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(|_, text| text.to_string()))
    }
}
