use regex::Regex;

/// Compiled line patterns of an Aspherix calibration log
#[derive(Debug, Clone)]
pub(crate) struct LogPatterns {
    pub run_mode: Regex,
    pub template: Regex,
    pub target_params: Regex,
    pub word: Regex,
    pub model_variable: Regex,
    pub scalar_variable: Regex,
    pub param_calibration: Regex,
    pub attempting: Regex,
    pub git_commit: Regex,
    pub version: Regex,
}

impl LogPatterns {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            run_mode: Regex::new(r"run mode (single|sequential)")?,
            template: Regex::new(r"template (\w+)")?,
            target_params: Regex::new(r"target_param(.*?)measfile")?,
            word: Regex::new(r"\w+")?,
            model_variable: Regex::new(r"variable (\w+) string (\S+)")?,
            scalar_variable: Regex::new(r"variable (\w+) string ([\d.e+-]+)")?,
            param_calibration: Regex::new(
                r"param_calibration (\w+) type (\w+) init ([\d.e+-]+) min ([\d.e+-]+) max ([\d.e+-]+)",
            )?,
            attempting: Regex::new(r"attempting to (run|restart) ")?,
            git_commit: Regex::new(r"git commit (.+)")?,
            version: Regex::new(r"This is Aspherix\(R\)calibration version (.+)")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        assert!(LogPatterns::new().is_ok());
    }

    #[test]
    fn test_target_params_is_lazy() {
        let patterns = LogPatterns::new().unwrap();
        let line = "target_param a b measfile x.txt measfile y.txt";
        let caps = patterns.target_params.captures(line).unwrap();
        assert_eq!(&caps[1], " a b ");
    }

    #[test]
    fn test_scalar_variable_rejects_words() {
        let patterns = LogPatterns::new().unwrap();
        assert!(patterns
            .scalar_variable
            .captures("variable normal_contact_model string hooke")
            .is_none());
        assert!(patterns
            .scalar_variable
            .captures("variable young_p string 5e6")
            .is_some());
    }
}
