//! How the process is triggered.

/// Set by the Lambda runtime in every function's environment.
pub const LAMBDA_FUNCTION_NAME_ENV: &str = "AWS_LAMBDA_FUNCTION_NAME";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Clean once and exit.
    Once,
    /// Serve Lambda invocations; each one is a full clean.
    Lambda,
}

impl RunMode {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Presence of the function name is enough, whatever its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        match lookup(LAMBDA_FUNCTION_NAME_ENV) {
            Some(_) => RunMode::Lambda,
            None => RunMode::Once,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::unset(None, RunMode::Once)]
    #[case::named(Some("ecr-cleaner"), RunMode::Lambda)]
    #[case::empty(Some(""), RunMode::Lambda)]
    fn mode_follows_function_name(#[case] value: Option<&str>, #[case] expected: RunMode) {
        let mode = RunMode::from_lookup(|key| {
            assert_eq!(key, LAMBDA_FUNCTION_NAME_ENV);
            value.map(str::to_string)
        });
        assert_eq!(mode, expected);
    }
}
