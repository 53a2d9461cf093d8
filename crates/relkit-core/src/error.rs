use std::fmt;

/// Machine-readable error codes shared by every relkit crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidShape,
    TransportFailed,
    ComputeFailed,
    ConfigParseError,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidShape => "E1001",
            Self::TransportFailed => "E2001",
            Self::ComputeFailed => "E3001",
            Self::ConfigParseError => "E4001",
        }
    }

    /// Short human-facing summary for logs.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidShape => "Input does not match the expected mapping shape",
            Self::TransportFailed => "Resource fetch failed",
            Self::ComputeFailed => "Memoized computation failed",
            Self::ConfigParseError => "Config file parse error",
        }
    }

    /// Optional remediation hint.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InvalidShape => {
                Some("Pass an array of strings, an object of strings, or an object of objects of strings.")
            }
            Self::TransportFailed => Some("Check the resource URL and network reachability, then retry."),
            Self::ComputeFailed => Some("The slot stays uncomputed; the next read retries."),
            Self::ConfigParseError => Some("Fix syntax in the loader config file and retry."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorCode;
    use std::collections::HashSet;

    #[test]
    fn all_codes_are_unique() {
        let all = [
            ErrorCode::InvalidShape,
            ErrorCode::TransportFailed,
            ErrorCode::ComputeFailed,
            ErrorCode::ConfigParseError,
        ];

        let mut seen = HashSet::new();
        for code in all {
            assert!(seen.insert(code.code()), "duplicate code {}", code.code());
            assert!(code.hint().is_some());
        }
    }

    #[test]
    fn code_format_is_machine_friendly() {
        let code = ErrorCode::TransportFailed.code();
        assert_eq!(code.len(), 5);
        assert!(code.starts_with('E'));
        assert!(code.chars().skip(1).all(|c| c.is_ascii_digit()));
        assert_eq!(ErrorCode::InvalidShape.to_string(), "E1001");
    }
}
