use std::fmt;

/// Error codes for all fatal conditions.
///
/// Format: E#### where first digit indicates category:
/// - E1xxx: Configuration errors
/// - E2xxx: I/O errors
/// - E3xxx: Malformed input
/// - E9xxx: Internal consistency violations
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Configuration Errors (E1xxx)
    /// Required option missing
    E1001,
    /// Unknown option
    E1002,
    /// Option given without a value
    E1003,

    // I/O Errors (E2xxx)
    /// Cannot read input file
    E2001,
    /// Cannot write output file
    E2002,

    // Malformed Input (E3xxx)
    /// Malformed model definition
    E3001,
    /// Malformed phone-set / question file
    E3002,
    /// Malformed decision tree
    E3003,
    /// Trees and model definition disagree
    E3004,

    // Internal Errors (E9xxx)
    /// Leaf count does not match ids assigned
    E9001,
    /// Resolution reached an unlabeled leaf
    E9002,
}

/// Category of an [`ErrorCode`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCategory {
    Configuration,
    Io,
    MalformedInput,
    Internal,
}

impl ErrorCode {
    /// Get the code as a string (e.g., "E3003").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E3001 => "E3001",
            ErrorCode::E3002 => "E3002",
            ErrorCode::E3003 => "E3003",
            ErrorCode::E3004 => "E3004",
            ErrorCode::E9001 => "E9001",
            ErrorCode::E9002 => "E9002",
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ErrorCode::E1001 | ErrorCode::E1002 | ErrorCode::E1003 => ErrorCategory::Configuration,
            ErrorCode::E2001 | ErrorCode::E2002 => ErrorCategory::Io,
            ErrorCode::E3001 | ErrorCode::E3002 | ErrorCode::E3003 | ErrorCode::E3004 => {
                ErrorCategory::MalformedInput
            }
            ErrorCode::E9001 | ErrorCode::E9002 => ErrorCategory::Internal,
        }
    }

    /// Internal errors indicate a defect, not bad input.
    pub fn is_internal(&self) -> bool {
        self.category() == ErrorCategory::Internal
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::E1001.to_string(), "E1001");
        assert_eq!(ErrorCode::E3003.as_str(), "E3003");
    }

    #[test]
    fn test_categories_follow_first_digit() {
        let all = [
            ErrorCode::E1001,
            ErrorCode::E1002,
            ErrorCode::E1003,
            ErrorCode::E2001,
            ErrorCode::E2002,
            ErrorCode::E3001,
            ErrorCode::E3002,
            ErrorCode::E3003,
            ErrorCode::E3004,
            ErrorCode::E9001,
            ErrorCode::E9002,
        ];
        for code in all {
            let expected = match &code.as_str()[1..2] {
                "1" => ErrorCategory::Configuration,
                "2" => ErrorCategory::Io,
                "3" => ErrorCategory::MalformedInput,
                _ => ErrorCategory::Internal,
            };
            assert_eq!(code.category(), expected, "{code}");
        }
        assert!(ErrorCode::E9001.is_internal());
        assert!(!ErrorCode::E3001.is_internal());
    }
}
