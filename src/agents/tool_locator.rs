use which::which;

/// Answers whether an external program can be found on the search path.
pub trait ToolLocator {
    fn exists(&self, program: &str) -> bool;
}

/// Resolves programs against `PATH`.
#[derive(Debug, Default)]
pub struct PathLocator;

impl ToolLocator for PathLocator {
    fn exists(&self, program: &str) -> bool {
        if program.is_empty() {
            return false;
        }
        which(program).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_common_programs() {
        assert!(PathLocator.exists("sh"));
        assert!(PathLocator.exists("echo"));
    }

    #[test]
    fn rejects_unknown_and_empty_names() {
        assert!(!PathLocator.exists("commandthatdoesnotexist123"));
        assert!(!PathLocator.exists(""));
    }
}
