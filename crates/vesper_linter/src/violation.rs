use vesper_diagnostics::{DiagnosticKind, Severity};

use crate::registry::Rule;

/// One reportable finding of a rule.
///
/// A violation knows which [`Rule`] it belongs to and how to phrase
/// itself; the checker supplies the location.
pub trait Violation {
    const RULE: Rule;

    fn message(&self) -> String;

    fn severity(&self) -> Severity {
        Severity::Warning
    }
}

pub(crate) fn diagnostic_kind<V: Violation>(violation: &V) -> DiagnosticKind {
    DiagnosticKind {
        name: V::RULE.name(),
        body: violation.message(),
    }
}

#[cfg(test)]
mod tests {
    use vesper_diagnostics::Severity;

    use super::{diagnostic_kind, Violation};
    use crate::registry::Rule;

    struct Dummy;

    impl Violation for Dummy {
        const RULE: Rule = Rule::LineTooLong;

        fn message(&self) -> String {
            "too long".to_string()
        }
    }

    #[test]
    fn kind_carries_rule_name_and_body() {
        let kind = diagnostic_kind(&Dummy);
        assert_eq!(kind.name, "line-too-long");
        assert_eq!(kind.body, "too long");
        assert_eq!(Dummy.severity(), Severity::Warning);
    }
}
