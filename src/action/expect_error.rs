use serde::{Deserialize, Serialize};

use crate::{
    action::{Perform, call},
    arguments::Arguments,
    error::{Error, Result},
    formatter::template::Fields,
    kind::Kind,
    options::{Options, key},
    outcome::Verdict,
    runtime::Runtime,
    target::Target,
};

/// Expect the call to raise an error of [`ExpectError::kind`] or a subkind of it.
///
/// The kind is checked on construction, decoding goes through the same check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredExpectError")]
pub struct ExpectError {
    kind: Kind,
    pub arguments: Arguments,
}

#[derive(Deserialize)]
struct StoredExpectError {
    kind: Kind,
    arguments: Arguments,
}

impl TryFrom<StoredExpectError> for ExpectError {
    type Error = Error;

    fn try_from(stored: StoredExpectError) -> Result<Self> {
        Self::new(stored.kind, stored.arguments)
    }
}

impl ExpectError {
    pub fn new(kind: Kind, arguments: Arguments) -> Result<Self> {
        if !kind.is_error() {
            return Err(Error::NotAnErrorKind(kind));
        }
        Ok(Self { kind, arguments })
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }
}

impl Perform for ExpectError {
    fn perform(
        &self,
        target: &Target,
        options: &Options,
        runtime: &mut Runtime,
    ) -> Result<Option<Verdict>> {
        let result = call(target, &self.arguments, runtime.bindings());
        let fields = Fields::new(target, &self.arguments).with_expected(&self.kind);
        let (template, fields, verdict) = match &result {
            Ok(value) => (
                key::UNEXPECTED_RESULT_FORMAT,
                fields.with_result(value),
                Verdict::Failed,
            ),
            Err(raised) if raised.kind.is_subkind_of(&self.kind) => (
                key::EXPECTED_ERROR_FORMAT,
                fields.with_raised(raised),
                Verdict::Passed,
            ),
            Err(raised) => (
                key::WRONG_ERROR_FORMAT,
                fields.with_raised(raised),
                Verdict::Failed,
            ),
        };
        runtime.emit(options.template(template), &fields)?;
        runtime.record(verdict)?;
        Ok(Some(verdict))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{
        args, formatter::template::TEST_ERROR_RESULT, outcome::Counters, test_support::*,
        value::Value,
    };

    #[test]
    fn matching_errors_pass() {
        let (mut runtime, buffer) = runtime();
        ExpectError::new(Kind::value_error(), args![Vec::<Value>::new()])
            .unwrap()
            .perform(&pairwise(), &Options::default(), &mut runtime)
            .unwrap();

        assert_eq!(buffer.contents(), "Passed: pairwise([])\n");
        assert_eq!(runtime.counters(), Counters { passed: 1, failed: 0 });
    }

    #[test]
    fn subkinds_match_their_ancestors() {
        let (mut runtime, buffer) = runtime();
        let mut options = Options::default();
        options.set(key::EXPECTED_ERROR_FORMAT, TEST_ERROR_RESULT);

        let at = Target::new("at", |args| -> crate::target::CallResult {
            let items = args.get(0)?.as_seq()?;
            let index = args.get(1)?.as_int()?;
            usize::try_from(index)
                .ok()
                .and_then(|index| items.get(index).cloned())
                .ok_or_else(|| crate::target::Raised::new(Kind::index_error(), "index out of range"))
        });
        let verdict = ExpectError::new(Kind::lookup_error(), args![vec![1], 5])
            .unwrap()
            .perform(&at, &options, &mut runtime)
            .unwrap();

        assert_eq!(verdict, Some(Verdict::Passed));
        assert_eq!(buffer.contents(), "Passed: at([1], 5) raised IndexError\n");
    }

    #[test]
    fn returning_normally_fails() {
        let (mut runtime, buffer) = runtime();
        ExpectError::new(Kind::value_error(), args![vec![1, 2, 3]])
            .unwrap()
            .perform(&pairwise(), &Options::default(), &mut runtime)
            .unwrap();

        assert_eq!(
            buffer.contents(),
            "Failed: pairwise([1, 2, 3]) should raise ValueError, but no error was raised\n"
        );
        assert_eq!(runtime.counters(), Counters { passed: 0, failed: 1 });
    }

    #[test]
    fn other_kinds_fail() {
        let (mut runtime, buffer) = runtime();
        ExpectError::new(Kind::value_error(), args!["x"])
            .unwrap()
            .perform(&increment(), &Options::default(), &mut runtime)
            .unwrap();

        assert_eq!(
            buffer.contents(),
            "Failed: increment(x) raised TypeError, expected ValueError\n"
        );
        assert_eq!(runtime.counters().failed, 1);
    }

    #[test]
    fn decoding_rechecks_the_kind() {
        let stored = serde_json::json!({
            "kind": { "lineage": ["Shape", "Circle"] },
            "arguments": { "positional": [], "keywords": [] },
        });
        assert!(serde_json::from_value::<ExpectError>(stored).is_err());
    }
}
