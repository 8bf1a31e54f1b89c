//! Result type returned by survey object factories

use crate::error::{ParamsError, SurveyError};

/// Either a constructed value or the validation errors that prevented it
///
/// `Errors` always carries a non-empty, ordered list.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum SurveyResult<T> {
    /// Construction succeeded
    Ok(T),
    /// Validation failed, nothing was constructed
    Errors(Vec<ParamsError>),
}

impl<T> SurveyResult<T> {
    /// Build a result from a validation outcome
    ///
    /// An empty error list produces `Ok(build())`; `build` is not called
    /// otherwise.
    pub fn from_errors(errors: Vec<ParamsError>, build: impl FnOnce() -> T) -> Self {
        if errors.is_empty() {
            Self::Ok(build())
        } else {
            Self::Errors(errors)
        }
    }

    /// Whether a value is present
    #[inline]
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    /// Whether validation errors are present
    #[inline]
    #[must_use]
    pub fn has_errors(&self) -> bool {
        matches!(self, Self::Errors(_))
    }

    /// Validation errors, empty for `Ok`
    #[must_use]
    pub fn errors(&self) -> &[ParamsError] {
        match self {
            Self::Ok(_) => &[],
            Self::Errors(errors) => errors,
        }
    }

    /// Return the value
    ///
    /// # Panics
    /// Panics when called on `Errors`. Check [`Self::is_ok`] first, or use
    /// [`Self::try_unwrap`].
    #[track_caller]
    pub fn unwrap(self) -> T {
        match self {
            Self::Ok(value) => value,
            Self::Errors(errors) => panic!("{}", SurveyError::Invalid(errors)),
        }
    }

    /// Return the value, or the errors wrapped in [`SurveyError::Invalid`]
    ///
    /// # Errors
    /// Returns [`SurveyError::Invalid`] when the result holds errors.
    pub fn try_unwrap(self) -> Result<T, SurveyError> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Errors(errors) => Err(SurveyError::Invalid(errors)),
        }
    }

    /// Convert into a standard `Result`
    ///
    /// # Errors
    /// Returns the validation errors when the result holds errors.
    pub fn into_result(self) -> Result<T, Vec<ParamsError>> {
        match self {
            Self::Ok(value) => Ok(value),
            Self::Errors(errors) => Err(errors),
        }
    }

    /// Map the contained value
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SurveyResult<U> {
        match self {
            Self::Ok(value) => SurveyResult::Ok(f(value)),
            Self::Errors(errors) => SurveyResult::Errors(errors),
        }
    }

    /// Return the value if present
    #[must_use]
    pub fn ok(self) -> Option<T> {
        match self {
            Self::Ok(value) => Some(value),
            Self::Errors(_) => None,
        }
    }
}

impl<T> From<SurveyResult<T>> for Result<T, Vec<ParamsError>> {
    fn from(result: SurveyResult<T>) -> Self {
        result.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParamsErrorKind;

    fn sample_error() -> ParamsError {
        ParamsError::new("Household", "size", ParamsErrorKind::NotPositiveInteger)
    }

    #[test]
    fn from_errors_builds_only_when_empty() {
        let ok = SurveyResult::from_errors(Vec::new(), || 42);
        assert!(ok.is_ok());
        assert!(!ok.has_errors());
        assert_eq!(ok.unwrap(), 42);

        let mut called = false;
        let errors = SurveyResult::from_errors(vec![sample_error()], || {
            called = true;
            0
        });
        assert!(errors.has_errors());
        assert_eq!(errors.errors().len(), 1);
        assert!(!called);
    }

    #[test]
    fn try_unwrap_returns_invalid() {
        let result: SurveyResult<u8> = SurveyResult::Errors(vec![sample_error()]);
        match result.try_unwrap() {
            Err(SurveyError::Invalid(errors)) => assert_eq!(errors, vec![sample_error()]),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    #[should_panic(expected = "size should be a positive integer")]
    fn unwrap_on_errors_panics() {
        let result: SurveyResult<u8> = SurveyResult::Errors(vec![sample_error()]);
        let _ = result.unwrap();
    }

    #[test]
    fn map_and_into_result() {
        let result = SurveyResult::Ok(2).map(|value| value * 10);
        assert_eq!(result.clone().ok(), Some(20));
        assert_eq!(result.into_result(), Ok(20));
    }
}
