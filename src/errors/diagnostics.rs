use std::slice::Iter;

use super::errors::Error;

/// Append-only sink for compiler errors, paired with the fatal flag of the
/// compilation unit it belongs to.
///
/// Any node may report into it or raise the flag; the pipeline reads
/// [`Diagnostics::has_fatal`] once, after the whole unit has been checked.
#[derive(Debug, Default, Clone)]
pub struct Diagnostics {
    errors: Vec<Error>,
    fatal: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report_compiler_error(&mut self, error: Error) {
        tracing::debug!(kind = error.get_error_name(), "{}", error);
        self.errors.push(error);
    }

    pub fn set_fatal(&mut self) {
        self.fatal = true;
    }

    pub fn has_fatal(&self) -> bool {
        self.fatal
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn iter(&self) -> Iter<'_, Error> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of recorded errors with the given name, e.g. `"UnknownType"`.
    pub fn count(&self, error_name: &str) -> usize {
        self.errors
            .iter()
            .filter(|error| error.get_error_name() == error_name)
            .count()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Error;
    type IntoIter = Iter<'a, Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
