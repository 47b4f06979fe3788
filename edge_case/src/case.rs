use std::fmt;
use std::sync::Arc;

/// Outcome of a failed operation.
///
/// `Rejected` is the state machine refusing the input, the signal an
/// expected-error case looks for. `Fault` is anything else and is never
/// treated as an expected outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationError<E> {
    Rejected(E),
    Fault(E),
}

impl<E> OperationError<E> {
    pub fn is_rejection(&self) -> bool {
        matches!(self, OperationError::Rejected(_))
    }

    pub fn into_inner(self) -> E {
        match self {
            OperationError::Rejected(error) | OperationError::Fault(error) => error,
        }
    }
}

impl<E: fmt::Display> fmt::Display for OperationError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationError::Rejected(error) => write!(f, "rejected: {error}"),
            OperationError::Fault(error) => write!(f, "fault: {error}"),
        }
    }
}

/// Applies an input to a state in place.
pub type Operation<S, I, E> = Arc<dyn Fn(&mut S, &I) -> Result<(), OperationError<E>> + Send + Sync>;

/// One fully prepared edge case, consumed by [`crate::execute`].
pub struct CaseDefinition<S, I, E> {
    pub description: String,
    /// Type tag of the input, e.g. `Deposit`.
    pub input_type: &'static str,
    pub state: S,
    pub input: I,
    pub operation: Operation<S, I, E>,
    pub expect_error: bool,
}

impl<S, I, E> fmt::Debug for CaseDefinition<S, I, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaseDefinition")
            .field("description", &self.description)
            .field("input_type", &self.input_type)
            .field("expect_error", &self.expect_error)
            .finish_non_exhaustive()
    }
}

/// Case metadata waiting for a builder.
pub struct Registration<S, I, E> {
    description: String,
    input_type: &'static str,
    operation: Operation<S, I, E>,
    expect_error: bool,
}

/// Declare an edge case. Attach the state/input builder with
/// [`Registration::wrap`].
pub fn register<S, I, E>(
    description: impl Into<String>,
    input_type: &'static str,
    operation: Operation<S, I, E>,
    expect_error: bool,
) -> Registration<S, I, E> {
    Registration {
        description: description.into(),
        input_type,
        operation,
        expect_error,
    }
}

impl<S: 'static, I: 'static, E: 'static> Registration<S, I, E> {
    pub fn wrap<F>(self, builder: F) -> CaseEntry<S, I, E>
    where
        F: Fn() -> anyhow::Result<(S, I)> + 'static,
    {
        let Registration {
            description,
            input_type,
            operation,
            expect_error,
        } = self;

        let name = description.clone();
        let build = move || {
            let (state, input) = builder()?;
            Ok(CaseDefinition {
                description: description.clone(),
                input_type,
                state,
                input,
                operation: Arc::clone(&operation),
                expect_error,
            })
        };

        CaseEntry {
            description: name,
            build: Box::new(build),
        }
    }
}

/// Zero-argument producer of a [`CaseDefinition`]. Every call builds a fresh
/// state, so an entry can be executed any number of times.
pub struct CaseEntry<S, I, E> {
    description: String,
    build: Box<dyn Fn() -> anyhow::Result<CaseDefinition<S, I, E>>>,
}

impl<S, I, E> CaseEntry<S, I, E> {
    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn build(&self) -> anyhow::Result<CaseDefinition<S, I, E>> {
        (self.build)()
    }
}

impl<S, I, E> fmt::Debug for CaseEntry<S, I, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaseEntry")
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}
