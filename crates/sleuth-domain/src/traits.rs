//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the pipeline and
//! infrastructure. Implementations live in other crates.

/// A text-analysis service invoked once per normalized input
///
/// Implemented by the infrastructure layer (sleuth-llm). The call is
/// synchronous and fallible; callers that need concurrency run it on a
/// blocking worker. Any service that can turn a prompt into a textual report
/// is substitutable.
pub trait Oracle {
    /// Error type for oracle calls
    type Error;

    /// Submit a prompt and return the service's report
    fn analyze(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Short name of the backing model, for logs and metadata
    fn model_name(&self) -> &str {
        "oracle"
    }
}

impl<T: Oracle + ?Sized> Oracle for std::sync::Arc<T> {
    type Error = T::Error;

    fn analyze(&self, prompt: &str) -> Result<String, Self::Error> {
        (**self).analyze(prompt)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct Echo;

    impl Oracle for Echo {
        type Error = String;

        fn analyze(&self, prompt: &str) -> Result<String, Self::Error> {
            if prompt.is_empty() {
                Err("empty prompt".to_string())
            } else {
                Ok(prompt.to_uppercase())
            }
        }
    }

    #[test]
    fn test_default_model_name() {
        assert_eq!(Echo.model_name(), "oracle");
    }

    #[test]
    fn test_arc_delegates() {
        let oracle = Arc::new(Echo);
        assert_eq!(oracle.analyze("abc").unwrap(), "ABC");
        assert!(oracle.analyze("").is_err());
    }
}
