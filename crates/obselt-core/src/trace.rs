//! Trace ids correlating a batch of warehouse work to the request behind it

use rand::distr::Alphanumeric;
use rand::Rng;

use crate::params::QueryParam;

/// Name of the parameter carrying the trace id into every submitted query
pub const TRACE_PARAM: &str = "tid";

const RANDOM_LEN: usize = 8;

/// A short, reasonably unique trace id.
///
/// Upper-cased initials of `service` and `instance` followed by eight random
/// alphanumerics, e.g. `LDx81fQ2a`.
pub fn trace_id(service: &str, instance: &str) -> String {
    let mut tid: String = [service, instance]
        .iter()
        .filter_map(|s| s.chars().next())
        .flat_map(char::to_uppercase)
        .collect();
    tid.extend(
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(RANDOM_LEN)
            .map(char::from),
    );
    tid
}

/// The `tid` parameter job-execution code appends before submission
pub fn trace_param(service: &str, instance: &str) -> QueryParam {
    QueryParam::string(TRACE_PARAM, trace_id(service, instance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ParamType;

    #[test]
    fn test_trace_id_shape() {
        let tid = trace_id("loader", "default");
        assert_eq!(tid.len(), 10);
        assert!(tid.starts_with("LD"));
        assert!(tid.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_trace_id_with_empty_parts() {
        assert_eq!(trace_id("", "").len(), RANDOM_LEN);
    }

    #[test]
    fn test_trace_ids_differ() {
        assert_ne!(trace_id("a", "b"), trace_id("a", "b"));
    }

    #[test]
    fn test_trace_param() {
        let param = trace_param("svc", "main");
        assert_eq!(param.name(), "tid");
        assert_eq!(param.ty(), ParamType::String);
        assert!(param.value().starts_with("SM"));
    }
}
