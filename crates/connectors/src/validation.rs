//! Two-phase record validation.
//!
//! A cheap probe decides whether a raw record is a finalized transaction. Only
//! then is the record parsed against the partner's full schema, and a failure
//! at that point is a [`SchemaViolation`].

use crate::error::SchemaViolation;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Minimal view of a raw record: status plus whichever financial fields the
/// partner needs populated before a record counts as final.
pub trait Probe: DeserializeOwned {
    fn is_final(&self) -> bool;
}

/// Outcome of validating a single raw record.
#[derive(Debug)]
pub enum Verdict<S> {
    /// Record is not a finalized transaction (or does not even look like one).
    Skip,
    /// Record passed the strict schema.
    Accept(S),
}

impl<S> Verdict<S> {
    pub fn accepted(self) -> Option<S> {
        match self {
            Verdict::Accept(s) => Some(s),
            Verdict::Skip => None,
        }
    }
}

pub fn validate<P, S>(partner: &str, raw: &Value) -> Result<Verdict<S>, SchemaViolation>
where
    P: Probe,
    S: DeserializeOwned,
{
    let probe = match P::deserialize(raw) {
        Ok(probe) => probe,
        Err(e) => {
            debug!(partner, error = %e, "Record does not match probe shape; skipping.");
            return Ok(Verdict::Skip);
        }
    };

    if !probe.is_final() {
        return Ok(Verdict::Skip);
    }

    S::deserialize(raw)
        .map(Verdict::Accept)
        .map_err(|e| SchemaViolation::new(partner, e.to_string()))
}

/// A populated optional field: present and not JSON `null`.
pub fn populated(field: &Option<Value>) -> bool {
    matches!(field, Some(v) if !v.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Deserialize)]
    struct TestProbe {
        status: String,
        #[serde(default)]
        amount: Option<Value>,
    }

    impl Probe for TestProbe {
        fn is_final(&self) -> bool {
            self.status == "done" && populated(&self.amount)
        }
    }

    #[derive(Debug, Deserialize)]
    struct TestStrict {
        id: String,
        amount: f64,
    }

    #[test]
    fn accepts_final_and_well_formed() {
        let raw = json!({"status": "done", "id": "a", "amount": 1.5});
        let tx = validate::<TestProbe, TestStrict>("t", &raw)
            .unwrap()
            .accepted()
            .unwrap();
        assert_eq!(tx.id, "a");
        assert_eq!(tx.amount, 1.5);
    }

    #[test]
    fn skips_non_final_even_when_malformed() {
        let raw = json!({"status": "waiting", "amount": "garbage"});
        assert!(matches!(
            validate::<TestProbe, TestStrict>("t", &raw),
            Ok(Verdict::Skip)
        ));
    }

    #[test]
    fn skips_final_status_with_missing_amount() {
        let raw = json!({"status": "done", "id": "a", "amount": null});
        assert!(matches!(
            validate::<TestProbe, TestStrict>("t", &raw),
            Ok(Verdict::Skip)
        ));
    }

    #[test]
    fn skips_records_that_fail_the_probe() {
        let raw = json!(["not", "an", "object"]);
        assert!(matches!(
            validate::<TestProbe, TestStrict>("t", &raw),
            Ok(Verdict::Skip)
        ));
    }

    #[test]
    fn strict_failure_is_a_violation() {
        let raw = json!({"status": "done", "amount": 2.0});
        let err = validate::<TestProbe, TestStrict>("t", &raw).unwrap_err();
        assert_eq!(err.partner, "t");
        assert!(err.reason.contains("id"));
    }
}
