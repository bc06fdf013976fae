//! Overload resolution
//!
//! Hosted classes may declare several constructors or methods under one
//! name. Selection runs in two stages: candidates are filtered by exact
//! arity, then each surviving candidate is scored by summing a per-argument
//! coercion cost. The candidate with the strictly lowest total wins; a tie
//! at the minimum is reported as ambiguous rather than resolved arbitrarily.
//!
//! Per-argument costs (lower binds tighter):
//!
//! | argument        | parameter type       | cost                      |
//! |-----------------|----------------------|---------------------------|
//! | `Int` (i32 fit) | `I` / `J` / `F` / `D`| 0 / 1 / 2 / 3             |
//! | `Int` (wide)    | `J` / `F` / `D`      | 1 / 2 / 3                 |
//! | `Float`         | `D` / `F`            | 0 / 1                     |
//! | `Str`           | string / root object | 0 / 1                     |
//! | `Instance`      | reference            | ancestor-chain distance   |
//! | `Proxy`         | reference            | ancestor-chain distance   |
//! | `Null`          | any reference        | 0                         |
//! | `Bool`          | `Z`                  | 0                         |

use gantry_core::{ClassId, Ty, ROOT_CLASS};

use crate::descriptor::STRING_CLASS;
use crate::error::{BridgeError, BridgeResult};
use crate::reflect::{CtorDesc, MethodDesc};
use crate::value::{describe_args, ScriptValue};

/// Answers reference-assignability questions during scoring.
///
/// `distance` is the position of `target_path` in the argument class's
/// flattened type chain (0 for the exact class), or `None` when the
/// argument is not assignable to the parameter at all.
pub(crate) trait TypeRelation {
    fn distance(&self, arg_class: ClassId, target_path: &str) -> Option<usize>;
}

/// A constructor or method participating in selection.
pub(crate) trait Candidate {
    fn params(&self) -> &[Ty];
}

impl Candidate for CtorDesc {
    fn params(&self) -> &[Ty] {
        &self.params
    }
}

impl Candidate for MethodDesc {
    fn params(&self) -> &[Ty] {
        &self.params
    }
}

/// Cost of passing `arg` where `param` is declared, or `None` if the
/// pairing is not viable.
fn coercion_cost(rel: &dyn TypeRelation, arg: &ScriptValue, param: &Ty) -> Option<u32> {
    match (arg, param) {
        (ScriptValue::Null, Ty::Str) | (ScriptValue::Null, Ty::Object(_)) => Some(0),
        (ScriptValue::Bool(_), Ty::Bool) => Some(0),
        (ScriptValue::Int(i), Ty::Int) if i32::try_from(*i).is_ok() => Some(0),
        (ScriptValue::Int(_), Ty::Long) => Some(1),
        (ScriptValue::Int(_), Ty::Float) => Some(2),
        (ScriptValue::Int(_), Ty::Double) => Some(3),
        (ScriptValue::Float(_), Ty::Double) => Some(0),
        (ScriptValue::Float(_), Ty::Float) => Some(1),
        (ScriptValue::Str(_), Ty::Str) => Some(0),
        (ScriptValue::Str(_), Ty::Object(path)) if path == ROOT_CLASS => Some(1),
        (ScriptValue::Str(_), Ty::Object(path)) if path == STRING_CLASS => Some(0),
        (ScriptValue::Instance(h), Ty::Object(path)) => {
            rel.distance(h.class_id(), path).map(|d| d as u32)
        }
        (ScriptValue::Proxy(p), Ty::Object(path)) => {
            rel.distance(p.interface_id(), path).map(|d| d as u32)
        }
        _ => None,
    }
}

/// Total cost of a candidate against the argument list, or `None` when any
/// argument has no viable coercion. Arity is assumed to match.
fn candidate_cost(rel: &dyn TypeRelation, params: &[Ty], args: &[ScriptValue]) -> Option<u32> {
    let mut total = 0u32;
    for (arg, param) in args.iter().zip(params) {
        total += coercion_cost(rel, arg, param)?;
    }
    Some(total)
}

/// Select the unique best candidate for `args` among `candidates`.
///
/// `class` and `name` feed error reporting only.
pub(crate) fn select<'a, C: Candidate>(
    rel: &dyn TypeRelation,
    class: &str,
    name: &str,
    candidates: impl Iterator<Item = &'a C>,
    args: &[ScriptValue],
) -> BridgeResult<&'a C> {
    let mut best: Option<(u32, &'a C)> = None;
    let mut tied = false;

    for cand in candidates {
        if cand.params().len() != args.len() {
            continue;
        }
        let Some(cost) = candidate_cost(rel, cand.params(), args) else {
            continue;
        };
        match &best {
            Some((min, _)) if cost > *min => {}
            Some((min, _)) if cost == *min => tied = true,
            _ => {
                best = Some((cost, cand));
                tied = false;
            }
        }
    }

    match best {
        Some(_) if tied => Err(BridgeError::AmbiguousOverload {
            class: class.to_string(),
            name: name.to_string(),
            given: describe_args(args),
        }),
        Some((_, cand)) => Ok(cand),
        None => Err(BridgeError::NoOverload {
            class: class.to_string(),
            name: name.to_string(),
            given: describe_args(args),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Stands in for the reflection cache: every class is at distance 1
    /// from the root and distance 0 from itself.
    struct FlatWorld;

    impl TypeRelation for FlatWorld {
        fn distance(&self, _arg_class: ClassId, target_path: &str) -> Option<usize> {
            if target_path == ROOT_CLASS {
                Some(1)
            } else {
                None
            }
        }
    }

    #[derive(Debug)]
    struct Sig(Vec<Ty>);

    impl Candidate for Sig {
        fn params(&self) -> &[Ty] {
            &self.0
        }
    }

    fn pick<'a>(cands: &'a [Sig], args: &[ScriptValue]) -> BridgeResult<&'a Sig> {
        select(&FlatWorld, "test/Example", "m", cands.iter(), args)
    }

    #[test]
    fn test_arity_filters_first() {
        let cands = [Sig(vec![]), Sig(vec![Ty::Int]), Sig(vec![Ty::Int, Ty::Int])];
        let chosen = pick(&cands, &[ScriptValue::Int(1), ScriptValue::Int(2)]).unwrap();
        assert_eq!(chosen.0.len(), 2);
    }

    #[test]
    fn test_int_prefers_int_over_wider() {
        let cands = [Sig(vec![Ty::Double]), Sig(vec![Ty::Int]), Sig(vec![Ty::Long])];
        let chosen = pick(&cands, &[ScriptValue::Int(7)]).unwrap();
        assert_eq!(chosen.0, vec![Ty::Int]);
    }

    #[test]
    fn test_wide_int_skips_int_param() {
        let cands = [Sig(vec![Ty::Int]), Sig(vec![Ty::Long])];
        let big = i64::from(i32::MAX) + 1;
        let chosen = pick(&cands, &[ScriptValue::Int(big)]).unwrap();
        assert_eq!(chosen.0, vec![Ty::Long]);
    }

    #[test]
    fn test_float_prefers_double() {
        let cands = [Sig(vec![Ty::Float]), Sig(vec![Ty::Double])];
        let chosen = pick(&cands, &[ScriptValue::Float(1.5)]).unwrap();
        assert_eq!(chosen.0, vec![Ty::Double]);
    }

    #[test]
    fn test_float_falls_back_to_f32() {
        let cands = [Sig(vec![Ty::Float]), Sig(vec![Ty::Int])];
        let chosen = pick(&cands, &[ScriptValue::Float(1.5)]).unwrap();
        assert_eq!(chosen.0, vec![Ty::Float]);
    }

    #[test]
    fn test_string_prefers_string_over_root() {
        let cands = [
            Sig(vec![Ty::Object(ROOT_CLASS.to_string())]),
            Sig(vec![Ty::Str]),
        ];
        let chosen = pick(&cands, &[ScriptValue::Str("x".into())]).unwrap();
        assert_eq!(chosen.0, vec![Ty::Str]);
    }

    #[test]
    fn test_no_overload_reports_given_types() {
        let cands = [Sig(vec![Ty::Bool])];
        let err = pick(&cands, &[ScriptValue::Str("x".into())]).unwrap_err();
        match err {
            BridgeError::NoOverload { given, .. } => assert_eq!(given, "string"),
            other => panic!("unexpected: {other}"),
        }
    }

    #[test]
    fn test_equal_cost_is_ambiguous() {
        let cands = [Sig(vec![Ty::Long]), Sig(vec![Ty::Long])];
        let err = pick(&cands, &[ScriptValue::Int(1)]).unwrap_err();
        assert!(matches!(err, BridgeError::AmbiguousOverload { .. }));
    }

    #[test]
    fn test_null_matches_any_reference() {
        let cands = [Sig(vec![Ty::Str]), Sig(vec![Ty::Int])];
        let chosen = pick(&cands, &[ScriptValue::Null]).unwrap();
        assert_eq!(chosen.0, vec![Ty::Str]);
    }
}
