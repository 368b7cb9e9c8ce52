//! Type unification
//!
//! Unifies two type expressions where `a` is the "pivot" (usually a declared
//! signature without free variables) and `b` is the type being matched against
//! it. Variables on either side bind into that side's substitution map.
//!
//! Tuples may contain repetitions (`T+`, `T*`, `?T`), which are matched greedily
//! against the other side. Each tentative match takes a snapshot of both
//! substitution maps so that a failed attempt can be rolled back.

use crate::types::expression::Substitutions;
use crate::types::TypeExpression;

/// Direction in which two related constants are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variance {
    /// The result is the more specific of the two
    Covariant,
    /// The result is the more general of the two
    Contravariant,
}

/// Outcome of unifying `a` with `b`
#[derive(Debug, Clone)]
pub struct UnificationResult {
    pub success: bool,
    /// Bindings for the variables of `a`
    pub a_substitutions: Substitutions,
    /// Bindings for the variables of `b`
    pub b_substitutions: Substitutions,
    /// `a` with its bindings applied
    pub a_expression: TypeExpression,
    /// `b` with its bindings applied
    pub b_expression: TypeExpression,
    /// The unified type, present on success
    pub inferred: Option<TypeExpression>,
}

/// Unify types `a` and `b`
///
/// `a` is the pivot: when two constants meet, the result is chosen by checking
/// whether `b`'s class derives from `a`'s.
pub fn unify(a: &TypeExpression, b: &TypeExpression) -> UnificationResult {
    let mut unifier = Unifier::default();
    let inferred = unifier.unify(a, b, Variance::Covariant);

    let a_expression = a.substitute(&unifier.a_substitutions);
    let b_expression = b.substitute(&unifier.b_substitutions);
    let inferred = inferred.map(|ty| ty.substitute(&unifier.b_substitutions));

    UnificationResult {
        success: inferred.is_some(),
        a_expression,
        b_expression,
        inferred,
        a_substitutions: unifier.a_substitutions,
        b_substitutions: unifier.b_substitutions,
    }
}

#[derive(Debug, Default)]
struct Unifier {
    a_substitutions: Substitutions,
    b_substitutions: Substitutions,
}

type Snapshot = (Substitutions, Substitutions);

impl Unifier {
    fn snapshot(&self) -> Snapshot {
        (self.a_substitutions.clone(), self.b_substitutions.clone())
    }

    fn restore(&mut self, (a, b): Snapshot) {
        self.a_substitutions = a;
        self.b_substitutions = b;
    }

    fn unify(
        &mut self,
        a: &TypeExpression,
        b: &TypeExpression,
        variance: Variance,
    ) -> Option<TypeExpression> {
        use TypeExpression::*;

        match (a, b) {
            // Variables
            (Variable(_), Variable(_)) => Some(b.clone()),
            (Variable(name), _) => {
                self.a_substitutions.insert(name.clone(), b.clone());
                Some(b.clone())
            }
            (_, Variable(name)) => {
                self.b_substitutions.insert(name.clone(), a.clone());
                Some(b.clone())
            }

            // Wildcards
            (Wildcard, _) => Some(b.clone()),
            (_, Wildcard) => Some(a.clone()),

            // Repetitions
            (
                Many {
                    inner: inner_a,
                    allow_empty: empty_a,
                    is_option: option_a,
                },
                Many {
                    inner: inner_b,
                    allow_empty: empty_b,
                    is_option: option_b,
                },
            ) => {
                if empty_a != empty_b || option_a != option_b {
                    return None;
                }
                let inner = self.unify(inner_a, inner_b, variance)?;
                Some(Many {
                    inner: Box::new(inner),
                    allow_empty: *empty_a,
                    is_option: *option_a,
                })
            }
            (Many { inner, .. }, _) => self.unify(inner, b, variance),
            (_, Many { inner, .. }) => self.unify(a, inner, variance),

            // Constants
            (Constant(class_a), Constant(class_b)) => {
                let b_from_a = class_b.is_derived_from(class_a);
                let a_from_b = class_a.is_derived_from(class_b);
                if !b_from_a && !a_from_b {
                    return None;
                }
                let pick_b = match variance {
                    Variance::Covariant => b_from_a,
                    Variance::Contravariant => !b_from_a,
                };
                Some(if pick_b { b.clone() } else { a.clone() })
            }

            (Tuple(elements_a), Tuple(elements_b)) => {
                let mut inferred = Vec::with_capacity(elements_b.len());
                self.unify_tuple(0, elements_a, 0, elements_b, &mut inferred, variance)
            }

            (Arrow { from: from_a, to: to_a }, Arrow { from: from_b, to: to_b }) => {
                let from = self.unify(from_a, from_b, Variance::Contravariant)?;
                let to_a = to_a.substitute(&self.a_substitutions);
                let to_b = to_b.substitute(&self.b_substitutions);
                let to = self.unify(&to_a, &to_b, Variance::Covariant)?;
                Some(TypeExpression::arrow(from, to))
            }

            _ => None,
        }
    }

    fn unify_tuple(
        &mut self,
        index_a: usize,
        a: &[TypeExpression],
        index_b: usize,
        b: &[TypeExpression],
        inferred: &mut Vec<TypeExpression>,
        variance: Variance,
    ) -> Option<TypeExpression> {
        if index_a == a.len() && index_b == b.len() {
            return Some(TypeExpression::Tuple(inferred.clone()));
        }

        // One side is exhausted: the other may only have a trailing empty-able repetition left
        if index_a == a.len() {
            return trailing_empty(&b[index_b..]).then(|| TypeExpression::Tuple(inferred.clone()));
        }
        if index_b == b.len() {
            return trailing_empty(&a[index_a..]).then(|| TypeExpression::Tuple(inferred.clone()));
        }

        let x = a[index_a].substitute(&self.a_substitutions);
        let y = b[index_b].substitute(&self.b_substitutions);

        match (&x, &y) {
            (
                TypeExpression::Many {
                    inner,
                    allow_empty,
                    is_option,
                },
                other,
            ) if !matches!(other, TypeExpression::Many { .. }) => {
                let snapshot = self.snapshot();
                let Some(compatible) = self.unify(inner, other, variance) else {
                    if *allow_empty {
                        // Zero occurrences: skip the repetition on the `a` side
                        self.restore(snapshot);
                        return self.unify_tuple(index_a + 1, a, index_b, b, inferred, variance);
                    }
                    return None;
                };
                inferred.push(compatible);

                if *is_option {
                    return self.unify_tuple(index_a + 1, a, index_b + 1, b, inferred, variance);
                }

                let mut matched = index_b + 1;
                let mut inner = inner.substitute(&self.a_substitutions);
                while matched < b.len() {
                    let element = b[matched].substitute(&self.b_substitutions);
                    let snapshot = self.snapshot();
                    match self.unify(&inner, &element, variance) {
                        Some(compatible) => {
                            matched += 1;
                            inferred.push(compatible);
                            inner = inner.substitute(&self.a_substitutions);
                        }
                        None => {
                            self.restore(snapshot);
                            break;
                        }
                    }
                }

                self.unify_tuple(index_a + 1, a, matched, b, inferred, variance)
            }

            (
                other,
                TypeExpression::Many {
                    inner,
                    allow_empty,
                    is_option,
                },
            ) if !matches!(other, TypeExpression::Many { .. }) => {
                let snapshot = self.snapshot();
                let Some(compatible) = self.unify(other, inner, variance) else {
                    if *allow_empty {
                        // Zero occurrences: skip the repetition on the `b` side
                        self.restore(snapshot);
                        return self.unify_tuple(index_a, a, index_b + 1, b, inferred, variance);
                    }
                    return None;
                };
                inferred.push(compatible);

                if *is_option {
                    return self.unify_tuple(index_a + 1, a, index_b + 1, b, inferred, variance);
                }

                let mut matched = index_a + 1;
                let mut inner = inner.substitute(&self.b_substitutions);
                while matched < a.len() {
                    let element = a[matched].substitute(&self.a_substitutions);
                    let snapshot = self.snapshot();
                    match self.unify(&element, &inner, variance) {
                        Some(compatible) => {
                            matched += 1;
                            inferred.push(compatible);
                            inner = inner.substitute(&self.b_substitutions);
                        }
                        None => {
                            self.restore(snapshot);
                            break;
                        }
                    }
                }

                self.unify_tuple(matched, a, index_b + 1, b, inferred, variance)
            }

            _ => {
                let compatible = self.unify(&x, &y, variance)?;
                inferred.push(compatible);
                self.unify_tuple(index_a + 1, a, index_b + 1, b, inferred, variance)
            }
        }
    }
}

fn trailing_empty(rest: &[TypeExpression]) -> bool {
    matches!(
        rest,
        [TypeExpression::Many {
            allow_empty: true,
            ..
        }]
    )
}
