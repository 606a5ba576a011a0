//! Short-circuiting boolean combinators over fallible predicates.
//!
//! Both engines funnel every composite verdict through these helpers so that the
//! evaluation order is the same everywhere: items are visited in declaration order and
//! the scan stops as soon as the outcome is known or a predicate fails.

/// `true` iff `pred` holds for every item. Stops at the first `false` or error.
pub fn and<T, E>(
    items: impl IntoIterator<Item = T>,
    mut pred: impl FnMut(T) -> Result<bool, E>,
) -> Result<bool, E> {
    for item in items {
        if !pred(item)? {
            return Ok(false);
        }
    }
    Ok(true)
}

/// `true` iff `pred` holds for at least one item. Stops at the first `true` or error.
pub fn or<T, E>(
    items: impl IntoIterator<Item = T>,
    mut pred: impl FnMut(T) -> Result<bool, E>,
) -> Result<bool, E> {
    for item in items {
        if pred(item)? {
            return Ok(true);
        }
    }
    Ok(false)
}

#[inline]
pub fn not<E>(verdict: Result<bool, E>) -> Result<bool, E> {
    verdict.map(|v| !v)
}

/// Evaluate exactly one of the two branches depending on `cond`.
pub fn if_<E>(
    cond: Result<bool, E>,
    then: impl FnOnce() -> Result<bool, E>,
    otherwise: impl FnOnce() -> Result<bool, E>,
) -> Result<bool, E> {
    if cond? { then() } else { otherwise() }
}

/// Position and value of the first item satisfying `pred`, in iteration order.
pub fn first<T, E>(
    items: impl IntoIterator<Item = T>,
    mut pred: impl FnMut(&T) -> Result<bool, E>,
) -> Result<Option<(usize, T)>, E> {
    for (index, item) in items.into_iter().enumerate() {
        if pred(&item)? {
            return Ok(Some((index, item)));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_stops_at_first_false() {
        let mut seen = Vec::new();
        let verdict: Result<bool, ()> = and([true, false, true], |b| {
            seen.push(b);
            Ok(b)
        });
        assert_eq!(verdict, Ok(false));
        assert_eq!(seen, vec![true, false]);
    }

    #[test]
    fn or_stops_at_first_true() {
        let mut seen = 0;
        let verdict: Result<bool, ()> = or([false, true, true], |b| {
            seen += 1;
            Ok(b)
        });
        assert_eq!(verdict, Ok(true));
        assert_eq!(seen, 2);
    }

    #[test]
    fn errors_interrupt_the_scan() {
        let verdict = and([1, 2, 3], |i| if i == 2 { Err("boom") } else { Ok(true) });
        assert_eq!(verdict, Err("boom"));
    }

    #[test]
    fn first_keeps_declaration_order() {
        let found: Result<_, ()> = first(["a", "bb", "cc"], |s| Ok(s.len() == 2));
        assert_eq!(found, Ok(Some((1, "bb"))));
    }

    #[test]
    fn if_evaluates_one_branch() {
        let verdict: Result<bool, &str> = if_(Ok(false), || Err("then"), || Ok(true));
        assert_eq!(verdict, Ok(true));
        assert_eq!(not::<()>(Ok(true)), Ok(false));
    }

    #[test]
    fn empty_lists() {
        assert_eq!(and(Vec::<bool>::new(), Ok::<_, ()>), Ok(true));
        assert_eq!(or(Vec::<bool>::new(), |b| Ok::<_, ()>(b)), Ok(false));
    }
}
