//! Exact set-similarity measures

use std::collections::HashSet;
use std::hash::Hash;

use crate::traits::{Result, SketchError};

fn sets<T, I, J>(a: I, b: J) -> (HashSet<T>, HashSet<T>)
where
    T: Hash + Eq,
    I: IntoIterator<Item = T>,
    J: IntoIterator<Item = T>,
{
    (a.into_iter().collect(), b.into_iter().collect())
}

/// Exact Jaccard similarity `|A ∩ B| / |A ∪ B|`
///
/// Returns [`SketchError::Undefined`] when both sets are empty.
///
/// ```
/// use setsketch::estimators::jaccard;
///
/// assert_eq!(jaccard(["a", "b"], ["b", "c"]).unwrap(), 1.0 / 3.0);
/// ```
pub fn jaccard<T, I, J>(a: I, b: J) -> Result<f64>
where
    T: Hash + Eq,
    I: IntoIterator<Item = T>,
    J: IntoIterator<Item = T>,
{
    let (a, b) = sets(a, b);
    let intersection = a.intersection(&b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return Err(SketchError::Undefined("jaccard of two empty sets"));
    }
    Ok(intersection as f64 / union as f64)
}

/// Exact Dice coefficient `2|A ∩ B| / (|A| + |B|)`
///
/// Returns [`SketchError::Undefined`] when both sets are empty.
pub fn dice_coefficient<T, I, J>(a: I, b: J) -> Result<f64>
where
    T: Hash + Eq,
    I: IntoIterator<Item = T>,
    J: IntoIterator<Item = T>,
{
    let (a, b) = sets(a, b);
    let total = a.len() + b.len();
    if total == 0 {
        return Err(SketchError::Undefined("dice coefficient of two empty sets"));
    }
    Ok(2.0 * a.intersection(&b).count() as f64 / total as f64)
}
