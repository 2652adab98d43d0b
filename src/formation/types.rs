//! The allocation-policy seam.

use crate::error::{FormationError, Result};
use crate::model::{Assignment, Pool};

/// A group-formation heuristic.
///
/// Implementations turn a pool and a target group size into an
/// [`Assignment`]. The reporter and the surrounding application depend
/// only on this trait, so alternative heuristics can be swapped in.
///
/// # Examples
///
/// ```
/// use u_teamform::error::Result;
/// use u_teamform::formation::{validate_request, FormationStrategy};
/// use u_teamform::model::{Assignment, Pool};
///
/// /// Places candidates in pool order.
/// struct InOrder;
///
/// impl FormationStrategy for InOrder {
///     fn name(&self) -> &str { "in-order" }
///
///     fn form_groups(&self, pool: &Pool, group_size: usize) -> Result<Assignment> {
///         validate_request(pool, group_size)?;
///         Ok(Assignment::empty(pool.len(), group_size))
///     }
/// }
/// ```
pub trait FormationStrategy: Send + Sync {
    /// Short identifier for logs and reports.
    fn name(&self) -> &str;

    /// Forms `floor(pool.len() / group_size)` groups.
    fn form_groups(&self, pool: &Pool, group_size: usize) -> Result<Assignment>;
}

/// Rejects requests no strategy can serve: an empty pool, a group size
/// below 2, or a pool smaller than one group.
pub fn validate_request(pool: &Pool, group_size: usize) -> Result<()> {
    if pool.is_empty() {
        return Err(FormationError::EmptyPool);
    }
    if group_size < 2 {
        return Err(FormationError::GroupSizeTooSmall { size: group_size });
    }
    if pool.len() < group_size {
        return Err(FormationError::PoolTooSmall {
            available: pool.len(),
            required: group_size,
        });
    }
    Ok(())
}
