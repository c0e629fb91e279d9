use crate::chain::ChainAccessor;
use crate::error::FeerateError;
use crate::{BlockHeight, Timestamp};

/// Returns the height of the first block whose timestamp is `>= t`.
///
/// Plain binary search over `[0, chain_height + 1)`. Block timestamps are
/// assumed non-decreasing over the searched range; the search does not
/// verify this. If `t` is later than every known block the returned height
/// is one past the chain tip, so callers must be prepared for a height
/// that does not exist yet.
pub fn first_block_at_or_after(
    chain: &dyn ChainAccessor,
    t: Timestamp,
) -> Result<BlockHeight, FeerateError> {
    let mut low: BlockHeight = 0;
    let mut high = chain.chain_height()? + 1;

    while low < high {
        let mid = (low + high) / 2;
        if chain.block_time(mid)? < t {
            low = mid + 1;
        } else {
            high = mid;
        }
    }

    Ok(low)
}
