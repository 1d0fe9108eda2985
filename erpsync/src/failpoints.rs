use crate::error::SyncResult;

/// Fires between the staged-key delete and the batch insert of an incremental merge.
pub const MERGE_AFTER_DELETE: &str = "merge.after_delete";

/// Evaluates a named fail point, mapping an activated point to a sync error.
#[cfg(feature = "failpoints")]
pub fn sync_fail_point(name: &'static str) -> SyncResult<()> {
    fail::fail_point!(name, |_| {
        Err(crate::error::SyncError::Failpoint(name))
    });

    Ok(())
}

#[cfg(not(feature = "failpoints"))]
pub fn sync_fail_point(_name: &'static str) -> SyncResult<()> {
    Ok(())
}
