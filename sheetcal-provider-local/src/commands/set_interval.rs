use anyhow::Result;
use sheetcal_core::remote::protocol::SetInterval;

use super::open_store;

pub async fn handle(cmd: SetInterval) -> Result<()> {
    let mut store = open_store(&cmd.remote_config).await?;
    store
        .update_event(&cmd.event_id, |event| {
            event.start = cmd.start;
            event.end = cmd.end;
        })
        .await
}
