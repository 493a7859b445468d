use anyhow::Result;

use crate::cli::ui::{short_id, status};
use crate::context::DataContext;

/// Execute the inbox command: people whose records are incomplete
pub fn run_inbox(ctx: &DataContext) -> Result<()> {
    let inbox = ctx.needs_attention();
    if inbox.is_empty() {
        status("No incomplete records!");
        return Ok(());
    }

    for (person, missing) in inbox {
        println!(
            "{}  {:<30} {}",
            short_id(person.id),
            person.display_name(),
            missing.label()
        );
    }

    Ok(())
}
