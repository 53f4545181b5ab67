use anyhow::Result;

fn main() -> Result<()> {
    plan_preview_action::cli::run()
}
