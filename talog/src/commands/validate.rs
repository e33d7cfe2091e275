// talog/src/commands/validate.rs

use std::path::Path;

use talog_core::Verdict;

/// Returns whether every validator passed.
pub fn execute(project_dir: &Path, name: &str) -> miette::Result<bool> {
    let config = super::load_configuration(project_dir)?;
    let report = config.catalog().validate(name)?;

    if report.outcomes.is_empty() {
        println!("'{name}' has no validators.");
        return Ok(true);
    }

    for outcome in &report.outcomes {
        match &outcome.verdict {
            Verdict::Pass => println!("✅ [{}] {}", outcome.index, outcome.callable),
            Verdict::Fail(reason) => {
                println!("❌ [{}] {}: {}", outcome.index, outcome.callable, reason)
            }
        }
    }

    let failed = report.failures().count();
    if failed == 0 {
        println!("✨ '{name}' passed {} validator(s).", report.outcomes.len());
        Ok(true)
    } else {
        eprintln!("'{name}' failed {failed} validator(s).");
        Ok(false)
    }
}
