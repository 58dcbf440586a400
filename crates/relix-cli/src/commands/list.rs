//! Scenario listing
//!
//! Usage: relix list

use relix_core::Result;
use relix_harness::scenario_names;

pub fn execute() -> Result<bool> {
    for name in scenario_names() {
        println!("{}", name);
    }
    Ok(true)
}
