//! See [`abacus_pairings::test::pairings_workload`] for documentation.

#![no_main]

use abacus_pairings::test::pairings_workload::Workload;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: Workload| {
    let _ = data.run();
});
