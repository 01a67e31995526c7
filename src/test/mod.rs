//! Test workloads. These are public so that the fuzzing harness (in `fuzz/`)
//! can drive them.
