//! Fuzz target for the exclusion filter.
//!
//! Run with: cargo +nightly fuzz run fuzz_exclusion_filter
//!
//! Compiles arbitrary rule strings into an `ExclusionFilter` and matches
//! arbitrary names against it. Unparseable glob patterns must be skipped,
//! never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use promptpack_core::gateway::local::ExclusionFilter;
use promptpack_core::gateway::ExclusionRules;

fuzz_target!(|data: &[u8]| {
    if data.len() < 6 {
        return;
    }

    // Use the first 2 bytes as split points to divide data into 3 strings
    let split1 = (data[0] as usize % (data.len() - 2)).max(2);
    let split2 = (data[1] as usize % (data.len() - split1)).max(1) + split1;

    let pattern = std::str::from_utf8(&data[2..split1]).unwrap_or("*.log");
    let dir = std::str::from_utf8(&data[split1..split2]).unwrap_or("target");
    let name = std::str::from_utf8(&data[split2..]).unwrap_or("main.rs");

    let rules = ExclusionRules {
        exclude_dirs: vec![dir.to_string()],
        exclude_files: vec![name.to_string()],
        exclude_patterns: vec![pattern.to_string()],
    };

    let filter = ExclusionFilter::new(&rules);
    let _ = filter.skip_dir(dir);
    let _ = filter.skip_file(name);
    let _ = filter.skip_dir(pattern);
    let _ = filter.skip_file(pattern);
});
