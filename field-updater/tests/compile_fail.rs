//! Misuse that must be rejected at compile time.
//!
//! Snapshot `.stderr` files depend on the exact compiler version, so this is
//! opt-in: run `TRYBUILD=overwrite cargo test --test compile_fail -- --ignored`
//! to record them, then drop the variable to check against them.

#[test]
#[ignore = "compiler diagnostics are toolchain-specific; run explicitly"]
fn ui() {
    let t = trybuild::TestCases::new();
    t.compile_fail("tests/ui/*.rs");
}
