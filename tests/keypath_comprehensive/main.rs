//! keypath Comprehensive Test Suite
//!
//! End-to-end checks of the public facade: buffers built through every
//! entry point, structural sharing across node trees, and nodes driving a
//! key store.
//!
//! ## Test Tiers
//!
//! - **Tier 1**: Buffer invariants (explicit build, replace, stringify)
//! - **Tier 2**: Structural sharing and memoization across node trees
//! - **Tier 3**: Nodes against a key store, including iteration
//! - **Tier 4**: Configuration files and logging
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test keypath_comprehensive
//! ```

// Test modules
mod test_utils;

// Tier 1: Buffer Invariant Tests
mod tier1_buffer_invariants;

// Tier 2: Sharing Tests
mod tier2_sharing;

// Tier 3: Node and Store Tests
mod tier3_node_store;

// Tier 4: Configuration Tests
mod tier4_config;
