//! Bare instances for structural tests.
//!
//! # Example
//!
//! ```
//! use timeforge_test::times::bare_instance;
//!
//! let instance = bare_instance(10);
//! assert_eq!(instance.cycle_len(), 10);
//! assert_eq!(instance.event_count(), 0);
//! ```

use std::sync::Arc;

use timeforge_core::{Instance, InstanceBuilder, ResourceGroupId};

/// Id of the group holding every resource of [`bare_instance`].
pub const ALL_RESOURCES: ResourceGroupId = ResourceGroupId::new(0);

/// An instance with `n` times, three resources and no events or constraints.
pub fn bare_instance(n: usize) -> Arc<Instance> {
    let mut b = InstanceBuilder::new("bare", (0..n).map(|t| format!("T{}", t)));
    let resources: Vec<_> = (0..3).map(|r| b.add_resource(format!("R{}", r))).collect();
    b.add_resource_group("All", resources)
        .expect("resources were just added");
    Arc::new(b.build().expect("bare instance is valid"))
}
