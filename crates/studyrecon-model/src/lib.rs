pub mod error;
pub mod hierarchy;
pub mod ids;
pub mod policy;
pub mod table;

pub use error::{ReconcileError, Result};
pub use hierarchy::{
    DesignHierarchy, DesignItem, GapKind, Hierarchy, IntegrityGap, ItemGroup, ItemKey,
    MetadataHierarchy, SigningUnit,
};
pub use ids::{FlatPath, MISMATCH_MARKER, PATH_SEPARATOR, validate_identifier};
pub use policy::{ExclusionPolicy, IntegrityPolicy};
pub use table::{Column, ComparisonTable};
