// ABOUTME: Composable capability traits for release infrastructure providers.
// ABOUTME: Defines ObjectStore, CdnOps (with OriginRouting), and Provisioner.

mod cdn;
mod provisioner;
mod storage;

pub use cdn::{
    CdnError, CdnOps, ConcurrencyToken, DistributionSummary, OriginRouting, OriginTarget, Tagged,
};
pub use provisioner::{
    CreateStack, ProvisionError, Provisioner, StackDescription, StackOutput, StackParameter,
    UpdateOutcome, UpdateStack,
};
pub use storage::{
    DeleteFailure, ListPage, ListRequest, ObjectStore, ObjectSummary, PutObject, StorageError,
    list_all,
};
